//! Typed decoding of cells with a known layout.
//!
//! Cell layouts are usually described by TL-B schemes. A type implementing
//! [`FromCell`] knows how to read itself from a cursor, and structures can
//! derive the implementation field-by-field. See the
//! [`FromCell`](macro@FromCell) macro for details.

use either::Either;

use crate::load::{Error, LoadCell};

/// Derive [`FromCell`] for a struct with named fields.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// Fields are read in declaration order. Annotate each field read from the
/// cell with `tlb(...)`; fields without the attribute are filled with their
/// [`Default`] value.
///
/// | Attribute        | TL-B          | Field type                    |
/// |------------------|---------------|-------------------------------|
/// | `uint(N)`        | `## N`        | any integer primitive         |
/// | `int(N)`         | `int N`       | any integer primitive         |
/// | `big_uint(N)`    | `uint N`      | `BigUint`                     |
/// | `coins`          | `Grams`       | `u64`                         |
/// | `big_coins`      | `Grams`       | `BigUint`                     |
/// | `bool`           | `Bool`        | `bool`                        |
/// | `bits(N)`        | `bits N`      | `Vec<u8>`                     |
/// | `inline`         | `X`           | `T: FromCell`                 |
/// | `ref`            | `^X`          | `T: FromCell`                 |
/// | `maybe_ref`      | `Maybe ^X`    | `Option<T>`, `T: FromCell`    |
/// | `rest`           | remaining     | `(usize, Vec<u8>)`            |
///
/// A constructor tag can be checked before any field is read by annotating
/// the struct itself with `tlb(tag = X, bits = N)`.
///
/// ```
/// #[derive(Debug, FromCell)]
/// #[tlb(tag = 0x0f8a7ea5, bits = 32)]
/// struct JettonTransfer {
///     #[tlb(uint(64))]
///     query_id: u64,
///     #[tlb(big_coins)]
///     amount: BigUint,
///     #[tlb(maybe_ref)]
///     custom_payload: Option<Payload>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use tvm_cell_derive::FromCell;

/// Read a value from a cell.
///
/// See the [`FromCell`](macro@FromCell) derive macro for an automatic
/// implementation of this trait.
pub trait FromCell: Sized {
    /// Read a value, advancing the cursor past it.
    fn load_from(cell: &mut LoadCell<'_>) -> Result<Self, Error>;
}

impl FromCell for bool {
    fn load_from(cell: &mut LoadCell<'_>) -> Result<Self, Error> {
        cell.load_bool()
    }
}

macro_rules! from_cell_int {
    ($($t:ident: $load:ident),* $(,)?) => {
        $(
            /// Reads the type's native width.
            impl FromCell for $t {
                fn load_from(cell: &mut LoadCell<'_>) -> Result<Self, Error> {
                    Ok(cell.$load($t::BITS as usize)? as $t)
                }
            }
        )*
    };
}

from_cell_int!(u8: load_uint, u16: load_uint, u32: load_uint, u64: load_uint);
from_cell_int!(i8: load_int, i16: load_int, i32: load_int, i64: load_int);

/// `Maybe X`: a presence bit, then the value inline.
impl<T: FromCell> FromCell for Option<T> {
    fn load_from(cell: &mut LoadCell<'_>) -> Result<Self, Error> {
        let mut lookahead = cell.clone();

        let value = if lookahead.load_bool()? {
            Some(T::load_from(&mut lookahead)?)
        } else {
            None
        };

        *cell = lookahead;

        Ok(value)
    }
}

/// `Either X Y`: a selector bit, then either value inline.
impl<L: FromCell, R: FromCell> FromCell for Either<L, R> {
    fn load_from(cell: &mut LoadCell<'_>) -> Result<Self, Error> {
        cell.load_either(L::load_from, R::load_from)
    }
}
