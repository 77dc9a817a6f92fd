//! Sequential reading of a cell.
//!
//! A [`LoadCell`] walks one cell from its first bit and first reference to its
//! last. Every `load_*` method either returns a value and advances the cursor
//! by exactly the bits (or references) it used, or fails and leaves the cursor
//! where it was.
//!
//! # Bit order
//!
//! Bits are read most significant first within a byte, and bytes from left
//! to right. Raw reads ([`LoadCell::load_slice`]) return bytes packed the same
//! way, with a final partial byte aligned to the left and zero-filled.
//! Integer reads align the value to the right.

use alloc::{string::String, vec, vec::Vec};

use either::Either::{self, Left, Right};
use num_bigint::BigUint;
use thiserror::Error;

use crate::{MAX_INT_BITS, cell::Cell};

/// Errors occurring while reading a cell.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Requested more bits than remain in the cell.
    #[error("Requested {requested} bits, {remaining} remain in the cell.")]
    NotEnoughData { requested: usize, remaining: usize },
    /// Requested a reference after all were consumed.
    #[error("No more references in the cell.")]
    NoMoreRefs,
    /// Requested an integer wider than 256 bits.
    #[error("Requested a {0} bit integer (at most 256 bits are supported).")]
    TooBigValue(usize),
    /// Constructor tag does not match the expected value.
    #[error("Expected tag {expected:#x}, found {found:#x}.")]
    TagMismatch { expected: u64, found: u64 },
    /// Snake string is not valid UTF-8.
    #[error("Snake string is not valid UTF-8.")]
    InvalidUtf8,
}

/// A cursor over the unread bits and references of a cell.
///
/// Cloning a cursor gives an independent cursor at the same position, which
/// can be used to look ahead without consuming.
#[derive(Debug, Clone)]
pub struct LoadCell<'a> {
    cell: &'a Cell,
    /// Bits consumed so far.
    loaded: usize,
    /// References consumed so far.
    refs_loaded: usize,
}

impl<'a> LoadCell<'a> {
    pub(crate) fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            loaded: 0,
            refs_loaded: 0,
        }
    }

    /// Number of bits not yet consumed.
    pub fn bits_left(&self) -> usize {
        self.cell.bit_len() - self.loaded
    }

    /// Number of references not yet consumed.
    pub fn refs_left(&self) -> usize {
        self.cell.refs().len() - self.refs_loaded
    }

    /// Number of bits consumed so far.
    pub fn bits_loaded(&self) -> usize {
        self.loaded
    }

    /// Whether every bit and every reference has been consumed.
    pub fn is_empty(&self) -> bool {
        self.bits_left() == 0 && self.refs_left() == 0
    }

    /// Take the next reference, returning a cursor at the start of it.
    pub fn load_ref(&mut self) -> Result<LoadCell<'a>, Error> {
        let Some(cell) = self.cell.refs().get(self.refs_loaded) else {
            log::trace!("no references left after {}", self.refs_loaded);
            return Err(Error::NoMoreRefs);
        };

        self.refs_loaded += 1;

        Ok(cell.begin_parse())
    }

    /// Take the next reference if the next bit is set (`Maybe ^X`).
    pub fn load_maybe_ref(&mut self) -> Result<Option<LoadCell<'a>>, Error> {
        self.atomic(|cell| {
            if cell.load_bool()? {
                cell.load_ref().map(Some)
            } else {
                Ok(None)
            }
        })
    }

    /// Load exactly `sz` bits, packed most significant bit first.
    ///
    /// The final byte holds the trailing `sz % 8` bits in its high bits, with
    /// the low bits cleared. Requesting zero bits returns an empty buffer.
    pub fn load_slice(&mut self, sz: usize) -> Result<Vec<u8>, Error> {
        self.ensure(sz)?;

        let data = self.cell.data();
        let base = self.loaded / 8;
        let shift = self.loaded % 8;

        let mut loaded = vec![0; sz.div_ceil(8)];

        for (i, b) in loaded.iter_mut().enumerate() {
            *b = data[base + i] << shift;

            // Pull the head of the following byte into the low bits.
            if shift != 0 {
                if let Some(next) = data.get(base + i + 1) {
                    *b |= *next >> (8 - shift);
                }
            }
        }

        if let Some(last) = loaded.last_mut() {
            if sz % 8 != 0 {
                *last &= 0xFF << (8 - sz % 8);
            }
        }

        self.loaded += sz;

        Ok(loaded)
    }

    /// Skip `sz` bits.
    pub fn skip_bits(&mut self, sz: usize) -> Result<(), Error> {
        self.ensure(sz)?;
        self.loaded += sz;

        Ok(())
    }

    /// Load a single bit as a boolean.
    pub fn load_bool(&mut self) -> Result<bool, Error> {
        Ok(self.load_uint(1)? == 1)
    }

    /// Load an unsigned integer of `sz` bits (at most 256).
    pub fn load_big_int(&mut self, sz: usize) -> Result<BigUint, Error> {
        if sz > MAX_INT_BITS {
            log::trace!("refused to load a {sz} bit integer");
            Err(Error::TooBigValue(sz))?;
        }

        let mut b = self.load_slice(sz)?;
        align_right(&mut b, sz);

        Ok(BigUint::from_bytes_be(&b))
    }

    /// Load an unsigned integer of `sz` bits, keeping its low 64 bits.
    ///
    /// Widths above 64 are accepted (up to 256), but only the low 64 bits of
    /// the value are returned.
    pub fn load_uint(&mut self, sz: usize) -> Result<u64, Error> {
        Ok(low_u64(&self.load_big_int(sz)?))
    }

    /// Load a two's complement signed integer of `sz` bits, keeping its low
    /// 64 bits.
    pub fn load_int(&mut self, sz: usize) -> Result<i64, Error> {
        let value = self.load_uint(sz)?;

        // Extend the sign bit of narrow values over the unused high bits.
        if sz > 0 && sz < 64 && (value >> (sz - 1)) & 1 == 1 {
            return Ok((value | u64::MAX << sz) as i64);
        }

        Ok(value as i64)
    }

    /// Load a variable-length amount (`VarUInteger 16`).
    ///
    /// A 4-bit byte count is followed by that many bytes of big-endian value.
    pub fn load_big_coins(&mut self) -> Result<BigUint, Error> {
        self.atomic(|cell| {
            let ln = cell.load_uint(4)? as usize;
            cell.load_big_int(ln * 8)
        })
    }

    /// Load a variable-length amount, keeping its low 64 bits.
    pub fn load_coins(&mut self) -> Result<u64, Error> {
        Ok(low_u64(&self.load_big_coins()?))
    }

    /// Load an inline `Either X Y`: a single bit selects the decoder.
    ///
    /// If the selected decoder fails, the cursor is returned to where it was
    /// before the selector bit.
    pub fn load_either<L, R>(
        &mut self,
        left: impl FnOnce(&mut Self) -> Result<L, Error>,
        right: impl FnOnce(&mut Self) -> Result<R, Error>,
    ) -> Result<Either<L, R>, Error> {
        self.atomic(|cell| {
            if cell.load_bool()? {
                right(cell).map(Right)
            } else {
                left(cell).map(Left)
            }
        })
    }

    /// Load every remaining bit.
    ///
    /// Returns the number of bits loaded and the packed bits. Calling again
    /// returns zero bits.
    pub fn rest_bits(&mut self) -> (usize, Vec<u8>) {
        let left = self.bits_left();

        // Never fails: exactly the remaining bits are requested.
        let b = self.load_slice(left).unwrap_or_default();

        (left, b)
    }

    /// Load a snake-encoded byte string.
    ///
    /// The bytes are the whole bytes remaining in this cell, followed by those
    /// of its first reference, and so on down the chain of first references.
    /// Spare bits at the end of a cell are not part of the string.
    pub fn load_binary_snake(&mut self) -> Result<Vec<u8>, Error> {
        let mut data = self.load_slice(self.bits_left() / 8 * 8)?;

        let mut next = self.load_next_snake()?;
        while let Some(mut cell) = next {
            data.extend(cell.load_slice(cell.bits_left() / 8 * 8)?);
            next = cell.load_next_snake()?;
        }

        Ok(data)
    }

    /// Load a snake-encoded UTF-8 string.
    pub fn load_string_snake(&mut self) -> Result<String, Error> {
        self.atomic(|cell| {
            let data = cell.load_binary_snake()?;
            String::from_utf8(data).map_err(|_| Error::InvalidUtf8)
        })
    }

    fn load_next_snake(&mut self) -> Result<Option<LoadCell<'a>>, Error> {
        if self.refs_left() == 0 {
            return Ok(None);
        }

        self.load_ref().map(Some)
    }

    /// Run a multi-step read, rewinding the cursor if any step fails.
    fn atomic<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, Error>) -> Result<T, Error> {
        let (loaded, refs_loaded) = (self.loaded, self.refs_loaded);

        f(self).inspect_err(|_| {
            self.loaded = loaded;
            self.refs_loaded = refs_loaded;
        })
    }

    /// Check that `sz` bits remain.
    fn ensure(&self, sz: usize) -> Result<(), Error> {
        let remaining = self.bits_left();

        if sz > remaining {
            log::trace!("requested {sz} bits, {remaining} remain");
            Err(Error::NotEnoughData {
                requested: sz,
                remaining,
            })?;
        }

        Ok(())
    }
}

/// Shift left-aligned packed bits of width `sz` to the right, so the bytes
/// read as a big-endian integer.
///
/// Each byte gives up its low bits to the next byte's high bits, processing
/// from the least significant byte.
fn align_right(b: &mut [u8], sz: usize) {
    let offset = sz % 8;
    if offset == 0 {
        return;
    }

    for i in (0..b.len()).rev() {
        b[i] >>= 8 - offset;
        if i > 0 {
            b[i] |= b[i - 1] << offset;
        }
    }
}

/// The low 64 bits of a big integer.
fn low_u64(value: &BigUint) -> u64 {
    value.iter_u64_digits().next().unwrap_or(0)
}
