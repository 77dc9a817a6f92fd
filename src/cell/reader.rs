//! Reader-based parser for the standard representation of a single cell.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec, vec::Vec};

use thiserror::Error;

use super::{Cell, CellError, repr::Descriptor};

extern crate std;

/// Errors occurring while reading a cell from a reader.
#[derive(Debug, Error)]
pub enum ReadError {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The representation read is not a valid cell.
    #[error("Invalid cell representation: {0}")]
    Cell(#[from] CellError),
}

/// Read the standard representation of a cell from a reader.
///
/// Exactly the descriptor and data bytes are read; nothing beyond.
///
/// This method is also re-exported as `tvm_cell::cell::parse_reader`.
///
/// _Requires Cargo feature `std`._
pub fn read(r: &mut impl Read, refs: Vec<Cell>) -> Result<Cell, ReadError> {
    let mut header = [0; 2];
    r.read_exact(&mut header)?;

    let descriptor = Descriptor::decode(header);
    if let Err(err) = descriptor.check(refs.len()) {
        log::debug!("rejected cell descriptor: {err}");
        Err(err)?;
    }

    let mut data = vec![0; descriptor.data_len()];
    r.read_exact(&mut data)?;

    Ok(descriptor.finish(data, refs)?)
}
