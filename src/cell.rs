//! Materialized cells.
//!
//! A [`Cell`] is the input to decoding: its bit length, the bytes holding
//! those bits, and its already-built children. Cells are produced by whatever
//! parses the surrounding container; [`Cell::new`] checks the format limits,
//! and the [`repr`] module builds a cell from its standard representation.

#[cfg(feature = "std")]
pub mod reader;
pub mod repr;

#[cfg(feature = "std")]
pub use reader::read as parse_reader;
pub use repr::parse as parse_slice;

use alloc::vec::Vec;

use thiserror::Error;

use crate::{MAX_BITS, MAX_REFS, load::LoadCell};

/// Errors occurring while building a cell.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellError {
    /// Cell holds more bits than the format allows.
    #[error("Cell holds {0} bits (at most 1023 are allowed).")]
    TooManyBits(usize),
    /// Cell holds more references than the format allows.
    #[error("Cell holds {0} references (at most 4 are allowed).")]
    TooManyRefs(usize),
    /// Data length does not cover the bit length.
    #[error("Expected {expected} data bytes, found {found}.")]
    DataLength { expected: usize, found: usize },
    /// Descriptor and supplied references disagree.
    #[error("Descriptor declares {expected} references, {found} were supplied.")]
    RefsMismatch { expected: usize, found: usize },
    /// Final data byte lacks its completion tag.
    #[error("Final data byte lacks a completion tag.")]
    MissingCompletionTag,
    /// Found an exotic cell (not supported).
    #[error("Found an exotic cell.")]
    Exotic,
    /// Found a representation with stored hashes (not supported).
    #[error("Found a representation with stored hashes.")]
    StoredHashes,
    /// Unexpectedly reached the end of the slice.
    #[error("Unexpectedly reached the end of the slice.")]
    EndOfSlice,
}

/// An ordinary cell: up to 1023 bits and up to 4 child cells.
///
/// Bits are numbered from the most significant bit of the first byte. Bits
/// in the final byte beyond the bit length are ignored by every read.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    bits: usize,
    data: Vec<u8>,
    refs: Vec<Cell>,
}

impl Cell {
    /// Build a cell from its bit length, data bytes and children.
    ///
    /// The data must be exactly `ceil(bits / 8)` bytes long.
    pub fn new(bits: usize, data: Vec<u8>, refs: Vec<Cell>) -> Result<Self, CellError> {
        if bits > MAX_BITS {
            Err(CellError::TooManyBits(bits))?;
        }

        if refs.len() > MAX_REFS {
            Err(CellError::TooManyRefs(refs.len()))?;
        }

        let expected = bits.div_ceil(8);
        if data.len() != expected {
            Err(CellError::DataLength {
                expected,
                found: data.len(),
            })?;
        }

        Ok(Self { bits, data, refs })
    }

    /// Number of data bits.
    pub fn bit_len(&self) -> usize {
        self.bits
    }

    /// Data bytes, with the final byte possibly partial.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Child cells, in attachment order.
    pub fn refs(&self) -> &[Cell] {
        &self.refs
    }

    /// Start reading this cell from its first bit and first reference.
    pub fn begin_parse(&self) -> LoadCell<'_> {
        LoadCell::new(self)
    }
}
