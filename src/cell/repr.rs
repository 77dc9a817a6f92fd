//! Slice-based parser for the standard representation of a single cell.
//!
//! The standard representation is two descriptor bytes followed by the data
//! bytes. When the bit length is not a multiple of eight, the final data byte
//! ends with a completion tag: a single set bit followed by zeros.

use alloc::vec::Vec;

use tartan_bitfield::bitfield;
use zerocopy::FromBytes;

use super::{Cell, CellError};

/// Decoded descriptor bytes of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    /// Number of references.
    pub refs: usize,
    /// Whether the cell is exotic.
    pub is_exotic: bool,
    /// Whether hashes and depths follow the descriptor.
    pub has_hashes: bool,
    /// Level mask of the cell.
    pub level_mask: u8,
    /// Sum of the floor and ceiling of the data length in bytes.
    pub bits_descriptor: u8,
}

impl Descriptor {
    /// Decode the two descriptor bytes.
    pub fn decode(r: [u8; 2]) -> Self {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct Descriptors {
            refs: u8,
            bits: u8,
        }

        bitfield! {
            struct RefsDescriptor(u8) {
                [0..3] refs_count: u8,
                [3] is_exotic,
                [4] has_hashes,
                [5..8] level_mask: u8,
            }
        }

        let Descriptors { refs, bits } = zerocopy::transmute!(r);
        let refs = RefsDescriptor(refs);

        Self {
            refs: refs.refs_count() as usize,
            is_exotic: refs.is_exotic(),
            has_hashes: refs.has_hashes(),
            level_mask: refs.level_mask(),
            bits_descriptor: bits,
        }
    }

    /// Number of data bytes following the descriptor.
    pub fn data_len(&self) -> usize {
        (self.bits_descriptor as usize).div_ceil(2)
    }

    /// Whether the data ends on a byte boundary (no completion tag).
    pub fn is_aligned(&self) -> bool {
        self.bits_descriptor % 2 == 0
    }

    /// Check the descriptor against the children supplied for the cell.
    pub(super) fn check(&self, refs: usize) -> Result<(), CellError> {
        if self.is_exotic {
            Err(CellError::Exotic)?;
        }

        if self.has_hashes {
            Err(CellError::StoredHashes)?;
        }

        if self.refs != refs {
            Err(CellError::RefsMismatch {
                expected: self.refs,
                found: refs,
            })?;
        }

        Ok(())
    }

    /// Build the cell from its data bytes, stripping any completion tag.
    pub(super) fn finish(&self, mut data: Vec<u8>, refs: Vec<Cell>) -> Result<Cell, CellError> {
        let bits = if self.is_aligned() {
            data.len() * 8
        } else {
            let Some(last) = data.last_mut() else {
                return Err(CellError::MissingCompletionTag);
            };

            // The tag must leave at least one data bit in the final byte.
            if *last == 0 || *last == 0x80 {
                Err(CellError::MissingCompletionTag)?;
            }

            let tag = last.trailing_zeros();
            *last &= !(1 << tag);

            (self.data_len() - 1) * 8 + (7 - tag as usize)
        };

        Cell::new(bits, data, refs)
    }
}

/// Parse the standard representation of a cell from the start of a slice.
///
/// The children must already be built, in the order they are referenced.
/// Returns the cell and the number of bytes consumed.
///
/// This method is also re-exported as `tvm_cell::cell::parse_slice`.
pub fn parse(r: &[u8], refs: Vec<Cell>) -> Result<(Cell, usize), CellError> {
    let result = parse_inner(r, refs);

    if let Err(err) = &result {
        log::debug!("rejected cell representation: {err}");
    }

    result
}

fn parse_inner(r: &[u8], refs: Vec<Cell>) -> Result<(Cell, usize), CellError> {
    let header = r.first_chunk::<2>().ok_or(CellError::EndOfSlice)?;
    let descriptor = Descriptor::decode(*header);
    descriptor.check(refs.len())?;

    let end = 2 + descriptor.data_len();
    let data = r.get(2..end).ok_or(CellError::EndOfSlice)?.to_vec();

    Ok((descriptor.finish(data, refs)?, end))
}
