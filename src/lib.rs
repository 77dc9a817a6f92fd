#![no_std]

//! A sequential bit-level decoder for TON Virtual Machine cells.
//!
//! A cell holds up to 1023 bits of data and up to four references to child
//! cells. Tvm-cell reads an already-materialized [`Cell`] through a
//! [`LoadCell`] cursor, which consumes bits and references in strict forward
//! order and decodes integers, variable-length amounts and raw bit strings.
//!
//! Most users should begin with [`Cell::begin_parse`] and the `load_*` methods
//! of [`LoadCell`]. Structures with a known layout can instead implement (or
//! derive) the [`FromCell`](tlb::FromCell) trait described in the [`tlb`]
//! module.
//!
//! Tvm-cell never writes cells, and never computes or checks cell hashes.
//! Parsing a bag-of-cells container is left to the caller; the [`cell`]
//! module can parse the standard representation of a single cell once its
//! children are known.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader-based cell parsing (default).

extern crate alloc;

pub mod cell;
pub mod load;
pub mod tlb;

pub use cell::Cell;
pub use load::{Error, LoadCell};

/// Maximum number of data bits in a cell.
pub const MAX_BITS: usize = 1023;

/// Maximum number of references held by a cell.
pub const MAX_REFS: usize = 4;

/// Maximum width of a single fixed-width integer read.
pub const MAX_INT_BITS: usize = 256;
