//! EBML decoding primitives (spec §4.2): VINT element IDs/sizes and the
//! element cursor built on top of the bounded byte source.

pub mod ids;
pub mod vint;

pub use vint::{EbmlError, EbmlReader, ElementHeader, ElementSize};
