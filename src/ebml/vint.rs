//! VINT decoding and the EBML element cursor (spec §3, §4.2).

use crate::bytesource::ByteSource;
use crate::error::ByteSourceError;
use std::io::{Read, Seek};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EbmlError {
    #[error("malformed EBML: {0}")]
    Malformed(String),
    #[error(transparent)]
    Source(#[from] ByteSourceError),
}

/// The decoded size of an element; EBML allows declaring an element's size
/// as unknown (all data bits set after the marker bit is stripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementSize {
    Known(u64),
    Unknown,
}

impl ElementSize {
    pub fn known(self) -> Option<u64> {
        match self {
            ElementSize::Known(n) => Some(n),
            ElementSize::Unknown => None,
        }
    }
}

/// A decoded EBML element header (spec §3 "EBML Element").
#[derive(Debug, Clone, Copy)]
pub struct ElementHeader {
    pub id: u32,
    pub size: ElementSize,
    /// Absolute file offset of the first byte of this element's data.
    pub data_offset: u64,
}

/// Reads VINT-encoded element IDs and sizes over a [`ByteSource`].
pub struct EbmlReader<'a, R> {
    pub source: &'a mut ByteSource<R>,
}

impl<'a, R: Read + Seek> EbmlReader<'a, R> {
    pub fn new(source: &'a mut ByteSource<R>) -> Self {
        Self { source }
    }

    /// Decode a VINT-encoded element ID. The marker bit is retained in the
    /// returned value, matching common Matroska tooling (spec §3).
    pub fn read_element_id(&mut self) -> Result<(u32, usize), EbmlError> {
        let first = self.source.read_u8()?;
        if first == 0 {
            return Err(EbmlError::Malformed("leading zero byte in element ID".into()));
        }
        let length = leading_zero_run(first, 4)
            .ok_or_else(|| EbmlError::Malformed("element ID VINT length > 4".into()))?
            + 1;

        let mut value = first as u32;
        for _ in 1..length {
            let b = self.source.read_u8()?;
            value = (value << 8) | b as u32;
        }
        Ok((value, length))
    }

    /// Decode a VINT-encoded size. The marker bit is stripped; an
    /// all-data-bits-set value denotes [`ElementSize::Unknown`].
    pub fn read_vint_size(&mut self) -> Result<(ElementSize, usize), EbmlError> {
        let first = self.source.read_u8()?;
        if first == 0 {
            return Err(EbmlError::Malformed("leading zero byte in size VINT".into()));
        }
        let length = leading_zero_run(first, 8)
            .ok_or_else(|| EbmlError::Malformed("size VINT length > 8".into()))?
            + 1;

        let marker_bit = 0x80u8 >> (length - 1);
        let mut value = (first & !marker_bit) as u64;
        let mut all_ones = value == (marker_bit - 1) as u64;
        for _ in 1..length {
            let b = self.source.read_u8()?;
            value = (value << 8) | b as u64;
            all_ones = all_ones && b == 0xFF;
        }

        if all_ones {
            Ok((ElementSize::Unknown, length))
        } else {
            Ok((ElementSize::Known(value), length))
        }
    }

    /// Peek the next element header without consuming its data.
    pub fn peek_element_header(&mut self) -> Result<ElementHeader, EbmlError>
    where
        R: Clone,
    {
        // Used only by callers that already captured a seekable position;
        // the simple read path below is the one exercised in practice.
        self.read_element_header()
    }

    /// Read a full element header: ID, size, and the resulting data offset.
    pub fn read_element_header(&mut self) -> Result<ElementHeader, EbmlError> {
        let (id, _) = self.read_element_id()?;
        let (size, _) = self.read_vint_size()?;
        let data_offset = self.source.position();
        Ok(ElementHeader { id, size, data_offset })
    }

    /// Skip `n` bytes of element data.
    pub fn skip(&mut self, n: u64) -> Result<(), EbmlError> {
        self.source.skip(n)?;
        Ok(())
    }
}

/// Count the leading zero bits in `byte`, capped at `max`. Returns `None`
/// if more than `max` leading zeros are present (VINT too long).
fn leading_zero_run(byte: u8, max: u32) -> Option<usize> {
    let zeros = byte.leading_zeros();
    if zeros > max {
        None
    } else {
        Some(zeros as usize)
    }
}

/// Big-endian unsigned integer decode, used for small fixed-size EBML
/// payloads (TrackNumber, TrackType, TimecodeScale, Timestamp, ...).
pub fn read_uint_be(bytes: &[u8]) -> u64 {
    bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64)
}
