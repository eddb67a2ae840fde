//! Bounded byte source (spec §3, §4.1).
//!
//! A buffered, seekable-when-possible reader over a local file. Small reads
//! are coalesced into a single internal buffer of at least [`MIN_FETCH`]
//! bytes so a network-resident source (mounted over e.g. smb/nfs) does not
//! pay a round trip per VINT byte. Seeking inside the current buffer window
//! never touches the underlying handle; seeking outside it either
//! repositions the handle (when seekable) or reports
//! [`ByteSourceError::NotSeekable`] so the caller can fall back to a linear
//! scan (spec §4.3 step 6).

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::ByteSourceError;

/// Internal reads are coalesced to at least this many bytes.
pub const MIN_FETCH: usize = 64 * 1024;

/// A random-access-capable reader over a local or network-resident file.
pub struct ByteSource<R> {
    inner: R,
    seekable: bool,
    size: Option<u64>,
    buf: Vec<u8>,
    /// Absolute file offset of `buf[0]`.
    buf_start: u64,
    /// Absolute file offset of the next byte `read_exact` will return.
    pos: u64,
}

impl ByteSource<File> {
    /// Open a local file. Local files are always seekable.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ByteSourceError> {
        let file = File::open(path)?;
        let size = file.metadata().ok().map(|m| m.len());
        Ok(Self {
            inner: file,
            seekable: true,
            size,
            buf: Vec::new(),
            buf_start: 0,
            pos: 0,
        })
    }
}

impl<R: Read> ByteSource<R> {
    /// Wrap an arbitrary reader that does not support seeking -- the caller
    /// must use the linear scan path in the extractor.
    pub fn new_non_seekable(inner: R) -> Self {
        Self {
            inner,
            seekable: false,
            size: None,
            buf: Vec::new(),
            buf_start: 0,
            pos: 0,
        }
    }

    /// Current absolute read position.
    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Total size, if known in advance.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn is_seekable(&self) -> bool {
        self.seekable
    }

    fn buf_end(&self) -> u64 {
        self.buf_start + self.buf.len() as u64
    }

    fn pos_in_buf(&self, pos: u64) -> bool {
        pos >= self.buf_start && pos < self.buf_end()
    }

    /// Fill `self.buf` starting at the current `pos`, fetching at least
    /// `min(want, MIN_FETCH)` bytes in one underlying read where possible.
    fn refill(&mut self, want: usize) -> Result<(), ByteSourceError> {
        let fetch = want.max(MIN_FETCH);
        let mut chunk = vec![0u8; fetch];
        let mut filled = 0;
        loop {
            let n = self.inner.read(&mut chunk[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
            if filled >= want {
                break;
            }
        }
        chunk.truncate(filled);
        self.buf_start = self.pos;
        self.buf = chunk;
        Ok(())
    }

    /// Read exactly `n` bytes, coalescing underlying reads into buffers of
    /// at least [`MIN_FETCH`]. Returns a typed short-read error on EOF --
    /// the extractor treats this as a stop condition, not a fatal error.
    pub fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, ByteSourceError> {
        let mut out = Vec::with_capacity(n);

        if self.pos_in_buf(self.pos) {
            let avail = (self.buf_end() - self.pos) as usize;
            let take = avail.min(n);
            let start = (self.pos - self.buf_start) as usize;
            out.extend_from_slice(&self.buf[start..start + take]);
            self.pos += take as u64;
        }

        while out.len() < n {
            let remaining = n - out.len();
            self.refill(remaining)?;
            if self.buf.is_empty() {
                return Err(ByteSourceError::ShortRead {
                    wanted: n,
                    got: out.len(),
                });
            }
            let take = self.buf.len().min(remaining);
            out.extend_from_slice(&self.buf[..take]);
            self.pos += take as u64;
        }

        Ok(out)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8, ByteSourceError> {
        Ok(self.read_exact(1)?[0])
    }

    /// Seek to an absolute offset. A seek landing inside the buffered window
    /// is free; otherwise the underlying handle is repositioned if seekable,
    /// or [`ByteSourceError::NotSeekable`] is returned.
    pub fn seek_absolute(&mut self, offset: u64) -> Result<(), ByteSourceError>
    where
        R: Seek,
    {
        if self.pos_in_buf(offset) || offset == self.buf_end() {
            self.pos = offset;
            return Ok(());
        }
        if !self.seekable {
            return Err(ByteSourceError::NotSeekable);
        }
        self.inner.seek(SeekFrom::Start(offset))?;
        self.pos = offset;
        self.buf.clear();
        self.buf_start = offset;
        Ok(())
    }

    /// Skip `n` bytes forward without materializing them.
    pub fn skip(&mut self, n: u64) -> Result<(), ByteSourceError>
    where
        R: Seek,
    {
        self.seek_absolute(self.pos + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn cursor_source(data: &[u8]) -> ByteSource<Cursor<Vec<u8>>> {
        ByteSource {
            inner: Cursor::new(data.to_vec()),
            seekable: true,
            size: Some(data.len() as u64),
            buf: Vec::new(),
            buf_start: 0,
            pos: 0,
        }
    }

    #[test]
    fn reads_exact_bytes_across_refills() {
        let data: Vec<u8> = (0u8..=255).collect();
        let mut src = cursor_source(&data);
        let first = src.read_exact(10).unwrap();
        assert_eq!(first, data[0..10]);
        let second = src.read_exact(20).unwrap();
        assert_eq!(second, data[10..30]);
    }

    #[test]
    fn seek_inside_buffer_is_free() {
        let data: Vec<u8> = (0u8..=255).collect();
        let mut src = cursor_source(&data);
        let _ = src.read_exact(100).unwrap();
        src.seek_absolute(5).unwrap();
        let b = src.read_u8().unwrap();
        assert_eq!(b, 5);
    }

    #[test]
    fn short_read_is_typed_not_fatal() {
        let data = vec![1, 2, 3];
        let mut src = cursor_source(&data);
        let err = src.read_exact(10).unwrap_err();
        match err {
            ByteSourceError::ShortRead { wanted, got } => {
                assert_eq!(wanted, 10);
                assert_eq!(got, 3);
            }
            other => panic!("expected ShortRead, got {other:?}"),
        }
    }

    #[test]
    fn seek_past_end_then_read_fails_as_short_read() {
        let data: Vec<u8> = (0u8..10).collect();
        let mut src = cursor_source(&data);
        src.seek_absolute(9).unwrap();
        let _ = src.read_u8().unwrap();
        let err = src.read_u8().unwrap_err();
        assert!(matches!(err, ByteSourceError::ShortRead { .. }));
    }
}
