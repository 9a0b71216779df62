//! Buffered byte sources feeding the tokenizer.
//!
//! Two interchangeable strategies satisfy the same [`InputSource`] contract
//! (a peekable, consumable byte stream with a known end):
//!
//! - [`LookaheadBuffer`] wraps an in-memory byte block padded with a small
//!   fixed look-ahead margin, so end-of-input checks and short look-aheads
//!   never branch on the buffer length.
//! - [`ParallelFileSource`] splits a file into contiguous ranges, reads all
//!   ranges concurrently on the rayon pool, and reassembles them into the
//!   same logical byte stream. Concurrency affects only read latency; the
//!   resulting byte sequence is identical to a sequential read.
//!
//! [`read_file_auto`] applies the selection policy: parallel at or above
//! [`PARALLEL_THRESHOLD`], sequential below.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};

/// Look-ahead margin appended past the logical end of every buffer.
pub const AHEAD_SIZE: usize = 8;

/// File size at and above which [`read_file_auto`] switches to the parallel
/// chunked strategy.
pub const PARALLEL_THRESHOLD: u64 = 128 * 1024;

/// Smallest byte range worth handing to a separate rayon worker.
const MIN_CHUNK: usize = 16 * 1024;

/// A peekable, consumable byte stream with a known end.
///
/// Bytes past the logical end read as NUL; callers detect the end with
/// [`InputSource::at_end`] rather than by sentinel scanning.
pub trait InputSource {
    /// Returns the current byte, or NUL past the end.
    fn peek(&self) -> u8;

    /// Returns the byte `n` positions ahead of the cursor, or NUL past the
    /// end. `n` must stay within the look-ahead margin.
    fn peek_ahead(&self, n: usize) -> u8;

    /// Moves the cursor one byte forward. Saturates at the logical end.
    fn advance(&mut self);

    /// True once the cursor has consumed every logical byte.
    fn at_end(&self) -> bool;

    /// Number of logical bytes in the stream.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sequential in-memory byte source with a fixed look-ahead margin.
///
/// # Examples
///
/// ```rust
/// use json_bind::input::{InputSource, LookaheadBuffer};
///
/// let mut src = LookaheadBuffer::new(b"{}".to_vec());
/// assert_eq!(src.peek(), b'{');
/// src.advance();
/// assert_eq!(src.peek(), b'}');
/// src.advance();
/// assert!(src.at_end());
/// assert_eq!(src.peek(), 0);
/// ```
pub struct LookaheadBuffer {
    buf: Vec<u8>,
    len: usize,
    pos: usize,
}

impl LookaheadBuffer {
    /// Wraps `data`, appending [`AHEAD_SIZE`] NUL bytes as the margin.
    pub fn new(mut data: Vec<u8>) -> Self {
        let len = data.len();
        data.resize(len + AHEAD_SIZE, 0);
        LookaheadBuffer { buf: data, len, pos: 0 }
    }

    /// Reads a whole file sequentially into a buffer.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path).map_err(Error::io)?;
        Ok(Self::new(data))
    }
}

impl InputSource for LookaheadBuffer {
    #[inline]
    fn peek(&self) -> u8 {
        // pos never exceeds len, and len + AHEAD_SIZE bytes are allocated
        self.buf[self.pos]
    }

    #[inline]
    fn peek_ahead(&self, n: usize) -> u8 {
        debug_assert!(n < AHEAD_SIZE);
        self.buf[(self.pos + n).min(self.buf.len() - 1)]
    }

    #[inline]
    fn advance(&mut self) {
        if self.pos < self.len {
            self.pos += 1;
        }
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.pos >= self.len
    }

    #[inline]
    fn len(&self) -> usize {
        self.len
    }
}

/// Parallel chunked file source.
///
/// The file is divided into one contiguous range per rayon worker (never
/// smaller than a minimum chunk size). Each range is read through its own
/// file handle directly into its slice of a single pre-sized buffer; the
/// constructor blocks until every range completes. The assembled buffer then
/// behaves exactly like a [`LookaheadBuffer`].
pub struct ParallelFileSource {
    inner: LookaheadBuffer,
}

impl ParallelFileSource {
    /// Reads `path` with concurrent range reads and assembles the bytes in
    /// original order.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let len = std::fs::metadata(path).map_err(Error::io)?.len() as usize;
        let workers = rayon::current_num_threads().max(1);
        let chunk = ((len + workers - 1) / workers).max(MIN_CHUNK);

        let mut data = vec![0u8; len];
        data.par_chunks_mut(chunk)
            .enumerate()
            .try_for_each(|(index, range)| -> std::io::Result<()> {
                let mut file = File::open(path)?;
                file.seek(SeekFrom::Start((index * chunk) as u64))?;
                file.read_exact(range)
            })
            .map_err(Error::io)?;

        debug!(
            bytes = len,
            chunk_size = chunk,
            "assembled parallel file source"
        );
        Ok(ParallelFileSource {
            inner: LookaheadBuffer::new(data),
        })
    }
}

impl InputSource for ParallelFileSource {
    #[inline]
    fn peek(&self) -> u8 {
        self.inner.peek()
    }

    #[inline]
    fn peek_ahead(&self, n: usize) -> u8 {
        self.inner.peek_ahead(n)
    }

    #[inline]
    fn advance(&mut self) {
        self.inner.advance()
    }

    #[inline]
    fn at_end(&self) -> bool {
        self.inner.at_end()
    }

    #[inline]
    fn len(&self) -> usize {
        self.inner.len()
    }
}

/// Byte source chosen by the file-size policy.
pub enum FileSource {
    Sequential(LookaheadBuffer),
    Parallel(ParallelFileSource),
}

impl InputSource for FileSource {
    fn peek(&self) -> u8 {
        match self {
            FileSource::Sequential(s) => s.peek(),
            FileSource::Parallel(s) => s.peek(),
        }
    }

    fn peek_ahead(&self, n: usize) -> u8 {
        match self {
            FileSource::Sequential(s) => s.peek_ahead(n),
            FileSource::Parallel(s) => s.peek_ahead(n),
        }
    }

    fn advance(&mut self) {
        match self {
            FileSource::Sequential(s) => s.advance(),
            FileSource::Parallel(s) => s.advance(),
        }
    }

    fn at_end(&self) -> bool {
        match self {
            FileSource::Sequential(s) => s.at_end(),
            FileSource::Parallel(s) => s.at_end(),
        }
    }

    fn len(&self) -> usize {
        match self {
            FileSource::Sequential(s) => s.len(),
            FileSource::Parallel(s) => s.len(),
        }
    }
}

/// Opens `path` with the strategy the size policy selects.
pub fn read_file_auto(path: impl AsRef<Path>) -> Result<FileSource> {
    let path = path.as_ref();
    let size = std::fs::metadata(path).map_err(Error::io)?.len();
    if size >= PARALLEL_THRESHOLD {
        debug!(?path, size, "selecting parallel file source");
        Ok(FileSource::Parallel(ParallelFileSource::open(path)?))
    } else {
        debug!(?path, size, "selecting sequential file source");
        Ok(FileSource::Sequential(LookaheadBuffer::from_file(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn lookahead_pads_past_end() {
        let src = LookaheadBuffer::new(b"ab".to_vec());
        assert_eq!(src.len(), 2);
        assert_eq!(src.peek(), b'a');
        assert_eq!(src.peek_ahead(1), b'b');
        assert_eq!(src.peek_ahead(2), 0);
        assert_eq!(src.peek_ahead(7), 0);
    }

    #[test]
    fn advance_saturates_at_end() {
        let mut src = LookaheadBuffer::new(b"x".to_vec());
        src.advance();
        assert!(src.at_end());
        src.advance();
        assert!(src.at_end());
        assert_eq!(src.peek(), 0);
    }

    #[test]
    fn empty_buffer_is_immediately_at_end() {
        let src = LookaheadBuffer::new(Vec::new());
        assert!(src.at_end());
        assert!(src.is_empty());
        assert_eq!(src.peek(), 0);
    }

    #[test]
    fn parallel_and_sequential_reads_are_byte_identical() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let payload: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        file.write_all(&payload).unwrap();
        file.flush().unwrap();

        let mut seq = LookaheadBuffer::from_file(file.path()).unwrap();
        let mut par = ParallelFileSource::open(file.path()).unwrap();
        assert_eq!(seq.len(), par.len());
        while !seq.at_end() {
            assert_eq!(seq.peek(), par.peek());
            seq.advance();
            par.advance();
        }
        assert!(par.at_end());
    }

    #[test]
    fn auto_policy_selects_by_size() {
        let mut small = tempfile::NamedTempFile::new().unwrap();
        small.write_all(b"{}").unwrap();
        small.flush().unwrap();
        assert!(matches!(
            read_file_auto(small.path()).unwrap(),
            FileSource::Sequential(_)
        ));

        let mut big = tempfile::NamedTempFile::new().unwrap();
        big.write_all(&vec![b' '; PARALLEL_THRESHOLD as usize])
            .unwrap();
        big.flush().unwrap();
        assert!(matches!(
            read_file_auto(big.path()).unwrap(),
            FileSource::Parallel(_)
        ));
    }
}
