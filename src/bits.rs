//! MSB-first bit reading over a byte stream, plus bounded windows.
//!
//! [`BitReader`] pulls bytes from any [`Read`] source on demand and keeps the unread tail of
//! the last byte between calls. [`Window`] limits a parent reader to exactly `n` bits and,
//! when released, skips whatever the caller left unread so the parent lands on the window
//! boundary.
//!
//! # End of stream
//!
//! Reads never fail just because the source ran dry:
//!
//! - no bit of the call was obtainable: [`ReadBits::read_bits`] returns `Ok(None)`;
//! - some bits were obtained: the partial value is returned.
//!
//! [`ReadBits::fill_bits`] exposes how many bits were actually obtained, for callers that
//! need to tell a complete field from a truncated one.
//!
//! # Example
//! ```
//! use bitsdecode::bits::{bit_reader_over, ReadBits};
//!
//! let mut reader = bit_reader_over(&[0b1011_0011u8][..]);
//! assert_eq!(reader.read_bits(3).unwrap(), Some(0b101));
//! {
//!     let mut window = reader.take(4);
//!     assert_eq!(window.read_bits(2).unwrap(), Some(0b10));
//! } // the two unread window bits are skipped here
//! assert_eq!(reader.position(), 7);
//! assert_eq!(reader.read_bits(8).unwrap(), Some(0b1));
//! assert_eq!(reader.read_bits(1).unwrap(), None);
//! ```

use crate::error::{BitsError, Result};
use byteorder::ReadBytesExt;
use std::io::{self, Read};

/// Largest width a single read may request.
pub const MAX_READ_BITS: u32 = 32;

/// Result of one read: the assembled value and how many bits went into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bits {
    pub value: u32,
    pub len: u32,
}

impl Bits {
    pub const EMPTY: Bits = Bits { value: 0, len: 0 };

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// A source of MSB-first bits.
///
/// Object safe, so nested windows can be stacked without growing the reader type.
pub trait ReadBits {
    /// Read up to `count` bits (1..=32), returning the value and the number of bits obtained.
    fn fill_bits(&mut self, count: u32) -> Result<Bits>;

    /// Absolute bit offset of the next read in the underlying stream.
    fn position(&self) -> u64;

    /// Read the next `count` bits; `None` when no bit at all could be read.
    fn read_bits(&mut self, count: u32) -> Result<Option<u32>> {
        let bits = self.fill_bits(count)?;
        Ok((!bits.is_empty()).then_some(bits.value))
    }

    /// Bound the next `count` bits of this reader.
    fn take(&mut self, count: u32) -> Window<'_>
    where
        Self: Sized,
    {
        Window::new(self, count)
    }
}

fn check_count(count: u32) -> Result<()> {
    if count == 0 || count > MAX_READ_BITS {
        return Err(BitsError::InvalidBitCount(count));
    }
    Ok(())
}

/// Reads bits MSB-first from a byte stream.
///
/// # Invariants
/// - `buffered` is the number of unread low bits of `buffer` (0..=8)
/// - once `exhausted` is set the source is never polled again
#[derive(Debug)]
pub struct BitReader<R> {
    inner: R,
    buffer: u8,
    buffered: u32,
    exhausted: bool,
    consumed: u64,
}

/// Serve bits from `reader`.
pub fn bit_reader_over<R: Read>(reader: R) -> BitReader<R> {
    BitReader::new(reader)
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R) -> Self {
        BitReader {
            inner,
            buffer: 0,
            buffered: 0,
            exhausted: false,
            consumed: 0,
        }
    }

    /// True once the underlying source has reported end of stream.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Release the source. Bits still buffered from a partially read byte are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Make sure at least one bit is buffered. Returns false at end of stream.
    fn refill(&mut self) -> Result<bool> {
        if self.buffered > 0 {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }
        match self.inner.read_u8() {
            Ok(b) => {
                self.buffer = b;
                self.buffered = 8;
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.exhausted = true;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<R: Read> ReadBits for BitReader<R> {
    fn fill_bits(&mut self, count: u32) -> Result<Bits> {
        check_count(count)?;
        let mut out = Bits::EMPTY;
        while out.len < count {
            if !self.refill()? {
                break;
            }
            let n = (count - out.len).min(self.buffered);
            let chunk = (u32::from(self.buffer) >> (self.buffered - n)) & ((1 << n) - 1);
            out.value = out.value << n | chunk;
            out.len += n;
            self.buffered -= n;
        }
        self.consumed += u64::from(out.len);
        Ok(out)
    }

    fn position(&self) -> u64 {
        self.consumed
    }
}

/// A view over the next `limit` bits of a parent reader.
///
/// Reads past the limit see end of stream. Dropping the window (or calling
/// [`Window::close`]) drains the unread remainder from the parent, so the parent always
/// advances by exactly `limit` bits unless its own source ends first.
pub struct Window<'a> {
    parent: &'a mut dyn ReadBits,
    limit: u32,
    consumed: u32,
}

impl<'a> Window<'a> {
    pub fn new(parent: &'a mut dyn ReadBits, limit: u32) -> Self {
        tracing::trace!(limit, at = parent.position(), "window opened");
        Window {
            parent,
            limit,
            consumed: 0,
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Bits read or drained through this window so far.
    pub fn consumed(&self) -> u32 {
        self.consumed
    }

    /// Bits left before the window reports end of stream.
    pub fn remaining(&self) -> u32 {
        self.limit - self.consumed
    }

    /// Release the window, reporting any error hit while draining it.
    pub fn close(mut self) -> Result<()> {
        self.drain()
    }

    fn drain(&mut self) -> Result<()> {
        while self.consumed < self.limit {
            let want = self.remaining().min(MAX_READ_BITS);
            match self.parent.fill_bits(want) {
                Ok(bits) if bits.len == want => self.consumed += want,
                // Parent source ended inside the window: nothing left to skip.
                Ok(_) => self.consumed = self.limit,
                Err(e) => {
                    self.consumed = self.limit;
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

impl ReadBits for Window<'_> {
    fn fill_bits(&mut self, count: u32) -> Result<Bits> {
        check_count(count)?;
        if self.consumed >= self.limit {
            return Ok(Bits::EMPTY);
        }
        let bits = self.parent.fill_bits(count.min(self.remaining()))?;
        self.consumed += bits.len;
        Ok(bits)
    }

    fn position(&self) -> u64 {
        self.parent.position()
    }
}

impl Drop for Window<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.drain() {
            tracing::debug!(%err, limit = self.limit, "window drain failed on release");
        }
        tracing::trace!(limit = self.limit, "window released");
    }
}

impl std::fmt::Debug for Window<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("limit", &self.limit)
            .field("consumed", &self.consumed)
            .finish()
    }
}
