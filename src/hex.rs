//! Lazy hex-to-byte decoding over any [`Read`] source.
//!
//! Two ASCII hex digits (either case) make one output byte, high nibble first. An odd
//! trailing digit is padded with a zero low nibble, so `"A"` decodes to `[0xA0]`.

use crate::error::InvalidHexDigit;
use byteorder::ReadBytesExt;
use std::io::{self, Read};

/// Wraps a source of ASCII hex digits and reads as the bytes they encode.
///
/// Nothing is buffered beyond the digit currently being combined, so the decoder can be
/// dropped (or unwrapped with [`HexDecoder::into_inner`]) at any point.
#[derive(Debug)]
pub struct HexDecoder<R> {
    inner: R,
    digits_read: u64,
}

/// Decode the hex digits produced by `reader`.
pub fn decode_hex<R: Read>(reader: R) -> HexDecoder<R> {
    HexDecoder::new(reader)
}

impl<R: Read> HexDecoder<R> {
    pub fn new(inner: R) -> Self {
        HexDecoder {
            inner,
            digits_read: 0,
        }
    }

    /// Number of hex digits consumed from the source so far.
    pub fn digits_read(&self) -> u64 {
        self.digits_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Next nibble, or `None` at end of input.
    fn next_nibble(&mut self) -> io::Result<Option<u8>> {
        let byte = match self.inner.read_u8() {
            Ok(b) => b,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(e),
        };
        let offset = self.digits_read;
        self.digits_read += 1;
        match (byte as char).to_digit(16) {
            Some(n) => Ok(Some(n as u8)),
            None => Err(InvalidHexDigit { byte, offset }.into()),
        }
    }

    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let Some(high) = self.next_nibble()? else {
            return Ok(None);
        };
        let low = self.next_nibble()?.unwrap_or(0);
        Ok(Some(high << 4 | low))
    }
}

impl<R: Read> Read for HexDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut n = 0;
        while n < buf.len() {
            match self.next_byte() {
                Ok(Some(b)) => {
                    buf[n] = b;
                    n += 1;
                }
                Ok(None) => break,
                // Invalid digits are fatal, so bytes already in `buf` are dropped with it.
                Err(e) => return Err(e),
            }
        }
        Ok(n)
    }
}
