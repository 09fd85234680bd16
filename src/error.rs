//! Error type shared by the hex decoder, bit reader, parser and evaluator.

use crate::packet::OperatorKind;
use std::io;

/// A byte in the transmission that is not an ASCII hex digit.
///
/// Travels through [`std::io::Read`] as an [`io::ErrorKind::InvalidData`] payload and is
/// recovered into [`BitsError::Decode`] when it reaches the bit reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex digit {byte:#04x} at offset {offset}")]
pub struct InvalidHexDigit {
    pub byte: u8,
    pub offset: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum BitsError {
    #[error("Decode: {0}")]
    Decode(InvalidHexDigit),
    #[error("Unexpected end of input reading {field} at bit {bit_offset}")]
    UnexpectedEndOfInput { field: &'static str, bit_offset: u64 },
    #[error("Malformed length field (length type {length_type}) at bit {bit_offset}")]
    MalformedLengthField { length_type: u8, bit_offset: u64 },
    #[error("Invalid type id: {0}")]
    InvalidTypeId(u32),
    #[error("Invalid arity for {kind:?}: expected {expected}, got {actual} sub-packets")]
    InvalidOperatorArity {
        kind: OperatorKind,
        expected: &'static str,
        actual: usize,
    },
    #[error("Literal value overflows 64 bits at bit {bit_offset}")]
    LiteralOverflow { bit_offset: u64 },
    #[error("Arithmetic overflow evaluating {kind:?}")]
    ArithmeticOverflow { kind: OperatorKind },
    #[error("Packet nesting exceeds limit of {limit}")]
    NestingTooDeep { limit: usize },
    #[error("Invalid bit count: {0} (expected 1..=32)")]
    InvalidBitCount(u32),
    #[error("IO: {0}")]
    Io(io::Error),
}

impl From<io::Error> for BitsError {
    fn from(err: io::Error) -> Self {
        let digit = err
            .get_ref()
            .and_then(|inner| inner.downcast_ref::<InvalidHexDigit>())
            .copied();
        match digit {
            Some(digit) => BitsError::Decode(digit),
            None => BitsError::Io(err),
        }
    }
}

impl From<InvalidHexDigit> for io::Error {
    fn from(digit: InvalidHexDigit) -> Self {
        io::Error::new(io::ErrorKind::InvalidData, digit)
    }
}

pub type Result<T> = std::result::Result<T, BitsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_digit_survives_io_round_trip() {
        let digit = InvalidHexDigit { byte: b'g', offset: 3 };
        let err: io::Error = digit.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        match BitsError::from(err) {
            BitsError::Decode(d) => assert_eq!(d, digit),
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn plain_io_error_stays_io() {
        let err = io::Error::new(io::ErrorKind::BrokenPipe, "gone");
        assert!(matches!(BitsError::from(err), BitsError::Io(_)));
    }
}
