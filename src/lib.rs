//! # bitsdecode — BITS transmission decoder
//!
//! Decodes hex-encoded BITS transmissions into a tree of packets and evaluates the
//! expression the tree describes.
//!
//! ## Pipeline
//!
//! ```text
//! hex text ─▶ HexDecoder ─▶ bytes ─▶ BitReader ─▶ Parser ─▶ Packet tree ─▶ eval
//! ```
//!
//! - [`hex`]: ASCII hex digits to bytes, lazily, over any `Read`
//! - [`bits`]: MSB-first reads of 1..=32 bits, and [`Window`]s bounding a nested read
//! - [`parser`]: the packet grammar (literals, two operator length encodings)
//! - [`eval`]: version sum and expression value
//! - [`dump`]: `Display` rendering of a tree
//!
//! ## Packet format
//!
//! Every packet starts with a 3-bit version and a 3-bit type id. Type id 4 is a literal:
//! 5-bit groups, each a continuation bit and a nibble. Any other type id is an operator
//! (`0` sum, `1` product, `2` min, `3` max, `5` greater-than, `6` less-than, `7` equal-to)
//! followed by a length-type bit: `0` gives the sub-packets' total length in 15 bits, `1`
//! gives their count in 11 bits.
//!
//! ## Usage
//!
//! ```
//! use bitsdecode::{bit_reader_over, decode_hex, evaluate, parse_packet, total_version_sum};
//!
//! let mut bits = bit_reader_over(decode_hex("9C0141080250320F1802104A08".as_bytes()));
//! let packet = parse_packet(&mut bits).unwrap();
//! assert_eq!(total_version_sum(&packet), 20);
//! assert_eq!(evaluate(&packet).unwrap(), 1);
//! ```

pub mod bits;
pub mod dump;
pub mod error;
pub mod eval;
pub mod hex;
pub mod packet;
pub mod parser;

pub use bits::{bit_reader_over, BitReader, Bits, ReadBits, Window};
pub use error::{BitsError, InvalidHexDigit, Result};
pub use eval::{evaluate, evaluate_with_limit, total_version_sum};
pub use hex::{decode_hex, HexDecoder};
pub use packet::{Arity, OperatorKind, Packet};
pub use parser::{parse_hex, parse_packet, Parser, ParserConfig};
