//! Recursive-descent parser turning a bit stream into a [`Packet`] tree.
//!
//! Grammar (all numbers MSB-first):
//!
//! ```text
//! packet   := version:3 type_id:3 body
//! body     := literal                       (type_id == 4)
//!           | length_type:1 children        (any other type_id)
//! literal  := (1 nibble:4)* (0 nibble:4)
//! children := total_bits:15 packet*         (length_type == 0, bounded by a window)
//!           | count:11 packet{count}        (length_type == 1)
//! ```
//!
//! Only the outermost packet is read; zero padding after it is left untouched.

use crate::bits::{bit_reader_over, ReadBits, Window};
use crate::error::{BitsError, Result};
use crate::hex::decode_hex;
use crate::packet::{OperatorKind, Packet, LITERAL_TYPE_ID};

pub const DEFAULT_MAX_DEPTH: usize = 512;

const VERSION_BITS: u32 = 3;
const TYPE_ID_BITS: u32 = 3;
const LITERAL_GROUP_BITS: u32 = 5;
const TOTAL_LENGTH_BITS: u32 = 15;
const CHILD_COUNT_BITS: u32 = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Deepest packet nesting accepted; the outermost packet is depth 1.
    pub max_depth: usize,
    /// Reject operators whose sub-packet count breaks their arity while parsing,
    /// instead of leaving that to the evaluator.
    pub strict_arity: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            strict_arity: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

/// Parse one packet with the default configuration.
pub fn parse_packet(bits: &mut dyn ReadBits) -> Result<Packet> {
    Parser::new().parse(bits)
}

/// Parse one packet from an in-memory hex transmission (already trimmed).
pub fn parse_hex(hex: &str) -> Result<Packet> {
    Parser::new().parse_hex(hex)
}

impl Parser {
    pub fn new() -> Self {
        Parser::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Parser { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse exactly one outermost packet from `bits`.
    pub fn parse(&self, bits: &mut dyn ReadBits) -> Result<Packet> {
        let start = bits.position();
        let version = read_field(bits, VERSION_BITS, "version")?;
        let packet = self.read_packet_body(bits, version, 1)?;
        tracing::debug!(
            version = packet.version(),
            type_id = packet.type_id(),
            bits = bits.position() - start,
            "parsed transmission"
        );
        Ok(packet)
    }

    pub fn parse_hex(&self, hex: &str) -> Result<Packet> {
        let mut bits = bit_reader_over(decode_hex(hex.as_bytes()));
        self.parse(&mut bits)
    }

    fn read_packet(&self, bits: &mut dyn ReadBits, depth: usize) -> Result<Packet> {
        let version = read_field(bits, VERSION_BITS, "version")?;
        self.read_packet_body(bits, version, depth)
    }

    /// Everything after the version field. Split out because window parsing reads the
    /// version itself to detect the end of the window.
    fn read_packet_body(&self, bits: &mut dyn ReadBits, version: u32, depth: usize) -> Result<Packet> {
        if depth > self.config.max_depth {
            return Err(BitsError::NestingTooDeep {
                limit: self.config.max_depth,
            });
        }
        // Both header fields are 3 bits wide.
        let version = version as u8;
        let type_id = read_field(bits, TYPE_ID_BITS, "type id")?;
        tracing::trace!(version, type_id, depth, at = bits.position(), "packet header");

        if type_id == u32::from(LITERAL_TYPE_ID) {
            let value = read_literal(bits)?;
            return Ok(Packet::Literal { version, value });
        }

        let kind = OperatorKind::try_from(type_id)?;
        let children = self.read_children(bits, depth)?;
        if self.config.strict_arity {
            kind.check_arity(children.len())?;
        }
        Ok(Packet::Operator {
            version,
            kind,
            children,
        })
    }

    fn read_children(&self, bits: &mut dyn ReadBits, depth: usize) -> Result<Vec<Packet>> {
        match read_field(bits, 1, "length type")? {
            0 => {
                let total = read_length(bits, TOTAL_LENGTH_BITS, 0)?;
                let mut window = Window::new(&mut *bits, total);
                // On error the window is dropped here, which still drains it.
                let children = self.read_until_exhausted(&mut window, depth)?;
                // The window already reads as empty, so this only releases it.
                window.close()?;
                Ok(children)
            }
            _ => {
                let count = read_length(bits, CHILD_COUNT_BITS, 1)?;
                let mut children = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    children.push(self.read_packet(bits, depth + 1)?);
                }
                Ok(children)
            }
        }
    }

    fn read_until_exhausted(&self, window: &mut Window<'_>, depth: usize) -> Result<Vec<Packet>> {
        let mut children = Vec::new();
        loop {
            let at = window.position();
            let version = window.fill_bits(VERSION_BITS)?;
            if version.is_empty() {
                return Ok(children);
            }
            if version.len < VERSION_BITS {
                return Err(BitsError::UnexpectedEndOfInput {
                    field: "version",
                    bit_offset: at,
                });
            }
            children.push(self.read_packet_body(window, version.value, depth + 1)?);
        }
    }
}

/// Read a field that must be present in full.
fn read_field(bits: &mut dyn ReadBits, count: u32, field: &'static str) -> Result<u32> {
    let at = bits.position();
    let read = bits.fill_bits(count)?;
    if read.len < count {
        return Err(BitsError::UnexpectedEndOfInput {
            field,
            bit_offset: at,
        });
    }
    Ok(read.value)
}

fn read_length(bits: &mut dyn ReadBits, count: u32, length_type: u8) -> Result<u32> {
    let at = bits.position();
    let read = bits.fill_bits(count)?;
    if read.len < count {
        return Err(BitsError::MalformedLengthField {
            length_type,
            bit_offset: at,
        });
    }
    Ok(read.value)
}

fn read_literal(bits: &mut dyn ReadBits) -> Result<u64> {
    let mut value: u64 = 0;
    loop {
        let at = bits.position();
        let group = read_field(bits, LITERAL_GROUP_BITS, "literal group")?;
        if value > u64::MAX >> 4 {
            return Err(BitsError::LiteralOverflow { bit_offset: at });
        }
        value = value << 4 | u64::from(group & 0xF);
        if group & 0x10 == 0 {
            return Ok(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_header_and_value() {
        // 110 100 10111 11110 00101 000
        let packet = parse_hex("D2FE28").unwrap();
        assert_eq!(packet, Packet::Literal { version: 6, value: 2021 });
    }

    #[test]
    fn trailing_padding_is_not_read() {
        let mut bits = bit_reader_over(decode_hex("D2FE28".as_bytes()));
        parse_packet(&mut bits).unwrap();
        assert_eq!(bits.position(), 21);
        assert!(!bits.is_exhausted());
    }

    #[test]
    fn length_type_zero_uses_window() {
        let packet = parse_hex("38006F45291200").unwrap();
        let Packet::Operator { version, kind, children } = packet else {
            panic!("expected operator");
        };
        assert_eq!(version, 1);
        assert_eq!(kind, OperatorKind::LessThan);
        let values: Vec<_> = children.iter().filter_map(Packet::literal_value).collect();
        assert_eq!(values, vec![10, 20]);
    }

    #[test]
    fn length_type_one_counts_children() {
        let packet = parse_hex("EE00D40C823060").unwrap();
        assert_eq!(packet.version(), 7);
        assert_eq!(packet.kind(), Some(OperatorKind::Max));
        let values: Vec<_> = packet.children().iter().filter_map(Packet::literal_value).collect();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn total_length_mode_ends_on_window_boundary() {
        // 22-bit header, then a 27-bit window holding both literals.
        let mut bits = bit_reader_over(decode_hex("38006F45291200".as_bytes()));
        parse_packet(&mut bits).unwrap();
        assert_eq!(bits.position(), 22 + 27);
    }

    #[test]
    fn parse_packet_accepts_a_window() {
        // A literal packet followed by padding, read through a 21-bit window.
        let mut bits = bit_reader_over(decode_hex("D2FE28".as_bytes()));
        let mut window = bits.take(21);
        let packet = parse_packet(&mut window).unwrap();
        assert_eq!(packet.literal_value(), Some(2021));
        assert_eq!(window.remaining(), 0);
    }

    #[test]
    fn default_config() {
        let config = ParserConfig::default();
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(DEFAULT_MAX_DEPTH, 512);
        assert!(!config.strict_arity);
    }

    #[test]
    fn depth_limit_applies() {
        let parser = Parser::with_config(ParserConfig {
            max_depth: 1,
            ..ParserConfig::default()
        });
        assert!(parser.parse_hex("D2FE28").is_ok());
        assert!(matches!(
            parser.parse_hex("EE00D40C823060"),
            Err(BitsError::NestingTooDeep { limit: 1 })
        ));
    }
}
