//! Human-readable rendering of a packet tree.
//!
//! Literals print as their value. An operator whose sub-packets are all literals fits on
//! one line (`Sum { 1, 2 }`); otherwise each sub-packet goes on its own line, indented two
//! spaces per level:
//!
//! ```text
//! Sum {
//!   Product { 2, 3 },
//!   7
//! }
//! ```

use crate::packet::{OperatorKind, Packet};
use std::fmt;

const INDENT: usize = 2;

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_packet(f, self, 0)
    }
}

fn write_packet(f: &mut fmt::Formatter<'_>, packet: &Packet, level: usize) -> fmt::Result {
    let (kind, children) = match packet {
        Packet::Literal { value, .. } => return write!(f, "{value}"),
        Packet::Operator { kind, children, .. } => (kind, children),
    };
    write!(f, "{kind} {{")?;
    if children.is_empty() {
        return f.write_str("}");
    }
    if children.iter().all(Packet::is_literal) {
        for (i, child) in children.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write_packet(f, child, level + 1)?;
        }
        return f.write_str(" }");
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "\n{:width$}", "", width = (level + 1) * INDENT)?;
        write_packet(f, child, level + 1)?;
    }
    write!(f, "\n{:width$}}}", "", width = level * INDENT)
}

/// One-line summary of a decoded transmission, as printed by the `decode_bits` tool.
pub fn summary_line(packet: &Packet, version_sum: u64, value: &crate::Result<u64>) -> String {
    let value = match value {
        Ok(v) => v.to_string(),
        Err(e) => format!("<{e}>"),
    };
    format!(
        "{} packet(s), version sum {version_sum}, value {value}",
        count_packets(packet)
    )
}

fn count_packets(packet: &Packet) -> usize {
    let mut count = 0;
    let mut stack = vec![packet];
    while let Some(p) = stack.pop() {
        count += 1;
        stack.extend(p.children());
    }
    count
}
