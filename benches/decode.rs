//! Benchmark: parse and evaluate synthetic transmissions. One wide packet (a sum over
//! 2047 literals, count-framed) and one deep packet (nested windows, length-framed).

use bitsdecode::{evaluate, parse_hex, total_version_sum};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn push_bits(out: &mut String, value: u64, width: u32) {
    for i in (0..width).rev() {
        out.push(if value >> i & 1 == 1 { '1' } else { '0' });
    }
}

fn literal(out: &mut String, version: u64, value: u64) {
    push_bits(out, version, 3);
    push_bits(out, 4, 3);
    let nibbles = (64 - value.leading_zeros()).max(1).div_ceil(4);
    for i in (0..nibbles).rev() {
        push_bits(out, u64::from(i > 0), 1);
        push_bits(out, value >> (i * 4) & 0xF, 4);
    }
}

fn to_hex(bits: &str) -> String {
    let mut padded = bits.to_string();
    while padded.len() % 8 != 0 {
        padded.push('0');
    }
    padded
        .as_bytes()
        .chunks(4)
        .map(|n| {
            let v = n.iter().fold(0u32, |acc, b| acc << 1 | u32::from(*b - b'0'));
            char::from_digit(v, 16).unwrap().to_ascii_uppercase()
        })
        .collect()
}

/// Sum over 2047 literals, children framed by count.
fn wide_transmission() -> String {
    let mut bits = String::new();
    push_bits(&mut bits, 7, 3);
    push_bits(&mut bits, 0, 3);
    push_bits(&mut bits, 1, 1);
    push_bits(&mut bits, 2047, 11);
    for i in 0..2047u64 {
        literal(&mut bits, i % 8, i * 0x1_0001);
    }
    to_hex(&bits)
}

/// Max of (literal, Max of (literal, ...)) nested 200 deep, each level framed by length.
fn deep_transmission() -> String {
    let mut inner = String::new();
    literal(&mut inner, 1, 42);
    for level in 0..200u64 {
        let mut outer = String::new();
        push_bits(&mut outer, level % 8, 3);
        push_bits(&mut outer, 3, 3);
        push_bits(&mut outer, 0, 1);
        let mut body = String::new();
        literal(&mut body, 2, level);
        body.push_str(&inner);
        push_bits(&mut outer, body.len() as u64, 15);
        outer.push_str(&body);
        inner = outer;
    }
    to_hex(&inner)
}

fn bench_decode(c: &mut Criterion) {
    let wide = wide_transmission();
    let deep = deep_transmission();
    eprintln!(
        "decode: wide {} hex digits, deep {} hex digits",
        wide.len(),
        deep.len()
    );

    c.bench_function("parse_wide", |b| {
        b.iter(|| parse_hex(black_box(&wide)).unwrap())
    });
    c.bench_function("parse_deep", |b| {
        b.iter(|| parse_hex(black_box(&deep)).unwrap())
    });

    let wide_packet = parse_hex(&wide).unwrap();
    let deep_packet = parse_hex(&deep).unwrap();
    c.bench_function("evaluate_wide", |b| {
        b.iter(|| evaluate(black_box(&wide_packet)).unwrap())
    });
    c.bench_function("evaluate_deep", |b| {
        b.iter(|| evaluate(black_box(&deep_packet)).unwrap())
    });
    c.bench_function("version_sum_wide", |b| {
        b.iter(|| total_version_sum(black_box(&wide_packet)))
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
