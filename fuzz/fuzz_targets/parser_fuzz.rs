//! Parser fuzz target: feed arbitrary bytes through hex decoding, parsing and evaluation.
//! Nothing may panic; malformed input must come back as an error.
//! Build with: cargo fuzz run parser_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    let mut bits = bitsdecode::bit_reader_over(bitsdecode::decode_hex(data));
    if let Ok(packet) = bitsdecode::parse_packet(&mut bits) {
        let _ = bitsdecode::total_version_sum(&packet);
        let _ = bitsdecode::evaluate(&packet);
        let _ = packet.to_string();
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parser_fuzz");
}
