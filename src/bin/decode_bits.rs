//! Decode BITS transmissions and print their version sum and value.
//!
//! Usage:
//!   decode_bits [OPTIONS] [FILE ...]
//!   decode_bits < transmission.txt
//!
//! Each file holds one hex transmission; surrounding whitespace is trimmed.
//!
//! Options:
//!   --tree, -t        Also print the decoded packet tree
//!   --strict, -s      Reject operators with the wrong number of sub-packets while parsing
//!   --max-depth=N     Deepest packet nesting accepted (default 512)
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (e.g. `RUST_LOG=bitsdecode=trace`).
//! Exit code 1 if any transmission fails to decode.

use anyhow::Context;
use bitsdecode::dump::summary_line;
use bitsdecode::eval::evaluate_with_limit;
use bitsdecode::{total_version_sum, Parser, ParserConfig};
use std::io::{self, Read};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn take_flag(args: &mut Vec<String>, long: &str, short: &str) -> bool {
    match args.iter().position(|a| a == long || a == short) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

fn decode_one(name: &str, src: &str, parser: &Parser, tree: bool) -> bitsdecode::Result<()> {
    let packet = parser.parse_hex(src.trim())?;
    let version_sum = total_version_sum(&packet);
    let value = evaluate_with_limit(&packet, parser.config().max_depth);
    if tree {
        println!("{name}:\n{packet}");
    }
    println!("{name}: {}", summary_line(&packet, version_sum, &value));
    value.map(|_| ())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let tree = take_flag(&mut args, "--tree", "-t");
    let strict_arity = take_flag(&mut args, "--strict", "-s");
    let mut config = ParserConfig {
        strict_arity,
        ..ParserConfig::default()
    };
    if let Some(pos) = args.iter().position(|a| a.starts_with("--max-depth=")) {
        let arg = args.remove(pos);
        let depth = arg.trim_start_matches("--max-depth=");
        config.max_depth = depth
            .parse()
            .with_context(|| format!("invalid --max-depth value: {depth}"))?;
    }
    let parser = Parser::with_config(config);

    let mut has_error = false;
    if args.is_empty() {
        let mut src = String::new();
        io::stdin().read_to_string(&mut src)?;
        if let Err(e) = decode_one("<stdin>", &src, &parser, tree) {
            eprintln!("<stdin>: {e}");
            has_error = true;
        }
    } else {
        for path in &args {
            let path = Path::new(path);
            let src = match std::fs::read_to_string(path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("{}: {}", path.display(), e);
                    has_error = true;
                    continue;
                }
            };
            let name = path.display().to_string();
            if let Err(e) = decode_one(&name, &src, &parser, tree) {
                eprintln!("{name}: {e}");
                has_error = true;
            }
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
