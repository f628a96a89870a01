//! Example demonstrating secret generation.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example generate_secret
//! ```
//!
//! Generate several four-digit secrets from a fixed seed:
//!
//! ```sh
//! cargo run --example generate_secret -- --length 4 --count 5 --seed <64 hex chars>
//! ```

use std::process;

use clap::Parser;
use codebreak_core::SequenceLength;
use codebreak_generator::{SecretGenerator, SecretSeed};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of digits in each secret (2, 3 or 4).
    #[arg(short, long, default_value_t = 4)]
    length: u8,

    /// How many secrets to draw.
    #[arg(short, long, default_value_t = 1)]
    count: usize,

    /// Seed as 64 hex characters. A random seed is used when omitted.
    #[arg(long, value_name = "HEX")]
    seed: Option<SecretSeed>,
}

fn main() {
    let args = Args::parse();
    let length = match SequenceLength::try_from(args.length) {
        Ok(length) => length,
        Err(err) => {
            eprintln!("{err}");
            process::exit(2);
        }
    };

    let mut generator = args
        .seed
        .map_or_else(SecretGenerator::new, SecretGenerator::with_seed);

    println!("Seed:");
    println!("  {}", generator.seed());
    println!();
    println!("Secrets:");
    for _ in 0..args.count {
        println!("  {}", generator.generate(length));
    }
}
