//! Plays the solver against many random secrets and reports how many
//! guesses it needed.
//!
//! # Usage
//!
//! ```sh
//! cargo run --release --example simulate
//! ```
//!
//! Simulate three-digit games only:
//!
//! ```sh
//! cargo run --release --example simulate -- --length 3 --games 5000
//! ```

use std::{collections::BTreeMap, process};

use clap::Parser;
use codebreak_core::{SequenceLength, score};
use codebreak_generator::{SecretGenerator, SecretSeed};
use codebreak_solver::{ConstraintSolver, Observation};
use rayon::prelude::*;

/// Games that run this long are counted as failures.
const GUESS_LIMIT: usize = 50;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Number of digits in each secret (2, 3 or 4).
    #[arg(short, long, default_value_t = 4)]
    length: u8,

    /// How many games to simulate.
    #[arg(short, long, default_value_t = 1000)]
    games: usize,

    /// Base seed as 64 hex characters. A random seed is used when omitted.
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
    if args.games == 0 {
        eprintln!("--games must be at least 1.");
        process::exit(1);
    }

    let base = args.seed.unwrap_or_else(SecretSeed::random);
    let solver = ConstraintSolver::new();

    let counts = (0..args.games)
        .into_par_iter()
        .map(|game| play(&solver, length, base.derive(&format!("game-{game}"))))
        .collect::<Vec<_>>();

    let mut distribution = BTreeMap::new();
    for count in &counts {
        *distribution.entry(*count).or_insert(0_usize) += 1;
    }
    let total: usize = counts.iter().sum();

    println!("Seed:");
    println!("  {base}");
    println!();
    println!("Guesses:");
    for (count, games) in &distribution {
        println!("  {count:>3}: {games}");
    }
    println!();
    #[expect(clippy::cast_precision_loss)]
    let average = total as f64 / counts.len() as f64;
    println!("Average: {average:.3}");
}

fn play(solver: &ConstraintSolver, length: SequenceLength, seed: SecretSeed) -> usize {
    let mut generator = SecretGenerator::with_seed(seed);
    let secret = generator.generate(length);
    let mut history = Vec::new();
    while history.len() < GUESS_LIMIT {
        let decision = solver.next_guess(length, &history, &mut generator);
        let feedback = score(&secret, &decision.guess).unwrap();
        history.push(Observation::new(decision.guess, feedback));
        if feedback.is_win(length) {
            break;
        }
    }
    history.len()
}
