//! Benchmarks for the constraint solver.
//!
//! Measures the opening-to-win cost of filtering the hypothesis space, which
//! dominates the CPU opponent's turn.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench solver
//! ```

use std::hint;

use codebreak_core::{Sequence, SequenceLength, score};
use codebreak_generator::{SecretGenerator, SecretSeed};
use codebreak_solver::{ConstraintSolver, HypothesisSpace, Observation};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

fn history_for(secret: Sequence, guesses: &[&str]) -> Vec<Observation> {
    guesses
        .iter()
        .map(|guess| {
            let guess: Sequence = guess.parse().unwrap();
            Observation::new(guess, score(&secret, &guess).unwrap())
        })
        .collect()
}

fn bench_space(c: &mut Criterion) {
    for length in SequenceLength::ALL {
        c.bench_with_input(BenchmarkId::new("space_new", length), &length, |b, &length| {
            b.iter(|| HypothesisSpace::new(hint::black_box(length)));
        });
    }
}

fn bench_next_guess(c: &mut Criterion) {
    let solver = ConstraintSolver::new();
    let secret: Sequence = "4725".parse().unwrap();
    let cases = [
        ("one_observation", vec!["0123"]),
        ("three_observations", vec!["0123", "4567", "2475"]),
    ];
    for (name, guesses) in cases {
        let history = history_for(secret, &guesses);
        let mut generator = SecretGenerator::with_seed(SecretSeed::from_bytes([42; 32]));
        c.bench_function(&format!("next_guess_four/{name}"), |b| {
            b.iter(|| {
                solver.next_guess(
                    SequenceLength::Four,
                    hint::black_box(&history),
                    &mut generator,
                )
            });
        });
    }
}

criterion_group!(benches, bench_space, bench_next_guess);
criterion_main!(benches);
