//! Benchmarks for secret generation.
//!
//! Uses a fixed seed so runs are comparable.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench generator
//! ```

use std::{hint, str::FromStr as _};

use codebreak_core::SequenceLength;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use codebreak_generator::{SecretGenerator, SecretSeed};

const SEED: &str = "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1";

fn bench_generate(c: &mut Criterion) {
    let seed = SecretSeed::from_str(SEED).unwrap();
    for length in SequenceLength::ALL {
        let mut generator = SecretGenerator::with_seed(seed);
        c.bench_with_input(
            BenchmarkId::new("generate", length),
            &length,
            |b, &length| {
                b.iter(|| generator.generate(hint::black_box(length)));
            },
        );
    }
}

fn bench_derive(c: &mut Criterion) {
    let seed = SecretSeed::from_str(SEED).unwrap();
    c.bench_function("derive_seed", |b| {
        b.iter(|| hint::black_box(seed).derive("timeout-3"));
    });
}

criterion_group!(benches, bench_generate, bench_derive);
criterion_main!(benches);
