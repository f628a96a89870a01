//! Benchmarks for guess scoring and validation.
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench score
//! ```

use std::hint;

use codebreak_core::{Sequence, SequenceLength, score};
use criterion::{Criterion, criterion_group, criterion_main};

fn bench_score(c: &mut Criterion) {
    let secret = Sequence::parse("4725", SequenceLength::Four).unwrap();
    let guess = Sequence::parse("2475", SequenceLength::Four).unwrap();
    c.bench_function("score_four", |b| {
        b.iter(|| score(hint::black_box(&secret), hint::black_box(&guess)));
    });
}

fn bench_validate(c: &mut Criterion) {
    c.bench_function("validate_four", |b| {
        b.iter(|| Sequence::parse(hint::black_box("9876"), SequenceLength::Four));
    });
}

criterion_group!(benches, bench_score, bench_validate);
criterion_main!(benches);
