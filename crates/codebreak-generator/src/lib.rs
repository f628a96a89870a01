//! Random secret generation for codebreak matches.
//!
//! [`SecretGenerator`] draws repeat-free digit sequences by sampling without
//! replacement from 0-9. Every generator is driven by a [`SecretSeed`], so a
//! seed fully determines the stream of sequences it produces. Seeds can be
//! split into independent sub-streams with [`SecretSeed::derive`].
//!
//! # Examples
//!
//! ```
//! use codebreak_core::SequenceLength;
//! use codebreak_generator::{SecretGenerator, SecretSeed};
//!
//! let seed = SecretSeed::random();
//! let mut generator = SecretGenerator::with_seed(seed);
//! let secret = generator.generate(SequenceLength::Four);
//! assert_eq!(secret.digits().len(), 4);
//!
//! // The same seed replays the same secrets.
//! let mut replay = SecretGenerator::with_seed(seed);
//! assert_eq!(replay.generate(SequenceLength::Four), secret);
//! ```

use codebreak_core::{Digit, Sequence, SequenceLength};
use rand::{
    SeedableRng as _,
    seq::{IndexedRandom as _, SliceRandom as _},
};
use rand_pcg::Pcg64;

pub use self::seed::{SecretSeed, SecretSeedError};

mod seed;

/// How many redraws [`SecretGenerator::generate_excluding`] attempts before
/// accepting a collision with the excluded sequence.
const MAX_EXCLUDE_ATTEMPTS: usize = 8;

/// A generated secret together with the seed that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedSecret {
    /// The generated sequence.
    pub sequence: Sequence,
    /// The seed the sequence was drawn from.
    pub seed: SecretSeed,
}

/// A seeded source of uniformly random, repeat-free sequences.
#[derive(Debug, Clone)]
pub struct SecretGenerator {
    seed: SecretSeed,
    rng: Pcg64,
}

impl Default for SecretGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretGenerator {
    /// Creates a generator with a freshly drawn random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(SecretSeed::random())
    }

    /// Creates a generator whose output is fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: SecretSeed) -> Self {
        Self {
            seed,
            rng: Pcg64::from_seed(seed.into_bytes()),
        }
    }

    /// Returns the seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> SecretSeed {
        self.seed
    }

    /// Draws a sequence of `length` distinct digits.
    #[must_use]
    pub fn generate(&mut self, length: SequenceLength) -> Sequence {
        let mut digits = Digit::ALL;
        digits.shuffle(&mut self.rng);
        #[expect(clippy::missing_panics_doc)]
        let sequence =
            Sequence::from_digits(&digits[..length.get()]).expect("shuffled digits are distinct");
        sequence
    }

    /// Draws a sequence, avoiding `exclude` when possible.
    ///
    /// A collision is not an error, so after a bounded number of redraws the
    /// last draw is returned even if it equals `exclude`. With ten digits the
    /// chance of that is negligible.
    #[must_use]
    pub fn generate_excluding(&mut self, length: SequenceLength, exclude: &Sequence) -> Sequence {
        let mut candidate = self.generate(length);
        for _ in 1..MAX_EXCLUDE_ATTEMPTS {
            if candidate != *exclude {
                break;
            }
            candidate = self.generate(length);
        }
        candidate
    }

    /// Picks one element of `items` uniformly at random, or `None` if it is empty.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Draws a single sequence from a fresh generator seeded with `seed`.
    #[must_use]
    pub fn generate_with_seed(length: SequenceLength, seed: SecretSeed) -> GeneratedSecret {
        let sequence = Self::with_seed(seed).generate(length);
        GeneratedSecret { sequence, seed }
    }
}

/// Draws a random sequence of `length`, optionally avoiding `exclude`.
#[must_use]
pub fn generate(length: SequenceLength, exclude: Option<&Sequence>) -> Sequence {
    let mut generator = SecretGenerator::new();
    match exclude {
        Some(exclude) => generator.generate_excluding(length, exclude),
        None => generator.generate(length),
    }
}
