use codebreak_core::{Digit, DigitSet, Sequence, SequenceLength, score};

use crate::ScoredGuess;

/// The set of secrets still consistent with the observed feedback.
///
/// A fresh space holds every repeat-free sequence of the given length in
/// lexicographic order; filtering keeps that order.
///
/// # Examples
///
/// ```
/// use codebreak_core::{Feedback, SequenceLength};
/// use codebreak_solver::{HypothesisSpace, Observation};
///
/// let space = HypothesisSpace::new(SequenceLength::Two);
/// assert_eq!(space.len(), 90);
///
/// let observation = Observation::new("01".parse()?, Feedback::new(2, 0));
/// let space = space.consistent_with(&[observation]);
/// assert_eq!(space.len(), 1);
/// assert_eq!(space.candidates()[0].to_string(), "10");
/// # Ok::<(), codebreak_core::CoreError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypothesisSpace {
    length: SequenceLength,
    candidates: Vec<Sequence>,
}

impl HypothesisSpace {
    /// Enumerates all sequences of `length`.
    #[must_use]
    pub fn new(length: SequenceLength) -> Self {
        let mut candidates = Vec::with_capacity(length.hypothesis_count());
        let mut prefix = Vec::with_capacity(length.get());
        enumerate(length.get(), &mut prefix, DigitSet::new(), &mut candidates);
        Self { length, candidates }
    }

    /// Returns the sequence length of every candidate.
    #[must_use]
    pub fn length(&self) -> SequenceLength {
        self.length
    }

    /// Returns the remaining candidates.
    #[must_use]
    pub fn candidates(&self) -> &[Sequence] {
        &self.candidates
    }

    /// Returns the number of remaining candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Returns `true` if no candidate survives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Returns the subset consistent with every observation.
    ///
    /// A candidate `p` survives when `score(p, guess) == feedback` for every
    /// observation. Observations of a different length eliminate everything.
    #[must_use]
    pub fn consistent_with<G: ScoredGuess>(&self, observations: &[G]) -> Self {
        let mut filtered = self.clone();
        for observation in observations {
            filtered.retain_consistent(observation);
        }
        filtered
    }

    /// Removes every candidate contradicted by `observation`.
    pub fn retain_consistent<G: ScoredGuess + ?Sized>(&mut self, observation: &G) {
        let guess = observation.guess();
        let feedback = observation.feedback();
        self.candidates
            .retain(|candidate| score(candidate, guess).is_ok_and(|f| f == feedback));
    }
}

fn enumerate(length: usize, prefix: &mut Vec<Digit>, used: DigitSet, out: &mut Vec<Sequence>) {
    if prefix.len() == length {
        if let Ok(sequence) = Sequence::from_digits(prefix) {
            out.push(sequence);
        }
        return;
    }
    for digit in DigitSet::FULL.difference(used) {
        prefix.push(digit);
        let mut used = used;
        used.insert(digit);
        enumerate(length, prefix, used, out);
        prefix.pop();
    }
}
