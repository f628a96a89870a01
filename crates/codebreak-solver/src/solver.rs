use codebreak_core::{Sequence, SequenceLength};
use codebreak_generator::SecretGenerator;
use derive_more::IsVariant;

use crate::{HypothesisSpace, ScoredGuess};

/// Returns the fixed opening guess for `length`: the ascending digits `0..n`.
///
/// # Examples
///
/// ```
/// use codebreak_core::SequenceLength;
/// use codebreak_solver::opening_guess;
///
/// assert_eq!(opening_guess(SequenceLength::Three).to_string(), "012");
/// ```
#[must_use]
pub fn opening_guess(length: SequenceLength) -> Sequence {
    Sequence::ascending(length)
}

/// How the solver arrived at a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum DecisionKind {
    /// No feedback yet; the fixed opening guess was used.
    Opening,
    /// Drawn uniformly from the consistent candidates.
    Candidate,
    /// No candidate survived the history; a random sequence was drawn.
    Fallback,
}

/// The solver's next guess together with how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverDecision {
    /// The sequence to guess.
    pub guess: Sequence,
    /// Number of consistent candidates the guess was drawn from.
    ///
    /// For [`DecisionKind::Opening`] this is the size of the full space.
    pub candidates: usize,
    /// How the guess was chosen.
    pub kind: DecisionKind,
}

/// A constraint solver that only ever guesses consistent sequences.
///
/// Every guess after the opening is drawn uniformly from the hypothesis
/// space filtered by the full history. The history is re-applied from
/// scratch on each call, so the solver keeps no state between guesses and
/// is safe to share.
///
/// # Examples
///
/// ```
/// use codebreak_core::{Feedback, SequenceLength};
/// use codebreak_generator::SecretGenerator;
/// use codebreak_solver::{ConstraintSolver, DecisionKind, Observation};
///
/// let solver = ConstraintSolver::new();
/// let mut generator = SecretGenerator::new();
///
/// let history = [Observation::new("01".parse()?, Feedback::new(2, 0))];
/// let decision = solver.next_guess(SequenceLength::Two, &history, &mut generator);
/// assert_eq!(decision.guess.to_string(), "10");
/// assert_eq!(decision.kind, DecisionKind::Candidate);
/// assert_eq!(decision.candidates, 1);
/// # Ok::<(), codebreak_core::CoreError>(())
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct ConstraintSolver {}

impl ConstraintSolver {
    /// Creates a new solver.
    #[must_use]
    pub fn new() -> Self {
        Self {}
    }

    /// Returns the candidates consistent with `history`.
    #[must_use]
    pub fn candidates<G: ScoredGuess>(&self, length: SequenceLength, history: &[G]) -> HypothesisSpace {
        HypothesisSpace::new(length).consistent_with(history)
    }

    /// Chooses the next guess given every observation made so far.
    ///
    /// With an empty history this is [`opening_guess`]. Otherwise a
    /// consistent candidate is drawn with `generator`. If the history is
    /// contradictory (which cannot happen when every feedback was computed
    /// against one fixed secret) a random sequence is returned instead.
    #[must_use]
    pub fn next_guess<G: ScoredGuess>(
        &self,
        length: SequenceLength,
        history: &[G],
        generator: &mut SecretGenerator,
    ) -> SolverDecision {
        if history.is_empty() {
            return SolverDecision {
                guess: opening_guess(length),
                candidates: length.hypothesis_count(),
                kind: DecisionKind::Opening,
            };
        }

        let space = self.candidates(length, history);
        if let Some(guess) = generator.pick(space.candidates()) {
            log::debug!(
                "picked {guess} from {} candidates after {} guesses",
                space.len(),
                history.len()
            );
            return SolverDecision {
                guess: *guess,
                candidates: space.len(),
                kind: DecisionKind::Candidate,
            };
        }

        log::warn!(
            "no candidate is consistent with {} observations; guessing at random",
            history.len()
        );
        SolverDecision {
            guess: generator.generate(length),
            candidates: 0,
            kind: DecisionKind::Fallback,
        }
    }
}
