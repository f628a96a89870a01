use codebreak_core::{Feedback, Sequence};

/// A past guess and the feedback it received.
///
/// Implemented by every record type that carries this pair, so callers can
/// hand their own history to the solver without copying it.
pub trait ScoredGuess {
    /// The guessed sequence.
    fn guess(&self) -> &Sequence;
    /// The feedback the guess received against the hidden secret.
    fn feedback(&self) -> Feedback;
}

/// A plain guess/feedback pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// The guessed sequence.
    pub guess: Sequence,
    /// The feedback received.
    pub feedback: Feedback,
}

impl Observation {
    /// Creates a new observation.
    #[must_use]
    pub fn new(guess: Sequence, feedback: Feedback) -> Self {
        Self { guess, feedback }
    }
}

impl ScoredGuess for Observation {
    fn guess(&self) -> &Sequence {
        &self.guess
    }

    fn feedback(&self) -> Feedback {
        self.feedback
    }
}

impl<T: ScoredGuess + ?Sized> ScoredGuess for &T {
    fn guess(&self) -> &Sequence {
        (**self).guess()
    }

    fn feedback(&self) -> Feedback {
        (**self).feedback()
    }
}
