//! Guess scoring.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Sequence, SequenceLength};

/// The two numbers reported for a guess.
///
/// `order` counts digits matching in both value and position; `on` counts
/// digits the guess shares with the secret regardless of position. The
/// invariant `order <= on <= n` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawFeedback")]
pub struct Feedback {
    on: u8,
    order: u8,
}

#[derive(Deserialize)]
struct RawFeedback {
    on: u8,
    order: u8,
}

impl TryFrom<RawFeedback> for Feedback {
    type Error = CoreError;

    fn try_from(RawFeedback { on, order }: RawFeedback) -> Result<Self, Self::Error> {
        let max = u8::from(SequenceLength::Four);
        if order > on || on > max {
            return Err(CoreError::InvalidFeedback { on, order });
        }
        Ok(Self { on, order })
    }
}

impl Feedback {
    /// Creates feedback from raw counts.
    ///
    /// # Panics
    ///
    /// Panics if `order > on`.
    #[must_use]
    pub fn new(on: u8, order: u8) -> Self {
        assert!(order <= on, "order ({order}) must not exceed on ({on})");
        Self { on, order }
    }

    /// Feedback for a guess identical to a secret of the given length.
    #[must_use]
    pub fn full(length: SequenceLength) -> Self {
        let n = u8::from(length);
        Self { on: n, order: n }
    }

    /// Number of shared digits, regardless of position.
    #[must_use]
    pub const fn on(self) -> u8 {
        self.on
    }

    /// Number of digits matching in value and position.
    #[must_use]
    pub const fn order(self) -> u8 {
        self.order
    }

    /// Returns `true` if this feedback ends the match.
    #[must_use]
    pub fn is_win(self, length: SequenceLength) -> bool {
        usize::from(self.order) == length.get()
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "on {} / order {}", self.on, self.order)
    }
}

/// Scores `guess` against `secret`.
///
/// The defender's secret must be the first argument: `on` is symmetric but
/// `order` is positional.
///
/// # Errors
///
/// Returns [`CoreError::LengthMismatch`] if the two sequences have different
/// lengths.
///
/// # Examples
///
/// ```
/// use codebreak_core::{Feedback, score};
///
/// let secret = "1234".parse()?;
/// let guess = "4321".parse()?;
/// assert_eq!(score(&secret, &guess)?, Feedback::new(4, 0));
/// # Ok::<(), codebreak_core::CoreError>(())
/// ```
pub fn score(secret: &Sequence, guess: &Sequence) -> Result<Feedback, CoreError> {
    if secret.length() != guess.length() {
        return Err(CoreError::LengthMismatch {
            secret: secret.length().get(),
            guess: guess.length().get(),
        });
    }

    let order = secret
        .digits()
        .iter()
        .zip(guess.digits())
        .filter(|(s, g)| s == g)
        .count();
    let on = secret.digit_set().intersection(guess.digit_set()).len();

    #[expect(clippy::cast_possible_truncation)]
    let feedback = Feedback {
        on: on as u8,
        order: order as u8,
    };
    Ok(feedback)
}
