//! Core data structures for codebreak matches.
//!
//! This crate provides the value types shared by every other codebreak crate:
//! validated digit sequences, the feedback computed for a guess, and the pure
//! scoring function that produces it.
//!
//! # Overview
//!
//! 1. **Digits** - [`Digit`] is a type-safe digit 0-9 and [`DigitSet`] a compact
//!    set of digits.
//! 2. **Sequences** - [`SequenceLength`] is the match arity (2, 3 or 4) and
//!    [`Sequence`] a repeat-free, validated list of digits of that length.
//! 3. **Scoring** - [`score`] compares a guess against a secret and returns a
//!    [`Feedback`] (`on`, `order`).
//!
//! # Examples
//!
//! ```
//! use codebreak_core::{Sequence, SequenceLength, score};
//!
//! let secret = Sequence::parse("4725", SequenceLength::Four)?;
//! let guess = Sequence::parse("2475", SequenceLength::Four)?;
//!
//! let feedback = score(&secret, &guess)?;
//! assert_eq!((feedback.on(), feedback.order()), (4, 1));
//! assert!(!feedback.is_win(SequenceLength::Four));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod digit;
pub mod digit_set;
pub mod feedback;
pub mod sequence;

pub use self::{
    digit::Digit,
    digit_set::DigitSet,
    feedback::{Feedback, score},
    sequence::{Sequence, SequenceLength, ValidationError, validate},
};

/// Errors raised by core operations that are not plain input validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CoreError {
    /// A sequence did not pass validation.
    #[display("invalid sequence: {_0}")]
    #[from]
    Validation(ValidationError),
    /// The requested sequence length is not one of 2, 3 or 4.
    #[display("unsupported sequence length: {_0}")]
    UnsupportedLength(#[error(not(source))] usize),
    /// Secret and guess were scored against each other with different lengths.
    #[display("cannot score a guess of length {guess} against a secret of length {secret}")]
    LengthMismatch {
        /// Length of the secret.
        secret: usize,
        /// Length of the guess.
        guess: usize,
    },
    /// Stored feedback counts that no guess can produce.
    #[display("impossible feedback: on {on} / order {order}")]
    InvalidFeedback {
        /// The stored `on` count.
        on: u8,
        /// The stored `order` count.
        order: u8,
    },
}
