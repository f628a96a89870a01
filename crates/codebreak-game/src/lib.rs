//! Match state machine for codebreak.
//!
//! A [`Match`] owns the authoritative [`MatchState`] of one game: the phase,
//! both secrets, both guess histories, the turn clock and the winner. All
//! changes go through its operations, which validate input with
//! [`codebreak_core`], score guesses, ask the [`codebreak_solver`] for the
//! computer's moves and archive finished matches as [`MatchRecord`]s.
//!
//! The crate performs no I/O. Persisting states and records, relaying moves
//! to an online peer and driving the clock are left to the caller.
//!
//! # Examples
//!
//! ```
//! use codebreak_core::SequenceLength;
//! use codebreak_game::{GuessOutcome, Match, MatchConfig, Phase, PlayerId};
//! use codebreak_generator::SecretSeed;
//!
//! let mut game = Match::new(
//!     MatchConfig::single_player(SequenceLength::Three),
//!     SecretSeed::random(),
//! );
//! game.submit_secret(PlayerId::One, "123")?;
//! assert_eq!(game.state().phase(), Phase::Turn(PlayerId::One));
//!
//! // Keep guessing until somebody wins.
//! loop {
//!     let outcome = match game.state().phase() {
//!         Phase::Turn(PlayerId::One) => game.submit_guess(PlayerId::One, "987")?,
//!         _ => game.play_cpu_turn()?,
//!     };
//!     if let GuessOutcome::Won { record, .. } = outcome {
//!         assert_eq!(Some(record.winner), game.state().winner());
//!         break;
//!     }
//! }
//! # Ok::<(), codebreak_game::GameError>(())
//! ```

pub use self::{config::*, game::*, phase::*, record::*, state::*};

mod config;
mod game;
mod phase;
mod record;
mod state;

use codebreak_core::{CoreError, ValidationError};
use derive_more::{Display, Error, From};

/// Reasons an operation on a [`Match`] was rejected.
///
/// A rejected operation never changes the match state.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error, From)]
pub enum GameError {
    /// The submitted secret or guess is malformed.
    #[display("invalid sequence: {_0}")]
    #[from]
    Validation(ValidationError),
    /// The operation is not allowed in the current phase.
    #[display("cannot {action} during {phase}")]
    IllegalTransition {
        /// The phase the match was in.
        phase: Phase,
        /// The rejected operation.
        action: Action,
    },
    /// The player's secret is already fixed for this match.
    #[display("{_0} has already set a secret")]
    SecretAlreadySet(#[error(not(source))] PlayerId),
    /// The player has not set a secret yet.
    #[display("{_0} has not set a secret")]
    SecretNotSet(#[error(not(source))] PlayerId),
    /// A guess could not be scored against the opponent's secret.
    #[display("cannot score guess: {_0}")]
    #[from]
    Scoring(CoreError),
    /// The computer was asked to move outside its turn.
    #[display("it is not the computer's turn")]
    NotCpuTurn,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected() -> Result<(), GameError> {
        Err(CoreError::UnsupportedLength(5))?;
        Ok(())
    }

    #[test]
    fn test_error_conversions() {
        let invalid = ValidationError::WrongLength {
            expected: 3,
            actual: 2,
        };
        assert_eq!(GameError::from(invalid), GameError::Validation(invalid));
        assert_eq!(
            rejected(),
            Err(GameError::Scoring(CoreError::UnsupportedLength(5)))
        );
    }
}
