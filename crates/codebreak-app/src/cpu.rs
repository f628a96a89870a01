//! Pacing for the computer opponent.

use std::time::{Duration, Instant};

use codebreak_game::{GameError, GuessOutcome, Match};

/// Schedules the computer's move a fixed delay after its turn begins.
///
/// The delay is cosmetic; the solver itself answers immediately.
#[derive(Debug, Clone)]
pub struct CpuOpponent {
    think_delay: Duration,
    due: Option<Instant>,
}

impl CpuOpponent {
    /// Creates an opponent that waits `think_delay` before each move.
    #[must_use]
    pub fn new(think_delay: Duration) -> Self {
        Self {
            think_delay,
            due: None,
        }
    }

    /// Returns `true` while a move is scheduled but not yet played.
    #[must_use]
    pub fn is_thinking(&self) -> bool {
        self.due.is_some()
    }

    /// Plays the computer's move once it is due.
    ///
    /// The first call that observes the computer's turn starts the delay.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Match::play_cpu_turn`].
    pub fn poll(&mut self, game: &mut Match, now: Instant) -> Result<Option<GuessOutcome>, GameError> {
        if !game.is_cpu_turn() {
            self.due = None;
            return Ok(None);
        }
        let due = *self.due.get_or_insert(now + self.think_delay);
        if now < due {
            return Ok(None);
        }
        self.due = None;
        game.play_cpu_turn().map(Some)
    }
}
