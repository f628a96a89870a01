//! Match phases and the actions that drive them.

use derive_more::{Display, IsVariant};
use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// The current step of a match.
///
/// ```text
/// WaitingForOpponent (online only)
///         |
/// SettingSecret(P1) -> [Handoff] -> SettingSecret(P2) -> [Handoff]
///         |
/// Turn(P1) -> [Handoff] -> Turn(P2) -> [Handoff] -> Turn(P1) ...
///         |
/// GameOver
/// ```
///
/// Handoffs only occur in local two-player matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IsVariant, Serialize, Deserialize)]
pub enum Phase {
    /// Online lobby: the peer has not connected yet.
    #[display("waiting for opponent")]
    WaitingForOpponent,
    /// The given player must choose a secret.
    #[display("secret setting for {_0}")]
    SettingSecret(PlayerId),
    /// The device is being passed to the other player.
    #[display("handoff to {next}")]
    Handoff {
        /// The phase entered once the handoff completes.
        next: HandoffTarget,
    },
    /// The given player must guess.
    #[display("{_0}'s turn")]
    Turn(PlayerId),
    /// A player has cracked the opponent's secret.
    #[display("game over")]
    GameOver,
}

impl Phase {
    /// Returns the player whose guess is expected, if any.
    #[must_use]
    pub const fn mover(self) -> Option<PlayerId> {
        match self {
            Self::Turn(player) => Some(player),
            _ => None,
        }
    }
}

/// Where a [`Phase::Handoff`] leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IsVariant, Serialize, Deserialize)]
pub enum HandoffTarget {
    /// The next player sets a secret.
    #[display("{_0} (secret)")]
    SettingSecret(PlayerId),
    /// The next player guesses.
    #[display("{_0} (turn)")]
    Turn(PlayerId),
}

impl HandoffTarget {
    /// Returns the player receiving the device.
    #[must_use]
    pub const fn player(self) -> PlayerId {
        match self {
            Self::SettingSecret(player) | Self::Turn(player) => player,
        }
    }
}

impl From<HandoffTarget> for Phase {
    fn from(target: HandoffTarget) -> Self {
        match target {
            HandoffTarget::SettingSecret(player) => Self::SettingSecret(player),
            HandoffTarget::Turn(player) => Self::Turn(player),
        }
    }
}

/// Operations on a match, named in [`GameError::IllegalTransition`](crate::GameError::IllegalTransition).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Action {
    /// [`Match::opponent_joined`](crate::Match::opponent_joined).
    #[display("accept an opponent")]
    OpponentJoined,
    /// [`Match::submit_secret`](crate::Match::submit_secret).
    #[display("set a secret")]
    SubmitSecret,
    /// [`Match::submit_guess`](crate::Match::submit_guess).
    #[display("guess")]
    SubmitGuess,
    /// [`Match::complete_handoff`](crate::Match::complete_handoff).
    #[display("complete a handoff")]
    CompleteHandoff,
}
