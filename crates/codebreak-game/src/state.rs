use codebreak_core::Sequence;
use serde::{Deserialize, Serialize};

use crate::{GuessRecord, MatchConfig, MatchId, Phase, PlayerId};

/// The authoritative state of one match.
///
/// Read-only outside this crate; every change goes through [`Match`](crate::Match).
/// Serializable so a match in progress can be saved and resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchState {
    id: MatchId,
    config: MatchConfig,
    phase: Phase,
    secrets: [Option<Sequence>; 2],
    histories: [Vec<GuessRecord>; 2],
    winner: Option<PlayerId>,
    time_remaining: u32,
}

impl MatchState {
    pub(crate) fn new(id: MatchId, config: MatchConfig, phase: Phase) -> Self {
        Self {
            id,
            config,
            phase,
            secrets: [None; 2],
            histories: [Vec::new(), Vec::new()],
            winner: None,
            time_remaining: config.time_limit.seconds(),
        }
    }

    /// Returns the match id.
    #[must_use]
    pub fn id(&self) -> MatchId {
        self.id
    }

    /// Returns the match configuration.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns `player`'s secret once it has been set.
    #[must_use]
    pub fn secret(&self, player: PlayerId) -> Option<&Sequence> {
        self.secrets[player.index()].as_ref()
    }

    /// Returns `player`'s guesses in submission order.
    #[must_use]
    pub fn history(&self, player: PlayerId) -> &[GuessRecord] {
        &self.histories[player.index()]
    }

    /// Returns the winner once the match is over.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// Returns the seconds left for the player to move.
    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    /// Returns the player whose guess is expected, if any.
    #[must_use]
    pub fn player_to_move(&self) -> Option<PlayerId> {
        self.phase.mover()
    }

    /// Returns the number of rounds started so far.
    #[must_use]
    pub fn rounds(&self) -> usize {
        self.histories
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or_default()
    }

    /// Returns the total number of guesses made by both players.
    #[must_use]
    pub fn total_guesses(&self) -> usize {
        self.histories.iter().map(Vec::len).sum()
    }

    /// Returns `true` once a winner has been decided.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// Returns the first player whose secret is still missing.
    #[must_use]
    pub fn first_missing_secret(&self) -> Option<PlayerId> {
        PlayerId::ALL
            .into_iter()
            .find(|player| self.secret(*player).is_none())
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_secret(&mut self, player: PlayerId, secret: Sequence) {
        debug_assert!(self.secrets[player.index()].is_none());
        self.secrets[player.index()] = Some(secret);
    }

    pub(crate) fn push_guess(&mut self, player: PlayerId, record: GuessRecord) {
        self.histories[player.index()].push(record);
    }

    pub(crate) fn set_winner(&mut self, winner: PlayerId) {
        debug_assert!(self.winner.is_none());
        self.winner = Some(winner);
    }

    pub(crate) fn reset_clock(&mut self) {
        self.time_remaining = self.config.time_limit.seconds();
    }

    pub(crate) fn tick_clock(&mut self) -> u32 {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.time_remaining
    }
}
