use codebreak_core::{Feedback, Sequence};
use codebreak_solver::ScoredGuess;
use serde::{Deserialize, Serialize};

use crate::{MatchConfig, MatchId, MatchState, Phase, PlayerId, Timestamp};

/// One guess in a player's history.
///
/// Records are appended in submission order and never modified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessRecord {
    /// The guessed sequence.
    pub guess: Sequence,
    /// Feedback computed against the opponent's secret.
    pub feedback: Feedback,
    /// When the guess was submitted.
    pub submitted_at: Timestamp,
}

impl ScoredGuess for GuessRecord {
    fn guess(&self) -> &Sequence {
        &self.guess
    }

    fn feedback(&self) -> Feedback {
        self.feedback
    }
}

/// Archived snapshot of a finished match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// The finished match.
    pub match_id: MatchId,
    /// The match configuration.
    pub config: MatchConfig,
    /// Both secrets, indexed by [`PlayerId::index`].
    pub secrets: [Sequence; 2],
    /// Both guess histories, indexed by [`PlayerId::index`].
    pub histories: [Vec<GuessRecord>; 2],
    /// The player who cracked the opponent's secret.
    pub winner: PlayerId,
    /// Number of rounds started; player one's guess opens each round.
    pub rounds: usize,
    /// When the match was archived.
    pub finished_at: Timestamp,
}

impl MatchRecord {
    /// Snapshots `state` if it has reached [`Phase::GameOver`].
    ///
    /// Returns `None` for a match that is still in progress.
    #[must_use]
    pub fn from_finished(state: &MatchState, finished_at: Timestamp) -> Option<Self> {
        if state.phase() != Phase::GameOver {
            return None;
        }
        let winner = state.winner()?;
        let secrets = [
            *state.secret(PlayerId::One)?,
            *state.secret(PlayerId::Two)?,
        ];
        Some(Self {
            match_id: state.id(),
            config: *state.config(),
            secrets,
            histories: PlayerId::ALL.map(|player| state.history(player).to_vec()),
            winner,
            rounds: state.rounds(),
            finished_at,
        })
    }

    /// Returns `player`'s secret.
    #[must_use]
    pub fn secret(&self, player: PlayerId) -> &Sequence {
        &self.secrets[player.index()]
    }

    /// Returns `player`'s guesses.
    #[must_use]
    pub fn history(&self, player: PlayerId) -> &[GuessRecord] {
        &self.histories[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use codebreak_core::SequenceLength;
    use codebreak_generator::SecretSeed;

    use super::*;
    use crate::{GuessOutcome, Match};

    #[test]
    fn test_unfinished_match_has_no_record() {
        let mut game = Match::new(
            MatchConfig::two_player_local(SequenceLength::Two),
            SecretSeed::from_bytes([0; 32]),
        );
        assert!(MatchRecord::from_finished(game.state(), Timestamp::now()).is_none());
        game.submit_secret(PlayerId::One, "01").unwrap();
        assert!(MatchRecord::from_finished(game.state(), Timestamp::now()).is_none());
    }

    #[test]
    fn test_record_round_trips_through_json() {
        let mut game = Match::new(
            MatchConfig::two_player_local(SequenceLength::Two),
            SecretSeed::from_bytes([0; 32]),
        );
        game.submit_secret(PlayerId::One, "01").unwrap();
        game.complete_handoff().unwrap();
        game.submit_secret(PlayerId::Two, "23").unwrap();
        game.complete_handoff().unwrap();
        let outcome = game
            .submit_guess_at(PlayerId::One, "23", Timestamp::from_millis(1_000))
            .unwrap();
        let GuessOutcome::Won { record, .. } = outcome else {
            panic!("expected a win");
        };
        assert_eq!(record.finished_at, Timestamp::from_millis(1_000));
        assert_eq!(record.rounds, 1);

        let json = serde_json::to_string(&record).unwrap();
        let decoded: MatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }
}
