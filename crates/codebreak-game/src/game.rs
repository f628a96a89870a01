use codebreak_core::{Feedback, Sequence, score};
use codebreak_generator::{SecretGenerator, SecretSeed};
use codebreak_solver::ConstraintSolver;
use derive_more::IsVariant;

use crate::{
    Action, GameError, GameMode, GuessRecord, HandoffTarget, MatchConfig, MatchId, MatchRecord,
    MatchState, Phase, PlayerId, Timestamp,
};

/// Result of an accepted guess.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum GuessOutcome {
    /// The secret was not cracked; the turn passed to the opponent.
    Continue(Feedback),
    /// The secret was cracked and the match is over.
    Won {
        /// Feedback for the winning guess.
        feedback: Feedback,
        /// Archive of the finished match, ready to be persisted.
        record: MatchRecord,
    },
}

impl GuessOutcome {
    /// Returns the feedback for the guess.
    #[must_use]
    pub fn feedback(&self) -> Feedback {
        match self {
            Self::Continue(feedback) | Self::Won { feedback, .. } => *feedback,
        }
    }
}

/// Result of one clock tick.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum TickOutcome {
    /// No clock is running.
    Idle,
    /// The clock is running; seconds left for the player to move.
    Counting(u32),
    /// The player to move ran out of time and a random guess was submitted for them.
    TimedOut(GuessOutcome),
    /// The remote player to move ran out of time; their peer resolves the turn.
    AwaitingRemote,
}

/// A codebreak match.
///
/// Owns the [`MatchState`] and the randomness used by the computer opponent
/// and by timeouts. Every operation validates before it mutates, so a
/// rejected call leaves the state untouched.
///
/// All randomness is derived from the match seed, keyed by what it is used
/// for and how many guesses have been made, so a match replays identically
/// from the same seed and the same inputs.
///
/// # Examples
///
/// ```
/// use codebreak_core::SequenceLength;
/// use codebreak_game::{Match, MatchConfig, Phase, PlayerId};
/// use codebreak_generator::SecretSeed;
///
/// let config = MatchConfig::two_player_local(SequenceLength::Two);
/// let mut game = Match::new(config, SecretSeed::random());
///
/// game.submit_secret(PlayerId::One, "45")?;
/// game.complete_handoff()?;
/// game.submit_secret(PlayerId::Two, "19")?;
/// game.complete_handoff()?;
/// assert_eq!(game.state().phase(), Phase::Turn(PlayerId::One));
///
/// let outcome = game.submit_guess(PlayerId::One, "91")?;
/// assert_eq!((outcome.feedback().on(), outcome.feedback().order()), (2, 0));
/// # Ok::<(), codebreak_game::GameError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Match {
    state: MatchState,
    seed: SecretSeed,
    solver: ConstraintSolver,
}

impl Match {
    /// Starts a new match whose id is derived from `seed`.
    #[must_use]
    pub fn new(config: MatchConfig, seed: SecretSeed) -> Self {
        Self::with_id(config, MatchId::from_seed(&seed), seed)
    }

    /// Starts a new match with a known id, as when joining an online match.
    ///
    /// Single-player matches generate the computer's secret immediately.
    #[must_use]
    pub fn with_id(config: MatchConfig, id: MatchId, seed: SecretSeed) -> Self {
        let phase = match config.mode {
            GameMode::SinglePlayer | GameMode::TwoPlayerLocal => Phase::SettingSecret(PlayerId::One),
            GameMode::Online => Phase::WaitingForOpponent,
        };
        let mut state = MatchState::new(id, config, phase);
        if config.mode.is_single_player() {
            let mut generator = SecretGenerator::with_seed(seed.derive("cpu-secret"));
            state.set_secret(PlayerId::Two, generator.generate(config.length));
        }
        log::info!(
            "match {id} started: {}, {} digits, {} per turn",
            config.mode,
            config.length,
            config.time_limit
        );
        Self {
            state,
            seed,
            solver: ConstraintSolver::new(),
        }
    }

    /// Continues a previously saved match.
    #[must_use]
    pub fn resume(state: MatchState, seed: SecretSeed) -> Self {
        log::info!("match {} resumed in phase {}", state.id(), state.phase());
        Self {
            state,
            seed,
            solver: ConstraintSolver::new(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> &MatchState {
        &self.state
    }

    /// Returns the seed all randomness of this match is derived from.
    #[must_use]
    pub fn seed(&self) -> SecretSeed {
        self.seed
    }

    /// Records that the online peer has connected.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalTransition`] unless the match is in
    /// [`Phase::WaitingForOpponent`].
    pub fn opponent_joined(&mut self) -> Result<(), GameError> {
        self.expect_phase(Action::OpponentJoined, |phase| phase.is_waiting_for_opponent())?;
        let next = self.secret_setting_phase();
        self.transition(next);
        Ok(())
    }

    /// Sets `player`'s secret from user input.
    ///
    /// In online matches either player may set their secret first; otherwise
    /// only the player named by [`Phase::SettingSecret`] may.
    ///
    /// # Errors
    ///
    /// - [`GameError::IllegalTransition`] outside secret setting, or when it is
    ///   the other player's turn to set a secret.
    /// - [`GameError::SecretAlreadySet`] if `player` already has a secret.
    /// - [`GameError::Validation`] if `input` is not a valid sequence.
    pub fn submit_secret(&mut self, player: PlayerId, input: &str) -> Result<(), GameError> {
        let online = self.state.config().mode.is_online();
        self.expect_phase(Action::SubmitSecret, |phase| match phase {
            Phase::SettingSecret(expected) => online || expected == player,
            _ => false,
        })?;
        if self.state.secret(player).is_some() {
            return Err(GameError::SecretAlreadySet(player));
        }
        let secret = Sequence::parse(input, self.state.config().length)?;

        self.state.set_secret(player, secret);
        log::debug!("match {}: {player} set a secret", self.state.id());

        let next = match self.state.first_missing_secret() {
            None => {
                self.state.reset_clock();
                self.handoff_or(HandoffTarget::Turn(PlayerId::One))
            }
            Some(missing) if online => Phase::SettingSecret(missing),
            Some(missing) => self.handoff_or(HandoffTarget::SettingSecret(missing)),
        };
        self.transition(next);
        Ok(())
    }

    /// Submits a guess for `player`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// See [`Match::submit_guess_at`].
    pub fn submit_guess(&mut self, player: PlayerId, input: &str) -> Result<GuessOutcome, GameError> {
        self.submit_guess_at(player, input, Timestamp::now())
    }

    /// Submits a guess for `player` made at `submitted_at`.
    ///
    /// Used directly when replaying a remote peer's guess.
    ///
    /// # Errors
    ///
    /// - [`GameError::IllegalTransition`] unless the phase is `Turn(player)`.
    /// - [`GameError::Validation`] if `input` is not a valid sequence.
    /// - [`GameError::SecretNotSet`] if either secret is missing, or
    ///   [`GameError::Scoring`] if the secrets disagree with the configured
    ///   length. Neither happens with a state built by [`Match`].
    pub fn submit_guess_at(
        &mut self,
        player: PlayerId,
        input: &str,
        submitted_at: Timestamp,
    ) -> Result<GuessOutcome, GameError> {
        self.expect_phase(Action::SubmitGuess, |phase| phase == Phase::Turn(player))?;
        let guess = Sequence::parse(input, self.state.config().length)?;
        self.apply_guess(player, guess, submitted_at)
    }

    /// Leaves a [`Phase::Handoff`] for the phase it announced.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalTransition`] if no handoff is in progress.
    pub fn complete_handoff(&mut self) -> Result<(), GameError> {
        let Phase::Handoff { next } = self.state.phase() else {
            return Err(self.illegal(Action::CompleteHandoff));
        };
        self.transition(next.into());
        Ok(())
    }

    /// Plays the computer's turn in a single-player match.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NotCpuTurn`] unless this is a single-player match
    /// in `Turn(PlayerId::Two)`.
    pub fn play_cpu_turn(&mut self) -> Result<GuessOutcome, GameError> {
        self.play_cpu_turn_at(Timestamp::now())
    }

    /// Plays the computer's turn, stamping the guess with `submitted_at`.
    ///
    /// # Errors
    ///
    /// See [`Match::play_cpu_turn`].
    pub fn play_cpu_turn_at(&mut self, submitted_at: Timestamp) -> Result<GuessOutcome, GameError> {
        if !self.is_cpu_turn() {
            return Err(GameError::NotCpuTurn);
        }
        let history = self.state.history(PlayerId::Two);
        let mut generator = self.generator(&format!("cpu-{}", history.len()));
        let decision = self
            .solver
            .next_guess(self.state.config().length, history, &mut generator);
        log::debug!(
            "match {}: computer guesses {} ({:?} from {} candidates)",
            self.state.id(),
            decision.guess,
            decision.kind,
            decision.candidates
        );
        self.apply_guess(PlayerId::Two, decision.guess, submitted_at)
    }

    /// Returns `true` if the computer is expected to move.
    #[must_use]
    pub fn is_cpu_turn(&self) -> bool {
        self.state.config().mode.is_single_player()
            && self.state.phase() == Phase::Turn(PlayerId::Two)
    }

    /// Advances the turn clock by one second.
    ///
    /// The clock only runs during a turn and only once the match has its
    /// first guess; the opening guess is untimed. The computer's turn is
    /// untimed as well and reads as [`TickOutcome::Idle`]. When a locally controlled
    /// player runs out of time a random guess is submitted for them and
    /// scored like any other. A remote player's timeout is left to their own
    /// peer.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SecretNotSet`] or [`GameError::Scoring`] if a
    /// forced guess cannot be scored, which a state built by [`Match`] never
    /// allows.
    pub fn tick(&mut self) -> Result<TickOutcome, GameError> {
        self.tick_at(Timestamp::now())
    }

    /// Advances the turn clock, stamping a forced guess with `now`.
    ///
    /// # Errors
    ///
    /// See [`Match::tick`].
    pub fn tick_at(&mut self, now: Timestamp) -> Result<TickOutcome, GameError> {
        let Some(player) = self.state.player_to_move() else {
            return Ok(TickOutcome::Idle);
        };
        if self.state.total_guesses() == 0 || self.is_cpu_turn() {
            return Ok(TickOutcome::Idle);
        }

        let remaining = self.state.tick_clock();
        if remaining > 0 {
            return Ok(TickOutcome::Counting(remaining));
        }
        if !self.state.config().controls(player) {
            return Ok(TickOutcome::AwaitingRemote);
        }

        let mut generator = self.generator(&format!("timeout-{}", self.state.total_guesses()));
        let guess = generator.generate(self.state.config().length);
        log::info!(
            "match {}: {player} ran out of time, submitting {guess}",
            self.state.id()
        );
        let outcome = self.apply_guess(player, guess, now)?;
        Ok(TickOutcome::TimedOut(outcome))
    }

    /// Discards the current match and starts a rematch with the same configuration.
    ///
    /// The rematch gets the next id in the match's id chain and fresh randomness.
    pub fn restart(&mut self) {
        log::info!("match {} restarted", self.state.id());
        let config = *self.state.config();
        *self = Self::with_id(config, self.state.id().rematch(), self.seed.derive("rematch"));
    }

    fn apply_guess(
        &mut self,
        player: PlayerId,
        guess: Sequence,
        submitted_at: Timestamp,
    ) -> Result<GuessOutcome, GameError> {
        if self.state.secret(player).is_none() {
            return Err(GameError::SecretNotSet(player));
        }
        let secret = self
            .state
            .secret(player.other())
            .ok_or(GameError::SecretNotSet(player.other()))?;
        let feedback = score(secret, &guess)?;

        self.state.push_guess(
            player,
            GuessRecord {
                guess,
                feedback,
                submitted_at,
            },
        );
        log::debug!(
            "match {}: {player} guessed {guess} -> {feedback}",
            self.state.id()
        );

        if feedback.is_win(self.state.config().length) {
            self.state.set_winner(player);
            self.transition(Phase::GameOver);
            log::info!(
                "match {} won by {player} after {} rounds",
                self.state.id(),
                self.state.rounds()
            );
            let record = MatchRecord::from_finished(&self.state, submitted_at)
                .ok_or(GameError::SecretNotSet(player))?;
            return Ok(GuessOutcome::Won { feedback, record });
        }

        self.state.reset_clock();
        let next = self.handoff_or(HandoffTarget::Turn(player.other()));
        self.transition(next);
        Ok(GuessOutcome::Continue(feedback))
    }

    fn secret_setting_phase(&self) -> Phase {
        self.state
            .first_missing_secret()
            .map_or(Phase::Turn(PlayerId::One), Phase::SettingSecret)
    }

    fn handoff_or(&self, next: HandoffTarget) -> Phase {
        if self.state.config().mode.is_two_player_local() {
            Phase::Handoff { next }
        } else {
            next.into()
        }
    }

    fn transition(&mut self, next: Phase) {
        log::debug!(
            "match {}: {} -> {next}",
            self.state.id(),
            self.state.phase()
        );
        self.state.set_phase(next);
    }

    fn expect_phase(
        &self,
        action: Action,
        allowed: impl FnOnce(Phase) -> bool,
    ) -> Result<(), GameError> {
        if allowed(self.state.phase()) {
            Ok(())
        } else {
            Err(self.illegal(action))
        }
    }

    fn illegal(&self, action: Action) -> GameError {
        GameError::IllegalTransition {
            phase: self.state.phase(),
            action,
        }
    }

    fn generator(&self, label: &str) -> SecretGenerator {
        SecretGenerator::with_seed(self.seed.derive(label))
    }
}

#[cfg(test)]
mod tests {
    use codebreak_core::{SequenceLength, ValidationError};
    use codebreak_solver::ScoredGuess as _;
    use proptest::prelude::*;

    use super::*;
    use crate::{OnlineRole, TimeLimit};

    fn seed(byte: u8) -> SecretSeed {
        SecretSeed::from_bytes([byte; 32])
    }

    fn seq(s: &str) -> Sequence {
        s.parse().unwrap()
    }

    fn single_player_with_cpu_secret(length: SequenceLength, cpu_secret: &str) -> Match {
        let game = Match::new(MatchConfig::single_player(length), seed(1));
        let mut value = serde_json::to_value(game.state()).unwrap();
        value["secrets"][1] = serde_json::Value::from(cpu_secret);
        Match::resume(serde_json::from_value(value).unwrap(), seed(1))
    }

    fn local_in_turn(length: SequenceLength, secrets: [&str; 2]) -> Match {
        let mut game = Match::new(MatchConfig::two_player_local(length), seed(2));
        game.submit_secret(PlayerId::One, secrets[0]).unwrap();
        game.complete_handoff().unwrap();
        game.submit_secret(PlayerId::Two, secrets[1]).unwrap();
        game.complete_handoff().unwrap();
        game
    }

    #[test]
    fn test_single_player_scenario() {
        let mut game = single_player_with_cpu_secret(SequenceLength::Three, "123");
        assert_eq!(game.state().phase(), Phase::SettingSecret(PlayerId::One));

        game.submit_secret(PlayerId::One, "123").unwrap();
        assert_eq!(game.state().phase(), Phase::Turn(PlayerId::One));

        let outcome = game.submit_guess(PlayerId::One, "456").unwrap();
        assert_eq!(outcome, GuessOutcome::Continue(Feedback::new(0, 0)));
        assert!(game.is_cpu_turn());

        let outcome = game.play_cpu_turn().unwrap();
        assert_eq!(outcome.feedback(), Feedback::new(2, 0));
        let cpu_history = game.state().history(PlayerId::Two);
        assert_eq!(cpu_history[0].guess, seq("012"));
        assert_eq!(game.state().phase(), Phase::Turn(PlayerId::One));

        let outcome = game.submit_guess(PlayerId::One, "123").unwrap();
        let GuessOutcome::Won { feedback, record } = outcome else {
            panic!("expected a win, got {outcome:?}");
        };
        assert_eq!(feedback, Feedback::new(3, 3));
        assert_eq!(game.state().phase(), Phase::GameOver);
        assert_eq!(game.state().winner(), Some(PlayerId::One));
        assert_eq!(record.winner, PlayerId::One);
        assert_eq!(record.rounds, 2);
        assert_eq!(*record.secret(PlayerId::Two), seq("123"));
        assert_eq!(record.history(PlayerId::One).len(), 2);
    }

    #[test]
    fn test_cpu_guesses_stay_consistent_until_it_wins() {
        let mut game = Match::new(MatchConfig::single_player(SequenceLength::Four), seed(3));
        let cpu_secret = *game.state().secret(PlayerId::Two).unwrap();
        let decoy = if cpu_secret == seq("9876") { "9875" } else { "9876" };
        game.submit_secret(PlayerId::One, "4725").unwrap();

        for _ in 0..30 {
            game.submit_guess(PlayerId::One, decoy).unwrap();
            let outcome = game.play_cpu_turn().unwrap();
            let history = game.state().history(PlayerId::Two);
            let (latest, earlier) = history.split_last().unwrap();
            for record in earlier {
                assert_eq!(score(latest.guess(), record.guess()).unwrap(), record.feedback());
            }
            if outcome.is_won() {
                break;
            }
        }
        assert_eq!(game.state().winner(), Some(PlayerId::Two));
        assert_eq!(game.state().history(PlayerId::Two)[0].guess, seq("0123"));
    }

    #[test]
    fn test_same_seed_same_cpu() {
        let config = MatchConfig::single_player(SequenceLength::Four);
        let a = Match::new(config, seed(9));
        let b = Match::new(config, seed(9));
        assert_eq!(a.state(), b.state());
    }

    #[test]
    fn test_rejections_leave_state_unchanged() {
        let mut game = single_player_with_cpu_secret(SequenceLength::Four, "9876");
        let before = game.state().clone();

        assert_eq!(
            game.submit_secret(PlayerId::One, "1123"),
            Err(GameError::Validation(ValidationError::DuplicateDigit {
                digit: codebreak_core::Digit::D1
            }))
        );
        assert!(matches!(
            game.submit_secret(PlayerId::One, "12"),
            Err(GameError::Validation(ValidationError::WrongLength { .. }))
        ));
        assert!(matches!(
            game.submit_secret(PlayerId::One, "abcd"),
            Err(GameError::Validation(ValidationError::NonDigit { .. }))
        ));
        assert_eq!(
            game.submit_guess(PlayerId::One, "1234"),
            Err(GameError::IllegalTransition {
                phase: Phase::SettingSecret(PlayerId::One),
                action: Action::SubmitGuess,
            })
        );
        assert_eq!(game.play_cpu_turn(), Err(GameError::NotCpuTurn));
        assert_eq!(game.state(), &before);

        game.submit_secret(PlayerId::One, "1234").unwrap();
        let before = game.state().clone();
        assert_eq!(
            game.submit_secret(PlayerId::One, "5678"),
            Err(GameError::IllegalTransition {
                phase: Phase::Turn(PlayerId::One),
                action: Action::SubmitSecret,
            })
        );
        assert!(game.submit_guess(PlayerId::Two, "5678").is_err());
        assert!(game.submit_guess(PlayerId::One, "55").is_err());
        assert!(game.complete_handoff().is_err());
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_local_two_player_handoffs() {
        let mut game = Match::new(MatchConfig::two_player_local(SequenceLength::Two), seed(4));
        assert!(game.submit_secret(PlayerId::Two, "12").is_err());

        game.submit_secret(PlayerId::One, "45").unwrap();
        assert_eq!(
            game.state().phase(),
            Phase::Handoff {
                next: HandoffTarget::SettingSecret(PlayerId::Two)
            }
        );
        assert!(game.submit_secret(PlayerId::Two, "12").is_err());
        game.complete_handoff().unwrap();
        game.submit_secret(PlayerId::Two, "12").unwrap();
        assert_eq!(
            game.state().phase(),
            Phase::Handoff {
                next: HandoffTarget::Turn(PlayerId::One)
            }
        );
        game.complete_handoff().unwrap();

        let outcome = game.submit_guess(PlayerId::One, "21").unwrap();
        assert_eq!(outcome, GuessOutcome::Continue(Feedback::new(2, 0)));
        assert_eq!(
            game.state().phase(),
            Phase::Handoff {
                next: HandoffTarget::Turn(PlayerId::Two)
            }
        );
        assert_eq!(game.state().player_to_move(), None);
        game.complete_handoff().unwrap();

        let outcome = game.submit_guess(PlayerId::Two, "45").unwrap();
        assert!(outcome.is_won());
        assert_eq!(game.state().winner(), Some(PlayerId::Two));
        assert!(game.complete_handoff().is_err());
        assert!(game.submit_guess(PlayerId::One, "12").is_err());
        assert_eq!(game.state().winner(), Some(PlayerId::Two));
    }

    #[test]
    fn test_online_secrets_in_any_order() {
        let config = MatchConfig::online(SequenceLength::Three, OnlineRole::Guest);
        let mut game = Match::new(config, seed(5));
        assert_eq!(game.state().phase(), Phase::WaitingForOpponent);
        assert!(game.submit_secret(PlayerId::Two, "123").is_err());

        game.opponent_joined().unwrap();
        assert_eq!(game.state().phase(), Phase::SettingSecret(PlayerId::One));
        assert!(game.opponent_joined().is_err());

        game.submit_secret(PlayerId::Two, "123").unwrap();
        assert_eq!(game.state().phase(), Phase::SettingSecret(PlayerId::One));
        assert_eq!(
            game.submit_secret(PlayerId::Two, "456"),
            Err(GameError::SecretAlreadySet(PlayerId::Two))
        );

        game.submit_secret(PlayerId::One, "789").unwrap();
        assert_eq!(game.state().phase(), Phase::Turn(PlayerId::One));
    }

    #[test]
    fn test_opening_turn_is_untimed() {
        let mut game = local_in_turn(SequenceLength::Two, ["45", "12"]);
        for _ in 0..100 {
            assert_eq!(game.tick().unwrap(), TickOutcome::Idle);
        }
        assert_eq!(game.state().time_remaining(), 60);
    }

    #[test]
    fn test_timeout_submits_random_guess() {
        let forced = SecretGenerator::with_seed(seed(1).derive("timeout-2")).generate(SequenceLength::Two);
        let cpu_secret = if forced == seq("01") { "23" } else { "01" };
        let mut game = single_player_with_cpu_secret(SequenceLength::Two, cpu_secret);

        game.submit_secret(PlayerId::One, "98").unwrap();
        game.submit_guess(PlayerId::One, "97").unwrap();
        assert!(game.play_cpu_turn().unwrap().is_continue());
        assert_eq!(game.state().phase(), Phase::Turn(PlayerId::One));

        for expected in (1..60).rev() {
            assert_eq!(game.tick_at(Timestamp::from_millis(7)).unwrap(), TickOutcome::Counting(expected));
        }
        let TickOutcome::TimedOut(outcome) = game.tick_at(Timestamp::from_millis(7)).unwrap() else {
            panic!("expected a timeout");
        };
        assert!(outcome.is_continue());
        let record = game.state().history(PlayerId::One)[1];
        assert_eq!(record.guess, forced);
        assert_eq!(record.submitted_at, Timestamp::from_millis(7));
        assert!(game.is_cpu_turn());
        assert_eq!(game.state().time_remaining(), 60);
    }

    #[test]
    fn test_cpu_turn_is_untimed() {
        let mut game = single_player_with_cpu_secret(SequenceLength::Three, "123");
        game.submit_secret(PlayerId::One, "456").unwrap();
        game.submit_guess(PlayerId::One, "789").unwrap();
        assert!(game.is_cpu_turn());

        for _ in 0..100 {
            assert_eq!(game.tick().unwrap(), TickOutcome::Idle);
        }
        assert!(game.state().history(PlayerId::Two).is_empty());

        game.play_cpu_turn().unwrap();
        assert_eq!(game.state().history(PlayerId::Two)[0].guess, seq("012"));
    }

    #[test]
    fn test_clock_resets_on_every_turn() {
        let mut game = local_in_turn(SequenceLength::Three, ["123", "456"]);
        game.submit_guess(PlayerId::One, "789").unwrap();
        assert_eq!(game.tick().unwrap(), TickOutcome::Idle);
        game.complete_handoff().unwrap();
        assert_eq!(game.tick().unwrap(), TickOutcome::Counting(59));
        assert_eq!(game.tick().unwrap(), TickOutcome::Counting(58));
        game.submit_guess(PlayerId::Two, "789").unwrap();
        game.complete_handoff().unwrap();
        assert_eq!(game.tick().unwrap(), TickOutcome::Counting(59));
    }

    #[test]
    fn test_remote_timeout_is_left_to_peer() {
        let config = MatchConfig::online(SequenceLength::Two, OnlineRole::Host)
            .with_time_limit(TimeLimit::Seconds30);
        let mut game = Match::new(config, seed(8));
        game.opponent_joined().unwrap();
        game.submit_secret(PlayerId::One, "12").unwrap();
        game.submit_secret(PlayerId::Two, "34").unwrap();
        game.submit_guess(PlayerId::One, "56").unwrap();

        for _ in 1..30 {
            assert!(game.tick().unwrap().is_counting());
        }
        assert_eq!(game.tick().unwrap(), TickOutcome::AwaitingRemote);
        assert_eq!(game.tick().unwrap(), TickOutcome::AwaitingRemote);
        assert!(game.state().history(PlayerId::Two).is_empty());

        game.submit_guess_at(PlayerId::Two, "78", Timestamp::from_millis(42))
            .unwrap();
        assert_eq!(game.state().phase(), Phase::Turn(PlayerId::One));
        assert_eq!(game.state().time_remaining(), 30);
    }

    #[test]
    fn test_restart_keeps_config() {
        let config = MatchConfig::single_player(SequenceLength::Three);
        let mut game = Match::new(config, seed(10));
        let first_id = game.state().id();
        game.submit_secret(PlayerId::One, "123").unwrap();
        game.submit_guess(PlayerId::One, "456").unwrap();

        game.restart();
        assert_eq!(game.state().config(), &config);
        assert_eq!(game.state().id(), first_id.rematch());
        assert_eq!(game.state().phase(), Phase::SettingSecret(PlayerId::One));
        assert!(game.state().secret(PlayerId::One).is_none());
        assert!(game.state().secret(PlayerId::Two).is_some());
        assert_eq!(game.state().total_guesses(), 0);
    }

    #[test]
    fn test_resume_from_serialized_state() {
        let mut game = local_in_turn(SequenceLength::Four, ["1234", "5678"]);
        game.submit_guess(PlayerId::One, "8765").unwrap();
        let json = serde_json::to_string(game.state()).unwrap();

        let mut resumed = Match::resume(serde_json::from_str(&json).unwrap(), seed(11));
        assert_eq!(resumed.state(), game.state());
        resumed.complete_handoff().unwrap();
        let outcome = resumed.submit_guess(PlayerId::Two, "1234").unwrap();
        assert!(outcome.is_won());
    }

    proptest! {
        #[test]
        fn test_rejected_input_never_mutates(
            input in "[0-9a-c]{0,5}",
            second in any::<bool>(),
        ) {
            let player = if second { PlayerId::Two } else { PlayerId::One };
            let mut game = local_in_turn(SequenceLength::Three, ["123", "456"]);
            let before = game.state().clone();

            prop_assert!(game.submit_secret(player, &input).is_err());
            prop_assert_eq!(game.state(), &before);

            if game.submit_guess(player, &input).is_err() {
                prop_assert_eq!(game.state(), &before);
            } else {
                prop_assert_eq!(player, PlayerId::One);
                prop_assert_eq!(game.state().history(PlayerId::One).len(), 1);
            }
        }
    }
}
