//! The surface the front end drives.
//!
//! A [`Session`] runs at most one match at a time. It forwards player input
//! to the [`Match`], relays local moves to the online peer and applies the
//! peer's moves, paces the computer opponent, feeds the turn clock, saves
//! the match after every accepted change and archives it once it is won.
//! Persistence and transport failures are logged and never interrupt play.

use std::time::Instant;

use codebreak_core::{Feedback, Sequence};
use codebreak_game::{
    GameError, GameMode, GuessOutcome, Match, MatchConfig, MatchId, MatchRecord, MatchState,
    Phase, PlayerId, TickOutcome,
};
use codebreak_generator::SecretSeed;
use derive_more::{Display, Error, From, IsVariant};

use crate::{
    clock::TurnClock,
    cpu::CpuOpponent,
    persistence::{SessionStore, Storage},
    relay::{Envelope, OnlineSync, RelayMessage, SyncError, SyncStatus, Transport},
    settings::Settings,
};

/// Reasons a session operation was rejected.
#[derive(Debug, Display, Error, From)]
pub enum SessionError {
    /// No match has been started or resumed.
    #[display("no match in progress")]
    NoActiveMatch,
    /// The match rejected the operation.
    #[display("{_0}")]
    #[from]
    Game(GameError),
    /// Online play was requested without a relay.
    #[display("online play needs a relay")]
    NoTransport,
    /// The player is not controlled from this session.
    #[display("{_0} is not played from this session")]
    NotLocalPlayer(#[error(not(source))] PlayerId),
    /// The relay protocol failed.
    #[display("{_0}")]
    #[from]
    Sync(SyncError),
}

/// Something that happened while the session advanced on its own.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant)]
pub enum SessionEvent {
    /// The online peer entered the match.
    OpponentJoined,
    /// The online peer set their secret.
    OpponentSecretSet,
    /// The online peer guessed.
    OpponentGuessed {
        /// The peer's guess.
        guess: Sequence,
        /// Its feedback against the local secret.
        feedback: Feedback,
    },
    /// The computer guessed.
    CpuGuessed {
        /// The computer's guess.
        guess: Sequence,
        /// Its feedback against the human's secret.
        feedback: Feedback,
    },
    /// A player ran out of time and a random guess was played for them.
    TimedOut {
        /// The player who ran out of time.
        player: PlayerId,
        /// The guess played on their behalf.
        guess: Sequence,
        /// Its feedback.
        feedback: Feedback,
    },
    /// The match was won.
    MatchOver {
        /// The winner.
        winner: PlayerId,
    },
}

#[derive(Debug)]
struct ActiveMatch<T> {
    game: Match,
    sync: Option<OnlineSync<T>>,
    cpu: CpuOpponent,
    clock: TurnClock,
}

impl<T: Transport> ActiveMatch<T> {
    fn publish(&mut self, body: RelayMessage) {
        if let Some(sync) = &mut self.sync
            && let Err(err) = sync.publish(body)
        {
            log::warn!("match {}: could not publish move: {err}", self.game.state().id());
        }
    }

    fn publish_latest_guess(&mut self, player: PlayerId) {
        if let Some(record) = self.game.state().history(player).last().copied() {
            self.publish(RelayMessage::GuessSubmitted {
                guess: record.guess,
                submitted_at: record.submitted_at,
            });
        }
    }

    fn latest_guess(&self, player: PlayerId) -> Option<Sequence> {
        self.game.state().history(player).last().map(|record| record.guess)
    }
}

/// One player's view of the current match.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
///
/// use codebreak_app::{
///     persistence::{MemoryStorage, SessionStore},
///     relay::LocalRelay,
///     session::{Session, SessionEvent},
///     settings::Settings,
/// };
/// use codebreak_core::SequenceLength;
/// use codebreak_game::{MatchConfig, PlayerId};
///
/// let store = SessionStore::new(MemoryStorage::new());
/// let mut session = Session::<_, LocalRelay>::new(store, None, Settings::default());
/// let start = Instant::now();
///
/// session.start_match(MatchConfig::single_player(SequenceLength::Three), start)?;
/// session.submit_secret(PlayerId::One, "123")?;
/// let outcome = session.submit_guess(PlayerId::One, "456")?;
/// if !outcome.is_won() {
///     let events = session.advance(start + Duration::from_secs(2))?;
///     assert!(matches!(events[0], SessionEvent::CpuGuessed { .. }));
/// }
/// # Ok::<(), codebreak_app::session::SessionError>(())
/// ```
#[derive(Debug)]
pub struct Session<S, T> {
    store: SessionStore<S>,
    transport: Option<T>,
    settings: Settings,
    active: Option<ActiveMatch<T>>,
}

impl<S: Storage, T: Transport + Clone> Session<S, T> {
    /// Creates an idle session. `transport` is only needed for online matches.
    #[must_use]
    pub fn new(store: SessionStore<S>, transport: Option<T>, settings: Settings) -> Self {
        Self {
            store,
            transport,
            settings,
            active: None,
        }
    }

    /// Returns the store backing this session.
    #[must_use]
    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    /// Returns the settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the match saved by an earlier run, if it can be loaded.
    #[must_use]
    pub fn saved_match(&self) -> Option<MatchState> {
        self.store.load_session().unwrap_or_else(|err| {
            log::warn!("could not load saved match: {err}");
            None
        })
    }

    /// Returns archived matches, oldest first. Unreadable history reads as empty.
    #[must_use]
    pub fn history(&self) -> Vec<MatchRecord> {
        self.store.list_match_records().unwrap_or_else(|err| {
            log::warn!("could not load match history: {err}");
            Vec::new()
        })
    }

    /// Starts a new match with fresh randomness.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoTransport`] for an online match without a relay.
    pub fn start_match(
        &mut self,
        config: MatchConfig,
        now: Instant,
    ) -> Result<&MatchState, SessionError> {
        self.start_match_with(config, None, SecretSeed::random(), now)
    }

    /// Joins the online match `id` created by the peer.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoTransport`] without a relay.
    pub fn join_match(
        &mut self,
        config: MatchConfig,
        id: MatchId,
        now: Instant,
    ) -> Result<&MatchState, SessionError> {
        self.start_match_with(config, Some(id), SecretSeed::random(), now)
    }

    /// Starts a match with an explicit id and seed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoTransport`] for an online match without a relay.
    pub fn start_match_with(
        &mut self,
        config: MatchConfig,
        id: Option<MatchId>,
        seed: SecretSeed,
        now: Instant,
    ) -> Result<&MatchState, SessionError> {
        let game = match id {
            Some(id) => Match::with_id(config, id, seed),
            None => Match::new(config, seed),
        };
        self.activate(game, now)
    }

    /// Continues a saved match.
    ///
    /// For online matches the relay log is rebuilt from the state, so the
    /// peer receives any moves it missed.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoTransport`] for an online match without a relay.
    pub fn resume(&mut self, state: MatchState, now: Instant) -> Result<&MatchState, SessionError> {
        self.activate(Match::resume(state, SecretSeed::random()), now)
    }

    /// Returns the current match state.
    #[must_use]
    pub fn state(&self) -> Option<&MatchState> {
        self.active.as_ref().map(|active| active.game.state())
    }

    /// Returns the relay health for online matches.
    #[must_use]
    pub fn sync_status(&self) -> Option<SyncStatus> {
        self.active
            .as_ref()
            .and_then(|active| active.sync.as_ref())
            .map(OnlineSync::status)
    }

    /// Returns `true` while the computer's move is pending.
    #[must_use]
    pub fn is_cpu_thinking(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.cpu.is_thinking())
    }

    /// Returns `true` if `player` is played by a human at this session.
    #[must_use]
    pub fn is_local_player(&self, player: PlayerId) -> bool {
        self.state()
            .is_some_and(|state| is_human(state.config(), player))
    }

    /// Sets a secret for a player controlled from this session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLocalPlayer`] for the computer's or the
    /// online peer's seat, or the match's rejection.
    pub fn submit_secret(&mut self, player: PlayerId, input: &str) -> Result<(), SessionError> {
        let active = self.local_match(player)?;
        active.game.submit_secret(player, input)?;
        if let Some(secret) = active.game.state().secret(player).copied() {
            active.publish(RelayMessage::SecretSet { secret });
        }
        self.persist();
        Ok(())
    }

    /// Guesses for a player controlled from this session.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLocalPlayer`] for the computer's or the
    /// online peer's seat, or the match's rejection.
    pub fn submit_guess(
        &mut self,
        player: PlayerId,
        input: &str,
    ) -> Result<GuessOutcome, SessionError> {
        let active = self.local_match(player)?;
        let outcome = active.game.submit_guess(player, input)?;
        active.publish_latest_guess(player);
        self.settle(std::slice::from_ref(&outcome));
        Ok(outcome)
    }

    /// Passes the device to the other local player.
    ///
    /// # Errors
    ///
    /// Returns the match's rejection if no handoff is in progress.
    pub fn complete_handoff(&mut self) -> Result<(), SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveMatch)?;
        active.game.complete_handoff()?;
        self.persist();
        Ok(())
    }

    /// Replaces the current match with a rematch under the same configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoActiveMatch`] if there is nothing to restart.
    pub fn restart(&mut self, now: Instant) -> Result<&MatchState, SessionError> {
        let mut active = self.active.take().ok_or(SessionError::NoActiveMatch)?;
        active.game.restart();
        self.activate(active.game, now)
    }

    /// Leaves the current match and stops listening to the relay.
    ///
    /// An unfinished match stays saved and can be resumed later.
    pub fn exit(&mut self) {
        if let Some(active) = self.active.take() {
            log::info!("left match {}", active.game.state().id());
        }
    }

    /// Lets time pass: applies the peer's moves, runs the turn clock and
    /// plays the computer's move when due.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay protocol fails or the match rejects a
    /// forced move, which a consistent state never does. Rejected remote
    /// moves are logged and skipped.
    pub fn advance(&mut self, now: Instant) -> Result<Vec<SessionEvent>, SessionError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(Vec::new());
        };
        let mut events = Vec::new();
        let mut outcomes = Vec::new();

        if let Some(sync) = &mut active.sync {
            for envelope in sync.poll(now)? {
                apply_remote(&mut active.game, envelope, &mut events, &mut outcomes);
            }
        }

        let remaining = active.game.state().time_remaining();
        for _ in 0..active.clock.due_ticks(now) {
            let mover = active.game.state().player_to_move();
            let TickOutcome::TimedOut(outcome) = active.game.tick()? else {
                continue;
            };
            let Some(player) = mover else {
                continue;
            };
            if let Some(guess) = active.latest_guess(player) {
                events.push(SessionEvent::TimedOut {
                    player,
                    guess,
                    feedback: outcome.feedback(),
                });
            }
            active.publish_latest_guess(player);
            outcomes.push(outcome);
        }

        if let Some(outcome) = active.cpu.poll(&mut active.game, now)? {
            if let Some(guess) = active.latest_guess(PlayerId::Two) {
                events.push(SessionEvent::CpuGuessed {
                    guess,
                    feedback: outcome.feedback(),
                });
            }
            outcomes.push(outcome);
        }

        for outcome in &outcomes {
            if let GuessOutcome::Won { record, .. } = outcome {
                events.push(SessionEvent::MatchOver {
                    winner: record.winner,
                });
            }
        }
        if !events.is_empty() {
            self.settle(&outcomes);
        } else if active.game.state().time_remaining() != remaining {
            self.persist();
        }
        Ok(events)
    }

    fn activate(&mut self, game: Match, now: Instant) -> Result<&MatchState, SessionError> {
        let sync = if game.state().config().mode.is_online() {
            Some(self.connect(game.state())?)
        } else {
            None
        };
        let active = self.active.insert(ActiveMatch {
            game,
            sync,
            cpu: CpuOpponent::new(self.settings.cpu.think_delay),
            clock: TurnClock::new(now),
        });
        log::debug!("session now running match {}", active.game.state().id());
        self.persist();
        self.state().ok_or(SessionError::NoActiveMatch)
    }

    fn connect(&self, state: &MatchState) -> Result<OnlineSync<T>, SessionError> {
        let transport = self.transport.clone().ok_or(SessionError::NoTransport)?;
        let local = state.config().role.player();
        let (events, applied) = relay_log(state, local);
        Ok(OnlineSync::restore(
            transport,
            state.id(),
            local,
            events,
            applied,
            self.settings.sync.clone(),
        ))
    }

    fn local_match(&mut self, player: PlayerId) -> Result<&mut ActiveMatch<T>, SessionError> {
        let active = self.active.as_mut().ok_or(SessionError::NoActiveMatch)?;
        if !is_human(active.game.state().config(), player) {
            return Err(SessionError::NotLocalPlayer(player));
        }
        Ok(active)
    }

    fn settle(&mut self, outcomes: &[GuessOutcome]) {
        let mut archived = false;
        for outcome in outcomes {
            if let GuessOutcome::Won { record, .. } = outcome {
                if let Err(err) = self.store.append_match_record(record) {
                    log::warn!("could not archive match {}: {err}", record.match_id);
                }
                if let Err(err) = self.store.clear_session() {
                    log::warn!("could not clear saved match: {err}");
                }
                archived = true;
            }
        }
        if !archived {
            self.persist();
        }
    }

    fn persist(&mut self) {
        let Some(active) = &self.active else {
            return;
        };
        let state = active.game.state();
        if state.is_over() {
            return;
        }
        if let Err(err) = self.store.save_session(state) {
            log::warn!("could not save match {}: {err}", state.id());
        }
    }
}

fn is_human(config: &MatchConfig, player: PlayerId) -> bool {
    match config.mode {
        GameMode::SinglePlayer => player == PlayerId::One,
        GameMode::TwoPlayerLocal | GameMode::Online => config.controls(player),
    }
}

/// Rebuilds the local event log and the count of applied peer events from a state.
fn relay_log(state: &MatchState, local: PlayerId) -> (Vec<RelayMessage>, u64) {
    let remote = local.other();
    let mut events = vec![RelayMessage::Joined];
    events.extend(
        state
            .secret(local)
            .map(|secret| RelayMessage::SecretSet { secret: *secret }),
    );
    events.extend(state.history(local).iter().map(|record| RelayMessage::GuessSubmitted {
        guess: record.guess,
        submitted_at: record.submitted_at,
    }));

    let applied = u64::from(state.phase() != Phase::WaitingForOpponent)
        + u64::from(state.secret(remote).is_some())
        + state.history(remote).len() as u64;
    (events, applied)
}

fn apply_remote(
    game: &mut Match,
    envelope: Envelope,
    events: &mut Vec<SessionEvent>,
    outcomes: &mut Vec<GuessOutcome>,
) {
    let remote = envelope.sender;
    let result = match envelope.body {
        RelayMessage::Joined if game.state().phase().is_waiting_for_opponent() => game
            .opponent_joined()
            .map(|()| events.push(SessionEvent::OpponentJoined)),
        RelayMessage::Joined | RelayMessage::SyncRequest { .. } => Ok(()),
        RelayMessage::SecretSet { secret } => game
            .submit_secret(remote, &secret.to_string())
            .map(|()| events.push(SessionEvent::OpponentSecretSet)),
        RelayMessage::GuessSubmitted {
            guess,
            submitted_at,
        } => game
            .submit_guess_at(remote, &guess.to_string(), submitted_at)
            .map(|outcome| {
                events.push(SessionEvent::OpponentGuessed {
                    guess,
                    feedback: outcome.feedback(),
                });
                outcomes.push(outcome);
            }),
    };
    if let Err(err) = result {
        log::warn!(
            "match {}: ignoring move from {remote}: {err}",
            game.state().id()
        );
    }
}
