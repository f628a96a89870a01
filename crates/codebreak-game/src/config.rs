//! Match configuration and identity types.

use std::{
    fmt,
    str::FromStr,
    time::{SystemTime, UNIX_EPOCH},
};

use codebreak_core::SequenceLength;
use codebreak_generator::SecretSeed;
use derive_more::{Display, IsVariant};
use serde::{Deserialize, Serialize};

/// One of the two seats in a match.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, IsVariant, Serialize, Deserialize,
)]
pub enum PlayerId {
    /// The first player. Always guesses first.
    #[display("player 1")]
    One,
    /// The second player. The computer in single-player matches.
    #[display("player 2")]
    Two,
}

impl PlayerId {
    /// Both players in seat order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Returns the opponent.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }

    /// Returns `0` for player one and `1` for player two.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

/// Who is sitting in the second seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IsVariant, Serialize, Deserialize)]
pub enum GameMode {
    /// Against the computer.
    #[display("single player")]
    SinglePlayer,
    /// Two humans sharing one device.
    #[display("two player (local)")]
    TwoPlayerLocal,
    /// Two humans on separate devices connected through a relay.
    #[display("online")]
    Online,
}

/// Which seat this device controls in an online match.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, IsVariant, Serialize, Deserialize)]
pub enum OnlineRole {
    /// Created the match; plays as player one.
    #[default]
    #[display("host")]
    Host,
    /// Joined the match; plays as player two.
    #[display("guest")]
    Guest,
}

impl OnlineRole {
    /// Returns the seat controlled by this role.
    #[must_use]
    pub const fn player(self) -> PlayerId {
        match self {
            Self::Host => PlayerId::One,
            Self::Guest => PlayerId::Two,
        }
    }
}

/// Per-turn time limit.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TimeLimit {
    /// 30 seconds per turn.
    #[display("30s")]
    Seconds30,
    /// 60 seconds per turn.
    #[default]
    #[display("60s")]
    Seconds60,
    /// 90 seconds per turn.
    #[display("90s")]
    Seconds90,
}

impl TimeLimit {
    /// All supported limits, shortest first.
    pub const ALL: [Self; 3] = [Self::Seconds30, Self::Seconds60, Self::Seconds90];

    /// Returns the limit in seconds.
    #[must_use]
    pub const fn seconds(self) -> u32 {
        match self {
            Self::Seconds30 => 30,
            Self::Seconds60 => 60,
            Self::Seconds90 => 90,
        }
    }
}

/// Error returned when converting an unsupported number of seconds into a [`TimeLimit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unsupported time limit: {_0}s (expected 30, 60 or 90)")]
pub struct UnsupportedTimeLimit(#[error(not(source))] pub u32);

impl TryFrom<u32> for TimeLimit {
    type Error = UnsupportedTimeLimit;

    fn try_from(seconds: u32) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|limit| limit.seconds() == seconds)
            .ok_or(UnsupportedTimeLimit(seconds))
    }
}

impl From<TimeLimit> for u32 {
    fn from(limit: TimeLimit) -> Self {
        limit.seconds()
    }
}

/// Settings fixed for the lifetime of a match.
///
/// # Examples
///
/// ```
/// use codebreak_core::SequenceLength;
/// use codebreak_game::{GameMode, MatchConfig, OnlineRole, PlayerId, TimeLimit};
///
/// let config = MatchConfig::online(SequenceLength::Four, OnlineRole::Guest)
///     .with_time_limit(TimeLimit::Seconds30);
/// assert_eq!(config.mode, GameMode::Online);
/// assert!(config.controls(PlayerId::Two));
/// assert!(!config.controls(PlayerId::One));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Number of digits in every secret and guess.
    pub length: SequenceLength,
    /// Time allowed per turn once the clock is running.
    pub time_limit: TimeLimit,
    /// Who plays the second seat.
    pub mode: GameMode,
    /// The seat this device controls. Only meaningful for [`GameMode::Online`].
    pub role: OnlineRole,
}

impl MatchConfig {
    /// Configuration for a match against the computer.
    #[must_use]
    pub fn single_player(length: SequenceLength) -> Self {
        Self {
            length,
            time_limit: TimeLimit::default(),
            mode: GameMode::SinglePlayer,
            role: OnlineRole::default(),
        }
    }

    /// Configuration for two humans sharing a device.
    #[must_use]
    pub fn two_player_local(length: SequenceLength) -> Self {
        Self {
            mode: GameMode::TwoPlayerLocal,
            ..Self::single_player(length)
        }
    }

    /// Configuration for an online match played from `role`'s seat.
    #[must_use]
    pub fn online(length: SequenceLength, role: OnlineRole) -> Self {
        Self {
            mode: GameMode::Online,
            role,
            ..Self::single_player(length)
        }
    }

    /// Returns the configuration with a different per-turn time limit.
    #[must_use]
    pub fn with_time_limit(self, time_limit: TimeLimit) -> Self {
        Self { time_limit, ..self }
    }

    /// Returns `true` if moves for `player` originate on this device.
    ///
    /// Every seat is local except the remote peer's seat in an online match.
    #[must_use]
    pub fn controls(&self, player: PlayerId) -> bool {
        match self.mode {
            GameMode::SinglePlayer | GameMode::TwoPlayerLocal => true,
            GameMode::Online => self.role.player() == player,
        }
    }
}

/// Identifier shared by both peers of a match, rendered as 16 hex digits.
///
/// # Examples
///
/// ```
/// use codebreak_game::MatchId;
///
/// let id: MatchId = "00000000deadbeef".parse()?;
/// assert_eq!(id.to_string(), "00000000deadbeef");
/// # Ok::<(), codebreak_game::ParseMatchIdError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MatchId(u64);

impl MatchId {
    /// Creates an id from its raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives an id from a match seed.
    #[must_use]
    pub fn from_seed(seed: &SecretSeed) -> Self {
        let bytes = seed.derive("match-id").into_bytes();
        let mut raw = [0; 8];
        raw.copy_from_slice(&bytes[..8]);
        Self(u64::from_be_bytes(raw))
    }

    /// Returns the id of the rematch that follows this match.
    ///
    /// Both peers of an online match compute the same successor without
    /// exchanging messages.
    #[must_use]
    pub const fn rematch(self) -> Self {
        Self(self.0.wrapping_add(0x9e37_79b9_7f4a_7c15))
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::Debug for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MatchId({self})")
    }
}

/// Error returned when parsing a [`MatchId`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid match id {_0:?}: expected 16 hex digits")]
pub struct ParseMatchIdError(#[error(not(source))] pub String);

impl FromStr for MatchId {
    type Err = ParseMatchIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 16 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseMatchIdError(s.to_owned()));
        }
        u64::from_str_radix(s, 16)
            .map(Self)
            .map_err(|_| ParseMatchIdError(s.to_owned()))
    }
}

impl TryFrom<String> for MatchId {
    type Error = ParseMatchIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<MatchId> for String {
    fn from(id: MatchId) -> Self {
        id.to_string()
    }
}

/// Wall-clock time in milliseconds since the Unix epoch.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Returns the current time. Clocks set before 1970 read as the epoch.
    #[must_use]
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or_default();
        Self(millis)
    }

    /// Creates a timestamp from milliseconds since the epoch.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }
}
