use codebreak_game::{MatchRecord, MatchState};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::{PersistenceError, Storage};

const SESSION_KEY: &str = "session";
const HISTORY_KEY: &str = "history";
const FORMAT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Versioned<T> {
    format_version: u32,
    data: T,
}

/// Saved match and match history on top of a [`Storage`].
///
/// # Examples
///
/// ```
/// use codebreak_app::persistence::{MemoryStorage, SessionStore};
/// use codebreak_core::SequenceLength;
/// use codebreak_game::{Match, MatchConfig};
/// use codebreak_generator::SecretSeed;
///
/// let mut store = SessionStore::new(MemoryStorage::new());
/// assert!(store.load_session()?.is_none());
///
/// let game = Match::new(MatchConfig::single_player(SequenceLength::Four), SecretSeed::random());
/// store.save_session(game.state())?;
/// assert_eq!(store.load_session()?.as_ref(), Some(game.state()));
///
/// store.clear_session()?;
/// assert!(store.load_session()?.is_none());
/// # Ok::<(), codebreak_app::persistence::PersistenceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    /// Wraps `storage`.
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Returns the underlying storage.
    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Saves the match in progress, replacing any earlier save.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be encoded or written.
    pub fn save_session(&mut self, state: &MatchState) -> Result<(), PersistenceError> {
        self.write(SESSION_KEY, state)
    }

    /// Loads the saved match, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved document cannot be read or decoded.
    pub fn load_session(&self) -> Result<Option<MatchState>, PersistenceError> {
        self.read(SESSION_KEY)
    }

    /// Discards the saved match.
    ///
    /// # Errors
    ///
    /// Returns an error if the saved document cannot be removed.
    pub fn clear_session(&mut self) -> Result<(), PersistenceError> {
        self.storage.remove(SESSION_KEY)?;
        self.storage.flush()
    }

    /// Appends a finished match to the history log.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read, decoded or written. The
    /// log is left as it was.
    pub fn append_match_record(&mut self, record: &MatchRecord) -> Result<(), PersistenceError> {
        let mut records = self.list_match_records()?;
        records.push(record.clone());
        self.write(HISTORY_KEY, &records)
    }

    /// Returns every archived match, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read or decoded.
    pub fn list_match_records(&self) -> Result<Vec<MatchRecord>, PersistenceError> {
        Ok(self.read(HISTORY_KEY)?.unwrap_or_default())
    }

    fn write<T: Serialize>(&mut self, key: &str, data: &T) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(&Versioned {
            format_version: FORMAT_VERSION,
            data,
        })?;
        self.storage.set_string(key, json)?;
        self.storage.flush()
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        let Some(json) = self.storage.get_string(key)? else {
            return Ok(None);
        };
        let stored: Versioned<serde_json::Value> = serde_json::from_str(&json)?;
        if stored.format_version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion {
                found: stored.format_version,
                expected: FORMAT_VERSION,
            });
        }
        Ok(Some(serde_json::from_value(stored.data)?))
    }
}
