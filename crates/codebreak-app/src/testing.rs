//! Test doubles for the app's external collaborators.
//!
//! [`FlakyRelay`] wraps a [`LocalRelay`] and drops, duplicates or rejects
//! outgoing payloads according to a script. [`FailingStorage`] rejects every
//! operation. Both let tests exercise the degraded paths of the sync layer
//! and the session without a real network or disk.

use std::{
    cell::RefCell,
    collections::VecDeque,
    rc::Rc,
};

use codebreak_game::MatchId;

use crate::{
    persistence::{PersistenceError, Storage},
    relay::{LocalRelay, Subscription, Transport, TransportError},
};

/// What happens to one payload handed to a [`FlakyRelay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fate {
    /// Delivered once.
    Deliver,
    /// Silently lost.
    Drop,
    /// Delivered twice.
    Duplicate,
    /// Rejected with [`TransportError::Unavailable`].
    Reject,
}

/// A relay that applies a shared script of [`Fate`]s to outgoing payloads.
///
/// Clones share the script. Once it runs out every payload is delivered.
#[derive(Debug, Default, Clone)]
pub struct FlakyRelay {
    inner: LocalRelay,
    script: Rc<RefCell<VecDeque<Fate>>>,
}

impl FlakyRelay {
    /// Wraps `inner` with an empty script.
    #[must_use]
    pub fn new(inner: LocalRelay) -> Self {
        Self {
            inner,
            script: Rc::default(),
        }
    }

    /// Appends fates to the script.
    pub fn push_fates(&self, fates: impl IntoIterator<Item = Fate>) {
        self.script.borrow_mut().extend(fates);
    }

    /// Returns the number of fates not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.borrow().len()
    }

    /// Returns the wrapped relay.
    #[must_use]
    pub fn inner(&self) -> &LocalRelay {
        &self.inner
    }
}

impl Transport for FlakyRelay {
    fn send(&self, match_id: MatchId, payload: Vec<u8>) -> Result<(), TransportError> {
        let fate = self.script.borrow_mut().pop_front().unwrap_or(Fate::Deliver);
        match fate {
            Fate::Deliver => self.inner.send(match_id, payload),
            Fate::Drop => Ok(()),
            Fate::Duplicate => {
                self.inner.send(match_id, payload.clone())?;
                self.inner.send(match_id, payload)
            }
            Fate::Reject => Err(TransportError::Unavailable("scripted failure".to_owned())),
        }
    }

    fn subscribe(&self, match_id: MatchId) -> Result<Subscription, TransportError> {
        self.inner.subscribe(match_id)
    }
}

/// Storage whose every operation fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStorage;

impl FailingStorage {
    fn error(key: &str) -> PersistenceError {
        PersistenceError::Io {
            key: key.to_owned(),
            source: std::io::Error::other("storage offline"),
        }
    }
}

impl Storage for FailingStorage {
    fn get_string(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Err(Self::error(key))
    }

    fn set_string(&mut self, key: &str, _value: String) -> Result<(), PersistenceError> {
        Err(Self::error(key))
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        Err(Self::error(key))
    }

    fn flush(&mut self) -> Result<(), PersistenceError> {
        Err(Self::error("flush"))
    }
}
