//! Relaying moves between the two peers of an online match.
//!
//! The transport only moves opaque byte payloads between everyone subscribed
//! to a match. [`OnlineSync`] builds an ordered, deduplicated event stream on
//! top of it: each peer numbers its own events, keeps them in an append-only
//! log and re-sends them on request, so peers converge as long as every
//! message is eventually delivered at least once. There is no server and no
//! stronger guarantee; peers may briefly disagree while messages are in
//! flight.

use std::{fmt, sync::mpsc};

use codebreak_game::MatchId;
use derive_more::{Display, Error};

pub use self::{
    local::LocalRelay,
    protocol::{Envelope, RelayMessage},
    sync::{OnlineSync, SyncError, SyncStatus},
};

mod local;
mod protocol;
mod sync;

/// Reasons a transport operation failed.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum TransportError {
    /// The relay is gone; nothing can be sent or received.
    #[display("relay disconnected")]
    Disconnected,
    /// The relay refused the operation for now.
    #[display("relay unavailable: {_0}")]
    Unavailable(#[error(not(source))] String),
}

/// A best-effort, at-least-once message relay.
pub trait Transport {
    /// Delivers `payload` to every current subscriber of `match_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload could not be handed to the relay.
    fn send(&self, match_id: MatchId, payload: Vec<u8>) -> Result<(), TransportError>;

    /// Starts receiving payloads sent to `match_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the relay cannot be reached.
    fn subscribe(&self, match_id: MatchId) -> Result<Subscription, TransportError>;
}

/// A handle receiving payloads for one match. Dropping it unsubscribes.
pub struct Subscription {
    receiver: mpsc::Receiver<Vec<u8>>,
    on_drop: Option<Box<dyn FnOnce() + Send>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

impl Subscription {
    /// Creates a subscription reading from `receiver` that runs `on_drop`
    /// when dropped.
    pub fn new(receiver: mpsc::Receiver<Vec<u8>>, on_drop: impl FnOnce() + Send + 'static) -> Self {
        Self {
            receiver,
            on_drop: Some(Box::new(on_drop)),
        }
    }

    /// Returns the next received payload without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Disconnected`] once the relay has gone away.
    pub fn poll(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        use mpsc::TryRecvError;

        match self.receiver.try_recv() {
            Ok(payload) => Ok(Some(payload)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(TransportError::Disconnected),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}
