use std::{
    collections::HashMap,
    sync::{Arc, Mutex, Weak, mpsc},
};

use codebreak_game::MatchId;

use super::{Subscription, Transport, TransportError};

#[derive(Debug, Default)]
struct Hub {
    next_id: u64,
    subscribers: HashMap<MatchId, Vec<(u64, mpsc::Sender<Vec<u8>>)>>,
}

/// An in-process relay connecting every clone of the same instance.
///
/// Delivery is immediate and lossless, which makes it suitable for tests and
/// for playing both seats of an online match on one machine.
#[derive(Debug, Default, Clone)]
pub struct LocalRelay {
    hub: Arc<Mutex<Hub>>,
}

impl LocalRelay {
    /// Creates a relay with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live subscriptions for `match_id`.
    #[must_use]
    pub fn subscriber_count(&self, match_id: MatchId) -> usize {
        self.hub
            .lock()
            .map(|hub| hub.subscribers.get(&match_id).map_or(0, Vec::len))
            .unwrap_or_default()
    }
}

impl Transport for LocalRelay {
    fn send(&self, match_id: MatchId, payload: Vec<u8>) -> Result<(), TransportError> {
        let mut hub = self.hub.lock().map_err(|_| TransportError::Disconnected)?;
        if let Some(subscribers) = hub.subscribers.get_mut(&match_id) {
            subscribers.retain(|(_, sender)| sender.send(payload.clone()).is_ok());
        }
        Ok(())
    }

    fn subscribe(&self, match_id: MatchId) -> Result<Subscription, TransportError> {
        let mut hub = self.hub.lock().map_err(|_| TransportError::Disconnected)?;
        let id = hub.next_id;
        hub.next_id += 1;
        let (sender, receiver) = mpsc::channel();
        hub.subscribers.entry(match_id).or_default().push((id, sender));

        let weak: Weak<Mutex<Hub>> = Arc::downgrade(&self.hub);
        Ok(Subscription::new(receiver, move || {
            let Some(hub) = weak.upgrade() else {
                return;
            };
            if let Ok(mut hub) = hub.lock()
                && let Some(subscribers) = hub.subscribers.get_mut(&match_id)
            {
                subscribers.retain(|(sub_id, _)| *sub_id != id);
                if subscribers.is_empty() {
                    hub.subscribers.remove(&match_id);
                }
            }
        }))
    }
}
