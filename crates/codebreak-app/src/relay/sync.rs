use std::{collections::BTreeMap, time::Instant};

use codebreak_game::{MatchId, PlayerId, Timestamp};
use derive_more::{Display, Error, From, IsVariant};

use super::{Envelope, RelayMessage, Subscription, Transport, TransportError};
use crate::settings::SyncSettings;

/// Connection health as shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum SyncStatus {
    /// The last relay operation succeeded.
    Connected,
    /// Relay operations are failing and being retried.
    Reconnecting {
        /// Consecutive failures so far.
        failures: u32,
    },
}

/// Reasons an [`OnlineSync`] operation failed.
#[derive(Debug, Display, Error, From)]
pub enum SyncError {
    /// A message could not be serialized.
    #[display("cannot encode relay message: {_0}")]
    #[from]
    Encode(serde_json::Error),
    /// Control messages cannot be published as events.
    #[display("sync requests are not events")]
    NotAnEvent,
}

/// Ordered, deduplicated event exchange with the online peer.
///
/// Outgoing events are numbered from zero and kept in an append-only log.
/// Incoming events are released strictly in the peer's numbering: duplicates
/// are discarded and events that arrive early are held until the gap before
/// them fills. Gaps, reconnects and a periodic timer trigger a
/// [`RelayMessage::SyncRequest`], which the peer answers by re-sending its
/// log from the requested position.
///
/// Transport failures never surface as errors. They switch the status to
/// [`SyncStatus::Reconnecting`] and the operation is retried on the next
/// [`OnlineSync::poll`].
#[derive(Debug)]
pub struct OnlineSync<T> {
    transport: T,
    match_id: MatchId,
    local: PlayerId,
    outgoing: Vec<Envelope>,
    first_unsent: usize,
    next_incoming: u64,
    pending: BTreeMap<u64, Envelope>,
    settings: SyncSettings,
    last_resync: Option<Instant>,
    status: SyncStatus,
    subscription: Option<Subscription>,
}

impl<T: Transport> OnlineSync<T> {
    /// Starts syncing `match_id` as `local`'s peer with empty logs.
    pub fn new(transport: T, match_id: MatchId, local: PlayerId, settings: SyncSettings) -> Self {
        Self::restore(transport, match_id, local, Vec::new(), 0, settings)
    }

    /// Rebuilds a sync session after a restart.
    ///
    /// `events` are the local peer's events in the order they were first
    /// published and `applied` is the number of the peer's events already
    /// applied. Every restored event is sent again; the peer discards the
    /// ones it has seen.
    pub fn restore(
        transport: T,
        match_id: MatchId,
        local: PlayerId,
        events: Vec<RelayMessage>,
        applied: u64,
        settings: SyncSettings,
    ) -> Self {
        let now = Timestamp::now();
        let outgoing = (0..)
            .zip(events)
            .map(|(seq, body)| Envelope {
                match_id,
                sender: local,
                seq: Some(seq),
                sent_at: now,
                body,
            })
            .collect();
        let mut this = Self {
            transport,
            match_id,
            local,
            outgoing,
            first_unsent: 0,
            next_incoming: applied,
            pending: BTreeMap::new(),
            settings,
            last_resync: None,
            status: SyncStatus::Connected,
            subscription: None,
        };
        this.ensure_subscribed();
        this
    }

    /// Returns the match being synced.
    #[must_use]
    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Returns the seat this peer plays.
    #[must_use]
    pub fn local(&self) -> PlayerId {
        self.local
    }

    /// Returns the connection health.
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Returns the number of events published so far.
    #[must_use]
    pub fn published(&self) -> usize {
        self.outgoing.len()
    }

    /// Returns the sequence number of the next peer event to be released.
    #[must_use]
    pub fn next_incoming_seq(&self) -> u64 {
        self.next_incoming
    }

    /// Returns the number of peer events held back by a gap.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Appends an event to the log and sends it.
    ///
    /// Returns the event's sequence number. A failed send leaves the event
    /// queued for the next poll.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NotAnEvent`] for a [`RelayMessage::SyncRequest`]
    /// and [`SyncError::Encode`] if the event cannot be serialized.
    pub fn publish(&mut self, body: RelayMessage) -> Result<u64, SyncError> {
        if !body.is_event() {
            return Err(SyncError::NotAnEvent);
        }
        let seq = self.outgoing.len() as u64;
        log::debug!("relay {}: publishing #{seq} {body:?}", self.match_id);
        self.outgoing.push(Envelope {
            match_id: self.match_id,
            sender: self.local,
            seq: Some(seq),
            sent_at: Timestamp::now(),
            body,
        });
        self.flush_unsent()?;
        Ok(seq)
    }

    /// Exchanges pending messages with the relay.
    ///
    /// Returns the peer's events that became applicable, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Encode`] if an outgoing message cannot be serialized.
    pub fn poll(&mut self, now: Instant) -> Result<Vec<Envelope>, SyncError> {
        self.ensure_subscribed();
        self.flush_unsent()?;

        let mut ready = Vec::new();
        let mut gap = false;
        loop {
            let payload = match self.subscription.as_mut().map(Subscription::poll) {
                Some(Ok(Some(payload))) => payload,
                Some(Ok(None)) | None => break,
                Some(Err(err)) => {
                    self.subscription = None;
                    self.record_failure(&err);
                    break;
                }
            };
            self.receive(&payload, &mut ready, &mut gap)?;
        }

        let resync_due = self.last_resync.is_none_or(|last| {
            now.saturating_duration_since(last) >= self.settings.resync_interval
        });
        if gap || resync_due {
            self.send_control(RelayMessage::SyncRequest {
                from_seq: self.next_incoming,
            })?;
            self.last_resync = Some(now);
        }
        Ok(ready)
    }

    fn receive(
        &mut self,
        payload: &[u8],
        ready: &mut Vec<Envelope>,
        gap: &mut bool,
    ) -> Result<(), SyncError> {
        let envelope = match Envelope::decode(payload) {
            Ok(envelope) => envelope,
            Err(err) => {
                log::warn!("relay {}: ignoring malformed payload: {err}", self.match_id);
                return Ok(());
            }
        };
        if envelope.match_id != self.match_id || envelope.sender == self.local {
            return Ok(());
        }
        if let RelayMessage::SyncRequest { from_seq } = envelope.body {
            return self.resend_from(from_seq);
        }
        let Some(seq) = envelope.seq else {
            log::warn!("relay {}: dropping unnumbered event", self.match_id);
            return Ok(());
        };

        if seq < self.next_incoming {
            log::trace!("relay {}: duplicate #{seq}", self.match_id);
            return Ok(());
        }
        if seq > self.next_incoming {
            *gap = true;
            if self.pending.len() < self.settings.max_buffered || self.pending.contains_key(&seq) {
                self.pending.insert(seq, envelope);
            } else {
                log::warn!(
                    "relay {}: buffer full, dropping #{seq} until it is re-sent",
                    self.match_id
                );
            }
            return Ok(());
        }

        ready.push(envelope);
        self.next_incoming += 1;
        while let Some(next) = self.pending.remove(&self.next_incoming) {
            ready.push(next);
            self.next_incoming += 1;
        }
        if !self.pending.is_empty() {
            *gap = true;
        }
        Ok(())
    }

    fn resend_from(&mut self, from_seq: u64) -> Result<(), SyncError> {
        let start = usize::try_from(from_seq)
            .unwrap_or(usize::MAX)
            .min(self.first_unsent);
        if start < self.first_unsent {
            log::debug!(
                "relay {}: re-sending #{start}..#{}",
                self.match_id,
                self.first_unsent
            );
        }
        for index in start..self.first_unsent {
            let payload = self.outgoing[index].encode()?;
            if !self.deliver(payload) {
                self.first_unsent = index;
                break;
            }
        }
        Ok(())
    }

    fn flush_unsent(&mut self) -> Result<(), SyncError> {
        while let Some(envelope) = self.outgoing.get(self.first_unsent) {
            let payload = envelope.encode()?;
            if !self.deliver(payload) {
                break;
            }
            self.first_unsent += 1;
        }
        Ok(())
    }

    fn send_control(&mut self, body: RelayMessage) -> Result<(), SyncError> {
        let envelope = Envelope {
            match_id: self.match_id,
            sender: self.local,
            seq: None,
            sent_at: Timestamp::now(),
            body,
        };
        self.deliver(envelope.encode()?);
        Ok(())
    }

    fn deliver(&mut self, payload: Vec<u8>) -> bool {
        match self.transport.send(self.match_id, payload) {
            Ok(()) => {
                self.record_success();
                true
            }
            Err(err) => {
                self.record_failure(&err);
                false
            }
        }
    }

    fn ensure_subscribed(&mut self) {
        if self.subscription.is_some() {
            return;
        }
        match self.transport.subscribe(self.match_id) {
            Ok(subscription) => {
                self.subscription = Some(subscription);
                self.last_resync = None;
                self.record_success();
            }
            Err(err) => self.record_failure(&err),
        }
    }

    fn record_success(&mut self) {
        if let SyncStatus::Reconnecting { failures } = self.status {
            log::info!(
                "relay {}: reconnected after {failures} failures",
                self.match_id
            );
        }
        self.status = SyncStatus::Connected;
    }

    fn record_failure(&mut self, err: &TransportError) {
        let failures = match self.status {
            SyncStatus::Connected => 1,
            SyncStatus::Reconnecting { failures } => failures.saturating_add(1),
        };
        log::warn!(
            "relay {}: {err} (failure {failures}, will retry)",
            self.match_id
        );
        self.status = SyncStatus::Reconnecting { failures };
    }
}
