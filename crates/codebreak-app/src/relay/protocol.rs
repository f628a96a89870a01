use codebreak_core::Sequence;
use codebreak_game::{MatchId, PlayerId, Timestamp};
use derive_more::IsVariant;
use serde::{Deserialize, Serialize};

/// Messages exchanged between peers.
#[derive(Debug, Clone, PartialEq, Eq, IsVariant, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RelayMessage {
    /// The sender has entered the match.
    Joined,
    /// The sender fixed their secret.
    SecretSet {
        /// The sender's secret.
        secret: Sequence,
    },
    /// The sender guessed.
    GuessSubmitted {
        /// The guessed sequence.
        guess: Sequence,
        /// When the guess was made, as recorded by the sender.
        submitted_at: Timestamp,
    },
    /// Asks the receiver to re-send its events from `from_seq` onwards.
    SyncRequest {
        /// The first sequence number the requester has not applied.
        from_seq: u64,
    },
}

impl RelayMessage {
    /// Returns `true` for messages that are numbered and logged.
    ///
    /// Everything except [`RelayMessage::SyncRequest`] is an event.
    #[must_use]
    pub fn is_event(&self) -> bool {
        !self.is_sync_request()
    }
}

/// A message together with its routing and ordering metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// The match the message belongs to.
    pub match_id: MatchId,
    /// The seat of the sending peer.
    pub sender: PlayerId,
    /// Position in the sender's event log; `None` for control messages.
    pub seq: Option<u64>,
    /// When the envelope was sent.
    pub sent_at: Timestamp,
    /// The message.
    pub body: RelayMessage,
}

impl Envelope {
    /// Encodes the envelope as a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decodes an envelope from a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns an error if `payload` is not a well-formed envelope.
    pub fn decode(payload: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let envelope = Envelope {
            match_id: MatchId::from_raw(0xab),
            sender: PlayerId::Two,
            seq: Some(3),
            sent_at: Timestamp::from_millis(5),
            body: RelayMessage::GuessSubmitted {
                guess: "4725".parse().unwrap(),
                submitted_at: Timestamp::from_millis(4),
            },
        };
        let json: serde_json::Value = serde_json::from_slice(&envelope.encode().unwrap()).unwrap();
        assert_eq!(json["match_id"], "00000000000000ab");
        assert_eq!(json["body"]["type"], "guess_submitted");
        assert_eq!(json["body"]["guess"], "4725");
        assert_eq!(Envelope::decode(&envelope.encode().unwrap()).unwrap(), envelope);
    }

    #[test]
    fn test_decode_rejects_invalid_sequences() {
        let payload = br#"{"match_id":"0000000000000001","sender":"One","seq":0,"sent_at":0,
            "body":{"type":"secret_set","secret":"1123"}}"#;
        assert!(Envelope::decode(payload).is_err());
    }

    #[test]
    fn test_sync_request_is_not_an_event() {
        assert!(!RelayMessage::SyncRequest { from_seq: 0 }.is_event());
        assert!(RelayMessage::Joined.is_event());
    }
}
