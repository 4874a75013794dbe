use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use acctlog_core::{AccountId, EventId};
use acctlog_events::EventEnvelope;

use crate::error::StoreError;

/// An event ready to be appended (not yet assigned a sequence number).
///
/// Use [`UncommittedEvent::from_typed`] to build one from a domain event: the
/// payload is serialized to JSON and the event metadata is captured alongside
/// it so the store stays domain-agnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncommittedEvent {
    pub event_id: EventId,
    pub account_id: AccountId,

    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,

    pub payload: JsonValue,
}

/// A stored, immutable event in an account stream.
///
/// Sequence numbers are assigned by the store during append and are:
/// - **Monotonically increasing**: each event gets `last + 1`, starting at 1
/// - **Stream-scoped**: one stream per account
/// - **Immutable**: never reassigned, never reused
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub event_id: EventId,
    pub account_id: AccountId,

    /// Position in the owning account's stream.
    pub sequence_number: u64,

    pub event_type: String,
    pub event_version: u32,
    pub occurred_at: DateTime<Utc>,

    pub payload: JsonValue,
}

impl StoredEvent {
    /// Decode the payload back into a typed envelope.
    pub fn decode<E>(&self) -> Result<EventEnvelope<E>, StoreError>
    where
        E: DeserializeOwned,
    {
        let payload = serde_json::from_value(self.payload.clone()).map_err(|e| {
            StoreError::InvalidAppend(format!(
                "payload of event {} does not decode: {e}",
                self.event_id
            ))
        })?;

        Ok(EventEnvelope::new(
            self.event_id,
            self.account_id,
            self.sequence_number,
            payload,
        ))
    }
}

impl UncommittedEvent {
    /// Convenience constructor from a typed domain event.
    pub fn from_typed<E>(
        account_id: AccountId,
        event_id: EventId,
        event: &E,
    ) -> Result<Self, StoreError>
    where
        E: acctlog_events::Event + Serialize,
    {
        let payload = serde_json::to_value(event)
            .map_err(|e| StoreError::InvalidAppend(format!("payload serialization failed: {e}")))?;

        Ok(Self {
            event_id,
            account_id,
            event_type: event.event_type().to_string(),
            event_version: event.version(),
            occurred_at: event.occurred_at(),
            payload,
        })
    }
}

/// Append-only, per-account event store (the event service collaborator).
///
/// Implementations must:
/// - assign `sequence_number`s starting at `current + 1`, with no gaps
/// - never modify or remove a stored event
/// - return streams in sequence order
pub trait EventStore {
    /// Persist one event and return it with its assigned position.
    fn create_event(&mut self, event: UncommittedEvent) -> Result<StoredEvent, StoreError>;

    /// Load the full stream of an account. Empty if nothing was ever appended.
    fn load_events(&self, account_id: AccountId) -> Result<Vec<StoredEvent>, StoreError>;
}
