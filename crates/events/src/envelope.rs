use serde::{Deserialize, Serialize};

use acctlog_core::{AccountId, EventId};

/// Envelope for an event that has been appended to an account's stream.
///
/// Notes:
/// - `account_id` is a back-reference only; the account owns its stream, the
///   event never owns the account.
/// - **Append-only**: `sequence_number` starts at 1 and increases by one per
///   append within the owning account's stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: EventId,
    account_id: AccountId,

    /// Position in the owning account's stream.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(event_id: EventId, account_id: AccountId, sequence_number: u64, payload: E) -> Self {
        Self {
            event_id,
            account_id,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}
