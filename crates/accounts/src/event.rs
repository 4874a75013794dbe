use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use acctlog_core::{DomainError, DomainResult};
use acctlog_events::Event;

/// What happened to an account.
///
/// Lifecycle tags are fixed; `Custom` carries any other tag a caller appends
/// (e.g. a remediation marker).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountEventType {
    AccountCreated,
    AccountConfirmed,
    AccountActivated,
    AccountSuspended,
    AccountArchived,
    Custom(String),
}

impl AccountEventType {
    pub fn as_str(&self) -> &str {
        match self {
            AccountEventType::AccountCreated => "ACCOUNT_CREATED",
            AccountEventType::AccountConfirmed => "ACCOUNT_CONFIRMED",
            AccountEventType::AccountActivated => "ACCOUNT_ACTIVATED",
            AccountEventType::AccountSuspended => "ACCOUNT_SUSPENDED",
            AccountEventType::AccountArchived => "ACCOUNT_ARCHIVED",
            AccountEventType::Custom(tag) => tag,
        }
    }

    /// True for the tags the lifecycle table emits.
    pub fn is_lifecycle(&self) -> bool {
        !matches!(self, AccountEventType::Custom(_))
    }

    /// A caller-defined tag.
    ///
    /// Lifecycle tags are emitted by `apply_command` together with the status
    /// change they describe, so they are rejected here, as is an empty tag.
    pub fn custom(tag: impl Into<String>) -> DomainResult<Self> {
        let tag = tag.into().trim().to_string();
        if tag.is_empty() {
            return Err(DomainError::validation("event type must not be empty"));
        }
        match Self::from(tag) {
            AccountEventType::Custom(tag) => Ok(AccountEventType::Custom(tag)),
            lifecycle => Err(DomainError::validation(format!(
                "{lifecycle} is a lifecycle event; use the matching command"
            ))),
        }
    }
}

impl From<String> for AccountEventType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ACCOUNT_CREATED" => AccountEventType::AccountCreated,
            "ACCOUNT_CONFIRMED" => AccountEventType::AccountConfirmed,
            "ACCOUNT_ACTIVATED" => AccountEventType::AccountActivated,
            "ACCOUNT_SUSPENDED" => AccountEventType::AccountSuspended,
            "ACCOUNT_ARCHIVED" => AccountEventType::AccountArchived,
            _ => AccountEventType::Custom(value),
        }
    }
}

impl From<AccountEventType> for String {
    fn from(value: AccountEventType) -> Self {
        match value {
            AccountEventType::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl core::fmt::Display for AccountEventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event descriptor appended to an account's log.
///
/// The owning account and the stream position are assigned by the event
/// store when the descriptor is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEvent {
    pub event_type: AccountEventType,
    pub occurred_at: DateTime<Utc>,
}

impl AccountEvent {
    pub fn new(event_type: AccountEventType) -> Self {
        Self::at(event_type, Utc::now())
    }

    pub fn at(event_type: AccountEventType, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_type,
            occurred_at,
        }
    }
}

impl Event for AccountEvent {
    fn event_type(&self) -> &str {
        self.event_type.as_str()
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_tags_are_recognized_from_strings() {
        assert_eq!(
            AccountEventType::from("ACCOUNT_ARCHIVED".to_string()),
            AccountEventType::AccountArchived
        );
        assert!(AccountEventType::AccountArchived.is_lifecycle());
        assert_eq!(
            AccountEventType::custom(" REFUND_ISSUED ").unwrap(),
            AccountEventType::Custom("REFUND_ISSUED".to_string())
        );
    }

    #[test]
    fn custom_rejects_empty_and_lifecycle_tags() {
        assert!(matches!(AccountEventType::custom("  "), Err(DomainError::Validation(_))));
        assert!(matches!(
            AccountEventType::custom("ACCOUNT_ACTIVATED"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn event_type_serializes_as_plain_tag() {
        let event = AccountEvent::new(AccountEventType::AccountCreated);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event_type"], "ACCOUNT_CREATED");

        let back: AccountEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
        assert_eq!(back.event_type(), "ACCOUNT_CREATED");
    }
}
