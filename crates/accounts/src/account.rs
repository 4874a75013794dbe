use serde::{Deserialize, Serialize};

use acctlog_core::{AccountId, AggregateRoot, DomainError, DomainResult, EventId, UserId, ValueObject};

use crate::lifecycle::AccountStatus;

/// Externally visible account number.
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountNumber(String);

impl AccountNumber {
    pub fn new(value: impl Into<String>) -> DomainResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("account number cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for AccountNumber {}

impl TryFrom<String> for AccountNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountNumber> for String {
    fn from(value: AccountNumber) -> Self {
        value.0
    }
}

impl core::fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Candidate for account creation; the id and status are assigned on create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    pub user_id: UserId,
    pub account_number: AccountNumber,
    #[serde(default)]
    pub default_account: bool,
}

/// Full replacement of an account's mutable fields.
///
/// `account_id`, when present, must name the account being updated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountPatch {
    #[serde(default)]
    pub account_id: Option<AccountId>,
    pub user_id: UserId,
    pub account_number: AccountNumber,
    pub default_account: bool,
    pub status: AccountStatus,
}

impl AccountPatch {
    /// Patch that rewrites an account with its current values.
    pub fn from_account(account: &Account) -> Self {
        Self {
            account_id: Some(account.account_id),
            user_id: account.user_id,
            account_number: account.account_number.clone(),
            default_account: account.default_account,
            status: account.status,
        }
    }

    pub fn with_status(mut self, status: AccountStatus) -> Self {
        self.status = status;
        self
    }
}

/// Aggregate root: Account.
///
/// The account owns its event log as an ordered list of event ids; events
/// refer back to the account by id only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    account_id: AccountId,
    user_id: UserId,
    account_number: AccountNumber,
    default_account: bool,
    status: AccountStatus,
    events: Vec<EventId>,
    version: u64,
}

impl Account {
    /// Build a not-yet-saved account in the initial `PENDING` status.
    pub fn open(account_id: AccountId, candidate: NewAccount) -> Self {
        Self {
            account_id,
            user_id: candidate.user_id,
            account_number: candidate.account_number,
            default_account: candidate.default_account,
            status: AccountStatus::Pending,
            events: Vec::new(),
            version: 0,
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn account_number(&self) -> &AccountNumber {
        &self.account_number
    }

    pub fn default_account(&self) -> bool {
        self.default_account
    }

    pub fn status(&self) -> AccountStatus {
        self.status
    }

    /// Event ids in append order.
    pub fn events(&self) -> &[EventId] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Overwrite every mutable field from `patch`.
    ///
    /// This includes `status`, with no transition check: lifecycle changes go
    /// through `transition` first and then use this to write the result.
    pub fn apply_patch(&mut self, patch: &AccountPatch) -> DomainResult<()> {
        if let Some(id) = patch.account_id {
            if id != self.account_id {
                return Err(DomainError::conflict(format!(
                    "patch targets account {id}, expected {}",
                    self.account_id
                )));
            }
        }

        self.user_id = patch.user_id;
        self.account_number = patch.account_number.clone();
        self.default_account = patch.default_account;
        self.status = patch.status;
        Ok(())
    }

    /// Record an appended event. Ids are only ever pushed, never removed.
    pub fn record_event(&mut self, event_id: EventId) {
        self.events.push(event_id);
    }

    /// Stamp the revision assigned by a store after a successful save.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }
}

impl AggregateRoot for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.account_id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
