//! Account lifecycle service (application-level orchestration).
//!
//! `AccountService` is the only way callers touch accounts. Each public
//! operation is one unit of work:
//!
//! ```text
//! operation
//!   ↓
//! 1. Begin transaction (account store + event store)
//!   ↓
//! 2. Load current state, check preconditions (nothing written yet)
//!   ↓
//! 3. Write account state, append the matching event
//!   ↓
//! 4. Commit (both writes) or roll back (neither)
//!   ↓
//! 5. Refresh or evict the cached account (commit hook)
//! ```
//!
//! Precondition failures (`DomainError`) surface before step 3. The cache is
//! only touched from the commit hook, which runs before any later transaction
//! can commit, so cache writes land in commit order and a slow reader cannot
//! put back an account that a newer commit replaced or deleted.

use thiserror::Error;
use tracing::{debug, info, instrument};

use acctlog_accounts::{
    transition, Account, AccountCommand, AccountEvent, AccountEventType, AccountPatch, NewAccount,
};
use acctlog_core::{AccountId, DomainError, EventId};
use acctlog_events::EventEnvelope;

use crate::account_store::AccountStore;
use crate::cache::AccountCache;
use crate::error::StoreError;
use crate::event_store::{EventStore, UncommittedEvent};
use crate::unit_of_work::UnitOfWork;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Precondition failure; nothing was written.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// The backing store failed; the unit of work was rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn as_domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            ServiceError::Store(_) => None,
        }
    }
}

/// Stored event as returned to callers.
pub type AccountEventRecord = EventEnvelope<AccountEvent>;

/// Account lifecycle + event log over a transactional store and a cache.
#[derive(Debug)]
pub struct AccountService<S, C> {
    store: S,
    cache: C,
}

impl<S, C> AccountService<S, C> {
    pub fn new(store: S, cache: C) -> Self {
        Self { store, cache }
    }

    pub fn into_parts(self) -> (S, C) {
        (self.store, self.cache)
    }
}

impl<S, C> AccountService<S, C>
where
    S: UnitOfWork,
    C: AccountCache,
{
    /// Create an account in `PENDING` status and record `ACCOUNT_CREATED`.
    ///
    /// Fails with `DuplicateKey` if another account already uses the
    /// candidate's user id or account number.
    #[instrument(skip(self, candidate), fields(user_id = %candidate.user_id), err(level = "warn"))]
    pub fn create_account(&self, candidate: NewAccount) -> Result<Account, ServiceError> {
        let account_id = AccountId::new();

        let account = self.store.transaction_and_then(
            |tx| -> Result<Account, ServiceError> {
                if tx.find_by_user_id(candidate.user_id)?.is_some() {
                    return Err(DomainError::duplicate_key(format!(
                        "an account for user {} already exists",
                        candidate.user_id
                    ))
                    .into());
                }
                if tx
                    .find_by_account_number(&candidate.account_number)?
                    .is_some()
                {
                    return Err(DomainError::duplicate_key(format!(
                        "account number {} is already taken",
                        candidate.account_number
                    ))
                    .into());
                }

                tx.save(Account::open(account_id, candidate))?;
                let (account, _) =
                    append_in(tx, account_id, AccountEvent::new(AccountEventType::AccountCreated))?;
                Ok(account)
            },
            |_: &Account| self.cache.evict(&account_id),
        )?;

        info!(account_id = %account_id, status = %account.status(), "account created");
        Ok(account)
    }

    /// Fetch an account, reading through the cache.
    #[instrument(skip(self), fields(account_id = %account_id), err(level = "warn"))]
    pub fn get_account(&self, account_id: AccountId) -> Result<Account, ServiceError> {
        if let Some(account) = self.cache.get(&account_id) {
            debug!("cache hit");
            return Ok(account);
        }

        debug!("cache miss");
        let account = self
            .store
            .transaction_and_then(
                |tx| tx.find_by_id(account_id),
                |found: &Option<Account>| {
                    if let Some(account) = found {
                        self.cache.put(account.clone());
                    }
                },
            )?
            .ok_or(DomainError::NotFound)?;

        Ok(account)
    }

    /// Overwrite the mutable fields of an account, status included.
    ///
    /// Lower-level than [`apply_command`](Self::apply_command): no transition
    /// check is made and no event is recorded.
    #[instrument(skip(self, patch), fields(account_id = %account_id), err(level = "warn"))]
    pub fn update_account(
        &self,
        account_id: AccountId,
        patch: AccountPatch,
    ) -> Result<Account, ServiceError> {
        let account = self.store.transaction_and_then(
            |tx| update_in(tx, account_id, &patch),
            |account: &Account| self.cache.put(account.clone()),
        )?;

        info!(status = %account.status(), "account updated");
        Ok(account)
    }

    /// Remove an account record. Its event stream is left to the store.
    #[instrument(skip(self), fields(account_id = %account_id), err(level = "warn"))]
    pub fn delete_account(&self, account_id: AccountId) -> Result<(), ServiceError> {
        self.store.transaction_and_then(
            |tx| -> Result<(), ServiceError> {
                if !tx.exists(account_id)? {
                    return Err(DomainError::NotFound.into());
                }
                tx.delete(account_id)?;
                Ok(())
            },
            |_: &()| self.cache.evict(&account_id),
        )?;

        info!("account deleted");
        Ok(())
    }

    /// Run `command` through the lifecycle table; on success write the new
    /// status and record the matching event in one unit of work.
    #[instrument(skip(self), fields(account_id = %account_id, command = %command), err(level = "warn"))]
    pub fn apply_command(
        &self,
        account_id: AccountId,
        command: AccountCommand,
    ) -> Result<Account, ServiceError> {
        let (account, event_type) = self.store.transaction_and_then(
            |tx| -> Result<(Account, AccountEventType), ServiceError> {
                let current = tx.find_by_id(account_id)?.ok_or(DomainError::NotFound)?;
                let step = transition(current.status(), command)?;

                let patch = AccountPatch::from_account(&current).with_status(step.to);
                update_in(tx, account_id, &patch)?;
                let (account, _) =
                    append_in(tx, account_id, AccountEvent::new(step.event_type.clone()))?;

                Ok((account, step.event_type))
            },
            |(account, _): &(Account, AccountEventType)| self.cache.put(account.clone()),
        )?;

        info!(status = %account.status(), event_type = %event_type, "command applied");
        Ok(account)
    }

    /// Parse a command token, then behave as [`apply_command`](Self::apply_command).
    pub fn apply_command_token(
        &self,
        account_id: AccountId,
        token: &str,
    ) -> Result<Account, ServiceError> {
        let command = token.parse::<AccountCommand>()?;
        self.apply_command(account_id, command)
    }

    /// Append a custom event to an account's log in its own unit of work.
    ///
    /// Lifecycle event types are rejected with `Validation`; they are only
    /// recorded by [`apply_command`](Self::apply_command) with their status
    /// change.
    #[instrument(skip(self, event), fields(account_id = %account_id, event_type = %event.event_type), err(level = "warn"))]
    pub fn append_event(
        &self,
        account_id: AccountId,
        event: AccountEvent,
    ) -> Result<AccountEventRecord, ServiceError> {
        if event.event_type.is_lifecycle() {
            return Err(DomainError::validation(format!(
                "{} is only recorded by its lifecycle command",
                event.event_type
            ))
            .into());
        }

        let (_, record) = self.store.transaction_and_then(
            |tx| append_in(tx, account_id, event),
            |(account, _): &(Account, AccountEventRecord)| self.cache.put(account.clone()),
        )?;

        info!(sequence_number = record.sequence_number(), "event appended");
        Ok(record)
    }

    /// The account's event stream in sequence order.
    ///
    /// Streams outlive their account record, so this also answers for deleted
    /// accounts; an id that never existed yields an empty stream.
    #[instrument(skip(self), fields(account_id = %account_id), err(level = "warn"))]
    pub fn account_events(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<AccountEventRecord>, ServiceError> {
        let stream = self.store.transaction(|tx| tx.load_events(account_id))?;
        stream
            .iter()
            .map(|stored| stored.decode().map_err(ServiceError::from))
            .collect()
    }
}

fn update_in<T>(tx: &mut T, account_id: AccountId, patch: &AccountPatch) -> Result<Account, ServiceError>
where
    T: AccountStore,
{
    if let Some(patch_id) = patch.account_id {
        if patch_id != account_id {
            return Err(DomainError::conflict(format!(
                "account id {patch_id} in the patch does not match {account_id}"
            ))
            .into());
        }
    }

    let mut account = tx.find_by_id(account_id)?.ok_or(DomainError::NotFound)?;
    account.apply_patch(patch)?;
    Ok(tx.save(account)?)
}

fn append_in<T>(
    tx: &mut T,
    account_id: AccountId,
    event: AccountEvent,
) -> Result<(Account, AccountEventRecord), ServiceError>
where
    T: AccountStore + EventStore,
{
    let mut account = tx.find_by_id(account_id)?.ok_or(DomainError::NotFound)?;

    let stored = tx.create_event(UncommittedEvent::from_typed(account_id, EventId::new(), &event)?)?;
    account.record_event(stored.event_id);
    let account = tx.save(account)?;

    Ok((account, stored.decode()?))
}
