use std::collections::HashMap;
use std::sync::RwLock;

use acctlog_accounts::{Account, AccountNumber};
use acctlog_core::{AccountId, AggregateRoot, ExpectedVersion, UserId};

use crate::account_store::AccountStore;
use crate::error::StoreError;
use crate::event_store::{EventStore, StoredEvent, UncommittedEvent};

use super::UnitOfWork;

#[derive(Debug, Default)]
struct State {
    accounts: HashMap<AccountId, Account>,
    streams: HashMap<AccountId, Vec<StoredEvent>>,
}

/// In-memory account + event store.
///
/// Intended for tests/dev. A transaction holds the write lock from start to
/// commit, so transactions are serializable. Writes are applied in place and
/// undone on rollback. Event streams of deleted accounts are retained.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live account records (committed state).
    pub fn account_count(&self) -> Result<usize, StoreError> {
        let state = self.state.read().map_err(|_| StoreError::Poisoned)?;
        Ok(state.accounts.len())
    }
}

/// Reverses one write.
#[derive(Debug)]
enum Undo {
    /// Restore the account record that was there before (or remove it).
    Account {
        account_id: AccountId,
        previous: Option<Account>,
    },
    /// Pop the last event of the stream.
    Append { account_id: AccountId },
}

/// Store state checked out for one transaction, plus the undo log of every
/// write made so far.
#[derive(Debug, Default)]
pub struct InMemoryTransaction {
    state: State,
    undo: Vec<Undo>,
}

impl InMemoryTransaction {
    fn rollback(mut self) -> State {
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::Account {
                    account_id,
                    previous: Some(account),
                } => {
                    self.state.accounts.insert(account_id, account);
                }
                Undo::Account {
                    account_id,
                    previous: None,
                } => {
                    self.state.accounts.remove(&account_id);
                }
                Undo::Append { account_id } => {
                    if let Some(stream) = self.state.streams.get_mut(&account_id) {
                        stream.pop();
                        if stream.is_empty() {
                            self.state.streams.remove(&account_id);
                        }
                    }
                }
            }
        }
        self.state
    }
}

impl UnitOfWork for InMemoryStore {
    type Tx = InMemoryTransaction;

    fn transaction_and_then<T, E, F, H>(&self, work: F, on_commit: H) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, E>,
        H: FnOnce(&T),
        E: From<StoreError>,
    {
        let mut committed = self.state.write().map_err(|_| StoreError::Poisoned)?;

        let mut tx = InMemoryTransaction {
            state: std::mem::take(&mut *committed),
            undo: Vec::new(),
        };

        match work(&mut tx) {
            Ok(out) => {
                *committed = tx.state;
                on_commit(&out);
                Ok(out)
            }
            Err(err) => {
                *committed = tx.rollback();
                Err(err)
            }
        }
    }
}

impl AccountStore for InMemoryTransaction {
    fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.state.accounts.get(&account_id).cloned())
    }

    fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Account>, StoreError> {
        Ok(self
            .state
            .accounts
            .values()
            .find(|a| a.user_id() == user_id)
            .cloned())
    }

    fn find_by_account_number(
        &self,
        account_number: &AccountNumber,
    ) -> Result<Option<Account>, StoreError> {
        Ok(self
            .state
            .accounts
            .values()
            .find(|a| a.account_number() == account_number)
            .cloned())
    }

    fn save(&mut self, account: Account) -> Result<Account, StoreError> {
        let account_id = account.account_id();
        let stored = self.state.accounts.get(&account_id).map(|a| a.version());
        let expected = ExpectedVersion::of(account.version());

        if !expected.matches(stored) {
            return Err(StoreError::Concurrency(format!(
                "account {account_id}: expected {expected:?}, found {stored:?}"
            )));
        }

        let saved = account.with_version(stored.unwrap_or(0) + 1);
        let previous = self.state.accounts.insert(account_id, saved.clone());
        self.undo.push(Undo::Account {
            account_id,
            previous,
        });
        Ok(saved)
    }

    fn delete(&mut self, account_id: AccountId) -> Result<(), StoreError> {
        if let Some(previous) = self.state.accounts.remove(&account_id) {
            self.undo.push(Undo::Account {
                account_id,
                previous: Some(previous),
            });
        }
        Ok(())
    }
}

impl EventStore for InMemoryTransaction {
    fn create_event(&mut self, event: UncommittedEvent) -> Result<StoredEvent, StoreError> {
        let stream = self.state.streams.entry(event.account_id).or_default();

        if stream.iter().any(|e| e.event_id == event.event_id) {
            return Err(StoreError::InvalidAppend(format!(
                "event {} already appended",
                event.event_id
            )));
        }

        let next = stream.last().map(|e| e.sequence_number).unwrap_or(0) + 1;
        let stored = StoredEvent {
            event_id: event.event_id,
            account_id: event.account_id,
            sequence_number: next,
            event_type: event.event_type,
            event_version: event.event_version,
            occurred_at: event.occurred_at,
            payload: event.payload,
        };
        stream.push(stored.clone());
        self.undo.push(Undo::Append {
            account_id: event.account_id,
        });

        Ok(stored)
    }

    fn load_events(&self, account_id: AccountId) -> Result<Vec<StoredEvent>, StoreError> {
        Ok(self
            .state
            .streams
            .get(&account_id)
            .cloned()
            .unwrap_or_default())
    }
}
