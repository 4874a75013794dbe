//! Read-through account cache keyed by account id.
//!
//! The service refreshes or evicts an entry right after every committed
//! mutation, so a cached account is never older than the last commit.

pub mod in_memory;

use std::sync::Arc;

use acctlog_accounts::Account;
use acctlog_core::AccountId;

pub use in_memory::{InMemoryAccountCache, NoCache};

pub trait AccountCache: Send + Sync {
    fn get(&self, account_id: &AccountId) -> Option<Account>;
    fn put(&self, account: Account);
    fn evict(&self, account_id: &AccountId);
}

impl<S> AccountCache for Arc<S>
where
    S: AccountCache + ?Sized,
{
    fn get(&self, account_id: &AccountId) -> Option<Account> {
        (**self).get(account_id)
    }

    fn put(&self, account: Account) {
        (**self).put(account)
    }

    fn evict(&self, account_id: &AccountId) {
        (**self).evict(account_id)
    }
}

impl<S> AccountCache for Box<S>
where
    S: AccountCache + ?Sized,
{
    fn get(&self, account_id: &AccountId) -> Option<Account> {
        (**self).get(account_id)
    }

    fn put(&self, account: Account) {
        (**self).put(account)
    }

    fn evict(&self, account_id: &AccountId) {
        (**self).evict(account_id)
    }
}
