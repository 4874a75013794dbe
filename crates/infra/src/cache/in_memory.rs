use std::collections::HashMap;
use std::sync::RwLock;

use acctlog_accounts::Account;
use acctlog_core::AccountId;

use super::AccountCache;

/// In-memory account cache for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryAccountCache {
    inner: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AccountCache for InMemoryAccountCache {
    fn get(&self, account_id: &AccountId) -> Option<Account> {
        let map = self.inner.read().ok()?;
        map.get(account_id).cloned()
    }

    fn put(&self, account: Account) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(account.account_id(), account);
        }
    }

    // On poison, drop every entry rather than keep a possibly stale one.
    fn evict(&self, account_id: &AccountId) {
        match self.inner.write() {
            Ok(mut map) => {
                map.remove(account_id);
            }
            Err(poisoned) => {
                let mut map = poisoned.into_inner();
                map.clear();
                self.inner.clear_poison();
            }
        }
    }
}

/// Cache that never holds anything (caching disabled).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl AccountCache for NoCache {
    fn get(&self, _account_id: &AccountId) -> Option<Account> {
        None
    }

    fn put(&self, _account: Account) {}

    fn evict(&self, _account_id: &AccountId) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use acctlog_accounts::{AccountNumber, NewAccount};
    use acctlog_core::UserId;

    fn test_account() -> Account {
        Account::open(
            AccountId::new(),
            NewAccount {
                user_id: UserId::new(),
                account_number: AccountNumber::new("C-1").unwrap(),
                default_account: false,
            },
        )
    }

    #[test]
    fn put_get_evict() {
        let cache = InMemoryAccountCache::new();
        let account = test_account();
        let id = account.account_id();

        cache.put(account.clone());
        assert_eq!(cache.get(&id), Some(account));

        cache.evict(&id);
        assert!(cache.get(&id).is_none());
    }

    #[test]
    fn no_cache_never_returns_entries() {
        let account = test_account();
        let id = account.account_id();
        NoCache.put(account);
        assert!(NoCache.get(&id).is_none());
    }
}
