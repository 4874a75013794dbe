use acctlog_accounts::{Account, AccountNumber};
use acctlog_core::{AccountId, UserId};

use crate::error::StoreError;

/// Current-state store for accounts.
///
/// Implementations must:
/// - bump the account version by one on every successful `save`
/// - reject a `save` whose version does not match the stored one
///   (`StoreError::Concurrency`)
pub trait AccountStore {
    fn find_by_id(&self, account_id: AccountId) -> Result<Option<Account>, StoreError>;

    fn find_by_user_id(&self, user_id: UserId) -> Result<Option<Account>, StoreError>;

    fn find_by_account_number(
        &self,
        account_number: &AccountNumber,
    ) -> Result<Option<Account>, StoreError>;

    fn exists(&self, account_id: AccountId) -> Result<bool, StoreError> {
        Ok(self.find_by_id(account_id)?.is_some())
    }

    /// Insert or replace the account, returning it with its new version.
    fn save(&mut self, account: Account) -> Result<Account, StoreError>;

    /// Remove the account record. Removing a missing record is a no-op.
    fn delete(&mut self, account_id: AccountId) -> Result<(), StoreError>;
}
