//! Transaction boundary shared by the account and event stores.
//!
//! Every public service operation runs as one unit of work: the closure gets a
//! transaction handle that is both an [`AccountStore`] and an [`EventStore`].
//! Returning `Ok` commits every write made through the handle; returning `Err`
//! discards all of them.
//!
//! [`UnitOfWork::transaction_and_then`] also takes a commit hook. It runs after
//! a successful commit and before the next transaction can start, so side
//! effects that mirror committed state (the account cache) are applied in
//! commit order.

pub mod in_memory;

use std::sync::Arc;

use crate::account_store::AccountStore;
use crate::error::StoreError;
use crate::event_store::EventStore;

pub use in_memory::{InMemoryStore, InMemoryTransaction};

pub trait UnitOfWork: Send + Sync {
    type Tx: AccountStore + EventStore;

    /// Run `work`; on `Ok`, commit and then call `on_commit` with the result
    /// while commits are still serialized. `on_commit` is never called on
    /// `Err`.
    fn transaction_and_then<T, E, F, H>(&self, work: F, on_commit: H) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, E>,
        H: FnOnce(&T),
        E: From<StoreError>;

    fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, E>,
        E: From<StoreError>,
    {
        self.transaction_and_then(work, |_: &T| ())
    }
}

impl<S> UnitOfWork for Arc<S>
where
    S: UnitOfWork,
{
    type Tx = S::Tx;

    fn transaction_and_then<T, E, F, H>(&self, work: F, on_commit: H) -> Result<T, E>
    where
        F: FnOnce(&mut Self::Tx) -> Result<T, E>,
        H: FnOnce(&T),
        E: From<StoreError>,
    {
        (**self).transaction_and_then(work, on_commit)
    }
}
