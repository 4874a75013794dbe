//! Infrastructure layer: stores, transactions, caching, config, and the
//! account service that composes them.

pub mod account_store;
pub mod cache;
pub mod config;
pub mod error;
pub mod event_store;
pub mod service;
pub mod unit_of_work;


pub use account_store::AccountStore;
pub use cache::{AccountCache, InMemoryAccountCache, NoCache};
pub use config::ServiceConfig;
pub use error::StoreError;
pub use event_store::{EventStore, StoredEvent, UncommittedEvent};
pub use service::{AccountEventRecord, AccountService, ServiceError};
pub use unit_of_work::{InMemoryStore, UnitOfWork};
