//! Account domain module (lifecycle state machine + event descriptors).
//!
//! This crate contains the business rules for accounts, implemented purely as
//! deterministic domain logic (no IO, no storage, no caching).

pub mod account;
pub mod event;
pub mod lifecycle;

pub use account::{Account, AccountNumber, AccountPatch, NewAccount};
pub use event::{AccountEvent, AccountEventType};
pub use lifecycle::{transition, AccountCommand, AccountStatus, Transition};
