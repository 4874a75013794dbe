//! Account repository boundary.
//!
//! Lookup-by-key capability over current account state. Uniqueness of
//! `user_id` / `account_number` is checked by the caller through these lookups
//! inside a serializable unit of work.

pub mod r#trait;

pub use r#trait::AccountStore;
