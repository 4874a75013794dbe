//! Append-only event log boundary.
//!
//! This module defines an infrastructure-facing abstraction for appending and
//! loading per-account event streams without making any storage assumptions.

pub mod r#trait;

pub use r#trait::{EventStore, StoredEvent, UncommittedEvent};
