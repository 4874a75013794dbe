//! Event primitives shared by the account domain and the event log.
//!
//! Domain crates describe *what happened* by implementing [`Event`]; the event
//! store wraps each fact in an [`EventEnvelope`] once it has a position in the
//! owning account's stream.

pub mod envelope;
pub mod event;

pub use envelope::EventEnvelope;
pub use event::Event;
