//! Persistence adapters backing the record store and directory ports.
//!
//! The service's store contract is a key-addressed record map with per-record
//! atomicity; the in-memory adapters satisfy it without external
//! infrastructure. Repository implementations only translate between stored
//! and domain representations — no business logic resides here.

mod memory;

pub use memory::{InMemorySnippetStore, InMemoryUserDirectory};
