//! Impls - implementations of the ports.
//!
//! # Included
//! - **JsonFileStore**: JSON snapshot file, used by the CLI
//! - **InMemoryStore**: for tests

pub mod json_store;
pub mod memory_store;

pub use self::json_store::JsonFileStore;
pub use self::memory_store::InMemoryStore;
