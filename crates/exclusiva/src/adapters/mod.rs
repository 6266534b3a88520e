// Rust guideline compliant 2026-10-16

//! Concrete `KeyValueStore` adapters for the `exclusiva` binary.

pub mod in_memory_store;
pub mod sqlite_store;

pub use in_memory_store::InMemoryStore;
pub use sqlite_store::SqliteStore;
