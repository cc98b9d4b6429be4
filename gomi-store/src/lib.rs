//! SQLite-backed persistence and query services for the gomi catalog.

/// Snapshot export and import reconciliation.
pub mod porter;
/// Day-of-week schedule resolution.
pub mod schedule;
/// Reverse search from garbage item names to categories.
pub mod search;
/// High-level facade combining the store and its services.
pub mod service;
/// The authoritative category and garbage-type store.
pub mod store;

pub use porter::*;
pub use schedule::*;
pub use search::*;
pub use service::*;
pub use store::*;
