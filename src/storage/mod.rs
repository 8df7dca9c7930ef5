//! SQLite storage for event snapshots.
//!
//! One database per offering. Rows are keyed by event id and never
//! overwritten: a second insert of the same id is ignored.

pub mod schema;
pub mod store;

pub use store::{SnapshotStore, StoreError};
