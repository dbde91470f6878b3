//! Document store subsystem for itemstore
//!
//! The store holds the canonical persistent state of all item records in a
//! single flat JSON file, loaded fully into memory on open.
//!
//! # Design Principles
//!
//! - Full-file rewrite on every mutation (no append log, no write-behind)
//! - Write-to-temp-then-rename so a failed rewrite never truncates the file
//! - IDs assigned by the store, monotonically increasing, never reused
//! - Counter derived from `max(existing ids) + 1` at open, never persisted
//! - Insertion order preserved (list order is array order on disk)
//!
//! # Invariants Enforced
//!
//! - IDs start at 1 for an empty store and increase by 1 per create
//! - `created_at` is immutable; `updated_at` bumps on every update
//! - Disk and memory agree after every mutating call returns
//! - Not-found is a normal return value, never an error

mod document_store;
mod errors;
mod record;

pub use document_store::DocumentStore;
pub use errors::{StoreError, StoreResult};
pub use record::{FieldMap, Record};
