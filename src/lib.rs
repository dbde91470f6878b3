//! itemstore - a small HTTP CRUD service over a flat JSON-file document store
//!
//! The store owns the on-disk JSON file, the in-memory record set, and id
//! assignment; the HTTP layer is a thin translation over it.

pub mod http_server;
pub mod store;
