//! Storage layer for the estoque inventory platform.
//!
//! Persistence is delegated to a hosted, schema-flexible record store. This
//! crate wraps that service behind the [`store::RecordStore`] trait so every
//! business workflow can run against [`store::MemoryStore`] in tests and
//! [`store::RemoteStore`] in production, then layers typed models,
//! per-collection repositories, a keyed product lookup cache, and the
//! multi-step workflow services on top.

pub mod cache;
pub mod models;
pub mod repositories;
pub mod services;
pub mod store;

pub use store::{Collection, Filter, MemoryStore, Query, RawRecord, RecordStore, RemoteStore, StoreError};
