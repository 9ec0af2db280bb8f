//! Pure domain logic for the estoque inventory platform.
//!
//! Everything here is synchronous and I/O-free: quantity arithmetic,
//! batch-row parsing and classification, scanner payload normalization,
//! roles, presentation preferences, and the shared error taxonomy. The
//! storage layer and HTTP surface live in `estoque-db` and `estoque-api`.

pub mod batch;
pub mod error;
pub mod movement;
pub mod prefs;
pub mod roles;
pub mod scan;
pub mod types;
