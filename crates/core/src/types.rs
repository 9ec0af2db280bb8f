//! Shared type aliases used across all estoque crates.

/// Backend-assigned record identifier.
///
/// The record store assigns these; the client never chooses its own ids.
/// Backup import therefore has to remap old ids to newly assigned ones.
pub type RecordId = String;

/// UTC timestamp attached to every stored record (`created` / `updated`).
pub type Timestamp = chrono::DateTime<chrono::Utc>;
