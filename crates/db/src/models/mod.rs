//! Typed models and DTOs for each collection.
//!
//! Each submodule contains:
//! - an entity struct decoded from [`crate::store::RawRecord`] (`id`,
//!   `created`, `updated`, plus the collection's data fields);
//! - a create DTO for inserts;
//! - where needed, an all-`Option` update DTO for patches.
//!
//! Field idents follow the backend's wire names (serde renames cover the
//! camelCase ones), so filters, patches, and backups all speak one
//! vocabulary.

pub mod contagem;
pub mod empresa;
pub mod movimentacao;
pub mod produto;
pub mod separacao;
pub mod user;
