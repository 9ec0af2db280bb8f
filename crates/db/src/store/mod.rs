//! The record-store abstraction.
//!
//! [`RecordStore`] is the single seam between business logic and
//! persistence: filtered reads, single-record fetches, and per-record
//! mutations. "Not found" on a filtered single-record read is a distinct,
//! expected outcome (`Ok(None)`), never an error; every other failure
//! propagates as [`StoreError`].
//!
//! There is no multi-record transaction. The workflow services in
//! [`crate::services`] issue sequences of independent calls against this
//! trait; their partial-failure behavior is documented per workflow.

mod filter;
mod memory;
mod record;
mod remote;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

pub use filter::{Filter, Query, Sort};
pub use memory::MemoryStore;
pub use record::RawRecord;
pub use remote::RemoteStore;

/// The durable collections, in dependency order (referenced collections
/// first). Backup import deletes in reverse of this order and recreates in
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Empresas,
    Users,
    Produtos,
    Movimentacoes,
    Separacoes,
    SeparacaoItens,
    Contagens,
    ContagemItens,
}

impl Collection {
    /// All collections, in dependency order.
    pub const ALL: [Collection; 8] = [
        Collection::Empresas,
        Collection::Users,
        Collection::Produtos,
        Collection::Movimentacoes,
        Collection::Separacoes,
        Collection::SeparacaoItens,
        Collection::Contagens,
        Collection::ContagemItens,
    ];

    /// Wire name of the collection on the backend.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Empresas => "empresas",
            Self::Users => "users",
            Self::Produtos => "produtos",
            Self::Movimentacoes => "movimentacoes",
            Self::Separacoes => "separacoes",
            Self::SeparacaoItens => "separacao_itens",
            Self::Contagens => "contagens",
            Self::ContagemItens => "contagem_itens",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors surfaced by a [`RecordStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record not found: {collection}/{id}")]
    NotFound {
        collection: &'static str,
        id: String,
    },

    /// The backend rejected a request (non-404 error status).
    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Internal(String),
}

/// Filtered CRUD over remotely persisted records.
///
/// Implementations must treat record ids as server-assigned: `create` always
/// allocates a fresh id and callers cannot choose one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List all records matching the query, fully materialized (the caller
    /// never pages).
    async fn list(&self, collection: Collection, query: &Query) -> Result<Vec<RawRecord>, StoreError>;

    /// First record matching the filter, or `None` when nothing matches.
    async fn first(&self, collection: Collection, filter: &Filter) -> Result<Option<RawRecord>, StoreError>;

    /// Fetch a record by id. Missing records are a [`StoreError::NotFound`].
    async fn get(&self, collection: Collection, id: &str) -> Result<RawRecord, StoreError>;

    /// Create a record from the given fields, returning it with its assigned
    /// id and timestamps.
    async fn create(&self, collection: Collection, fields: Map<String, Value>) -> Result<RawRecord, StoreError>;

    /// Shallow-merge the patch into an existing record's fields.
    async fn update(&self, collection: Collection, id: &str, patch: Map<String, Value>) -> Result<RawRecord, StoreError>;

    /// Delete a record by id. Missing records are a [`StoreError::NotFound`].
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError>;
}

/// Serialize a DTO into the field map a [`RecordStore`] expects.
///
/// The DTO must serialize to a JSON object.
pub fn encode_fields<T: Serialize>(value: &T) -> Result<Map<String, Value>, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::Internal(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}
