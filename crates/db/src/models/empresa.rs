//! Company (tenant) model.

use estoque_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A company: the top-level tenant boundary. Every other collection except
/// `users` references one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Empresa {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub nome: String,
}

/// DTO for creating a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEmpresa {
    pub nome: String,
}
