//! Stock movement (audit trail) model.

use estoque_core::movement::MovementKind;
use estoque_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// An immutable audit entry for one quantity change. Product code and
/// description are denormalized so the trail survives product edits.
/// Movements are never updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movimentacao {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub empresa: RecordId,
    pub produto_codigo: String,
    pub produto_descricao: String,
    pub tipo: MovementKind,
    pub quantidade: i64,
    /// Acting user (relation id).
    pub usuario: RecordId,
}

/// DTO for appending a movement to the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMovimentacao {
    pub empresa: RecordId,
    pub produto_codigo: String,
    pub produto_descricao: String,
    pub tipo: MovementKind,
    pub quantidade: i64,
    pub usuario: RecordId,
}
