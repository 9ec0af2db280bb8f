//! Stock count models and DTOs.

use estoque_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Count lifecycle. Adjustment flips an in-progress count to `Finalizada`;
/// finalized counts reject further items and adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContagemStatus {
    #[serde(rename = "em andamento")]
    EmAndamento,
    #[serde(rename = "finalizada")]
    Finalizada,
}

/// A physical count header. Items live in `contagem_itens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contagem {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub empresa: RecordId,
    pub nome: String,
    pub status: ContagemStatus,
    #[serde(rename = "dataFinalizacao", default)]
    pub data_finalizacao: Option<Timestamp>,
}

/// DTO for opening a count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContagem {
    pub empresa: RecordId,
    pub nome: String,
    pub status: ContagemStatus,
}

/// A counted product. `quantidade_sistema` snapshots the on-hand quantity
/// at the moment the item was added; the discrepancy against
/// `quantidade_contada` drives the adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContagemItem {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    /// Owning count (relation id).
    pub contagem: RecordId,
    pub produto_codigo: String,
    pub produto_descricao: String,
    pub quantidade_sistema: i64,
    pub quantidade_contada: i64,
}

impl ContagemItem {
    /// Signed discrepancy: counted minus system snapshot.
    pub fn discrepancia(&self) -> i64 {
        estoque_core::movement::discrepancy(self.quantidade_contada, self.quantidade_sistema)
    }
}

/// DTO for recording a counted product within a count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateContagemItem {
    pub contagem: RecordId,
    pub produto_codigo: String,
    pub produto_descricao: String,
    pub quantidade_sistema: i64,
    pub quantidade_contada: i64,
}
