//! Separation (pick order) models and DTOs.

use estoque_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Pick-order lifecycle. `Entregue` is terminal: no further picking or
/// finalization is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeparacaoStatus {
    #[serde(rename = "em andamento")]
    EmAndamento,
    #[serde(rename = "aguardando entrega")]
    AguardandoEntrega,
    #[serde(rename = "entregue")]
    Entregue,
}

/// A pick order header. Items live in `separacao_itens`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Separacao {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub empresa: RecordId,
    /// Customer order number.
    #[serde(rename = "osNumero")]
    pub os_numero: String,
    pub cliente: String,
    #[serde(rename = "placaVeiculo", default)]
    pub placa_veiculo: Option<String>,
    pub status: SeparacaoStatus,
    #[serde(rename = "dataFinalizacao", default)]
    pub data_finalizacao: Option<Timestamp>,
    /// User who finalized the picking (relation id).
    #[serde(default)]
    pub usuario: Option<RecordId>,
    #[serde(default)]
    pub nome_recebedor: Option<String>,
}

/// DTO for opening a pick order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeparacao {
    pub empresa: RecordId,
    #[serde(rename = "osNumero")]
    pub os_numero: String,
    pub cliente: String,
    #[serde(rename = "placaVeiculo", default)]
    pub placa_veiculo: Option<String>,
    pub status: SeparacaoStatus,
}

/// A line of a pick order. `quantidade_estoque_inicial` snapshots the stock
/// at the moment the item was added; picking past that snapshot is flagged
/// to the operator but only enforced at finalization, against live stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeparacaoItem {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    /// Owning pick order (relation id).
    pub separacao: RecordId,
    pub produto_codigo: String,
    pub produto_descricao: String,
    pub localizacao: String,
    pub quantidade_requerida: i64,
    pub quantidade_separada: i64,
    pub quantidade_estoque_inicial: i64,
}

/// DTO for adding a line to a pick order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSeparacaoItem {
    pub separacao: RecordId,
    pub produto_codigo: String,
    pub produto_descricao: String,
    pub localizacao: String,
    pub quantidade_requerida: i64,
    pub quantidade_separada: i64,
    pub quantidade_estoque_inicial: i64,
}
