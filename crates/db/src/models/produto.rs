//! Product model and DTOs.

use estoque_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Product lifecycle status. Products are deactivated, never hard-deleted
/// in normal flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProdutoStatus {
    Ativo,
    Inativo,
}

/// A stock item. `quantidade` only changes through movement registration,
/// count adjustment, or separation finalization — never by direct edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Produto {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    /// Owning company (relation id).
    pub empresa: RecordId,
    pub codigo: String,
    pub descricao: String,
    /// Unit value.
    pub valor: f64,
    /// Quantity on hand.
    pub quantidade: i64,
    pub localizacao: String,
    pub status: ProdutoStatus,
    #[serde(default)]
    pub codigos_alternativos: Vec<String>,
}

impl Produto {
    /// Primary code followed by every alternate code.
    pub fn all_codes(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.codigo.as_str())
            .chain(self.codigos_alternativos.iter().map(String::as_str))
    }

    pub fn is_active(&self) -> bool {
        self.status == ProdutoStatus::Ativo
    }
}

/// DTO for registering a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProduto {
    pub empresa: RecordId,
    pub codigo: String,
    pub descricao: String,
    pub valor: f64,
    pub quantidade: i64,
    pub localizacao: String,
    pub status: ProdutoStatus,
    #[serde(default)]
    pub codigos_alternativos: Vec<String>,
}

/// DTO for editing a product. Only populated fields are patched; the owning
/// company is immutable after creation. Quantity is deliberately absent —
/// it moves through the stock workflows only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProduto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizacao: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProdutoStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigos_alternativos: Option<Vec<String>>,
}
