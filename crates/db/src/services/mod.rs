//! Multi-step workflow services.
//!
//! Each service orchestrates a business task as a sequence of independent
//! record-store calls. The store has no multi-record transaction, so none
//! of these workflows is atomic: the per-workflow docs state exactly what a
//! mid-sequence failure leaves behind. Nothing is retried automatically.

mod backup;
mod catalog;
mod contagem;
mod separacao;
mod stock;

pub use backup::{BackupData, BackupService, ImportOutcome};
pub use catalog::{BatchOutcome, CatalogService};
pub use contagem::{AjusteOutcome, ContagemService};
pub use separacao::{SeparacaoService, ValidatedPick};
pub use stock::StockService;

use estoque_core::error::CoreError;

use crate::store::StoreError;

/// Error type shared by the workflow services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The quantity write succeeded but the audit-trail append failed.
    /// The stock level is correct; the movement log is missing one entry.
    /// There is no rollback — this variant makes the gap visible instead
    /// of folding it into a generic store failure.
    #[error("stock updated but audit log append failed: {0}")]
    AuditTrail(#[source] StoreError),
}
