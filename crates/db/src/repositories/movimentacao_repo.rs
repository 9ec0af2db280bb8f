//! Repository for the `movimentacoes` collection (append-only audit trail).

use chrono::NaiveDate;
use estoque_core::movement::MovementKind;

use crate::models::movimentacao::{CreateMovimentacao, Movimentacao};
use crate::store::{encode_fields, Collection, Filter, Query, RecordStore, Sort, StoreError};

/// Filters for the movement history screen. Dates are inclusive calendar
/// days in the company's timezone-naive convention (`00:00:00`–`23:59:59`).
#[derive(Debug, Clone, Default)]
pub struct MovimentoFilters {
    /// Substring match on the denormalized product code.
    pub produto_codigo: Option<String>,
    pub tipo: Option<MovementKind>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
}

/// Append and query operations for movements. There is deliberately no
/// update or delete.
pub struct MovimentacaoRepo;

impl MovimentacaoRepo {
    pub async fn create(
        store: &dyn RecordStore,
        input: &CreateMovimentacao,
    ) -> Result<Movimentacao, StoreError> {
        store
            .create(Collection::Movimentacoes, encode_fields(input)?)
            .await?
            .decode()
    }

    /// Movement history for a company, newest first.
    pub async fn list(
        store: &dyn RecordStore,
        empresa_id: &str,
        filters: &MovimentoFilters,
    ) -> Result<Vec<Movimentacao>, StoreError> {
        let mut parts = vec![Filter::eq("empresa", empresa_id)];
        if let Some(codigo) = filters.produto_codigo.as_deref().filter(|c| !c.is_empty()) {
            parts.push(Filter::like("produto_codigo", codigo));
        }
        if let Some(tipo) = filters.tipo {
            parts.push(Filter::eq("tipo", tipo.as_str()));
        }
        if let Some(inicio) = filters.data_inicio {
            parts.push(Filter::ge("created", format!("{inicio} 00:00:00")));
        }
        if let Some(fim) = filters.data_fim {
            parts.push(Filter::le("created", format!("{fim} 23:59:59")));
        }

        let query = Query::filtered(Filter::and(parts)).sorted_by(vec![Sort::desc("created")]);
        store
            .list(Collection::Movimentacoes, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }
}
