//! Repository for the `separacoes` and `separacao_itens` collections.

use serde_json::Map;

use crate::models::separacao::{
    CreateSeparacao, CreateSeparacaoItem, Separacao, SeparacaoItem, SeparacaoStatus,
};
use crate::store::{encode_fields, Collection, Filter, Query, RecordStore, Sort, StoreError};
use estoque_core::types::Timestamp;

/// CRUD operations for pick orders and their items.
pub struct SeparacaoRepo;

impl SeparacaoRepo {
    pub async fn create(
        store: &dyn RecordStore,
        input: &CreateSeparacao,
    ) -> Result<Separacao, StoreError> {
        store
            .create(Collection::Separacoes, encode_fields(input)?)
            .await?
            .decode()
    }

    /// Pick orders for a company, grouped by status (lexicographic:
    /// "aguardando entrega", "em andamento", "entregue"), newest first
    /// within each group.
    pub async fn list(store: &dyn RecordStore, empresa_id: &str) -> Result<Vec<Separacao>, StoreError> {
        let query = Query::filtered(Filter::eq("empresa", empresa_id))
            .sorted_by(vec![Sort::asc("status"), Sort::desc("created")]);
        store
            .list(Collection::Separacoes, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }

    pub async fn get(store: &dyn RecordStore, id: &str) -> Result<Separacao, StoreError> {
        store.get(Collection::Separacoes, id).await?.decode()
    }

    /// Items belonging to a pick order.
    pub async fn items(store: &dyn RecordStore, separacao_id: &str) -> Result<Vec<SeparacaoItem>, StoreError> {
        let query = Query::filtered(Filter::eq("separacao", separacao_id));
        store
            .list(Collection::SeparacaoItens, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }

    /// Find a pick order's item for a product code.
    pub async fn find_item(
        store: &dyn RecordStore,
        separacao_id: &str,
        produto_codigo: &str,
    ) -> Result<Option<SeparacaoItem>, StoreError> {
        let filter = Filter::and(vec![
            Filter::eq("separacao", separacao_id),
            Filter::eq("produto_codigo", produto_codigo),
        ]);
        store
            .first(Collection::SeparacaoItens, &filter)
            .await?
            .map(|r| r.decode())
            .transpose()
    }

    pub async fn create_item(
        store: &dyn RecordStore,
        input: &CreateSeparacaoItem,
    ) -> Result<SeparacaoItem, StoreError> {
        store
            .create(Collection::SeparacaoItens, encode_fields(input)?)
            .await?
            .decode()
    }

    pub async fn set_item_quantidade_separada(
        store: &dyn RecordStore,
        item_id: &str,
        quantidade: i64,
    ) -> Result<SeparacaoItem, StoreError> {
        let mut patch = Map::new();
        patch.insert("quantidade_separada".into(), quantidade.into());
        store
            .update(Collection::SeparacaoItens, item_id, patch)
            .await?
            .decode()
    }

    pub async fn delete_item(store: &dyn RecordStore, item_id: &str) -> Result<(), StoreError> {
        store.delete(Collection::SeparacaoItens, item_id).await
    }

    /// Move a pick order to a new status, stamping the completion time and
    /// optional acting user / receiver name.
    pub async fn set_status(
        store: &dyn RecordStore,
        id: &str,
        status: SeparacaoStatus,
        data_finalizacao: Option<Timestamp>,
        usuario: Option<&str>,
        nome_recebedor: Option<&str>,
    ) -> Result<Separacao, StoreError> {
        let mut patch = Map::new();
        patch.insert("status".into(), serde_json::to_value(status)?);
        if let Some(ts) = data_finalizacao {
            patch.insert("dataFinalizacao".into(), serde_json::to_value(ts)?);
        }
        if let Some(user) = usuario {
            patch.insert("usuario".into(), user.into());
        }
        if let Some(nome) = nome_recebedor {
            patch.insert("nome_recebedor".into(), nome.into());
        }
        store.update(Collection::Separacoes, id, patch).await?.decode()
    }
}
