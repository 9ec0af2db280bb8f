//! Repository for the `contagens` and `contagem_itens` collections.

use serde_json::Map;

use crate::models::contagem::{
    Contagem, ContagemItem, ContagemStatus, CreateContagem, CreateContagemItem,
};
use crate::store::{encode_fields, Collection, Filter, Query, RecordStore, Sort, StoreError};
use estoque_core::types::Timestamp;

/// CRUD operations for stock counts and their items.
pub struct ContagemRepo;

impl ContagemRepo {
    pub async fn create(store: &dyn RecordStore, input: &CreateContagem) -> Result<Contagem, StoreError> {
        store
            .create(Collection::Contagens, encode_fields(input)?)
            .await?
            .decode()
    }

    /// Counts for a company, newest first.
    pub async fn list(store: &dyn RecordStore, empresa_id: &str) -> Result<Vec<Contagem>, StoreError> {
        let query = Query::filtered(Filter::eq("empresa", empresa_id))
            .sorted_by(vec![Sort::desc("created")]);
        store
            .list(Collection::Contagens, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }

    pub async fn get(store: &dyn RecordStore, id: &str) -> Result<Contagem, StoreError> {
        store.get(Collection::Contagens, id).await?.decode()
    }

    /// Items belonging to a count.
    pub async fn items(store: &dyn RecordStore, contagem_id: &str) -> Result<Vec<ContagemItem>, StoreError> {
        let query = Query::filtered(Filter::eq("contagem", contagem_id));
        store
            .list(Collection::ContagemItens, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }

    /// Find a count's item for a product code.
    pub async fn find_item(
        store: &dyn RecordStore,
        contagem_id: &str,
        produto_codigo: &str,
    ) -> Result<Option<ContagemItem>, StoreError> {
        let filter = Filter::and(vec![
            Filter::eq("contagem", contagem_id),
            Filter::eq("produto_codigo", produto_codigo),
        ]);
        store
            .first(Collection::ContagemItens, &filter)
            .await?
            .map(|r| r.decode())
            .transpose()
    }

    pub async fn create_item(
        store: &dyn RecordStore,
        input: &CreateContagemItem,
    ) -> Result<ContagemItem, StoreError> {
        store
            .create(Collection::ContagemItens, encode_fields(input)?)
            .await?
            .decode()
    }

    pub async fn set_item_quantidade_contada(
        store: &dyn RecordStore,
        item_id: &str,
        quantidade: i64,
    ) -> Result<ContagemItem, StoreError> {
        let mut patch = Map::new();
        patch.insert("quantidade_contada".into(), quantidade.into());
        store
            .update(Collection::ContagemItens, item_id, patch)
            .await?
            .decode()
    }

    /// Flip a count's status, stamping the completion time when provided.
    pub async fn set_status(
        store: &dyn RecordStore,
        id: &str,
        status: ContagemStatus,
        data_finalizacao: Option<Timestamp>,
    ) -> Result<Contagem, StoreError> {
        let mut patch = Map::new();
        patch.insert("status".into(), serde_json::to_value(status)?);
        if let Some(ts) = data_finalizacao {
            patch.insert("dataFinalizacao".into(), serde_json::to_value(ts)?);
        }
        store.update(Collection::Contagens, id, patch).await?.decode()
    }
}
