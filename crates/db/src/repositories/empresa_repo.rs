//! Repository for the `empresas` collection.

use crate::models::empresa::{CreateEmpresa, Empresa};
use crate::store::{encode_fields, Collection, Query, RecordStore, Sort, StoreError};

/// CRUD operations for companies.
pub struct EmpresaRepo;

impl EmpresaRepo {
    /// All companies, sorted by name.
    pub async fn list_all(store: &dyn RecordStore) -> Result<Vec<Empresa>, StoreError> {
        let query = Query::default().sorted_by(vec![Sort::asc("nome")]);
        store
            .list(Collection::Empresas, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }

    pub async fn create(store: &dyn RecordStore, input: &CreateEmpresa) -> Result<Empresa, StoreError> {
        store
            .create(Collection::Empresas, encode_fields(input)?)
            .await?
            .decode()
    }

    pub async fn get(store: &dyn RecordStore, id: &str) -> Result<Empresa, StoreError> {
        store.get(Collection::Empresas, id).await?.decode()
    }
}
