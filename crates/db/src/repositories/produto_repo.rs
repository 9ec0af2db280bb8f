//! Repository for the `produtos` collection.

use serde_json::{Map, Value};

use crate::models::produto::{CreateProduto, Produto, UpdateProduto};
use crate::store::{encode_fields, Collection, Filter, Query, RecordStore, Sort, StoreError};

/// Options for listing/searching products within a company.
#[derive(Debug, Clone, Default)]
pub struct ProdutoListOptions {
    /// Include deactivated products (default: active only).
    pub include_inactive: bool,
    /// Substring match over code, description, location, and alternates.
    pub search_term: Option<String>,
    /// Exact location filter.
    pub location: Option<String>,
    /// Sort field (default: `descricao`).
    pub sort_key: Option<String>,
    pub descending: bool,
}

/// CRUD and lookup operations for products.
pub struct ProdutoRepo;

impl ProdutoRepo {
    /// Filter matching a code against the primary code (exact) or the
    /// alternate-code list (containment), scoped to a company.
    ///
    /// Stored codes are canonical upper case ([`Self::canonicalize_codes`]),
    /// so uppercasing the candidate makes the primary comparison
    /// case-insensitive; `~` already is.
    fn code_filter(empresa_id: &str, codigo: &str) -> Filter {
        Filter::and(vec![
            Filter::eq("empresa", empresa_id),
            Filter::or(vec![
                Filter::eq("codigo", codigo.to_uppercase()),
                Filter::like("codigos_alternativos", codigo),
            ]),
        ])
    }

    /// Uppercase `codigo` and `codigos_alternativos` in an encoded record
    /// patch. Every write funnels through this so code lookups can rely on
    /// the stored form.
    fn canonicalize_codes(fields: &mut Map<String, Value>) {
        if let Some(Value::String(codigo)) = fields.get_mut("codigo") {
            *codigo = codigo.to_uppercase();
        }
        if let Some(Value::Array(alternativos)) = fields.get_mut("codigos_alternativos") {
            for alt in alternativos {
                if let Value::String(s) = alt {
                    *s = s.to_uppercase();
                }
            }
        }
    }

    /// Find a product by primary or alternate code. `None` when no product
    /// matches (the expected outcome for unknown codes).
    pub async fn find_by_codigo(
        store: &dyn RecordStore,
        empresa_id: &str,
        codigo: &str,
    ) -> Result<Option<Produto>, StoreError> {
        store
            .first(Collection::Produtos, &Self::code_filter(empresa_id, codigo))
            .await?
            .map(|r| r.decode())
            .transpose()
    }

    /// `true` when no product in the company claims the candidate code as
    /// primary or alternate. `exclude_id` lets an edit keep its own code.
    pub async fn check_code_uniqueness(
        store: &dyn RecordStore,
        empresa_id: &str,
        codigo: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut parts = vec![Self::code_filter(empresa_id, codigo)];
        if let Some(id) = exclude_id {
            parts.push(Filter::ne("id", id));
        }
        let found = store
            .first(Collection::Produtos, &Filter::and(parts))
            .await?;
        Ok(found.is_none())
    }

    /// List products for a company per the given options.
    pub async fn list(
        store: &dyn RecordStore,
        empresa_id: &str,
        options: &ProdutoListOptions,
    ) -> Result<Vec<Produto>, StoreError> {
        let mut parts = vec![Filter::eq("empresa", empresa_id)];
        if !options.include_inactive {
            parts.push(Filter::eq("status", "ativo"));
        }
        if let Some(term) = options.search_term.as_deref().filter(|t| !t.is_empty()) {
            parts.push(Filter::or(vec![
                Filter::like("codigo", term),
                Filter::like("descricao", term),
                Filter::like("localizacao", term),
                Filter::like("codigos_alternativos", term),
            ]));
        }
        if let Some(location) = options.location.as_deref().filter(|l| !l.is_empty()) {
            parts.push(Filter::eq("localizacao", location));
        }

        let sort_key = options.sort_key.clone().unwrap_or_else(|| "descricao".into());
        let sort = if options.descending {
            Sort::desc(sort_key)
        } else {
            Sort::asc(sort_key)
        };
        let query = Query::filtered(Filter::and(parts)).sorted_by(vec![sort]);

        store
            .list(Collection::Produtos, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }

    /// Distinct, trimmed, sorted non-empty locations in use by a company.
    pub async fn unique_locations(
        store: &dyn RecordStore,
        empresa_id: &str,
    ) -> Result<Vec<String>, StoreError> {
        let query = Query::filtered(Filter::and(vec![
            Filter::eq("empresa", empresa_id),
            Filter::ne("localizacao", ""),
        ]));
        let records = store.list(Collection::Produtos, &query).await?;
        let mut locations: Vec<String> = records
            .iter()
            .filter_map(|r| r.field("localizacao"))
            .filter_map(|v| v.as_str().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .collect();
        locations.sort();
        locations.dedup();
        Ok(locations)
    }

    pub async fn create(store: &dyn RecordStore, input: &CreateProduto) -> Result<Produto, StoreError> {
        let mut fields = encode_fields(input)?;
        Self::canonicalize_codes(&mut fields);
        store
            .create(Collection::Produtos, fields)
            .await?
            .decode()
    }

    pub async fn update(
        store: &dyn RecordStore,
        id: &str,
        input: &UpdateProduto,
    ) -> Result<Produto, StoreError> {
        let mut fields = encode_fields(input)?;
        Self::canonicalize_codes(&mut fields);
        store
            .update(Collection::Produtos, id, fields)
            .await?
            .decode()
    }

    /// Write a new on-hand quantity. Reserved for the stock workflows; see
    /// [`crate::services`].
    pub async fn set_quantidade(
        store: &dyn RecordStore,
        id: &str,
        quantidade: i64,
    ) -> Result<Produto, StoreError> {
        let mut patch = serde_json::Map::new();
        patch.insert("quantidade".into(), quantidade.into());
        store.update(Collection::Produtos, id, patch).await?.decode()
    }

    pub async fn get(store: &dyn RecordStore, id: &str) -> Result<Produto, StoreError> {
        store.get(Collection::Produtos, id).await?.decode()
    }
}
