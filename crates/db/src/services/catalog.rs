//! Product catalog workflows: cached lookup, registration, edits, and the
//! batch validate/create pipeline.

use std::collections::HashSet;
use std::sync::Arc;

use estoque_core::batch::{classify_rows, ProductRow, RowStatus, ValidatedRow};
use estoque_core::error::CoreError;
use estoque_core::movement::MovementKind;

use crate::cache::ProductCache;
use crate::models::movimentacao::CreateMovimentacao;
use crate::models::produto::{CreateProduto, Produto, ProdutoStatus, UpdateProduto};
use crate::repositories::{MovimentacaoRepo, ProdutoRepo, ProdutoListOptions};
use crate::store::RecordStore;

use super::ServiceError;

/// Result of a batch creation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOutcome {
    pub criados: usize,
    pub ignorados: usize,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn RecordStore>,
    cache: Arc<ProductCache>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<ProductCache>) -> Self {
        Self { store, cache }
    }

    /// Find a product by primary or alternate code, consulting the lookup
    /// cache first. `None` means the code is unknown — an expected outcome,
    /// not an error.
    pub async fn find_by_codigo(
        &self,
        empresa_id: &str,
        codigo: &str,
    ) -> Result<Option<Produto>, ServiceError> {
        if let Some(cached) = self.cache.get(empresa_id, codigo) {
            return Ok(Some(cached));
        }
        let found = ProdutoRepo::find_by_codigo(self.store.as_ref(), empresa_id, codigo).await?;
        if let Some(produto) = &found {
            self.cache.insert(empresa_id, codigo, produto.clone());
        }
        Ok(found)
    }

    /// `true` when no other product in the company claims the code.
    pub async fn check_code_uniqueness(
        &self,
        empresa_id: &str,
        codigo: &str,
        exclude_id: Option<&str>,
    ) -> Result<bool, ServiceError> {
        Ok(ProdutoRepo::check_code_uniqueness(self.store.as_ref(), empresa_id, codigo, exclude_id)
            .await?)
    }

    /// Register a product. A positive initial quantity is recorded as an
    /// `entrada` movement so the audit trail starts at the true level; if
    /// that append fails the product remains created (see
    /// [`ServiceError::AuditTrail`]).
    pub async fn register_produto(
        &self,
        input: CreateProduto,
        usuario_id: &str,
    ) -> Result<Produto, ServiceError> {
        let produto = ProdutoRepo::create(self.store.as_ref(), &input).await?;
        self.cache
            .insert(&produto.empresa, &produto.codigo, produto.clone());

        if produto.quantidade > 0 {
            let movimento = CreateMovimentacao {
                empresa: produto.empresa.clone(),
                produto_codigo: produto.codigo.clone(),
                produto_descricao: produto.descricao.clone(),
                tipo: MovementKind::Entrada,
                quantidade: produto.quantidade,
                usuario: usuario_id.to_string(),
            };
            if let Err(err) = MovimentacaoRepo::create(self.store.as_ref(), &movimento).await {
                tracing::warn!(
                    codigo = %produto.codigo,
                    error = %err,
                    "Product created but initial movement append failed"
                );
                return Err(ServiceError::AuditTrail(err));
            }
        }
        tracing::info!(id = %produto.id, codigo = %produto.codigo, "Product registered");
        Ok(produto)
    }

    /// Edit a product, enforcing code uniqueness when the primary code
    /// changes, then invalidate the cache entries for every code the
    /// product was or is now reachable by.
    pub async fn editar_produto(
        &self,
        produto_id: &str,
        updates: UpdateProduto,
    ) -> Result<Produto, ServiceError> {
        let before = ProdutoRepo::get(self.store.as_ref(), produto_id).await?;

        if let Some(novo_codigo) = updates.codigo.as_deref() {
            if novo_codigo != before.codigo
                && !self
                    .check_code_uniqueness(&before.empresa, novo_codigo, Some(produto_id))
                    .await?
            {
                return Err(CoreError::Conflict(format!(
                    "Código \"{novo_codigo}\" já está em uso."
                ))
                .into());
            }
        }

        let depois = ProdutoRepo::update(self.store.as_ref(), produto_id, &updates).await?;
        let codes: Vec<&str> = before.all_codes().chain(depois.all_codes()).collect();
        self.cache.invalidate_codes(&before.empresa, codes);
        Ok(depois)
    }

    /// Classify pasted rows against every code already in the database for
    /// the company (primary and alternate, including inactive products).
    pub async fn validate_batch(
        &self,
        empresa_id: &str,
        rows: Vec<ProductRow>,
    ) -> Result<Vec<ValidatedRow>, ServiceError> {
        let options = ProdutoListOptions {
            include_inactive: true,
            ..Default::default()
        };
        let existentes = ProdutoRepo::list(self.store.as_ref(), empresa_id, &options).await?;
        let existing_codes: HashSet<String> = existentes
            .iter()
            .flat_map(|p| p.all_codes().map(str::to_lowercase).collect::<Vec<_>>())
            .collect();
        Ok(classify_rows(&existing_codes, rows))
    }

    /// Create the `Novo` rows of a validated batch, one by one. Individual
    /// failures are tolerated (logged and counted as skipped) so one bad
    /// row does not abort the rest of the batch.
    pub async fn create_batch(
        &self,
        empresa_id: &str,
        rows: Vec<ValidatedRow>,
        usuario_id: &str,
    ) -> Result<BatchOutcome, ServiceError> {
        let total = rows.len();
        let mut criados = 0usize;

        for validated in rows {
            if validated.status != RowStatus::Novo {
                continue;
            }
            let row = validated.row;
            let input = CreateProduto {
                empresa: empresa_id.to_string(),
                codigo: row.codigo.clone(),
                descricao: row.descricao,
                valor: row.valor,
                quantidade: row.quantidade,
                localizacao: row.localizacao,
                status: ProdutoStatus::Ativo,
                codigos_alternativos: row.codigos_alternativos,
            };
            match self.register_produto(input, usuario_id).await {
                Ok(_) => criados += 1,
                Err(err) => {
                    tracing::warn!(codigo = %row.codigo, error = %err, "Batch row creation failed");
                }
            }
        }

        Ok(BatchOutcome {
            criados,
            ignorados: total - criados,
        })
    }

    /// Listing passthrough for the search screens.
    pub async fn list(
        &self,
        empresa_id: &str,
        options: &ProdutoListOptions,
    ) -> Result<Vec<Produto>, ServiceError> {
        Ok(ProdutoRepo::list(self.store.as_ref(), empresa_id, options).await?)
    }

    /// Distinct locations passthrough.
    pub async fn unique_locations(&self, empresa_id: &str) -> Result<Vec<String>, ServiceError> {
        Ok(ProdutoRepo::unique_locations(self.store.as_ref(), empresa_id).await?)
    }

    pub(crate) fn cache(&self) -> &ProductCache {
        &self.cache
    }
}
