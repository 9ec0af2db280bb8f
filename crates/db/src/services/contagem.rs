//! Physical count workflow: open, record items, reconcile stock.

use std::sync::Arc;

use chrono::Utc;
use estoque_core::error::CoreError;
use estoque_core::movement::adjustment_for;

use crate::models::contagem::{
    Contagem, ContagemItem, ContagemStatus, CreateContagem, CreateContagemItem,
};
use crate::models::movimentacao::CreateMovimentacao;
use crate::repositories::{ContagemRepo, MovimentacaoRepo, ProdutoRepo};
use crate::store::RecordStore;

use super::{CatalogService, ServiceError};

/// Result of applying a count's discrepancies to the stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AjusteOutcome {
    /// Items whose discrepancy produced a stock write.
    pub ajustados: usize,
}

#[derive(Clone)]
pub struct ContagemService {
    store: Arc<dyn RecordStore>,
    catalog: CatalogService,
}

impl ContagemService {
    pub fn new(store: Arc<dyn RecordStore>, catalog: CatalogService) -> Self {
        Self { store, catalog }
    }

    pub async fn create(&self, empresa_id: &str, nome: &str) -> Result<Contagem, ServiceError> {
        let nome = nome.trim();
        if nome.is_empty() {
            return Err(CoreError::Validation("informe um nome para a contagem".into()).into());
        }
        let input = CreateContagem {
            empresa: empresa_id.to_string(),
            nome: nome.to_string(),
            status: ContagemStatus::EmAndamento,
        };
        Ok(ContagemRepo::create(self.store.as_ref(), &input).await?)
    }

    pub async fn list(&self, empresa_id: &str) -> Result<Vec<Contagem>, ServiceError> {
        Ok(ContagemRepo::list(self.store.as_ref(), empresa_id).await?)
    }

    pub async fn get_with_items(
        &self,
        contagem_id: &str,
    ) -> Result<(Contagem, Vec<ContagemItem>), ServiceError> {
        let contagem = ContagemRepo::get(self.store.as_ref(), contagem_id).await?;
        let items = ContagemRepo::items(self.store.as_ref(), contagem_id).await?;
        Ok((contagem, items))
    }

    /// Record a counted quantity. Re-counting a code already in the count
    /// overwrites its counted quantity; a new code snapshots the current
    /// on-hand quantity as `quantidade_sistema`.
    pub async fn add_item(
        &self,
        contagem_id: &str,
        codigo: &str,
        quantidade_contada: i64,
    ) -> Result<ContagemItem, ServiceError> {
        if quantidade_contada < 0 {
            return Err(
                CoreError::Validation("quantidade contada não pode ser negativa".into()).into(),
            );
        }
        let contagem = ContagemRepo::get(self.store.as_ref(), contagem_id).await?;
        if contagem.status != ContagemStatus::EmAndamento {
            return Err(CoreError::Conflict("contagem já foi finalizada".into()).into());
        }

        let produto = self
            .catalog
            .find_by_codigo(&contagem.empresa, codigo)
            .await?
            .ok_or_else(|| CoreError::not_found("Produto", codigo))?;

        if let Some(existing) =
            ContagemRepo::find_item(self.store.as_ref(), contagem_id, &produto.codigo).await?
        {
            return Ok(ContagemRepo::set_item_quantidade_contada(
                self.store.as_ref(),
                &existing.id,
                quantidade_contada,
            )
            .await?);
        }

        let input = CreateContagemItem {
            contagem: contagem_id.to_string(),
            produto_codigo: produto.codigo.clone(),
            produto_descricao: produto.descricao.clone(),
            quantidade_sistema: produto.quantidade,
            quantidade_contada,
        };
        Ok(ContagemRepo::create_item(self.store.as_ref(), &input).await?)
    }

    /// Close a count without touching the stock.
    pub async fn finalizar(&self, contagem_id: &str) -> Result<Contagem, ServiceError> {
        let contagem = ContagemRepo::get(self.store.as_ref(), contagem_id).await?;
        if contagem.status != ContagemStatus::EmAndamento {
            return Err(CoreError::Conflict("contagem já foi finalizada".into()).into());
        }
        Ok(ContagemRepo::set_status(
            self.store.as_ref(),
            contagem_id,
            ContagemStatus::Finalizada,
            Some(Utc::now()),
        )
        .await?)
    }

    /// Apply every item's discrepancy to the live stock and close the
    /// count.
    ///
    /// Items are processed one by one: each discrepancy becomes a quantity
    /// write plus an audit movement whose direction follows the sign of the
    /// discrepancy. Products deleted since they were counted are skipped.
    /// The run is not atomic — a mid-sequence failure leaves the earlier
    /// items adjusted and the count still in progress, so re-running after
    /// a fix re-reads live quantities and only adjusts what still differs.
    pub async fn ajustar_estoque(
        &self,
        contagem_id: &str,
        usuario_id: &str,
    ) -> Result<AjusteOutcome, ServiceError> {
        let contagem = ContagemRepo::get(self.store.as_ref(), contagem_id).await?;
        if contagem.status != ContagemStatus::EmAndamento {
            return Err(CoreError::Conflict("contagem já foi finalizada".into()).into());
        }

        let items = ContagemRepo::items(self.store.as_ref(), contagem_id).await?;
        let mut ajustados = 0usize;

        for item in items {
            // Live read, bypassing the lookup cache: stock math must not
            // run against a stale entry.
            let Some(produto) = ProdutoRepo::find_by_codigo(
                self.store.as_ref(),
                &contagem.empresa,
                &item.produto_codigo,
            )
            .await?
            else {
                tracing::warn!(
                    codigo = %item.produto_codigo,
                    "Counted product no longer exists, skipping adjustment"
                );
                continue;
            };

            // Reconcile against the snapshot taken when the item was
            // counted, not the live quantity.
            let Some((tipo, quantidade)) =
                adjustment_for(item.quantidade_contada, item.quantidade_sistema)
            else {
                continue;
            };

            ProdutoRepo::set_quantidade(self.store.as_ref(), &produto.id, item.quantidade_contada)
                .await?;
            self.catalog
                .cache()
                .invalidate_codes(&contagem.empresa, produto.all_codes());

            let movimento = CreateMovimentacao {
                empresa: contagem.empresa.clone(),
                produto_codigo: produto.codigo.clone(),
                produto_descricao: produto.descricao.clone(),
                tipo,
                quantidade,
                usuario: usuario_id.to_string(),
            };
            if let Err(err) = MovimentacaoRepo::create(self.store.as_ref(), &movimento).await {
                tracing::warn!(
                    codigo = %produto.codigo,
                    error = %err,
                    "Adjustment written but movement append failed"
                );
                return Err(ServiceError::AuditTrail(err));
            }
            ajustados += 1;
        }

        ContagemRepo::set_status(
            self.store.as_ref(),
            contagem_id,
            ContagemStatus::Finalizada,
            Some(Utc::now()),
        )
        .await?;

        tracing::info!(contagem = %contagem_id, ajustados, "Count reconciled");
        Ok(AjusteOutcome { ajustados })
    }
}
