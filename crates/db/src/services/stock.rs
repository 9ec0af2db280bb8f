//! Stock movement registration and history.

use std::sync::Arc;

use estoque_core::error::CoreError;
use estoque_core::movement::{self, MovementKind};

use crate::cache::ProductCache;
use crate::models::movimentacao::{CreateMovimentacao, Movimentacao};
use crate::models::produto::Produto;
use crate::repositories::{MovimentacaoRepo, MovimentoFilters, ProdutoRepo};
use crate::store::RecordStore;

use super::ServiceError;

#[derive(Clone)]
pub struct StockService {
    store: Arc<dyn RecordStore>,
    cache: Arc<ProductCache>,
}

impl StockService {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<ProductCache>) -> Self {
        Self { store, cache }
    }

    /// Register an `entrada` or `saida` against a product identified by any
    /// of its codes.
    ///
    /// Sequence: resolve product, compute the new quantity (rejecting
    /// oversubtraction), write it, then append the audit movement. A
    /// failure after the quantity write leaves the stock level correct but
    /// the trail one entry short; see [`ServiceError::AuditTrail`].
    pub async fn registrar_movimentacao(
        &self,
        empresa_id: &str,
        codigo: &str,
        tipo: MovementKind,
        quantidade: i64,
        usuario_id: &str,
    ) -> Result<Produto, ServiceError> {
        let produto = ProdutoRepo::find_by_codigo(self.store.as_ref(), empresa_id, codigo)
            .await?
            .ok_or_else(|| CoreError::not_found("Produto", codigo))?;

        let nova_quantidade = movement::apply(&produto.codigo, produto.quantidade, tipo, quantidade)?;
        let atualizado =
            ProdutoRepo::set_quantidade(self.store.as_ref(), &produto.id, nova_quantidade).await?;
        self.cache
            .invalidate_codes(empresa_id, produto.all_codes());

        let movimento = CreateMovimentacao {
            empresa: empresa_id.to_string(),
            produto_codigo: produto.codigo.clone(),
            produto_descricao: produto.descricao.clone(),
            tipo,
            quantidade,
            usuario: usuario_id.to_string(),
        };
        if let Err(err) = MovimentacaoRepo::create(self.store.as_ref(), &movimento).await {
            tracing::warn!(
                codigo = %produto.codigo,
                %tipo,
                quantidade,
                error = %err,
                "Quantity written but movement append failed"
            );
            return Err(ServiceError::AuditTrail(err));
        }

        tracing::info!(
            codigo = %produto.codigo,
            %tipo,
            quantidade,
            estoque = nova_quantidade,
            "Movement registered"
        );
        Ok(atualizado)
    }

    /// Movement history for a company, newest first.
    pub async fn historico(
        &self,
        empresa_id: &str,
        filters: &MovimentoFilters,
    ) -> Result<Vec<Movimentacao>, ServiceError> {
        Ok(MovimentacaoRepo::list(self.store.as_ref(), empresa_id, filters).await?)
    }
}
