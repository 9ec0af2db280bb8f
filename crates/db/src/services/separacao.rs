//! Pick-order (separation) workflow: open, build the item list, pick,
//! finalize (stock deduction), confirm delivery.

use std::sync::Arc;

use chrono::Utc;
use estoque_core::batch::PickRow;
use estoque_core::error::CoreError;
use estoque_core::movement::{self, MovementKind};

use crate::models::movimentacao::CreateMovimentacao;
use crate::models::produto::Produto;
use crate::models::separacao::{
    CreateSeparacao, CreateSeparacaoItem, Separacao, SeparacaoItem, SeparacaoStatus,
};
use crate::repositories::{MovimentacaoRepo, ProdutoRepo, SeparacaoRepo};
use crate::store::RecordStore;

use super::{CatalogService, ServiceError};

/// One pasted pick line resolved against the catalog. `produto` is `None`
/// for unknown codes; the caller decides whether to reject or drop them.
#[derive(Debug, Clone)]
pub struct ValidatedPick {
    pub row: PickRow,
    pub produto: Option<Produto>,
}

#[derive(Clone)]
pub struct SeparacaoService {
    store: Arc<dyn RecordStore>,
    catalog: CatalogService,
}

impl SeparacaoService {
    pub fn new(store: Arc<dyn RecordStore>, catalog: CatalogService) -> Self {
        Self { store, catalog }
    }

    pub async fn create(
        &self,
        empresa_id: &str,
        os_numero: &str,
        cliente: &str,
        placa_veiculo: Option<String>,
    ) -> Result<Separacao, ServiceError> {
        let os_numero = os_numero.trim();
        let cliente = cliente.trim();
        if os_numero.is_empty() || cliente.is_empty() {
            return Err(
                CoreError::Validation("informe o número da OS e o cliente".into()).into(),
            );
        }
        let input = CreateSeparacao {
            empresa: empresa_id.to_string(),
            os_numero: os_numero.to_string(),
            cliente: cliente.to_string(),
            placa_veiculo: placa_veiculo
                .map(|p| p.trim().to_uppercase())
                .filter(|p| !p.is_empty()),
            status: SeparacaoStatus::EmAndamento,
        };
        Ok(SeparacaoRepo::create(self.store.as_ref(), &input).await?)
    }

    pub async fn list(&self, empresa_id: &str) -> Result<Vec<Separacao>, ServiceError> {
        Ok(SeparacaoRepo::list(self.store.as_ref(), empresa_id).await?)
    }

    pub async fn get_with_items(
        &self,
        separacao_id: &str,
    ) -> Result<(Separacao, Vec<SeparacaoItem>), ServiceError> {
        let separacao = SeparacaoRepo::get(self.store.as_ref(), separacao_id).await?;
        let items = SeparacaoRepo::items(self.store.as_ref(), separacao_id).await?;
        Ok((separacao, items))
    }

    /// Resolve pasted pick lines against the catalog so the operator can
    /// review unknown codes before committing the list.
    pub async fn validate_pick_rows(
        &self,
        empresa_id: &str,
        rows: Vec<PickRow>,
    ) -> Result<Vec<ValidatedPick>, ServiceError> {
        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let produto = self.catalog.find_by_codigo(empresa_id, &row.codigo).await?;
            out.push(ValidatedPick { row, produto });
        }
        Ok(out)
    }

    /// Replace a pick order's item list with the given rows. Unknown codes
    /// are rejected up front; nothing is written if any code fails to
    /// resolve.
    pub async fn set_items(
        &self,
        separacao_id: &str,
        rows: Vec<PickRow>,
    ) -> Result<Vec<SeparacaoItem>, ServiceError> {
        let separacao = SeparacaoRepo::get(self.store.as_ref(), separacao_id).await?;
        if separacao.status != SeparacaoStatus::EmAndamento {
            return Err(CoreError::Conflict("separação já foi finalizada".into()).into());
        }

        let mut resolved = Vec::with_capacity(rows.len());
        for row in rows {
            let produto = self
                .catalog
                .find_by_codigo(&separacao.empresa, &row.codigo)
                .await?
                .ok_or_else(|| CoreError::not_found("Produto", &row.codigo))?;
            resolved.push((row, produto));
        }

        for existing in SeparacaoRepo::items(self.store.as_ref(), separacao_id).await? {
            SeparacaoRepo::delete_item(self.store.as_ref(), &existing.id).await?;
        }

        let mut items = Vec::with_capacity(resolved.len());
        for (row, produto) in resolved {
            let input = CreateSeparacaoItem {
                separacao: separacao_id.to_string(),
                produto_codigo: produto.codigo.clone(),
                produto_descricao: produto.descricao.clone(),
                localizacao: produto.localizacao.clone(),
                quantidade_requerida: row.quantidade,
                quantidade_separada: 0,
                quantidade_estoque_inicial: produto.quantidade,
            };
            items.push(SeparacaoRepo::create_item(self.store.as_ref(), &input).await?);
        }
        Ok(items)
    }

    /// Scan-driven picking: bump the picked quantity of the item matching
    /// the scanned code, or append a new line (required = picked = 1) when
    /// the code is not on the list yet.
    pub async fn add_item_by_code(
        &self,
        separacao_id: &str,
        codigo: &str,
    ) -> Result<SeparacaoItem, ServiceError> {
        let separacao = SeparacaoRepo::get(self.store.as_ref(), separacao_id).await?;
        if separacao.status != SeparacaoStatus::EmAndamento {
            return Err(CoreError::Conflict("separação já foi finalizada".into()).into());
        }

        let produto = self
            .catalog
            .find_by_codigo(&separacao.empresa, codigo)
            .await?
            .ok_or_else(|| CoreError::not_found("Produto", codigo))?;

        if let Some(item) =
            SeparacaoRepo::find_item(self.store.as_ref(), separacao_id, &produto.codigo).await?
        {
            return Ok(SeparacaoRepo::set_item_quantidade_separada(
                self.store.as_ref(),
                &item.id,
                item.quantidade_separada + 1,
            )
            .await?);
        }

        let input = CreateSeparacaoItem {
            separacao: separacao_id.to_string(),
            produto_codigo: produto.codigo.clone(),
            produto_descricao: produto.descricao.clone(),
            localizacao: produto.localizacao.clone(),
            quantidade_requerida: 1,
            quantidade_separada: 1,
            quantidade_estoque_inicial: produto.quantidade,
        };
        Ok(SeparacaoRepo::create_item(self.store.as_ref(), &input).await?)
    }

    /// Set an item's picked quantity directly (manual correction).
    pub async fn update_item_quantidade(
        &self,
        separacao_id: &str,
        item_id: &str,
        quantidade_separada: i64,
    ) -> Result<SeparacaoItem, ServiceError> {
        if quantidade_separada < 0 {
            return Err(
                CoreError::Validation("quantidade separada não pode ser negativa".into()).into(),
            );
        }
        let separacao = SeparacaoRepo::get(self.store.as_ref(), separacao_id).await?;
        if separacao.status != SeparacaoStatus::EmAndamento {
            return Err(CoreError::Conflict("separação já foi finalizada".into()).into());
        }
        Ok(SeparacaoRepo::set_item_quantidade_separada(
            self.store.as_ref(),
            item_id,
            quantidade_separada,
        )
        .await?)
    }

    /// Finalize picking: deduct every picked quantity from the live stock
    /// (each with a `saida` audit movement) and move the order to
    /// `aguardando entrega`.
    ///
    /// Deductions are enforced against the live quantity, not the snapshot
    /// taken when the item was added — picking past the stock fails here
    /// with [`CoreError::InsufficientStock`]. The run is not atomic: a
    /// mid-sequence failure leaves the earlier items deducted and the order
    /// still in progress. Item quantities should be corrected before
    /// retrying, because a retry deducts every picked quantity again.
    pub async fn finalizar(
        &self,
        separacao_id: &str,
        usuario_id: &str,
    ) -> Result<Separacao, ServiceError> {
        let separacao = SeparacaoRepo::get(self.store.as_ref(), separacao_id).await?;
        if separacao.status != SeparacaoStatus::EmAndamento {
            return Err(CoreError::Conflict("separação já foi finalizada".into()).into());
        }

        let items = SeparacaoRepo::items(self.store.as_ref(), separacao_id).await?;
        for item in items.iter().filter(|i| i.quantidade_separada > 0) {
            // Live read, bypassing the lookup cache: deductions run against
            // the current quantity, never a stale entry.
            let produto = ProdutoRepo::find_by_codigo(
                self.store.as_ref(),
                &separacao.empresa,
                &item.produto_codigo,
            )
            .await?
            .ok_or_else(|| CoreError::not_found("Produto", &item.produto_codigo))?;

            let nova_quantidade = movement::apply(
                &produto.codigo,
                produto.quantidade,
                MovementKind::Saida,
                item.quantidade_separada,
            )?;
            ProdutoRepo::set_quantidade(self.store.as_ref(), &produto.id, nova_quantidade).await?;
            self.catalog
                .cache()
                .invalidate_codes(&separacao.empresa, produto.all_codes());

            let movimento = CreateMovimentacao {
                empresa: separacao.empresa.clone(),
                produto_codigo: produto.codigo.clone(),
                produto_descricao: produto.descricao.clone(),
                tipo: MovementKind::Saida,
                quantidade: item.quantidade_separada,
                usuario: usuario_id.to_string(),
            };
            if let Err(err) = MovimentacaoRepo::create(self.store.as_ref(), &movimento).await {
                tracing::warn!(
                    codigo = %produto.codigo,
                    error = %err,
                    "Deduction written but movement append failed"
                );
                return Err(ServiceError::AuditTrail(err));
            }
        }

        let atualizado = SeparacaoRepo::set_status(
            self.store.as_ref(),
            separacao_id,
            SeparacaoStatus::AguardandoEntrega,
            Some(Utc::now()),
            Some(usuario_id),
            None,
        )
        .await?;
        tracing::info!(separacao = %separacao_id, "Separation finalized");
        Ok(atualizado)
    }

    /// Record the hand-off to the customer. Only orders awaiting delivery
    /// can be delivered; `entregue` is terminal.
    pub async fn confirmar_entrega(
        &self,
        separacao_id: &str,
        nome_recebedor: &str,
    ) -> Result<Separacao, ServiceError> {
        let nome = nome_recebedor.trim();
        if nome.is_empty() {
            return Err(CoreError::Validation("informe o nome do recebedor".into()).into());
        }
        let separacao = SeparacaoRepo::get(self.store.as_ref(), separacao_id).await?;
        if separacao.status != SeparacaoStatus::AguardandoEntrega {
            return Err(
                CoreError::Conflict("separação não está aguardando entrega".into()).into(),
            );
        }
        Ok(SeparacaoRepo::set_status(
            self.store.as_ref(),
            separacao_id,
            SeparacaoStatus::Entregue,
            None,
            None,
            Some(nome),
        )
        .await?)
    }
}
