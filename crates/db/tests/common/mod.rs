//! Shared fixtures for the workflow integration tests.
//!
//! Everything runs against an in-process [`MemoryStore`], so each test gets
//! a fresh, isolated database with no external services.

use std::sync::Arc;

use estoque_db::cache::ProductCache;
use estoque_db::models::empresa::CreateEmpresa;
use estoque_db::models::produto::{CreateProduto, Produto, ProdutoStatus};
use estoque_db::repositories::{EmpresaRepo, ProdutoRepo};
use estoque_db::services::{
    BackupService, CatalogService, ContagemService, SeparacaoService, StockService,
};
use estoque_db::{MemoryStore, RecordStore};

pub struct TestEnv {
    pub store: Arc<dyn RecordStore>,
    pub cache: Arc<ProductCache>,
    pub catalog: CatalogService,
    pub stock: StockService,
    pub contagens: ContagemService,
    pub separacoes: SeparacaoService,
    pub backup: BackupService,
}

pub fn test_env() -> TestEnv {
    let store: Arc<dyn RecordStore> = Arc::new(MemoryStore::new());
    let cache = Arc::new(ProductCache::new());
    let catalog = CatalogService::new(store.clone(), cache.clone());
    TestEnv {
        stock: StockService::new(store.clone(), cache.clone()),
        contagens: ContagemService::new(store.clone(), catalog.clone()),
        separacoes: SeparacaoService::new(store.clone(), catalog.clone()),
        backup: BackupService::new(store.clone(), cache.clone()),
        store,
        cache,
        catalog,
    }
}

pub async fn seed_empresa(env: &TestEnv, nome: &str) -> String {
    EmpresaRepo::create(env.store.as_ref(), &CreateEmpresa { nome: nome.into() })
        .await
        .unwrap()
        .id
}

pub fn new_produto(empresa_id: &str, codigo: &str, quantidade: i64) -> CreateProduto {
    CreateProduto {
        empresa: empresa_id.to_string(),
        codigo: codigo.to_string(),
        descricao: format!("Peça {codigo}"),
        valor: 10.0,
        quantidade,
        localizacao: "A1".to_string(),
        status: ProdutoStatus::Ativo,
        codigos_alternativos: Vec::new(),
    }
}

/// Create a product directly through the repository (no initial movement).
pub async fn seed_produto(env: &TestEnv, empresa_id: &str, codigo: &str, quantidade: i64) -> Produto {
    ProdutoRepo::create(env.store.as_ref(), &new_produto(empresa_id, codigo, quantidade))
        .await
        .unwrap()
}
