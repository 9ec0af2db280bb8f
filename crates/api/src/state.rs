use std::sync::Arc;

use estoque_core::prefs::PrefsStore;
use estoque_db::cache::ProductCache;
use estoque_db::services::{
    BackupService, CatalogService, ContagemService, SeparacaoService, StockService,
};
use estoque_db::RecordStore;

use crate::config::ServerConfig;

/// Shared application state available to all axum handlers via
/// `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already
/// `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// The record store every repository call goes through.
    pub store: Arc<dyn RecordStore>,
    /// Keyed product lookup cache shared by the services.
    pub cache: Arc<ProductCache>,
    pub catalog: CatalogService,
    pub stock: StockService,
    pub contagens: ContagemService,
    pub separacoes: SeparacaoService,
    pub backup: BackupService,
    /// Local presentation preferences (theme, label presets).
    pub prefs: Arc<dyn PrefsStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Wire up the service graph over the given store.
    pub fn new(
        store: Arc<dyn RecordStore>,
        prefs: Arc<dyn PrefsStore>,
        config: Arc<ServerConfig>,
    ) -> Self {
        let cache = Arc::new(ProductCache::new());
        let catalog = CatalogService::new(store.clone(), cache.clone());
        Self {
            stock: StockService::new(store.clone(), cache.clone()),
            contagens: ContagemService::new(store.clone(), catalog.clone()),
            separacoes: SeparacaoService::new(store.clone(), catalog.clone()),
            backup: BackupService::new(store.clone(), cache.clone()),
            store,
            cache,
            catalog,
            prefs,
            config,
        }
    }
}
