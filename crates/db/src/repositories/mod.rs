//! Per-collection repositories.
//!
//! Each repository translates application intents into filters and record
//! mutations against the [`crate::store::RecordStore`] trait, decoding the
//! untyped records into the typed models. Repositories stay single-call;
//! multi-step orchestration belongs to [`crate::services`].

mod contagem_repo;
mod empresa_repo;
mod movimentacao_repo;
mod produto_repo;
mod separacao_repo;
mod user_repo;

pub use contagem_repo::ContagemRepo;
pub use empresa_repo::EmpresaRepo;
pub use movimentacao_repo::{MovimentacaoRepo, MovimentoFilters};
pub use produto_repo::{ProdutoRepo, ProdutoListOptions};
pub use separacao_repo::SeparacaoRepo;
pub use user_repo::UserRepo;
