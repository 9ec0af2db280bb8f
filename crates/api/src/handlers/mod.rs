//! HTTP request handlers, one module per resource.

pub mod auth;
pub mod backup;
pub mod contagens;
pub mod empresas;
pub mod movimentacoes;
pub mod prefs;
pub mod produtos;
pub mod separacoes;
pub mod users;
