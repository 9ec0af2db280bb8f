//! HTTP surface for the estoque inventory platform.
//!
//! Thin axum layer over the workflow services in `estoque_db`: JWT
//! authentication, per-company access checks, the `{ "data": ... }`
//! response envelope, and a consistent JSON error format.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod prefs;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
