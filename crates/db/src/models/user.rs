//! User account model and DTOs.

use estoque_core::roles::Role;
use estoque_core::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// A user account. `empresas` is the company-access list; admins see every
/// company regardless.
///
/// The Argon2id password hash is deserialize-only: it never leaves the
/// storage layer in API responses or backups that serialize this model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub username: String,
    pub role: Role,
    /// Ids of the companies this user may operate on.
    #[serde(default)]
    pub empresas: Vec<RecordId>,
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
}

/// DTO for creating a user. The hash is produced by the auth layer; raw
/// passwords never reach the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub empresas: Vec<RecordId>,
    pub password_hash: String,
}

/// DTO for patching a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresas: Option<Vec<RecordId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
}
