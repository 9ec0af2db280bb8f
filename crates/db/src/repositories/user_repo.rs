//! Repository for the `users` collection.

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::store::{encode_fields, Collection, Filter, Query, RecordStore, Sort, StoreError};

/// CRUD operations for user accounts.
pub struct UserRepo;

impl UserRepo {
    /// All users, sorted by username.
    pub async fn list_all(store: &dyn RecordStore) -> Result<Vec<User>, StoreError> {
        let query = Query::default().sorted_by(vec![Sort::asc("username")]);
        store
            .list(Collection::Users, &query)
            .await?
            .iter()
            .map(|r| r.decode())
            .collect()
    }

    pub async fn find_by_username(
        store: &dyn RecordStore,
        username: &str,
    ) -> Result<Option<User>, StoreError> {
        store
            .first(Collection::Users, &Filter::eq("username", username))
            .await?
            .map(|r| r.decode())
            .transpose()
    }

    pub async fn create(store: &dyn RecordStore, input: &CreateUser) -> Result<User, StoreError> {
        store
            .create(Collection::Users, encode_fields(input)?)
            .await?
            .decode()
    }

    pub async fn update(
        store: &dyn RecordStore,
        id: &str,
        input: &UpdateUser,
    ) -> Result<User, StoreError> {
        store.update(Collection::Users, id, encode_fields(input)?).await?.decode()
    }

    pub async fn get(store: &dyn RecordStore, id: &str) -> Result<User, StoreError> {
        store.get(Collection::Users, id).await?.decode()
    }
}
