//! HTTP-backed [`RecordStore`] speaking the hosted record service's REST
//! API (PocketBase-compatible).
//!
//! Reads are paginated server-side; [`RecordStore::list`] drains every page
//! so callers always see the full result set, matching the in-memory store.
//! A 404 on a single-record read maps to the trait's "not found" outcomes;
//! every other non-success status becomes [`StoreError::Backend`].

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{Collection, Filter, Query, RawRecord, RecordStore, StoreError};

/// Records fetched per page when draining a list.
const PAGE_SIZE: usize = 500;

/// Record-metadata keys the backend attaches that are not data fields.
const META_KEYS: &[&str] = &["collectionId", "collectionName", "expand"];

pub struct RemoteStore {
    http: reqwest::Client,
    base_url: String,
    /// Bearer token obtained from [`RemoteStore::auth_with_password`].
    token: RwLock<Option<String>>,
}

/// One page of a paginated list response.
#[derive(Debug, Deserialize)]
struct ListPage {
    #[serde(rename = "totalPages")]
    total_pages: u64,
    items: Vec<RawRecord>,
}

/// Response of a password auth call: session token plus the user record.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub record: RawRecord,
}

impl RemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        }
    }

    fn records_url(&self, collection: Collection) -> String {
        format!("{}/api/collections/{}/records", self.base_url, collection.name())
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, url);
        if let Some(token) = self.token.read().expect("token lock poisoned").as_deref() {
            builder = builder.header("Authorization", token);
        }
        builder
    }

    /// Authenticate against the `users` collection, retaining the session
    /// token for subsequent requests.
    pub async fn auth_with_password(
        &self,
        identity: &str,
        password: &str,
    ) -> Result<AuthResponse, StoreError> {
        let url = format!(
            "{}/api/collections/users/auth-with-password",
            self.base_url
        );
        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({ "identity": identity, "password": password }))
            .send()
            .await?;
        let auth: AuthResponse = Self::parse(response).await?;
        *self.token.write().expect("token lock poisoned") = Some(auth.token.clone());
        Ok(auth)
    }

    /// Drop the retained session token.
    pub fn clear_auth(&self) {
        *self.token.write().expect("token lock poisoned") = None;
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend {
                status: status.as_u16(),
                message,
            });
        }
        let mut value: Value = response.json().await?;
        strip_meta(&mut value);
        Ok(serde_json::from_value(value)?)
    }
}

/// Remove backend record metadata so it never leaks into data fields
/// (notably: backup export must not dump `collectionId` into the file).
fn strip_meta(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in META_KEYS {
                map.remove(*key);
            }
            for nested in map.values_mut() {
                strip_meta(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                strip_meta(item);
            }
        }
        _ => {}
    }
}

#[async_trait]
impl RecordStore for RemoteStore {
    async fn list(&self, collection: Collection, query: &Query) -> Result<Vec<RawRecord>, StoreError> {
        let filter = query.filter.as_ref().map(Filter::render).unwrap_or_default();
        let sort = query.render_sort();

        let mut records = Vec::new();
        let mut page = 1u64;
        loop {
            let mut request = self
                .request(reqwest::Method::GET, &self.records_url(collection))
                .query(&[("page", page.to_string()), ("perPage", PAGE_SIZE.to_string())]);
            if !filter.is_empty() {
                request = request.query(&[("filter", filter.as_str())]);
            }
            if !sort.is_empty() {
                request = request.query(&[("sort", sort.as_str())]);
            }
            let parsed: ListPage = Self::parse(request.send().await?).await?;
            records.extend(parsed.items);
            if page >= parsed.total_pages.max(1) {
                break;
            }
            page += 1;
        }
        Ok(records)
    }

    async fn first(&self, collection: Collection, filter: &Filter) -> Result<Option<RawRecord>, StoreError> {
        let request = self
            .request(reqwest::Method::GET, &self.records_url(collection))
            .query(&[
                ("page", "1".to_string()),
                ("perPage", "1".to_string()),
                ("filter", filter.render()),
            ]);
        let parsed: ListPage = Self::parse(request.send().await?).await?;
        Ok(parsed.items.into_iter().next())
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<RawRecord, StoreError> {
        let url = format!("{}/{id}", self.records_url(collection));
        let response = self.request(reqwest::Method::GET, &url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            });
        }
        Self::parse(response).await
    }

    async fn create(&self, collection: Collection, fields: Map<String, Value>) -> Result<RawRecord, StoreError> {
        let response = self
            .request(reqwest::Method::POST, &self.records_url(collection))
            .json(&Value::Object(fields))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn update(&self, collection: Collection, id: &str, patch: Map<String, Value>) -> Result<RawRecord, StoreError> {
        let url = format!("{}/{id}", self.records_url(collection));
        let response = self
            .request(reqwest::Method::PATCH, &url)
            .json(&Value::Object(patch))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            });
        }
        Self::parse(response).await
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/{id}", self.records_url(collection));
        let response = self.request(reqwest::Method::DELETE, &url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            }),
            status if status.is_success() => Ok(()),
            status => Err(StoreError::Backend {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_meta_removes_backend_keys() {
        let mut value = serde_json::json!({
            "items": [{
                "id": "r1",
                "collectionId": "abc",
                "collectionName": "produtos",
                "codigo": "A1",
            }]
        });
        strip_meta(&mut value);
        assert!(value["items"][0].get("collectionId").is_none());
        assert_eq!(value["items"][0]["codigo"], "A1");
    }

    #[test]
    fn test_base_url_trailing_slash_normalized() {
        let store = RemoteStore::new("https://example.com/");
        assert_eq!(
            store.records_url(Collection::Produtos),
            "https://example.com/api/collections/produtos/records"
        );
    }
}
