//! In-memory [`RecordStore`] used by tests and by deployments that do not
//! point at a remote backend.
//!
//! Semantics mirror the remote store: server-assigned 15-character ids,
//! `created`/`updated` timestamps, shallow patch merge on update, and the
//! same filter/sort behavior (via structural evaluation instead of the
//! rendered expression).

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use rand::distr::{Alphanumeric, SampleString};
use serde_json::{Map, Value};

use super::{Collection, Filter, Query, RawRecord, RecordStore, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, Vec<RawRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend-style id: 15 lowercase alphanumeric characters.
    fn new_id() -> String {
        Alphanumeric
            .sample_string(&mut rand::rng(), 15)
            .to_lowercase()
    }

    fn sorted(mut records: Vec<RawRecord>, query: &Query) -> Vec<RawRecord> {
        if !query.sort.is_empty() {
            records.sort_by(|a, b| {
                for key in &query.sort {
                    let ord = compare_fields(a.field(&key.field), b.field(&key.field));
                    let ord = if key.descending { ord.reverse() } else { ord };
                    if ord != std::cmp::Ordering::Equal {
                        return ord;
                    }
                }
                std::cmp::Ordering::Equal
            });
        }
        records
    }
}

/// Field ordering for sorts: numbers numerically, strings lexicographically
/// (covers RFC 3339 timestamps), missing fields first.
fn compare_fields(a: Option<Value>, b: Option<Value>) -> std::cmp::Ordering {
    match (a, b) {
        (None, None) => std::cmp::Ordering::Equal,
        (None, Some(_)) => std::cmp::Ordering::Less,
        (Some(_), None) => std::cmp::Ordering::Greater,
        (Some(a), Some(b)) => {
            if let (Some(x), Some(y)) = (a.as_f64(), b.as_f64()) {
                x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                a.as_str()
                    .unwrap_or_default()
                    .cmp(b.as_str().unwrap_or_default())
            }
        }
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self, collection: Collection, query: &Query) -> Result<Vec<RawRecord>, StoreError> {
        let collections = self.collections.read().expect("store lock poisoned");
        let records = collections
            .get(&collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| query.filter.as_ref().is_none_or(|f| f.matches(r)))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Ok(Self::sorted(records, query))
    }

    async fn first(&self, collection: Collection, filter: &Filter) -> Result<Option<RawRecord>, StoreError> {
        let collections = self.collections.read().expect("store lock poisoned");
        Ok(collections
            .get(&collection)
            .and_then(|records| records.iter().find(|r| filter.matches(r)).cloned()))
    }

    async fn get(&self, collection: Collection, id: &str) -> Result<RawRecord, StoreError> {
        let collections = self.collections.read().expect("store lock poisoned");
        collections
            .get(&collection)
            .and_then(|records| records.iter().find(|r| r.id == id).cloned())
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            })
    }

    async fn create(&self, collection: Collection, fields: Map<String, Value>) -> Result<RawRecord, StoreError> {
        let now = Utc::now();
        let record = RawRecord {
            id: Self::new_id(),
            created: now,
            updated: now,
            fields,
        };
        let mut collections = self.collections.write().expect("store lock poisoned");
        collections.entry(collection).or_default().push(record.clone());
        Ok(record)
    }

    async fn update(&self, collection: Collection, id: &str, patch: Map<String, Value>) -> Result<RawRecord, StoreError> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        let records = collections.entry(collection).or_default();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            })?;
        for (key, value) in patch {
            record.fields.insert(key, value);
        }
        record.updated = Utc::now();
        Ok(record.clone())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().expect("store lock poisoned");
        let records = collections.entry(collection).or_default();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound {
                collection: collection.name(),
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
