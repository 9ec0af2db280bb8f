//! Full-database export and destructive import.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::ProductCache;
use crate::store::{Collection, Query, RawRecord, RecordStore};

use super::ServiceError;

/// A complete snapshot of every collection, keyed by wire name. The
/// exported records keep their original ids so relations inside the file
/// stay resolvable; import assigns fresh ids and remaps them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default)]
    pub empresas: Vec<RawRecord>,
    #[serde(default)]
    pub users: Vec<RawRecord>,
    #[serde(default)]
    pub produtos: Vec<RawRecord>,
    #[serde(default)]
    pub movimentacoes: Vec<RawRecord>,
    #[serde(default)]
    pub separacoes: Vec<RawRecord>,
    #[serde(default)]
    pub separacao_itens: Vec<RawRecord>,
    #[serde(default)]
    pub contagens: Vec<RawRecord>,
    #[serde(default)]
    pub contagem_itens: Vec<RawRecord>,
}

impl BackupData {
    fn records(&self, collection: Collection) -> &[RawRecord] {
        match collection {
            Collection::Empresas => &self.empresas,
            Collection::Users => &self.users,
            Collection::Produtos => &self.produtos,
            Collection::Movimentacoes => &self.movimentacoes,
            Collection::Separacoes => &self.separacoes,
            Collection::SeparacaoItens => &self.separacao_itens,
            Collection::Contagens => &self.contagens,
            Collection::ContagemItens => &self.contagem_itens,
        }
    }

    fn records_mut(&mut self, collection: Collection) -> &mut Vec<RawRecord> {
        match collection {
            Collection::Empresas => &mut self.empresas,
            Collection::Users => &mut self.users,
            Collection::Produtos => &mut self.produtos,
            Collection::Movimentacoes => &mut self.movimentacoes,
            Collection::Separacoes => &mut self.separacoes,
            Collection::SeparacaoItens => &mut self.separacao_itens,
            Collection::Contagens => &mut self.contagens,
            Collection::ContagemItens => &mut self.contagem_itens,
        }
    }

    pub fn total_records(&self) -> usize {
        Collection::ALL
            .iter()
            .map(|c| self.records(*c).len())
            .sum()
    }
}

/// Counters for an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
    /// Records dropped because a required relation could not be remapped
    /// (its referent was itself skipped or absent from the file).
    pub skipped: usize,
}

/// Relations pointing at other collections, per collection. `required`
/// relations drop the record when unmappable; optional ones drop only the
/// field.
struct Relation {
    field: &'static str,
    target: Collection,
    required: bool,
    /// `empresas` on users is a list of ids, not a single id.
    multi: bool,
}

fn relations_of(collection: Collection) -> &'static [Relation] {
    const NONE: &[Relation] = &[];
    match collection {
        Collection::Empresas => NONE,
        Collection::Users => &[Relation {
            field: "empresas",
            target: Collection::Empresas,
            required: false,
            multi: true,
        }],
        Collection::Produtos => &[Relation {
            field: "empresa",
            target: Collection::Empresas,
            required: true,
            multi: false,
        }],
        Collection::Movimentacoes => &[
            Relation {
                field: "empresa",
                target: Collection::Empresas,
                required: true,
                multi: false,
            },
            Relation {
                field: "usuario",
                target: Collection::Users,
                required: false,
                multi: false,
            },
        ],
        Collection::Separacoes => &[
            Relation {
                field: "empresa",
                target: Collection::Empresas,
                required: true,
                multi: false,
            },
            Relation {
                field: "usuario",
                target: Collection::Users,
                required: false,
                multi: false,
            },
        ],
        Collection::SeparacaoItens => &[Relation {
            field: "separacao",
            target: Collection::Separacoes,
            required: true,
            multi: false,
        }],
        Collection::Contagens => &[Relation {
            field: "empresa",
            target: Collection::Empresas,
            required: true,
            multi: false,
        }],
        Collection::ContagemItens => &[Relation {
            field: "contagem",
            target: Collection::Contagens,
            required: true,
            multi: false,
        }],
    }
}

#[derive(Clone)]
pub struct BackupService {
    store: Arc<dyn RecordStore>,
    cache: Arc<ProductCache>,
}

impl BackupService {
    pub fn new(store: Arc<dyn RecordStore>, cache: Arc<ProductCache>) -> Self {
        Self { store, cache }
    }

    /// Export every record of every collection.
    pub async fn export(&self) -> Result<BackupData, ServiceError> {
        let mut data = BackupData::default();
        for collection in Collection::ALL {
            let records = self.store.list(collection, &Query::default()).await?;
            *data.records_mut(collection) = records;
        }
        tracing::info!(records = data.total_records(), "Backup exported");
        Ok(data)
    }

    /// Replace the entire database with the snapshot.
    ///
    /// Existing records are deleted in reverse dependency order, then the
    /// snapshot is recreated in dependency order with fresh ids; relation
    /// fields are remapped from the old ids to the new ones. A record whose
    /// required relation cannot be remapped is skipped and counted, which
    /// cascades to its own dependents. Not atomic: a mid-run failure leaves
    /// the database partially restored.
    pub async fn import(&self, data: BackupData) -> Result<ImportOutcome, ServiceError> {
        for collection in Collection::ALL.iter().rev() {
            let existing = self.store.list(*collection, &Query::default()).await?;
            for record in existing {
                self.store.delete(*collection, &record.id).await?;
            }
        }

        // (collection, old id) -> new id.
        let mut id_map: HashMap<(Collection, String), String> = HashMap::new();
        let mut outcome = ImportOutcome::default();

        for collection in Collection::ALL {
            for record in data.records(collection) {
                let mut fields = record.fields.clone();
                let mut skip = false;

                for relation in relations_of(collection) {
                    match remap_relation(&mut fields, relation, &id_map) {
                        RemapResult::Ok => {}
                        RemapResult::Dropped if !relation.required => {}
                        _ => {
                            skip = true;
                            break;
                        }
                    }
                }
                if skip {
                    tracing::warn!(
                        collection = %collection,
                        id = %record.id,
                        "Skipping record with unmappable required relation"
                    );
                    outcome.skipped += 1;
                    continue;
                }

                let created = self.store.create(collection, fields).await?;
                id_map.insert((collection, record.id.clone()), created.id);
                outcome.imported += 1;
            }
        }

        self.cache.clear();
        tracing::info!(
            imported = outcome.imported,
            skipped = outcome.skipped,
            "Backup imported"
        );
        Ok(outcome)
    }
}

enum RemapResult {
    Ok,
    Dropped,
}

fn remap_relation(
    fields: &mut serde_json::Map<String, Value>,
    relation: &Relation,
    id_map: &HashMap<(Collection, String), String>,
) -> RemapResult {
    let Some(value) = fields.get(relation.field).cloned() else {
        return RemapResult::Dropped;
    };

    if relation.multi {
        let old_ids: Vec<String> = match value {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        // Unmappable entries in a list are dropped individually.
        let new_ids: Vec<Value> = old_ids
            .into_iter()
            .filter_map(|old| id_map.get(&(relation.target, old)).cloned())
            .map(Value::String)
            .collect();
        fields.insert(relation.field.into(), Value::Array(new_ids));
        return RemapResult::Ok;
    }

    let Some(old_id) = value.as_str().filter(|s| !s.is_empty()).map(str::to_string) else {
        return RemapResult::Dropped;
    };
    match id_map.get(&(relation.target, old_id)) {
        Some(new_id) => {
            fields.insert(relation.field.into(), Value::String(new_id.clone()));
            RemapResult::Ok
        }
        None => {
            // Optional relations keep the field, blanked, so decoders that
            // require it still parse.
            fields.insert(relation.field.into(), Value::String(String::new()));
            RemapResult::Dropped
        }
    }
}
