//! Keyed product lookup cache.
//!
//! Single-product lookups by code are the hottest read path (scanners fire
//! them repeatedly), so resolved products are cached under
//! `(company id, lowercased code)`. Invalidation is scoped: editing a
//! product drops only the entries for its own codes, and company-wide
//! clears exist for the destructive paths (backup import). A wholesale
//! clear of unrelated companies' entries is never needed.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::produto::Produto;

#[derive(Default)]
pub struct ProductCache {
    inner: Mutex<HashMap<(String, String), Produto>>,
}

impl ProductCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(empresa_id: &str, codigo: &str) -> (String, String) {
        (empresa_id.to_string(), codigo.to_lowercase())
    }

    pub fn get(&self, empresa_id: &str, codigo: &str) -> Option<Produto> {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .get(&Self::key(empresa_id, codigo))
            .cloned()
    }

    /// Cache a product under the code it was looked up by.
    pub fn insert(&self, empresa_id: &str, codigo: &str, produto: Produto) {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .insert(Self::key(empresa_id, codigo), produto);
    }

    /// Drop the entries for a product's codes within its company. Callers
    /// pass every code the product is reachable by — for edits that means
    /// the old codes and the new ones.
    pub fn invalidate_codes<'a>(&self, empresa_id: &str, codes: impl IntoIterator<Item = &'a str>) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");
        for code in codes {
            inner.remove(&Self::key(empresa_id, code));
        }
    }

    /// Drop every entry for a company.
    pub fn invalidate_empresa(&self, empresa_id: &str) {
        self.inner
            .lock()
            .expect("cache lock poisoned")
            .retain(|(empresa, _), _| empresa != empresa_id);
    }

    /// Drop everything. Only the destructive flows (backup import) need
    /// this.
    pub fn clear(&self) {
        self.inner.lock().expect("cache lock poisoned").clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::produto::ProdutoStatus;
    use chrono::Utc;

    fn produto(codigo: &str) -> Produto {
        Produto {
            id: "p1".into(),
            created: Utc::now(),
            updated: Utc::now(),
            empresa: "e1".into(),
            codigo: codigo.into(),
            descricao: "peça".into(),
            valor: 1.0,
            quantidade: 5,
            localizacao: "A1".into(),
            status: ProdutoStatus::Ativo,
            codigos_alternativos: vec!["ALT-1".into()],
        }
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let cache = ProductCache::new();
        cache.insert("e1", "ABC", produto("ABC"));
        assert!(cache.get("e1", "abc").is_some());
        assert!(cache.get("e2", "abc").is_none(), "scoped by company");
    }

    #[test]
    fn test_invalidate_codes_is_scoped() {
        let cache = ProductCache::new();
        cache.insert("e1", "ABC", produto("ABC"));
        cache.insert("e1", "XYZ", produto("XYZ"));
        cache.insert("e2", "ABC", produto("ABC"));

        cache.invalidate_codes("e1", ["abc"]);
        assert!(cache.get("e1", "ABC").is_none());
        assert!(cache.get("e1", "XYZ").is_some(), "other products untouched");
        assert!(cache.get("e2", "ABC").is_some(), "other companies untouched");
    }

    #[test]
    fn test_invalidate_empresa() {
        let cache = ProductCache::new();
        cache.insert("e1", "ABC", produto("ABC"));
        cache.insert("e2", "ABC", produto("ABC"));
        cache.invalidate_empresa("e1");
        assert!(cache.get("e1", "ABC").is_none());
        assert!(cache.get("e2", "ABC").is_some());
    }
}
