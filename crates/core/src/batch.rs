//! Parsing and classification for spreadsheet-style bulk text inputs.
//!
//! Two paste formats exist:
//!
//! - **Product registration**: one product per line, tab-delimited —
//!   `CODE <tab> DESCRIPTION <tab> QUANTITY <tab> VALUE <tab> LOCATION`.
//!   Values may be Brazilian-formatted currency (`R$ 1.234,56`).
//! - **Pick lists**: one item per line, whitespace-delimited —
//!   `CODE [QUANTITY]`, quantity defaulting to 1.
//!
//! Classification ([`classify_rows`]) is pure: it receives the set of codes
//! already present in the database and decides, per row, whether it is new,
//! a duplicate to ignore, or malformed. The caller is responsible for
//! fetching the existing codes (including inactive products and alternate
//! codes) and for the actual creation pass.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One parsed line of the bulk product registration paste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    /// Primary code, trimmed and uppercased.
    pub codigo: String,
    pub descricao: String,
    /// Initial on-hand quantity; negative input is clamped to zero.
    pub quantidade: i64,
    /// Unit value in currency units.
    pub valor: f64,
    /// Storage location, trimmed and uppercased.
    pub localizacao: String,
    /// Alternate codes, lowercase-deduplicated against the primary.
    #[serde(default)]
    pub codigos_alternativos: Vec<String>,
}

impl ProductRow {
    /// All codes this row claims, lowercased (primary first).
    pub fn all_codes_lowercase(&self) -> Vec<String> {
        std::iter::once(&self.codigo)
            .chain(self.codigos_alternativos.iter())
            .map(|c| c.to_lowercase())
            .collect()
    }
}

/// One parsed line of a pick-list paste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickRow {
    pub codigo: String,
    pub quantidade: i64,
}

/// Outcome of validating one candidate row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    /// New product, safe to create.
    Novo,
    /// Duplicate (in the database or earlier in the batch); skipped.
    Ignorado,
    /// Malformed row (missing required field or non-positive value).
    Erro,
}

/// A candidate row together with its classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatedRow {
    pub row: ProductRow,
    pub status: RowStatus,
    /// Human-readable reason when the row is not `Novo`.
    pub message: Option<String>,
}

/// Parse the tab-delimited product paste into rows.
///
/// Blank lines are skipped. Missing columns default to empty / zero so the
/// row surfaces as an error during classification instead of being dropped
/// silently.
pub fn parse_product_lines(text: &str) -> Vec<ProductRow> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut parts = line.split('\t');
            let codigo = parts.next().unwrap_or("").trim().to_uppercase();
            let descricao = parts.next().unwrap_or("").trim().to_string();
            let quantidade = parts
                .next()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(0)
                .max(0);
            let valor = parse_currency(parts.next().unwrap_or("")).max(0.0);
            let localizacao = parts.next().unwrap_or("").trim().to_uppercase();
            ProductRow {
                codigo,
                descricao,
                quantidade,
                valor,
                localizacao,
                codigos_alternativos: Vec::new(),
            }
        })
        .collect()
}

/// Parse a Brazilian-formatted currency string (`R$ 1.234,56`) into a float.
///
/// Strips the `R$` prefix and whitespace, drops thousands separators, and
/// treats the comma as the decimal separator. Unparseable input yields 0.0.
pub fn parse_currency(raw: &str) -> f64 {
    let cleaned: String = raw
        .replace("R$", "")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

/// Parse a pick-list paste: `CODE [QUANTITY]` per line, whitespace-delimited.
///
/// Quantity defaults to 1 when absent or unparseable; rows with an empty
/// code or non-positive quantity are dropped.
pub fn parse_pick_lines(text: &str) -> Vec<PickRow> {
    text.lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let codigo = parts.next()?.trim().to_uppercase();
            let quantidade = parts
                .next()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .unwrap_or(1);
            if codigo.is_empty() || quantidade <= 0 {
                None
            } else {
                Some(PickRow { codigo, quantidade })
            }
        })
        .collect()
}

/// Classify candidate rows against the set of existing codes.
///
/// `existing_codes` must contain every code already in the database for the
/// company — primary and alternate, lowercased, including inactive products.
///
/// Per row, in order:
/// - blank code, blank description, non-positive value, or blank location
///   ⇒ [`RowStatus::Erro`];
/// - any of the row's codes already in `existing_codes`
///   ⇒ [`RowStatus::Ignorado`] (duplicate in database);
/// - any of the row's codes claimed by an earlier `Novo` row of this batch
///   ⇒ [`RowStatus::Ignorado`] (duplicate within batch);
/// - otherwise ⇒ [`RowStatus::Novo`], and its codes join the batch set.
pub fn classify_rows(existing_codes: &HashSet<String>, rows: Vec<ProductRow>) -> Vec<ValidatedRow> {
    let mut batch_codes: HashSet<String> = HashSet::new();

    rows.into_iter()
        .map(|row| {
            if row.codigo.is_empty()
                || row.descricao.is_empty()
                || row.valor <= 0.0
                || row.localizacao.is_empty()
            {
                return ValidatedRow {
                    row,
                    status: RowStatus::Erro,
                    message: Some("Dados incompletos.".into()),
                };
            }

            for code in row.all_codes_lowercase() {
                if existing_codes.contains(&code) {
                    return ValidatedRow {
                        row,
                        status: RowStatus::Ignorado,
                        message: Some(format!("Código \"{code}\" já existe no banco de dados.")),
                    };
                }
                if batch_codes.contains(&code) {
                    return ValidatedRow {
                        row,
                        status: RowStatus::Ignorado,
                        message: Some(format!("Código \"{code}\" duplicado neste lote.")),
                    };
                }
            }

            for code in row.all_codes_lowercase() {
                batch_codes.insert(code);
            }
            ValidatedRow {
                row,
                status: RowStatus::Novo,
                message: None,
            }
        })
        .collect()
}
