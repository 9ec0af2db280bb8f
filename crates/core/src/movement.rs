//! Stock quantity arithmetic.
//!
//! Every quantity change in the system flows through [`apply`], and every
//! count reconciliation through [`discrepancy`] / [`adjustment_for`]. These
//! are the rules the rest of the codebase must not reimplement ad hoc:
//! quantities never go negative, and outbound movements larger than the
//! current stock are rejected outright.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Direction of a stock movement. Wire values match the audit collection
/// (`entrada` = in, `saida` = out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "entrada")]
    Entrada,
    #[serde(rename = "saida")]
    Saida,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Entrada => "entrada",
            Self::Saida => "saida",
        }
    }
}

impl std::fmt::Display for MovementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MovementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entrada" => Ok(Self::Entrada),
            "saida" => Ok(Self::Saida),
            other => Err(format!("unknown movement kind: {other}")),
        }
    }
}

/// Compute the new on-hand quantity after applying a movement.
///
/// Rules:
/// - the requested quantity must be strictly positive;
/// - `Entrada` adds exactly the requested amount;
/// - `Saida` subtracts it, and is rejected with
///   [`CoreError::InsufficientStock`] when the request exceeds `current`.
///
/// `product` is only used for the error message.
pub fn apply(
    product: &str,
    current: i64,
    kind: MovementKind,
    quantity: i64,
) -> Result<i64, CoreError> {
    if quantity <= 0 {
        return Err(CoreError::Validation(
            "movement quantity must be greater than zero".into(),
        ));
    }
    match kind {
        MovementKind::Entrada => Ok(current + quantity),
        MovementKind::Saida => {
            if quantity > current {
                Err(CoreError::InsufficientStock {
                    product: product.to_string(),
                    available: current,
                    requested: quantity,
                })
            } else {
                Ok(current - quantity)
            }
        }
    }
}

/// Signed discrepancy of a count item: counted minus system snapshot.
pub fn discrepancy(counted: i64, system: i64) -> i64 {
    counted - system
}

/// The compensating movement for a count discrepancy, or `None` when the
/// counted quantity matches the system snapshot (no adjustment, no audit
/// entry).
pub fn adjustment_for(counted: i64, system: i64) -> Option<(MovementKind, i64)> {
    match discrepancy(counted, system) {
        0 => None,
        d if d > 0 => Some((MovementKind::Entrada, d)),
        d => Some((MovementKind::Saida, -d)),
    }
}
