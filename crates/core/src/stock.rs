//! Stock movement kinds and their effect on on-hand quantities.

use crate::validation::{require_bounded, validate_non_negative};

pub const KIND_IN: &str = "in";
pub const KIND_OUT: &str = "out";
pub const KIND_ADJUSTMENT: &str = "adjustment";
pub const KIND_TRANSFER: &str = "transfer";

pub const VALID_KINDS: &[&str] = &[KIND_IN, KIND_OUT, KIND_ADJUSTMENT, KIND_TRANSFER];

/// Fields of a movement that the rules below look at.
#[derive(Debug, Clone, Copy)]
pub struct MovementShape<'a> {
    pub kind: &'a str,
    pub quantity: f64,
    pub warehouse: &'a str,
    pub destination_warehouse: Option<&'a str>,
    pub unit_cost: Option<f64>,
}

/// Validate a movement as a whole.
///
/// - `in`, `out`, `transfer`: quantity strictly positive.
/// - `adjustment`: quantity signed but non-zero.
/// - `transfer` requires a destination different from the source; other
///   kinds must not carry one.
pub fn validate_movement(m: &MovementShape<'_>) -> Result<(), String> {
    if !VALID_KINDS.contains(&m.kind) {
        return Err(format!(
            "Invalid movement kind '{}'. Must be one of: {}",
            m.kind,
            VALID_KINDS.join(", ")
        ));
    }
    require_bounded("quantity", m.quantity)?;
    if m.kind == KIND_ADJUSTMENT {
        if m.quantity == 0.0 {
            return Err("Adjustment quantity cannot be zero".to_string());
        }
    } else if m.quantity <= 0.0 {
        return Err(format!(
            "Quantity must be positive for '{}' movements, got {}",
            m.kind, m.quantity
        ));
    }

    if m.warehouse.trim().is_empty() {
        return Err("warehouse cannot be empty".to_string());
    }

    match (m.kind, m.destination_warehouse) {
        (KIND_TRANSFER, None) => {
            return Err("Transfers require a destination_warehouse".to_string());
        }
        (KIND_TRANSFER, Some(dest)) if dest.trim().is_empty() => {
            return Err("destination_warehouse cannot be empty".to_string());
        }
        (KIND_TRANSFER, Some(dest)) if dest == m.warehouse => {
            return Err("Transfer destination must differ from the source warehouse".to_string());
        }
        (KIND_TRANSFER, Some(_)) => {}
        (_, Some(_)) => {
            return Err("Only transfers may set destination_warehouse".to_string());
        }
        (_, None) => {}
    }

    if let Some(cost) = m.unit_cost {
        validate_non_negative("unit_cost", cost)?;
    }
    Ok(())
}

/// Signed effect of a movement on its source warehouse.
pub fn source_delta(kind: &str, quantity: f64) -> f64 {
    match kind {
        KIND_IN | KIND_ADJUSTMENT => quantity,
        KIND_OUT | KIND_TRANSFER => -quantity,
        _ => 0.0,
    }
}
