//! Stored document lines, shared by invoices and work orders.

use serde::Serialize;
use sqlx::FromRow;
use gestora_core::document_lines::{compute_totals, ComputedLine, DocumentTotals, LineInput};
use gestora_core::types::DbId;

/// A row from `invoice_lines` or `work_order_lines`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentLine {
    pub id: DbId,
    pub position: i64,
    pub product_code: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percent: f64,
    pub tax_rate: f64,
    pub net_amount: f64,
    pub tax_amount: f64,
    pub total_amount: f64,
}

impl DocumentLine {
    /// The editable part of the line, for recomputation.
    pub fn to_input(&self) -> LineInput {
        LineInput {
            product_code: self.product_code.clone(),
            description: self.description.clone(),
            quantity: self.quantity,
            unit_price: self.unit_price,
            discount_percent: self.discount_percent,
            tax_rate: self.tax_rate,
        }
    }
}

/// Recompute the totals breakdown of stored lines.
pub fn totals_of(lines: &[DocumentLine]) -> DocumentTotals {
    let computed: Vec<ComputedLine> = lines
        .iter()
        .map(|l| ComputedLine {
            position: l.position,
            product_code: l.product_code.clone(),
            description: l.description.clone(),
            quantity: l.quantity,
            unit_price: l.unit_price,
            discount_percent: l.discount_percent,
            tax_rate: l.tax_rate,
            net_amount: l.net_amount,
            tax_amount: l.tax_amount,
            total_amount: l.total_amount,
        })
        .collect();
    compute_totals(&computed)
}
