//! Line-item maths for invoices and work orders.
//!
//! Lines carry quantity, unit price, discount and tax rate. Net, tax and
//! total amounts are derived here; document totals group taxes by rate so
//! the tax of each rate is computed once on its summed base.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{percent_of, round_cents, to_decimal, to_f64};
use crate::validation::{require_bounded, validate_non_negative, validate_percentage};

/// Maximum number of lines on one document.
pub const MAX_LINES: usize = 500;

/// Maximum length of a line description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// A line as sent by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineInput {
    #[serde(default)]
    pub product_code: Option<String>,
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub discount_percent: f64,
    #[serde(default)]
    pub tax_rate: f64,
}

/// A validated line with its derived amounts and 1-based position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComputedLine {
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

/// Taxable base and tax for one tax rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxBreakdown {
    pub tax_rate: f64,
    pub base: f64,
    pub tax: f64,
}

/// Document-level totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentTotals {
    pub subtotal: f64,
    pub tax_total: f64,
    pub total: f64,
    pub taxes: Vec<TaxBreakdown>,
}

impl Default for DocumentTotals {
    fn default() -> Self {
        Self {
            subtotal: 0.0,
            tax_total: 0.0,
            total: 0.0,
            taxes: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation & computation
// ---------------------------------------------------------------------------

/// Validate one line. `index` is 0-based and only used in messages.
pub fn validate_line(index: usize, line: &LineInput) -> Result<(), String> {
    let n = index + 1;
    if line.description.trim().is_empty() {
        return Err(format!("Line {n}: description cannot be empty"));
    }
    if line.description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(format!(
            "Line {n}: description exceeds maximum length of {MAX_DESCRIPTION_LENGTH} characters"
        ));
    }
    require_bounded("quantity", line.quantity).map_err(|e| format!("Line {n}: {e}"))?;
    if line.quantity == 0.0 {
        return Err(format!("Line {n}: quantity cannot be zero"));
    }
    validate_non_negative("unit_price", line.unit_price).map_err(|e| format!("Line {n}: {e}"))?;
    validate_percentage("discount_percent", line.discount_percent)
        .map_err(|e| format!("Line {n}: {e}"))?;
    validate_percentage("tax_rate", line.tax_rate).map_err(|e| format!("Line {n}: {e}"))?;
    Ok(())
}

fn net_of(index: usize, line: &LineInput) -> Result<Decimal, String> {
    let gross = to_decimal(line.quantity)
        .checked_mul(to_decimal(line.unit_price))
        .ok_or_else(|| format!("Line {}: quantity * unit_price is out of range", index + 1))?;
    let discount = percent_of(gross, to_decimal(line.discount_percent));
    Ok(round_cents(gross - discount))
}

/// Validate all lines and derive their amounts, renumbering positions 1..n.
pub fn compute_lines(lines: &[LineInput]) -> Result<Vec<ComputedLine>, String> {
    if lines.len() > MAX_LINES {
        return Err(format!(
            "A document may hold at most {MAX_LINES} lines, got {}",
            lines.len()
        ));
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| -> Result<ComputedLine, String> {
            validate_line(i, line)?;
            let net = net_of(i, line)?;
            let tax = round_cents(percent_of(net, to_decimal(line.tax_rate)));
            Ok(ComputedLine {
                position: i as i64 + 1,
                product_code: line.product_code.clone(),
                description: line.description.trim().to_string(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                discount_percent: line.discount_percent,
                tax_rate: line.tax_rate,
                net_amount: to_f64(net),
                tax_amount: to_f64(tax),
                total_amount: to_f64(net + tax),
            })
        })
        .collect()
}

/// Compute document totals with a per-rate tax breakdown (sorted by rate).
///
/// The tax of each rate is computed on the rate's summed base, so
/// `tax_total` can differ by a cent from the sum of per-line taxes.
pub fn compute_totals(lines: &[ComputedLine]) -> DocumentTotals {
    let mut bases: BTreeMap<Decimal, Decimal> = BTreeMap::new();
    for line in lines {
        *bases.entry(to_decimal(line.tax_rate)).or_default() += to_decimal(line.net_amount);
    }

    let mut subtotal = Decimal::ZERO;
    let mut tax_total = Decimal::ZERO;
    let mut taxes = Vec::with_capacity(bases.len());
    for (rate, base) in bases {
        let tax = round_cents(percent_of(base, rate));
        subtotal += base;
        tax_total += tax;
        taxes.push(TaxBreakdown {
            tax_rate: to_f64(rate),
            base: to_f64(base),
            tax: to_f64(tax),
        });
    }

    DocumentTotals {
        subtotal: to_f64(subtotal),
        tax_total: to_f64(tax_total),
        total: to_f64(subtotal + tax_total),
        taxes,
    }
}

// ---------------------------------------------------------------------------
// Grid operations
// ---------------------------------------------------------------------------

fn check_position(position: usize, len: usize) -> Result<usize, String> {
    if position == 0 || position > len {
        return Err(format!("Line position {position} is out of range 1..={len}"));
    }
    Ok(position - 1)
}

/// Insert a copy of the line at 1-based `position` right after it.
pub fn duplicate_line<T: Clone>(lines: &mut Vec<T>, position: usize) -> Result<(), String> {
    let idx = check_position(position, lines.len())?;
    if lines.len() >= MAX_LINES {
        return Err(format!("A document may hold at most {MAX_LINES} lines"));
    }
    let copy = lines[idx].clone();
    lines.insert(idx + 1, copy);
    Ok(())
}

/// Move the line at 1-based `from` so it ends up at 1-based `to`.
pub fn move_line<T>(lines: &mut Vec<T>, from: usize, to: usize) -> Result<(), String> {
    let from_idx = check_position(from, lines.len())?;
    let to_idx = check_position(to, lines.len())?;
    let line = lines.remove(from_idx);
    lines.insert(to_idx, line);
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
