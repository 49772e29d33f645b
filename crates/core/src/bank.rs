//! Bank movement rules and summaries.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::money::{to_decimal, to_f64};
use crate::validation::require_bounded;

/// Maximum length of the account label (name or IBAN).
pub const MAX_ACCOUNT_LENGTH: usize = 64;

/// A bank movement must move money: bounded and non-zero.
pub fn validate_amount(amount: f64) -> Result<(), String> {
    require_bounded("amount", amount)?;
    if amount == 0.0 {
        return Err("amount cannot be zero".to_string());
    }
    Ok(())
}

pub fn validate_account(account: &str) -> Result<(), String> {
    let trimmed = account.trim();
    if trimmed.is_empty() {
        return Err("account cannot be empty".to_string());
    }
    if trimmed.chars().count() > MAX_ACCOUNT_LENGTH {
        return Err(format!(
            "account exceeds maximum length of {MAX_ACCOUNT_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Income/expense totals over a set of movements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovementSummary {
    pub income: f64,
    pub expense: f64,
    pub net: f64,
    pub count: i64,
}

/// Summarise signed amounts: positives are income, negatives expense
/// (reported as a positive number).
pub fn summarize(amounts: &[f64]) -> MovementSummary {
    let (income, expense) = amounts.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(inc, exp), &a| {
            let d = to_decimal(a);
            if d.is_sign_positive() {
                (inc + d, exp)
            } else {
                (inc, exp - d)
            }
        },
    );
    MovementSummary {
        income: to_f64(income),
        expense: to_f64(expense),
        net: to_f64(income - expense),
        count: amounts.len() as i64,
    }
}

/// Whether `paid` (sum of reconciled movements) covers `total` to the cent.
pub fn covers(paid: f64, total: f64) -> bool {
    to_decimal(paid) >= to_decimal(total) - Decimal::new(5, 3)
}
