//! Payment methods: kinds, term validation and due-date schedules.

use chrono::Duration;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::money::{round_cents, to_f64, try_decimal};
use crate::types::Date;
use crate::validation::{validate_int_range, validate_percentage};

// ---------------------------------------------------------------------------
// Kinds
// ---------------------------------------------------------------------------

pub const KIND_CASH: &str = "cash";
pub const KIND_CARD: &str = "card";
pub const KIND_TRANSFER: &str = "transfer";
pub const KIND_DIRECT_DEBIT: &str = "direct_debit";
pub const KIND_CHECK: &str = "check";
pub const KIND_OTHER: &str = "other";

pub const VALID_KINDS: &[&str] = &[
    KIND_CASH,
    KIND_CARD,
    KIND_TRANSFER,
    KIND_DIRECT_DEBIT,
    KIND_CHECK,
    KIND_OTHER,
];

pub const MAX_INSTALLMENTS: i64 = 24;
pub const MAX_TERM_DAYS: i64 = 365;

pub fn validate_kind(kind: &str) -> Result<(), String> {
    if VALID_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(format!(
            "Invalid payment kind '{kind}'. Must be one of: {}",
            VALID_KINDS.join(", ")
        ))
    }
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

/// The scheduling part of a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentTerms {
    pub installments: i64,
    pub first_due_days: i64,
    pub days_between: i64,
}

impl PaymentTerms {
    /// Everything due on the document date.
    pub const IMMEDIATE: PaymentTerms = PaymentTerms {
        installments: 1,
        first_due_days: 0,
        days_between: 0,
    };

    pub fn validate(&self) -> Result<(), String> {
        validate_int_range("installments", self.installments, 1, MAX_INSTALLMENTS)?;
        validate_int_range("first_due_days", self.first_due_days, 0, MAX_TERM_DAYS)?;
        validate_int_range("days_between", self.days_between, 0, MAX_TERM_DAYS)?;
        if self.installments > 1 && self.days_between == 0 {
            return Err("days_between must be positive when there is more than one installment"
                .to_string());
        }
        Ok(())
    }

    /// Due date of the last instalment for a document dated `date`.
    pub fn final_due_date(&self, date: Date) -> Date {
        let spread = self.days_between * (self.installments.max(1) - 1);
        date + Duration::days(self.first_due_days + spread)
    }
}

/// Validate the surcharge applied when paying with a method.
pub fn validate_surcharge(surcharge_percent: f64) -> Result<(), String> {
    validate_percentage("surcharge_percent", surcharge_percent)
}

/// One instalment of a payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Installment {
    pub number: i64,
    pub due_date: Date,
    pub amount: f64,
}

/// Split `amount` into the instalments described by `terms`.
///
/// Amounts are split evenly in cents; the rounding remainder goes to the
/// last instalment so the schedule always sums to the rounded amount.
/// Negative amounts (refunds) are split the same way and keep their sign.
pub fn build_schedule(
    terms: &PaymentTerms,
    amount: f64,
    document_date: Date,
) -> Result<Vec<Installment>, String> {
    terms.validate()?;
    let total = round_cents(try_decimal("amount", amount)?);
    let count = Decimal::from(terms.installments);
    let share = (total / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let mut allocated = Decimal::ZERO;

    let schedule = (0..terms.installments)
        .map(|i| {
            let is_last = i == terms.installments - 1;
            let this = if is_last { total - allocated } else { share };
            allocated += this;
            Installment {
                number: i + 1,
                due_date: document_date
                    + Duration::days(terms.first_due_days + i * terms.days_between),
                amount: to_f64(this),
            }
        })
        .collect();
    Ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> Date {
        Date::from_ymd_opt(2026, m, d).unwrap()
    }

    #[test]
    fn immediate_terms_yield_single_installment() {
        let s = build_schedule(&PaymentTerms::IMMEDIATE, 99.99, date(1, 10)).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].due_date, date(1, 10));
        assert_eq!(s[0].amount, 99.99);
    }

    #[test]
    fn remainder_lands_on_last_installment() {
        let terms = PaymentTerms {
            installments: 3,
            first_due_days: 30,
            days_between: 30,
        };
        let s = build_schedule(&terms, 100.0, date(1, 1)).unwrap();
        let amounts: Vec<f64> = s.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![33.33, 33.33, 33.34]);
        assert_eq!(s[0].due_date, date(1, 31));
        assert_eq!(s[1].due_date, date(3, 2));
        assert_eq!(s[2].due_date, date(4, 1));
        assert_eq!(terms.final_due_date(date(1, 1)), date(4, 1));
    }

    #[test]
    fn immediate_terms_fall_due_on_the_document_date() {
        assert_eq!(PaymentTerms::IMMEDIATE.final_due_date(date(5, 20)), date(5, 20));
    }

    #[test]
    fn invalid_terms_are_rejected() {
        let terms = PaymentTerms {
            installments: 0,
            first_due_days: 0,
            days_between: 0,
        };
        assert!(build_schedule(&terms, 10.0, date(1, 1)).is_err());

        let terms = PaymentTerms {
            installments: 2,
            first_due_days: 0,
            days_between: 0,
        };
        assert!(terms.validate().is_err());
    }

    #[test]
    fn kind_validation() {
        assert!(validate_kind("card").is_ok());
        assert!(validate_kind("bitcoin").is_err());
    }

    #[test]
    fn refund_schedule_keeps_the_sign() {
        let terms = PaymentTerms {
            installments: 3,
            first_due_days: 0,
            days_between: 30,
        };
        let s = build_schedule(&terms, -100.0, date(1, 1)).unwrap();
        let amounts: Vec<f64> = s.iter().map(|i| i.amount).collect();
        assert_eq!(amounts, vec![-33.33, -33.33, -33.34]);

        let single = build_schedule(&PaymentTerms::IMMEDIATE, -12.1, date(1, 1)).unwrap();
        assert_eq!(single[0].amount, -12.1);
    }

    #[test]
    fn out_of_range_amount_is_an_error() {
        assert!(build_schedule(&PaymentTerms::IMMEDIATE, 1e30, date(1, 1)).is_err());
        assert!(build_schedule(&PaymentTerms::IMMEDIATE, f64::NAN, date(1, 1)).is_err());
    }
}
