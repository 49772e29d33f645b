//! Invoice statuses, series and consecutive numbering.

use std::sync::LazyLock;

use regex::Regex;

pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_ISSUED: &str = "issued";
pub const STATUS_PAID: &str = "paid";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[STATUS_DRAFT, STATUS_ISSUED, STATUS_PAID, STATUS_CANCELLED];

/// Series used when the client does not send one.
pub const DEFAULT_SERIES: &str = "A";

static SERIES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9]{1,10}$").expect("valid regex"));

pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid invoice status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Series are 1..=10 upper-case letters or digits.
pub fn validate_series(series: &str) -> Result<(), String> {
    if SERIES_RE.is_match(series) {
        Ok(())
    } else {
        Err(format!(
            "Invalid series '{series}'. Use 1 to 10 upper-case letters or digits"
        ))
    }
}

/// Only drafts can be edited or deleted.
pub fn is_editable(status: &str) -> bool {
    status == STATUS_DRAFT
}

pub fn can_issue(status: &str) -> bool {
    status == STATUS_DRAFT
}

pub fn can_cancel(status: &str) -> bool {
    matches!(status, STATUS_DRAFT | STATUS_ISSUED)
}

/// Payments can only be reconciled against issued invoices.
pub fn accepts_payments(status: &str) -> bool {
    status == STATUS_ISSUED
}

/// Counted towards agent commissions.
pub fn is_billed(status: &str) -> bool {
    matches!(status, STATUS_ISSUED | STATUS_PAID)
}

/// Format an issued invoice code, e.g. `A-2026-00017`.
pub fn format_code(series: &str, year: i32, number: i64) -> String {
    format!("{series}-{year}-{number:05}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_format() {
        assert!(validate_series("A").is_ok());
        assert!(validate_series("R2026").is_ok());
        assert!(validate_series("a").is_err());
        assert!(validate_series("").is_err());
        assert!(validate_series("TOO-LONG").is_err());
    }

    #[test]
    fn lifecycle_rules() {
        assert!(is_editable("draft"));
        assert!(!is_editable("issued"));
        assert!(can_issue("draft"));
        assert!(!can_issue("paid"));
        assert!(can_cancel("issued"));
        assert!(!can_cancel("paid"));
        assert!(accepts_payments("issued"));
        assert!(!accepts_payments("draft"));
    }

    #[test]
    fn code_format() {
        assert_eq!(format_code("A", 2026, 17), "A-2026-00017");
    }
}
