//! Field-level validation shared by every resource.
//!
//! Each function returns `Result<(), String>` with a human-readable message;
//! callers lift it into [`CoreError::Validation`](crate::error::CoreError)
//! with `?`.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Date;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a business code (zone code, supplier code, ...).
pub const MAX_CODE_LENGTH: usize = 20;

/// Maximum length of a display name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of free-text notes/descriptions.
pub const MAX_TEXT_LENGTH: usize = 2_000;

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._\-]*$").expect("valid regex"));

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Text
// ---------------------------------------------------------------------------

/// A business code: 1..=20 chars, alphanumeric start, then `.`, `_`, `-`.
pub fn validate_code(field: &str, code: &str) -> Result<(), String> {
    if code.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if code.chars().count() > MAX_CODE_LENGTH {
        return Err(format!(
            "{field} exceeds maximum length of {MAX_CODE_LENGTH} characters"
        ));
    }
    if !CODE_RE.is_match(code) {
        return Err(format!(
            "{field} '{code}' may only contain letters, digits, '.', '_' and '-'"
        ));
    }
    Ok(())
}

/// A required display name: non-blank and within [`MAX_NAME_LENGTH`].
pub fn validate_name(field: &str, name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "{field} exceeds maximum length of {MAX_NAME_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Optional free text within [`MAX_TEXT_LENGTH`].
pub fn validate_optional_text(field: &str, text: Option<&str>) -> Result<(), String> {
    match text {
        Some(t) if t.chars().count() > MAX_TEXT_LENGTH => Err(format!(
            "{field} exceeds maximum length of {MAX_TEXT_LENGTH} characters"
        )),
        _ => Ok(()),
    }
}

/// A `#RRGGBB` hex colour.
pub fn validate_color(color: &str) -> Result<(), String> {
    if COLOR_RE.is_match(color) {
        Ok(())
    } else {
        Err(format!("Color '{color}' must be in #RRGGBB format"))
    }
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Reject NaN and infinities.
pub fn require_finite(field: &str, value: f64) -> Result<(), String> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(format!("{field} must be a finite number, got {value}"))
    }
}

/// Largest magnitude accepted for a single amount, price or quantity.
///
/// Keeps every product and document sum well inside `Decimal` range.
pub const MAX_MAGNITUDE: f64 = 1e12;

/// Finite and within `[-MAX_MAGNITUDE, MAX_MAGNITUDE]`.
pub fn require_bounded(field: &str, value: f64) -> Result<(), String> {
    require_finite(field, value)?;
    if value.abs() > MAX_MAGNITUDE {
        return Err(format!(
            "{field} must be between -{MAX_MAGNITUDE} and {MAX_MAGNITUDE}, got {value}"
        ));
    }
    Ok(())
}

/// A percentage in `[0, 100]`.
pub fn validate_percentage(field: &str, value: f64) -> Result<(), String> {
    require_finite(field, value)?;
    if !(0.0..=100.0).contains(&value) {
        return Err(format!("{field} must be between 0 and 100, got {value}"));
    }
    Ok(())
}

/// A bounded amount that is zero or positive.
pub fn validate_non_negative(field: &str, value: f64) -> Result<(), String> {
    require_bounded(field, value)?;
    if value < 0.0 {
        return Err(format!("{field} must be non-negative, got {value}"));
    }
    Ok(())
}

/// An integer within an inclusive range.
pub fn validate_int_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), String> {
    if value < min || value > max {
        return Err(format!(
            "{field} must be between {min} and {max}, got {value}"
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// When both ends are present, `from` must not be after `to`.
pub fn validate_date_range(
    from_field: &str,
    from: Option<Date>,
    to_field: &str,
    to: Option<Date>,
) -> Result<(), String> {
    match (from, to) {
        (Some(f), Some(t)) if f > t => Err(format!(
            "{from_field} ({f}) must not be after {to_field} ({t})"
        )),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_accepts_typical_values() {
        assert!(validate_code("code", "ZP-01").is_ok());
        assert!(validate_code("code", "grill").is_ok());
        assert!(validate_code("code", "A.B_C").is_ok());
    }

    #[test]
    fn code_rejects_bad_values() {
        assert!(validate_code("code", "").is_err());
        assert!(validate_code("code", "-lead").is_err());
        assert!(validate_code("code", "has space").is_err());
        assert!(validate_code("code", &"X".repeat(21)).is_err());
    }

    #[test]
    fn name_must_not_be_blank() {
        let err = validate_name("name", "   ").unwrap_err();
        assert!(err.contains("cannot be empty"));
        assert!(validate_name("name", "Cocina caliente").is_ok());
    }

    #[test]
    fn color_format() {
        assert!(validate_color("#FFAA00").is_ok());
        assert!(validate_color("#ffaa0").is_err());
        assert!(validate_color("red").is_err());
    }

    #[test]
    fn percentage_bounds() {
        assert!(validate_percentage("p", 0.0).is_ok());
        assert!(validate_percentage("p", 100.0).is_ok());
        assert!(validate_percentage("p", 100.01).is_err());
        assert!(validate_percentage("p", -1.0).is_err());
        assert!(validate_percentage("p", f64::NAN).is_err());
    }

    #[test]
    fn date_range_order() {
        let a = Date::from_ymd_opt(2026, 1, 1).unwrap();
        let b = Date::from_ymd_opt(2026, 2, 1).unwrap();
        assert!(validate_date_range("from", Some(a), "to", Some(b)).is_ok());
        assert!(validate_date_range("from", Some(b), "to", Some(a)).is_err());
        assert!(validate_date_range("from", None, "to", Some(a)).is_ok());
    }

    #[test]
    fn amounts_beyond_the_bound_are_rejected() {
        assert!(require_bounded("amount", MAX_MAGNITUDE).is_ok());
        assert!(require_bounded("amount", -MAX_MAGNITUDE).is_ok());
        assert!(require_bounded("amount", 1e29).is_err());
        assert!(require_bounded("amount", -1e13).is_err());
        assert!(validate_non_negative("unit_price", 1e15).is_err());
    }
}
