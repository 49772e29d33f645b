//! Tenant identification.
//!
//! Every business request names its tenant in the [`TENANT_HEADER`] header
//! using the tenant's slug. The slug must match the tenant embedded in the
//! caller's access token.

use std::sync::LazyLock;

use regex::Regex;

/// Request header carrying the tenant slug.
pub const TENANT_HEADER: &str = "x-tenant-id";

static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{1,39}$").expect("valid regex"));

/// Tenant slugs: 2..=40 chars of lower-case letters, digits and `-`,
/// not starting with `-`.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(format!(
            "Invalid tenant '{slug}'. Use 2 to 40 lower-case letters, digits or '-'"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(validate_slug("bar-pepe").is_ok());
        assert!(validate_slug("acme01").is_ok());
        assert!(validate_slug("a").is_err());
        assert!(validate_slug("-acme").is_err());
        assert!(validate_slug("Acme").is_err());
        assert!(validate_slug(&"a".repeat(41)).is_err());
    }
}
