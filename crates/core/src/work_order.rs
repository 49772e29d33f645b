//! Work order statuses, transitions and numbering.

pub const STATUS_PENDING: &str = "pending";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_INVOICED: &str = "invoiced";
pub const STATUS_CANCELLED: &str = "cancelled";

pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_INVOICED,
    STATUS_CANCELLED,
];

/// Prefix of generated work order numbers.
pub const NUMBER_PREFIX: &str = "PT";

pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid work order status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Whether a work order may move from `from` to `to`.
///
/// `invoiced` is only reachable through invoicing, never by a manual
/// status change. Started work may step back one status for rework.
pub fn can_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        (STATUS_PENDING, STATUS_IN_PROGRESS)
            | (STATUS_IN_PROGRESS, STATUS_PENDING)
            | (STATUS_IN_PROGRESS, STATUS_COMPLETED)
            | (STATUS_COMPLETED, STATUS_IN_PROGRESS)
            | (STATUS_PENDING, STATUS_CANCELLED)
            | (STATUS_IN_PROGRESS, STATUS_CANCELLED)
            | (STATUS_COMPLETED, STATUS_CANCELLED)
    )
}

/// Content (customer, lines, dates) can only change before completion.
pub fn is_editable(status: &str) -> bool {
    matches!(status, STATUS_PENDING | STATUS_IN_PROGRESS)
}

/// Only orders that never started or were cancelled can be deleted.
pub fn is_deletable(status: &str) -> bool {
    matches!(status, STATUS_PENDING | STATUS_CANCELLED)
}

/// Format the `seq`-th work order number, e.g. `PT-000042`.
pub fn format_number(seq: i64) -> String {
    format!("{NUMBER_PREFIX}-{seq:06}")
}
