//! Work shifts: time windows that may cross midnight.

use chrono::NaiveTime;

/// Minutes in a day.
const DAY_MINUTES: i64 = 24 * 60;

/// Parse `HH:MM` or `HH:MM:SS`.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| format!("{field} '{value}' must be HH:MM or HH:MM:SS"))
}

/// Start and end must differ; `end < start` means the shift ends the next day.
pub fn validate_window(start: NaiveTime, end: NaiveTime) -> Result<(), String> {
    if start == end {
        return Err(format!(
            "Shift start ({start}) and end ({end}) cannot be equal"
        ));
    }
    Ok(())
}

/// Whether the shift crosses midnight.
pub fn is_overnight(start: NaiveTime, end: NaiveTime) -> bool {
    end < start
}

/// Length of the shift in minutes.
pub fn duration_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
    let diff = (end - start).num_minutes();
    if diff <= 0 {
        diff + DAY_MINUTES
    } else {
        diff
    }
}

/// Whether `at` falls inside the shift (start inclusive, end exclusive).
pub fn contains(start: NaiveTime, end: NaiveTime, at: NaiveTime) -> bool {
    if is_overnight(start, end) {
        at >= start || at < end
    } else {
        at >= start && at < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_both_time_formats() {
        assert_eq!(parse_time("start_time", "08:30").unwrap(), t(8, 30));
        assert_eq!(parse_time("start_time", "22:00:00").unwrap(), t(22, 0));
        assert!(parse_time("start_time", "25:00").is_err());
        assert!(parse_time("start_time", "8h").is_err());
    }

    #[test]
    fn equal_bounds_rejected() {
        assert!(validate_window(t(8, 0), t(8, 0)).is_err());
        assert!(validate_window(t(8, 0), t(16, 0)).is_ok());
    }

    #[test]
    fn day_shift_duration_and_membership() {
        assert_eq!(duration_minutes(t(8, 0), t(16, 30)), 510);
        assert!(contains(t(8, 0), t(16, 0), t(8, 0)));
        assert!(contains(t(8, 0), t(16, 0), t(15, 59)));
        assert!(!contains(t(8, 0), t(16, 0), t(16, 0)));
    }

    #[test]
    fn night_shift_wraps_midnight() {
        assert!(is_overnight(t(22, 0), t(6, 0)));
        assert_eq!(duration_minutes(t(22, 0), t(6, 0)), 480);
        assert!(contains(t(22, 0), t(6, 0), t(23, 30)));
        assert!(contains(t(22, 0), t(6, 0), t(2, 0)));
        assert!(!contains(t(22, 0), t(6, 0), t(12, 0)));
    }
}
