//! Calendar planning aggregation.
//!
//! The planning view is fed by two date-filtered queries (items *scheduled*
//! in the range, and items *due* in the range). An item can match both, so
//! the results are merged by id before being bucketed into one entry per
//! calendar day.

use std::collections::HashSet;

use chrono::Duration;
use serde::Serialize;

use crate::types::{Date, DbId};

/// Widest range (in days, inclusive) a planning request may cover.
pub const MAX_PLANNING_DAYS: i64 = 92;

/// Anything that can be placed on the planning calendar.
pub trait Schedulable {
    fn id(&self) -> DbId;
    fn scheduled_on(&self) -> Option<Date>;
    fn due_on(&self) -> Option<Date>;
    /// Key used to order items within a day.
    fn ordering_key(&self) -> &str;
}

/// All items that fall on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket<T> {
    pub date: Date,
    pub items: Vec<T>,
}

/// Validate a planning range: `from <= to` and at most [`MAX_PLANNING_DAYS`].
pub fn validate_range(from: Date, to: Date) -> Result<(), String> {
    if from > to {
        return Err(format!("from ({from}) must not be after to ({to})"));
    }
    let days = (to - from).num_days() + 1;
    if days > MAX_PLANNING_DAYS {
        return Err(format!(
            "Planning range covers {days} days; the maximum is {MAX_PLANNING_DAYS}"
        ));
    }
    Ok(())
}

/// Concatenate two result sets, keeping the first occurrence of each id.
pub fn merge_by_id<T: Schedulable>(first: Vec<T>, second: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(first.len() + second.len());
    first
        .into_iter()
        .chain(second)
        .filter(|item| seen.insert(item.id()))
        .collect()
}

/// The day an item is shown on: its scheduled date when that falls in the
/// range, otherwise its due date when that does.
pub fn placement_day<T: Schedulable>(item: &T, from: Date, to: Date) -> Option<Date> {
    let in_range = |d: &Date| *d >= from && *d <= to;
    item.scheduled_on()
        .filter(in_range)
        .or_else(|| item.due_on().filter(in_range))
}

/// Bucket items into one entry per day of `[from, to]`, empty days included.
///
/// Items that fall outside the range are dropped.
pub fn bucket_by_day<T: Schedulable>(items: Vec<T>, from: Date, to: Date) -> Vec<DayBucket<T>> {
    let days = (to - from).num_days().max(-1) + 1;
    let mut buckets: Vec<DayBucket<T>> = (0..days)
        .map(|offset| DayBucket {
            date: from + Duration::days(offset),
            items: Vec::new(),
        })
        .collect();

    for item in items {
        if let Some(day) = placement_day(&item, from, to) {
            let idx = (day - from).num_days() as usize;
            buckets[idx].items.push(item);
        }
    }

    for bucket in &mut buckets {
        bucket
            .items
            .sort_by(|a, b| a.ordering_key().cmp(b.ordering_key()));
    }
    buckets
}

/// Merge both query results and bucket them by day.
pub fn build_calendar<T: Schedulable>(
    scheduled: Vec<T>,
    due: Vec<T>,
    from: Date,
    to: Date,
) -> Vec<DayBucket<T>> {
    bucket_by_day(merge_by_id(scheduled, due), from, to)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Job {
        id: DbId,
        number: String,
        scheduled: Option<Date>,
        due: Option<Date>,
    }

    impl Schedulable for Job {
        fn id(&self) -> DbId {
            self.id
        }
        fn scheduled_on(&self) -> Option<Date> {
            self.scheduled
        }
        fn due_on(&self) -> Option<Date> {
            self.due
        }
        fn ordering_key(&self) -> &str {
            &self.number
        }
    }

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn job(id: DbId, scheduled: Option<Date>, due: Option<Date>) -> Job {
        Job {
            id,
            number: format!("PT-{id:06}"),
            scheduled,
            due,
        }
    }

    #[test]
    fn range_validation() {
        assert!(validate_range(d(1), d(31)).is_ok());
        assert!(validate_range(d(2), d(1)).is_err());
        let far = d(1) + Duration::days(MAX_PLANNING_DAYS);
        assert!(validate_range(d(1), far).is_err());
    }

    #[test]
    fn merge_drops_duplicates_keeping_first() {
        let a = vec![job(1, Some(d(2)), None), job(2, Some(d(3)), Some(d(5)))];
        let b = vec![job(2, Some(d(3)), Some(d(5))), job(3, None, Some(d(4)))];
        let merged = merge_by_id(a, b);
        let ids: Vec<DbId> = merged.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn buckets_cover_every_day() {
        let cal = build_calendar(Vec::<Job>::new(), Vec::new(), d(1), d(7));
        assert_eq!(cal.len(), 7);
        assert_eq!(cal[0].date, d(1));
        assert_eq!(cal[6].date, d(7));
        assert!(cal.iter().all(|b| b.items.is_empty()));
    }

    #[test]
    fn due_date_used_when_scheduled_outside_range() {
        // Scheduled before the range, due inside it.
        let cal = build_calendar(vec![], vec![job(9, Some(d(1)), Some(d(6)))], d(5), d(7));
        assert!(cal[0].items.is_empty());
        assert_eq!(cal[1].items.len(), 1);
        assert_eq!(cal[1].items[0].id, 9);
    }

    #[test]
    fn items_ordered_by_key_within_day() {
        let cal = build_calendar(
            vec![job(5, Some(d(2)), None), job(2, Some(d(2)), None)],
            vec![],
            d(1),
            d(3),
        );
        let ids: Vec<DbId> = cal[1].items.iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn item_matching_both_queries_appears_once() {
        let j = job(4, Some(d(2)), Some(d(3)));
        let cal = build_calendar(vec![j.clone()], vec![j], d(1), d(5));
        let total: usize = cal.iter().map(|b| b.items.len()).sum();
        assert_eq!(total, 1);
        assert_eq!(cal[1].items[0].id, 4);
    }
}
