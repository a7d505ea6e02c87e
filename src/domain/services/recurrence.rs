use chrono::{Duration, Months, NaiveDate};

use crate::domain::models::booking::RecurrenceUnit;

/// Expands a recurrence rule into concrete occurrence dates.
///
/// Emits up to `count` dates starting at `anchor` inclusive, stepping 7 days
/// (week), 14 days (biWeek) or one calendar month. Month steps are always
/// taken from the anchor so the series never drifts; a day-of-month the
/// target month lacks clamps to its last day (Jan 31 -> Feb 28).
///
/// Dates in `exceptions` are dropped from the result without advancing or
/// compressing the series, so the output may hold fewer than `count` dates.
pub fn expand(
    anchor: NaiveDate,
    unit: RecurrenceUnit,
    count: u32,
    exceptions: &[NaiveDate],
) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(count as usize);
    for i in 0..count {
        let date = match unit {
            RecurrenceUnit::Week => anchor + Duration::days(7 * i as i64),
            RecurrenceUnit::BiWeek => anchor + Duration::days(14 * i as i64),
            RecurrenceUnit::Month => anchor.checked_add_months(Months::new(i)).unwrap_or(anchor),
        };
        if !exceptions.contains(&date) {
            dates.push(date);
        }
    }
    dates
}
