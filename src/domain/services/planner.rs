use std::collections::BTreeMap;
use std::future::Future;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::models::booking::{
    parse_date, parse_time, Booking, BookingRequest, Category, Recurrence, RecurrenceUnit,
};
use crate::domain::models::role::RoleContext;
use crate::domain::services::{conflict, recurrence};
use crate::error::AppError;

/// Longest plannable series: daily density for a full year. Anything larger
/// is a malformed request, not a calendar.
const MAX_RECURRENCE_COUNT: i32 = 366;

/// Outcome of planning one booking request. Either `accepted` holds every
/// occurrence to persist (all-or-nothing), or it is empty and `conflicts`
/// carries the complete per-date blocking breakdown. With an approved
/// override both can be populated: the occurrences are accepted and the
/// conflicts they overrode are reported alongside.
#[derive(Debug)]
pub struct Plan {
    pub accepted: Vec<Booking>,
    pub conflicts: conflict::ConflictReport,
}

impl Plan {
    pub fn is_rejected(&self) -> bool {
        self.accepted.is_empty() && !self.conflicts.is_empty()
    }
}

/// Validates a request, expands it into occurrence dates, runs conflict
/// detection per date, and materializes the occurrence records to persist.
///
/// `lookup` supplies the existing bookings for one date; injecting it keeps
/// the planner storage-agnostic. The planner never writes to the store.
pub async fn plan<F, Fut>(
    request: &BookingRequest,
    owner: &RoleContext,
    lookup: F,
) -> Result<Plan, AppError>
where
    F: Fn(NaiveDate) -> Fut,
    Fut: Future<Output = Result<Vec<Booking>, AppError>>,
{
    let raw_category = required(request.category.as_deref(), "category")?;
    let raw_date = required(request.date.as_deref(), "date")?;
    let raw_start = required(request.start_time.as_deref(), "startTime")?;
    let raw_end = required(request.end_time.as_deref(), "endTime")?;
    let title = required(request.title.as_deref(), "title")?;

    let category = Category::parse(raw_category)?;
    let anchor_date = parse_date(raw_date)?;
    let start_time = parse_time(raw_start)?;
    let end_time = parse_time(raw_end)?;
    if start_time >= end_time {
        return Err(AppError::Validation(
            "startTime must be before endTime".to_string(),
        ));
    }

    let series = match &request.recurring {
        Some(rule) => {
            let unit = RecurrenceUnit::parse(&rule.unit)?;
            if rule.count < 1 {
                return Err(AppError::Validation(
                    "Recurrence count must be at least 1".to_string(),
                ));
            }
            if rule.count > MAX_RECURRENCE_COUNT {
                return Err(AppError::Validation(format!(
                    "Recurrence count must not exceed {MAX_RECURRENCE_COUNT}"
                )));
            }
            Some(Recurrence {
                unit,
                count: rule.count as u32,
            })
        }
        None => None,
    };

    let dates = match series {
        Some(rule) => recurrence::expand(anchor_date, rule.unit, rule.count, &[]),
        None => vec![anchor_date],
    };

    let mut conflicts: conflict::ConflictReport = BTreeMap::new();
    for date in &dates {
        let existing = lookup(*date).await?;
        let blocking = conflict::find_blocking(start_time, end_time, category, &existing);
        if !blocking.is_empty() {
            conflicts.insert(*date, blocking);
        }
    }

    if !conflicts.is_empty() && !request.override_approved {
        warn!(
            title = %title,
            blocked_dates = conflicts.len(),
            "Booking plan rejected: blocking conflicts"
        );
        return Ok(Plan {
            accepted: Vec::new(),
            conflicts,
        });
    }

    let series_id = series.map(|_| Uuid::new_v4().to_string());
    let now = Utc::now();

    let accepted: Vec<Booking> = dates
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let is_anchor = i == 0 && series_id.is_some();
            Booking {
                // Assigned by the store on insert.
                id: String::new(),
                series_id: series_id.clone(),
                is_anchor,
                date: *date,
                start_time,
                end_time,
                category,
                title: title.to_string(),
                description: request.description.clone().unwrap_or_default(),
                group_size: request.group_size,
                contact_name: request.contact_name.clone(),
                contact_info: request.contact_info.clone(),
                owner_role: Some(owner.role),
                owner_id: owner.id.clone(),
                deposit_paid: category.is_paid().then_some(false),
                fee_paid: category.is_paid().then_some(false),
                recurrence: if is_anchor { series } else { None },
                exceptions: Vec::new(),
                override_recorded: request.override_approved,
                created_at: now,
            }
        })
        .collect();

    info!(
        title = %title,
        occurrences = accepted.len(),
        overridden = !conflicts.is_empty(),
        "Booking plan accepted"
    );

    Ok(Plan { accepted, conflicts })
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::MissingField(field.to_string())),
    }
}
