use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::role::Role;
use crate::error::AppError;

/// Fixed event categories. The integer priority decides which of two
/// overlapping bookings defends its slot: higher or equal priority blocks.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    SmallGroup,
    LargeGroup,
    CommitteeEvent,
    ReservedPaid,
    BoardMeeting,
}

impl Category {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "smallGroup" => Ok(Category::SmallGroup),
            "largeGroup" => Ok(Category::LargeGroup),
            "committeeEvent" => Ok(Category::CommitteeEvent),
            "reservedPaid" => Ok(Category::ReservedPaid),
            "boardMeeting" => Ok(Category::BoardMeeting),
            other => Err(AppError::UnknownCategory(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SmallGroup => "smallGroup",
            Category::LargeGroup => "largeGroup",
            Category::CommitteeEvent => "committeeEvent",
            Category::ReservedPaid => "reservedPaid",
            Category::BoardMeeting => "boardMeeting",
        }
    }

    pub fn priority(&self) -> u8 {
        match self {
            Category::SmallGroup => 1,
            Category::LargeGroup => 2,
            Category::CommitteeEvent => 3,
            Category::ReservedPaid => 4,
            Category::BoardMeeting => 5,
        }
    }

    /// Paid bookings carry deposit/fee flags; all others do not.
    pub fn is_paid(&self) -> bool {
        matches!(self, Category::ReservedPaid)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RecurrenceUnit {
    Week,
    BiWeek,
    Month,
}

impl RecurrenceUnit {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match raw {
            "week" => Ok(RecurrenceUnit::Week),
            "biWeek" => Ok(RecurrenceUnit::BiWeek),
            "month" => Ok(RecurrenceUnit::Month),
            other => Err(AppError::InvalidRecurrenceUnit(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceUnit::Week => "week",
            RecurrenceUnit::BiWeek => "biWeek",
            RecurrenceUnit::Month => "month",
        }
    }
}

/// Recurrence rule, stored on the series anchor only.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub unit: RecurrenceUnit,
    pub count: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PaymentField {
    DepositPaid,
    FeePaid,
}

/// A single calendar occurrence, standalone or part of a recurring series.
///
/// `id` is assigned by the store on insert; drafts emitted by the planner
/// carry an empty id until then. Exactly one occurrence per series is the
/// anchor and holds the recurrence rule plus the exception dates.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub series_id: Option<String>,
    pub is_anchor: bool,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub category: Category,
    pub title: String,
    pub description: String,
    pub group_size: Option<i32>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub owner_role: Option<Role>,
    pub owner_id: Option<String>,
    pub deposit_paid: Option<bool>,
    pub fee_paid: Option<bool>,
    pub recurrence: Option<Recurrence>,
    pub exceptions: Vec<NaiveDate>,
    pub override_recorded: bool,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied request shape. Required fields are optional here so the
/// planner can report the first missing one by name instead of failing
/// deserialization wholesale.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingRequest {
    pub category: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub group_size: Option<i32>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub recurring: Option<RecurrenceRequest>,
    pub override_approved: bool,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRequest {
    pub unit: String,
    pub count: i32,
}

/// Edit payload for one occurrence. Identity fields (id, series linkage,
/// anchor flag) are never editable.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct OccurrenceEdit {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub group_size: Option<i32>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub override_approved: bool,
}

/// Edit payload applied across a whole series. Each occurrence keeps its own
/// date, so a series edit never carries one.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesEdit {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub group_size: Option<i32>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub override_approved: bool,
}

/// Typed single-occurrence patch handed to the store. Fields left `None`
/// keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct OccurrencePatch {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub group_size: Option<i32>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub override_recorded: Option<bool>,
}

/// Typed series-wide patch: the shared mutable fields only.
#[derive(Debug, Clone, Default)]
pub struct SeriesPatch {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub group_size: Option<i32>,
    pub contact_name: Option<String>,
    pub contact_info: Option<String>,
    pub override_recorded: Option<bool>,
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date format (YYYY-MM-DD): {raw}")))
}

pub fn parse_time(raw: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid time format (HH:MM): {raw}")))
}
