use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::models::booking::{Booking, Category};

/// Per-date breakdown of blocking bookings, keyed by occurrence date.
pub type ConflictReport = BTreeMap<NaiveDate, Vec<BlockingEntry>>;

/// One existing booking that blocks a candidate, annotated for diagnostic
/// display to the requester.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlockingEntry {
    pub id: String,
    pub title: String,
    pub category: Category,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl From<&Booking> for BlockingEntry {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.clone(),
            title: booking.title.clone(),
            category: booking.category,
            start_time: booking.start_time,
            end_time: booking.end_time,
        }
    }
}

/// Half-open interval test: `[s1, e1)` and `[s2, e2)` overlap iff
/// `s1 < e2 && s2 < e1`. A booking ending exactly when another starts does
/// not conflict.
pub fn overlaps(s1: NaiveTime, e1: NaiveTime, s2: NaiveTime, e2: NaiveTime) -> bool {
    s1 < e2 && s2 < e1
}

/// Returns every existing booking on the candidate's date that blocks it:
/// time ranges overlap and the existing booking's category priority is
/// greater than or equal to the candidate's. Ties block, defending the
/// earlier booking.
pub fn find_blocking(
    start: NaiveTime,
    end: NaiveTime,
    category: Category,
    existing: &[Booking],
) -> Vec<BlockingEntry> {
    existing
        .iter()
        .filter(|b| overlaps(start, end, b.start_time, b.end_time))
        .filter(|b| b.category.priority() >= category.priority())
        .map(BlockingEntry::from)
        .collect()
}
