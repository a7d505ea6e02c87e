use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::domain::models::booking::{Booking, Category, Recurrence};
use crate::domain::models::role::{Role, RoleContext};

/// Role-appropriate projection of a stored booking. Redacted fields are
/// absent keys in the serialized form, not blanks or nulls.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series_id: Option<String>,
    pub is_anchor: bool,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub category: Category,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_paid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<Recurrence>,
}

/// Derives the view of `booking` appropriate to the viewer. Never mutates
/// the stored record; always returns a fresh value.
pub fn project(booking: &Booking, viewer: &RoleContext) -> BookingView {
    if has_full_visibility(booking, viewer) {
        full_view(booking)
    } else {
        redacted_view(booking)
    }
}

fn has_full_visibility(booking: &Booking, viewer: &RoleContext) -> bool {
    if viewer.role.is_administrative() {
        return true;
    }
    if is_owner(booking, viewer) {
        return true;
    }
    viewer.role == Role::Committee && booking.category == Category::CommitteeEvent
}

fn is_owner(booking: &Booking, viewer: &RoleContext) -> bool {
    match (&booking.owner_id, &viewer.id) {
        (Some(owner), Some(id)) => owner == id,
        _ => false,
    }
}

fn full_view(booking: &Booking) -> BookingView {
    BookingView {
        id: booking.id.clone(),
        series_id: booking.series_id.clone(),
        is_anchor: booking.is_anchor,
        date: booking.date,
        start_time: booking.start_time,
        end_time: booking.end_time,
        category: booking.category,
        title: booking.title.clone(),
        description: booking.description.clone(),
        group_size: booking.group_size,
        contact_name: booking.contact_name.clone(),
        contact_info: booking.contact_info.clone(),
        owner_role: booking.owner_role,
        owner_id: booking.owner_id.clone(),
        deposit_paid: booking.deposit_paid,
        fee_paid: booking.fee_paid,
        recurrence: booking.recurrence,
    }
}

fn redacted_view(booking: &Booking) -> BookingView {
    BookingView {
        contact_name: None,
        contact_info: None,
        owner_role: None,
        owner_id: None,
        group_size: None,
        deposit_paid: None,
        fee_paid: None,
        ..full_view(booking)
    }
}
