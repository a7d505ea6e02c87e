use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::models::booking::{
    parse_date, parse_time, Booking, BookingRequest, Category, OccurrenceEdit, OccurrencePatch,
    PaymentField, SeriesEdit, SeriesPatch,
};
use crate::domain::models::role::RoleContext;
use crate::domain::ports::BookingStore;
use crate::domain::services::visibility::BookingView;
use crate::domain::services::{conflict, planner, role_gate, visibility};
use crate::error::AppError;

/// Orchestrates the scheduling engine over the store collaborator: role
/// gating, planning, persistence, and role-filtered reads. Single handler
/// surface for what the callers' transport layer invokes.
pub struct BookingService {
    store: Arc<dyn BookingStore>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    /// Plans and persists a booking request. Returns every created
    /// occurrence, or the full conflict breakdown as an error when blocking
    /// conflicts exist and no override was approved.
    pub async fn create(
        &self,
        request: &BookingRequest,
        ctx: &RoleContext,
    ) -> Result<Vec<Booking>, AppError> {
        if let Some(raw) = request.category.as_deref() {
            let category = Category::parse(raw)?;
            if !role_gate::can_create(ctx.role, category) {
                return Err(AppError::Forbidden(format!(
                    "Role {} may not create {} bookings",
                    ctx.role.as_str(),
                    category.as_str()
                )));
            }
        }

        let store = self.store.clone();
        let plan = planner::plan(request, ctx, move |date| {
            let store = store.clone();
            async move { store.find_by_date(date).await }
        })
        .await?;
        if plan.is_rejected() {
            return Err(AppError::BookingConflict(plan.conflicts));
        }

        let created = self.store.insert_many(&plan.accepted).await?;
        info!(
            count = created.len(),
            series = created.first().and_then(|b| b.series_id.as_deref()),
            "Bookings created"
        );
        Ok(created)
    }

    pub async fn get(&self, id: &str, ctx: &RoleContext) -> Result<BookingView, AppError> {
        let booking = self.require(id).await?;
        Ok(visibility::project(&booking, ctx))
    }

    /// All bookings in `[from, to]`, projected for the viewer and ordered by
    /// date then start time.
    pub async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        ctx: &RoleContext,
    ) -> Result<Vec<BookingView>, AppError> {
        let mut bookings = self.store.list_range(from, to).await?;
        bookings.sort_by(|a, b| (a.date, a.start_time).cmp(&(b.date, b.start_time)));
        Ok(bookings.iter().map(|b| visibility::project(b, ctx)).collect())
    }

    /// Edits one occurrence. A changed date or time range re-runs conflict
    /// detection against the target date, excluding the booking itself.
    pub async fn update(
        &self,
        id: &str,
        edit: &OccurrenceEdit,
        ctx: &RoleContext,
    ) -> Result<Booking, AppError> {
        let booking = self.require(id).await?;
        self.authorize_edit(&booking, ctx)?;

        let mut patch = OccurrencePatch {
            date: edit.date.as_deref().map(parse_date).transpose()?,
            start_time: edit.start_time.as_deref().map(parse_time).transpose()?,
            end_time: edit.end_time.as_deref().map(parse_time).transpose()?,
            title: edit.title.clone(),
            description: edit.description.clone(),
            group_size: edit.group_size,
            contact_name: edit.contact_name.clone(),
            contact_info: edit.contact_info.clone(),
            override_recorded: None,
        };

        let date = patch.date.unwrap_or(booking.date);
        let start = patch.start_time.unwrap_or(booking.start_time);
        let end = patch.end_time.unwrap_or(booking.end_time);
        if start >= end {
            return Err(AppError::Validation(
                "startTime must be before endTime".to_string(),
            ));
        }

        let timing_changed =
            date != booking.date || start != booking.start_time || end != booking.end_time;
        if timing_changed {
            let existing = self.store.find_by_date(date).await?;
            let others: Vec<Booking> =
                existing.into_iter().filter(|b| b.id != booking.id).collect();
            let blocking = conflict::find_blocking(start, end, booking.category, &others);
            if !blocking.is_empty() {
                if !edit.override_approved {
                    let mut report = BTreeMap::new();
                    report.insert(date, blocking);
                    return Err(AppError::BookingConflict(report));
                }
                patch.override_recorded = Some(true);
            }
        }

        let updated = self.store.update_one(id, &patch).await?;
        info!(id = %updated.id, "Booking updated");
        Ok(updated)
    }

    /// Edits the shared mutable fields of every occurrence in the booking's
    /// series. A booking without a series is edited alone, like the single
    /// path. A time change validates the effective range and re-runs conflict
    /// detection on every occurrence's date, excluding the series itself.
    pub async fn update_series(
        &self,
        id: &str,
        edit: &SeriesEdit,
        ctx: &RoleContext,
    ) -> Result<u64, AppError> {
        let booking = self.require(id).await?;
        self.authorize_edit(&booking, ctx)?;

        let mut patch = SeriesPatch {
            start_time: edit.start_time.as_deref().map(parse_time).transpose()?,
            end_time: edit.end_time.as_deref().map(parse_time).transpose()?,
            title: edit.title.clone(),
            description: edit.description.clone(),
            group_size: edit.group_size,
            contact_name: edit.contact_name.clone(),
            contact_info: edit.contact_info.clone(),
            override_recorded: None,
        };

        let occurrences = match booking.series_id.as_deref() {
            Some(series_id) => self.store.find_by_series(series_id).await?,
            None => vec![booking.clone()],
        };

        if patch.start_time.is_some() || patch.end_time.is_some() {
            let mut report = BTreeMap::new();
            for occurrence in &occurrences {
                // Merge with stored values: a partial patch still yields a
                // full range per occurrence.
                let start = patch.start_time.unwrap_or(occurrence.start_time);
                let end = patch.end_time.unwrap_or(occurrence.end_time);
                if start >= end {
                    return Err(AppError::Validation(
                        "startTime must be before endTime".to_string(),
                    ));
                }
                if start == occurrence.start_time && end == occurrence.end_time {
                    continue;
                }
                let existing = self.store.find_by_date(occurrence.date).await?;
                let others: Vec<Booking> = existing
                    .into_iter()
                    .filter(|b| !occurrences.iter().any(|o| o.id == b.id))
                    .collect();
                let blocking = conflict::find_blocking(start, end, occurrence.category, &others);
                if !blocking.is_empty() {
                    report.insert(occurrence.date, blocking);
                }
            }
            if !report.is_empty() {
                if !edit.override_approved {
                    return Err(AppError::BookingConflict(report));
                }
                patch.override_recorded = Some(true);
            }
        }

        let Some(series_id) = booking.series_id.as_deref() else {
            let single = OccurrencePatch {
                start_time: patch.start_time,
                end_time: patch.end_time,
                title: patch.title.clone(),
                description: patch.description.clone(),
                group_size: patch.group_size,
                contact_name: patch.contact_name.clone(),
                contact_info: patch.contact_info.clone(),
                override_recorded: patch.override_recorded,
                ..Default::default()
            };
            self.store.update_one(id, &single).await?;
            return Ok(1);
        };

        let updated = self.store.update_series(series_id, &patch).await?;
        info!(series_id, occurrences = updated, "Series updated");
        Ok(updated)
    }

    /// Removes one occurrence from a series and records its date as an
    /// exception on the anchor, so re-expansion keeps skipping it. The
    /// anchor itself cannot be skipped; it carries the rule.
    pub async fn skip_occurrence(&self, id: &str, ctx: &RoleContext) -> Result<(), AppError> {
        let booking = self.require(id).await?;
        self.authorize_edit(&booking, ctx)?;

        let Some(series_id) = booking.series_id.as_deref() else {
            return Err(AppError::Validation(
                "Booking is not part of a series".to_string(),
            ));
        };
        if booking.is_anchor {
            return Err(AppError::Validation(
                "The series anchor cannot be skipped; delete the series instead".to_string(),
            ));
        }

        self.store.delete_one(id).await?;
        self.store.add_exception(series_id, booking.date).await?;
        info!(series_id, date = %booking.date, "Occurrence skipped");
        Ok(())
    }

    /// Toggles a deposit/fee flag. Administrative roles only; rejected for
    /// categories that carry no payment state.
    pub async fn set_payment(
        &self,
        id: &str,
        field: PaymentField,
        value: bool,
        ctx: &RoleContext,
    ) -> Result<Booking, AppError> {
        if !ctx.role.is_administrative() {
            return Err(AppError::Forbidden(
                "Only administrators may record payments".to_string(),
            ));
        }
        let booking = self.require(id).await?;
        if !booking.category.is_paid() {
            return Err(AppError::Validation(format!(
                "Payment flags do not apply to {} bookings",
                booking.category.as_str()
            )));
        }
        self.store.set_payment(id, field, value).await
    }

    /// Deletes one booking. An anchor with surviving sibling occurrences is
    /// refused, keeping every series at exactly one anchor.
    pub async fn delete(&self, id: &str, ctx: &RoleContext) -> Result<(), AppError> {
        let booking = self.require(id).await?;
        self.authorize_edit(&booking, ctx)?;

        if booking.is_anchor {
            if let Some(series_id) = booking.series_id.as_deref() {
                let siblings = self.store.find_by_series(series_id).await?;
                if siblings.len() > 1 {
                    return Err(AppError::Validation(
                        "Cannot delete the series anchor while other occurrences remain; delete the series or skip an occurrence".to_string(),
                    ));
                }
            }
        }

        self.store.delete_one(id).await?;
        info!(id, "Booking deleted");
        Ok(())
    }

    pub async fn delete_series(&self, id: &str, ctx: &RoleContext) -> Result<u64, AppError> {
        let booking = self.require(id).await?;
        self.authorize_edit(&booking, ctx)?;

        let Some(series_id) = booking.series_id.as_deref() else {
            self.store.delete_one(id).await?;
            return Ok(1);
        };
        let deleted = self.store.delete_series(series_id).await?;
        info!(series_id, occurrences = deleted, "Series deleted");
        Ok(deleted)
    }

    async fn require(&self, id: &str) -> Result<Booking, AppError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking not found: {id}")))
    }

    fn authorize_edit(&self, booking: &Booking, ctx: &RoleContext) -> Result<(), AppError> {
        if role_gate::can_edit(ctx, booking) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Role {} may not edit this booking",
                ctx.role.as_str()
            )))
        }
    }
}
