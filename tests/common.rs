use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use facility_scheduler::domain::models::booking::{
    Booking, BookingRequest, OccurrencePatch, PaymentField, RecurrenceRequest, SeriesPatch,
};
use facility_scheduler::domain::models::role::{Role, RoleContext};
use facility_scheduler::domain::ports::BookingStore;
use facility_scheduler::domain::services::booking_service::BookingService;
use facility_scheduler::error::AppError;

/// In-memory store double, so engine tests run against literal fixtures
/// instead of a database.
#[derive(Default)]
pub struct MemoryBookingStore {
    bookings: Mutex<Vec<Booking>>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn all(&self) -> Vec<Booking> {
        self.bookings.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let mut matches: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.date == date)
            .cloned()
            .collect();
        matches.sort_by_key(|b| b.start_time);
        Ok(matches)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn find_by_series(&self, series_id: &str) -> Result<Vec<Booking>, AppError> {
        let mut matches: Vec<Booking> = self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.series_id.as_deref() == Some(series_id))
            .cloned()
            .collect();
        matches.sort_by_key(|b| b.date);
        Ok(matches)
    }

    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError> {
        Ok(self
            .bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.date >= from && b.date <= to)
            .cloned()
            .collect())
    }

    async fn insert_many(&self, bookings: &[Booking]) -> Result<Vec<Booking>, AppError> {
        let mut guard = self.bookings.lock().unwrap();
        let mut created = Vec::with_capacity(bookings.len());
        for draft in bookings {
            let mut booking = draft.clone();
            booking.id = Uuid::new_v4().to_string();
            guard.push(booking.clone());
            created.push(booking);
        }
        Ok(created)
    }

    async fn update_one(&self, id: &str, patch: &OccurrencePatch) -> Result<Booking, AppError> {
        let mut guard = self.bookings.lock().unwrap();
        let booking = guard
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Booking not found: {id}")))?;

        if let Some(date) = patch.date {
            booking.date = date;
        }
        if let Some(start) = patch.start_time {
            booking.start_time = start;
        }
        if let Some(end) = patch.end_time {
            booking.end_time = end;
        }
        if let Some(title) = &patch.title {
            booking.title = title.clone();
        }
        if let Some(description) = &patch.description {
            booking.description = description.clone();
        }
        if let Some(group_size) = patch.group_size {
            booking.group_size = Some(group_size);
        }
        if let Some(contact_name) = &patch.contact_name {
            booking.contact_name = Some(contact_name.clone());
        }
        if let Some(contact_info) = &patch.contact_info {
            booking.contact_info = Some(contact_info.clone());
        }
        if let Some(recorded) = patch.override_recorded {
            booking.override_recorded = recorded;
        }
        Ok(booking.clone())
    }

    async fn update_series(&self, series_id: &str, patch: &SeriesPatch) -> Result<u64, AppError> {
        let mut guard = self.bookings.lock().unwrap();
        let mut updated = 0;
        for booking in guard
            .iter_mut()
            .filter(|b| b.series_id.as_deref() == Some(series_id))
        {
            if let Some(start) = patch.start_time {
                booking.start_time = start;
            }
            if let Some(end) = patch.end_time {
                booking.end_time = end;
            }
            if let Some(title) = &patch.title {
                booking.title = title.clone();
            }
            if let Some(description) = &patch.description {
                booking.description = description.clone();
            }
            if let Some(group_size) = patch.group_size {
                booking.group_size = Some(group_size);
            }
            if let Some(contact_name) = &patch.contact_name {
                booking.contact_name = Some(contact_name.clone());
            }
            if let Some(contact_info) = &patch.contact_info {
                booking.contact_info = Some(contact_info.clone());
            }
            if let Some(recorded) = patch.override_recorded {
                booking.override_recorded = recorded;
            }
            updated += 1;
        }
        Ok(updated)
    }

    async fn add_exception(&self, series_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let mut guard = self.bookings.lock().unwrap();
        let anchor = guard
            .iter_mut()
            .find(|b| b.series_id.as_deref() == Some(series_id) && b.is_anchor)
            .ok_or_else(|| AppError::NotFound(format!("Series anchor not found: {series_id}")))?;
        if !anchor.exceptions.contains(&date) {
            anchor.exceptions.push(date);
            anchor.exceptions.sort();
        }
        Ok(())
    }

    async fn set_payment(
        &self,
        id: &str,
        field: PaymentField,
        value: bool,
    ) -> Result<Booking, AppError> {
        let mut guard = self.bookings.lock().unwrap();
        let booking = guard
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Booking not found: {id}")))?;
        match field {
            PaymentField::DepositPaid => booking.deposit_paid = Some(value),
            PaymentField::FeePaid => booking.fee_paid = Some(value),
        }
        Ok(booking.clone())
    }

    async fn delete_one(&self, id: &str) -> Result<(), AppError> {
        let mut guard = self.bookings.lock().unwrap();
        let before = guard.len();
        guard.retain(|b| b.id != id);
        if guard.len() == before {
            return Err(AppError::NotFound(format!("Booking not found: {id}")));
        }
        Ok(())
    }

    async fn delete_series(&self, series_id: &str) -> Result<u64, AppError> {
        let mut guard = self.bookings.lock().unwrap();
        let before = guard.len();
        guard.retain(|b| b.series_id.as_deref() != Some(series_id));
        Ok((before - guard.len()) as u64)
    }
}

#[allow(dead_code)]
pub fn setup() -> (BookingService, Arc<MemoryBookingStore>) {
    let store = Arc::new(MemoryBookingStore::new());
    (BookingService::new(store.clone()), store)
}

#[allow(dead_code)]
pub fn admin() -> RoleContext {
    RoleContext::new(Role::Admin, Some("admin-1".to_string()))
}

#[allow(dead_code)]
pub fn resident(id: &str) -> RoleContext {
    RoleContext::new(Role::Resident, Some(id.to_string()))
}

#[allow(dead_code)]
pub fn guest(id: &str) -> RoleContext {
    RoleContext::new(Role::Guest, Some(id.to_string()))
}

#[allow(dead_code)]
pub fn committee() -> RoleContext {
    RoleContext::new(Role::Committee, Some("committee-1".to_string()))
}

#[allow(dead_code)]
pub fn request(category: &str, date: &str, start: &str, end: &str, title: &str) -> BookingRequest {
    BookingRequest {
        category: Some(category.to_string()),
        date: Some(date.to_string()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        title: Some(title.to_string()),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn recurring(mut req: BookingRequest, unit: &str, count: i32) -> BookingRequest {
    req.recurring = Some(RecurrenceRequest {
        unit: unit.to_string(),
        count,
    });
    req
}

#[allow(dead_code)]
pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}
