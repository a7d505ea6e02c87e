use crate::domain::models::booking::{
    Booking, OccurrencePatch, PaymentField, SeriesPatch,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Event store collaborator. The engine only reads and writes through this
/// trait; transactions, uniqueness constraints, and any cross-request
/// serialization live behind it.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn find_by_series(&self, series_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError>;

    /// Persists every occurrence of an accepted plan, assigning ids.
    /// All-or-nothing: a failure must leave none of them written.
    async fn insert_many(&self, bookings: &[Booking]) -> Result<Vec<Booking>, AppError>;

    async fn update_one(&self, id: &str, patch: &OccurrencePatch) -> Result<Booking, AppError>;
    async fn update_series(&self, series_id: &str, patch: &SeriesPatch) -> Result<u64, AppError>;

    /// Records an exception date on the series anchor.
    async fn add_exception(&self, series_id: &str, date: NaiveDate) -> Result<(), AppError>;

    async fn set_payment(
        &self,
        id: &str,
        field: PaymentField,
        value: bool,
    ) -> Result<Booking, AppError>;

    async fn delete_one(&self, id: &str) -> Result<(), AppError>;
    async fn delete_series(&self, series_id: &str) -> Result<u64, AppError>;
}
