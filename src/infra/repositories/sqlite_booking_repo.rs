use crate::domain::models::booking::{
    Booking, Category, OccurrencePatch, PaymentField, Recurrence, RecurrenceUnit, SeriesPatch,
};
use crate::domain::models::role::Role;
use crate::domain::ports::BookingStore;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = "id, series_id, is_anchor, date, start_time, end_time, category, \
     title, description, group_size, contact_name, contact_info, owner_role, owner_id, \
     deposit_paid, fee_paid, recur_unit, recur_count, exceptions, override_recorded, created_at";

fn row_to_booking(row: &SqliteRow) -> Result<Booking, AppError> {
    let category: String = row.try_get("category")?;
    let owner_role: Option<String> = row.try_get("owner_role")?;
    let recur_unit: Option<String> = row.try_get("recur_unit")?;
    let recur_count: Option<i64> = row.try_get("recur_count")?;
    let exceptions_json: String = row.try_get("exceptions")?;

    let recurrence = match (recur_unit, recur_count) {
        (Some(unit), Some(count)) => Some(Recurrence {
            unit: RecurrenceUnit::parse(&unit)?,
            count: count as u32,
        }),
        _ => None,
    };

    let exceptions: Vec<NaiveDate> = serde_json::from_str(&exceptions_json)
        .map_err(|e| AppError::Validation(format!("Corrupt exceptions column: {e}")))?;

    Ok(Booking {
        id: row.try_get("id")?,
        series_id: row.try_get("series_id")?,
        is_anchor: row.try_get("is_anchor")?,
        date: row.try_get::<NaiveDate, _>("date")?,
        start_time: row.try_get::<NaiveTime, _>("start_time")?,
        end_time: row.try_get::<NaiveTime, _>("end_time")?,
        category: Category::parse(&category)?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        group_size: row.try_get("group_size")?,
        contact_name: row.try_get("contact_name")?,
        contact_info: row.try_get("contact_info")?,
        owner_role: owner_role.as_deref().and_then(Role::parse),
        owner_id: row.try_get("owner_id")?,
        deposit_paid: row.try_get("deposit_paid")?,
        fee_paid: row.try_get("fee_paid")?,
        recurrence,
        exceptions,
        override_recorded: row.try_get("override_recorded")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
    })
}

#[async_trait]
impl BookingStore for SqliteBookingRepo {
    async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM bookings WHERE date = ? ORDER BY start_time ASC"
        ))
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_booking).collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        let row = sqlx::query(&format!("SELECT {SELECT_COLUMNS} FROM bookings WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(row_to_booking).transpose()
    }

    async fn find_by_series(&self, series_id: &str) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM bookings WHERE series_id = ? ORDER BY date ASC"
        ))
        .bind(series_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_booking).collect()
    }

    async fn list_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {SELECT_COLUMNS} FROM bookings WHERE date >= ? AND date <= ? \
             ORDER BY date ASC, start_time ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_booking).collect()
    }

    async fn insert_many(&self, bookings: &[Booking]) -> Result<Vec<Booking>, AppError> {
        // One transaction per plan: either every occurrence lands or none do.
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(bookings.len());

        for draft in bookings {
            let mut booking = draft.clone();
            booking.id = Uuid::new_v4().to_string();

            let exceptions = serde_json::to_string(&booking.exceptions)
                .map_err(|e| AppError::Validation(format!("Unserializable exceptions: {e}")))?;

            sqlx::query(
                "INSERT INTO bookings (id, series_id, is_anchor, date, start_time, end_time, \
                 category, title, description, group_size, contact_name, contact_info, \
                 owner_role, owner_id, deposit_paid, fee_paid, recur_unit, recur_count, \
                 exceptions, override_recorded, created_at) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&booking.id)
            .bind(&booking.series_id)
            .bind(booking.is_anchor)
            .bind(booking.date)
            .bind(booking.start_time)
            .bind(booking.end_time)
            .bind(booking.category.as_str())
            .bind(&booking.title)
            .bind(&booking.description)
            .bind(booking.group_size)
            .bind(&booking.contact_name)
            .bind(&booking.contact_info)
            .bind(booking.owner_role.map(|r| r.as_str()))
            .bind(&booking.owner_id)
            .bind(booking.deposit_paid)
            .bind(booking.fee_paid)
            .bind(booking.recurrence.map(|r| r.unit.as_str()))
            .bind(booking.recurrence.map(|r| r.count as i64))
            .bind(&exceptions)
            .bind(booking.override_recorded)
            .bind(booking.created_at)
            .execute(&mut *tx)
            .await?;

            created.push(booking);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn update_one(&self, id: &str, patch: &OccurrencePatch) -> Result<Booking, AppError> {
        let row = sqlx::query(&format!(
            "UPDATE bookings SET \
             date = COALESCE(?, date), \
             start_time = COALESCE(?, start_time), \
             end_time = COALESCE(?, end_time), \
             title = COALESCE(?, title), \
             description = COALESCE(?, description), \
             group_size = COALESCE(?, group_size), \
             contact_name = COALESCE(?, contact_name), \
             contact_info = COALESCE(?, contact_info), \
             override_recorded = COALESCE(?, override_recorded) \
             WHERE id = ? RETURNING {SELECT_COLUMNS}"
        ))
        .bind(patch.date)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.group_size)
        .bind(&patch.contact_name)
        .bind(&patch.contact_info)
        .bind(patch.override_recorded)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row_to_booking(&row),
            None => Err(AppError::NotFound(format!("Booking not found: {id}"))),
        }
    }

    async fn update_series(&self, series_id: &str, patch: &SeriesPatch) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE bookings SET \
             start_time = COALESCE(?, start_time), \
             end_time = COALESCE(?, end_time), \
             title = COALESCE(?, title), \
             description = COALESCE(?, description), \
             group_size = COALESCE(?, group_size), \
             contact_name = COALESCE(?, contact_name), \
             contact_info = COALESCE(?, contact_info), \
             override_recorded = COALESCE(?, override_recorded) \
             WHERE series_id = ?",
        )
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.group_size)
        .bind(&patch.contact_name)
        .bind(&patch.contact_info)
        .bind(patch.override_recorded)
        .bind(series_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn add_exception(&self, series_id: &str, date: NaiveDate) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT id, exceptions FROM bookings WHERE series_id = ? AND is_anchor = 1")
            .bind(series_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Series anchor not found: {series_id}")))?;

        let anchor_id: String = row.try_get("id")?;
        let exceptions_json: String = row.try_get("exceptions")?;
        let mut exceptions: Vec<NaiveDate> = serde_json::from_str(&exceptions_json)
            .map_err(|e| AppError::Validation(format!("Corrupt exceptions column: {e}")))?;

        if !exceptions.contains(&date) {
            exceptions.push(date);
            exceptions.sort();
        }
        let updated = serde_json::to_string(&exceptions)
            .map_err(|e| AppError::Validation(format!("Unserializable exceptions: {e}")))?;

        sqlx::query("UPDATE bookings SET exceptions = ? WHERE id = ?")
            .bind(&updated)
            .bind(&anchor_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn set_payment(
        &self,
        id: &str,
        field: PaymentField,
        value: bool,
    ) -> Result<Booking, AppError> {
        let column = match field {
            PaymentField::DepositPaid => "deposit_paid",
            PaymentField::FeePaid => "fee_paid",
        };
        let row = sqlx::query(&format!(
            "UPDATE bookings SET {column} = ? WHERE id = ? RETURNING {SELECT_COLUMNS}"
        ))
        .bind(value)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row_to_booking(&row),
            None => Err(AppError::NotFound(format!("Booking not found: {id}"))),
        }
    }

    async fn delete_one(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking not found: {id}")));
        }
        Ok(())
    }

    async fn delete_series(&self, series_id: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE series_id = ?")
            .bind(series_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
