use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::BoatSummary;

/// Resolves which boats are free for a window. Overlap uses half-open
/// intervals: `existing.start < new.end AND existing.end > new.start`, so
/// touching endpoints do not collide.
#[derive(Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Active boats of the company with capacity >= `min_capacity` that have
    /// neither an overlapping booking in a blocking status nor an overlapping
    /// blocked slot. No qualifying boats is an empty set, not an error.
    pub async fn find_available_boats(
        &self,
        company_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        min_capacity: i32,
    ) -> Result<Vec<BoatSummary>> {
        let boats = sqlx::query_as::<_, BoatSummary>(
            r#"
            SELECT b.id, b.name, b.capacity
            FROM boats b
            WHERE b.company_id = $1
              AND b.is_active
              AND b.capacity >= $2
              AND NOT EXISTS (
                  SELECT 1 FROM bookings bk
                  WHERE bk.boat_id = b.id
                    AND bk.booking_date = $3
                    AND bk.status IN ('pending_hold', 'confirmed', 'completed')
                    AND bk.start_time < $5
                    AND bk.end_time > $4
              )
              AND NOT EXISTS (
                  SELECT 1 FROM blocked_slots bs
                  WHERE bs.boat_id = b.id
                    AND bs.slot_date = $3
                    AND bs.start_time < $5
                    AND bs.end_time > $4
              )
            ORDER BY b.capacity, b.name
            "#,
        )
        .bind(company_id)
        .bind(min_capacity)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .fetch_all(&self.pool)
        .await?;

        Ok(boats)
    }

    /// Advisory pre-check for a single boat. The authoritative guard is the
    /// in-transaction re-check plus the exclusion constraint on bookings.
    pub async fn is_window_free(
        &self,
        boat_id: Uuid,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        exclude_booking: Option<Uuid>,
    ) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE boat_id = $1
                  AND booking_date = $2
                  AND status IN ('pending_hold', 'confirmed', 'completed')
                  AND start_time < $4
                  AND end_time > $3
                  AND ($5::uuid IS NULL OR id <> $5)
            ) OR EXISTS (
                SELECT 1 FROM blocked_slots
                WHERE boat_id = $1
                  AND slot_date = $2
                  AND start_time < $4
                  AND end_time > $3
            )
            "#,
        )
        .bind(boat_id)
        .bind(date)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude_booking)
        .fetch_one(&self.pool)
        .await?;

        Ok(!taken)
    }
}
