use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{
    AppendHistoryInput, Booking, BookingAction, BookingCategory, BookingSailor, BookingSnapshot,
    BookingStatus, PackageType,
};
use crate::database::repositories::history::append_in_tx;
use crate::error::AppError;

const BOOKING_COLUMNS: &str = "id, company_id, boat_id, agent_id, captain_id, customer_name, \
     customer_phone, customer_email, booking_date, start_time, end_time, passengers, \
     package_type, category, is_bare_boat, total_price, deposit_amount, deposit_paid, \
     discount_percentage, captain_fee, sailor_fee, fuel_cost, package_addon_cost, \
     agent_commission, status, hold_until, notes, cancellation_reason, cancelled_at, \
     completed_at, created_at, updated_at";

/// Fully computed booking row ready for insertion. Fees are part of the record
/// because the cost basis is frozen at creation time.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub company_id: Uuid,
    pub boat_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub captain_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub passengers: i32,
    pub package_type: PackageType,
    pub category: BookingCategory,
    pub is_bare_boat: bool,
    pub total_price: BigDecimal,
    pub deposit_amount: BigDecimal,
    pub discount_percentage: BigDecimal,
    pub captain_fee: BigDecimal,
    pub sailor_fee: BigDecimal,
    pub fuel_cost: BigDecimal,
    pub package_addon_cost: BigDecimal,
    pub agent_commission: BigDecimal,
    pub status: BookingStatus,
    pub hold_until: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBookingSailor {
    pub sailor_id: Uuid,
    pub hourly_rate: BigDecimal,
    pub fee: BigDecimal,
}

/// Editable fields plus the fee basis recomputed by the service. Date, time
/// and boat never appear here: those edits are cancel-and-recreate.
#[derive(Debug, Clone)]
pub struct BookingUpdate {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub agent_id: Option<Uuid>,
    pub captain_id: Option<Uuid>,
    pub passengers: i32,
    pub package_type: PackageType,
    pub category: BookingCategory,
    pub is_bare_boat: bool,
    pub total_price: BigDecimal,
    pub deposit_amount: BigDecimal,
    pub deposit_paid: bool,
    pub discount_percentage: BigDecimal,
    pub captain_fee: BigDecimal,
    pub sailor_fee: BigDecimal,
    pub fuel_cost: BigDecimal,
    pub package_addon_cost: BigDecimal,
    pub agent_commission: BigDecimal,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a booking, its sailor set and the `created` audit entry in one
    /// transaction. The window is re-checked inside the transaction; a
    /// concurrent insert slipping through still trips the exclusion
    /// constraint, which surfaces as SQLSTATE 23P01 (mapped to Conflict).
    pub async fn create(
        &self,
        new: NewBooking,
        sailors: Vec<NewBookingSailor>,
        actor: Option<Uuid>,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let window_taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM bookings
                WHERE boat_id = $1
                  AND booking_date = $2
                  AND status IN ('pending_hold', 'confirmed', 'completed')
                  AND start_time < $4
                  AND end_time > $3
            ) OR EXISTS (
                SELECT 1 FROM blocked_slots
                WHERE boat_id = $1
                  AND slot_date = $2
                  AND start_time < $4
                  AND end_time > $3
            )
            "#,
        )
        .bind(new.boat_id)
        .bind(new.booking_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .fetch_one(&mut *tx)
        .await?;

        if window_taken {
            return Err(AppError::Conflict(
                "This boat is already booked for this time".to_string(),
            ));
        }

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            INSERT INTO bookings (
                company_id, boat_id, agent_id, captain_id, customer_name, customer_phone,
                customer_email, booking_date, start_time, end_time, passengers, package_type,
                category, is_bare_boat, total_price, deposit_amount, discount_percentage,
                captain_fee, sailor_fee, fuel_cost, package_addon_cost, agent_commission,
                status, hold_until, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                    $17, $18, $19, $20, $21, $22, $23, $24, $25)
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(new.company_id)
        .bind(new.boat_id)
        .bind(new.agent_id)
        .bind(new.captain_id)
        .bind(&new.customer_name)
        .bind(&new.customer_phone)
        .bind(&new.customer_email)
        .bind(new.booking_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.passengers)
        .bind(new.package_type)
        .bind(new.category)
        .bind(new.is_bare_boat)
        .bind(&new.total_price)
        .bind(&new.deposit_amount)
        .bind(&new.discount_percentage)
        .bind(&new.captain_fee)
        .bind(&new.sailor_fee)
        .bind(&new.fuel_cost)
        .bind(&new.package_addon_cost)
        .bind(&new.agent_commission)
        .bind(new.status)
        .bind(new.hold_until)
        .bind(&new.notes)
        .fetch_one(&mut *tx)
        .await?;

        let sailor_ids = insert_sailors(&mut tx, booking.id, &sailors).await?;

        append_in_tx(
            &mut tx,
            &AppendHistoryInput {
                booking_id: booking.id,
                action: BookingAction::CREATED.to_string(),
                actor_user_id: actor,
                note: None,
                old_data: None,
                new_data: Some(BookingSnapshot::of(&booking, sailor_ids)),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 AND company_id = $2"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE company_id = $1
              AND ($2::date IS NULL OR booking_date >= $2)
              AND ($3::date IS NULL OR booking_date <= $3)
            ORDER BY booking_date, start_time
            "#
        ))
        .bind(company_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn list_for_boat_date(&self, boat_id: Uuid, date: NaiveDate) -> Result<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            r#"
            SELECT {BOOKING_COLUMNS} FROM bookings
            WHERE boat_id = $1 AND booking_date = $2
            ORDER BY start_time
            "#
        ))
        .bind(boat_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    pub async fn sailors_for(&self, booking_id: Uuid) -> Result<Vec<BookingSailor>> {
        let sailors = sqlx::query_as::<_, BookingSailor>(
            r#"
            SELECT id, booking_id, sailor_id, hourly_rate, fee, created_at
            FROM booking_sailors
            WHERE booking_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sailors)
    }

    /// `pending_hold -> confirmed`. Returns None when the booking is no longer
    /// in `pending_hold` (raced transition or wrong state).
    pub async fn confirm(
        &self,
        id: Uuid,
        deposit_paid: Option<bool>,
        actor: Option<Uuid>,
        old: BookingSnapshot,
    ) -> Result<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'confirmed',
                hold_until = NULL,
                deposit_paid = COALESCE($2, deposit_paid),
                updated_at = now()
            WHERE id = $1 AND status = 'pending_hold'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(deposit_paid)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = booking else {
            return Ok(None);
        };

        let sailor_ids = sailor_ids_in_tx(&mut tx, booking.id).await?;
        append_in_tx(
            &mut tx,
            &AppendHistoryInput {
                booking_id: booking.id,
                action: BookingAction::CONFIRMED.to_string(),
                actor_user_id: actor,
                note: None,
                old_data: Some(old),
                new_data: Some(BookingSnapshot::of(&booking, sailor_ids)),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(Some(booking))
    }

    /// Explicit cancel from `pending_hold` or `confirmed`; releases the window
    /// immediately. `action` distinguishes user cancels from hold expiry.
    pub async fn cancel(
        &self,
        id: Uuid,
        reason: &str,
        action: &str,
        actor: Option<Uuid>,
        old: BookingSnapshot,
    ) -> Result<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                cancellation_reason = $2,
                cancelled_at = now(),
                hold_until = NULL,
                updated_at = now()
            WHERE id = $1 AND status IN ('pending_hold', 'confirmed')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(reason)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = booking else {
            return Ok(None);
        };

        let sailor_ids = sailor_ids_in_tx(&mut tx, booking.id).await?;
        append_in_tx(
            &mut tx,
            &AppendHistoryInput {
                booking_id: booking.id,
                action: action.to_string(),
                actor_user_id: actor,
                note: Some(reason.to_string()),
                old_data: Some(old),
                new_data: Some(BookingSnapshot::of(&booking, sailor_ids)),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(Some(booking))
    }

    /// `confirmed -> completed`. The date guard lives in the service.
    pub async fn complete(
        &self,
        id: Uuid,
        actor: Option<Uuid>,
        old: BookingSnapshot,
    ) -> Result<Option<Booking>> {
        self.finish(id, BookingStatus::Completed, BookingAction::COMPLETED, actor, old)
            .await
    }

    /// `confirmed -> no_show`. No price adjustment is made automatically.
    pub async fn mark_no_show(
        &self,
        id: Uuid,
        actor: Option<Uuid>,
        old: BookingSnapshot,
    ) -> Result<Option<Booking>> {
        self.finish(id, BookingStatus::NoShow, BookingAction::NO_SHOW, actor, old)
            .await
    }

    async fn finish(
        &self,
        id: Uuid,
        status: BookingStatus,
        action: &str,
        actor: Option<Uuid>,
        old: BookingSnapshot,
    ) -> Result<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = $2,
                completed_at = CASE WHEN $2 = 'completed' THEN now() ELSE completed_at END,
                updated_at = now()
            WHERE id = $1 AND status = 'confirmed'
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = booking else {
            return Ok(None);
        };

        let sailor_ids = sailor_ids_in_tx(&mut tx, booking.id).await?;
        append_in_tx(
            &mut tx,
            &AppendHistoryInput {
                booking_id: booking.id,
                action: action.to_string(),
                actor_user_id: actor,
                note: None,
                old_data: Some(old),
                new_data: Some(BookingSnapshot::of(&booking, sailor_ids)),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(Some(booking))
    }

    /// In-place edit of the editable fields, replacing the sailor set
    /// atomically with the booking row update.
    pub async fn update_editable(
        &self,
        id: Uuid,
        upd: BookingUpdate,
        sailors: Vec<NewBookingSailor>,
        actor: Option<Uuid>,
        old: BookingSnapshot,
    ) -> Result<Option<Booking>> {
        let mut tx = self.pool.begin().await?;

        let booking = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET customer_name = $2,
                customer_phone = $3,
                customer_email = $4,
                agent_id = $5,
                captain_id = $6,
                passengers = $7,
                package_type = $8,
                category = $9,
                is_bare_boat = $10,
                total_price = $11,
                deposit_amount = $12,
                deposit_paid = $13,
                discount_percentage = $14,
                captain_fee = $15,
                sailor_fee = $16,
                fuel_cost = $17,
                package_addon_cost = $18,
                agent_commission = $19,
                notes = $20,
                updated_at = now()
            WHERE id = $1 AND status IN ('pending_hold', 'confirmed')
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&upd.customer_name)
        .bind(&upd.customer_phone)
        .bind(&upd.customer_email)
        .bind(upd.agent_id)
        .bind(upd.captain_id)
        .bind(upd.passengers)
        .bind(upd.package_type)
        .bind(upd.category)
        .bind(upd.is_bare_boat)
        .bind(&upd.total_price)
        .bind(&upd.deposit_amount)
        .bind(upd.deposit_paid)
        .bind(&upd.discount_percentage)
        .bind(&upd.captain_fee)
        .bind(&upd.sailor_fee)
        .bind(&upd.fuel_cost)
        .bind(&upd.package_addon_cost)
        .bind(&upd.agent_commission)
        .bind(&upd.notes)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(booking) = booking else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM booking_sailors WHERE booking_id = $1")
            .bind(booking.id)
            .execute(&mut *tx)
            .await?;
        let sailor_ids = insert_sailors(&mut tx, booking.id, &sailors).await?;

        append_in_tx(
            &mut tx,
            &AppendHistoryInput {
                booking_id: booking.id,
                action: BookingAction::UPDATED.to_string(),
                actor_user_id: actor,
                note: None,
                old_data: Some(old),
                new_data: Some(BookingSnapshot::of(&booking, sailor_ids)),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(Some(booking))
    }

    /// Release every expired hold in one sweep. The WHERE clause only matches
    /// rows still on hold, so sweeping twice is a no-op for already-released
    /// bookings. Returns the bookings that were released by this call.
    pub async fn release_expired_holds(
        &self,
        now: DateTime<Utc>,
        reason: &str,
    ) -> Result<Vec<Booking>> {
        let mut tx = self.pool.begin().await?;

        let released = sqlx::query_as::<_, Booking>(&format!(
            r#"
            UPDATE bookings
            SET status = 'cancelled',
                cancellation_reason = $2,
                cancelled_at = now(),
                hold_until = NULL,
                updated_at = now()
            WHERE status = 'pending_hold' AND hold_until < $1
            RETURNING {BOOKING_COLUMNS}
            "#
        ))
        .bind(now)
        .bind(reason)
        .fetch_all(&mut *tx)
        .await?;

        for booking in &released {
            let sailor_ids = sailor_ids_in_tx(&mut tx, booking.id).await?;
            let new_snapshot = BookingSnapshot::of(booking, sailor_ids);
            let mut old_snapshot = new_snapshot.clone();
            old_snapshot.status = BookingStatus::PendingHold;

            append_in_tx(
                &mut tx,
                &AppendHistoryInput {
                    booking_id: booking.id,
                    action: BookingAction::HOLD_EXPIRED.to_string(),
                    actor_user_id: None,
                    note: Some(reason.to_string()),
                    old_data: Some(old_snapshot),
                    new_data: Some(new_snapshot),
                },
            )
            .await?;
        }

        tx.commit().await?;

        Ok(released)
    }
}

async fn insert_sailors(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
    sailors: &[NewBookingSailor],
) -> Result<Vec<Uuid>, sqlx::Error> {
    let mut ids = Vec::with_capacity(sailors.len());
    for sailor in sailors {
        sqlx::query(
            r#"
            INSERT INTO booking_sailors (booking_id, sailor_id, hourly_rate, fee)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(booking_id)
        .bind(sailor.sailor_id)
        .bind(&sailor.hourly_rate)
        .bind(&sailor.fee)
        .execute(&mut **tx)
        .await?;
        ids.push(sailor.sailor_id);
    }

    Ok(ids)
}

async fn sailor_ids_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    booking_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT sailor_id FROM booking_sailors WHERE booking_id = $1 ORDER BY created_at, id",
    )
    .bind(booking_id)
    .fetch_all(&mut **tx)
    .await
}
