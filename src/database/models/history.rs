use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::booking::{Booking, BookingCategory, BookingStatus, PackageType};

// Action labels written to the audit trail.
#[allow(non_snake_case)]
pub mod BookingAction {
    pub const CREATED: &str = "created";
    pub const UPDATED: &str = "updated";
    pub const CONFIRMED: &str = "confirmed";
    pub const CANCELLED: &str = "cancelled";
    pub const COMPLETED: &str = "completed";
    pub const NO_SHOW: &str = "no_show";
    pub const HOLD_EXPIRED: &str = "hold_expired";
    pub const PAYMENT_RECORDED: &str = "payment_recorded";
}

/// Append-only audit entry. `old_data`/`new_data` are typed snapshots of the
/// booking row immediately before/after the mutation; the human-readable diff
/// is rendered lazily from the pair, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingHistoryEntry {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub action: String,
    pub actor_user_id: Option<Uuid>,
    pub note: Option<String>,
    pub old_data: Option<serde_json::Value>,
    pub new_data: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct AppendHistoryInput {
    pub booking_id: Uuid,
    pub action: String,
    pub actor_user_id: Option<Uuid>,
    pub note: Option<String>,
    pub old_data: Option<BookingSnapshot>,
    pub new_data: Option<BookingSnapshot>,
}

/// Snapshot of the fields worth auditing, with a fixed, typed field list so
/// the diff renderer never reflects over arbitrary keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub boat_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub captain_id: Option<Uuid>,
    pub sailor_ids: Vec<Uuid>,
    pub booking_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
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
    pub status: BookingStatus,
    pub notes: Option<String>,
}

impl BookingSnapshot {
    pub fn of(booking: &Booking, sailor_ids: Vec<Uuid>) -> Self {
        Self {
            customer_name: booking.customer_name.clone(),
            customer_phone: booking.customer_phone.clone(),
            customer_email: booking.customer_email.clone(),
            boat_id: booking.boat_id,
            agent_id: booking.agent_id,
            captain_id: booking.captain_id,
            sailor_ids,
            booking_date: booking.booking_date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            passengers: booking.passengers,
            package_type: booking.package_type,
            category: booking.category,
            is_bare_boat: booking.is_bare_boat,
            total_price: booking.total_price.clone(),
            deposit_amount: booking.deposit_amount.clone(),
            deposit_paid: booking.deposit_paid,
            discount_percentage: booking.discount_percentage.clone(),
            captain_fee: booking.captain_fee.clone(),
            sailor_fee: booking.sailor_fee.clone(),
            fuel_cost: booking.fuel_cost.clone(),
            package_addon_cost: booking.package_addon_cost.clone(),
            agent_commission: booking.agent_commission.clone(),
            status: booking.status,
            notes: booking.notes.clone(),
        }
    }
}

/// One rendered line of a history diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub field: String,
    pub label: String,
    pub before: String,
    pub after: String,
}
