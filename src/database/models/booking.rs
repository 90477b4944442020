use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::db_enum;

db_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BookingStatus {
        PendingHold => "pending_hold",
        Confirmed => "confirmed",
        Completed => "completed",
        Cancelled => "cancelled",
        NoShow => "no_show",
    }
}

impl BookingStatus {
    /// Statuses that keep a boat's time window occupied. Cancelled and no-show
    /// bookings do not constrain availability.
    pub fn blocks_availability(&self) -> bool {
        matches!(
            self,
            BookingStatus::PendingHold | BookingStatus::Confirmed | BookingStatus::Completed
        )
    }

    /// Terminal statuses accept no further transitions or edits.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::NoShow
        )
    }
}

db_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PackageType {
        CharterOnly => "charter_only",
        CharterDrinks => "charter_drinks",
        CharterFood => "charter_food",
        CharterFull => "charter_full",
    }
}

db_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BookingCategory {
        Commercial => "commercial",
        Internal => "internal",
        OwnerUse => "owner_use",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
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
    pub deposit_paid: bool,
    pub discount_percentage: BigDecimal,
    // Cost basis, frozen at creation or package/crew edit for audit stability.
    pub captain_fee: BigDecimal,
    pub sailor_fee: BigDecimal,
    pub fuel_cost: BigDecimal,
    pub package_addon_cost: BigDecimal,
    pub agent_commission: BigDecimal,
    pub status: BookingStatus,
    pub hold_until: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub cancellation_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn duration_hours_decimal(&self) -> BigDecimal {
        let minutes = (self.end_time - self.start_time).num_minutes();
        BigDecimal::from(minutes) / BigDecimal::from(60)
    }

    /// Whether the chartered window has fully elapsed. Completion and no-show
    /// are only meaningful for past bookings.
    pub fn is_in_past(&self, now: DateTime<Utc>) -> bool {
        self.booking_date
            .and_time(self.end_time)
            .and_utc()
            < now
    }
}

/// Half-open interval intersection: touching endpoints do not overlap.
/// The live predicate is the SQL in the availability queries and the
/// exclusion constraint; this mirror exists so the rule stays testable
/// without a database.
#[cfg(test)]
fn windows_overlap(
    existing_start: NaiveTime,
    existing_end: NaiveTime,
    new_start: NaiveTime,
    new_end: NaiveTime,
) -> bool {
    existing_start < new_end && existing_end > new_start
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreateMode {
    /// Time-boxed hold that expires unless confirmed.
    Hold,
    /// Immediate confirmation, skipping the hold step.
    Confirm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingInput {
    pub company_id: Uuid,
    pub boat_id: Uuid,
    pub agent_id: Option<Uuid>,
    pub captain_id: Option<Uuid>,
    pub sailor_ids: Vec<Uuid>,
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
    /// When absent the price comes from the pricing table.
    pub total_price: Option<BigDecimal>,
    pub deposit_amount: Option<BigDecimal>,
    pub discount_percentage: Option<BigDecimal>,
    pub notes: Option<String>,
    pub mode: CreateMode,
    /// Explicit policy flag: passengers above boat capacity is a validation
    /// error unless the caller opts into a warning instead.
    #[serde(default)]
    pub allow_over_capacity: bool,
}

/// Full replacement of the editable fields. Date, time and boat are absent on
/// purpose: changing those means cancel-and-recreate, and a request that tries
/// to smuggle them in is rejected at deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBookingInput {
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub agent_id: Option<Uuid>,
    pub captain_id: Option<Uuid>,
    pub sailor_ids: Vec<Uuid>,
    pub passengers: i32,
    pub package_type: PackageType,
    pub category: BookingCategory,
    pub is_bare_boat: bool,
    pub total_price: BigDecimal,
    pub deposit_amount: BigDecimal,
    pub deposit_paid: bool,
    pub discount_percentage: BigDecimal,
    pub notes: Option<String>,
    #[serde(default)]
    pub allow_over_capacity: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmBookingInput {
    pub deposit_paid: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingInput {
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        assert!(!windows_overlap(t(10, 0), t(14, 0), t(14, 0), t(18, 0)));
        assert!(!windows_overlap(t(14, 0), t(18, 0), t(10, 0), t(14, 0)));
    }

    #[test]
    fn boundary_proximity_overlaps() {
        // Existing 10:00-14:00 vs requested 13:00-17:00.
        assert!(windows_overlap(t(10, 0), t(14, 0), t(13, 0), t(17, 0)));
    }

    #[test]
    fn containment_overlaps_both_ways() {
        assert!(windows_overlap(t(10, 0), t(18, 0), t(12, 0), t(14, 0)));
        assert!(windows_overlap(t(12, 0), t(14, 0), t(10, 0), t(18, 0)));
    }

    #[test]
    fn disjoint_windows_do_not_overlap() {
        assert!(!windows_overlap(t(8, 0), t(10, 0), t(15, 0), t(17, 0)));
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            BookingStatus::PendingHold,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert_eq!(status.as_str().parse::<BookingStatus>().unwrap(), status);
        }
        assert!("definitely_not_a_status".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn terminal_and_blocking_sets_are_consistent() {
        assert!(BookingStatus::PendingHold.blocks_availability());
        assert!(BookingStatus::Confirmed.blocks_availability());
        assert!(BookingStatus::Completed.blocks_availability());
        assert!(!BookingStatus::Cancelled.blocks_availability());
        assert!(!BookingStatus::NoShow.blocks_availability());

        assert!(!BookingStatus::PendingHold.is_terminal());
        assert!(!BookingStatus::Confirmed.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::NoShow.is_terminal());
    }
}
