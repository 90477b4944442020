use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::db_enum;

db_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum CrewRole {
        Agent => "agent",
        Captain => "captain",
        Sailor => "sailor",
    }
}

db_enum! {
    /// How a captain charges for a charter. Replaces the legacy convention of
    /// `hourly_rate = 0` meaning either "owner, no charge" or "flat day rate".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum FeeMode {
        Hourly => "hourly",
        FlatDay => "flat_day",
        None => "none",
    }
}

/// Agent, captain or sailor attached to a company. Crew are referenced by
/// bookings, never locked; crew double-booking is not prevented here.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CrewMember {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub role: CrewRole,
    pub fee_mode: FeeMode,
    pub hourly_rate: BigDecimal,          // NUMERIC(10,2)
    pub flat_day_rate: BigDecimal,        // NUMERIC(10,2)
    pub commission_percentage: BigDecimal, // NUMERIC(5,2), agents only
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Sailor attached to one booking, with the rate and fee frozen at the time
/// the booking (or its crew) was last edited.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BookingSailor {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub sailor_id: Uuid,
    pub hourly_rate: BigDecimal,
    pub fee: BigDecimal,
    pub created_at: DateTime<Utc>,
}
