use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Boat {
    pub id: Uuid,
    pub company_id: Uuid,
    pub name: String,
    pub capacity: i32,
    pub is_active: bool,
    /// Liters per hour; None for non-motorized or unconfigured boats.
    pub fuel_consumption_lph: Option<BigDecimal>,
    pub fuel_price_per_liter: Option<BigDecimal>,
    pub created_at: DateTime<Utc>,
}

/// What the availability search returns: enough for a picker, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BoatSummary {
    pub id: Uuid,
    pub name: String,
    pub capacity: i32,
}

/// Maintenance or manual block taking a boat out of a time window.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlockedSlot {
    pub id: Uuid,
    pub boat_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlockedSlotInput {
    pub boat_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
}
