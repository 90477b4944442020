use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::db_enum;

db_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WaitlistStatus {
        Active => "active",
        Contacted => "contacted",
        Converted => "converted",
        Cancelled => "cancelled",
        Expired => "expired",
    }
}

impl WaitlistStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WaitlistStatus::Converted | WaitlistStatus::Cancelled | WaitlistStatus::Expired
        )
    }
}

/// A customer's standing request for a date. Terminates either by conversion
/// into a real booking (linking back to it) or by cancellation/expiry.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub id: Uuid,
    pub company_id: Uuid,
    pub boat_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub requested_date: NaiveDate,
    pub passengers: i32,
    pub notes: Option<String>,
    pub status: WaitlistStatus,
    pub converted_booking_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWaitlistInput {
    pub company_id: Uuid,
    pub boat_id: Option<Uuid>,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub customer_email: Option<String>,
    pub requested_date: NaiveDate,
    pub passengers: i32,
    pub notes: Option<String>,
}
