use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::booking::PackageType;
use crate::database::models::macros::db_enum;

db_enum! {
    /// Pricing duration bucket, derivable from the booked window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DurationSlot {
        Sunset => "sunset",
        HalfDay => "half_day",
        ThreeQuarterDay => "three_quarter_day",
        FullDay => "full_day",
    }
}

impl DurationSlot {
    pub fn hours(&self) -> i64 {
        match self {
            DurationSlot::Sunset => 2,
            DurationSlot::HalfDay => 4,
            DurationSlot::ThreeQuarterDay => 6,
            DurationSlot::FullDay => 8,
        }
    }

    /// Smallest slot covering the window; charters longer than a full day do
    /// not exist in this business.
    pub fn from_window(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        let hours = (end - start).num_minutes() as f64 / 60.0;
        if hours <= 0.0 {
            return None;
        }
        if hours <= 2.0 {
            Some(DurationSlot::Sunset)
        } else if hours <= 4.0 {
            Some(DurationSlot::HalfDay)
        } else if hours <= 6.0 {
            Some(DurationSlot::ThreeQuarterDay)
        } else if hours <= 8.0 {
            Some(DurationSlot::FullDay)
        } else {
            None
        }
    }
}

/// Reference data: (boat, duration, package) -> customer price.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Pricing {
    pub id: Uuid,
    pub company_id: Uuid,
    pub boat_id: Uuid,
    pub duration_slot: DurationSlot,
    pub package_type: PackageType,
    pub price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInput {
    pub company_id: Uuid,
    pub boat_id: Uuid,
    pub duration_slot: DurationSlot,
    pub package_type: PackageType,
    pub price: BigDecimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn t(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn slots_cover_the_usual_windows() {
        assert_eq!(
            DurationSlot::from_window(t(18), t(20)),
            Some(DurationSlot::Sunset)
        );
        assert_eq!(
            DurationSlot::from_window(t(10), t(14)),
            Some(DurationSlot::HalfDay)
        );
        assert_eq!(
            DurationSlot::from_window(t(10), t(16)),
            Some(DurationSlot::ThreeQuarterDay)
        );
        assert_eq!(
            DurationSlot::from_window(t(9), t(17)),
            Some(DurationSlot::FullDay)
        );
    }

    #[test]
    fn degenerate_and_oversized_windows_have_no_slot() {
        assert_eq!(DurationSlot::from_window(t(10), t(10)), None);
        assert_eq!(DurationSlot::from_window(t(14), t(10)), None);
        assert_eq!(DurationSlot::from_window(t(8), t(20)), None);
    }
}
