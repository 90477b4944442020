use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fleet operator. The per-person package costs feed the add-on calculator.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    pub currency: String,
    pub drinks_cost_per_person: BigDecimal, // NUMERIC(10,2)
    pub food_cost_per_person: BigDecimal,   // NUMERIC(10,2)
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanySettingsInput {
    pub drinks_cost_per_person: BigDecimal,
    pub food_cost_per_person: BigDecimal,
}
