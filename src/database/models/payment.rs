use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::macros::db_enum;

db_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentType {
        Deposit => "deposit",
        FinalPayment => "final_payment",
        FullPayment => "full_payment",
        Refund => "refund",
        PartialRefund => "partial_refund",
    }
}

impl PaymentType {
    pub fn is_refund(&self) -> bool {
        matches!(self, PaymentType::Refund | PaymentType::PartialRefund)
    }
}

db_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        Cash => "cash",
        Card => "card",
        BankTransfer => "bank_transfer",
        PaymentLink => "payment_link",
        Other => "other",
    }
}

/// One row of the append-only ledger. Amounts are signed: payments positive,
/// refunds negative. The ledger sum is the source of truth for money collected.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PaymentTransaction {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub amount: BigDecimal, // NUMERIC(10,2), signed
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub paid_on: NaiveDate,
    pub recorded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransactionInput {
    pub amount: BigDecimal,
    pub payment_type: PaymentType,
    pub payment_method: PaymentMethod,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub paid_on: NaiveDate,
}

/// Money position of one booking as derived from the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingBalance {
    pub booking_id: Uuid,
    pub total_price: BigDecimal,
    pub paid_to_date: BigDecimal,
    pub outstanding_balance: BigDecimal,
    pub is_fully_paid: bool,
}
