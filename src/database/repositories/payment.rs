use anyhow::Result;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{PaymentTransaction, RecordTransactionInput};

/// Append-only payment ledger. Rows are never updated or deleted; corrections
/// are made by recording a refund.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        booking_id: Uuid,
        input: RecordTransactionInput,
        recorded_by: Option<Uuid>,
    ) -> Result<PaymentTransaction> {
        let transaction = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            INSERT INTO payment_transactions
                (booking_id, amount, payment_type, payment_method, reference, notes, paid_on, recorded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, booking_id, amount, payment_type, payment_method, reference, notes,
                      paid_on, recorded_by, created_at
            "#,
        )
        .bind(booking_id)
        .bind(&input.amount)
        .bind(input.payment_type)
        .bind(input.payment_method)
        .bind(&input.reference)
        .bind(&input.notes)
        .bind(input.paid_on)
        .bind(recorded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    pub async fn list_for_booking(&self, booking_id: Uuid) -> Result<Vec<PaymentTransaction>> {
        let transactions = sqlx::query_as::<_, PaymentTransaction>(
            r#"
            SELECT id, booking_id, amount, payment_type, payment_method, reference, notes,
                   paid_on, recorded_by, created_at
            FROM payment_transactions
            WHERE booking_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Signed sum of all transactions; the source of truth for money collected.
    pub async fn sum_for_booking(&self, booking_id: Uuid) -> Result<BigDecimal> {
        let sum: BigDecimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payment_transactions WHERE booking_id = $1",
        )
        .bind(booking_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }
}
