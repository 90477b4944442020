use anyhow::Result;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::database::models::{AppendHistoryInput, BookingHistoryEntry};

/// Append-only audit trail. Entries are never updated, deleted or reordered;
/// `created_at` is server-assigned so ordering stays monotonic per booking
/// even under concurrent edits.
#[derive(Clone)]
pub struct HistoryRepository {
    pool: PgPool,
}

impl HistoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, input: AppendHistoryInput) -> Result<BookingHistoryEntry> {
        let mut tx = self.pool.begin().await?;
        let entry = append_in_tx(&mut tx, &input).await?;
        tx.commit().await?;

        Ok(entry)
    }

    /// Reverse-chronological, the display order for audit readers.
    pub async fn list_for_booking(&self, booking_id: Uuid) -> Result<Vec<BookingHistoryEntry>> {
        let entries = sqlx::query_as::<_, BookingHistoryEntry>(
            r#"
            SELECT id, booking_id, action, actor_user_id, note, old_data, new_data, created_at
            FROM booking_history
            WHERE booking_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

/// Shared by the booking repository so the audit write rides in the same
/// transaction as the mutation it records.
pub(crate) async fn append_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    input: &AppendHistoryInput,
) -> Result<BookingHistoryEntry, sqlx::Error> {
    let old_data = input
        .old_data
        .as_ref()
        .map(|s| serde_json::to_value(s).unwrap_or(serde_json::Value::Null));
    let new_data = input
        .new_data
        .as_ref()
        .map(|s| serde_json::to_value(s).unwrap_or(serde_json::Value::Null));

    sqlx::query_as::<_, BookingHistoryEntry>(
        r#"
        INSERT INTO booking_history (booking_id, action, actor_user_id, note, old_data, new_data)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, booking_id, action, actor_user_id, note, old_data, new_data, created_at
        "#,
    )
    .bind(input.booking_id)
    .bind(&input.action)
    .bind(input.actor_user_id)
    .bind(&input.note)
    .bind(old_data)
    .bind(new_data)
    .fetch_one(&mut **tx)
    .await
}
