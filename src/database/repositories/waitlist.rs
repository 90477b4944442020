use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CreateWaitlistInput, WaitlistEntry, WaitlistStatus};

#[derive(Clone)]
pub struct WaitlistRepository {
    pool: PgPool,
}

const WAITLIST_COLUMNS: &str = "id, company_id, boat_id, customer_name, customer_phone, \
     customer_email, requested_date, passengers, notes, status, converted_booking_id, \
     created_at, updated_at";

impl WaitlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: CreateWaitlistInput) -> Result<WaitlistEntry> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            INSERT INTO waitlist_entries
                (company_id, boat_id, customer_name, customer_phone, customer_email,
                 requested_date, passengers, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {WAITLIST_COLUMNS}
            "#
        ))
        .bind(input.company_id)
        .bind(input.boat_id)
        .bind(&input.customer_name)
        .bind(&input.customer_phone)
        .bind(&input.customer_email)
        .bind(input.requested_date)
        .bind(input.passengers)
        .bind(&input.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn find_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Option<WaitlistEntry>> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(&format!(
            "SELECT {WAITLIST_COLUMNS} FROM waitlist_entries WHERE id = $1 AND company_id = $2"
        ))
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        status: Option<WaitlistStatus>,
    ) -> Result<Vec<WaitlistEntry>> {
        let entries = sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            SELECT {WAITLIST_COLUMNS} FROM waitlist_entries
            WHERE company_id = $1
              AND ($2::varchar IS NULL OR status = $2)
            ORDER BY requested_date, created_at
            "#
        ))
        .bind(company_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Move an entry between non-terminal states. Returns None when the entry
    /// is missing or already terminal.
    pub async fn update_status(
        &self,
        id: Uuid,
        company_id: Uuid,
        status: WaitlistStatus,
    ) -> Result<Option<WaitlistEntry>> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            UPDATE waitlist_entries
            SET status = $3, updated_at = now()
            WHERE id = $1 AND company_id = $2 AND status IN ('active', 'contacted')
            RETURNING {WAITLIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Terminal conversion: links the entry to the booking it became.
    pub async fn mark_converted(
        &self,
        id: Uuid,
        company_id: Uuid,
        booking_id: Uuid,
    ) -> Result<Option<WaitlistEntry>> {
        let entry = sqlx::query_as::<_, WaitlistEntry>(&format!(
            r#"
            UPDATE waitlist_entries
            SET status = 'converted', converted_booking_id = $3, updated_at = now()
            WHERE id = $1 AND company_id = $2 AND status IN ('active', 'contacted')
            RETURNING {WAITLIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(company_id)
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entry)
    }
}
