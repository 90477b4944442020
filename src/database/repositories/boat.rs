use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{BlockedSlot, Boat, CreateBlockedSlotInput};

#[derive(Clone)]
pub struct BoatRepository {
    pool: PgPool,
}

impl BoatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Option<Boat>> {
        let boat = sqlx::query_as::<_, Boat>(
            r#"
            SELECT id, company_id, name, capacity, is_active, fuel_consumption_lph,
                   fuel_price_per_liter, created_at
            FROM boats
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(boat)
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Boat>> {
        let boats = sqlx::query_as::<_, Boat>(
            r#"
            SELECT id, company_id, name, capacity, is_active, fuel_consumption_lph,
                   fuel_price_per_liter, created_at
            FROM boats
            WHERE company_id = $1
            ORDER BY name
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(boats)
    }

    pub async fn create_blocked_slot(&self, input: CreateBlockedSlotInput) -> Result<BlockedSlot> {
        let slot = sqlx::query_as::<_, BlockedSlot>(
            r#"
            INSERT INTO blocked_slots (boat_id, slot_date, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, boat_id, slot_date, start_time, end_time, reason, created_at
            "#,
        )
        .bind(input.boat_id)
        .bind(input.slot_date)
        .bind(input.start_time)
        .bind(input.end_time)
        .bind(input.reason)
        .fetch_one(&self.pool)
        .await?;

        Ok(slot)
    }

    pub async fn delete_blocked_slot(&self, id: Uuid, company_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM blocked_slots
            USING boats
            WHERE blocked_slots.id = $1
              AND boats.id = blocked_slots.boat_id
              AND boats.company_id = $2
            "#,
        )
        .bind(id)
        .bind(company_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn blocked_slots_for_boat(
        &self,
        boat_id: Uuid,
        date: chrono::NaiveDate,
    ) -> Result<Vec<BlockedSlot>> {
        let slots = sqlx::query_as::<_, BlockedSlot>(
            r#"
            SELECT id, boat_id, slot_date, start_time, end_time, reason, created_at
            FROM blocked_slots
            WHERE boat_id = $1 AND slot_date = $2
            ORDER BY start_time
            "#,
        )
        .bind(boat_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }
}
