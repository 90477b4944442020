use anyhow::Result;
use bigdecimal::BigDecimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{DurationSlot, PackageType, Pricing, PricingInput};

/// Reference pricing: (boat, duration, package) -> price. The core only looks
/// prices up; management of the table is a desk operation.
#[derive(Clone)]
pub struct PricingRepository {
    pool: PgPool,
}

impl PricingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new pricing row. A duplicate (boat, duration, package) key
    /// trips the unique constraint, which the error layer reports as Conflict.
    pub async fn create(&self, input: PricingInput) -> Result<Pricing> {
        let pricing = sqlx::query_as::<_, Pricing>(
            r#"
            INSERT INTO pricing (company_id, boat_id, duration_slot, package_type, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, company_id, boat_id, duration_slot, package_type, price,
                      created_at, updated_at
            "#,
        )
        .bind(input.company_id)
        .bind(input.boat_id)
        .bind(input.duration_slot)
        .bind(input.package_type)
        .bind(&input.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(pricing)
    }

    pub async fn update_price(
        &self,
        id: Uuid,
        company_id: Uuid,
        price: BigDecimal,
    ) -> Result<Option<Pricing>> {
        let pricing = sqlx::query_as::<_, Pricing>(
            r#"
            UPDATE pricing
            SET price = $3, updated_at = now()
            WHERE id = $1 AND company_id = $2
            RETURNING id, company_id, boat_id, duration_slot, package_type, price,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(company_id)
        .bind(&price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(pricing)
    }

    pub async fn get_price(
        &self,
        boat_id: Uuid,
        duration_slot: DurationSlot,
        package_type: PackageType,
    ) -> Result<Option<BigDecimal>> {
        let price: Option<BigDecimal> = sqlx::query_scalar(
            r#"
            SELECT price FROM pricing
            WHERE boat_id = $1 AND duration_slot = $2 AND package_type = $3
            "#,
        )
        .bind(boat_id)
        .bind(duration_slot)
        .bind(package_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(price)
    }

    pub async fn list_by_company(&self, company_id: Uuid) -> Result<Vec<Pricing>> {
        let rows = sqlx::query_as::<_, Pricing>(
            r#"
            SELECT id, company_id, boat_id, duration_slot, package_type, price,
                   created_at, updated_at
            FROM pricing
            WHERE company_id = $1
            ORDER BY boat_id, duration_slot, package_type
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
