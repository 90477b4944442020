use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{Company, UpdateCompanySettingsInput};

#[derive(Clone)]
pub struct CompanyRepository {
    pool: PgPool,
}

impl CompanyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            SELECT id, name, currency, drinks_cost_per_person, food_cost_per_person, created_at
            FROM companies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }

    pub async fn update_settings(
        &self,
        id: Uuid,
        input: UpdateCompanySettingsInput,
    ) -> Result<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            r#"
            UPDATE companies
            SET drinks_cost_per_person = $1, food_cost_per_person = $2
            WHERE id = $3
            RETURNING id, name, currency, drinks_cost_per_person, food_cost_per_person, created_at
            "#,
        )
        .bind(input.drinks_cost_per_person)
        .bind(input.food_cost_per_person)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(company)
    }
}
