use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{CrewMember, CrewRole};

#[derive(Clone)]
pub struct CrewRepository {
    pool: PgPool,
}

impl CrewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid, company_id: Uuid) -> Result<Option<CrewMember>> {
        let member = sqlx::query_as::<_, CrewMember>(
            r#"
            SELECT id, company_id, name, role, fee_mode, hourly_rate, flat_day_rate,
                   commission_percentage, is_active, created_at
            FROM crew_members
            WHERE id = $1 AND company_id = $2
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(member)
    }

    /// Fetch several crew members at once, constrained to one company and role.
    /// Callers must check that everything they asked for came back.
    pub async fn find_many_by_role(
        &self,
        ids: &[Uuid],
        company_id: Uuid,
        role: CrewRole,
    ) -> Result<Vec<CrewMember>> {
        let members = sqlx::query_as::<_, CrewMember>(
            r#"
            SELECT id, company_id, name, role, fee_mode, hourly_rate, flat_day_rate,
                   commission_percentage, is_active, created_at
            FROM crew_members
            WHERE id = ANY($1) AND company_id = $2 AND role = $3
            "#,
        )
        .bind(ids)
        .bind(company_id)
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }

    pub async fn list_by_company(
        &self,
        company_id: Uuid,
        role: Option<CrewRole>,
    ) -> Result<Vec<CrewMember>> {
        let members = if let Some(role) = role {
            sqlx::query_as::<_, CrewMember>(
                r#"
                SELECT id, company_id, name, role, fee_mode, hourly_rate, flat_day_rate,
                       commission_percentage, is_active, created_at
                FROM crew_members
                WHERE company_id = $1 AND role = $2
                ORDER BY name
                "#,
            )
            .bind(company_id)
            .bind(role)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query_as::<_, CrewMember>(
                r#"
                SELECT id, company_id, name, role, fee_mode, hourly_rate, flat_day_rate,
                       commission_percentage, is_active, created_at
                FROM crew_members
                WHERE company_id = $1
                ORDER BY name
                "#,
            )
            .bind(company_id)
            .fetch_all(&self.pool)
            .await?
        };

        Ok(members)
    }
}
