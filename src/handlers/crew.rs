use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::auth::Claims;
use crate::database::models::CrewRole;
use crate::database::repositories::CrewRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct CrewQuery {
    pub role: Option<CrewRole>,
}

pub async fn list_crew(
    claims: Claims,
    repo: web::Data<CrewRepository>,
    query: web::Query<CrewQuery>,
) -> Result<HttpResponse, AppError> {
    let members = repo.list_by_company(claims.company_id, query.role).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(members)))
}
