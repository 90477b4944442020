use actix_web::{HttpResponse, web};
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::PricingInput;
use crate::database::repositories::PricingRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePriceInput {
    pub price: BigDecimal,
}

pub async fn list_pricing(
    claims: Claims,
    repo: web::Data<PricingRepository>,
) -> Result<HttpResponse, AppError> {
    let rows = repo.list_by_company(claims.company_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(rows)))
}

/// A duplicate (boat, duration, package) key surfaces as Conflict via the
/// unique constraint.
pub async fn create_pricing(
    claims: Claims,
    repo: web::Data<PricingRepository>,
    input: web::Json<PricingInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;
    let input = input.into_inner();
    claims.requires_same_company(input.company_id)?;

    if input.price < BigDecimal::zero() {
        return Err(AppError::Validation(
            "Price must not be negative".to_string(),
        ));
    }

    let pricing = repo.create(input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(pricing)))
}

pub async fn update_price(
    claims: Claims,
    repo: web::Data<PricingRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdatePriceInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;

    if input.price < BigDecimal::zero() {
        return Err(AppError::Validation(
            "Price must not be negative".to_string(),
        ));
    }

    let pricing = repo
        .update_price(path.into_inner(), claims.company_id, input.into_inner().price)
        .await?
        .ok_or_else(|| AppError::NotFound("Pricing entry not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(pricing)))
}
