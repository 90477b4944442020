use actix_web::{HttpResponse, web};
use bigdecimal::{BigDecimal, Zero};

use crate::auth::Claims;
use crate::database::models::UpdateCompanySettingsInput;
use crate::database::repositories::CompanyRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

pub async fn get_company(
    claims: Claims,
    repo: web::Data<CompanyRepository>,
) -> Result<HttpResponse, AppError> {
    let company = repo
        .find_by_id(claims.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(company)))
}

/// Per-person package costs used for the add-on cost basis. Changing them
/// never touches existing bookings; their cost basis stays frozen.
pub async fn update_settings(
    claims: Claims,
    repo: web::Data<CompanyRepository>,
    input: web::Json<UpdateCompanySettingsInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;
    let input = input.into_inner();

    if input.drinks_cost_per_person < BigDecimal::zero()
        || input.food_cost_per_person < BigDecimal::zero()
    {
        return Err(AppError::Validation(
            "Per-person costs must not be negative".to_string(),
        ));
    }

    let company = repo
        .update_settings(claims.company_id, input)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(company)))
}
