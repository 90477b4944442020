use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::CreateBlockedSlotInput;
use crate::database::repositories::{AvailabilityRepository, BoatRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub passengers: Option<i32>,
}

/// Boats free for the requested window, smallest adequate boat first. An
/// empty list is a valid answer, not an error.
pub async fn find_available_boats(
    claims: Claims,
    repo: web::Data<AvailabilityRepository>,
    query: web::Query<AvailabilityQuery>,
) -> Result<HttpResponse, AppError> {
    if query.start_time >= query.end_time {
        return Err(AppError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }

    let boats = repo
        .find_available_boats(
            claims.company_id,
            query.date,
            query.start_time,
            query.end_time,
            query.passengers.unwrap_or(1),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(boats)))
}

pub async fn list_boats(
    claims: Claims,
    boats: web::Data<BoatRepository>,
) -> Result<HttpResponse, AppError> {
    let list = boats.list_by_company(claims.company_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(list)))
}

/// Maintenance and owner-use windows that suppress availability without a
/// booking. Staff only.
pub async fn create_blocked_slot(
    claims: Claims,
    boats: web::Data<BoatRepository>,
    input: web::Json<CreateBlockedSlotInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;
    let input = input.into_inner();

    if input.start_time >= input.end_time {
        return Err(AppError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }
    // Ownership check: the boat must belong to the caller's company.
    boats
        .find_by_id(input.boat_id, claims.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Boat not found".to_string()))?;

    let slot = boats.create_blocked_slot(input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(slot)))
}

pub async fn delete_blocked_slot(
    claims: Claims,
    boats: web::Data<BoatRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;

    if boats
        .delete_blocked_slot(path.into_inner(), claims.company_id)
        .await?
    {
        Ok(HttpResponse::Ok()
            .json(ApiResponse::<()>::success_with_message(None, "Blocked slot removed")))
    } else {
        Err(AppError::NotFound("Blocked slot not found".to_string()))
    }
}
