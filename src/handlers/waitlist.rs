use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::{
    Booking, CreateBookingInput, CreateWaitlistInput, WaitlistEntry, WaitlistStatus,
};
use crate::database::repositories::WaitlistRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::BookingService;

#[derive(Debug, Deserialize)]
pub struct WaitlistQuery {
    pub status: Option<WaitlistStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWaitlistStatusInput {
    pub status: WaitlistStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub booking: Booking,
    pub entry: WaitlistEntry,
}

pub async fn create_entry(
    claims: Claims,
    repo: web::Data<WaitlistRepository>,
    input: web::Json<CreateWaitlistInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;
    let input = input.into_inner();
    claims.requires_same_company(input.company_id)?;

    if input.customer_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Customer name is required".to_string(),
        ));
    }
    if input.passengers < 1 {
        return Err(AppError::Validation(
            "At least one passenger is required".to_string(),
        ));
    }

    let entry = repo.create(input).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(entry)))
}

pub async fn list_entries(
    claims: Claims,
    repo: web::Data<WaitlistRepository>,
    query: web::Query<WaitlistQuery>,
) -> Result<HttpResponse, AppError> {
    let entries = repo.list_by_company(claims.company_id, query.status).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}

/// Manual status moves between the non-terminal states, or out to
/// cancelled/expired. Conversion has its own endpoint.
pub async fn update_status(
    claims: Claims,
    repo: web::Data<WaitlistRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateWaitlistStatusInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;

    if input.status == WaitlistStatus::Converted {
        return Err(AppError::Validation(
            "Use the convert endpoint to convert an entry into a booking".to_string(),
        ));
    }

    let id = path.into_inner();
    let entry = repo
        .update_status(id, claims.company_id, input.status)
        .await?;

    match entry {
        Some(entry) => Ok(HttpResponse::Ok().json(ApiResponse::success(entry))),
        None => {
            // Distinguish missing from already-terminal for the caller.
            match repo.find_by_id(id, claims.company_id).await? {
                Some(existing) => Err(AppError::Conflict(format!(
                    "Waitlist entry is {} and can no longer change status",
                    existing.status
                ))),
                None => Err(AppError::NotFound("Waitlist entry not found".to_string())),
            }
        }
    }
}

/// Converts a waitlist entry into a real booking: the booking goes through the
/// normal creation path (availability, pricing, fees, audit), then the entry
/// is terminally linked to it.
pub async fn convert_entry(
    claims: Claims,
    repo: web::Data<WaitlistRepository>,
    bookings: web::Data<BookingService>,
    path: web::Path<Uuid>,
    input: web::Json<CreateBookingInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;
    let booking_input = input.into_inner();
    claims.requires_same_company(booking_input.company_id)?;

    let id = path.into_inner();
    let entry = repo
        .find_by_id(id, claims.company_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Waitlist entry not found".to_string()))?;
    if entry.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "Waitlist entry is {} and can no longer be converted",
            entry.status
        )));
    }

    let outcome = bookings
        .create(booking_input, Some(claims.user_id()))
        .await?;

    let entry = repo
        .mark_converted(id, claims.company_id, outcome.booking.id)
        .await?
        .ok_or_else(|| {
            // The booking exists either way; losing this race only affects the
            // entry's bookkeeping.
            AppError::Conflict(
                "Waitlist entry changed state during conversion; the booking was created"
                    .to_string(),
            )
        })?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_warnings(
        ConversionResult {
            booking: outcome.booking,
            entry,
        },
        outcome.warnings,
    )))
}
