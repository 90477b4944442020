use actix_web::{HttpResponse, web};
use bigdecimal::{BigDecimal, FromPrimitive};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::Claims;
use crate::config::Config;
use crate::database::models::{
    Booking, BookingBalance, BookingHistoryEntry, CancelBookingInput, ConfirmBookingInput,
    CreateBookingInput, FieldChange, UpdateBookingInput,
};
use crate::database::repositories::{BookingRepository, HistoryRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::fees::{self, ProfitClass};
use crate::services::history::entry_diff;
use crate::services::{BookingService, HoldSweeper, LedgerService, ledger, sweeper};

#[derive(Debug, Deserialize)]
pub struct BookingListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Booking read model: the row plus everything the desk needs to act on it.
/// Financial figures are derived fresh on every read, never cached.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetail {
    #[serde(flatten)]
    pub booking: Booking,
    pub sailor_ids: Vec<Uuid>,
    pub balance: BookingBalance,
    pub net_profit: BigDecimal,
    pub profit_class: ProfitClass,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryView {
    #[serde(flatten)]
    pub entry: BookingHistoryEntry,
    /// Rendered field-level diff; absent for entries without a snapshot pair.
    pub changes: Option<Vec<FieldChange>>,
}

pub async fn create_booking(
    claims: Claims,
    service: web::Data<BookingService>,
    input: web::Json<CreateBookingInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;
    let input = input.into_inner();
    claims.requires_same_company(input.company_id)?;

    let outcome = service.create(input, Some(claims.user_id())).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_warnings(
        outcome.booking,
        outcome.warnings,
    )))
}

pub async fn list_bookings(
    claims: Claims,
    repo: web::Data<BookingRepository>,
    query: web::Query<BookingListQuery>,
) -> Result<HttpResponse, AppError> {
    let bookings = repo
        .list_by_company(claims.company_id, query.from, query.to)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(bookings)))
}

pub async fn get_booking(
    claims: Claims,
    service: web::Data<BookingService>,
    repo: web::Data<BookingRepository>,
    ledger_service: web::Data<LedgerService>,
    config: web::Data<Config>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = service.get(path.into_inner(), claims.company_id).await?;

    let sailor_ids = repo
        .sailors_for(booking.id)
        .await?
        .into_iter()
        .map(|s| s.sailor_id)
        .collect();
    let transactions = ledger_service.list_for_booking(booking.id).await?;
    let balance = ledger_service.balance_for(&booking).await?;
    let mut warnings = ledger::deposit_flag_warnings(booking.deposit_paid, &transactions);
    if sweeper::hold_expired(booking.status, booking.hold_until, Utc::now()) {
        warnings.push("The hold on this booking has expired and is pending release".to_string());
    }

    let net_profit = fees::net_profit(
        &booking.total_price,
        &booking.captain_fee,
        &booking.sailor_fee,
        &booking.agent_commission,
        &booking.fuel_cost,
        &booking.package_addon_cost,
    );
    let threshold =
        BigDecimal::from_f64(config.profit_threshold).unwrap_or_else(|| BigDecimal::from(10));
    let profit_class = fees::classify_profit(&net_profit, &threshold);

    let detail = BookingDetail {
        booking,
        sailor_ids,
        balance,
        net_profit,
        profit_class,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_warnings(detail, warnings)))
}

pub async fn update_booking(
    claims: Claims,
    service: web::Data<BookingService>,
    repo: web::Data<BookingRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateBookingInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;
    let id = path.into_inner();
    let input = input.into_inner();

    // Crew reassignment is a desk operation; agents may edit everything else.
    if !claims.is_staff() {
        let current = service.get(id, claims.company_id).await?;
        let mut current_sailors: Vec<Uuid> = repo
            .sailors_for(current.id)
            .await?
            .into_iter()
            .map(|s| s.sailor_id)
            .collect();
        let mut requested_sailors = input.sailor_ids.clone();
        current_sailors.sort();
        requested_sailors.sort();

        if input.captain_id != current.captain_id
            || input.agent_id != current.agent_id
            || requested_sailors != current_sailors
        {
            return Err(AppError::Forbidden(
                "Only admins, managers and office staff may reassign crew".to_string(),
            ));
        }
    }

    let outcome = service
        .update(id, claims.company_id, input, Some(claims.user_id()))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_warnings(
        outcome.booking,
        outcome.warnings,
    )))
}

pub async fn confirm_booking(
    claims: Claims,
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    input: web::Json<ConfirmBookingInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;

    let outcome = service
        .confirm(
            path.into_inner(),
            claims.company_id,
            input.into_inner(),
            Some(claims.user_id()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome.booking)))
}

pub async fn cancel_booking(
    claims: Claims,
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
    input: web::Json<CancelBookingInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;

    let outcome = service
        .cancel(
            path.into_inner(),
            claims.company_id,
            input.into_inner(),
            Some(claims.user_id()),
        )
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome.booking)))
}

pub async fn complete_booking(
    claims: Claims,
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;

    let outcome = service
        .complete(path.into_inner(), claims.company_id, Some(claims.user_id()))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome.booking)))
}

pub async fn mark_no_show(
    claims: Claims,
    service: web::Data<BookingService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;

    let outcome = service
        .mark_no_show(path.into_inner(), claims.company_id, Some(claims.user_id()))
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(outcome.booking)))
}

/// Manual sweep, for desks that don't want to wait out the timer. The bulk
/// release is guarded, so racing the background sweeper is harmless.
pub async fn sweep_holds(
    claims: Claims,
    sweeper: web::Data<HoldSweeper>,
) -> Result<HttpResponse, AppError> {
    claims.requires_staff()?;

    let released = sweeper.sweep().await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        Some(released),
        &format!("Released {} expired hold(s)", released),
    )))
}

/// Full audit trail of one booking, newest first, with rendered diffs.
pub async fn booking_history(
    claims: Claims,
    service: web::Data<BookingService>,
    history: web::Data<HistoryRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = service.get(path.into_inner(), claims.company_id).await?;

    let entries = history
        .list_for_booking(booking.id)
        .await?
        .into_iter()
        .map(|entry| {
            let changes = entry_diff(&entry);
            HistoryView { entry, changes }
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}
