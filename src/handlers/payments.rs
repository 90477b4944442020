use actix_web::{HttpResponse, web};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::{BookingBalance, PaymentTransaction, RecordTransactionInput};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::ledger::deposit_flag_warnings;
use crate::services::{BookingService, LedgerService};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerView {
    pub transactions: Vec<PaymentTransaction>,
    pub balance: BookingBalance,
}

pub async fn record_transaction(
    claims: Claims,
    bookings: web::Data<BookingService>,
    ledger: web::Data<LedgerService>,
    path: web::Path<Uuid>,
    input: web::Json<RecordTransactionInput>,
) -> Result<HttpResponse, AppError> {
    claims.requires_booking_access()?;

    let booking = bookings.get(path.into_inner(), claims.company_id).await?;
    let outcome = ledger
        .record_transaction(&booking, input.into_inner(), Some(claims.user_id()))
        .await?;

    Ok(HttpResponse::Created().json(ApiResponse::success_with_warnings(
        outcome.transaction,
        outcome.warnings,
    )))
}

/// Ledger and derived balance for one booking, with any deposit-flag
/// divergence surfaced as warnings.
pub async fn booking_ledger(
    claims: Claims,
    bookings: web::Data<BookingService>,
    ledger: web::Data<LedgerService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let booking = bookings.get(path.into_inner(), claims.company_id).await?;

    let transactions = ledger.list_for_booking(booking.id).await?;
    let balance = ledger.balance_for(&booking).await?;
    let warnings = deposit_flag_warnings(booking.deposit_paid, &transactions);

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_warnings(
        LedgerView {
            transactions,
            balance,
        },
        warnings,
    )))
}
