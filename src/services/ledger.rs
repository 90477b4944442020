use bigdecimal::{BigDecimal, Zero};
use uuid::Uuid;

use crate::database::models::{
    AppendHistoryInput, Booking, BookingAction, BookingBalance, PaymentTransaction, PaymentType,
    RecordTransactionInput,
};
use crate::database::repositories::{HistoryRepository, PaymentRepository};
use crate::error::AppError;
use crate::services::events::{BookingEvent, EventPublisher};
use crate::services::fees::round2;

/// The ledger owns the money truth for a booking. The caller supplies the
/// sign; the ledger only rejects combinations that are certainly wrong
/// (a positive refund, a negative payment, a zero amount).
pub fn validate_sign(amount: &BigDecimal, payment_type: PaymentType) -> Result<(), AppError> {
    if amount.is_zero() {
        return Err(AppError::Validation(
            "Transaction amount must not be zero".to_string(),
        ));
    }
    if payment_type.is_refund() && amount > &BigDecimal::zero() {
        return Err(AppError::Validation(
            "Refund amounts must be negative".to_string(),
        ));
    }
    if !payment_type.is_refund() && amount < &BigDecimal::zero() {
        return Err(AppError::Validation(
            "Payment amounts must be positive".to_string(),
        ));
    }
    Ok(())
}

pub fn outstanding_balance(total_price: &BigDecimal, paid_to_date: &BigDecimal) -> BigDecimal {
    round2(&(total_price - paid_to_date))
}

/// Divergence between the manual deposit-paid flag and the ledger. Surfaced
/// as warnings, never auto-corrected: the flag is a visual cue that may
/// legitimately run ahead of (or behind) the recorded transactions.
pub fn deposit_flag_warnings(
    deposit_paid: bool,
    transactions: &[PaymentTransaction],
) -> Vec<String> {
    let mut warnings = Vec::new();

    let has_deposit_txn = transactions
        .iter()
        .any(|t| t.payment_type == PaymentType::Deposit && t.amount > BigDecimal::zero());
    let paid: BigDecimal = transactions.iter().map(|t| t.amount.clone()).sum();

    if deposit_paid && paid.is_zero() {
        warnings.push(
            "Deposit is flagged as paid but the ledger shows nothing collected".to_string(),
        );
    }
    if !deposit_paid && has_deposit_txn {
        warnings.push(
            "A deposit transaction is recorded but the deposit-paid flag is not set".to_string(),
        );
    }

    warnings
}

/// Result of recording a transaction. `warnings` carries secondary-write
/// failures that must not fail the already-committed payment.
#[derive(Debug)]
pub struct LedgerOutcome {
    pub transaction: PaymentTransaction,
    pub warnings: Vec<String>,
}

pub(crate) fn audit_failure_warning(err: &anyhow::Error) -> String {
    format!(
        "Payment was recorded, but the audit entry could not be written: {}",
        err
    )
}

#[derive(Clone)]
pub struct LedgerService {
    payments: PaymentRepository,
    history: HistoryRepository,
    events: EventPublisher,
}

impl LedgerService {
    pub fn new(
        payments: PaymentRepository,
        history: HistoryRepository,
        events: EventPublisher,
    ) -> Self {
        Self {
            payments,
            history,
            events,
        }
    }

    pub async fn record_transaction(
        &self,
        booking: &Booking,
        input: RecordTransactionInput,
        recorded_by: Option<Uuid>,
    ) -> Result<LedgerOutcome, AppError> {
        validate_sign(&input.amount, input.payment_type)?;

        let transaction = self.payments.record(booking.id, input, recorded_by).await?;

        // The payment row is committed at this point. The audit entry is a
        // secondary write: its failure is a warning on a successful response,
        // never an error, so the caller is not tempted to retry (and
        // double-record) a payment that already landed.
        let mut warnings = Vec::new();
        if let Err(err) = self
            .history
            .append(AppendHistoryInput {
                booking_id: booking.id,
                action: BookingAction::PAYMENT_RECORDED.to_string(),
                actor_user_id: recorded_by,
                note: Some(format!(
                    "{} of {} via {}",
                    transaction.payment_type, transaction.amount, transaction.payment_method
                )),
                old_data: None,
                new_data: None,
            })
            .await
        {
            log::warn!(
                "Failed to write audit entry for payment {} on booking {}: {}",
                transaction.id,
                booking.id,
                err
            );
            warnings.push(audit_failure_warning(&err));
        }

        if transaction.amount > BigDecimal::zero() {
            self.events.publish(BookingEvent::PaymentReceived {
                booking_id: booking.id,
                company_id: booking.company_id,
                amount: transaction.amount.clone(),
            });
        }

        Ok(LedgerOutcome {
            transaction,
            warnings,
        })
    }

    pub async fn list_for_booking(
        &self,
        booking_id: Uuid,
    ) -> Result<Vec<PaymentTransaction>, AppError> {
        Ok(self.payments.list_for_booking(booking_id).await?)
    }

    pub async fn balance_for(&self, booking: &Booking) -> Result<BookingBalance, AppError> {
        let paid_to_date = self.payments.sum_for_booking(booking.id).await?;
        let outstanding = outstanding_balance(&booking.total_price, &paid_to_date);
        let is_fully_paid = outstanding <= BigDecimal::zero();

        Ok(BookingBalance {
            booking_id: booking.id,
            total_price: booking.total_price.clone(),
            paid_to_date,
            outstanding_balance: outstanding,
            is_fully_paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::PaymentMethod;
    use chrono::{NaiveDate, Utc};
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn txn(amount: &str, payment_type: PaymentType) -> PaymentTransaction {
        PaymentTransaction {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            amount: dec(amount),
            payment_type,
            payment_method: PaymentMethod::Card,
            reference: None,
            notes: None,
            paid_on: NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            recorded_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn positive_refund_is_rejected() {
        assert!(validate_sign(&dec("50"), PaymentType::Refund).is_err());
        assert!(validate_sign(&dec("50"), PaymentType::PartialRefund).is_err());
        assert!(validate_sign(&dec("-50"), PaymentType::Refund).is_ok());
    }

    #[test]
    fn negative_payment_is_rejected() {
        assert!(validate_sign(&dec("-200"), PaymentType::Deposit).is_err());
        assert!(validate_sign(&dec("200"), PaymentType::Deposit).is_ok());
        assert!(validate_sign(&dec("0"), PaymentType::FullPayment).is_err());
    }

    #[test]
    fn outstanding_balance_is_price_minus_sum() {
        assert_eq!(outstanding_balance(&dec("850"), &dec("200")), dec("650.00"));
        assert_eq!(outstanding_balance(&dec("850"), &dec("850")), dec("0.00"));
        assert_eq!(outstanding_balance(&dec("850"), &dec("900")), dec("-50.00"));
    }

    #[test]
    fn balance_is_order_independent() {
        let amounts = ["200", "-50", "700"];
        let forward: BigDecimal = amounts.iter().map(|a| dec(a)).sum();
        let backward: BigDecimal = amounts.iter().rev().map(|a| dec(a)).sum();
        assert_eq!(
            outstanding_balance(&dec("850"), &forward),
            outstanding_balance(&dec("850"), &backward)
        );
    }

    #[test]
    fn deposit_flag_without_transactions_warns() {
        let warnings = deposit_flag_warnings(true, &[]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("nothing collected"));
    }

    #[test]
    fn deposit_flag_with_fully_refunded_ledger_warns() {
        let txns = [
            txn("200", PaymentType::Deposit),
            txn("-200", PaymentType::Refund),
        ];
        let warnings = deposit_flag_warnings(true, &txns);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("nothing collected"));
    }

    #[test]
    fn deposit_transaction_without_flag_warns() {
        let warnings = deposit_flag_warnings(false, &[txn("200", PaymentType::Deposit)]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("deposit-paid flag"));
    }

    #[test]
    fn consistent_states_do_not_warn() {
        assert!(deposit_flag_warnings(false, &[]).is_empty());
        assert!(deposit_flag_warnings(true, &[txn("200", PaymentType::Deposit)]).is_empty());
    }

    #[test]
    fn audit_failure_warning_reports_the_payment_as_recorded() {
        let warning = audit_failure_warning(&anyhow::anyhow!("connection reset"));
        assert!(warning.contains("Payment was recorded"));
        assert!(warning.contains("connection reset"));
    }
}
