use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::database::models::BookingStatus;
use crate::database::repositories::BookingRepository;
use crate::error::AppError;
use crate::services::events::{BookingEvent, EventPublisher};

const RELEASE_REASON: &str = "Hold expired without confirmation";

/// Release eligibility for a single booking, mirroring the sweep's guarded
/// UPDATE: only a booking still on hold with an elapsed deadline qualifies.
/// A hold that has already been released is cancelled, so a second pass
/// (or an overlapping sweep) finds nothing eligible.
pub fn hold_expired(
    status: BookingStatus,
    hold_until: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> bool {
    status == BookingStatus::PendingHold && hold_until.is_some_and(|deadline| deadline < now)
}

/// Periodically releases pending holds whose deadline has passed. The release
/// itself is a guarded bulk UPDATE, so overlapping sweeps (or a manual sweep
/// racing the timer) cannot release the same hold twice.
#[derive(Clone)]
pub struct HoldSweeper {
    bookings: BookingRepository,
    events: EventPublisher,
}

impl HoldSweeper {
    pub fn new(bookings: BookingRepository, events: EventPublisher) -> Self {
        Self { bookings, events }
    }

    /// One sweep pass. Returns how many holds were released.
    pub async fn sweep(&self) -> Result<usize, AppError> {
        let released = self
            .bookings
            .release_expired_holds(Utc::now(), RELEASE_REASON)
            .await?;

        for booking in &released {
            log::info!(
                "Released expired hold {} (boat {}, {})",
                booking.id,
                booking.boat_id,
                booking.booking_date
            );
            self.events.publish(BookingEvent::HoldExpired {
                booking_id: booking.id,
                company_id: booking.company_id,
            });
        }

        Ok(released.len())
    }

    /// Runs sweeps forever at the given interval. Failures are logged and the
    /// loop carries on; a transient database error must not kill the sweeper.
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.sweep().await {
                Ok(0) => {}
                Ok(n) => log::info!("Hold sweep released {} booking(s)", n),
                Err(e) => log::error!("Hold sweep failed: {}", e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 14, hour, minute, 0).unwrap()
    }

    #[test]
    fn elapsed_hold_is_eligible() {
        let deadline = Some(at(9, 45));
        assert!(hold_expired(BookingStatus::PendingHold, deadline, at(10, 0)));
    }

    #[test]
    fn hold_before_its_deadline_is_not_eligible() {
        let deadline = Some(at(9, 45));
        assert!(!hold_expired(BookingStatus::PendingHold, deadline, at(9, 30)));
        assert!(!hold_expired(BookingStatus::PendingHold, deadline, at(9, 45)));
    }

    #[test]
    fn released_hold_is_not_eligible_again() {
        // The release flips the status to cancelled and clears the deadline;
        // either change alone already takes the booking out of the sweep.
        assert!(!hold_expired(BookingStatus::Cancelled, None, at(10, 0)));
        assert!(!hold_expired(
            BookingStatus::Cancelled,
            Some(at(9, 45)),
            at(10, 0)
        ));
        assert!(!hold_expired(BookingStatus::PendingHold, None, at(10, 0)));
    }

    #[test]
    fn confirmed_booking_with_stale_deadline_is_not_eligible() {
        assert!(!hold_expired(
            BookingStatus::Confirmed,
            Some(at(9, 45)),
            at(10, 0)
        ));
    }
}
