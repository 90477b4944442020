use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{
    Booking, BookingAction, BookingSnapshot, BookingStatus, CancelBookingInput,
    ConfirmBookingInput, CreateBookingInput, CreateMode, CrewMember, CrewRole, DurationSlot,
    UpdateBookingInput,
};
use crate::database::repositories::{
    AvailabilityRepository, BoatRepository, BookingRepository, BookingUpdate, CompanyRepository,
    CrewRepository, NewBooking, NewBookingSailor, PricingRepository,
};
use crate::error::AppError;
use crate::services::events::{BookingEvent, EventPublisher};
use crate::services::fees;

/// Result of a mutation that may carry non-blocking warnings (over-capacity
/// bookings, partial secondary failures).
#[derive(Debug)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub warnings: Vec<String>,
}

// Transition guards. Pure so the state-machine laws are testable without a
// database; the SQL WHERE clauses enforce the same predicates once more
// against races.

pub fn guard_confirmable(status: BookingStatus) -> Result<(), AppError> {
    match status {
        BookingStatus::PendingHold => Ok(()),
        s if s.is_terminal() => Err(AppError::Conflict(format!(
            "Booking is {} and cannot be confirmed",
            s
        ))),
        s => Err(AppError::Conflict(format!(
            "Only held bookings can be confirmed (current status: {})",
            s
        ))),
    }
}

pub fn guard_cancellable(status: BookingStatus) -> Result<(), AppError> {
    if matches!(status, BookingStatus::PendingHold | BookingStatus::Confirmed) {
        Ok(())
    } else {
        Err(AppError::Conflict(format!(
            "Booking is {} and cannot be cancelled",
            status
        )))
    }
}

pub fn guard_finishable(status: BookingStatus, is_in_past: bool) -> Result<(), AppError> {
    if status != BookingStatus::Confirmed {
        return Err(AppError::Conflict(format!(
            "Only confirmed bookings can be closed out (current status: {})",
            status
        )));
    }
    if !is_in_past {
        return Err(AppError::Validation(
            "The booking time has not passed yet".to_string(),
        ));
    }
    Ok(())
}

pub fn guard_editable(status: BookingStatus) -> Result<(), AppError> {
    if status.is_terminal() {
        Err(AppError::Conflict(format!(
            "Booking is {} and can no longer be edited",
            status
        )))
    } else {
        Ok(())
    }
}

pub fn hold_deadline(now: DateTime<Utc>, hold_minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(hold_minutes)
}

#[derive(Clone)]
pub struct BookingService {
    bookings: BookingRepository,
    availability: AvailabilityRepository,
    boats: BoatRepository,
    crew: CrewRepository,
    pricing: PricingRepository,
    companies: CompanyRepository,
    events: EventPublisher,
    config: Config,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        bookings: BookingRepository,
        availability: AvailabilityRepository,
        boats: BoatRepository,
        crew: CrewRepository,
        pricing: PricingRepository,
        companies: CompanyRepository,
        events: EventPublisher,
        config: Config,
    ) -> Self {
        Self {
            bookings,
            availability,
            boats,
            crew,
            pricing,
            companies,
            events,
            config,
        }
    }

    pub async fn get(&self, id: Uuid, company_id: Uuid) -> Result<Booking, AppError> {
        self.bookings
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))
    }

    /// Create a booking as a hold or with immediate confirmation. The window
    /// is validated here, re-checked inside the insert transaction, and backed
    /// by the exclusion constraint; losing the race is a Conflict.
    pub async fn create(
        &self,
        input: CreateBookingInput,
        actor: Option<Uuid>,
    ) -> Result<BookingOutcome, AppError> {
        validate_create_input(&input)?;

        let boat = self
            .boats
            .find_by_id(input.boat_id, input.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Boat not found".to_string()))?;
        if !boat.is_active {
            return Err(AppError::Validation(
                "This boat is not active".to_string(),
            ));
        }

        let mut warnings = Vec::new();
        if input.passengers > boat.capacity {
            if input.allow_over_capacity {
                warnings.push(format!(
                    "Passenger count {} exceeds boat capacity {}",
                    input.passengers, boat.capacity
                ));
            } else {
                return Err(AppError::Validation(format!(
                    "Passenger count {} exceeds boat capacity {}",
                    input.passengers, boat.capacity
                )));
            }
        }

        let free = self
            .availability
            .is_window_free(
                input.boat_id,
                input.booking_date,
                input.start_time,
                input.end_time,
                None,
            )
            .await?;
        if !free {
            return Err(AppError::Conflict(
                "This boat is already booked for this time".to_string(),
            ));
        }

        let company = self
            .companies
            .find_by_id(input.company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

        let captain = self
            .resolve_crew_member(input.captain_id, input.company_id, CrewRole::Captain)
            .await?;
        let agent = self
            .resolve_crew_member(input.agent_id, input.company_id, CrewRole::Agent)
            .await?;
        let sailors = self
            .resolve_sailors(&input.sailor_ids, input.company_id)
            .await?;

        let duration_hours = duration_hours(input.start_time, input.end_time);

        let discount = input.discount_percentage.clone().unwrap_or_else(BigDecimal::zero);
        let total_price = match input.total_price.clone() {
            Some(price) => price,
            None => {
                let slot = DurationSlot::from_window(input.start_time, input.end_time)
                    .ok_or_else(|| {
                        AppError::Validation(
                            "Booking window does not fit any pricing duration".to_string(),
                        )
                    })?;
                let base = self
                    .pricing
                    .get_price(input.boat_id, slot, input.package_type)
                    .await?
                    .ok_or_else(|| {
                        AppError::NotFound(format!(
                            "No price configured for this boat with duration {} and package {}",
                            slot, input.package_type
                        ))
                    })?;
                fees::discounted_price(&base, &discount)
            }
        };

        let captain_fee = fees::captain_fee(captain.as_ref(), &duration_hours);
        let sailor_fee = fees::total_sailor_fee(&sailors, &duration_hours);
        let fuel_cost = fees::fuel_cost(
            boat.fuel_consumption_lph.as_ref(),
            boat.fuel_price_per_liter.as_ref(),
            &duration_hours,
        );
        let package_addon_cost = fees::package_addon_cost(
            input.package_type,
            input.passengers,
            &company.drinks_cost_per_person,
            &company.food_cost_per_person,
        );
        let agent_commission = match agent.as_ref() {
            Some(a) => fees::agent_commission(&total_price, &a.commission_percentage),
            None => BigDecimal::zero(),
        };

        let (status, hold_until) = match input.mode {
            CreateMode::Hold => (
                BookingStatus::PendingHold,
                Some(hold_deadline(Utc::now(), self.config.hold_minutes)),
            ),
            CreateMode::Confirm => (BookingStatus::Confirmed, None),
        };

        let new_sailors = sailors
            .iter()
            .map(|s| NewBookingSailor {
                sailor_id: s.id,
                hourly_rate: s.hourly_rate.clone(),
                fee: fees::sailor_fee(&s.hourly_rate, &duration_hours),
            })
            .collect::<Vec<_>>();

        let booking = self
            .bookings
            .create(
                NewBooking {
                    company_id: input.company_id,
                    boat_id: input.boat_id,
                    agent_id: agent.as_ref().map(|a| a.id),
                    captain_id: captain.as_ref().map(|c| c.id),
                    customer_name: input.customer_name,
                    customer_phone: input.customer_phone,
                    customer_email: input.customer_email,
                    booking_date: input.booking_date,
                    start_time: input.start_time,
                    end_time: input.end_time,
                    passengers: input.passengers,
                    package_type: input.package_type,
                    category: input.category,
                    is_bare_boat: input.is_bare_boat,
                    total_price,
                    deposit_amount: input.deposit_amount.unwrap_or_else(BigDecimal::zero),
                    discount_percentage: discount,
                    captain_fee,
                    sailor_fee,
                    fuel_cost,
                    package_addon_cost,
                    agent_commission,
                    status,
                    hold_until,
                    notes: input.notes,
                },
                new_sailors,
                actor,
            )
            .await?;

        self.events.publish(BookingEvent::BookingCreated {
            booking_id: booking.id,
            company_id: booking.company_id,
        });
        if booking.status == BookingStatus::Confirmed {
            self.events.publish(BookingEvent::BookingConfirmed {
                booking_id: booking.id,
                company_id: booking.company_id,
            });
        }

        Ok(BookingOutcome { booking, warnings })
    }

    pub async fn confirm(
        &self,
        id: Uuid,
        company_id: Uuid,
        input: ConfirmBookingInput,
        actor: Option<Uuid>,
    ) -> Result<BookingOutcome, AppError> {
        let current = self.get(id, company_id).await?;
        guard_confirmable(current.status)?;

        let old = self.snapshot_of(&current).await?;
        let booking = self
            .bookings
            .confirm(id, input.deposit_paid, actor, old)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Booking is no longer on hold".to_string())
            })?;

        self.events.publish(BookingEvent::BookingConfirmed {
            booking_id: booking.id,
            company_id: booking.company_id,
        });

        Ok(BookingOutcome {
            booking,
            warnings: Vec::new(),
        })
    }

    pub async fn cancel(
        &self,
        id: Uuid,
        company_id: Uuid,
        input: CancelBookingInput,
        actor: Option<Uuid>,
    ) -> Result<BookingOutcome, AppError> {
        let reason = input.reason.trim();
        if reason.is_empty() {
            return Err(AppError::Validation(
                "A cancellation reason is required".to_string(),
            ));
        }

        let current = self.get(id, company_id).await?;
        guard_cancellable(current.status)?;

        let old = self.snapshot_of(&current).await?;
        let booking = self
            .bookings
            .cancel(id, reason, BookingAction::CANCELLED, actor, old)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Booking can no longer be cancelled".to_string())
            })?;

        self.events.publish(BookingEvent::BookingCancelled {
            booking_id: booking.id,
            company_id: booking.company_id,
            reason: reason.to_string(),
        });

        Ok(BookingOutcome {
            booking,
            warnings: Vec::new(),
        })
    }

    pub async fn complete(
        &self,
        id: Uuid,
        company_id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<BookingOutcome, AppError> {
        let current = self.get(id, company_id).await?;
        guard_finishable(current.status, current.is_in_past(Utc::now()))?;

        let old = self.snapshot_of(&current).await?;
        let booking = self
            .bookings
            .complete(id, actor, old)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Booking is no longer confirmed".to_string())
            })?;

        self.events.publish(BookingEvent::BookingCompleted {
            booking_id: booking.id,
            company_id: booking.company_id,
        });

        Ok(BookingOutcome {
            booking,
            warnings: Vec::new(),
        })
    }

    pub async fn mark_no_show(
        &self,
        id: Uuid,
        company_id: Uuid,
        actor: Option<Uuid>,
    ) -> Result<BookingOutcome, AppError> {
        let current = self.get(id, company_id).await?;
        guard_finishable(current.status, current.is_in_past(Utc::now()))?;

        let old = self.snapshot_of(&current).await?;
        let booking = self
            .bookings
            .mark_no_show(id, actor, old)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Booking is no longer confirmed".to_string())
            })?;

        self.events.publish(BookingEvent::BookingNoShow {
            booking_id: booking.id,
            company_id: booking.company_id,
        });

        Ok(BookingOutcome {
            booking,
            warnings: Vec::new(),
        })
    }

    /// In-place edit of customer/package/crew/price fields. The fee basis is
    /// recomputed from current boat/crew/company configuration and stored
    /// anew; date, time and boat are not editable here by design.
    pub async fn update(
        &self,
        id: Uuid,
        company_id: Uuid,
        input: UpdateBookingInput,
        actor: Option<Uuid>,
    ) -> Result<BookingOutcome, AppError> {
        validate_update_input(&input)?;

        let current = self.get(id, company_id).await?;
        guard_editable(current.status)?;

        let boat = self
            .boats
            .find_by_id(current.boat_id, company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Boat not found".to_string()))?;

        let mut warnings = Vec::new();
        if input.passengers > boat.capacity {
            if input.allow_over_capacity {
                warnings.push(format!(
                    "Passenger count {} exceeds boat capacity {}",
                    input.passengers, boat.capacity
                ));
            } else {
                return Err(AppError::Validation(format!(
                    "Passenger count {} exceeds boat capacity {}",
                    input.passengers, boat.capacity
                )));
            }
        }

        let company = self
            .companies
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
        let captain = self
            .resolve_crew_member(input.captain_id, company_id, CrewRole::Captain)
            .await?;
        let agent = self
            .resolve_crew_member(input.agent_id, company_id, CrewRole::Agent)
            .await?;
        let sailors = self.resolve_sailors(&input.sailor_ids, company_id).await?;

        let duration_hours = duration_hours(current.start_time, current.end_time);

        let captain_fee = fees::captain_fee(captain.as_ref(), &duration_hours);
        let sailor_fee = fees::total_sailor_fee(&sailors, &duration_hours);
        let fuel_cost = fees::fuel_cost(
            boat.fuel_consumption_lph.as_ref(),
            boat.fuel_price_per_liter.as_ref(),
            &duration_hours,
        );
        let package_addon_cost = fees::package_addon_cost(
            input.package_type,
            input.passengers,
            &company.drinks_cost_per_person,
            &company.food_cost_per_person,
        );
        let agent_commission = match agent.as_ref() {
            Some(a) => fees::agent_commission(&input.total_price, &a.commission_percentage),
            None => BigDecimal::zero(),
        };

        let new_sailors = sailors
            .iter()
            .map(|s| NewBookingSailor {
                sailor_id: s.id,
                hourly_rate: s.hourly_rate.clone(),
                fee: fees::sailor_fee(&s.hourly_rate, &duration_hours),
            })
            .collect::<Vec<_>>();

        let old = self.snapshot_of(&current).await?;
        let booking = self
            .bookings
            .update_editable(
                id,
                BookingUpdate {
                    customer_name: input.customer_name,
                    customer_phone: input.customer_phone,
                    customer_email: input.customer_email,
                    agent_id: agent.as_ref().map(|a| a.id),
                    captain_id: captain.as_ref().map(|c| c.id),
                    passengers: input.passengers,
                    package_type: input.package_type,
                    category: input.category,
                    is_bare_boat: input.is_bare_boat,
                    total_price: input.total_price,
                    deposit_amount: input.deposit_amount,
                    deposit_paid: input.deposit_paid,
                    discount_percentage: input.discount_percentage,
                    captain_fee,
                    sailor_fee,
                    fuel_cost,
                    package_addon_cost,
                    agent_commission,
                    notes: input.notes,
                },
                new_sailors,
                actor,
                old,
            )
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Booking can no longer be edited".to_string())
            })?;

        Ok(BookingOutcome { booking, warnings })
    }

    async fn snapshot_of(&self, booking: &Booking) -> Result<BookingSnapshot, AppError> {
        let sailor_ids = self
            .bookings
            .sailors_for(booking.id)
            .await?
            .into_iter()
            .map(|s| s.sailor_id)
            .collect();
        Ok(BookingSnapshot::of(booking, sailor_ids))
    }

    async fn resolve_crew_member(
        &self,
        id: Option<Uuid>,
        company_id: Uuid,
        role: CrewRole,
    ) -> Result<Option<CrewMember>, AppError> {
        let Some(id) = id else {
            return Ok(None);
        };
        let member = self
            .crew
            .find_by_id(id, company_id)
            .await?
            .filter(|m| m.role == role)
            .ok_or_else(|| AppError::NotFound(format!("{} not found", role)))?;
        Ok(Some(member))
    }

    async fn resolve_sailors(
        &self,
        ids: &[Uuid],
        company_id: Uuid,
    ) -> Result<Vec<CrewMember>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sailors = self
            .crew
            .find_many_by_role(ids, company_id, CrewRole::Sailor)
            .await?;
        if sailors.len() != ids.len() {
            return Err(AppError::Validation(
                "One or more sailors could not be found".to_string(),
            ));
        }
        Ok(sailors)
    }
}

fn duration_hours(start: chrono::NaiveTime, end: chrono::NaiveTime) -> BigDecimal {
    let minutes = (end - start).num_minutes();
    BigDecimal::from(minutes) / BigDecimal::from(60)
}

fn validate_create_input(input: &CreateBookingInput) -> Result<(), AppError> {
    if input.customer_name.trim().is_empty() {
        return Err(AppError::Validation(
            "Customer name is required".to_string(),
        ));
    }
    if input.start_time >= input.end_time {
        return Err(AppError::Validation(
            "Start time must be before end time".to_string(),
        ));
    }
    if input.passengers < 1 {
        return Err(AppError::Validation(
            "At least one passenger is required".to_string(),
        ));
    }
    if let Some(price) = &input.total_price {
        if price < &BigDecimal::zero() {
            return Err(AppError::Validation(
                "Total price must not be negative".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_update_input(input: &UpdateBookingInput) -> Result<(), AppError> {
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
    if input.total_price < BigDecimal::zero() {
        return Err(AppError::Validation(
            "Total price must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_held_bookings_can_be_confirmed() {
        assert!(guard_confirmable(BookingStatus::PendingHold).is_ok());
        for status in [
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert!(matches!(
                guard_confirmable(status),
                Err(AppError::Conflict(_))
            ));
        }
    }

    #[test]
    fn cancelling_a_cancelled_booking_is_rejected() {
        assert!(guard_cancellable(BookingStatus::PendingHold).is_ok());
        assert!(guard_cancellable(BookingStatus::Confirmed).is_ok());
        assert!(matches!(
            guard_cancellable(BookingStatus::Cancelled),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            guard_cancellable(BookingStatus::Completed),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            guard_cancellable(BookingStatus::NoShow),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn completing_a_future_booking_is_rejected() {
        assert!(matches!(
            guard_finishable(BookingStatus::Confirmed, false),
            Err(AppError::Validation(_))
        ));
        assert!(guard_finishable(BookingStatus::Confirmed, true).is_ok());
    }

    #[test]
    fn only_confirmed_bookings_can_be_closed_out() {
        for status in [
            BookingStatus::PendingHold,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert!(matches!(
                guard_finishable(status, true),
                Err(AppError::Conflict(_))
            ));
        }
    }

    #[test]
    fn terminal_bookings_cannot_be_edited() {
        assert!(guard_editable(BookingStatus::PendingHold).is_ok());
        assert!(guard_editable(BookingStatus::Confirmed).is_ok());
        for status in [
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ] {
            assert!(matches!(
                guard_editable(status),
                Err(AppError::Conflict(_))
            ));
        }
    }

    #[test]
    fn hold_deadline_is_now_plus_configured_minutes() {
        let now = Utc.with_ymd_and_hms(2026, 7, 14, 9, 30, 0).unwrap();
        let deadline = hold_deadline(now, 15);
        assert_eq!(
            deadline,
            Utc.with_ymd_and_hms(2026, 7, 14, 9, 45, 0).unwrap()
        );
    }
}
