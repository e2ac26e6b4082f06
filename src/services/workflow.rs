//! workflow.rs
//!
//! Step state machine of the booking screen:
//!
//! `SelectingSeats → EnteringPassengerData → SelectingPayment → Confirming → {Confirmed, Failed}`
//!
//! A [`BookingSession`] is an immutable snapshot. Every transition returns a new
//! snapshot and leaves the old one untouched; the rendering layer re-reads
//! whichever snapshot it was handed last. Going back never drops entered data.

use chrono::NaiveDate;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::{ValidationError, WorkflowError};
use crate::models::{
    BookingConfirmation, BookingDraft, OccupancyTable, PassengerEdit, PassengerRecord, PaymentMethod,
    PersonRecord, PetPolicy, SearchFilters, Seat, SeatNumber, Trip,
};
use crate::services::gateway::BookingGateway;
use crate::services::notification::{DepartureReminder, NotificationScheduler};
use crate::services::passenger_rules;
use crate::services::pricing::{self, Quote};
use crate::services::seat_map::SeatMap;

/// Message shown when confirmation fails for any reason.
pub const GENERIC_FAILURE: &str = "Error al procesar la reserva";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookingStep {
    SelectingSeats,
    EnteringPassengerData,
    SelectingPayment,
    Confirming,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct BookingSession {
    id: Uuid,
    trip: Trip,
    filters: SearchFilters,
    seat_map: SeatMap,
    policy: PetPolicy,
    step: BookingStep,
    selection: BTreeSet<SeatNumber>,
    // Records of deselected seats are kept so re-selecting a seat restores them.
    passengers: BTreeMap<SeatNumber, PassengerRecord>,
    payment_method: Option<PaymentMethod>,
    confirmation: Option<BookingConfirmation>,
    error: Option<String>,
}

impl BookingSession {
    pub fn new(trip: Trip, filters: SearchFilters, occupancy: OccupancyTable, policy: PetPolicy) -> Self {
        let seat_map = SeatMap::for_trip(&trip, occupancy);
        Self {
            id: Uuid::new_v4(),
            trip,
            filters,
            seat_map,
            policy,
            step: BookingStep::SelectingSeats,
            selection: BTreeSet::new(),
            passengers: BTreeMap::new(),
            payment_method: None,
            confirmation: None,
            error: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn policy(&self) -> &PetPolicy {
        &self.policy
    }

    pub fn required_passengers(&self) -> usize {
        self.filters.passengers
    }

    pub fn pets_allowed(&self) -> bool {
        self.filters.pets_allowed_on(&self.trip)
    }

    pub fn selection(&self) -> &BTreeSet<SeatNumber> {
        &self.selection
    }

    pub fn seats(&self) -> Vec<Seat> {
        self.seat_map.generate(&self.selection)
    }

    pub fn passenger(&self, seat: SeatNumber) -> Option<&PassengerRecord> {
        self.passengers.get(&seat)
    }

    /// Records of the selected seats, in seat order.
    pub fn passengers(&self) -> impl Iterator<Item = (SeatNumber, &PassengerRecord)> {
        self.selection
            .iter()
            .filter_map(|seat| self.passengers.get(seat).map(|p| (*seat, p)))
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn confirmation(&self) -> Option<&BookingConfirmation> {
        self.confirmation.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The confirm action stays disabled while a submission is in flight.
    pub fn is_busy(&self) -> bool {
        self.step == BookingStep::Confirming
    }

    fn with_step(&self, step: BookingStep) -> Self {
        Self { step, error: None, ..self.clone() }
    }

    fn expect_step(&self, step: BookingStep) -> Result<(), WorkflowError> {
        if self.step == step {
            Ok(())
        } else {
            Err(WorkflowError::WrongStep(self.step))
        }
    }

    // --- Guards ---

    pub fn seat_guard(&self) -> Result<(), ValidationError> {
        let required = self.required_passengers();
        if self.selection.len() == required {
            Ok(())
        } else {
            Err(ValidationError::SelectionSize { selected: self.selection.len(), required })
        }
    }

    pub fn passenger_guard(&self) -> Result<(), ValidationError> {
        self.seat_guard()?;
        let pets_allowed = self.pets_allowed();
        for seat in &self.selection {
            let complete = self
                .passengers
                .get(seat)
                .is_some_and(|p| passenger_rules::is_complete(p, &self.policy, pets_allowed));
            if !complete {
                return Err(ValidationError::IncompletePassenger { seat: *seat });
            }
        }
        Ok(())
    }

    pub fn payment_guard(&self) -> Result<(), ValidationError> {
        self.passenger_guard()?;
        match self.payment_method {
            Some(_) => Ok(()),
            None => Err(ValidationError::MissingPaymentMethod),
        }
    }

    // --- Transitions ---

    /// Toggles a seat. Occupied seats and selections past the passenger count are ignored.
    pub fn select_seat(&self, seat: SeatNumber) -> Result<Self, WorkflowError> {
        self.expect_step(BookingStep::SelectingSeats)?;
        let selection = self.seat_map.select(seat, &self.selection, self.required_passengers());

        let mut passengers = self.passengers.clone();
        for seat in &selection {
            passengers.entry(*seat).or_default();
        }
        Ok(Self { selection, passengers, ..self.clone() })
    }

    pub fn advance(&self) -> Result<Self, WorkflowError> {
        let (guard, next) = match self.step {
            BookingStep::SelectingSeats => (self.seat_guard(), BookingStep::EnteringPassengerData),
            BookingStep::EnteringPassengerData => (self.passenger_guard(), BookingStep::SelectingPayment),
            BookingStep::SelectingPayment => (self.payment_guard(), BookingStep::Confirming),
            other => return Err(WorkflowError::WrongStep(other)),
        };

        if let Err(e) = guard {
            warn!(session = %self.id, "Cannot leave {:?}: {}", self.step, e);
            return Err(e.into());
        }
        Ok(self.with_step(next))
    }

    /// Moves one step back. From `Confirming` or `Failed` this returns to payment selection.
    pub fn back(&self) -> Result<Self, WorkflowError> {
        let previous = match self.step {
            BookingStep::EnteringPassengerData => BookingStep::SelectingSeats,
            BookingStep::SelectingPayment => BookingStep::EnteringPassengerData,
            BookingStep::Confirming | BookingStep::Failed => BookingStep::SelectingPayment,
            other => return Err(WorkflowError::WrongStep(other)),
        };
        Ok(self.with_step(previous))
    }

    /// Jumps back to an earlier data-entry step, keeping everything entered so far.
    pub fn back_to(&self, target: BookingStep) -> Result<Self, WorkflowError> {
        let allowed = match target {
            BookingStep::SelectingSeats => matches!(
                self.step,
                BookingStep::EnteringPassengerData
                    | BookingStep::SelectingPayment
                    | BookingStep::Confirming
                    | BookingStep::Failed
            ),
            BookingStep::EnteringPassengerData => matches!(
                self.step,
                BookingStep::SelectingPayment | BookingStep::Confirming | BookingStep::Failed
            ),
            BookingStep::SelectingPayment => {
                matches!(self.step, BookingStep::Confirming | BookingStep::Failed)
            }
            _ => false,
        };

        if allowed {
            Ok(self.with_step(target))
        } else {
            Err(WorkflowError::WrongStep(self.step))
        }
    }

    fn replace_passenger(&self, seat: SeatNumber, record: PassengerRecord) -> Self {
        let mut passengers = self.passengers.clone();
        passengers.insert(seat, record);
        Self { passengers, ..self.clone() }
    }

    fn selected_passenger(&self, seat: SeatNumber) -> Result<PassengerRecord, WorkflowError> {
        self.expect_step(BookingStep::EnteringPassengerData)?;
        if !self.selection.contains(&seat) {
            return Err(WorkflowError::SeatNotSelected(seat));
        }
        Ok(self.passengers.get(&seat).cloned().unwrap_or_default())
    }

    pub fn update_passenger(&self, seat: SeatNumber, edit: PassengerEdit) -> Result<Self, WorkflowError> {
        let record = self.selected_passenger(seat)?.apply(edit);
        Ok(self.replace_passenger(seat, record))
    }

    /// Fills the passenger of `seat` from a registry record.
    pub fn apply_lookup(&self, seat: SeatNumber, person: &PersonRecord, today: NaiveDate) -> Result<Self, WorkflowError> {
        let current = self.selected_passenger(seat)?;
        let record = passenger_rules::derive_from_lookup(&current, person, today);
        Ok(self.replace_passenger(seat, record))
    }

    pub fn choose_payment(&self, method: PaymentMethod) -> Result<Self, WorkflowError> {
        self.expect_step(BookingStep::SelectingPayment)?;
        Ok(Self { payment_method: Some(method), ..self.clone() })
    }

    // --- Pricing and submission ---

    pub fn quote(&self) -> Result<Quote, ValidationError> {
        let pets = pricing::count_with_pet(self.passengers().map(|(_, p)| p));
        pricing::quote(self.selection.len() as u32, self.trip.fare(), pets, self.policy.surcharge)
    }

    pub fn total(&self) -> Result<Decimal, ValidationError> {
        self.quote().map(|q| q.total)
    }

    pub fn draft(&self) -> Result<BookingDraft, ValidationError> {
        self.payment_guard()?;
        let payment_method = self.payment_method.ok_or(ValidationError::MissingPaymentMethod)?;
        Ok(BookingDraft {
            trip: self.trip.clone(),
            seats: self.selection.iter().copied().collect(),
            passengers: self.passengers().map(|(seat, p)| (seat, p.clone())).collect(),
            payment_method,
            total: self.total()?,
        })
    }

    /// Schedules one departure reminder per passenger with a phone, then submits
    /// the booking. Runs from `SelectingPayment` or `Confirming`; any failure ends
    /// in `Failed` with every entered field intact.
    #[tracing::instrument(skip_all, fields(session = %self.id))]
    pub async fn confirm(
        &self,
        gateway: &dyn BookingGateway,
        notifier: &dyn NotificationScheduler,
    ) -> Result<Self, WorkflowError> {
        let confirming = match self.step {
            BookingStep::Confirming => self.clone(),
            BookingStep::SelectingPayment => match self.advance() {
                Ok(next) => next,
                Err(e) => return Ok(self.failed(&e)),
            },
            other => return Err(WorkflowError::WrongStep(other)),
        };

        match confirming.submit(gateway, notifier).await {
            Ok(confirmation) => {
                info!(
                    "Booking confirmed: trip={}, tickets={:?}, total={}",
                    confirmation.draft.trip.code,
                    confirmation.booking_ids,
                    pricing::format_amount(confirmation.total)
                );
                Ok(Self { confirmation: Some(confirmation), ..confirming.with_step(BookingStep::Confirmed) })
            }
            Err(e) => Ok(confirming.failed(&e)),
        }
    }

    async fn submit(
        &self,
        gateway: &dyn BookingGateway,
        notifier: &dyn NotificationScheduler,
    ) -> Result<BookingConfirmation, WorkflowError> {
        let draft = self.draft()?;

        let reminders: Vec<DepartureReminder> = draft
            .passengers_in_seat_order()
            .filter_map(|(_, p)| DepartureReminder::for_passenger(p, &draft.trip))
            .collect();
        try_join_all(reminders.iter().map(|r| notifier.schedule_departure_reminder(r))).await?;

        let booking_ids = gateway.submit(&draft).await?;
        let total = draft.total;
        Ok(BookingConfirmation { draft, total, booking_ids })
    }

    fn failed(&self, cause: &WorkflowError) -> Self {
        error!(session = %self.id, "Booking confirmation failed: {}", cause);
        Self { error: Some(GENERIC_FAILURE.to_string()), ..self.with_step(BookingStep::Failed) }
    }
}
