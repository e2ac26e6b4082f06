use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::NotificationError;
use crate::models::{PassengerRecord, Trip};

/// Reminders go out this long before departure.
pub const REMINDER_LEAD_MINUTES: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartureReminder {
    pub phone: String,
    pub passenger_name: String,
    pub departure: DateTime<Utc>,
    pub origin: String,
    pub destination: String,
    pub bus_plate: String,
    pub remind_at: DateTime<Utc>,
}

impl DepartureReminder {
    /// `None` when the passenger left no contact phone.
    pub fn for_passenger(passenger: &PassengerRecord, trip: &Trip) -> Option<Self> {
        if !passenger.has_phone() {
            return None;
        }
        Some(Self {
            phone: passenger.phone.trim().to_string(),
            passenger_name: passenger.full_name(),
            departure: trip.departure,
            origin: trip.route.origin.clone(),
            destination: trip.route.destination.clone(),
            bus_plate: trip.bus.plate.clone(),
            remind_at: trip.departure - Duration::minutes(REMINDER_LEAD_MINUTES),
        })
    }
}

#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn schedule_departure_reminder(&self, reminder: &DepartureReminder) -> Result<(), NotificationError>;
}

/// Records reminders in the log. Delivery is handled outside this service.
#[derive(Debug, Clone, Default)]
pub struct LogNotificationScheduler;

#[async_trait]
impl NotificationScheduler for LogNotificationScheduler {
    async fn schedule_departure_reminder(&self, reminder: &DepartureReminder) -> Result<(), NotificationError> {
        info!(
            phone = %reminder.phone,
            passenger = %reminder.passenger_name,
            remind_at = %reminder.remind_at,
            "Departure reminder scheduled: {} -> {}, bus {}",
            reminder.origin,
            reminder.destination,
            reminder.bus_plate
        );
        Ok(())
    }
}
