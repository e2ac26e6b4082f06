use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::{Validate, ValidationError};

use super::{PassengerRecord, SeatNumber, Trip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Visa,
    Yape,
    Plin,
    Efectivo,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Visa => "visa",
            PaymentMethod::Yape => "yape",
            PaymentMethod::Plin => "plin",
            PaymentMethod::Efectivo => "efectivo",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-session aggregate submitted at confirmation. Never persisted locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub trip: Trip,
    pub seats: Vec<SeatNumber>,
    pub passengers: BTreeMap<SeatNumber, PassengerRecord>,
    pub payment_method: PaymentMethod,
    pub total: Decimal,
}

impl BookingDraft {
    /// Passenger records in seat order.
    pub fn passengers_in_seat_order(&self) -> impl Iterator<Item = (SeatNumber, &PassengerRecord)> {
        self.seats
            .iter()
            .filter_map(|seat| self.passengers.get(seat).map(|p| (*seat, p)))
    }
}

/// Handed to the confirmation screen once the backend accepted the booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub draft: BookingDraft,
    pub total: Decimal,
    pub booking_ids: Vec<i64>,
}

fn validate_dni(dni: &str) -> Result<(), ValidationError> {
    if crate::identity_client::validate_dni(dni) {
        Ok(())
    } else {
        Err(ValidationError::new("dni_format"))
    }
}

/// Customer profile as registered through `POST /clientes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CustomerProfile {
    #[validate(length(min = 1))]
    #[serde(rename = "nombre")]
    pub name: String,
    #[validate(length(min = 1))]
    #[serde(rename = "apellidos")]
    pub surnames: String,
    #[validate(custom(function = "validate_dni"))]
    pub dni: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[validate(email)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl CustomerProfile {
    pub fn from_passenger(passenger: &PassengerRecord) -> Self {
        Self {
            name: passenger.name.clone(),
            surnames: passenger.surnames.clone(),
            dni: passenger.national_id.clone(),
            phone: passenger.has_phone().then(|| passenger.phone.clone()),
            email: None,
        }
    }
}

/// Dashboard aggregate. The backend owns its shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DashboardStatistics(pub serde_json::Value);
