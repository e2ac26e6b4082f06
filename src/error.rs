use thiserror::Error;

use crate::models::SeatNumber;
use crate::services::workflow::BookingStep;

/// Local checks that block progression and never reach the network.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("DNI debe tener 8 dígitos")]
    MalformedNationalId,
    #[error("passenger data for seat {seat} is incomplete")]
    IncompletePassenger { seat: SeatNumber },
    #[error("{selected} of {required} seats selected")]
    SelectionSize { selected: usize, required: usize },
    #[error("no payment method chosen")]
    MissingPaymentMethod,
    #[error("invalid customer profile: {0}")]
    InvalidCustomer(String),
    #[error("amount out of range")]
    AmountOverflow,
}

#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no registry record for this DNI")]
    NotFound,
    #[error("identity service unreachable: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("could not schedule reminder for {phone}: {reason}")]
    Scheduling { phone: String, reason: String },
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Guard(#[from] ValidationError),
    #[error("cannot do this while {0:?}")]
    WrongStep(BookingStep),
    #[error("seat {0} is not part of the selection")]
    SeatNotSelected(SeatNumber),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
}
