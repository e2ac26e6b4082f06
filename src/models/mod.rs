pub mod trip;
pub mod seat;
pub mod pet;
pub mod passenger;
pub mod booking;

pub use trip::{Bus, Route, SearchFilters, Trip};
pub use seat::{OccupancyTable, Occupant, Seat, SeatNumber, SeatState, Sex};
pub use pet::PetPolicy;
pub use passenger::{PassengerEdit, PassengerRecord, PersonRecord, PetDetails};
pub use booking::{BookingConfirmation, BookingDraft, CustomerProfile, DashboardStatistics, PaymentMethod};
