use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type SeatNumber = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupant {
    pub gender: Option<Sex>,
    pub name: Option<String>,
}

impl Occupant {
    pub fn new(gender: Sex, name: impl Into<String>) -> Self {
        Self { gender: Some(gender), name: Some(name.into()) }
    }

    /// Occupant known only by seat number, as reported by the backend.
    pub fn unknown() -> Self {
        Self { gender: None, name: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    Available,
    Selected,
    Occupied { occupant: Occupant },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub number: SeatNumber,
    #[serde(flatten)]
    pub state: SeatState,
}

impl Seat {
    pub fn is_occupied(&self) -> bool {
        matches!(self.state, SeatState::Occupied { .. })
    }

    pub fn is_selected(&self) -> bool {
        self.state == SeatState::Selected
    }
}

/// Seat number to occupant, standing in for a live reservation store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyTable(BTreeMap<SeatNumber, Occupant>);

impl OccupancyTable {
    pub fn new(entries: impl IntoIterator<Item = (SeatNumber, Occupant)>) -> Self {
        Self(entries.into_iter().collect())
    }

    /// Seats reported occupied by `GET /viajes/{id}/asientos` carry no occupant details.
    pub fn from_occupied_seats(seats: impl IntoIterator<Item = SeatNumber>) -> Self {
        Self(seats.into_iter().map(|n| (n, Occupant::unknown())).collect())
    }

    /// Fixed occupancy used while the booking screen runs without live seat data.
    pub fn demo() -> Self {
        Self::new([
            (2, Occupant::new(Sex::Male, "Juan P.")),
            (5, Occupant::new(Sex::Female, "María G.")),
            (8, Occupant::new(Sex::Male, "Carlos M.")),
            (12, Occupant::new(Sex::Female, "Ana R.")),
            (15, Occupant::new(Sex::Male, "Luis S.")),
            (18, Occupant::new(Sex::Female, "Carmen L.")),
            (23, Occupant::new(Sex::Male, "Pedro H.")),
            (27, Occupant::new(Sex::Female, "Rosa T.")),
            (31, Occupant::new(Sex::Male, "Miguel A.")),
        ])
    }

    pub fn get(&self, seat: SeatNumber) -> Option<&Occupant> {
        self.0.get(&seat)
    }

    pub fn is_occupied(&self, seat: SeatNumber) -> bool {
        self.0.contains_key(&seat)
    }

    pub fn seats(&self) -> BTreeSet<SeatNumber> {
        self.0.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
