use std::collections::BTreeSet;

use crate::models::{OccupancyTable, Seat, SeatNumber, SeatState, Trip};

/// Largest bus layout the seat map renders.
pub const MAX_SEATS: u32 = 100;

/// Per-seat state derived from the bus capacity and the occupancy table.
/// Nothing is cached: every call re-derives the seats from its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct SeatMap {
    seat_count: u32,
    occupancy: OccupancyTable,
}

impl SeatMap {
    pub fn new(seat_count: u32, occupancy: OccupancyTable) -> Self {
        Self { seat_count, occupancy }
    }

    pub fn for_trip(trip: &Trip, occupancy: OccupancyTable) -> Self {
        Self::new(trip.seat_count(), occupancy)
    }

    pub fn seat_count(&self) -> u32 {
        self.seat_count
    }

    pub fn occupancy(&self) -> &OccupancyTable {
        &self.occupancy
    }

    /// Seats `1..=seat_count` in ascending order.
    pub fn generate(&self, selection: &BTreeSet<SeatNumber>) -> Vec<Seat> {
        (1..=self.seat_count)
            .map(|number| Seat { number, state: self.state_of(number, selection) })
            .collect()
    }

    pub fn state_of(&self, number: SeatNumber, selection: &BTreeSet<SeatNumber>) -> SeatState {
        match self.occupancy.get(number) {
            Some(occupant) => SeatState::Occupied { occupant: occupant.clone() },
            None if selection.contains(&number) => SeatState::Selected,
            None => SeatState::Available,
        }
    }

    pub fn contains(&self, number: SeatNumber) -> bool {
        (1..=self.seat_count).contains(&number)
    }

    /// Toggles `seat` in a copy of `selection`. Clicking an occupied seat, a seat
    /// outside the bus, or a new seat once `max_size` is reached changes nothing.
    pub fn select(
        &self,
        seat: SeatNumber,
        selection: &BTreeSet<SeatNumber>,
        max_size: usize,
    ) -> BTreeSet<SeatNumber> {
        let mut next = selection.clone();
        if !self.contains(seat) || self.occupancy.is_occupied(seat) {
            return next;
        }

        if !next.remove(&seat) && next.len() < max_size {
            next.insert(seat);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Occupant, Sex};
    use proptest::prelude::*;

    fn map() -> SeatMap {
        SeatMap::new(
            40,
            OccupancyTable::new([
                (2, Occupant::new(Sex::Male, "Juan P.")),
                (5, Occupant::new(Sex::Female, "María G.")),
            ]),
        )
    }

    #[test]
    fn test_generate_marks_occupied_seats() {
        let seats = map().generate(&BTreeSet::new());
        assert_eq!(seats.len(), 40);
        assert_eq!(seats.first().map(|s| s.number), Some(1));
        assert_eq!(seats.last().map(|s| s.number), Some(40));

        let occupied: Vec<_> = seats.iter().filter(|s| s.is_occupied()).map(|s| s.number).collect();
        assert_eq!(occupied, vec![2, 5]);
        assert_eq!(
            seats[4].state,
            SeatState::Occupied { occupant: Occupant::new(Sex::Female, "María G.") }
        );
    }

    #[test]
    fn test_select_toggles() {
        let map = map();
        let one = map.select(1, &BTreeSet::new(), 2);
        assert_eq!(one, BTreeSet::from([1]));

        let none = map.select(1, &one, 2);
        assert!(none.is_empty());
    }

    #[test]
    fn test_select_rejects_occupied_and_full() {
        let map = map();
        let selection = BTreeSet::from([1, 3]);

        assert_eq!(map.select(2, &BTreeSet::from([1]), 2), BTreeSet::from([1]));
        assert_eq!(map.select(4, &selection, 2), selection);
        assert_eq!(map.select(41, &BTreeSet::new(), 2), BTreeSet::new());
        assert_eq!(map.select(0, &BTreeSet::new(), 2), BTreeSet::new());

        // Deselecting still works when the selection is full.
        assert_eq!(map.select(3, &selection, 2), BTreeSet::from([1]));
    }

    #[test]
    fn test_selected_state() {
        let seats = map().generate(&BTreeSet::from([3]));
        assert!(seats[2].is_selected());
        assert!(!seats[1].is_selected());
    }

    proptest! {
        #[test]
        fn prop_selection_bounded_and_never_occupied(
            clicks in proptest::collection::vec(0u32..45, 0..60),
            max_size in 0usize..6,
        ) {
            let map = map();
            let mut selection = BTreeSet::new();
            for seat in clicks {
                selection = map.select(seat, &selection, max_size);
                prop_assert!(selection.len() <= max_size);
                prop_assert!(selection.iter().all(|s| !map.occupancy().is_occupied(*s)));
            }
        }

        #[test]
        fn prop_generate_is_ascending_and_complete(seat_count in 0u32..80) {
            let occupancy = OccupancyTable::demo();
            let seats = SeatMap::new(seat_count, occupancy.clone()).generate(&BTreeSet::new());
            prop_assert_eq!(seats.len() as u32, seat_count);
            for (i, seat) in seats.iter().enumerate() {
                prop_assert_eq!(seat.number, i as u32 + 1);
                prop_assert_eq!(seat.is_occupied(), occupancy.is_occupied(seat.number));
            }
        }
    }
}
