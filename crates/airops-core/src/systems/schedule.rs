//! Schedule labels - departure slots, new-flight slots and the reschedule clock

use hecs::World;
use serde::{Deserialize, Serialize};

use crate::components::FlightId;
use crate::error::AirlineError;

/// Departure slots offered when a flight is added by hand
pub const NEW_FLIGHT_SLOTS: [&str; 4] = [
    "10 pm , Day 7",
    "11 am ,Day 8",
    "6 pm , Day 8",
    "9 pm , Day 8",
];

/// Departure label for the flight at 0-based display position `index`
pub fn departure_slot(index: usize) -> String {
    let hour = (index + 1) % 12 + 1;
    let meridiem = if index % 24 < 13 { " pm" } else { " am" };
    format!("{}{}, Day {}", hour, meridiem, index / 10 + 1)
}

/// Look up a new-flight slot by 1-based menu choice
pub fn new_flight_slot(choice: usize) -> Result<&'static str, AirlineError> {
    let idx = AirlineError::check_number("departure slot", choice, NEW_FLIGHT_SLOTS.len())?;
    Ok(NEW_FLIGHT_SLOTS[idx])
}

/// Hands out the "next possible time" when an operator moves a flight.
/// Labels start on day 10; once 24 labels have been issued every further
/// draw also advances the day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleClock {
    issued: u32,
    day_offset: u32,
}

impl RescheduleClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issued(&self) -> u32 {
        self.issued
    }

    pub fn next_slot(&mut self) -> String {
        if self.issued >= 24 {
            self.day_offset += 1;
        }
        let hour = (1 + self.issued) % 12;
        self.issued += 1;
        let meridiem = if self.issued % 24 < 13 { "pm" } else { "am" };
        format!("{}{}, Day {}", hour, meridiem, 10 + self.day_offset)
    }
}

/// Reserved hook for detecting overlapping schedules. Intentionally does
/// nothing yet; flights are never checked against each other.
pub fn handle_schedule_conflicts(_world: &mut World, flight: FlightId) {
    log::trace!("Schedule conflict check skipped for {:?}", flight);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_departure_slots() {
        assert_eq!(departure_slot(0), "2 pm, Day 1");
        assert_eq!(departure_slot(10), "12 pm, Day 2");
        assert_eq!(departure_slot(11), "1 pm, Day 2");
        assert_eq!(departure_slot(13), "3 am, Day 2");
        assert_eq!(departure_slot(24), "2 pm, Day 3");
    }

    #[test]
    fn test_new_flight_slots() {
        assert_eq!(new_flight_slot(1), Ok("10 pm , Day 7"));
        assert_eq!(new_flight_slot(4), Ok("9 pm , Day 8"));
        assert!(new_flight_slot(0).is_err());
        assert!(new_flight_slot(5).is_err());
    }

    #[test]
    fn test_reschedule_clock_sequence() {
        let mut clock = RescheduleClock::new();
        assert_eq!(clock.next_slot(), "1pm, Day 10");
        assert_eq!(clock.next_slot(), "2pm, Day 10");

        for _ in 2..24 {
            clock.next_slot();
        }
        assert_eq!(clock.issued(), 24);
        // 25th label rolls the day
        assert_eq!(clock.next_slot(), "1pm, Day 11");
        assert_eq!(clock.next_slot(), "2pm, Day 12");
    }
}
