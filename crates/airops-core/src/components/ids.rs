//! Stable handles into the airline arena.

use hecs::Entity;

/// Handle to a flight entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlightId(pub(crate) Entity);

/// Handle to a crew entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrewId(pub(crate) Entity);

/// Handle to a passenger entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PassengerId(pub(crate) Entity);

impl FlightId {
    pub fn entity(&self) -> Entity {
        self.0
    }
}

impl CrewId {
    pub fn entity(&self) -> Entity {
        self.0
    }
}

impl PassengerId {
    pub fn entity(&self) -> Entity {
        self.0
    }
}

/// Insertion sequence number. Listings sort on it so display numbering
/// follows the order entities were added, even after removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Enrolled(pub u64);
