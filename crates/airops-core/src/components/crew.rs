//! Crew components: identity, role, availability and assignment status.

use serde::{Deserialize, Serialize};

use crate::error::AirlineError;

use super::FlightId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrewRole {
    Pilot,
    CoPilot,
    FlightAttendant,
}

impl CrewRole {
    pub const ALL: [CrewRole; 3] = [CrewRole::Pilot, CrewRole::CoPilot, CrewRole::FlightAttendant];

    pub fn label(&self) -> &'static str {
        match self {
            CrewRole::Pilot => "Pilot",
            CrewRole::CoPilot => "CoPilot",
            CrewRole::FlightAttendant => "FlightAttendant",
        }
    }

    /// Parse a role as written in record files. Case, spaces and hyphens are
    /// ignored, so "Co-Pilot" and "flight attendant" are accepted.
    ///
    /// Role text is typed by hand and an unreadable role only costs the crew
    /// member, never the flight on the same line. Flight states stay exact
    /// (see [`FlightStatus::from_label`](super::FlightStatus::from_label))
    /// because an unknown state drops the whole record.
    pub fn from_label(label: &str) -> Option<Self> {
        let folded: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Self::ALL
            .into_iter()
            .find(|role| role.label().to_lowercase() == folded)
    }
}

impl std::fmt::Display for CrewRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for CrewRole {
    type Err = AirlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| AirlineError::UnknownCategory {
            category: "crew role",
            value: s.to_string(),
        })
    }
}

/// Whether a crew member is working or in training. Informational only;
/// assignment is gated on compliance, not availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Availability {
    #[default]
    Available,
    Training,
}

impl Availability {
    /// Anything other than "Available" reads as training
    pub fn from_label(label: &str) -> Self {
        if label == "Available" {
            Availability::Available
        } else {
            Availability::Training
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Availability::Available => "Available",
            Availability::Training => "Training",
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Crew member record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    pub name: String,
    pub role: CrewRole,
    pub availability: Availability,
    /// Compliance with aviation regulations; required for flight assignment
    pub compliant: bool,
}

impl Crew {
    pub fn new(name: impl Into<String>, role: CrewRole) -> Self {
        Self {
            name: name.into(),
            role,
            availability: Availability::Available,
            compliant: true,
        }
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    pub fn with_compliance(mut self, compliant: bool) -> Self {
        self.compliant = compliant;
        self
    }

    /// Reserved hook for re-routing around a crew member's conflicting
    /// schedule. Intentionally does nothing yet.
    pub fn resolve_schedule_conflict(&mut self, _flight: FlightId, _new_route: &str) {}

    /// Reserved hook for dropping a flight from a crew member's own
    /// schedule. Intentionally does nothing yet.
    pub fn remove_flight(&mut self, _flight: FlightId) {}
}

/// Where a crew member currently is. Lives next to [`Crew`] on the same
/// entity and is the only record of assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrewStatus {
    /// In the airline's crew pool since the given ticket
    Unassigned { since: u64 },
    /// On the given flight since the given ticket
    AssignedTo { flight: FlightId, since: u64 },
}

impl CrewStatus {
    pub fn is_pooled(&self) -> bool {
        matches!(self, CrewStatus::Unassigned { .. })
    }

    pub fn flight(&self) -> Option<FlightId> {
        match self {
            CrewStatus::Unassigned { .. } => None,
            CrewStatus::AssignedTo { flight, .. } => Some(*flight),
        }
    }

    /// Ticket used for ordering within the pool or a flight's crew list
    pub fn since(&self) -> u64 {
        match self {
            CrewStatus::Unassigned { since } | CrewStatus::AssignedTo { since, .. } => *since,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(CrewRole::from_label("Pilot"), Some(CrewRole::Pilot));
        assert_eq!(CrewRole::from_label("Co-Pilot"), Some(CrewRole::CoPilot));
        assert_eq!(CrewRole::from_label("copilot"), Some(CrewRole::CoPilot));
        assert_eq!(
            CrewRole::from_label("Flight Attendant"),
            Some(CrewRole::FlightAttendant)
        );
        assert_eq!(CrewRole::from_label("Navigator"), None);
    }

    #[test]
    fn test_availability_is_lenient() {
        assert_eq!(Availability::from_label("Available"), Availability::Available);
        assert_eq!(Availability::from_label("Training"), Availability::Training);
        assert_eq!(Availability::from_label("On leave"), Availability::Training);
    }

    #[test]
    fn test_crew_builder() {
        let crew = Crew::new("Hamza", CrewRole::Pilot)
            .with_compliance(false)
            .with_availability(Availability::Training);
        assert!(!crew.compliant);
        assert_eq!(crew.availability, Availability::Training);
    }

    #[test]
    fn test_status_ordering_ticket() {
        let status = CrewStatus::Unassigned { since: 4 };
        assert!(status.is_pooled());
        assert_eq!(status.since(), 4);
        assert_eq!(status.flight(), None);
    }

    #[test]
    fn test_role_parsing_is_looser_than_status_parsing() {
        use crate::components::FlightStatus;

        assert_eq!(CrewRole::from_label("flight_attendant"), Some(CrewRole::FlightAttendant));
        assert_eq!(FlightStatus::from_label("scheduled"), None);
        assert_eq!(FlightStatus::from_label(" Scheduled"), None);
        assert_eq!(FlightStatus::from_label("Scheduled"), Some(FlightStatus::Scheduled));
    }
}
