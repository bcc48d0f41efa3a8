//! Error taxonomy for airline operations.
//!
//! Every rejected operation returns one of these and leaves the airline
//! untouched. Callers (the operator menu, the harness) use [`ErrorKind`] to
//! decide between re-prompting and showing a domain message.

use crate::components::FlightStatus;

/// Broad category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Out-of-range number, unknown category value or stale handle
    InputValidation,
    /// A domain rule refused the operation
    PolicyViolation,
    /// A data record could not be understood
    DataFormat,
}

/// Errors returned by airline operations
#[derive(Debug, Clone, PartialEq)]
pub enum AirlineError {
    /// 1-based number outside `1..=len`
    IndexOutOfRange {
        collection: &'static str,
        number: usize,
        len: usize,
    },
    /// Menu choice or label that maps to no known value
    UnknownCategory {
        category: &'static str,
        value: String,
    },
    UnknownFlight,
    UnknownCrew,
    UnknownPassenger,
    /// A reservation must cover at least one flight
    EmptyItinerary,
    NonCompliantCrew {
        name: String,
    },
    FlightNotScheduled {
        route: String,
        status: FlightStatus,
    },
    CrewNotInPool {
        name: String,
    },
    CrewNotOnFlight {
        name: String,
        route: String,
    },
    FlightHasReservations {
        route: String,
        count: usize,
    },
}

impl AirlineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AirlineError::IndexOutOfRange { .. }
            | AirlineError::UnknownCategory { .. }
            | AirlineError::UnknownFlight
            | AirlineError::UnknownCrew
            | AirlineError::UnknownPassenger
            | AirlineError::EmptyItinerary => ErrorKind::InputValidation,
            AirlineError::NonCompliantCrew { .. }
            | AirlineError::FlightNotScheduled { .. }
            | AirlineError::CrewNotInPool { .. }
            | AirlineError::CrewNotOnFlight { .. }
            | AirlineError::FlightHasReservations { .. } => ErrorKind::PolicyViolation,
        }
    }

    /// Validate a 1-based display number against a collection length,
    /// returning the 0-based position.
    pub(crate) fn check_number(
        collection: &'static str,
        number: usize,
        len: usize,
    ) -> Result<usize, AirlineError> {
        if number == 0 || number > len {
            Err(AirlineError::IndexOutOfRange {
                collection,
                number,
                len,
            })
        } else {
            Ok(number - 1)
        }
    }
}

impl std::fmt::Display for AirlineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AirlineError::IndexOutOfRange {
                collection,
                number,
                len,
            } => {
                if *len == 0 {
                    write!(f, "No {} available (got number {})", collection, number)
                } else {
                    write!(
                        f,
                        "Invalid {} number {}: expected 1 to {}",
                        collection, number, len
                    )
                }
            }
            AirlineError::UnknownCategory { category, value } => {
                write!(f, "Unknown {}: {:?}", category, value)
            }
            AirlineError::UnknownFlight => write!(f, "Flight no longer exists"),
            AirlineError::UnknownCrew => write!(f, "Crew member no longer exists"),
            AirlineError::UnknownPassenger => write!(f, "Passenger no longer exists"),
            AirlineError::EmptyItinerary => {
                write!(f, "A reservation must cover at least one flight")
            }
            AirlineError::NonCompliantCrew { name } => write!(
                f,
                "{}'s compliance with aviation regulations is subpar",
                name
            ),
            AirlineError::FlightNotScheduled { route, status } => {
                write!(f, "Flight heading {} is {}, not Scheduled", route, status)
            }
            AirlineError::CrewNotInPool { name } => {
                write!(f, "{} is not in the available crew pool", name)
            }
            AirlineError::CrewNotOnFlight { name, route } => {
                write!(f, "{} is not assigned to the flight heading {}", name, route)
            }
            AirlineError::FlightHasReservations { route, count } => write!(
                f,
                "Flight heading {} is still referenced by {} reservation(s)",
                route, count
            ),
        }
    }
}

impl std::error::Error for AirlineError {}
