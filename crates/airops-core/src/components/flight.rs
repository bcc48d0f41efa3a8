//! Flight component and its status state machine.

use serde::{Deserialize, Serialize};

use crate::error::AirlineError;
use crate::pricing::SeatSurcharges;

use super::SeatClass;

/// Departure label given to flights created without one
pub const DEFAULT_DEPARTURE: &str = "1 am ,Day 1";

/// Price given to flights created without one
pub const DEFAULT_PRICE: u32 = 100;

/// Lifecycle status of a flight.
///
/// There is no enforced transition graph: any status may replace any other,
/// including re-opening a cancelled flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    #[default]
    Scheduled,
    Delayed,
    Cancelled,
}

impl FlightStatus {
    /// Menu order
    pub const ALL: [FlightStatus; 3] = [
        FlightStatus::Scheduled,
        FlightStatus::Delayed,
        FlightStatus::Cancelled,
    ];

    /// Canonical status text
    pub fn label(&self) -> &'static str {
        match self {
            FlightStatus::Scheduled => "Scheduled",
            FlightStatus::Delayed => "Delayed",
            FlightStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse an exact canonical label, as found in record files. Unlike crew
    /// roles no folding is applied: a state that is not one of the three
    /// tokens drops the record it came from.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Map a 1-based menu choice (1 Scheduled, 2 Delayed, 3 Cancelled)
    pub fn from_choice(choice: usize) -> Result<Self, AirlineError> {
        let idx = AirlineError::check_number("flight status", choice, Self::ALL.len())?;
        Ok(Self::ALL[idx])
    }

    /// Only scheduled flights accept bookings and crew changes
    pub fn is_scheduled(&self) -> bool {
        *self == FlightStatus::Scheduled
    }
}

impl std::fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for FlightStatus {
    type Err = AirlineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| AirlineError::UnknownCategory {
            category: "flight status",
            value: s.to_string(),
        })
    }
}

/// A flight. Its crew is not stored here: crew entries point at the
/// flight through their [`super::CrewStatus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub route: String,
    /// Schedule label such as "2 pm, Day 1" (not a timestamp)
    pub departure: String,
    /// Whole currency units
    pub price: u32,
    status: FlightStatus,
}

impl Flight {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            departure: DEFAULT_DEPARTURE.to_string(),
            price: DEFAULT_PRICE,
            status: FlightStatus::Scheduled,
        }
    }

    pub fn with_departure(mut self, departure: impl Into<String>) -> Self {
        self.departure = departure.into();
        self
    }

    pub fn with_price(mut self, price: u32) -> Self {
        self.price = price;
        self
    }

    pub fn with_status(mut self, status: FlightStatus) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> FlightStatus {
        self.status
    }

    pub fn is_bookable(&self) -> bool {
        self.status.is_scheduled()
    }

    /// Install a new status, returning the one it replaced
    pub fn transition_to(&mut self, next: FlightStatus) -> FlightStatus {
        let previous = std::mem::replace(&mut self.status, next);
        if previous != next {
            log::debug!("Flight {}: {} -> {}", self.route, previous, next);
        }
        previous
    }

    pub fn reroute(&mut self, route: impl Into<String>) {
        self.route = route.into();
    }

    pub fn reschedule(&mut self, departure: impl Into<String>) {
        self.departure = departure.into();
    }

    /// Add the flat seat-class surcharge to the stored price
    pub fn apply_surcharge(&mut self, seat: SeatClass, surcharges: &SeatSurcharges) -> u32 {
        self.price = self.price.saturating_add(surcharges.for_class(seat));
        self.price
    }

    /// Error describing why this flight can't be booked or re-crewed
    pub(crate) fn require_scheduled(&self) -> Result<(), AirlineError> {
        if self.is_bookable() {
            Ok(())
        } else {
            Err(AirlineError::FlightNotScheduled {
                route: self.route.clone(),
                status: self.status,
            })
        }
    }
}
