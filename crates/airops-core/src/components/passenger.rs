//! Passenger and reservation components.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AirlineError;

use super::{FlightId, PassengerId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeatClass {
    #[default]
    Economy,
    Business,
    FirstClass,
}

impl SeatClass {
    /// Menu order
    pub const ALL: [SeatClass; 3] = [
        SeatClass::Economy,
        SeatClass::Business,
        SeatClass::FirstClass,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SeatClass::Economy => "Economy",
            SeatClass::Business => "Business",
            SeatClass::FirstClass => "FirstClass",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Map a 1-based menu choice (1 Economy, 2 Business, 3 FirstClass)
    pub fn from_choice(choice: usize) -> Result<Self, AirlineError> {
        let idx = AirlineError::check_number("seat class", choice, Self::ALL.len())?;
        Ok(Self::ALL[idx])
    }
}

impl std::fmt::Display for SeatClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A booking of one seat class across one or more flights.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    flights: Vec<FlightId>,
    passengers: Vec<PassengerId>,
    seat: SeatClass,
    special_request: Option<String>,
}

impl Reservation {
    pub fn new(flight: FlightId, seat: SeatClass) -> Self {
        Self {
            flights: vec![flight],
            passengers: Vec::new(),
            seat,
            special_request: None,
        }
    }

    /// Multi-leg reservation; the itinerary may not be empty
    pub fn itinerary(flights: Vec<FlightId>, seat: SeatClass) -> Result<Self, AirlineError> {
        if flights.is_empty() {
            return Err(AirlineError::EmptyItinerary);
        }
        Ok(Self {
            flights,
            passengers: Vec::new(),
            seat,
            special_request: None,
        })
    }

    pub fn with_passengers(mut self, passengers: Vec<PassengerId>) -> Self {
        self.passengers = passengers;
        self
    }

    pub fn flights(&self) -> &[FlightId] {
        &self.flights
    }

    /// First leg
    pub fn flight(&self) -> FlightId {
        self.flights[0]
    }

    pub fn covers(&self, flight: FlightId) -> bool {
        self.flights.contains(&flight)
    }

    pub fn passengers(&self) -> &[PassengerId] {
        &self.passengers
    }

    pub fn seat(&self) -> SeatClass {
        self.seat
    }

    /// Returns the previous seat class
    pub fn change_seat(&mut self, seat: SeatClass) -> SeatClass {
        std::mem::replace(&mut self.seat, seat)
    }

    pub fn special_request(&self) -> Option<&str> {
        self.special_request.as_deref()
    }

    pub fn set_special_request(&mut self, request: impl Into<String>) {
        self.special_request = Some(request.into());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Passenger {
    pub name: String,
    loyalty_eligible: bool,
    reservations: Vec<Reservation>,
}

impl Passenger {
    /// Create a passenger. Loyalty eligibility is an unweighted coin flip made
    /// here, once, and never revisited whatever the passenger claims later.
    pub fn new(name: impl Into<String>, rng: &mut impl Rng) -> Self {
        Self::with_loyalty(name, rng.gen_bool(0.5))
    }

    pub fn with_loyalty(name: impl Into<String>, loyalty_eligible: bool) -> Self {
        Self {
            name: name.into(),
            loyalty_eligible,
            reservations: Vec::new(),
        }
    }

    pub fn loyalty_eligible(&self) -> bool {
        self.loyalty_eligible
    }

    /// Reservations in booking order
    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    /// Look up a reservation by its 1-based display number
    pub fn reservation(&self, number: usize) -> Result<&Reservation, AirlineError> {
        let idx = AirlineError::check_number("reservation", number, self.reservations.len())?;
        Ok(&self.reservations[idx])
    }

    pub(crate) fn reservation_mut(
        &mut self,
        number: usize,
    ) -> Result<&mut Reservation, AirlineError> {
        let idx = AirlineError::check_number("reservation", number, self.reservations.len())?;
        Ok(&mut self.reservations[idx])
    }

    /// Append a reservation, returning its display number
    pub(crate) fn push_reservation(&mut self, reservation: Reservation) -> usize {
        self.reservations.push(reservation);
        self.reservations.len()
    }

    /// Remove the reservation with the given 1-based number. Later
    /// reservations move up one place; an invalid number changes nothing.
    pub fn cancel_reservation(&mut self, number: usize) -> Result<Reservation, AirlineError> {
        let idx = AirlineError::check_number("reservation", number, self.reservations.len())?;
        Ok(self.reservations.remove(idx))
    }

    /// Change the seat class of a reservation, returning the old class.
    /// Flight, route and price are left alone.
    pub fn modify_reservation(
        &mut self,
        number: usize,
        seat: SeatClass,
    ) -> Result<SeatClass, AirlineError> {
        Ok(self.reservation_mut(number)?.change_seat(seat))
    }

    /// Number of reservations that include the flight
    pub fn reservations_for(&self, flight: FlightId) -> usize {
        self.reservations.iter().filter(|r| r.covers(flight)).count()
    }
}
