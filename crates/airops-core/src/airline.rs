//! Airline - aggregate root and main entry point for operations
//!
//! Owns the entity arena holding every flight, crew member and passenger and
//! mediates all interaction between the crew pool and flights. Menu-facing
//! operations take 1-based display numbers and validate them against the
//! current listings.

use hecs::{Ref, World};
use rand::Rng;

use crate::components::*;
use crate::config::AirlineConfig;
use crate::error::AirlineError;
use crate::persistence::{PersistenceError, PricingStore, PricingUpdate};
use crate::pricing::{PricingEngine, SeatSurcharges};
use crate::systems::*;

pub struct Airline {
    name: String,
    /// Arena containing all entities
    pub(crate) world: World,
    pub(crate) pricing: PricingEngine,
    pub(crate) surcharges: SeatSurcharges,
    pub(crate) clock: RescheduleClock,
    /// Monotonic ticket for insertion order and pool/crew ordering
    next_ticket: u64,
}

impl Airline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            world: World::new(),
            pricing: PricingEngine::default(),
            surcharges: SeatSurcharges::default(),
            clock: RescheduleClock::new(),
            next_ticket: 0,
        }
    }

    pub fn from_config(config: &AirlineConfig) -> Self {
        let mut airline = Self::new(config.name.clone());
        airline.pricing = config.pricing;
        airline.surcharges = config.surcharges;
        airline
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    pub fn set_pricing(&mut self, pricing: PricingEngine) {
        self.pricing = pricing;
    }

    pub fn surcharges(&self) -> &SeatSurcharges {
        &self.surcharges
    }

    pub(crate) fn ticket(&mut self) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        ticket
    }

    // ── Registration ──────────────────────────────────────────────────

    pub fn add_flight(&mut self, flight: Flight) -> FlightId {
        let seq = Enrolled(self.ticket());
        FlightId(self.world.spawn((flight, seq)))
    }

    /// Register a crew member; they start at the end of the pool
    pub fn add_crew(&mut self, crew: Crew) -> CrewId {
        let since = self.ticket();
        CrewId(
            self.world
                .spawn((crew, CrewStatus::Unassigned { since }, Enrolled(since))),
        )
    }

    pub fn add_passenger(&mut self, passenger: Passenger) -> PassengerId {
        let seq = Enrolled(self.ticket());
        PassengerId(self.world.spawn((passenger, seq)))
    }

    /// Create and register a passenger whose loyalty is decided by `rng`
    pub fn register_passenger(
        &mut self,
        name: impl Into<String>,
        rng: &mut impl Rng,
    ) -> PassengerId {
        self.add_passenger(Passenger::new(name, rng))
    }

    /// Remove a crew member from the pool entirely. Returns `false` and
    /// changes nothing when the crew member is not pooled.
    pub fn remove_crew(&mut self, crew: CrewId) -> bool {
        let pooled = self
            .world
            .get::<&CrewStatus>(crew.0)
            .map(|status| status.is_pooled())
            .unwrap_or(false);
        if !pooled {
            return false;
        }
        self.world.despawn(crew.0).is_ok()
    }

    // ── Listings ──────────────────────────────────────────────────────

    fn enrolled<T: hecs::Component>(&self) -> Vec<hecs::Entity> {
        let mut entries: Vec<(Enrolled, hecs::Entity)> = self
            .world
            .query::<(&T, &Enrolled)>()
            .iter()
            .map(|(entity, (_, seq))| (*seq, entity))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, entity)| entity).collect()
    }

    /// All flights in display order
    pub fn flights(&self) -> Vec<FlightId> {
        self.enrolled::<Flight>().into_iter().map(FlightId).collect()
    }

    /// Every crew member, pooled or not, in registration order
    pub fn roster(&self) -> Vec<CrewId> {
        self.enrolled::<Crew>().into_iter().map(CrewId).collect()
    }

    pub fn passengers(&self) -> Vec<PassengerId> {
        self.enrolled::<Passenger>().into_iter().map(PassengerId).collect()
    }

    /// Unassigned crew, in the order they entered the pool
    pub fn crew_pool(&self) -> Vec<CrewId> {
        crew_pool(&self.world)
    }

    /// Crew assigned to a flight, in assignment order
    pub fn flight_crew(&self, flight: FlightId) -> Vec<CrewId> {
        flight_crew(&self.world, flight)
    }

    pub fn flight(&self, id: FlightId) -> Result<Ref<'_, Flight>, AirlineError> {
        self.world
            .get::<&Flight>(id.0)
            .map_err(|_| AirlineError::UnknownFlight)
    }

    pub fn crew(&self, id: CrewId) -> Result<Ref<'_, Crew>, AirlineError> {
        self.world
            .get::<&Crew>(id.0)
            .map_err(|_| AirlineError::UnknownCrew)
    }

    pub fn crew_status(&self, id: CrewId) -> Result<CrewStatus, AirlineError> {
        self.world
            .get::<&CrewStatus>(id.0)
            .map(|status| *status)
            .map_err(|_| AirlineError::UnknownCrew)
    }

    pub fn passenger(&self, id: PassengerId) -> Result<Ref<'_, Passenger>, AirlineError> {
        self.world
            .get::<&Passenger>(id.0)
            .map_err(|_| AirlineError::UnknownPassenger)
    }

    fn passenger_mut(
        &mut self,
        id: PassengerId,
    ) -> Result<hecs::RefMut<'_, Passenger>, AirlineError> {
        self.world
            .get::<&mut Passenger>(id.0)
            .map_err(|_| AirlineError::UnknownPassenger)
    }

    fn flight_mut(&mut self, id: FlightId) -> Result<hecs::RefMut<'_, Flight>, AirlineError> {
        self.world
            .get::<&mut Flight>(id.0)
            .map_err(|_| AirlineError::UnknownFlight)
    }

    pub fn flight_count(&self) -> usize {
        self.world.query::<&Flight>().iter().count()
    }

    pub fn crew_count(&self) -> usize {
        self.world.query::<&Crew>().iter().count()
    }

    pub fn passenger_count(&self) -> usize {
        self.world.query::<&Passenger>().iter().count()
    }

    /// Flights that currently accept bookings, in display order
    pub fn bookable_flights(&self) -> Vec<FlightId> {
        self.flights()
            .into_iter()
            .filter(|id| self.flight(*id).map(|f| f.is_bookable()).unwrap_or(false))
            .collect()
    }

    // ── Display-number lookups ────────────────────────────────────────

    pub fn flight_by_number(&self, number: usize) -> Result<FlightId, AirlineError> {
        let flights = self.flights();
        let idx = AirlineError::check_number("flight", number, flights.len())?;
        Ok(flights[idx])
    }

    pub fn pool_crew_by_number(&self, number: usize) -> Result<CrewId, AirlineError> {
        let pool = self.crew_pool();
        let idx = AirlineError::check_number("crew", number, pool.len())?;
        Ok(pool[idx])
    }

    pub fn flight_crew_by_number(
        &self,
        flight: FlightId,
        number: usize,
    ) -> Result<CrewId, AirlineError> {
        let crew = self.flight_crew(flight);
        let idx = AirlineError::check_number("crew", number, crew.len())?;
        Ok(crew[idx])
    }

    pub fn passenger_by_number(&self, number: usize) -> Result<PassengerId, AirlineError> {
        let passengers = self.passengers();
        let idx = AirlineError::check_number("passenger", number, passengers.len())?;
        Ok(passengers[idx])
    }

    // ── Crew assignment ───────────────────────────────────────────────

    /// Move a pooled crew member onto a flight.
    ///
    /// Performs no compliance check: callers must check [`Crew::compliant`]
    /// first, or use [`Airline::assign_compliant_crew`].
    pub fn assign_crew_to_flight(
        &mut self,
        flight: FlightId,
        crew: CrewId,
    ) -> Result<(), AirlineError> {
        let ticket = self.ticket();
        move_to_flight(&mut self.world, crew, flight, ticket)
    }

    /// Assign crew to a scheduled flight, refusing non-compliant crew
    pub fn assign_compliant_crew(
        &mut self,
        flight: FlightId,
        crew: CrewId,
    ) -> Result<(), AirlineError> {
        self.flight(flight)?.require_scheduled()?;
        {
            let member = self.crew(crew)?;
            if !member.compliant {
                log::warn!("Refused to assign non-compliant crew {}", member.name);
                return Err(AirlineError::NonCompliantCrew {
                    name: member.name.clone(),
                });
            }
        }
        self.assign_crew_to_flight(flight, crew)
    }

    /// Menu form: flight number over all flights, crew number over the pool
    pub fn assign_crew(
        &mut self,
        flight_number: usize,
        crew_number: usize,
    ) -> Result<CrewId, AirlineError> {
        let flight = self.flight_by_number(flight_number)?;
        let crew = self.pool_crew_by_number(crew_number)?;
        self.assign_compliant_crew(flight, crew)?;
        Ok(crew)
    }

    /// Send an assigned crew member back to the end of the pool
    pub fn release_crew_from_flight(
        &mut self,
        flight: FlightId,
        crew: CrewId,
    ) -> Result<(), AirlineError> {
        let ticket = self.ticket();
        return_to_pool(&mut self.world, crew, flight, ticket)
    }

    /// Menu form: crew number is the position in that flight's crew list.
    /// Only scheduled flights can be re-crewed this way.
    pub fn release_crew(
        &mut self,
        flight_number: usize,
        crew_number: usize,
    ) -> Result<CrewId, AirlineError> {
        let flight = self.flight_by_number(flight_number)?;
        self.flight(flight)?.require_scheduled()?;
        let crew = self.flight_crew_by_number(flight, crew_number)?;
        self.release_crew_from_flight(flight, crew)?;
        Ok(crew)
    }

    // ── Flight operations ─────────────────────────────────────────────

    /// Replace a flight's status; any status may follow any other
    pub fn update_flight_status(
        &mut self,
        flight: FlightId,
        status: FlightStatus,
    ) -> Result<FlightStatus, AirlineError> {
        Ok(self.flight_mut(flight)?.transition_to(status))
    }

    /// Menu form: 1 Scheduled, 2 Delayed, 3 Cancelled
    pub fn update_status(
        &mut self,
        flight_number: usize,
        choice: usize,
    ) -> Result<FlightStatus, AirlineError> {
        let flight = self.flight_by_number(flight_number)?;
        let status = FlightStatus::from_choice(choice)?;
        self.update_flight_status(flight, status)
    }

    pub fn reroute_flight(
        &mut self,
        flight: FlightId,
        route: impl Into<String>,
    ) -> Result<(), AirlineError> {
        let route = route.into();
        {
            let mut record = self.flight_mut(flight)?;
            record.require_scheduled()?;
            record.reroute(route.clone());
        }
        for crew in self.flight_crew(flight) {
            if let Ok(mut member) = self.world.get::<&mut Crew>(crew.0) {
                member.resolve_schedule_conflict(flight, &route);
            }
        }
        Ok(())
    }

    pub fn reschedule_flight(
        &mut self,
        flight: FlightId,
        departure: impl Into<String>,
    ) -> Result<(), AirlineError> {
        let mut record = self.flight_mut(flight)?;
        record.require_scheduled()?;
        record.reschedule(departure);
        Ok(())
    }

    /// Next departure label the operator may move a flight to
    pub fn propose_departure(&mut self) -> String {
        self.clock.next_slot()
    }

    /// Add a scheduled flight at one of the fixed new-flight slots
    pub fn add_flight_at_slot(
        &mut self,
        route: impl Into<String>,
        slot_choice: usize,
    ) -> Result<FlightId, AirlineError> {
        let departure = new_flight_slot(slot_choice)?;
        Ok(self.add_flight(Flight::new(route).with_departure(departure)))
    }

    /// Relabel every flight's departure from its display position
    pub fn stamp_departure_times(&mut self) {
        for (idx, flight) in self.flights().into_iter().enumerate() {
            if let Ok(mut record) = self.world.get::<&mut Flight>(flight.0) {
                record.reschedule(departure_slot(idx));
            }
        }
    }

    /// Reserved hook; does nothing yet
    pub fn handle_schedule_conflicts(&mut self, flight: FlightId) {
        handle_schedule_conflicts(&mut self.world, flight);
    }

    /// Remove a flight from the airline.
    ///
    /// Refused while any reservation still covers the flight. Otherwise its
    /// crew return to the pool in assignment order and the handle goes stale.
    pub fn remove_flight(&mut self, flight: FlightId) -> Result<Flight, AirlineError> {
        let route = self.flight(flight)?.route.clone();
        let count: usize = self
            .world
            .query::<&Passenger>()
            .iter()
            .map(|(_, p)| p.reservations_for(flight))
            .sum();
        if count > 0 {
            log::warn!("Refused to remove {}: {} reservation(s)", route, count);
            return Err(AirlineError::FlightHasReservations { route, count });
        }

        for crew in self.flight_crew(flight) {
            if let Ok(mut member) = self.world.get::<&mut Crew>(crew.0) {
                member.remove_flight(flight);
            }
            self.release_crew_from_flight(flight, crew)?;
        }
        let record = self
            .world
            .remove_one::<Flight>(flight.0)
            .map_err(|_| AirlineError::UnknownFlight)?;
        let _ = self.world.despawn(flight.0);
        log::info!("Removed flight {}", record.route);
        Ok(record)
    }

    // ── Reservations ──────────────────────────────────────────────────

    pub fn book_flight(
        &mut self,
        passenger: PassengerId,
        flight: FlightId,
        seat: SeatClass,
    ) -> Result<BookingReceipt, AirlineError> {
        book_flight(
            &mut self.world,
            passenger,
            flight,
            seat,
            &self.surcharges,
            &self.pricing,
        )
    }

    /// Menu form of [`Airline::book_flight`]
    pub fn book(
        &mut self,
        passenger: PassengerId,
        flight_number: usize,
        seat_choice: usize,
    ) -> Result<BookingReceipt, AirlineError> {
        let seat = SeatClass::from_choice(seat_choice)?;
        let flight = self.flight_by_number(flight_number)?;
        self.book_flight(passenger, flight, seat)
    }

    pub fn cancel_reservation(
        &mut self,
        passenger: PassengerId,
        number: usize,
    ) -> Result<Reservation, AirlineError> {
        self.passenger_mut(passenger)?.cancel_reservation(number)
    }

    pub fn modify_reservation(
        &mut self,
        passenger: PassengerId,
        number: usize,
        seat: SeatClass,
    ) -> Result<SeatClass, AirlineError> {
        self.passenger_mut(passenger)?.modify_reservation(number, seat)
    }

    pub fn request_cancellation(
        &mut self,
        passenger: PassengerId,
        number: usize,
        desk: &mut impl ChangeApproval,
        special_request: Option<&str>,
    ) -> Result<ChangeOutcome, AirlineError> {
        let mut record = self.passenger_mut(passenger)?;
        request_cancellation(&mut record, number, desk, special_request)
    }

    pub fn request_modification(
        &mut self,
        passenger: PassengerId,
        number: usize,
        seat: SeatClass,
        desk: &mut impl ChangeApproval,
        special_request: Option<&str>,
    ) -> Result<ChangeOutcome, AirlineError> {
        let mut record = self.passenger_mut(passenger)?;
        request_modification(&mut record, number, seat, desk, special_request)
    }

    // ── Pricing hook ──────────────────────────────────────────────────

    /// Push a flight's current price and the airline's factors to a store
    pub fn publish_pricing(
        &self,
        flight: FlightId,
        store: &mut impl PricingStore,
    ) -> Result<(), PersistenceError> {
        let update = {
            let record = self.flight(flight)?;
            PricingUpdate::new(&record.route, f64::from(record.price), &self.pricing)
        };
        store.update_pricing(&update)
    }

    // ── Persistence ───────────────────────────────────────────────────

    /// Save a snapshot of the airline to a writer
    pub fn save<W: std::io::Write>(&self, writer: W) -> Result<(), PersistenceError> {
        crate::persistence::save_airline(writer, self)
    }

    /// Load a snapshot previously written by [`Airline::save`]
    pub fn load<R: std::io::Read>(reader: R) -> Result<Self, PersistenceError> {
        crate::persistence::load_airline(reader)
    }
}
