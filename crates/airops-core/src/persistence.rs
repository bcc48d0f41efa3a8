//! Save/Load of airline snapshots, and the pricing write-back hook
//!
//! Uses bincode for binary serialization of the whole airline. Entity handles
//! are not stable across processes, so every cross-reference is written as a
//! position in the saved flight or passenger list and rebuilt on load.

use std::collections::HashMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::airline::Airline;
use crate::components::*;
use crate::error::AirlineError;
use crate::pricing::{PricingEngine, SeatSurcharges};
use crate::systems::RescheduleClock;

/// Version number for snapshot format (increment when format changes)
const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of an airline
#[derive(Serialize, Deserialize)]
pub struct SnapshotData {
    pub version: u32,
    pub name: String,
    pub pricing: PricingEngine,
    pub surcharges: SeatSurcharges,
    pub clock: RescheduleClock,
    /// Flights in display order
    pub flights: Vec<Flight>,
    /// Crew in roster order
    pub crew: Vec<SnapshotCrew>,
    /// Passengers in display order
    pub passengers: Vec<SnapshotPassenger>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SnapshotCrew {
    pub crew: Crew,
    /// Index into `flights`, `None` while pooled
    pub flight: Option<usize>,
    /// Rank of the crew member's status ticket across all crew; preserves
    /// pool order and each flight's crew order
    pub status_rank: usize,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SnapshotPassenger {
    pub name: String,
    pub loyalty_eligible: bool,
    pub reservations: Vec<SnapshotReservation>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct SnapshotReservation {
    pub flights: Vec<usize>,
    pub passengers: Vec<usize>,
    pub seat: SeatClass,
    pub special_request: Option<String>,
}

fn snapshot(airline: &Airline) -> Result<SnapshotData, PersistenceError> {
    let flight_ids = airline.flights();
    let flight_index: HashMap<FlightId, usize> =
        flight_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let passenger_ids = airline.passengers();
    let passenger_index: HashMap<PassengerId, usize> =
        passenger_ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();

    let flights = flight_ids
        .iter()
        .map(|id| airline.flight(*id).map(|f| (*f).clone()))
        .collect::<Result<Vec<_>, _>>()?;

    let roster = airline.roster();
    let mut statuses = Vec::with_capacity(roster.len());
    for id in &roster {
        statuses.push(airline.crew_status(*id)?);
    }
    let mut by_ticket: Vec<usize> = (0..roster.len()).collect();
    by_ticket.sort_by_key(|i| statuses[*i].since());
    let mut status_rank = vec![0; roster.len()];
    for (rank, i) in by_ticket.into_iter().enumerate() {
        status_rank[i] = rank;
    }

    let mut crew = Vec::with_capacity(roster.len());
    for (i, id) in roster.iter().enumerate() {
        let flight = match statuses[i].flight() {
            Some(f) => Some(*flight_index.get(&f).ok_or(PersistenceError::DanglingReference {
                what: "flight",
                index: i,
            })?),
            None => None,
        };
        crew.push(SnapshotCrew {
            crew: (*airline.crew(*id)?).clone(),
            flight,
            status_rank: status_rank[i],
        });
    }

    let mut passengers = Vec::with_capacity(passenger_ids.len());
    for id in &passenger_ids {
        let record = airline.passenger(*id)?;
        let mut reservations = Vec::with_capacity(record.reservations().len());
        for reservation in record.reservations() {
            let flights = reservation
                .flights()
                .iter()
                .map(|f| flight_index.get(f).copied())
                .collect::<Option<Vec<_>>>()
                .ok_or(PersistenceError::DanglingReference {
                    what: "flight",
                    index: passengers.len(),
                })?;
            let covered = reservation
                .passengers()
                .iter()
                .map(|p| passenger_index.get(p).copied())
                .collect::<Option<Vec<_>>>()
                .ok_or(PersistenceError::DanglingReference {
                    what: "passenger",
                    index: passengers.len(),
                })?;
            reservations.push(SnapshotReservation {
                flights,
                passengers: covered,
                seat: reservation.seat(),
                special_request: reservation.special_request().map(str::to_string),
            });
        }
        passengers.push(SnapshotPassenger {
            name: record.name.clone(),
            loyalty_eligible: record.loyalty_eligible(),
            reservations,
        });
    }

    Ok(SnapshotData {
        version: SNAPSHOT_VERSION,
        name: airline.name().to_string(),
        pricing: *airline.pricing(),
        surcharges: *airline.surcharges(),
        clock: airline.clock.clone(),
        flights,
        crew,
        passengers,
    })
}

fn restore(data: SnapshotData) -> Result<Airline, PersistenceError> {
    let mut airline = Airline::new(data.name);
    airline.pricing = data.pricing;
    airline.surcharges = data.surcharges;
    airline.clock = data.clock;

    let flights: Vec<FlightId> = data
        .flights
        .into_iter()
        .map(|f| airline.add_flight(f))
        .collect();

    let mut crew_ids = Vec::with_capacity(data.crew.len());
    for entry in &data.crew {
        crew_ids.push(airline.add_crew(entry.crew.clone()));
    }
    // Re-issue status tickets in saved order so pool and crew lists keep
    // their sequence
    let mut order: Vec<usize> = (0..data.crew.len()).collect();
    order.sort_by_key(|i| data.crew[*i].status_rank);
    for i in order {
        let since = airline.ticket();
        let status = match data.crew[i].flight {
            Some(idx) => CrewStatus::AssignedTo {
                flight: *flights
                    .get(idx)
                    .ok_or(PersistenceError::DanglingReference { what: "flight", index: idx })?,
                since,
            },
            None => CrewStatus::Unassigned { since },
        };
        if let Ok(mut current) = airline.world.get::<&mut CrewStatus>(crew_ids[i].0) {
            *current = status;
        }
    }

    let passenger_ids: Vec<PassengerId> = data
        .passengers
        .iter()
        .map(|p| airline.add_passenger(Passenger::with_loyalty(p.name.clone(), p.loyalty_eligible)))
        .collect();
    for (owner, entry) in passenger_ids.iter().zip(data.passengers) {
        let mut rebuilt = Vec::with_capacity(entry.reservations.len());
        for saved in entry.reservations {
            let legs = saved
                .flights
                .iter()
                .map(|i| {
                    flights
                        .get(*i)
                        .copied()
                        .ok_or(PersistenceError::DanglingReference { what: "flight", index: *i })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let covered = saved
                .passengers
                .iter()
                .map(|i| {
                    passenger_ids
                        .get(*i)
                        .copied()
                        .ok_or(PersistenceError::DanglingReference { what: "passenger", index: *i })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let mut reservation =
                Reservation::itinerary(legs, saved.seat)?.with_passengers(covered);
            if let Some(request) = saved.special_request {
                reservation.set_special_request(request);
            }
            rebuilt.push(reservation);
        }
        let mut record = airline
            .world
            .get::<&mut Passenger>(owner.0)
            .map_err(|_| AirlineError::UnknownPassenger)?;
        for reservation in rebuilt {
            record.push_reservation(reservation);
        }
    }

    Ok(airline)
}

/// Save the complete airline to a writer
pub fn save_airline<W: Write>(writer: W, airline: &Airline) -> Result<(), PersistenceError> {
    let data = snapshot(airline)?;
    bincode::serialize_into(writer, &data)?;
    Ok(())
}

/// Load an airline from a reader
pub fn load_airline<R: Read>(reader: R) -> Result<Airline, PersistenceError> {
    let data: SnapshotData = bincode::deserialize_from(reader)?;

    if data.version != SNAPSHOT_VERSION {
        return Err(PersistenceError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: data.version,
        });
    }

    restore(data)
}

/// Pricing factors for a route, as written back to the record source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingUpdate {
    pub route: String,
    pub base_price: f64,
    pub demand_factor: f64,
    pub seasonal_factor: f64,
    pub event_factor: f64,
}

impl PricingUpdate {
    pub fn new(route: &str, base_price: f64, pricing: &PricingEngine) -> Self {
        Self {
            route: route.to_string(),
            base_price,
            demand_factor: pricing.demand_factor,
            seasonal_factor: pricing.seasonal_factor,
            event_factor: pricing.event_factor,
        }
    }
}

/// Destination for per-route pricing updates. No on-disk format is implied.
pub trait PricingStore {
    fn update_pricing(&mut self, update: &PricingUpdate) -> Result<(), PersistenceError>;
}

/// Accepts and discards every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPricingStore;

impl PricingStore for NullPricingStore {
    fn update_pricing(&mut self, update: &PricingUpdate) -> Result<(), PersistenceError> {
        log::debug!("Pricing update for {} discarded", update.route);
        Ok(())
    }
}

/// Keeps updates in memory, newest last
impl PricingStore for Vec<PricingUpdate> {
    fn update_pricing(&mut self, update: &PricingUpdate) -> Result<(), PersistenceError> {
        self.push(update.clone());
        Ok(())
    }
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum PersistenceError {
    Io(std::io::Error),
    Bincode(Box<bincode::ErrorKind>),
    VersionMismatch { expected: u32, found: u32 },
    /// A saved cross-reference points outside the saved lists
    DanglingReference { what: &'static str, index: usize },
    Airline(AirlineError),
}

impl From<std::io::Error> for PersistenceError {
    fn from(e: std::io::Error) -> Self {
        PersistenceError::Io(e)
    }
}

impl From<Box<bincode::ErrorKind>> for PersistenceError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        PersistenceError::Bincode(e)
    }
}

impl From<AirlineError> for PersistenceError {
    fn from(e: AirlineError) -> Self {
        PersistenceError::Airline(e)
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PersistenceError::Io(e) => write!(f, "IO error: {}", e),
            PersistenceError::Bincode(e) => write!(f, "Serialization error: {}", e),
            PersistenceError::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Snapshot version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            PersistenceError::DanglingReference { what, index } => {
                write!(f, "Snapshot references unknown {} at {}", what, index)
            }
            PersistenceError::Airline(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PersistenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistenceError::Io(e) => Some(e),
            PersistenceError::Bincode(e) => Some(e.as_ref()),
            PersistenceError::Airline(e) => Some(e),
            _ => None,
        }
    }
}
