//! Crew assignment - pool and flight crew views over the crew registry
//!
//! Every crew entity carries exactly one [`CrewStatus`], so a crew member is
//! either pooled or on one flight and can never be both. Moving crew is a
//! status rewrite, never a copy between lists.

use hecs::World;

use crate::components::{Crew, CrewId, CrewStatus, Flight, FlightId};
use crate::error::AirlineError;

/// Pooled crew, oldest pool entry first
pub fn crew_pool(world: &World) -> Vec<CrewId> {
    let mut pooled: Vec<(u64, CrewId)> = world
        .query::<&CrewStatus>()
        .iter()
        .filter_map(|(entity, status)| match status {
            CrewStatus::Unassigned { since } => Some((*since, CrewId(entity))),
            CrewStatus::AssignedTo { .. } => None,
        })
        .collect();
    pooled.sort_by_key(|(since, _)| *since);
    pooled.into_iter().map(|(_, id)| id).collect()
}

/// Crew on a flight, in assignment order
pub fn flight_crew(world: &World, flight: FlightId) -> Vec<CrewId> {
    let mut assigned: Vec<(u64, CrewId)> = world
        .query::<&CrewStatus>()
        .iter()
        .filter_map(|(entity, status)| match status {
            CrewStatus::AssignedTo { flight: f, since } if *f == flight => {
                Some((*since, CrewId(entity)))
            }
            _ => None,
        })
        .collect();
    assigned.sort_by_key(|(since, _)| *since);
    assigned.into_iter().map(|(_, id)| id).collect()
}

/// Move a pooled crew member onto a flight.
///
/// No compliance check happens here; callers that enforce policy must check
/// [`Crew::compliant`] first.
pub fn move_to_flight(
    world: &mut World,
    crew: CrewId,
    flight: FlightId,
    ticket: u64,
) -> Result<(), AirlineError> {
    if world.get::<&Flight>(flight.0).is_err() {
        return Err(AirlineError::UnknownFlight);
    }

    let name = crew_name(world, crew)?;
    let mut status = world
        .get::<&mut CrewStatus>(crew.0)
        .map_err(|_| AirlineError::UnknownCrew)?;
    if !status.is_pooled() {
        return Err(AirlineError::CrewNotInPool { name });
    }
    *status = CrewStatus::AssignedTo {
        flight,
        since: ticket,
    };
    Ok(())
}

/// Move a crew member off a flight and onto the end of the pool
pub fn return_to_pool(
    world: &mut World,
    crew: CrewId,
    flight: FlightId,
    ticket: u64,
) -> Result<(), AirlineError> {
    let route = world
        .get::<&Flight>(flight.0)
        .map(|f| f.route.clone())
        .map_err(|_| AirlineError::UnknownFlight)?;

    let name = crew_name(world, crew)?;
    let mut status = world
        .get::<&mut CrewStatus>(crew.0)
        .map_err(|_| AirlineError::UnknownCrew)?;
    if status.flight() != Some(flight) {
        return Err(AirlineError::CrewNotOnFlight { name, route });
    }
    *status = CrewStatus::Unassigned { since: ticket };
    Ok(())
}

fn crew_name(world: &World, crew: CrewId) -> Result<String, AirlineError> {
    world
        .get::<&Crew>(crew.0)
        .map(|c| c.name.clone())
        .map_err(|_| AirlineError::UnknownCrew)
}
