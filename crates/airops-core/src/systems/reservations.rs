//! Reservation lifecycle - booking, and the change desk in front of
//! cancellations and seat changes

use hecs::World;
use rand::Rng;

use crate::components::{
    Flight, FlightId, FlightStatus, Passenger, PassengerId, Reservation, SeatClass,
};
use crate::error::AirlineError;
use crate::pricing::{PricingEngine, SeatSurcharges};

/// What the passenger gets back from a successful booking
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReceipt {
    /// 1-based position in the passenger's reservation list
    pub reservation_number: usize,
    pub flight: FlightId,
    pub route: String,
    pub seat: SeatClass,
    /// Flight price after the seat surcharge, before factors
    pub stored_price: u32,
    /// Price after the pricing engine
    pub quoted_price: f64,
    pub loyalty_eligible: bool,
}

/// Book a seat on a scheduled flight.
///
/// On success the passenger gains exactly one reservation, the flight is
/// closed to further bookings by moving it to `Cancelled`, and the seat
/// surcharge is added to the flight's stored price. On failure nothing
/// changes.
pub fn book_flight(
    world: &mut World,
    passenger: PassengerId,
    flight: FlightId,
    seat: SeatClass,
    surcharges: &SeatSurcharges,
    pricing: &PricingEngine,
) -> Result<BookingReceipt, AirlineError> {
    if world.get::<&Passenger>(passenger.0).is_err() {
        return Err(AirlineError::UnknownPassenger);
    }

    let (route, stored_price) = {
        let mut record = world
            .get::<&mut Flight>(flight.0)
            .map_err(|_| AirlineError::UnknownFlight)?;
        record.require_scheduled()?;
        record.transition_to(FlightStatus::Cancelled);
        let price = record.apply_surcharge(seat, surcharges);
        (record.route.clone(), price)
    };

    let (reservation_number, loyalty_eligible) = {
        let mut owner = world
            .get::<&mut Passenger>(passenger.0)
            .map_err(|_| AirlineError::UnknownPassenger)?;
        let reservation = Reservation::new(flight, seat).with_passengers(vec![passenger]);
        (owner.push_reservation(reservation), owner.loyalty_eligible())
    };

    let quoted_price = pricing.calculate_price(f64::from(stored_price));
    log::info!(
        "Booked {} seat on {} (stored price {}, quoted {:.2})",
        seat,
        route,
        stored_price,
        quoted_price
    );

    Ok(BookingReceipt {
        reservation_number,
        flight,
        route,
        seat,
        stored_price,
        quoted_price,
        loyalty_eligible,
    })
}

/// Source of yes/no decisions for change requests
pub trait ChangeApproval {
    fn approve(&mut self) -> bool;
}

/// Unweighted coin flip per decision
#[derive(Debug, Clone)]
pub struct CoinFlip<R>(pub R);

impl<R: Rng> ChangeApproval for CoinFlip<R> {
    fn approve(&mut self) -> bool {
        self.0.gen_bool(0.5)
    }
}

impl<A: ChangeApproval + ?Sized> ChangeApproval for &mut A {
    fn approve(&mut self) -> bool {
        (**self).approve()
    }
}

/// Result of a change request that passed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The change was made
    Applied,
    /// Screening passed but the final decision kept the reservation
    Refused,
    /// Screening refused and no special request was offered; nothing changed
    Withdrawn,
}

/// Ask the desk to cancel a reservation.
///
/// The first decision screens the request. A refusal can be overridden by
/// offering a special request, which is recorded on the reservation. A second
/// decision then settles whether the reservation is actually removed.
pub fn request_cancellation(
    passenger: &mut Passenger,
    number: usize,
    desk: &mut impl ChangeApproval,
    special_request: Option<&str>,
) -> Result<ChangeOutcome, AirlineError> {
    passenger.reservation(number)?;
    if !screen(passenger, number, desk, special_request)? {
        return Ok(ChangeOutcome::Withdrawn);
    }
    if desk.approve() {
        passenger.cancel_reservation(number)?;
        Ok(ChangeOutcome::Applied)
    } else {
        log::info!("Cancellation of reservation {} for {} refused", number, passenger.name);
        Ok(ChangeOutcome::Refused)
    }
}

/// Ask the desk to change a reservation's seat class. Once screening passes
/// the change always goes through.
pub fn request_modification(
    passenger: &mut Passenger,
    number: usize,
    seat: SeatClass,
    desk: &mut impl ChangeApproval,
    special_request: Option<&str>,
) -> Result<ChangeOutcome, AirlineError> {
    passenger.reservation(number)?;
    if !screen(passenger, number, desk, special_request)? {
        return Ok(ChangeOutcome::Withdrawn);
    }
    passenger.modify_reservation(number, seat)?;
    Ok(ChangeOutcome::Applied)
}

fn screen(
    passenger: &mut Passenger,
    number: usize,
    desk: &mut impl ChangeApproval,
    special_request: Option<&str>,
) -> Result<bool, AirlineError> {
    if desk.approve() {
        return Ok(true);
    }
    match special_request {
        Some(request) => {
            passenger.reservation_mut(number)?.set_special_request(request);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Replays fixed decisions
    struct Scripted(VecDeque<bool>);

    impl Scripted {
        fn new(decisions: &[bool]) -> Self {
            Self(decisions.iter().copied().collect())
        }
    }

    impl ChangeApproval for Scripted {
        fn approve(&mut self) -> bool {
            self.0.pop_front().expect("script exhausted")
        }
    }

    fn setup() -> (World, PassengerId, FlightId) {
        let mut world = World::new();
        let flight = FlightId(world.spawn((Flight::new("LHE-JED"),)));
        let passenger = PassengerId(world.spawn((Passenger::with_loyalty("Zara", true),)));
        (world, passenger, flight)
    }

    #[test]
    fn test_booking_closes_flight() {
        let (mut world, passenger, flight) = setup();
        let pricing = PricingEngine::new(1.2, 1.0, 1.3);
        let receipt = book_flight(
            &mut world,
            passenger,
            flight,
            SeatClass::FirstClass,
            &SeatSurcharges::default(),
            &pricing,
        )
        .unwrap();

        assert_eq!(receipt.reservation_number, 1);
        assert_eq!(receipt.stored_price, 200);
        assert!((receipt.quoted_price - 312.0).abs() < 1e-9);
        assert!(receipt.loyalty_eligible);

        let record = world.get::<&Flight>(flight.0).unwrap();
        assert_eq!(record.status(), FlightStatus::Cancelled);
        assert_eq!(record.price, 200);
    }

    #[test]
    fn test_booking_unscheduled_flight_changes_nothing() {
        let (mut world, passenger, flight) = setup();
        world
            .get::<&mut Flight>(flight.0)
            .unwrap()
            .transition_to(FlightStatus::Delayed);

        let err = book_flight(
            &mut world,
            passenger,
            flight,
            SeatClass::Business,
            &SeatSurcharges::default(),
            &PricingEngine::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AirlineError::FlightNotScheduled { .. }));

        assert_eq!(world.get::<&Flight>(flight.0).unwrap().price, 100);
        assert!(world.get::<&Passenger>(passenger.0).unwrap().reservations().is_empty());
    }

    fn booked_passenger(reservations: usize) -> Passenger {
        let (_world, _, flight) = setup();
        let mut passenger = Passenger::with_loyalty("Omar", false);
        for _ in 0..reservations {
            passenger.push_reservation(Reservation::new(flight, SeatClass::Economy));
        }
        passenger
    }

    #[test]
    fn test_refused_screening_without_request_withdraws() {
        let mut passenger = booked_passenger(1);
        let mut desk = Scripted::new(&[false]);

        let outcome = request_cancellation(&mut passenger, 1, &mut desk, None).unwrap();
        assert_eq!(outcome, ChangeOutcome::Withdrawn);
        assert_eq!(passenger.reservations().len(), 1);
        assert_eq!(passenger.reservations()[0].special_request(), None);
    }

    #[test]
    fn test_special_request_overrides_screening() {
        let mut passenger = booked_passenger(2);
        let mut desk = Scripted::new(&[false, false]);

        let outcome =
            request_cancellation(&mut passenger, 2, &mut desk, Some("window seat please")).unwrap();
        assert_eq!(outcome, ChangeOutcome::Refused);
        assert_eq!(passenger.reservations().len(), 2);
        assert_eq!(
            passenger.reservations()[1].special_request(),
            Some("window seat please")
        );
    }

    #[test]
    fn test_approved_cancellation() {
        let mut passenger = booked_passenger(2);
        let mut desk = Scripted::new(&[true, true]);

        let outcome = request_cancellation(&mut passenger, 1, &mut desk, None).unwrap();
        assert_eq!(outcome, ChangeOutcome::Applied);
        assert_eq!(passenger.reservations().len(), 1);
    }

    #[test]
    fn test_modification_after_screening() {
        let mut passenger = booked_passenger(1);
        let mut desk = Scripted::new(&[false]);

        let outcome = request_modification(
            &mut passenger,
            1,
            SeatClass::Business,
            &mut desk,
            Some("extra legroom"),
        )
        .unwrap();
        assert_eq!(outcome, ChangeOutcome::Applied);
        assert_eq!(passenger.reservations()[0].seat(), SeatClass::Business);
    }

    #[test]
    fn test_invalid_number_consumes_no_decision() {
        let mut passenger = booked_passenger(1);
        let mut desk = Scripted::new(&[]);

        assert!(request_cancellation(&mut passenger, 3, &mut desk, None).is_err());
        assert!(
            request_modification(&mut passenger, 0, SeatClass::Economy, &mut desk, None).is_err()
        );
    }

    #[test]
    fn test_coin_flip_gives_both_answers() {
        let mut desk = CoinFlip(StdRng::seed_from_u64(11));
        let approvals = (0..200).filter(|_| desk.approve()).count();
        assert!(approvals > 0, "desk never approved");
        assert!(approvals < 200, "desk never refused");
    }

    #[test]
    fn test_coin_flip_outcome_matches_reservations() {
        let mut seen = Vec::new();
        for seed in 0..64 {
            let mut passenger = booked_passenger(1);
            let mut desk = CoinFlip(StdRng::seed_from_u64(seed));

            let outcome = request_cancellation(&mut passenger, 1, &mut desk, None).unwrap();
            let expected = match outcome {
                ChangeOutcome::Applied => 0,
                ChangeOutcome::Refused | ChangeOutcome::Withdrawn => 1,
            };
            assert_eq!(passenger.reservations().len(), expected, "seed {}", seed);
            assert_eq!(passenger.reservations().first().and_then(|r| r.special_request()), None);
            if !seen.contains(&outcome) {
                seen.push(outcome);
            }
        }
        assert_eq!(seen.len(), 3, "outcomes seen: {:?}", seen);
    }
}
