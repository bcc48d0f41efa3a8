//! Integration tests for airline operations as the operator drives them.
//!
//! Exercises: records → crew pool → assignment → booking → change desk
//! → snapshot
//!
//! All tests are deterministic: randomness comes from seeded generators.

use std::collections::VecDeque;

use airops_core::loader::DataLoader;
use airops_core::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Helpers ────────────────────────────────────────────────────────────

const RECORDS: &str = "\
Islamabad-Karachi,Scheduled,Asad Khan,Pilot,1,Available
Lahore-Dubai,Scheduled,Mehwish Ali,CoPilot,0,Available
Multan-Lahore,Boarding,Hina Shah,FlightAttendant,1,Available
Karachi-Jeddah,Scheduled,Raza Hussain,FlightAttendant,1,Training
";

fn loaded_airline() -> Airline {
    let config = AirlineConfig {
        price_jitter: 0,
        ..AirlineConfig::default()
    };
    let mut airline = Airline::from_config(&config);
    let mut rng = StdRng::seed_from_u64(42);
    DataLoader::from_config(&config)
        .load_from_reader(RECORDS.as_bytes(), &mut airline, &mut rng)
        .unwrap();
    airline
}

fn crew_names(airline: &Airline, ids: &[CrewId]) -> Vec<String> {
    ids.iter()
        .map(|id| airline.crew(*id).unwrap().name.clone())
        .collect()
}

/// Replays fixed change-desk decisions
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

// ── Pricing ────────────────────────────────────────────────────────────

#[test]
fn operational_engine_prices_100_at_156() {
    let engine = AirlineConfig::default().pricing;
    assert!((engine.calculate_price(100.0) - 156.0).abs() < 1e-9);
}

#[test]
fn zero_factors_are_skipped() {
    let engine = PricingEngine::new(0.0, 2.0, 0.0);
    assert_eq!(engine.calculate_price(100.0), 200.0);
    assert_eq!(PricingEngine::new(0.0, 0.0, 0.0).calculate_price(80.0), 80.0);
}

#[test]
fn first_class_stores_200_before_pricing() {
    let mut airline = Airline::from_config(&AirlineConfig::default());
    let flight = airline.add_flight(Flight::new("Karachi"));
    let passenger = airline.add_passenger(Passenger::with_loyalty("Zara", false));

    let receipt = airline
        .book_flight(passenger, flight, SeatClass::FirstClass)
        .unwrap();
    assert_eq!(receipt.stored_price, 200);
    assert_eq!(airline.flight(flight).unwrap().price, 200);
    assert!((receipt.quoted_price - 312.0).abs() < 1e-9);
}

// ── Record ingestion ───────────────────────────────────────────────────

#[test]
fn unknown_state_line_is_skipped_and_loading_continues() {
    let airline = loaded_airline();

    assert_eq!(airline.flight_count(), 3);
    assert_eq!(airline.crew_count(), 3);
    let routes: Vec<String> = airline
        .flights()
        .iter()
        .map(|f| airline.flight(*f).unwrap().route.clone())
        .collect();
    assert_eq!(
        routes,
        vec!["Islamabad-Karachi", "Lahore-Dubai", "Karachi-Jeddah"]
    );
    assert_eq!(
        crew_names(&airline, &airline.crew_pool()),
        vec!["Asad Khan", "Mehwish Ali", "Raza Hussain"]
    );
}

// ── Crew assignment ────────────────────────────────────────────────────

#[test]
fn non_compliant_crew_is_refused_without_changes() {
    let mut airline = loaded_airline();
    let pool_before = airline.crew_pool();

    let err = airline.assign_crew(1, 2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PolicyViolation);
    assert!(err.to_string().contains("subpar"));

    assert_eq!(airline.crew_pool(), pool_before);
    assert!(airline.flight_crew(airline.flights()[0]).is_empty());
}

#[test]
fn assigned_crew_is_on_exactly_one_flight() {
    let mut airline = loaded_airline();
    let crew = airline.assign_crew(3, 1).unwrap();
    let flights = airline.flights();

    assert!(!airline.crew_pool().contains(&crew));
    let holding: Vec<FlightId> = flights
        .iter()
        .copied()
        .filter(|f| airline.flight_crew(*f).contains(&crew))
        .collect();
    assert_eq!(holding, vec![flights[2]]);
    assert_eq!(airline.crew_status(crew).unwrap().flight(), Some(flights[2]));
}

#[test]
fn training_crew_can_still_be_assigned() {
    let mut airline = loaded_airline();
    // Raza Hussain is in training but compliant
    let crew = airline.assign_crew(1, 3).unwrap();
    assert_eq!(airline.crew(crew).unwrap().availability, Availability::Training);
}

#[test]
fn out_of_range_numbers_are_input_errors() {
    let mut airline = loaded_airline();
    for (flight_no, crew_no) in [(0, 1), (4, 1), (1, 0), (1, 4)] {
        let err = airline.assign_crew(flight_no, crew_no).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InputValidation);
    }
    assert_eq!(airline.crew_pool().len(), 3);
}

// ── Booking ────────────────────────────────────────────────────────────

#[test]
fn booking_cancels_flight_and_adds_one_reservation() {
    let mut airline = loaded_airline();
    let mut rng = StdRng::seed_from_u64(3);
    let passenger = airline.register_passenger("Ayesha", &mut rng);

    airline.book(passenger, 1, 1).unwrap();

    let flight = airline.flights()[0];
    assert_eq!(airline.flight(flight).unwrap().status(), FlightStatus::Cancelled);
    assert_eq!(airline.passenger(passenger).unwrap().reservations().len(), 1);
    assert!(!airline.bookable_flights().contains(&flight));

    // A second booking on the same flight is refused
    let err = airline.book(passenger, 1, 1).unwrap_err();
    assert!(matches!(err, AirlineError::FlightNotScheduled { .. }));
    assert_eq!(airline.passenger(passenger).unwrap().reservations().len(), 1);
}

#[test]
fn cancelling_reservation_keeps_relative_order() {
    let mut airline = loaded_airline();
    let passenger = airline.add_passenger(Passenger::with_loyalty("Omar", true));
    let flights = airline.flights();
    for number in 1..=3 {
        airline.book(passenger, number, 1).unwrap();
    }

    let removed = airline.cancel_reservation(passenger, 2).unwrap();
    assert_eq!(removed.flight(), flights[1]);

    let record = airline.passenger(passenger).unwrap();
    let remaining: Vec<FlightId> = record.reservations().iter().map(|r| r.flight()).collect();
    assert_eq!(remaining, vec![flights[0], flights[2]]);
}

#[test]
fn cancelling_unknown_reservation_changes_nothing() {
    let mut airline = loaded_airline();
    let passenger = airline.add_passenger(Passenger::with_loyalty("Omar", true));
    airline.book(passenger, 1, 1).unwrap();

    assert!(airline.cancel_reservation(passenger, 2).is_err());
    assert!(airline.cancel_reservation(passenger, 0).is_err());
    assert_eq!(airline.passenger(passenger).unwrap().reservations().len(), 1);
}

// ── Change desk ────────────────────────────────────────────────────────

#[test]
fn refused_screening_without_request_changes_nothing() {
    let mut airline = loaded_airline();
    let passenger = airline.add_passenger(Passenger::with_loyalty("Sana", false));
    airline.book(passenger, 1, 2).unwrap();
    let mut desk = Scripted::new(&[false, false]);

    let cancel = airline
        .request_cancellation(passenger, 1, &mut desk, None)
        .unwrap();
    let modify = airline
        .request_modification(passenger, 1, SeatClass::FirstClass, &mut desk, None)
        .unwrap();
    assert_eq!(cancel, ChangeOutcome::Withdrawn);
    assert_eq!(modify, ChangeOutcome::Withdrawn);

    let record = airline.passenger(passenger).unwrap();
    assert_eq!(record.reservations().len(), 1);
    assert_eq!(record.reservations()[0].seat(), SeatClass::Business);
    assert_eq!(record.reservations()[0].special_request(), None);
}

#[test]
fn special_request_then_approval_cancels() {
    let mut airline = loaded_airline();
    let passenger = airline.add_passenger(Passenger::with_loyalty("Sana", false));
    airline.book(passenger, 1, 2).unwrap();
    let mut desk = Scripted::new(&[false, true]);

    let outcome = airline
        .request_cancellation(passenger, 1, &mut desk, Some("medical reasons"))
        .unwrap();
    assert_eq!(outcome, ChangeOutcome::Applied);
    assert!(airline.passenger(passenger).unwrap().reservations().is_empty());
}

// ── Flight lifecycle ───────────────────────────────────────────────────

#[test]
fn removing_flight_returns_crew_in_order() {
    let mut airline = loaded_airline();
    let first = airline.assign_crew(3, 1).unwrap();
    let second = airline.assign_crew(3, 2).unwrap();
    let flight = airline.flights()[2];

    airline.remove_flight(flight).unwrap();
    assert_eq!(airline.flight_count(), 2);
    let pool = airline.crew_pool();
    assert_eq!(&pool[pool.len() - 2..], &[first, second]);
}

#[test]
fn reopened_flight_accepts_bookings_again() {
    let mut airline = loaded_airline();
    let passenger = airline.add_passenger(Passenger::with_loyalty("Kamran", false));
    airline.book(passenger, 1, 1).unwrap();
    airline.update_status(1, 1).unwrap();

    airline.book(passenger, 1, 3).unwrap();
    assert_eq!(airline.passenger(passenger).unwrap().reservations().len(), 2);
    assert_eq!(airline.flight(airline.flights()[0]).unwrap().price, 200);
}

// ── Snapshot ───────────────────────────────────────────────────────────

#[test]
fn snapshot_preserves_pool_crew_and_reservations() {
    let mut airline = loaded_airline();
    airline.assign_crew(1, 3).unwrap();
    airline.assign_crew(1, 1).unwrap();
    let released = airline.release_crew(1, 1).unwrap();
    let passenger = airline.add_passenger(Passenger::with_loyalty("Noor", true));
    airline.book(passenger, 2, 3).unwrap();

    let mut buffer = Vec::new();
    airline.save(&mut buffer).unwrap();
    let loaded = Airline::load(&buffer[..]).unwrap();

    assert_eq!(
        crew_names(&loaded, &loaded.crew_pool()),
        crew_names(&airline, &airline.crew_pool())
    );
    assert_eq!(
        crew_names(&loaded, &loaded.crew_pool()).last(),
        Some(&airline.crew(released).unwrap().name)
    );
    assert_eq!(
        crew_names(&loaded, &loaded.flight_crew(loaded.flights()[0])),
        vec!["Asad Khan"]
    );

    let record = loaded.passenger(loaded.passengers()[0]).unwrap();
    assert_eq!(record.reservations().len(), 1);
    assert_eq!(record.reservations()[0].flight(), loaded.flights()[1]);
    assert_eq!(record.reservations()[0].seat(), SeatClass::FirstClass);
}
