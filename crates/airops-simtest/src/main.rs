//! AirOps Headless Scenario Harness
//!
//! Drives the core the way the operator menu does, against the bundled
//! configuration and flight records. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p airops-simtest
//!   cargo run -p airops-simtest -- --verbose

use airops_core::loader::DataLoader;
use airops_core::persistence::{NullPricingStore, PricingUpdate};
use airops_core::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ── Bundled data ────────────────────────────────────────────────────────
const CONFIG_JSON: &str = include_str!("../../../data/airline.json");
const RECORDS_CSV: &str = include_str!("../../../data/flight_records.csv");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== AirOps Scenario Harness ===\n");

    let mut results = Vec::new();

    // 1. Configuration
    let config = match AirlineConfig::from_json(CONFIG_JSON) {
        Ok(config) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: true,
                detail: format!("airline '{}'", config.name),
            });
            config
        }
        Err(e) => {
            results.push(TestResult {
                name: "config_parse".into(),
                passed: false,
                detail: e.to_string(),
            });
            report(&results, verbose);
            return;
        }
    };
    results.extend(validate_config(&config, verbose));

    let mut rng = StdRng::seed_from_u64(2024);
    let mut airline = Airline::from_config(&config);

    // 2. Record ingestion
    results.extend(validate_loading(&config, &mut airline, &mut rng, verbose));

    // 3. Crew assignment policy
    results.extend(validate_assignment(&mut airline, verbose));

    // 4. Booking and pricing
    results.extend(validate_booking(&mut airline, &mut rng, verbose));

    // 5. Change desk
    results.extend(validate_change_desk(&mut airline, &mut rng, verbose));

    // 6. Snapshot round trip
    results.extend(validate_snapshot(&airline, verbose));

    report(&results, verbose);
}

fn report(results: &[TestResult], verbose: bool) {
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Configuration ────────────────────────────────────────────────────

fn validate_config(config: &AirlineConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Configuration ---");
    let mut results = Vec::new();

    let quote = config.pricing.calculate_price(100.0);
    results.push(TestResult {
        name: "config_engine_quote".into(),
        passed: (quote - 156.0).abs() < 1e-9,
        detail: format!("100 quotes at {:.2}", quote),
    });

    results.push(TestResult {
        name: "config_surcharges".into(),
        passed: config.surcharges.for_class(SeatClass::FirstClass) == 100
            && config.surcharges.for_class(SeatClass::Economy) == 0,
        detail: format!("{:?}", config.surcharges),
    });

    if verbose {
        println!("  base price {} + jitter 0..{}", config.base_price, config.price_jitter);
    }
    results
}

// ── 2. Record ingestion ─────────────────────────────────────────────────

fn validate_loading(
    config: &AirlineConfig,
    airline: &mut Airline,
    rng: &mut StdRng,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Record Ingestion ---");
    let mut results = Vec::new();

    let loader = DataLoader::from_config(config);
    let report = match loader.load_from_reader(RECORDS_CSV.as_bytes(), airline, rng) {
        Ok(report) => report,
        Err(e) => {
            results.push(TestResult {
                name: "load_records".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "load_counts".into(),
        passed: report.flights_added.len() == 7 && report.crew_added.len() == 6,
        detail: format!(
            "{} flights, {} crew",
            report.flights_added.len(),
            report.crew_added.len()
        ),
    });

    let skipped_line = report.skipped.first().map(|s| s.line_number);
    results.push(TestResult {
        name: "load_skips_unknown_state".into(),
        passed: report.skipped.len() == 1 && skipped_line == Some(5),
        detail: report
            .skipped
            .iter()
            .map(|s| format!("line {}: {}", s.line_number, s.error))
            .collect::<Vec<_>>()
            .join("; "),
    });

    // The Purser line keeps its flight but adds no crew
    let crew_skip_line = report.crew_skipped.first().map(|s| s.line_number);
    results.push(TestResult {
        name: "load_unknown_role_keeps_flight".into(),
        passed: report.crew_skipped.len() == 1 && crew_skip_line == Some(9),
        detail: report
            .crew_skipped
            .iter()
            .map(|s| format!("line {}: {}", s.line_number, s.error))
            .collect::<Vec<_>>()
            .join("; "),
    });

    let unassigned = airline
        .flights()
        .iter()
        .all(|f| airline.flight_crew(*f).is_empty());
    results.push(TestResult {
        name: "load_all_crew_pooled".into(),
        passed: unassigned && airline.crew_pool().len() == 6,
        detail: format!("{} crew in pool", airline.crew_pool().len()),
    });

    let band = config.base_price..config.base_price + config.price_jitter;
    let prices: Vec<u32> = airline
        .flights()
        .iter()
        .filter_map(|f| airline.flight(*f).ok().map(|r| r.price))
        .collect();
    results.push(TestResult {
        name: "load_price_band".into(),
        passed: prices.iter().all(|p| band.contains(p)),
        detail: format!("{:?}", prices),
    });

    if verbose {
        for (i, id) in airline.flights().iter().enumerate() {
            if let Ok(flight) = airline.flight(*id) {
                println!("  {}. {} [{}] {}", i + 1, flight.route, flight.status(), flight.price);
            }
        }
    }
    results
}

// ── 3. Crew assignment ──────────────────────────────────────────────────

fn validate_assignment(airline: &mut Airline, verbose: bool) -> Vec<TestResult> {
    println!("--- Crew Assignment ---");
    let mut results = Vec::new();

    // Flight 1 is scheduled and pool #1 is compliant
    let assigned = airline.assign_crew(1, 1);
    let on_flight = match (&assigned, airline.flight_by_number(1)) {
        (Ok(crew), Ok(flight)) => {
            airline.flight_crew(flight) == vec![*crew] && !airline.crew_pool().contains(crew)
        }
        _ => false,
    };
    results.push(TestResult {
        name: "assign_compliant".into(),
        passed: on_flight,
        detail: format!("{:?}", assigned.map(|_| "assigned")),
    });

    // Omar Farooq is non-compliant and now third in the pool
    let pool_before = airline.crew_pool();
    let refused = airline.assign_crew(4, 3);
    results.push(TestResult {
        name: "assign_refuses_non_compliant".into(),
        passed: matches!(refused, Err(AirlineError::NonCompliantCrew { .. }))
            && airline.crew_pool() == pool_before,
        detail: match &refused {
            Err(e) => e.to_string(),
            Ok(_) => "non-compliant crew was assigned".into(),
        },
    });

    // Flight 3 is delayed
    let delayed = airline.assign_crew(3, 1);
    results.push(TestResult {
        name: "assign_requires_scheduled".into(),
        passed: matches!(delayed, Err(AirlineError::FlightNotScheduled { .. })),
        detail: match &delayed {
            Err(e) => e.to_string(),
            Ok(_) => "assigned to a delayed flight".into(),
        },
    });

    let out_of_range = airline.assign_crew(1, 99);
    results.push(TestResult {
        name: "assign_rejects_bad_number".into(),
        passed: matches!(
            out_of_range.as_ref().map_err(AirlineError::kind),
            Err(ErrorKind::InputValidation)
        ),
        detail: format!("{:?}", out_of_range.err()),
    });

    // Release puts the crew member at the end of the pool
    let released = airline.release_crew(1, 1);
    let at_end = match &released {
        Ok(crew) => airline.crew_pool().last() == Some(crew),
        Err(_) => false,
    };
    results.push(TestResult {
        name: "release_to_end_of_pool".into(),
        passed: at_end,
        detail: format!("pool size {}", airline.crew_pool().len()),
    });

    if verbose {
        for (i, id) in airline.crew_pool().iter().enumerate() {
            if let Ok(crew) = airline.crew(*id) {
                println!("  pool {}. {} ({})", i + 1, crew.name, crew.role);
            }
        }
    }
    results
}

// ── 4. Booking and pricing ──────────────────────────────────────────────

fn validate_booking(airline: &mut Airline, rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Booking & Pricing ---");
    let mut results = Vec::new();

    let passenger = airline.register_passenger("Ayesha Siddiqui", rng);
    let before = airline
        .flight_by_number(2)
        .ok()
        .and_then(|f| airline.flight(f).ok().map(|r| r.price))
        .unwrap_or(0);

    let receipt = match airline.book(passenger, 2, 3) {
        Ok(receipt) => receipt,
        Err(e) => {
            results.push(TestResult {
                name: "book_first_class".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    results.push(TestResult {
        name: "book_first_class".into(),
        passed: receipt.stored_price == before + 100 && receipt.seat == SeatClass::FirstClass,
        detail: format!(
            "{} stored {} quoted {:.2}",
            receipt.route, receipt.stored_price, receipt.quoted_price
        ),
    });

    let expected = airline.pricing().calculate_price(f64::from(receipt.stored_price));
    results.push(TestResult {
        name: "book_quote_uses_engine".into(),
        passed: (receipt.quoted_price - expected).abs() < 1e-9,
        detail: format!("{:.2}", receipt.quoted_price),
    });

    let status = airline.flight(receipt.flight).map(|f| f.status());
    results.push(TestResult {
        name: "book_closes_flight".into(),
        passed: status == Ok(FlightStatus::Cancelled)
            && !airline.bookable_flights().contains(&receipt.flight),
        detail: format!("{:?}", status),
    });

    let again = airline.book(passenger, 2, 1);
    let reservations = airline
        .passenger(passenger)
        .map(|p| p.reservations().len())
        .unwrap_or(0);
    results.push(TestResult {
        name: "book_closed_flight_refused".into(),
        passed: again.is_err() && reservations == 1,
        detail: format!("{} reservation(s)", reservations),
    });

    let removal = airline.remove_flight(receipt.flight);
    results.push(TestResult {
        name: "remove_booked_flight_refused".into(),
        passed: matches!(removal, Err(AirlineError::FlightHasReservations { .. })),
        detail: format!("{:?}", removal.err()),
    });

    let published = airline.publish_pricing(receipt.flight, &mut NullPricingStore);
    let mut recorded: Vec<PricingUpdate> = Vec::new();
    let stored = airline.publish_pricing(receipt.flight, &mut recorded);
    results.push(TestResult {
        name: "publish_pricing".into(),
        passed: published.is_ok()
            && stored.is_ok()
            && recorded.first().map(|u| u.route.as_str()) == Some(receipt.route.as_str()),
        detail: format!("{:?}", recorded.first()),
    });

    if verbose {
        println!(
            "  loyalty discount eligible: {}",
            if receipt.loyalty_eligible { "yes" } else { "no" }
        );
    }
    results
}

// ── 5. Change desk ──────────────────────────────────────────────────────

fn validate_change_desk(airline: &mut Airline, rng: &mut StdRng, verbose: bool) -> Vec<TestResult> {
    println!("--- Change Desk ---");
    let mut results = Vec::new();

    let passenger = airline.add_passenger(Passenger::with_loyalty("Kamran Malik", false));
    let flight = match airline.bookable_flights().first() {
        Some(f) => *f,
        None => {
            results.push(TestResult {
                name: "desk_setup".into(),
                passed: false,
                detail: "no bookable flight left".into(),
            });
            return results;
        }
    };
    if let Err(e) = airline.book_flight(passenger, flight, SeatClass::Economy) {
        results.push(TestResult {
            name: "desk_setup".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }

    let mut desk = CoinFlip(StdRng::seed_from_u64(rng.gen()));
    let modified = airline.request_modification(
        passenger,
        1,
        SeatClass::Business,
        &mut desk,
        Some("aisle seat"),
    );
    let seat = airline
        .passenger(passenger)
        .ok()
        .and_then(|p| p.reservation(1).ok().map(|r| r.seat()));
    results.push(TestResult {
        name: "desk_modification_with_request".into(),
        passed: modified == Ok(ChangeOutcome::Applied) && seat == Some(SeatClass::Business),
        detail: format!("{:?}", modified),
    });

    let cancelled = airline.request_cancellation(passenger, 1, &mut desk, None);
    let remaining = airline
        .passenger(passenger)
        .map(|p| p.reservations().len())
        .unwrap_or(usize::MAX);
    let consistent = match cancelled {
        Ok(ChangeOutcome::Applied) => remaining == 0,
        Ok(ChangeOutcome::Refused) | Ok(ChangeOutcome::Withdrawn) => remaining == 1,
        Err(_) => false,
    };
    results.push(TestResult {
        name: "desk_cancellation_consistent".into(),
        passed: consistent,
        detail: format!("{:?}, {} reservation(s) left", cancelled, remaining),
    });

    let bad = airline.request_cancellation(passenger, 7, &mut desk, None);
    results.push(TestResult {
        name: "desk_rejects_bad_number".into(),
        passed: matches!(bad, Err(AirlineError::IndexOutOfRange { .. })),
        detail: format!("{:?}", bad),
    });

    if verbose {
        println!("  cancellation outcome: {:?}", cancelled);
    }
    results
}

// ── 6. Snapshot ─────────────────────────────────────────────────────────

fn validate_snapshot(airline: &Airline, verbose: bool) -> Vec<TestResult> {
    println!("--- Snapshot ---");
    let mut results = Vec::new();

    let mut buffer = Vec::new();
    if let Err(e) = airline.save(&mut buffer) {
        results.push(TestResult {
            name: "snapshot_save".into(),
            passed: false,
            detail: e.to_string(),
        });
        return results;
    }

    let loaded = match Airline::load(&buffer[..]) {
        Ok(loaded) => loaded,
        Err(e) => {
            results.push(TestResult {
                name: "snapshot_load".into(),
                passed: false,
                detail: e.to_string(),
            });
            return results;
        }
    };

    let names = |a: &Airline, ids: Vec<CrewId>| -> Vec<String> {
        ids.iter()
            .filter_map(|id| a.crew(*id).ok().map(|c| c.name.clone()))
            .collect()
    };
    results.push(TestResult {
        name: "snapshot_pool_order".into(),
        passed: names(airline, airline.crew_pool()) == names(&loaded, loaded.crew_pool()),
        detail: names(&loaded, loaded.crew_pool()).join(", "),
    });

    let routes = |a: &Airline| -> Vec<String> {
        a.flights()
            .iter()
            .filter_map(|id| a.flight(*id).ok().map(|f| format!("{} [{}]", f.route, f.status())))
            .collect()
    };
    results.push(TestResult {
        name: "snapshot_flights".into(),
        passed: routes(airline) == routes(&loaded),
        detail: format!("{} flights", loaded.flight_count()),
    });

    let reservation_counts = |a: &Airline| -> Vec<usize> {
        a.passengers()
            .iter()
            .filter_map(|id| a.passenger(*id).ok().map(|p| p.reservations().len()))
            .collect()
    };
    results.push(TestResult {
        name: "snapshot_reservations".into(),
        passed: reservation_counts(airline) == reservation_counts(&loaded),
        detail: format!("{:?}", reservation_counts(&loaded)),
    });

    if verbose {
        println!("  snapshot size: {} bytes", buffer.len());
    }
    results
}
