//! AirOps Core - Airline Operations Engine
//!
//! Manages an airline's flights, crew and passengers: crew assignment under
//! a compliance policy, flight status changes, reservations with dynamic
//! pricing, record ingestion and snapshots.
//!
//! # Architecture
//!
//! Records live in a `hecs` arena owned by [`airline::Airline`]:
//! - **Entities**: flights, crew members, passengers
//! - **Components**: plain data (Flight, Crew, CrewStatus, Passenger)
//! - **Systems**: functions over the arena (assignment, reservations, schedule)
//!
//! Every crew member carries one [`components::CrewStatus`], so the pool and
//! each flight's crew are views over the same registry.
//!
//! # Example
//!
//! ```rust,no_run
//! use airops_core::prelude::*;
//! use airops_core::loader::DataLoader;
//! use rand::SeedableRng;
//!
//! let config = AirlineConfig::default();
//! let mut airline = Airline::from_config(&config);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! DataLoader::from_config(&config)
//!     .load_file("data/flight_records.csv", &mut airline, &mut rng)
//!     .expect("records");
//!
//! // Put the first pooled crew member on flight 1
//! airline.assign_crew(1, 1).expect("assignment");
//! ```

pub mod airline;
pub mod components;
pub mod config;
pub mod error;
pub mod loader;
pub mod persistence;
pub mod pricing;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::airline::Airline;
    pub use crate::components::*;
    pub use crate::config::AirlineConfig;
    pub use crate::error::{AirlineError, ErrorKind};
    pub use crate::pricing::{PricingEngine, SeatSurcharges};
    pub use crate::systems::{BookingReceipt, ChangeApproval, ChangeOutcome, CoinFlip};
}
