//! Record ingestion - populates an airline from comma-separated lines
//!
//! Each line reads `route,flightState,crewName,crewRole,crewCompliance,crewState`.
//! The flight and the crew member on a line are independent: a line is only
//! skipped when its flight cannot be read, while bad crew fields drop just the
//! crew member. Nothing is added to the airline until the whole source has
//! been read.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::Rng;

use crate::airline::Airline;
use crate::components::{Availability, Crew, CrewId, CrewRole, Flight, FlightId, FlightStatus};
use crate::config::AirlineConfig;
use crate::error::ErrorKind;

const FIELD_COUNT: usize = 6;

/// One parsed line
#[derive(Debug, Clone, PartialEq)]
pub struct FlightRecord {
    pub route: String,
    pub status: FlightStatus,
    /// The line's crew member, or why it was rejected
    pub crew: Result<Crew, DataFormatError>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataFormatError {
    MissingField { field: &'static str },
    UnknownFlightState(String),
    UnknownCrewRole(String),
    /// Line is not UTF-8; `valid_up_to` is the byte offset of the first bad byte
    InvalidEncoding { valid_up_to: usize },
}

impl DataFormatError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::DataFormat
    }
}

impl std::fmt::Display for DataFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataFormatError::MissingField { field } => write!(f, "Missing field: {}", field),
            DataFormatError::UnknownFlightState(state) => {
                write!(f, "Unknown flight state: {}", state)
            }
            DataFormatError::UnknownCrewRole(role) => write!(f, "Unknown crew role: {}", role),
            DataFormatError::InvalidEncoding { valid_up_to } => {
                write!(f, "Invalid UTF-8 after byte {}", valid_up_to)
            }
        }
    }
}

impl std::error::Error for DataFormatError {}

/// Parse one record line. Fields are trimmed; the last field takes the rest
/// of the line and absent trailing fields read as empty.
///
/// Only an unreadable flight state fails the record. Crew problems are kept
/// in [`FlightRecord::crew`].
pub fn parse_record(line: &str) -> Result<FlightRecord, DataFormatError> {
    let mut parts = line.splitn(FIELD_COUNT, ',').map(str::trim);
    let mut next = || parts.next().unwrap_or_default();
    let route = next();
    let state = next();
    let name = next();
    let role = next();
    let compliance = next();
    let availability = next();

    let status = FlightStatus::from_label(state)
        .ok_or_else(|| DataFormatError::UnknownFlightState(state.to_string()))?;

    Ok(FlightRecord {
        route: route.to_string(),
        status,
        crew: parse_crew(name, role, compliance, availability),
    })
}

fn parse_crew(
    name: &str,
    role: &str,
    compliance: &str,
    availability: &str,
) -> Result<Crew, DataFormatError> {
    if name.is_empty() {
        return Err(DataFormatError::MissingField { field: "crew name" });
    }
    if role.is_empty() {
        return Err(DataFormatError::MissingField { field: "crew role" });
    }
    let role = CrewRole::from_label(role)
        .ok_or_else(|| DataFormatError::UnknownCrewRole(role.to_string()))?;

    Ok(Crew::new(name, role)
        .with_compliance(compliance == "1")
        .with_availability(Availability::from_label(availability)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line number in the source
    pub line_number: usize,
    pub error: DataFormatError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub flights_added: Vec<FlightId>,
    pub crew_added: Vec<CrewId>,
    /// Lines that added nothing
    pub skipped: Vec<SkippedRecord>,
    /// Lines whose flight was added but whose crew member was not
    pub crew_skipped: Vec<SkippedRecord>,
}

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
        }
    }
}

/// Reads flight records into an airline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLoader {
    pub base_price: u32,
    pub price_jitter: u32,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::from_config(&AirlineConfig::default())
    }
}

impl DataLoader {
    pub fn from_config(config: &AirlineConfig) -> Self {
        Self {
            base_price: config.base_price,
            price_jitter: config.price_jitter,
        }
    }

    fn draw_price(&self, rng: &mut impl Rng) -> u32 {
        if self.price_jitter == 0 {
            self.base_price
        } else {
            self.base_price
                .saturating_add(rng.gen_range(0..self.price_jitter))
        }
    }

    /// Add one flight per accepted line, plus its crew member to the pool
    /// when the crew fields are valid. No crew is assigned to the flights
    /// created here.
    ///
    /// An IO failure leaves the airline untouched.
    pub fn load_from_reader<R: BufRead>(
        &self,
        mut reader: R,
        airline: &mut Airline,
        rng: &mut impl Rng,
    ) -> Result<LoadReport, LoadError> {
        let mut report = LoadReport::default();
        let mut staged = Vec::new();
        let mut buf = Vec::new();
        let mut line_number = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let parsed = std::str::from_utf8(&buf)
                .map_err(|e| DataFormatError::InvalidEncoding {
                    valid_up_to: e.valid_up_to(),
                })
                .and_then(|line| {
                    if line.trim().is_empty() {
                        Ok(None)
                    } else {
                        parse_record(line).map(Some)
                    }
                });
            match parsed {
                Ok(Some(record)) => staged.push((line_number, record)),
                Ok(None) => {}
                Err(error) => {
                    log::error!("Skipping record on line {}: {}", line_number, error);
                    report.skipped.push(SkippedRecord { line_number, error });
                }
            }
        }

        for (line_number, record) in staged {
            let flight = Flight::new(record.route)
                .with_status(record.status)
                .with_price(self.draw_price(rng));
            report.flights_added.push(airline.add_flight(flight));
            match record.crew {
                Ok(crew) => report.crew_added.push(airline.add_crew(crew)),
                Err(error) => {
                    log::warn!("No crew added from line {}: {}", line_number, error);
                    report.crew_skipped.push(SkippedRecord { line_number, error });
                }
            }
        }

        log::info!(
            "Loaded {} flights and {} crew ({} lines skipped, {} crew skipped)",
            report.flights_added.len(),
            report.crew_added.len(),
            report.skipped.len(),
            report.crew_skipped.len()
        );
        Ok(report)
    }

    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        airline: &mut Airline,
        rng: &mut impl Rng,
    ) -> Result<LoadReport, LoadError> {
        let file = File::open(path)?;
        self.load_from_reader(BufReader::new(file), airline, rng)
    }
}
