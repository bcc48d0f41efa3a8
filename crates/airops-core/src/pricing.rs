//! Ticket pricing: multiplicative demand factors and seat-class surcharges.

use serde::{Deserialize, Serialize};

use crate::components::SeatClass;

/// Scales a base price by seasonal, event and demand factors.
///
/// A factor of exactly zero is skipped rather than zeroing the price, so an
/// engine built with missing factors still quotes the base price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingEngine {
    pub seasonal_factor: f64,
    pub event_factor: f64,
    pub demand_factor: f64,
}

impl PricingEngine {
    pub fn new(seasonal_factor: f64, event_factor: f64, demand_factor: f64) -> Self {
        Self {
            seasonal_factor,
            event_factor,
            demand_factor,
        }
    }

    pub fn calculate_price(&self, base_price: f64) -> f64 {
        [self.seasonal_factor, self.event_factor, self.demand_factor]
            .into_iter()
            .filter(|factor| *factor != 0.0)
            .fold(base_price, |price, factor| price * factor)
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// Flat amounts added to a flight's stored price when a seat is booked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeatSurcharges {
    pub economy: u32,
    pub business: u32,
    pub first_class: u32,
}

impl SeatSurcharges {
    pub fn for_class(&self, seat: SeatClass) -> u32 {
        match seat {
            SeatClass::Economy => self.economy,
            SeatClass::Business => self.business,
            SeatClass::FirstClass => self.first_class,
        }
    }
}

impl Default for SeatSurcharges {
    fn default() -> Self {
        Self {
            economy: 0,
            business: 40,
            first_class: 100,
        }
    }
}
