//! Airline configuration loaded from JSON

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pricing::{PricingEngine, SeatSurcharges};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirlineConfig {
    pub name: String,
    pub pricing: PricingEngine,
    pub surcharges: SeatSurcharges,
    /// Base fare for flights read from records
    pub base_price: u32,
    /// Loaded fares add a uniform draw from `0..price_jitter`
    pub price_jitter: u32,
}

impl Default for AirlineConfig {
    fn default() -> Self {
        Self {
            name: "Airline".to_string(),
            pricing: PricingEngine::new(1.2, 1.0, 1.3),
            surcharges: SeatSurcharges::default(),
            base_price: 100,
            price_jitter: 50,
        }
    }
}

impl AirlineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("airline name is empty".to_string()));
        }
        let factors = [
            ("seasonal_factor", self.pricing.seasonal_factor),
            ("event_factor", self.pricing.event_factor),
            ("demand_factor", self.pricing.demand_factor),
        ];
        for (field, value) in factors {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{} must be a non-negative number, got {}",
                    field, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Json(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Json(e) => write!(f, "Invalid configuration: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Json(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AirlineConfig::from_json(r#"{ "name": "PIA", "price_jitter": 0 }"#).unwrap();
        assert_eq!(config.name, "PIA");
        assert_eq!(config.price_jitter, 0);
        assert_eq!(config.base_price, 100);
        assert_eq!(config.pricing, PricingEngine::new(1.2, 1.0, 1.3));
        assert_eq!(config.surcharges.business, 40);
    }

    #[test]
    fn test_nested_pricing() {
        let config = AirlineConfig::from_json(
            r#"{ "pricing": { "demand_factor": 2.0 }, "surcharges": { "first_class": 150 } }"#,
        )
        .unwrap();
        // Missing engine fields fall back to the engine's own defaults
        assert_eq!(config.pricing, PricingEngine::new(1.0, 1.0, 2.0));
        assert_eq!(config.surcharges.first_class, 150);
        assert_eq!(config.surcharges.business, 40);
    }

    #[test]
    fn test_rejects_negative_factor() {
        let err =
            AirlineConfig::from_json(r#"{ "pricing": { "event_factor": -1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_blank_name() {
        assert!(matches!(
            AirlineConfig::from_json(r#"{ "name": "  " }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            AirlineConfig::from_json("{ name"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AirlineConfig::load("/nonexistent/airline.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
