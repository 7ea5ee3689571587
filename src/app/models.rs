//! Data models for the fuel directory
//!
//! This module contains the core data structures for representing fuel
//! stations and their prices, plus the normalization boundary that converts
//! loosely-shaped provider payloads into the fixed record format used by the
//! listing pipeline.

use crate::constants::FUEL_TYPE_KEYS;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use tracing::warn;

// =============================================================================
// Fuel Type Enumeration
// =============================================================================

/// The fixed set of fuel types tracked per station
///
/// Every station record carries a price slot for each of these five types;
/// a slot with no data holds `None` rather than being absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Unleaded,
    Diesel,
    Premium95,
    Premium98,
    Lpg,
}

impl FuelType {
    /// All fuel types, in display order
    pub fn all() -> [FuelType; 5] {
        [
            FuelType::Unleaded,
            FuelType::Diesel,
            FuelType::Premium95,
            FuelType::Premium98,
            FuelType::Lpg,
        ]
    }

    /// Canonical key for this fuel type, as used in provider payloads
    pub fn key(self) -> &'static str {
        match self {
            FuelType::Unleaded => "unleaded",
            FuelType::Diesel => "diesel",
            FuelType::Premium95 => "premium95",
            FuelType::Premium98 => "premium98",
            FuelType::Lpg => "lpg",
        }
    }

    /// Human-readable label for report output
    pub fn label(self) -> &'static str {
        match self {
            FuelType::Unleaded => "Unleaded 91",
            FuelType::Diesel => "Diesel",
            FuelType::Premium95 => "Premium 95",
            FuelType::Premium98 => "Premium 98",
            FuelType::Lpg => "LPG",
        }
    }
}

impl FromStr for FuelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "unleaded" | "u91" | "91" => Ok(FuelType::Unleaded),
            "diesel" => Ok(FuelType::Diesel),
            "premium95" | "p95" | "95" => Ok(FuelType::Premium95),
            "premium98" | "p98" | "98" => Ok(FuelType::Premium98),
            "lpg" => Ok(FuelType::Lpg),
            _ => Err(Error::data_validation(format!(
                "Invalid fuel type '{}': must be one of {}",
                s,
                FUEL_TYPE_KEYS.join(", ")
            ))),
        }
    }
}

impl std::fmt::Display for FuelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

// =============================================================================
// Fuel Prices Structure
// =============================================================================

/// Price slots for the five tracked fuel types, in cents per litre
///
/// All five slots always exist; `None` is the explicit "unknown" sentinel.
/// Provider payloads with missing or extra keys are normalized into this
/// shape at the model boundary so downstream code never probes for key
/// presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FuelPrices {
    pub unleaded: Option<f64>,
    pub diesel: Option<f64>,
    pub premium95: Option<f64>,
    pub premium98: Option<f64>,
    pub lpg: Option<f64>,
}

impl FuelPrices {
    /// Get the price for a fuel type, `None` when unknown
    pub fn get(&self, fuel: FuelType) -> Option<f64> {
        match fuel {
            FuelType::Unleaded => self.unleaded,
            FuelType::Diesel => self.diesel,
            FuelType::Premium95 => self.premium95,
            FuelType::Premium98 => self.premium98,
            FuelType::Lpg => self.lpg,
        }
    }

    /// Set the price for a fuel type
    pub fn set(&mut self, fuel: FuelType, price: Option<f64>) {
        let slot = match fuel {
            FuelType::Unleaded => &mut self.unleaded,
            FuelType::Diesel => &mut self.diesel,
            FuelType::Premium95 => &mut self.premium95,
            FuelType::Premium98 => &mut self.premium98,
            FuelType::Lpg => &mut self.lpg,
        };
        *slot = price;
    }

    /// Cheapest known price across all fuel types, `None` when no data
    pub fn min_known(&self) -> Option<f64> {
        FuelType::all()
            .into_iter()
            .filter_map(|fuel| self.get(fuel))
            .min_by(f64::total_cmp)
    }

    /// Number of fuel types with a known price
    pub fn known_count(&self) -> usize {
        FuelType::all()
            .into_iter()
            .filter(|fuel| self.get(*fuel).is_some())
            .count()
    }

    /// Build fixed price slots from a loose key/value map
    ///
    /// Unrecognized keys are ignored; negative or non-finite values are
    /// treated as unknown.
    pub fn from_raw(raw: &HashMap<String, Option<f64>>) -> Self {
        let mut prices = FuelPrices::default();
        for (key, value) in raw {
            let Ok(fuel) = FuelType::from_str(key) else {
                continue;
            };
            let price = (*value).filter(|p| p.is_finite() && *p > 0.0);
            prices.set(fuel, price);
        }
        prices
    }
}

// =============================================================================
// Station Record Structure
// =============================================================================

/// Geographic coordinates in WGS84 decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A fuel station with location, brand, and current prices
///
/// Records are produced by the normalization boundary and treated as
/// immutable by the listing pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRecord {
    /// Stable unique identifier across fetches
    pub id: String,

    /// Station display name (e.g., "Shell Epping")
    pub name: String,

    /// Brand name (e.g., "Shell", "BP"); may be empty
    pub brand: String,

    /// Street address; may be empty
    pub address: String,

    /// Suburb or locality; may be empty
    pub suburb: String,

    /// Postal code; may be empty
    pub postcode: String,

    /// State or region; may be empty
    pub region: String,

    /// Current prices for all five fuel types
    pub fuel_prices: FuelPrices,

    /// Station location; absent for stations without geocoding
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,

    /// When the price data was last updated
    pub last_updated: DateTime<Utc>,

    /// Whether the price data has been verified
    pub verified: bool,
}

impl StationRecord {
    /// Validate record data for consistency and valid ranges
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::data_validation(
                "Station id cannot be empty".to_string(),
            ));
        }

        if let Some(coords) = &self.coordinates {
            if !(-90.0..=90.0).contains(&coords.latitude) {
                return Err(Error::data_validation(format!(
                    "Invalid latitude {}: must be between -90 and 90 degrees",
                    coords.latitude
                )));
            }
            if !(-180.0..=180.0).contains(&coords.longitude) {
                return Err(Error::data_validation(format!(
                    "Invalid longitude {}: must be between -180 and 180 degrees",
                    coords.longitude
                )));
            }
        }

        for fuel in FuelType::all() {
            if let Some(price) = self.fuel_prices.get(fuel) {
                if !price.is_finite() || price <= 0.0 {
                    return Err(Error::data_validation(format!(
                        "Invalid {} price {}: must be a positive number",
                        fuel, price
                    )));
                }
            }
        }

        Ok(())
    }

    /// Price for a fuel type, `None` when unknown
    pub fn price_for(&self, fuel: FuelType) -> Option<f64> {
        self.fuel_prices.get(fuel)
    }

    /// Whether any fuel price is known for this station
    pub fn has_any_price(&self) -> bool {
        self.fuel_prices.min_known().is_some()
    }
}

// =============================================================================
// Raw Provider Payload and Normalization
// =============================================================================

/// Station record as it arrives from the provider, before normalization
///
/// Provider rows are loosely shaped: the id may be a number or a string,
/// price keys may be present, absent, or unrecognized, and coordinates may
/// be partial. [`RawStationRecord::normalize`] converts this into the fixed
/// [`StationRecord`] shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStationRecord {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub suburb: String,
    #[serde(default)]
    pub postcode: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub fuel_prices: HashMap<String, Option<f64>>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub verified: bool,
}

impl RawStationRecord {
    /// Normalize this raw row into a fixed station record
    ///
    /// Returns `None` when the row has no usable identifier. Coordinates
    /// are only kept when both latitude and longitude are present.
    pub fn normalize(self, fetched_at: DateTime<Utc>) -> Option<StationRecord> {
        let id = match &self.id {
            serde_json::Value::String(s) if !s.trim().is_empty() => s.clone(),
            serde_json::Value::Number(n) => n.to_string(),
            _ => return None,
        };

        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        Some(StationRecord {
            id,
            name: self.name,
            brand: self.brand,
            address: self.address,
            suburb: self.suburb,
            postcode: self.postcode,
            region: self.region,
            fuel_prices: FuelPrices::from_raw(&self.fuel_prices),
            coordinates,
            last_updated: self.last_updated.unwrap_or(fetched_at),
            verified: self.verified,
        })
    }
}

/// Normalize a batch of raw provider rows, dropping unusable ones
pub fn normalize_records(raw: Vec<RawStationRecord>, fetched_at: DateTime<Utc>) -> Vec<StationRecord> {
    let total = raw.len();
    let records: Vec<StationRecord> = raw
        .into_iter()
        .filter_map(|row| row.normalize(fetched_at))
        .collect();

    if records.len() < total {
        warn!(
            "Dropped {} of {} provider rows with no usable identifier",
            total - records.len(),
            total
        );
    }

    records
}
