//! Shared test utilities and fixtures for listing pipeline tests

use crate::app::models::{FuelPrices, StationRecord};
use chrono::{TimeZone, Utc};

pub mod filter_tests;

/// Create a test station with the given identity fields and unleaded price
pub fn create_test_station(
    id: &str,
    name: &str,
    brand: &str,
    suburb: &str,
    unleaded: Option<f64>,
) -> StationRecord {
    StationRecord {
        id: id.to_string(),
        name: name.to_string(),
        brand: brand.to_string(),
        address: format!("{} Main Rd", id),
        suburb: suburb.to_string(),
        postcode: "2000".to_string(),
        region: "NSW".to_string(),
        fuel_prices: FuelPrices {
            unleaded,
            ..Default::default()
        },
        coordinates: None,
        last_updated: Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap(),
        verified: false,
    }
}

/// Create a test station with explicit prices for every fuel type
pub fn create_test_station_with_prices(
    id: &str,
    name: &str,
    brand: &str,
    suburb: &str,
    prices: FuelPrices,
) -> StationRecord {
    let mut station = create_test_station(id, name, brand, suburb, None);
    station.fuel_prices = prices;
    station
}

/// Standard four-station fixture used across the listing tests
///
/// - Shell Epping: unleaded 185.9, diesel 179.5
/// - BP Ryde: unleaded 190.0, diesel 175.0
/// - Caltex Epping: unleaded 182.4 only
/// - Metro Auburn: no prices at all
pub fn create_test_stations() -> Vec<StationRecord> {
    vec![
        create_test_station_with_prices(
            "1",
            "Shell Epping",
            "Shell",
            "Epping",
            FuelPrices {
                unleaded: Some(185.9),
                diesel: Some(179.5),
                ..Default::default()
            },
        ),
        create_test_station_with_prices(
            "2",
            "BP Ryde",
            "BP",
            "Ryde",
            FuelPrices {
                unleaded: Some(190.0),
                diesel: Some(175.0),
                ..Default::default()
            },
        ),
        create_test_station_with_prices(
            "3",
            "Caltex Epping",
            "Caltex",
            "Epping",
            FuelPrices {
                unleaded: Some(182.4),
                ..Default::default()
            },
        ),
        create_test_station("4", "Metro Auburn", "Metro", "Auburn", None),
    ]
}

/// Collect station ids from a page for compact assertions
pub fn page_ids(stations: &[&StationRecord]) -> Vec<String> {
    stations.iter().map(|s| s.id.clone()).collect()
}
