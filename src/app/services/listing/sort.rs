//! Comparators for the station listing
//!
//! All sorts are stable: records with equal sort keys retain their input
//! order. Price sorts use sentinel ranks so stations without a usable
//! price always land at the end of the listing, ascending or descending.

use super::{ListingQuery, SortKey};
use crate::app::models::{FuelType, StationRecord};

/// Rank substituted for a missing price under ascending order
const MISSING_RANK_ASCENDING: f64 = f64::INFINITY;

/// Rank substituted for a missing price under descending order
const MISSING_RANK_DESCENDING: f64 = 0.0;

/// Sort the filtered records in place according to the query
pub fn sort_stations(stations: &mut [&StationRecord], query: &ListingQuery) {
    match query.sort {
        SortKey::Name => {
            stations.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        }
        SortKey::Suburb => {
            stations.sort_by(|a, b| {
                (a.suburb.to_lowercase(), a.name.to_lowercase())
                    .cmp(&(b.suburb.to_lowercase(), b.name.to_lowercase()))
            });
        }
        SortKey::PriceAscending => {
            stations.sort_by(|a, b| {
                price_rank(a, query.fuel_type, MISSING_RANK_ASCENDING)
                    .total_cmp(&price_rank(b, query.fuel_type, MISSING_RANK_ASCENDING))
            });
        }
        SortKey::PriceDescending => {
            stations.sort_by(|a, b| {
                price_rank(b, query.fuel_type, MISSING_RANK_DESCENDING)
                    .total_cmp(&price_rank(a, query.fuel_type, MISSING_RANK_DESCENDING))
            });
        }
    }
}

/// Price used for ordering a station
///
/// With a fuel type selected, the station's price for that fuel; under
/// "all fuels", the station's cheapest known price. `missing_rank` stands
/// in when no usable price exists.
fn price_rank(station: &StationRecord, fuel: Option<FuelType>, missing_rank: f64) -> f64 {
    let price = match fuel {
        Some(fuel) => station.price_for(fuel),
        None => station.fuel_prices.min_known(),
    };
    price.unwrap_or(missing_rank)
}
