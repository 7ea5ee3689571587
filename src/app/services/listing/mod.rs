//! Station listing pipeline: filter, sort, paginate
//!
//! This module produces the listing view consumed by presentation layers:
//! a pure, deterministic pipeline that takes the full in-memory station
//! collection and a query, and returns one page of filtered, ordered
//! results. It never mutates its input and performs no I/O, so it is safe
//! to re-run on every query change.

use crate::app::models::{FuelType, StationRecord};
use std::str::FromStr;

pub mod filter;
pub mod paginate;
pub mod sort;

#[cfg(test)]
pub mod tests;

use crate::constants::DEFAULT_PAGE_SIZE;

// =============================================================================
// Listing Query
// =============================================================================

/// Sort order for the station listing
///
/// Parsing an unrecognized key falls back to [`SortKey::Name`] so a bad
/// query string degrades to the default ordering instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Station name, case-insensitive
    #[default]
    Name,
    /// Suburb, ties broken by station name
    Suburb,
    /// Cheapest first; stations with no usable price sort last
    PriceAscending,
    /// Dearest first; stations with no usable price sort last
    PriceDescending,
}

impl SortKey {
    /// Whether this ordering compares prices
    pub fn is_price_based(self) -> bool {
        matches!(self, SortKey::PriceAscending | SortKey::PriceDescending)
    }
}

impl FromStr for SortKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "suburb" => SortKey::Suburb,
            "price-ascending" | "price-asc" => SortKey::PriceAscending,
            "price-descending" | "price-desc" => SortKey::PriceDescending,
            // Unknown keys (including "name") fall back to the default order
            _ => SortKey::Name,
        })
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = match self {
            SortKey::Name => "name",
            SortKey::Suburb => "suburb",
            SortKey::PriceAscending => "price-ascending",
            SortKey::PriceDescending => "price-descending",
        };
        write!(f, "{}", key)
    }
}

/// User-selected filter, sort, and pagination criteria
///
/// `None` in an optional filter means "all". Queries are ephemeral UI
/// state: build a fresh one per interaction rather than mutating a shared
/// instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    /// Case-insensitive substring match over name, address, suburb, brand
    pub search: Option<String>,

    /// Restrict price display and price filters to one fuel type
    pub fuel_type: Option<FuelType>,

    /// Exact brand match
    pub brand: Option<String>,

    /// Exact suburb match
    pub suburb: Option<String>,

    /// Result ordering
    pub sort: SortKey,

    /// Upper price bound in cents per litre; only applied with a fuel type
    pub max_price: Option<f64>,

    /// 1-based page number; 0 is treated as 1
    pub page: usize,

    /// Stations per page
    pub page_size: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: None,
            fuel_type: None,
            brand: None,
            suburb: None,
            sort: SortKey::Name,
            max_price: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// =============================================================================
// Listing Page
// =============================================================================

/// One page of filtered, sorted station results
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage<'a> {
    /// The records on this page, in display order
    pub stations: Vec<&'a StationRecord>,

    /// Number of records matching the filters, before pagination
    pub total_count: usize,

    /// Number of pages at the query's page size
    pub total_pages: usize,

    /// Effective 1-based page number
    pub page: usize,
}

/// Apply the full listing pipeline to a station collection
///
/// Steps run in fixed order: search filter, brand filter, suburb filter,
/// fuel-visibility filter, max-price filter, sort, paginate. A page number
/// past the last page yields an empty slice, not an error.
pub fn apply<'a>(records: &'a [StationRecord], query: &ListingQuery) -> ListingPage<'a> {
    let mut matched = filter::apply_filters(records, query);
    sort::sort_stations(&mut matched, query);
    paginate::paginate(matched, query.page, query.page_size)
}

// =============================================================================
// Derived Filter Options and Statistics
// =============================================================================

/// Distinct non-empty brands, sorted, for populating filter choices
pub fn available_brands(records: &[StationRecord]) -> Vec<String> {
    distinct_values(records, |record| &record.brand)
}

/// Distinct non-empty suburbs, sorted, for populating filter choices
pub fn available_suburbs(records: &[StationRecord]) -> Vec<String> {
    distinct_values(records, |record| &record.suburb)
}

fn distinct_values<F>(records: &[StationRecord], field: F) -> Vec<String>
where
    F: Fn(&StationRecord) -> &String,
{
    let mut values: Vec<String> = records
        .iter()
        .map(field)
        .filter(|value| !value.trim().is_empty())
        .cloned()
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Summary statistics over a station collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingStats {
    /// Total number of stations
    pub total_stations: usize,

    /// Per fuel type: (stations with a known price, cheapest known price)
    pub per_fuel: Vec<(FuelType, usize, Option<f64>)>,
}

/// Compute summary statistics for report output
pub fn summarize(records: &[StationRecord]) -> ListingStats {
    let per_fuel = FuelType::all()
        .into_iter()
        .map(|fuel| {
            let known: Vec<f64> = records
                .iter()
                .filter_map(|record| record.price_for(fuel))
                .collect();
            let cheapest = known.iter().copied().min_by(f64::total_cmp);
            (fuel, known.len(), cheapest)
        })
        .collect();

    ListingStats {
        total_stations: records.len(),
        per_fuel,
    }
}
