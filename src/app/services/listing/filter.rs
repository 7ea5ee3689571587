//! Filter predicates for the station listing
//!
//! Filters are combined into a single pass over the collection; each
//! inactive filter is skipped. Only records matching ALL active filters
//! are kept.

use super::ListingQuery;
use crate::app::models::StationRecord;

/// Apply all active filters, preserving input order
pub fn apply_filters<'a>(
    records: &'a [StationRecord],
    query: &ListingQuery,
) -> Vec<&'a StationRecord> {
    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    records
        .iter()
        .filter(|record| passes_filters(record, query, search.as_deref()))
        .collect()
}

/// Check whether a record matches every active filter
fn passes_filters(record: &StationRecord, query: &ListingQuery, search: Option<&str>) -> bool {
    // Free-text search over name, address, suburb, and brand
    if let Some(needle) = search {
        if !matches_search(record, needle) {
            return false;
        }
    }

    // Exact brand match
    if let Some(brand) = &query.brand {
        if record.brand != *brand {
            return false;
        }
    }

    // Exact suburb match
    if let Some(suburb) = &query.suburb {
        if record.suburb != *suburb {
            return false;
        }
    }

    if let Some(fuel) = query.fuel_type {
        let price = record.price_for(fuel);

        // A station is only hidden for lacking the selected fuel when the
        // price actually drives the view: price sort or a price ceiling.
        let price_load_bearing = query.sort.is_price_based() || query.max_price.is_some();
        if price_load_bearing && price.is_none() {
            return false;
        }

        // Price ceiling for the selected fuel
        if let Some(cap) = query.max_price {
            match price {
                Some(price) if price <= cap => {}
                _ => return false,
            }
        }
    }

    true
}

/// Case-insensitive substring search over the record's text fields
fn matches_search(record: &StationRecord, needle: &str) -> bool {
    record.name.to_lowercase().contains(needle)
        || record.address.to_lowercase().contains(needle)
        || record.suburb.to_lowercase().contains(needle)
        || record.brand.to_lowercase().contains(needle)
}
