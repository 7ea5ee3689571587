//! Tests for listing filter predicates

use super::{create_test_station, create_test_stations, page_ids};
use crate::app::models::FuelType;
use crate::app::services::listing::{self, ListingQuery, SortKey};

#[test]
fn test_no_filters_keeps_everything() {
    let records = create_test_stations();
    let page = listing::apply(&records, &ListingQuery::default());
    assert_eq!(page.total_count, 4);
}

#[test]
fn test_search_matches_name_address_suburb_brand() {
    let records = create_test_stations();

    // Name match, case-insensitive
    let query = ListingQuery {
        search: Some("shell epp".to_string()),
        ..Default::default()
    };
    let page = listing::apply(&records, &query);
    assert_eq!(page_ids(&page.stations), vec!["1"]);

    // Suburb match hits both Epping stations
    let query = ListingQuery {
        search: Some("EPPING".to_string()),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 2);

    // Brand match
    let query = ListingQuery {
        search: Some("bp".to_string()),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 1);

    // Address match
    let query = ListingQuery {
        search: Some("3 main rd".to_string()),
        ..Default::default()
    };
    assert_eq!(page_ids(&listing::apply(&records, &query).stations), vec!["3"]);
}

#[test]
fn test_blank_search_is_inactive() {
    let records = create_test_stations();
    let query = ListingQuery {
        search: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 4);
}

#[test]
fn test_brand_filter_exact_match() {
    let records = create_test_stations();
    let query = ListingQuery {
        brand: Some("BP".to_string()),
        ..Default::default()
    };
    let page = listing::apply(&records, &query);
    assert_eq!(page.total_count, 1);
    assert_eq!(page_ids(&page.stations), vec!["2"]);

    // Exact matching: no partial brand hits
    let query = ListingQuery {
        brand: Some("B".to_string()),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 0);
}

#[test]
fn test_suburb_filter_exact_match() {
    let records = create_test_stations();
    let query = ListingQuery {
        suburb: Some("Epping".to_string()),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 2);
}

#[test]
fn test_fuel_selection_alone_hides_nothing() {
    let records = create_test_stations();

    // Diesel selected, name sort, no price cap: stations without diesel
    // (Caltex, Metro) are still listed.
    let query = ListingQuery {
        fuel_type: Some(FuelType::Diesel),
        sort: SortKey::Name,
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 4);
}

#[test]
fn test_fuel_selection_with_price_sort_hides_unpriced() {
    let records = create_test_stations();

    let query = ListingQuery {
        fuel_type: Some(FuelType::Diesel),
        sort: SortKey::PriceAscending,
        ..Default::default()
    };
    let page = listing::apply(&records, &query);
    assert_eq!(page.total_count, 2);
    assert_eq!(page_ids(&page.stations), vec!["2", "1"]);
}

#[test]
fn test_fuel_selection_with_max_price_hides_unpriced() {
    let records = create_test_stations();

    // Cap high enough for every priced station; unpriced ones still drop.
    let query = ListingQuery {
        fuel_type: Some(FuelType::Unleaded),
        max_price: Some(500.0),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 3);
}

#[test]
fn test_max_price_bound_is_inclusive() {
    let records = create_test_stations();

    let query = ListingQuery {
        fuel_type: Some(FuelType::Unleaded),
        max_price: Some(185.9),
        ..Default::default()
    };
    let page = listing::apply(&records, &query);
    assert_eq!(page.total_count, 2);
    // Shell at exactly 185.9 is kept; BP at 190.0 is not.
    let mut ids = page_ids(&page.stations);
    ids.sort();
    assert_eq!(ids, vec!["1", "3"]);
}

#[test]
fn test_max_price_without_fuel_type_is_ignored() {
    let records = create_test_stations();

    let query = ListingQuery {
        max_price: Some(1.0),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 4);
}

#[test]
fn test_filters_combine_conjunctively() {
    let records = create_test_stations();

    let query = ListingQuery {
        search: Some("epping".to_string()),
        brand: Some("Shell".to_string()),
        ..Default::default()
    };
    assert_eq!(page_ids(&listing::apply(&records, &query).stations), vec!["1"]);
}

#[test]
fn test_filter_monotonicity() {
    let records = create_test_stations();

    let base = ListingQuery::default();
    let base_count = listing::apply(&records, &base).total_count;

    // Each additional filter can only shrink the result set.
    let narrowed = [
        ListingQuery {
            search: Some("epping".to_string()),
            ..base.clone()
        },
        ListingQuery {
            brand: Some("Shell".to_string()),
            ..base.clone()
        },
        ListingQuery {
            suburb: Some("Ryde".to_string()),
            ..base.clone()
        },
        ListingQuery {
            fuel_type: Some(FuelType::Unleaded),
            max_price: Some(186.0),
            ..base.clone()
        },
    ];
    for query in narrowed {
        assert!(listing::apply(&records, &query).total_count <= base_count);
    }
}

#[test]
fn test_empty_collection() {
    let records: Vec<_> = Vec::new();
    let page = listing::apply(&records, &ListingQuery::default());
    assert_eq!(page.total_count, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.stations.is_empty());
}

#[test]
fn test_search_does_not_match_postcode() {
    let records = vec![create_test_station("1", "Shell A", "Shell", "Epping", None)];
    let query = ListingQuery {
        search: Some("2000".to_string()),
        ..Default::default()
    };
    assert_eq!(listing::apply(&records, &query).total_count, 0);
}
