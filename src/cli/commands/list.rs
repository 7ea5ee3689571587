//! List command implementation
//!
//! Loads the station collection through the provider (cache first, network
//! behind it, local fallback file last), applies the listing pipeline, and
//! prints one page of results with a summary footer.

use super::shared::{create_spinner, format_price, setup_logging};
use crate::app::models::StationRecord;
use crate::app::services::cache::{CacheRead, FileStore, TieredCache};
use crate::app::services::fetch::{FetchClient, OnlineStatus};
use crate::app::services::listing::{self, ListingPage, ListingQuery};
use crate::app::services::provider::StationProvider;
use crate::cli::args::{ListArgs, OutputFormat};
use crate::{Config, Error, Result};
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// List command runner
pub async fn run_list(args: ListArgs, token: CancellationToken) -> Result<()> {
    setup_logging(args.verbose)?;
    args.validate()?;

    let config = build_config(&args)?;
    info!("Loading stations from {}", describe_source(&config));

    let provider = build_provider(&config, &args, token)?;

    let spinner = create_spinner("Loading stations...");
    let result = if args.fresh {
        provider.stations().await.map(|value| CacheRead {
            value,
            stale: false,
        })
    } else {
        provider.stations_allow_stale().await
    };
    spinner.finish_and_clear();

    let read = match result {
        Ok(read) => read,
        Err(err) if err.is_aborted() => {
            return Err(Error::processing_interrupted(
                "Station load cancelled".to_string(),
            ));
        }
        Err(err) => {
            // Retry affordance: the fetch failed and nothing was cached.
            eprintln!(
                "{}",
                "Could not load station data. Run the command again to retry, \
                 or pass --fallback FILE to use local data."
                    .red()
            );
            return Err(err);
        }
    };

    let query = build_query(&args, &config);
    debug!("Applying listing query: {:?}", query);
    let page = listing::apply(&read.value, &query);

    match args.format {
        OutputFormat::Text => print_text_report(&page, &query, &read.value, read.stale),
        OutputFormat::Json => print_json_report(&page, read.stale)?,
    }

    Ok(())
}

/// Assemble configuration from defaults, environment, and CLI overrides
fn build_config(args: &ListArgs) -> Result<Config> {
    let mut config = Config::default();

    if let Ok(endpoint) = std::env::var("FUEL_DIRECTORY_ENDPOINT") {
        config = config.with_endpoint(endpoint);
    }
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    if let Some(path) = &args.cache_path {
        config = config.with_cache_dir(path.clone());
    }
    if let Some(path) = &args.fallback {
        config = config.with_fallback_path(path.clone());
    }
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }

    config.validate()?;
    Ok(config)
}

fn build_provider(
    config: &Config,
    args: &ListArgs,
    token: CancellationToken,
) -> Result<StationProvider<FileStore>> {
    let store = FileStore::new(&config.cache_dir)?;
    let cache = TieredCache::new(store);

    let online = OnlineStatus::new(!args.offline);
    let client = FetchClient::with_timeout(
        config.retry.policy(),
        config.retry.timeout(),
        online,
        token,
    )?;

    let mut provider =
        StationProvider::new(cache, client, config.endpoint.clone(), config.stations_ttl());
    if let Some(path) = &config.fallback_path {
        provider = provider.with_fallback(path.clone());
    }
    Ok(provider)
}

fn build_query(args: &ListArgs, config: &Config) -> ListingQuery {
    ListingQuery {
        search: args.search.clone(),
        fuel_type: args.fuel,
        brand: args.brand_filter(),
        suburb: args.suburb_filter(),
        sort: args.sort,
        max_price: args.max_price,
        page: args.page,
        page_size: config.page_size,
    }
}

fn describe_source(config: &Config) -> String {
    if config.endpoint.trim().is_empty() {
        match &config.fallback_path {
            Some(path) => format!("local file {}", path.display()),
            None => "no source".to_string(),
        }
    } else {
        config.endpoint.clone()
    }
}

// =============================================================================
// Report Output
// =============================================================================

fn print_text_report(
    page: &ListingPage<'_>,
    query: &ListingQuery,
    all_records: &[StationRecord],
    stale: bool,
) {
    if stale {
        println!(
            "{}",
            "Showing cached data; prices may be out of date (refreshing in background)."
                .yellow()
        );
        println!();
    }

    let price_header = match query.fuel_type {
        Some(fuel) => fuel.label().to_string(),
        None => "Best price".to_string(),
    };

    println!(
        "{:<32} {:<12} {:<18} {:>12}  {}",
        "Station".bold(),
        "Brand".bold(),
        "Suburb".bold(),
        price_header.bold(),
        "Verified".bold()
    );

    if page.stations.is_empty() {
        println!("{}", "No stations match the current filters.".dimmed());
    }

    for station in &page.stations {
        let price = match query.fuel_type {
            Some(fuel) => station.price_for(fuel),
            None => station.fuel_prices.min_known(),
        };
        println!(
            "{:<32} {:<12} {:<18} {:>12}  {}",
            truncate(&station.name, 32),
            truncate(&station.brand, 12),
            truncate(&station.suburb, 18),
            format_price(price),
            if station.verified { "✓".green() } else { " ".normal() }
        );
    }

    println!();
    println!(
        "Page {} of {} — {} matching station{}",
        page.page,
        page.total_pages.max(1),
        page.total_count,
        if page.total_count == 1 { "" } else { "s" }
    );

    print_price_summary(all_records);
}

fn print_price_summary(records: &[StationRecord]) {
    let stats = listing::summarize(records);
    if stats.total_stations == 0 {
        return;
    }

    println!();
    println!("{}", "Cheapest prices across all stations:".bold());
    for (fuel, known, cheapest) in &stats.per_fuel {
        if *known == 0 {
            continue;
        }
        println!(
            "  {:<12} {:>8}  ({} station{})",
            fuel.label(),
            format_price(*cheapest),
            known,
            if *known == 1 { "" } else { "s" }
        );
    }
}

fn print_json_report(page: &ListingPage<'_>, stale: bool) -> Result<()> {
    let report = serde_json::json!({
        "stations": page.stations,
        "totalCount": page.total_count,
        "totalPages": page.total_pages,
        "page": page.page,
        "stale": stale,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
