//! Command-line argument definitions for the fuel directory
//!
//! This module defines the complete CLI interface using the clap derive
//! API. The `list` command drives the listing pipeline; the `cache`
//! command performs maintenance on the persistent tier.

use crate::app::models::FuelType;
use crate::app::services::listing::SortKey;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the fuel directory
///
/// Lists fuel stations with their current prices, loaded through a local
/// two-tier cache from a configured data endpoint or a local JSON file.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fuel-directory",
    version,
    about = "List fuel stations and prices with filtering, sorting, and pagination",
    long_about = "Loads fuel station and price records from a configured data endpoint \
                  (or a local JSON file), caches them on disk with stale-while-revalidate \
                  semantics, and prints filtered, sorted, paginated listings."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the fuel directory
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// List stations with filtering, sorting, and pagination
    List(ListArgs),
    /// Inspect and maintain the persistent cache tier
    Cache(CacheArgs),
}

/// Output format for listing and cache reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Text,
    /// Machine-readable JSON
    Json,
}

/// Arguments for the list command
#[derive(Debug, Clone, Parser)]
pub struct ListArgs {
    /// URL of the station data endpoint
    ///
    /// A JSON array of station rows. If not specified, only the fallback
    /// file can supply data.
    #[arg(short = 'e', long = "endpoint", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Local JSON file used when the endpoint is unreachable
    #[arg(long = "fallback", value_name = "FILE")]
    pub fallback: Option<PathBuf>,

    /// Cache directory for the persistent tier
    ///
    /// Defaults to the platform cache directory under fuel-directory/.
    #[arg(long = "cache-path", value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// Free-text search over name, address, suburb, and brand
    #[arg(short = 's', long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Restrict price display and price filters to one fuel type
    ///
    /// One of: unleaded, diesel, premium95, premium98, lpg
    #[arg(short = 'f', long = "fuel", value_name = "FUEL")]
    pub fuel: Option<FuelType>,

    /// Exact brand filter ("all" for no filter)
    #[arg(long = "brand", value_name = "BRAND")]
    pub brand: Option<String>,

    /// Exact suburb filter ("all" for no filter)
    #[arg(long = "suburb", value_name = "SUBURB")]
    pub suburb: Option<String>,

    /// Sort order: name, suburb, price-ascending, price-descending
    ///
    /// Unknown values fall back to name order.
    #[arg(long = "sort", value_name = "KEY", default_value = "name")]
    pub sort: SortKey,

    /// Only show stations at or below this price (cents per litre);
    /// requires --fuel
    #[arg(long = "max-price", value_name = "CENTS")]
    pub max_price: Option<f64>,

    /// Page number to display (1-based)
    #[arg(short = 'p', long = "page", value_name = "N", default_value = "1")]
    pub page: usize,

    /// Stations per page
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Treat the network as unavailable (serve cache or fallback only)
    #[arg(long = "offline")]
    pub offline: bool,

    /// Require fresh data: skip stale serving and wait for the fetch
    #[arg(long = "fresh")]
    pub fresh: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose (debug) logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl ListArgs {
    /// Validate argument combinations
    pub fn validate(&self) -> Result<()> {
        if let Some(max_price) = self.max_price {
            if !max_price.is_finite() || max_price <= 0.0 {
                return Err(Error::configuration(format!(
                    "--max-price must be a positive number, got {}",
                    max_price
                )));
            }
            if self.fuel.is_none() {
                return Err(Error::configuration(
                    "--max-price requires --fuel to select which price to bound".to_string(),
                ));
            }
        }

        if let Some(page_size) = self.page_size {
            if page_size == 0 {
                return Err(Error::configuration(
                    "--page-size must be at least 1".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Brand filter with "all" mapped to no filter
    pub fn brand_filter(&self) -> Option<String> {
        self.brand
            .as_deref()
            .filter(|brand| !brand.eq_ignore_ascii_case("all"))
            .map(str::to_string)
    }

    /// Suburb filter with "all" mapped to no filter
    pub fn suburb_filter(&self) -> Option<String> {
        self.suburb
            .as_deref()
            .filter(|suburb| !suburb.eq_ignore_ascii_case("all"))
            .map(str::to_string)
    }
}

/// Arguments for the cache command
#[derive(Debug, Clone, Parser)]
pub struct CacheArgs {
    /// Cache directory for the persistent tier
    #[arg(long = "cache-path", value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// Delete expired entries
    #[arg(long = "sweep")]
    pub sweep: bool,

    /// Delete every entry
    #[arg(long = "clear")]
    pub clear: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose (debug) logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl CacheArgs {
    /// Validate argument combinations
    pub fn validate(&self) -> Result<()> {
        if self.sweep && self.clear {
            return Err(Error::configuration(
                "--sweep and --clear are mutually exclusive".to_string(),
            ));
        }
        Ok(())
    }
}
