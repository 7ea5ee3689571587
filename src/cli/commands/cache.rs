//! Cache command implementation
//!
//! Maintenance operations on the persistent cache tier: statistics,
//! expired-entry sweeping, and full clearing.

use super::shared::setup_logging;
use crate::app::services::cache::{CacheStats, FileStore, TieredCache};
use crate::cli::args::{CacheArgs, OutputFormat};
use crate::{Config, Result};
use colored::Colorize;
use tracing::info;

/// Cache command runner
pub async fn run_cache(args: CacheArgs) -> Result<()> {
    setup_logging(args.verbose)?;
    args.validate()?;

    let cache_dir = args
        .cache_path
        .clone()
        .unwrap_or_else(Config::default_cache_dir);
    info!("Opening cache at {}", cache_dir.display());

    let cache = TieredCache::new(FileStore::new(&cache_dir)?);

    if args.clear {
        let cleared = cache.clear().await?;
        println!("Cleared {} cache entr{}", cleared, plural_y(cleared));
    } else if args.sweep {
        let swept = cache.sweep().await?;
        println!("Swept {} expired cache entr{}", swept, plural_y(swept));
    }

    let stats = cache.stats().await?;
    match args.format {
        OutputFormat::Text => print_stats(&cache_dir.display().to_string(), &stats),
        OutputFormat::Json => {
            let report = serde_json::json!({
                "cacheDir": cache_dir.display().to_string(),
                "persistentEntries": stats.persistent_entries,
                "persistentExpired": stats.persistent_expired,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn print_stats(cache_dir: &str, stats: &CacheStats) {
    println!();
    println!("{}", "Cache status".bold());
    println!("  Location:        {}", cache_dir);
    println!("  Entries:         {}", stats.persistent_entries);
    if stats.persistent_expired > 0 {
        println!(
            "  Expired:         {}",
            stats.persistent_expired.to_string().yellow()
        );
        println!("  Run with --sweep to remove expired entries.");
    } else {
        println!("  Expired:         0");
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 { "y" } else { "ies" }
}
