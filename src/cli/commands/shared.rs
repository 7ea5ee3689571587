//! Shared helpers for CLI commands: logging setup and progress feedback

use crate::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

/// Initialize tracing output for a command
///
/// `RUST_LOG` overrides the level; otherwise `--verbose` selects debug and
/// everything else defaults to warnings. Log lines go to stderr so report
/// output on stdout stays clean.
pub fn setup_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()
        .ok();

    debug!("Logging initialized at level: {}", default_level);
    Ok(())
}

/// Create a simple spinner progress bar for indeterminate operations
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Format a price cell for table output, using a dash for unknown prices
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(price) => format!("{:.1}", price),
        None => "—".to_string(),
    }
}
