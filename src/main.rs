use clap::Parser;
use fuel_directory::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    // Create async runtime and run the main command logic with signal handling
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // Set up graceful shutdown handling
        let shutdown_signal = async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install CTRL+C signal handler");

            // Cancel all operations when Ctrl+C is received
            cancellation_token.cancel();
        };

        // Run the main command with cancellation support
        tokio::select! {
            result = commands::run(args, cancellation_token.clone()) => {
                result
            }
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                Err(fuel_directory::Error::processing_interrupted(
                    "Interrupted by user".to_string()
                ))
            }
        }
    });

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(error) => {
            // Error occurred - print to stderr and exit with error code
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Fuel Directory - Station Price Listings");
    println!("=======================================");
    println!();
    println!("List fuel stations and their current prices, loaded through a local");
    println!("cache from a configured data endpoint or a local JSON file.");
    println!();
    println!("USAGE:");
    println!("    fuel-directory <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    list      List stations with filtering, sorting, and pagination");
    println!("    cache     Inspect and maintain the persistent cache tier");
    println!("    help      Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help       Show help information");
    println!("    -V, --version    Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Cheapest diesel under 190 c/L, from the configured endpoint:");
    println!("    fuel-directory list --endpoint https://data.example/stations \\");
    println!("                        --fuel diesel --sort price-ascending --max-price 190");
    println!();
    println!("    # Search by name or suburb against a local data file:");
    println!("    fuel-directory list --fallback stations.json --search epping");
    println!();
    println!("    # Sweep expired cache entries:");
    println!("    fuel-directory cache --sweep");
    println!();
    println!("For detailed help on any command, use:");
    println!("    fuel-directory <COMMAND> --help");
}
