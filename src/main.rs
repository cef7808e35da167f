//! mongocsv - paginated MongoDB-to-CSV extraction
//!
//! Extracts documents from a MongoDB collection into a CSV file using
//! cursor-based pagination, then optionally copies the finished file into
//! a destination folder.
//!
//! # Usage
//!
//! ```bash
//! mongocsv mongodb://localhost:27017 \
//!     --database prod --collection orders \
//!     -f DATE1,DATE2,COL1,COL2 -o orders.csv --destination ./extracted_csv
//! ```

use clap::Parser;
use tracing::{Level, info};

use mongocsv::cli::CliArgs;
use mongocsv::config::Config;
use mongocsv::error::Result;
use mongocsv::{connection, export, fscopy};

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments and load configuration
/// 2. Initialize logging
/// 3. Validate parameters (aborts before any I/O)
/// 4. Connect, export, and optionally copy the result
async fn run() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = Config::load(args.config_file.as_deref())?;
    args.apply_to(&mut config);

    initialize_logging(&args, &config);

    config.validate()?;

    let database = connection::connect(&config.connection).await?;

    let output = config.export.resolved_output();
    let outcome = export::run_export(&database, &config.export, &output, !args.quiet).await?;

    if !args.quiet {
        println!(
            "Exported {} rows ({} pages, {} bytes) to {}",
            outcome.rows_written,
            outcome.pages_fetched,
            outcome.file_size_bytes,
            output.display()
        );
    }

    if let Some(destination) = &config.copy.destination {
        let copied = fscopy::copy_to_dir(&output, destination).await?;
        info!(dest = %copied.display(), "Export file copied");
        if !args.quiet {
            println!("Copied to {}", copied.display());
        }
    }

    Ok(())
}

/// Initialize logging system based on verbosity level
///
/// # Arguments
/// * `args` - CLI arguments with verbosity flags
/// * `config` - Loaded configuration with logging settings
fn initialize_logging(args: &CliArgs, config: &Config) {
    let level = if args.very_verbose {
        Level::TRACE
    } else if args.verbose {
        Level::DEBUG
    } else if args.quiet {
        Level::WARN
    } else {
        config.logging.level.to_tracing_level()
    };

    // Build subscriber with level filter
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    // Configure timestamps
    if config.logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
