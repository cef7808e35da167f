//! mongocsv library
//!
//! Paginated extraction of MongoDB collections into CSV files. Documents
//! are fetched in bounded pages sorted by `_id`, each page resuming after
//! the last id of the previous one, so no single request outlives server
//! time limits on large collections.
//!
//! # Modules
//!
//! - `cli`: Command-line interface and argument parsing
//! - `config`: Configuration management
//! - `connection`: MongoDB connection setup
//! - `error`: Error types and handling
//! - `export`: The paginated export pipeline (source, row, writer, loop)
//! - `fscopy`: Post-export file copy
//!
//! # Example
//!
//! ```no_run
//! use mongocsv::{config::Config, connection, export};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.connection.database = "prod".into();
//!     config.export.collection = "orders".into();
//!     config.export.fields = vec!["DATE1".into(), "COL1".into()];
//!     config.validate()?;
//!
//!     let db = connection::connect(&config.connection).await?;
//!     let output = config.export.resolved_output();
//!     let outcome = export::run_export(&db, &config.export, &output, false).await?;
//!     println!("Exported {} rows", outcome.rows_written);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod error;
pub mod export;
pub mod fscopy;

// Re-export commonly used types
pub use config::Config;
pub use error::{MongocsvError, Result};
pub use export::{ExportCoordinator, ExportOutcome};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
