//! Command-line interface for mongocsv
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Merging arguments over the loaded configuration
//!
//! Every export parameter can come from the config file; the flags here
//! override individual values for one-off runs.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// Paginated MongoDB-to-CSV extraction
#[derive(Parser, Debug)]
#[command(
    name = "mongocsv",
    version,
    about = "Extract a MongoDB collection into a CSV file",
    long_about = "Extracts documents from a MongoDB collection into a CSV file using\n\
cursor-based pagination (sorted by _id, resuming after the last id seen),\n\
then optionally copies the finished file into a destination folder."
)]
pub struct CliArgs {
    /// MongoDB connection URI
    ///
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    #[arg(value_name = "URI")]
    pub uri: Option<String>,

    /// Database name to read from
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Collection to extract
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Comma-separated list of fields to extract, in column order
    #[arg(short = 'f', long, value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Output CSV file path
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Documents fetched per page
    #[arg(long, value_name = "N")]
    pub page_size: Option<u32>,

    /// Maximum number of rows to export
    #[arg(long, value_name = "N")]
    pub max_docs: Option<u64>,

    /// Do not write a CSV header row
    #[arg(long = "no-headers")]
    pub no_headers: bool,

    /// Destination folder to copy the finished file into
    #[arg(long, value_name = "DIR")]
    pub destination: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Quiet mode (minimal output, no progress bar)
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Very verbose mode (debug logging)
    #[arg(long = "vv")]
    pub very_verbose: bool,
}

impl CliArgs {
    /// Apply command-line overrides onto a loaded configuration
    ///
    /// # Arguments
    /// * `config` - Configuration loaded from file or defaults
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(uri) = &self.uri {
            config.connection.uri = uri.clone();
        }
        if let Some(database) = &self.database {
            config.connection.database = database.clone();
        }
        if let Some(collection) = &self.collection {
            config.export.collection = collection.clone();
        }
        if let Some(fields) = &self.fields {
            config.export.fields = fields.clone();
        }
        if let Some(output) = &self.output {
            config.export.output = output.clone();
        }
        if let Some(page_size) = self.page_size {
            config.export.page_size = page_size;
        }
        if let Some(max_docs) = self.max_docs {
            config.export.max_docs = Some(max_docs);
        }
        if self.no_headers {
            config.export.write_headers = false;
        }
        if let Some(destination) = &self.destination {
            config.copy.destination = Some(destination.clone());
        }
    }
}
