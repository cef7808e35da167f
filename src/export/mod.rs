//! Paginated collection-to-CSV export
//!
//! This module implements the core of the tool:
//! - `source`: cursor-paginated document fetching (sorted by `_id`,
//!   resuming after the last id of the previous page)
//! - `row`: per-document flattening onto a fixed column list
//! - `writer`: incremental CSV output
//! - `coordinator`: the loop tying them together and deciding when to stop
//! - `progress`: user feedback for long runs

pub mod coordinator;
pub mod progress;
pub mod row;
pub mod source;
pub mod writer;

pub use coordinator::{ExportCoordinator, ExportOutcome};
pub use progress::ProgressTracker;
pub use row::RowProjector;
pub use source::{CollectionSource, DocumentPage, PageSource};
pub use writer::{CsvFileWriter, RowWriter};

use std::path::Path;

use mongodb::Database;
use mongodb::bson::Document;
use tracing::info;

use crate::config::ExportConfig;
use crate::error::{ExportError, Result};

/// Run a full export of one collection into a CSV file
///
/// # Arguments
/// * `database` - Database handle
/// * `config` - Export parameters (already validated)
/// * `output` - Resolved output file path
/// * `show_progress` - Whether to display a progress spinner
///
/// # Returns
/// * `Result<ExportOutcome>` - Export statistics or error
pub async fn run_export(
    database: &Database,
    config: &ExportConfig,
    output: &Path,
    show_progress: bool,
) -> Result<ExportOutcome> {
    // Parameters may arrive here without passing Config::validate (library
    // callers); re-check the ones the loop depends on before any I/O.
    if config.fields.is_empty() {
        return Err(ExportError::InvalidParameters("empty field list".into()).into());
    }
    if config.page_size == 0 {
        return Err(ExportError::InvalidParameters("page size must be non-zero".into()).into());
    }

    info!(
        collection = %config.collection,
        fields = config.fields.len(),
        page_size = config.page_size,
        output = %output.display(),
        "Starting collection export"
    );

    let collection = database.collection::<Document>(&config.collection);
    let source = CollectionSource::new(collection, config.page_size);
    let projector = RowProjector::from_config(config);
    let writer = CsvFileWriter::new(output, projector.headers(), config.write_headers).await?;
    let tracker = ProgressTracker::new(show_progress);

    let mut coordinator = ExportCoordinator::new(
        Box::new(source),
        projector,
        Box::new(writer),
        tracker,
        config.max_docs,
    );
    coordinator.execute().await
}
