//! Export coordinator: the pagination/export loop
//!
//! Brings the page source, row projector, and CSV writer together:
//! fetch a page, project every document, append the surviving rows, and
//! stop when the source runs dry or the row cap is reached. One page is
//! fetched and fully written before the next is requested.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;

use super::progress::ProgressTracker;
use super::row::RowProjector;
use super::source::PageSource;
use super::writer::RowWriter;

/// Result of a completed export
#[derive(Debug)]
pub struct ExportOutcome {
    /// Rows written to the CSV file
    pub rows_written: u64,
    /// Documents fetched and examined (skipped rows included)
    pub docs_scanned: u64,
    /// Pages fetched from the collection
    pub pages_fetched: u64,
    /// Output file size in bytes
    pub file_size_bytes: u64,
    /// Wall-clock time for the export
    pub elapsed_ms: u64,
}

/// Coordinator for one export run
pub struct ExportCoordinator {
    source: Box<dyn PageSource>,
    projector: RowProjector,
    writer: Box<dyn RowWriter>,
    tracker: ProgressTracker,
    /// Hard cap on rows written; never exceeded, truncating inside a page
    max_docs: Option<u64>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        source: Box<dyn PageSource>,
        projector: RowProjector,
        writer: Box<dyn RowWriter>,
        tracker: ProgressTracker,
        max_docs: Option<u64>,
    ) -> Self {
        Self {
            source,
            projector,
            writer,
            tracker,
            max_docs,
        }
    }

    /// Execute the export
    ///
    /// Writes the header (if configured), then loops pages until the
    /// collection is exhausted or `max_docs` rows are on disk. The writer
    /// is finalized on every exit path that has written rows, so a cap or
    /// later failure never loses flushed data.
    ///
    /// # Returns
    /// * `Result<ExportOutcome>` - Export statistics or error
    pub async fn execute(&mut self) -> Result<ExportOutcome> {
        let start_time = Instant::now();
        info!("Starting export");

        self.writer.begin().await?;

        let mut rows_written = 0u64;
        let mut docs_scanned = 0u64;
        let mut pages_fetched = 0u64;
        let mut capped = false;

        'pages: loop {
            if self.max_docs.is_some_and(|max| rows_written >= max) {
                capped = true;
                break;
            }

            debug!(page = pages_fetched + 1, "Requesting page");
            let Some(page) = self.source.next_page().await? else {
                debug!("Source exhausted");
                break;
            };
            pages_fetched += 1;

            let mut batch = Vec::with_capacity(page.docs.len());
            for (id, doc) in &page.docs {
                docs_scanned += 1;
                let Some(row) = self.projector.project(id, doc) else {
                    continue;
                };
                batch.push(row);

                if let Some(max) = self.max_docs {
                    if rows_written + batch.len() as u64 >= max {
                        rows_written += self.writer.write_rows(&batch).await? as u64;
                        self.tracker.update(rows_written);
                        capped = true;
                        break 'pages;
                    }
                }
            }

            rows_written += self.writer.write_rows(&batch).await? as u64;
            self.tracker.update(rows_written);

            if pages_fetched % 10 == 0 {
                info!(rows_written, pages_fetched, "Export progress");
            }
        }

        self.writer.finalize().await?;
        self.tracker.finish();

        let elapsed_ms = start_time.elapsed().as_millis() as u64;
        let file_size_bytes = self.writer.file_size().await?;

        if capped {
            info!(rows_written, "Row cap reached, stopping export");
        }
        info!(
            rows_written,
            docs_scanned, pages_fetched, file_size_bytes, elapsed_ms, "Export completed"
        );

        Ok(ExportOutcome {
            rows_written,
            docs_scanned,
            pages_fetched,
            file_size_bytes,
            elapsed_ms,
        })
    }
}
