//! Incremental CSV output for export operations
//!
//! The output file is opened once and held for the whole run. Rows are
//! written whole and each batch is flushed, so an aborted export leaves
//! every previously written row intact on disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::{ExportError, Result};

/// Trait for writing projected rows to an output file
#[async_trait]
pub trait RowWriter: Send {
    /// Write the header row, if configured
    async fn begin(&mut self) -> Result<()>;

    /// Write a batch of rows
    ///
    /// # Arguments
    /// * `rows` - Rows to write, each already in column order
    ///
    /// # Returns
    /// * `Result<usize>` - Number of rows written
    async fn write_rows(&mut self, rows: &[Vec<String>]) -> Result<usize>;

    /// Finalize the output (flush buffers)
    async fn finalize(&mut self) -> Result<()>;

    /// Get the current file size in bytes
    async fn file_size(&self) -> Result<u64>;
}

/// CSV file writer with a fixed column list
#[derive(Debug)]
pub struct CsvFileWriter {
    /// Buffered file writer
    writer: BufWriter<File>,
    /// Path to the output file
    path: PathBuf,
    /// Column headers, fixed for the whole run
    headers: Vec<String>,
    /// Whether to emit the header row
    write_headers: bool,
    /// Number of rows written
    written: u64,
}

impl CsvFileWriter {
    /// Create a new CSV writer
    ///
    /// # Arguments
    /// * `path` - Output file path (parent directory must exist)
    /// * `headers` - Column names, fixed for the run
    /// * `write_headers` - Whether to emit a header row
    pub async fn new(path: &Path, headers: Vec<String>, write_headers: bool) -> Result<Self> {
        validate_path(path)?;

        let file = File::create(path)
            .await
            .map_err(|e| ExportError::OutputPath(format!("{}: {}", path.display(), e)))?;
        let writer = BufWriter::with_capacity(1024 * 1024, file);

        debug!(path = %path.display(), columns = headers.len(), "Created CSV writer");

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            headers,
            write_headers,
            written: 0,
        })
    }

    /// Write one line, escaping each value as needed
    async fn write_line(&mut self, values: &[String]) -> Result<()> {
        let line = values
            .iter()
            .map(|v| escape_csv_value(v))
            .collect::<Vec<_>>()
            .join(",");
        self.writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .await
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}

/// Escape a CSV value if necessary
///
/// Values containing a comma, quote, or line break are wrapped in quotes
/// with internal quotes doubled.
fn escape_csv_value(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Check the output path before any database work happens
pub(crate) fn validate_path(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(ExportError::OutputPath(format!(
                "Directory does not exist: {}",
                parent.display()
            ))
            .into());
        }
    }
    Ok(())
}

#[async_trait]
impl RowWriter for CsvFileWriter {
    async fn begin(&mut self) -> Result<()> {
        if self.write_headers {
            let headers = self.headers.clone();
            self.write_line(&headers).await?;
            debug!(columns = headers.len(), "Wrote CSV header row");
        }
        Ok(())
    }

    async fn write_rows(&mut self, rows: &[Vec<String>]) -> Result<usize> {
        for row in rows {
            self.write_line(row).await?;
        }
        self.written += rows.len() as u64;

        // Flush per batch: rows written so far survive a later failure.
        self.writer
            .flush()
            .await
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;

        debug!(batch = rows.len(), total = self.written, "Wrote CSV rows");
        Ok(rows.len())
    }

    async fn finalize(&mut self) -> Result<()> {
        self.writer
            .flush()
            .await
            .map_err(|e| ExportError::WriteFailed(e.to_string()))?;
        debug!(path = %self.path.display(), rows = self.written, "Finalized CSV file");
        Ok(())
    }

    async fn file_size(&self) -> Result<u64> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| ExportError::WriteFailed(format!("metadata: {e}")))?;
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::fs;

    fn headers() -> Vec<String> {
        vec!["COL1".into(), "COL2".into(), "MONGO_ID".into()]
    }

    #[tokio::test]
    async fn test_csv_writer_basic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = CsvFileWriter::new(&path, headers(), true).await.unwrap();

        writer.begin().await.unwrap();
        let rows = vec![
            vec!["a".to_string(), "1".to_string(), "id-1".to_string()],
            vec!["b".to_string(), "2".to_string(), "id-2".to_string()],
        ];
        assert_eq!(writer.write_rows(&rows).await.unwrap(), 2);
        writer.finalize().await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["COL1,COL2,MONGO_ID", "a,1,id-1", "b,2,id-2"]);
    }

    #[tokio::test]
    async fn test_csv_writer_no_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = CsvFileWriter::new(&path, headers(), false).await.unwrap();

        writer.begin().await.unwrap();
        let rows = vec![vec!["a".to_string(), "1".to_string(), "id-1".to_string()]];
        writer.write_rows(&rows).await.unwrap();
        writer.finalize().await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(!content.contains("COL1"));
    }

    #[tokio::test]
    async fn test_csv_writer_escaping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = CsvFileWriter::new(&path, headers(), false).await.unwrap();

        writer.begin().await.unwrap();
        let rows = vec![vec![
            "Hello, world!".to_string(),
            "Quote: \"test\"".to_string(),
            "id-1".to_string(),
        ]];
        writer.write_rows(&rows).await.unwrap();
        writer.finalize().await.unwrap();

        let content = fs::read_to_string(&path).await.unwrap();
        assert!(content.contains("\"Hello, world!\""));
        assert!(content.contains("\"Quote: \"\"test\"\"\""));
    }

    #[tokio::test]
    async fn test_rows_flushed_per_batch() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = CsvFileWriter::new(&path, headers(), false).await.unwrap();

        writer.begin().await.unwrap();
        let rows = vec![vec!["a".to_string(), "1".to_string(), "id-1".to_string()]];
        writer.write_rows(&rows).await.unwrap();

        // Visible on disk before finalize
        let content = fs::read_to_string(&path).await.unwrap();
        assert_eq!(content.lines().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_parent_directory_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("out.csv");
        let err = CsvFileWriter::new(&path, headers(), true).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::MongocsvError::Export(ExportError::OutputPath(_))
        ));
    }

    #[tokio::test]
    async fn test_file_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let mut writer = CsvFileWriter::new(&path, headers(), true).await.unwrap();
        writer.begin().await.unwrap();
        writer.finalize().await.unwrap();
        assert!(writer.file_size().await.unwrap() > 0);
    }

    #[test]
    fn test_escape_csv_value() {
        assert_eq!(escape_csv_value("simple"), "simple");
        assert_eq!(escape_csv_value("with,comma"), "\"with,comma\"");
        assert_eq!(escape_csv_value("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(escape_csv_value("with\nnewline"), "\"with\nnewline\"");
    }
}
