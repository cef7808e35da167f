//! Post-export file copy
//!
//! Copies the finished CSV file into a destination folder (a network share,
//! a pickup directory), creating the folder if absent and preserving file
//! metadata: permission bits travel with the byte copy, the modified time
//! is carried over explicitly.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{ExportError, Result};

/// Copy a file into a destination directory
///
/// # Arguments
/// * `source` - Source file path, including the filename
/// * `dest_dir` - Destination folder; created (recursively) if absent
///
/// # Returns
/// * `Result<PathBuf>` - Path of the copied file
pub async fn copy_to_dir(source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    if source.as_os_str().is_empty() || dest_dir.as_os_str().is_empty() {
        return Err(ExportError::InvalidParameters("blank copy path".into()).into());
    }
    let file_name = source
        .file_name()
        .ok_or_else(|| ExportError::InvalidParameters(format!(
            "source has no filename: {}",
            source.display()
        )))?;

    info!(source = %source.display(), destination = %dest_dir.display(), "Copying file");

    tokio::fs::create_dir_all(dest_dir).await?;
    let dest = dest_dir.join(file_name);
    tokio::fs::copy(source, &dest).await?;

    // fs::copy preserves permissions but not timestamps
    let modified = tokio::fs::metadata(source).await?.modified()?;
    let dest_file = std::fs::OpenOptions::new().write(true).open(&dest)?;
    dest_file.set_modified(modified)?;

    info!(dest = %dest.display(), "Finished copying file");
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::fs;

    #[tokio::test]
    async fn test_copy_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("extract.csv");
        fs::write(&source, "COL1,MONGO_ID\na,id-1\n").await.unwrap();

        let dest_dir = dir.path().join("pickup").join("csv");
        let dest = copy_to_dir(&source, &dest_dir).await.unwrap();

        assert_eq!(dest, dest_dir.join("extract.csv"));
        let copied = fs::read(&dest).await.unwrap();
        let original = fs::read(&source).await.unwrap();
        assert_eq!(copied, original);
    }

    #[tokio::test]
    async fn test_copy_preserves_modified_time() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("extract.csv");
        fs::write(&source, "data\n").await.unwrap();

        let dest_dir = dir.path().join("out");
        let dest = copy_to_dir(&source, &dest_dir).await.unwrap();

        let src_mtime = fs::metadata(&source).await.unwrap().modified().unwrap();
        let dest_mtime = fs::metadata(&dest).await.unwrap().modified().unwrap();
        assert_eq!(src_mtime, dest_mtime);
    }

    #[tokio::test]
    async fn test_copy_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("extract.csv");
        fs::write(&source, "new contents\n").await.unwrap();

        let dest_dir = dir.path().join("out");
        fs::create_dir_all(&dest_dir).await.unwrap();
        fs::write(dest_dir.join("extract.csv"), "old contents\n")
            .await
            .unwrap();

        let dest = copy_to_dir(&source, &dest_dir).await.unwrap();
        assert_eq!(fs::read_to_string(&dest).await.unwrap(), "new contents\n");
    }

    #[tokio::test]
    async fn test_blank_paths_rejected() {
        let err = copy_to_dir(Path::new(""), Path::new("/tmp")).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::MongocsvError::Export(ExportError::InvalidParameters(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_to_dir(&dir.path().join("nope.csv"), &dir.path().join("out"))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::MongocsvError::Io(_)));
    }
}
