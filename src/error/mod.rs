//! Error handling module for mongocsv.
//!
//! This module provides typed errors for the export pipeline, replacing the
//! broad catch-everything style with distinct kinds:
//! - Configuration/validation errors that abort before any I/O
//! - Connection (transport) errors from the MongoDB driver
//! - Export errors from the paginated read/write loop
//!
//! Per-row timestamp conversion problems are deliberately NOT errors: they
//! are logged and the affected field falls back to its UTC rendering.

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, ConnectionError, ExportError, MongocsvError, Result};
