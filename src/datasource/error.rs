//! Error types for loading and querying datasources.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading or serving a single datasource.
///
/// A missing datasource or record is not an error; lookups return `Option`.
#[derive(Error, Debug)]
pub enum DatasourceError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Skipping {path}, file extension is '{extension}'")]
    UnsupportedExtension { path: PathBuf, extension: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DatasourceResult<T> = Result<T, DatasourceError>;
