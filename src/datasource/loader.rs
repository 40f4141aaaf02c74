//! Shape classification and directory ingestion.
//!
//! Turns files on disk into [`Datasource`] entries:
//! - CSV: first row is the header, every cell is text
//! - JSON: decoded as an array of objects first, then as a single object
//!
//! The two JSON attempts are the only way to tell an array file from an
//! object file, since both share the `.json` extension.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use super::error::{DatasourceError, DatasourceResult};
use super::registry::Registry;
use super::types::{Datasource, Format, JsonRecord, Payload, TextRecord};
use crate::logging::Reporter;

/// Load a file, deriving the format from its extension.
pub fn load(path: &Path) -> DatasourceResult<Datasource> {
    match Format::from_path(path) {
        Some(format) => load_as(path, format),
        None => Err(DatasourceError::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: extension_of(path),
        }),
    }
}

/// Load a file with an explicit format.
pub fn load_as(path: &Path, format: Format) -> DatasourceResult<Datasource> {
    let bytes = std::fs::read(path).map_err(|source| DatasourceError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let payload = match format {
        Format::Csv => parse_csv(path, &bytes)?,
        Format::Json => parse_json(path, &bytes)?,
    };

    Ok(Datasource::new(path.to_path_buf(), format, payload))
}

fn parse_csv(path: &Path, bytes: &[u8]) -> DatasourceResult<Payload> {
    let parse_error = |e: csv::Error| DatasourceError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    // Not flexible: a row with a different field count than the header is an error.
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers = reader.headers().map_err(parse_error)?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(parse_error)?;
        let row: TextRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(column, cell)| (column.to_string(), cell.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(Payload::RecordList(rows))
}

fn parse_json(path: &Path, bytes: &[u8]) -> DatasourceResult<Payload> {
    if let Ok(rows) = serde_json::from_slice::<Vec<JsonRecord>>(bytes) {
        return Ok(Payload::TaggedRecordList(rows));
    }

    serde_json::from_slice::<JsonRecord>(bytes)
        .map(Payload::Object)
        .map_err(|e| DatasourceError::Parse {
            path: path.to_path_buf(),
            reason: format!("not a JSON array of objects or a JSON object: {e}"),
        })
}

/// Lower-cased extension without the dot, empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Find every CSV and JSON file under `root`, recursively.
///
/// Symlinks are followed, so a linked file or folder loads the same way the
/// watcher would load it. Files with another non-empty extension are
/// reported and skipped. Extension-less files are skipped silently.
/// Results are sorted by path.
pub fn discover_files(root: &Path, reporter: &dyn Reporter) -> DatasourceResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(DatasourceError::Read {
                    path: root.to_path_buf(),
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("directory walk failed")),
                });
            }
            Err(e) => {
                reporter.warn("loader", &format!("skipping unreadable entry: {e}"));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if Format::from_path(path).is_some() {
            files.push(path.to_path_buf());
        } else {
            let extension = extension_of(path);
            if !extension.is_empty() {
                reporter.warn(
                    "loader",
                    &format!(
                        "skipping file '{}', file extension is '.{extension}'",
                        path.display()
                    ),
                );
            }
        }
    }

    Ok(files)
}

/// Counts from a directory load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub loaded: usize,
    pub failed: usize,
}

/// Scan `root` and put every file that loads into `registry`.
///
/// Per-file failures are reported and skipped; only an unreadable root fails.
pub fn load_all(
    root: &Path,
    registry: &Registry,
    reporter: &Arc<dyn Reporter>,
) -> DatasourceResult<LoadStats> {
    reporter.info("loader", &format!("loading datasources from {}", root.display()));

    let mut stats = LoadStats::default();
    for path in discover_files(root, reporter.as_ref())? {
        match load(&path) {
            Ok(datasource) => {
                reporter.info(
                    "loader",
                    &format!(
                        "loaded '{}' as /{} ({:?}, {} items)",
                        path.display(),
                        datasource.public_name(),
                        datasource.shape(),
                        datasource.payload().len()
                    ),
                );
                registry.put(datasource);
                stats.loaded += 1;
            }
            Err(e) => {
                reporter.error("loader", &format!("could not load datasource: {e}"));
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
