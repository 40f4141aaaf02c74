//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod init;
pub mod query;
pub mod serve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::datasource::{LoadStats, Registry, load_all};
use crate::logging::{Reporter, TracingReporter};

/// Resolve the data folder to the absolute path used as datasource identity.
pub(crate) fn resolve_data_folder(data_folder: &Path) -> anyhow::Result<PathBuf> {
    data_folder
        .canonicalize()
        .with_context(|| format!("Cannot open data folder {}", data_folder.display()))
}

/// Load every datasource under `root` into a fresh registry.
pub(crate) fn load_registry(root: &Path) -> anyhow::Result<(Arc<Registry>, LoadStats)> {
    let registry = Arc::new(Registry::new());
    let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);
    let stats = load_all(root, &registry, &reporter)
        .with_context(|| format!("Failed to scan {}", root.display()))?;
    Ok((registry, stats))
}
