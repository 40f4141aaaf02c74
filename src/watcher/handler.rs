//! Applies change events to the registry.

use std::path::Path;
use std::sync::Arc;

use super::event::{ChangeEvent, ChangeKind};
use crate::datasource::loader::extension_of;
use crate::datasource::{Format, LoadStats, Registry, load, load_all};
use crate::logging::Reporter;

/// What applying one event did to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The file loaded and its entry was put; `replaced` when one already existed.
    Loaded { replaced: bool },
    /// A directory appeared and every data file under it was loaded.
    Scanned(LoadStats),
    /// The file failed to load; any existing entry was dropped.
    Evicted { existed: bool },
    /// The path is gone; `count` entries at or under it were dropped.
    Removed { count: usize },
    /// Unsupported extension, reported and skipped.
    Skipped,
    /// No extension at all (lock files, directory metadata), nothing to do.
    Ignored,
}

/// Turns [`ChangeEvent`]s into registry writes.
///
/// A file that fails to load is evicted rather than left serving its last
/// good contents, so a broken file never looks current. Directories are
/// handled as a whole: one that goes away takes every entry under it, one
/// that appears is scanned.
#[derive(Clone)]
pub struct ReloadHandler {
    registry: Arc<Registry>,
    reporter: Arc<dyn Reporter>,
}

impl ReloadHandler {
    pub fn new(registry: Arc<Registry>, reporter: Arc<dyn Reporter>) -> Self {
        Self { registry, reporter }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Apply one event. Blocks on file IO for created/changed paths.
    pub fn apply(&self, event: &ChangeEvent) -> ApplyOutcome {
        let path = event.path.as_path();

        match event.kind {
            ChangeKind::Removed | ChangeKind::RenamedAway => {
                let count = self.registry.remove_prefix(path).len();
                if count > 0 || Format::from_path(path).is_some() {
                    self.reporter.info(
                        "watcher",
                        &format!("file removed '{}' ({count} datasources)", path.display()),
                    );
                    return ApplyOutcome::Removed { count };
                }
                self.unsupported(event)
            }

            ChangeKind::Created if path.is_dir() => self.scan(path),
            ChangeKind::Changed if path.is_dir() => ApplyOutcome::Ignored,

            ChangeKind::Created | ChangeKind::Changed => {
                if Format::from_path(path).is_none() {
                    return self.unsupported(event);
                }
                self.reload(path)
            }
        }
    }

    fn reload(&self, path: &Path) -> ApplyOutcome {
        match load(path) {
            Ok(datasource) => {
                let name = datasource.public_name().to_string();
                let replaced = self.registry.put(datasource).is_some();
                let verb = if replaced { "reloaded" } else { "added" };
                self.reporter
                    .info("watcher", &format!("{verb} '{}' as /{name}", path.display()));
                ApplyOutcome::Loaded { replaced }
            }
            Err(e) => {
                let existed = self.registry.remove(path).is_some();
                let suffix = if existed { ", previous version dropped" } else { "" };
                self.reporter
                    .error("watcher", &format!("could not reload datasource: {e}{suffix}"));
                ApplyOutcome::Evicted { existed }
            }
        }
    }

    fn scan(&self, dir: &Path) -> ApplyOutcome {
        match load_all(dir, &self.registry, &self.reporter) {
            Ok(stats) => ApplyOutcome::Scanned(stats),
            Err(e) => {
                self.reporter
                    .error("watcher", &format!("could not scan new directory: {e}"));
                ApplyOutcome::Scanned(LoadStats::default())
            }
        }
    }

    fn unsupported(&self, event: &ChangeEvent) -> ApplyOutcome {
        let path = event.path.as_path();
        let extension = extension_of(path);
        if extension.is_empty() {
            self.reporter.debug(
                "watcher",
                &format!("ignored {:?} {}", event.kind, path.display()),
            );
            return ApplyOutcome::Ignored;
        }
        self.reporter.info(
            "watcher",
            &format!(
                "skipping file '{}', file extension is '.{extension}'",
                path.display()
            ),
        );
        ApplyOutcome::Skipped
    }
}
