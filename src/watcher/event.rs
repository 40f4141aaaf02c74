//! Filesystem change events, reduced to what the registry cares about.

use std::path::{Path, PathBuf};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A file appeared, including by being renamed into place.
    Created,
    /// A file's content changed.
    Changed,
    /// A file was deleted.
    Removed,
    /// A file was renamed to somewhere else.
    RenamedAway,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn created(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Created, path)
    }

    pub fn changed(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Changed, path)
    }

    pub fn removed(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::Removed, path)
    }

    pub fn renamed_away(path: impl Into<PathBuf>) -> Self {
        Self::new(ChangeKind::RenamedAway, path)
    }

    /// Translate a notify event, in path order.
    ///
    /// Metadata and access events produce nothing. Where the backend cannot
    /// say what happened (ambiguous renames, `Any`), the path's existence
    /// decides between appeared and gone.
    pub fn from_notify(event: Event) -> Vec<ChangeEvent> {
        let Event { kind, paths, .. } = event;

        match kind {
            EventKind::Create(_) => paths.into_iter().map(Self::created).collect(),
            EventKind::Remove(_) => paths.into_iter().map(Self::removed).collect(),

            EventKind::Modify(ModifyKind::Name(mode)) => match mode {
                RenameMode::From => paths.into_iter().map(Self::renamed_away).collect(),
                RenameMode::To => paths.into_iter().map(Self::created).collect(),
                RenameMode::Both => {
                    let mut paths = paths.into_iter();
                    let mut events = Vec::with_capacity(2);
                    if let Some(from) = paths.next() {
                        events.push(Self::renamed_away(from));
                    }
                    events.extend(paths.map(Self::created));
                    events
                }
                RenameMode::Any | RenameMode::Other => paths
                    .into_iter()
                    .map(|p| by_existence(p, ChangeKind::Created, ChangeKind::RenamedAway))
                    .collect(),
            },

            EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
            EventKind::Modify(_) => paths.into_iter().map(Self::changed).collect(),

            EventKind::Any => paths
                .into_iter()
                .map(|p| by_existence(p, ChangeKind::Changed, ChangeKind::Removed))
                .collect(),

            EventKind::Access(_) | EventKind::Other => Vec::new(),
        }
    }
}

fn by_existence(path: PathBuf, present: ChangeKind, absent: ChangeKind) -> ChangeEvent {
    let kind = if exists(&path) { present } else { absent };
    ChangeEvent::new(kind, path)
}

fn exists(path: &Path) -> bool {
    path.try_exists().unwrap_or(false)
}
