//! Serve a folder of CSV and JSON files as a read-only JSON API.
//!
//! Every file in the data folder becomes a datasource reachable by a public
//! name derived from its file name. The folder is watched and datasources
//! are added, reloaded and dropped as files change.

pub mod config;
pub mod datasource;
pub mod logging;
pub mod query;
pub mod watcher;

#[cfg(feature = "http-server")]
pub mod cli;
#[cfg(feature = "http-server")]
pub mod server;

pub use config::Settings;
pub use datasource::{Datasource, DatasourceError, Format, Payload, Record, Registry, ShapeKind};
pub use query::{DatasourceSummary, Datasources};
pub use watcher::{HotReloadWatcher, ReloadHandler, WatchError};
