//! Hot reload of the data folder.
//!
//! # Architecture
//!
//! ```text
//! notify::RecommendedWatcher (recursive, data folder)
//!         │  raw events
//!         ▼
//! HotReloadWatcher::run ── ChangeEvent::from_notify
//!         │  one event at a time, arrival order
//!         ▼
//! ReloadHandler::apply ── load / put / remove ──> Registry
//! ```

mod error;
mod event;
mod handler;
mod hot_reload;

pub use error::WatchError;
pub use event::{ChangeEvent, ChangeKind};
pub use handler::{ApplyOutcome, ReloadHandler};
pub use hot_reload::HotReloadWatcher;
