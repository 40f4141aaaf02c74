//! Hot-reload watcher for the data folder.
//!
//! One `notify::RecommendedWatcher` watches the folder recursively and
//! forwards raw events into a channel. A single task drains the channel
//! and applies events one at a time, in arrival order, so events for the
//! same file are never reordered.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Event, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::error::WatchError;
use super::event::ChangeEvent;
use super::handler::ReloadHandler;
use crate::datasource::Registry;
use crate::logging::Reporter;

/// Capacity of the channel between notify's thread and the watcher task.
const EVENT_BUFFER: usize = 100;

/// Keeps the registry in step with the data folder.
pub struct HotReloadWatcher {
    /// Canonical data folder being watched.
    root: PathBuf,
    /// Applies events to the registry.
    handler: ReloadHandler,
    reporter: Arc<dyn Reporter>,
    /// Channel for receiving file events.
    event_rx: mpsc::Receiver<notify::Result<Event>>,
    /// The underlying file watcher; dropping it ends the subscription.
    _watcher: notify::RecommendedWatcher,
}

impl HotReloadWatcher {
    /// Subscribe to changes under `root`.
    ///
    /// Fails with [`WatchError::Subscription`] when the folder cannot be
    /// resolved or watched.
    pub fn new(
        root: &Path,
        registry: Arc<Registry>,
        reporter: Arc<dyn Reporter>,
    ) -> Result<Self, WatchError> {
        let root = root
            .canonicalize()
            .map_err(|e| WatchError::subscription(root, e))?;

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })
        .map_err(|e| WatchError::subscription(&root, e))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::subscription(&root, e))?;

        reporter.info("watcher", &format!("watching '{}'", root.display()));

        Ok(Self {
            root,
            handler: ReloadHandler::new(registry, reporter.clone()),
            reporter,
            event_rx: rx,
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Process events until `shutdown` is cancelled.
    ///
    /// Errors for individual files are reported and skipped. Returns an
    /// error only if the event source goes away.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<(), WatchError> {
        self.reporter.info("watcher", "started");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    self.reporter.info("watcher", "stopped");
                    return Ok(());
                }

                received = self.event_rx.recv() => match received {
                    Some(Ok(event)) => {
                        for change in ChangeEvent::from_notify(event) {
                            self.dispatch(change).await;
                        }
                    }
                    Some(Err(e)) => {
                        self.reporter.error("watcher", &format!("file watch error: {e}"));
                    }
                    None => return Err(WatchError::ChannelClosed),
                }
            }
        }
    }

    /// Apply one event off the async executor, waiting for it to finish
    /// before the next one starts.
    async fn dispatch(&self, change: ChangeEvent) {
        self.reporter.debug(
            "watcher",
            &format!("event {:?} {}", change.kind, change.path.display()),
        );

        let handler = self.handler.clone();
        match tokio::task::spawn_blocking(move || handler.apply(&change)).await {
            Ok(outcome) => self
                .reporter
                .debug("watcher", &format!("applied {outcome:?}")),
            Err(e) => self
                .reporter
                .error("watcher", &format!("event handler failed: {e}")),
        }
    }
}
