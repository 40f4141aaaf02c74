//! Serve command - load the data folder, watch it, and serve it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use super::{load_registry, resolve_data_folder};
use crate::cli::banner;
use crate::config::Settings;
use crate::logging::{Reporter, TracingReporter};
use crate::query::Datasources;
use crate::watcher::HotReloadWatcher;

/// Arguments for the serve command.
#[derive(Debug, Default)]
pub struct ServeArgs {
    pub bind: Option<String>,
    pub https: bool,
    pub data: Option<PathBuf>,
    pub no_watch: bool,
}

impl ServeArgs {
    /// CLI flags take precedence over config file and environment.
    pub fn apply(self, mut config: Settings) -> Settings {
        if let Some(bind) = self.bind {
            config.server.bind = bind;
        }
        if self.https {
            config.server.https = true;
        }
        if let Some(data) = self.data {
            config.data_folder = data;
        }
        if self.no_watch {
            config.file_watch.enabled = false;
        }
        config
    }
}

/// Run the serve command.
pub async fn run(args: ServeArgs, config: Settings) -> anyhow::Result<()> {
    let config = args.apply(config);

    std::fs::create_dir_all(&config.data_folder).with_context(|| {
        format!("Failed to create data folder {}", config.data_folder.display())
    })?;
    let root = resolve_data_folder(&config.data_folder)?;

    let (registry, stats) = load_registry(&root)?;
    crate::log_event!(
        "serve",
        "loaded",
        "{} datasources, {} failed",
        stats.loaded,
        stats.failed
    );

    let ct = CancellationToken::new();

    // A folder that cannot be watched is fatal.
    let watcher_task = if config.file_watch.enabled {
        let reporter: Arc<dyn Reporter> = Arc::new(TracingReporter);
        let watcher = HotReloadWatcher::new(&root, registry.clone(), reporter)?;
        let ct = ct.clone();
        Some(tokio::spawn(async move {
            let result = watcher.run(ct.clone()).await;
            if result.is_err() {
                ct.cancel();
            }
            result
        }))
    } else {
        crate::log_event!("serve", "hot reload disabled");
        None
    };

    tokio::spawn(crate::server::cancel_on_ctrl_c(ct.clone()));

    let datasources = Datasources::new(registry);
    let served = serve(datasources, &config, ct.clone()).await;

    ct.cancel();
    if let Some(task) = watcher_task {
        task.await.context("Watcher task panicked")??;
    }
    served
}

#[cfg(feature = "https-server")]
async fn serve(
    datasources: Datasources,
    config: &Settings,
    ct: CancellationToken,
) -> anyhow::Result<()> {
    if config.server.https {
        banner::print(&format!("https://{}", config.server.bind));
        crate::server::serve_https(datasources, &config.server.bind, &config.server.cert_folder, ct)
            .await
    } else {
        banner::print(&format!("http://{}", config.server.bind));
        crate::server::serve_http(datasources, &config.server.bind, ct).await
    }
}

#[cfg(not(feature = "https-server"))]
async fn serve(
    datasources: Datasources,
    config: &Settings,
    ct: CancellationToken,
) -> anyhow::Result<()> {
    if config.server.https {
        anyhow::bail!("HTTPS support requires the 'https-server' feature");
    }
    banner::print(&format!("http://{}", config.server.bind));
    crate::server::serve_http(datasources, &config.server.bind, ct).await
}
