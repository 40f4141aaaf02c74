//! HTTP and HTTPS listeners serving the registry.
//!
//! Both listeners stop when the shared cancellation token fires, which
//! also stops the hot-reload watcher.

mod routes;
#[cfg(feature = "https-server")]
pub mod tls;

pub use routes::router;

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::query::Datasources;

/// Serve plain HTTP on `bind` until `shutdown` is cancelled.
pub async fn serve_http(
    datasources: Datasources,
    bind: &str,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;

    crate::log_event!("http", "listening", "http://{}", listener.local_addr()?);

    axum::serve(listener, router(datasources))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("HTTP server failed")?;

    crate::log_event!("http", "stopped");
    Ok(())
}

/// Serve HTTPS on `bind` with the certificate pair in `cert_folder`,
/// generating one on first use.
#[cfg(feature = "https-server")]
pub async fn serve_https(
    datasources: Datasources,
    bind: &str,
    cert_folder: &std::path::Path,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;
    use std::net::SocketAddr;

    let pair = tls::get_or_create_certificate(cert_folder, bind)
        .await
        .context("Failed to get or create TLS certificate")?;
    if pair.generated {
        crate::log_event!(
            "https",
            "certificate",
            "self-signed certificate written to {}",
            cert_folder.display()
        );
    }

    let tls_config = RustlsConfig::from_pem(pair.cert_pem, pair.key_pem)
        .await
        .context("Failed to configure TLS")?;

    let addr: SocketAddr = bind.parse().context("Failed to parse bind address")?;

    crate::log_event!("https", "listening", "https://{addr}");

    let server =
        axum_server::bind_rustls(addr, tls_config).serve(router(datasources).into_make_service());

    tokio::select! {
        result = server => {
            result.context("HTTPS server failed")?;
        }
        _ = shutdown.cancelled() => {}
    }

    crate::log_event!("https", "stopped");
    Ok(())
}

/// Resolves once Ctrl+C is received, then cancels `token`.
pub async fn cancel_on_ctrl_c(token: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("[server] failed to listen for ctrl+c: {e}");
        return;
    }
    crate::log_event!("server", "shutdown", "received ctrl+c");
    token.cancel();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::Registry;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_serve_http_stops_on_cancel() {
        let token = CancellationToken::new();
        let datasources = Datasources::new(Arc::new(Registry::new()));
        let server = tokio::spawn(serve_http(datasources, "127.0.0.1:0", token.clone()));

        tokio::time::sleep(Duration::from_millis(50)).await;
        token.cancel();

        let result = tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server did not stop")
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_serve_http_reports_bad_bind() {
        let datasources = Datasources::new(Arc::new(Registry::new()));
        let result = serve_http(datasources, "not an address", CancellationToken::new()).await;
        assert!(result.is_err());
    }
}
