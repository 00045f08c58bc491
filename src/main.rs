// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, net::SocketAddr, sync::Arc, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tracing::{info, warn};

use portfolio_comments::{
    api::{cors_layer, router},
    auth::{HttpKeySetSource, KeyResolver, TokenVerifier},
    config::AppConfig,
    logging::init_tracing,
    state::AppState,
    storage::{CommentStore, FileCommentStore, InMemoryCommentStore, StoragePaths},
};

/// Time allowed for in-flight requests after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.server.log_format);

    let store: Arc<dyn CommentStore> = match &config.server.data_dir {
        Some(dir) => Arc::new(FileCommentStore::open(StoragePaths::new(dir))?),
        None => {
            warn!("DATA_DIR not set, comments are kept in memory only");
            Arc::new(InMemoryCommentStore::new())
        }
    };

    let source = HttpKeySetSource::new(config.auth.jwks_url.clone(), config.auth.fetch_timeout)?;
    let resolver = Arc::new(KeyResolver::new(Arc::new(source)));
    match resolver.refresh().await {
        Ok(count) => info!(keys = count, jwks_url = %config.auth.jwks_url, "Signing keys loaded"),
        Err(e) => warn!(error = %e, jwks_url = %config.auth.jwks_url, "Signing key warm-up failed, will retry on demand"),
    }

    let verifier = Arc::new(TokenVerifier::new(resolver, config.auth.clone()));
    let state = AppState::new(store, verifier);
    let app = router(state, cors_layer(config.server.cors_origin.as_deref())?);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let handle: Handle<SocketAddr> = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    match &config.server.tls {
        Some(tls) => {
            // Install the ring crypto provider for rustls (must be done before any TLS operations)
            if rustls::crypto::ring::default_provider().install_default().is_err() {
                warn!("rustls crypto provider already installed");
            }
            let tls_config = RustlsConfig::from_pem_file(&tls.cert, &tls.key).await?;

            info!(%addr, "Portfolio comments listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!(%addr, "Portfolio comments listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_on_signal(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
