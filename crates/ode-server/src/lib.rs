//! ode-server: HTTP front end of the optical drive emulator.
//!
//! This crate ties ode-core and ode-disc into a running server. It provides:
//!
//! - The per-drive [`session::Session`] and its stream slot
//! - The [`stream::SectorStream`] controller behind `/data`
//! - The TOC responder behind `/toc_bin`
//! - A games directory [`catalog::Catalog`] for numeric selections
//! - Graceful shutdown via signal handling

pub mod catalog;
pub mod context;
pub mod error;
pub mod range;
pub mod responder;
pub mod router;
pub mod routes;
pub mod session;
pub mod stream;

use std::net::SocketAddr;

use axum::Router;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use tokio_util::sync::CancellationToken;

use ode_core::config::Config;

use crate::context::AppContext;

/// Start the odestream server.
///
/// Scans the games directory, pre-loads the initial image if one is
/// configured, and serves HTTP until a shutdown signal arrives.
pub async fn start(config: Config) -> ode_core::Result<()> {
    for warning in config.validate() {
        tracing::warn!("Config warning: {warning}");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .map_err(|e| ode_core::Error::Internal(format!("Invalid server address: {e}")))?;

    let ctx = tokio::task::spawn_blocking(move || AppContext::from_config(config))
        .await
        .map_err(|e| ode_core::Error::Internal(format!("Startup task failed: {e}")))?;

    let app = router::build_router(ctx);

    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ode_core::Error::Internal(format!("Failed to bind to {addr}: {e}")))?;

    run_accept_loop(listener, app, CancellationToken::new()).await;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Accept connections until shutdown, serving each over HTTP/1.1.
///
/// Drive firmware speaks plain HTTP/1.1 with chunked transfer coding, so
/// connections go straight to hyper's http1 server.
pub async fn run_accept_loop(
    listener: tokio::net::TcpListener,
    app: Router,
    cancel: CancellationToken,
) {
    let shutdown = shutdown_signal(cancel);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, peer)) => {
                        tracing::trace!(%peer, "Accepted connection");
                        tokio::spawn(handle_connection(stream, app.clone()));
                    }
                    Err(e) => {
                        tracing::debug!("Accept error: {e}");
                    }
                }
            }
            _ = &mut shutdown => break,
        }
    }
}

async fn handle_connection(stream: tokio::net::TcpStream, app: Router) {
    let io = TokioIo::new(stream);
    let hyper_service = TowerToHyperService::new(app.into_service());
    if let Err(e) = hyper::server::conn::http1::Builder::new()
        .serve_connection(io, hyper_service)
        .await
    {
        // Drives drop the connection mid-stream when they seek.
        tracing::debug!("Connection closed with error: {e}");
    }
}

/// Wait for a shutdown signal (SIGINT or SIGTERM) or cancellation.
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = cancel.cancelled() => {}
    }

    tracing::info!("Shutdown signal received");
}
