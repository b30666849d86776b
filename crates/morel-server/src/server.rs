//! Accept loop

use crate::state::ServerState;
use crate::{routes, Result};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serve the API on the configured address until the task is dropped.
///
/// Creates the asset directory if it is missing, then accepts connections
/// forever; each one is served on its own task.
pub async fn run(state: Arc<ServerState>) -> Result<()> {
    tokio::fs::create_dir_all(&state.config.asset_dir).await?;

    let addr: SocketAddr = state.config.bind_address.parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("listening on http://{addr}");

    loop {
        let (stream, remote_addr) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!("accept failed: {err}");
                continue;
            }
        };
        tracing::debug!("connection from {remote_addr}");

        let state = state.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let service = service_fn(move |req| {
                let state = state.clone();
                async move { routes::handle_request(state, req).await }
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                tracing::debug!("connection ended: {err}");
            }
        });
    }
}
