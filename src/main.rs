//! PGP Mailto Server
//!
//! Serves the contact form endpoint over HTTP. Every path is handled the same
//! way: `OPTIONS` for preflight, `POST` for submissions.
//!
//! # Environment
//!
//! - `PUBLIC_KEY_PATH`: armored recipient key (default `./recipient-pub-key.asc`)
//! - `PORT`: listen port (default 5000)
//! - `DEFAULT_RECIPIENT`: recipient used when a submission names none
//! - `ENCRYPTION_TIMEOUT_SECS`, `MAX_BODY_BYTES`, `EXPOSE_ERROR_DETAILS`
//! - `LOG_LEVEL`: `trace`, `debug`, `info` (default), `warn` or `error`

use anyhow::Result;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{body::Incoming, Request, Response};
use hyper_util::rt::TokioIo;
use pgp_mailto::config::ContactConfig;
use pgp_mailto::handler::ContactHandler;
use pgp_mailto::http::handle_http_request;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

struct AppState {
    handler: ContactHandler,
}

async fn serve(
    state: Arc<AppState>,
    req: Request<Incoming>,
) -> std::result::Result<Response<Full<Bytes>>, Infallible> {
    Ok(handle_http_request(&state.handler, req).await)
}

/// Accepts contact form connections until Ctrl-C
async fn run_http_server(state: Arc<AppState>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(
        address = %addr,
        key_path = %state.handler.config().public_key_path.display(),
        "Contact endpoint listening"
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let (stream, remote_addr) = tokio::select! {
            accepted = listener.accept() => accepted?,
            _ = &mut shutdown => {
                info!("Shutdown requested, no longer accepting submissions");
                return Ok(());
            }
        };
        let state = Arc::clone(&state);

        tokio::spawn(async move {
            let service = service_fn(move |req| serve(Arc::clone(&state), req));
            let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);

            if let Err(e) = conn.await {
                warn!(remote_addr = %remote_addr, error = %e, "Contact connection closed with error");
            }
        });
    }
}

fn log_level() -> Level {
    std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|l| l.parse().ok())
        .unwrap_or(Level::INFO)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level())
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting PGP mailto server...");

    let config = ContactConfig::from_env();
    if !config.public_key_path.exists() {
        // Requests fail with KeyNotFound until the file appears.
        warn!(path = %config.public_key_path.display(), "Public key file not found at startup");
    }
    if config.default_recipient.is_none() {
        info!("No DEFAULT_RECIPIENT set; submissions must name a recipient");
    }

    let port = config.port;
    let state = Arc::new(AppState {
        handler: ContactHandler::new(config),
    });

    run_http_server(state, port).await
}
