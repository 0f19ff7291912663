//! HTTP surface of the request inspector.
//!
//! Every path and method lands on one handler. It copies the live request into
//! an `inspector_core::RequestContext`, lets the core capture and render it,
//! and answers `200 OK` with the page. Nothing is shared between requests
//! except the immutable `AppState`.

pub mod client;
pub mod config;

use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{Method, Request},
    response::Html,
    routing::any,
    Router,
};
use inspector_core::{render, DecodedBody, InspectedRequest, RenderOptions, RequestContext};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use config::Config;

/// Per-server settings handed to every request.
#[derive(Debug, Clone)]
struct AppState {
    max_body_bytes: usize,
    render: RenderOptions,
}

pub fn app(config: &Config) -> Router {
    let state = AppState {
        max_body_bytes: config.max_body_bytes,
        render: RenderOptions {
            display_errors: config.display_errors,
        },
    };
    Router::new()
        .route("/", any(inspect))
        .route("/{*path}", any(inspect))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until Ctrl+C. The client address reaches the handler through
/// `ConnectInfo`.
pub async fn run(listener: TcpListener, config: Config) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server starting");

    let service = app(&config).into_make_service_with_connect_info::<SocketAddr>();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn inspect(State(state): State<AppState>, request: Request<Body>) -> Html<String> {
    // Absent when the router is driven without a socket, e.g. in tests.
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();

    let (parts, body) = request.into_parts();
    let target = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_default();

    let mut ctx = RequestContext::new(parts.method.as_str(), &target).remote_addr(&remote_addr);
    for (name, value) in parts.headers.iter() {
        ctx = ctx.header(name.as_str(), &String::from_utf8_lossy(value.as_bytes()));
    }

    if parts.method == Method::POST {
        ctx = match axum::body::to_bytes(body, state.max_body_bytes).await {
            Ok(bytes) => ctx.body(bytes.to_vec()),
            Err(e) => {
                tracing::warn!(
                    remote_addr = %remote_addr,
                    target = %target,
                    limit = state.max_body_bytes,
                    error = %e,
                    "Failed to read request body"
                );
                ctx.unreadable_body(e.to_string())
            }
        };
    }

    let inspected = InspectedRequest::capture(ctx);
    let page = render(&inspected, &state.render);

    tracing::info!(
        remote_addr = %inspected.remote_addr(),
        method = %inspected.method(),
        target = %inspected.request_line(),
        content_type = inspected.content_type().unwrap_or("-"),
        body = ?inspected.body().map(DecodedBody::kind),
        status = 200,
        "Request inspected"
    );

    Html(page)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
