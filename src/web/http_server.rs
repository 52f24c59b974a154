//! HTTP server for health checks, metrics and WebSocket signaling

use crate::error::RelayError;
use crate::web::shared::SharedState;
use axum::{
    body::Body,
    extract::{State, WebSocketUpgrade},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use log::{error, info};
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

/// Build the application router
pub fn build_router(state: Arc<SharedState>) -> Router {
    let signaling_path = state.config.signaling.path.clone();
    let cors = cors_layer(state.config.server.cors_origin.as_deref());

    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route(&signaling_path, get(signaling_handler))
        .layer(cors)
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn run_http_server<F>(
    listener: TcpListener,
    state: Arc<SharedState>,
    shutdown: F,
) -> Result<(), RelayError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(
        "Signaling endpoint ws://{}{}",
        addr, state.config.signaling.path
    );

    let app = build_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(e)) => {
            error!("Ignoring invalid CORS origin: {}", e);
            layer.allow_origin(Any)
        }
        None => layer.allow_origin(Any),
    }
}

/// Upgrade to a signaling WebSocket
async fn signaling_handler(ws: WebSocketUpgrade, State(state): State<Arc<SharedState>>) -> Response {
    let max_message_bytes = state.config.signaling.max_message_bytes;
    ws.max_message_size(max_message_bytes)
        .max_frame_size(max_message_bytes)
        .on_upgrade(move |socket| crate::transport::handle_signaling_connection(socket, state))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<SharedState>>) -> Response {
    let payload = json!({
        "status": "healthy",
        "uptime_seconds": state.uptime().as_secs_f64(),
        "connections": state.connection_count(),
        "rooms": state.room_count(),
        "version": env!("CARGO_PKG_VERSION"),
    });
    json_response(StatusCode::OK, payload.to_string())
}

/// Metrics handler (Prometheus format)
async fn metrics_handler(State(state): State<Arc<SharedState>>) -> Response {
    match state.metrics.render() {
        Ok(text) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/plain; version=0.0.4")
            .body(Body::from(text))
            .unwrap_or_else(|_| Response::new(Body::empty())),
        Err(e) => {
            error!("Failed to render metrics: {}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .body(Body::empty())
                .unwrap_or_else(|_| Response::new(Body::empty()))
        }
    }
}

fn json_response(status: StatusCode, body: String) -> Response {
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}
