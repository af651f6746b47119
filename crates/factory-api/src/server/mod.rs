use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, Request, State};
use axum::http::header::{HeaderName, HeaderValue};
use axum::http::{Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use contracts::{AgentState, ApiError, ErrorCode, FactoryStatus, WorldSnapshot};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::runtime::FactoryRuntime;

include!("error.rs");
include!("state.rs");
include!("routes/control.rs");
include!("routes/inspect.rs");
include!("routes/stream.rs");
include!("util.rs");

pub async fn serve(addr: SocketAddr, runtime: Arc<FactoryRuntime>) -> Result<(), ServerError> {
    let app = router(AppState { runtime });

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "observer api listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/factory/start", post(start_factory))
        .route("/api/v1/factory/stop", post(stop_factory))
        .route("/api/v1/factory/status", get(get_status))
        .route("/api/v1/factory/state", get(get_state))
        .route("/api/v1/factory/agents/{agent_id}", get(get_agent))
        .route("/api/v1/factory/stream", get(stream_factory))
        .layer(middleware::from_fn(cors_middleware))
        .with_state(state)
}

async fn cors_middleware(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(axum::body::Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        apply_cors_headers(response.headers_mut());
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(response.headers_mut());
    response
}
