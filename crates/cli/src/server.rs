//! HTTP surface for the answering pipeline.
//!
//! `POST /api/chat` takes `{"message": "..."}` and returns `{answer, sources}`.
//! Failures return `{"error": "..."}` with a fixed, caller-safe message.

use anyhow::Context;
use assistant_core::error::INVALID_INPUT_MESSAGE;
use assistant_knowledge::RagPipeline;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn app_router(pipeline: Arc<RagPipeline>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat))
        .with_state(pipeline)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub async fn run_server(bind: &str, pipeline: Arc<RagPipeline>) -> anyhow::Result<()> {
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", bind))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app_router(pipeline)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

async fn chat(
    State(pipeline): State<Arc<RagPipeline>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    let message = match body {
        Ok(Json(value)) => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Rejected chat request body");
            None
        }
    };

    let Some(message) = message else {
        return error_response(StatusCode::BAD_REQUEST, INVALID_INPUT_MESSAGE);
    };

    match pipeline.answer(&message).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                tracing::error!(error = %e, "Chat request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            };
            error_response(status, e.public_message())
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
