//! HTTP server for the Withle backend.
//!
//! Booking and auth live on the hosted backend-as-a-service; this server
//! covers the catalog and the memorial proxies.
//!
//! # API Endpoints
//!
//! | Method | Path                 | Description                          |
//! |--------|----------------------|--------------------------------------|
//! | GET    | `/health`            | Health check                         |
//! | GET    | `/api/funeral-homes` | Catalog as a JSON array              |
//! | POST   | `/api/chat`          | Memorial chat proxy                  |
//! | POST   | `/api/tripo`         | 3D avatar generation proxy           |
//! | GET    | `/api/logs`          | SSE stream of pipeline diagnostics   |

use axum::{
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, path::PathBuf, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, LOG_BROADCASTER};
use super::types::{error_response, ChatRequest, ChatResponse, TripoRequest};
use crate::catalog::{load_catalog, LoadOptions, Profile};
use crate::chat;
use crate::error::{ChatError, TripoError};
use crate::models::FuneralHome;
use crate::tripo::TripoClient;

/// Default CSV path, relative to the working directory.
const DEFAULT_DATA_PATH: &str = "data/detail_information.csv";

/// Start the HTTP server
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    // Permissive CORS for development
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/funeral-homes", get(list_funeral_homes))
        .route("/api/chat", post(chat_proxy))
        .route("/api/tripo", post(tripo_proxy))
        .route("/api/logs", get(sse_logs))
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Withle server running on http://localhost:{}", port);
    println!("   GET  /api/funeral-homes - Catalog JSON");
    println!("   POST /api/chat          - Memorial chat proxy");
    println!("   POST /api/tripo         - 3D avatar proxy");
    println!("   GET  /api/logs          - SSE log stream");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "withle",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "funeralHomes": "GET /api/funeral-homes",
            "chat": "POST /api/chat",
            "tripo": "POST /api/tripo",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// Where the catalog CSV lives and which profile maps it.
fn load_options_from_env() -> (PathBuf, LoadOptions) {
    let path = std::env::var("WITHLE_DATA_PATH")
        .unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string());
    let profile = std::env::var("WITHLE_PROFILE")
        .ok()
        .and_then(|name| Profile::from_name(&name))
        .unwrap_or(Profile::Detail);

    (
        PathBuf::from(path),
        LoadOptions { profile, seed: None },
    )
}

/// Catalog endpoint: full reload on every request, no caching.
///
/// A load failure is a 500, not an empty array: clients can tell "no
/// listings" from "load failed".
async fn list_funeral_homes() -> Result<Json<Vec<FuneralHome>>, (StatusCode, Json<Value>)> {
    let (path, options) = load_options_from_env();

    let catalog = load_catalog(&path, &options).map_err(|e| {
        log_error(format!("Catalog load failed: {}", e));
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response("Failed to load data")),
        )
    })?;

    Ok(Json(catalog.homes))
}

/// Memorial chat proxy endpoint
async fn chat_proxy(
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<Value>)> {
    let reply = chat::respond(&request.message, request.system_prompt.as_deref())
        .await
        .map_err(|e| {
            let status = match e {
                ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(error_response(&e.to_string())))
        })?;

    Ok(Json(ChatResponse { reply }))
}

/// 3D generation proxy endpoint
async fn tripo_proxy(
    Json(request): Json<TripoRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let client = TripoClient::from_env().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(error_response(&e.to_string())),
        )
    })?;

    let result = client
        .dispatch(&request.action, &request.payload)
        .await
        .map_err(|e| {
            let status = match e {
                TripoError::UnknownAction(_) | TripoError::InvalidPayload(_) => {
                    StatusCode::BAD_REQUEST
                }
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            log_error(format!("Tripo proxy error: {}", e));
            (status, Json(error_response(&e.to_string())))
        })?;

    Ok(Json(result))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
