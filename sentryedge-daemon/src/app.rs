//! HTTP surface: ingestion, query, health and CORS handling.
//!
//! | Method    | Path      | Behavior                                              |
//! |-----------|-----------|-------------------------------------------------------|
//! | `POST`    | `/logs`   | Normalize the body and store it. `200 OK`             |
//! | `GET`     | `/logs`   | JSON array of stored rows, newest first               |
//! | `GET`     | `/health` | Store and engine status                               |
//! | `OPTIONS` | any       | `204`, CORS preflight                                 |
//! | other     | any       | `404 Not Found`                                       |
//!
//! Every response carries the CORS headers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Query, Request, State};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use metrics::{counter, gauge, histogram};
use serde_json::json;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info_span, warn};

use sentryedge_core::config::ServerConfig;
use sentryedge_core::error::{IngestError, SentryEdgeError};
use sentryedge_core::metrics::{
    INGEST_REJECTED_TOTAL, INGEST_REQUESTS_TOTAL, LABEL_BACKEND, LABEL_FORMAT,
    NORMALIZE_DURATION_SECONDS, PARSER_MATCHES_TOTAL, STORAGE_ERRORS_TOTAL, STORED_LOGS,
};
use sentryedge_core::pipeline::{HealthStatus, LogStore};
use sentryedge_core::types::LogQuery;
use sentryedge_normalizer::{Normalizer, RawPayload};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub normalizer: Arc<Normalizer>,
    pub store: Arc<dyn LogStore>,
    pub server: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(normalizer: Normalizer, store: Arc<dyn LogStore>, server: ServerConfig) -> Self {
        Self {
            normalizer: Arc::new(normalizer),
            store,
            server: Arc::new(server),
        }
    }
}

/// Error returned by handlers, rendered as a plain-text body.
#[derive(Debug)]
pub struct ApiError(SentryEdgeError);

impl<E: Into<SentryEdgeError>> From<E> for ApiError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.0 {
            SentryEdgeError::Ingest(IngestError::InvalidBase64) => {
                (StatusCode::BAD_REQUEST, IngestError::InvalidBase64.to_string()).into_response()
            }
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error: {other}"),
            )
                .into_response(),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Result<Router> {
    let allow_origin = HeaderValue::from_str(&state.server.cors_allow_origin)
        .map_err(|e| anyhow::anyhow!("invalid server.cors_allow_origin: {}", e))?;
    let body_limit = state.server.max_body_bytes;

    let router = Router::new()
        .route("/logs", get(list_logs).post(ingest))
        .route("/health", get(health))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            allow_origin,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("access-control-allow-headers"),
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                info_span!(
                    "http",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %uuid::Uuid::new_v4(),
                )
            }),
        );

    Ok(router)
}

/// Answer every `OPTIONS` request with an empty `204`.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }
    next.run(request).await
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

/// `POST /logs`
async fn ingest(State(state): State<AppState>, body: Bytes) -> Result<&'static str, ApiError> {
    counter!(INGEST_REQUESTS_TOTAL).increment(1);

    let text = String::from_utf8_lossy(&body);
    let started = Instant::now();
    let result = state
        .normalizer
        .normalize_payload(RawPayload::from_body(&text));
    histogram!(NORMALIZE_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

    let normalized = result.inspect_err(|e| {
        counter!(INGEST_REJECTED_TOTAL).increment(1);
        warn!(error = %e, body_len = body.len(), "rejected ingest payload");
    })?;

    counter!(PARSER_MATCHES_TOTAL, LABEL_FORMAT => normalized.format.clone()).increment(1);

    let row = state
        .store
        .insert(normalized.entry)
        .await
        .inspect_err(|e| {
            counter!(STORAGE_ERRORS_TOTAL, LABEL_BACKEND => state.store.backend_name().to_owned())
                .increment(1);
            error!(error = %e, "failed to store log entry");
        })?;

    gauge!(STORED_LOGS).increment(1.0);
    debug!(
        id = row.id,
        format = %normalized.format,
        service = %row.entry.service,
        level = %row.entry.level,
        "log stored"
    );

    Ok("OK")
}

/// `GET /logs?limit&offset&level&service`
///
/// Non-numeric paging values fall back to the defaults.
async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, ApiError> {
    let query = log_query(&params, &state.server);
    let rows = state.store.list(query).await?;
    Ok(Json(rows).into_response())
}

fn log_query(params: &HashMap<String, String>, server: &ServerConfig) -> LogQuery {
    let number = |key: &str| params.get(key).and_then(|v| v.trim().parse::<usize>().ok());
    let filter = |key: &str| {
        params
            .get(key)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    };

    LogQuery {
        service: filter("service"),
        level: filter("level"),
        limit: number("limit")
            .unwrap_or(server.default_page_size)
            .min(server.max_page_size),
        offset: number("offset").unwrap_or(0),
    }
}

/// `GET /health`
async fn health(State(state): State<AppState>) -> Response {
    let (status, stored) = match state.store.count().await {
        Ok(count) => (HealthStatus::Healthy, Some(count)),
        Err(e) => (HealthStatus::Unhealthy(e.to_string()), None),
    };
    let code = if status.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    let mut body = serde_json::to_value(&status).unwrap_or_else(|_| json!({}));
    if let Some(obj) = body.as_object_mut() {
        obj.insert("backend".to_owned(), json!(state.store.backend_name()));
        obj.insert("stored_logs".to_owned(), json!(stored));
        obj.insert(
            "formats".to_owned(),
            json!(state.normalizer.registry().registered_formats()),
        );
    }

    (code, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn log_query_defaults() {
        let query = log_query(&params(&[]), &ServerConfig::default());
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
        assert!(query.service.is_none());
    }

    #[test]
    fn log_query_non_numeric_falls_back() {
        let query = log_query(
            &params(&[("limit", "abc"), ("offset", "-3")]),
            &ServerConfig::default(),
        );
        assert_eq!(query.limit, 20);
        assert_eq!(query.offset, 0);
    }

    #[test]
    fn log_query_limit_clamped() {
        let query = log_query(&params(&[("limit", "50000")]), &ServerConfig::default());
        assert_eq!(query.limit, 1000);
    }

    #[test]
    fn log_query_blank_filters_ignored() {
        let query = log_query(
            &params(&[("service", "  "), ("level", "ERROR")]),
            &ServerConfig::default(),
        );
        assert!(query.service.is_none());
        assert_eq!(query.level.as_deref(), Some("ERROR"));
    }

    #[test]
    fn invalid_base64_renders_400() {
        let response = ApiError::from(IngestError::InvalidBase64).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
