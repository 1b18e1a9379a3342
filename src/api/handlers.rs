use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::Json,
    Json as RequestJson,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::CombineError;
use crate::logic::CombinationCache;
use crate::model::{CombinationRecord, CombineRequest, CombineResponse, Element};
use crate::seed;
use crate::store::traits::Store;

pub type AppState<S> = Arc<CombinationCache<S>>;

pub const MISSING_ELEMENTS_MESSAGE: &str = "Missing \"first\" or \"second\" element in request body.";

const DEFAULT_LIST_LIMIT: usize = 100;
const MAX_LIST_LIMIT: usize = 1000;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub cached_combinations: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message)))
}

fn internal_error(message: &str) -> ApiError {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(message)))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn health_check<S: Store>(
    State(cache): State<AppState<S>>,
) -> (StatusCode, Json<HealthResponse>) {
    let timestamp = chrono::Utc::now().to_rfc3339();

    match cache.store().count_combinations().await {
        Ok(count) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                timestamp,
                cached_combinations: Some(count),
            }),
        ),
        Err(e) => {
            log::error!("Health check could not reach the store: {:#}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    timestamp,
                    cached_combinations: None,
                }),
            )
        }
    }
}

/// `POST /` and `POST /combine`
///
/// Body rejections (wrong field types, malformed JSON, missing content type)
/// are answered with the same JSON error shape as missing fields.
pub async fn combine<S: Store>(
    State(cache): State<AppState<S>>,
    payload: Result<RequestJson<CombineRequest>, JsonRejection>,
) -> Result<Json<CombineResponse>, ApiError> {
    let RequestJson(request) = payload.map_err(|rejection| {
        log::debug!("Rejected combine body: {}", rejection.body_text());
        match rejection {
            JsonRejection::JsonDataError(_) => bad_request(MISSING_ELEMENTS_MESSAGE),
            other => bad_request(&other.body_text()),
        }
    })?;

    let (Some(first), Some(second)) = (non_blank(request.first), non_blank(request.second)) else {
        return Err(bad_request(MISSING_ELEMENTS_MESSAGE));
    };

    match cache.resolve(&first, &second).await {
        Ok(result) => Ok(Json(CombineResponse { result })),
        Err(CombineError::InvalidInput(message)) => Err(bad_request(&message)),
    }
}

/// `GET /` resolves the fixed demo pairings.
pub async fn demo_combinations<S: Store>(
    State(cache): State<AppState<S>>,
) -> Json<BTreeMap<String, CombineResponse>> {
    Json(seed::resolve_demo_pairs(&cache).await)
}

pub async fn list_elements() -> Json<ListResponse<Element>> {
    let items = seed::starter_elements();
    let total = items.len();
    Json(ListResponse { items, total })
}

pub async fn list_combinations<S: Store>(
    State(cache): State<AppState<S>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse<CombinationRecord>>, ApiError> {
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT).min(MAX_LIST_LIMIT);
    let store = cache.store();

    let items = store
        .list_combinations(Some(limit))
        .await
        .map_err(|e| internal_error(&format!("Failed to list combinations: {}", e)))?;
    let total = store
        .count_combinations()
        .await
        .map_err(|e| internal_error(&format!("Failed to count combinations: {}", e)))?;

    Ok(Json(ListResponse {
        items,
        total: total as usize,
    }))
}
