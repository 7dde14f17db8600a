use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::data::AppState;
use crate::server::api::{self, ApiError, ClassifyQuery, FilterQuery};

pub async fn health(State(state): State<Arc<AppState>>) -> Response {
    Json(api::health_payload(&state)).into_response()
}

pub async fn locations(State(state): State<Arc<AppState>>) -> Response {
    Json(&state.industrial).into_response()
}

pub async fn aphis_reports(State(state): State<Arc<AppState>>) -> Response {
    Json(&state.research).into_response()
}

pub async fn inspection_reports(State(state): State<Arc<AppState>>) -> Response {
    Json(&state.license).into_response()
}

pub async fn filter(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Response {
    match api::filter_payload(&state, &query) {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct RegionsQuery {
    pub country: Option<String>,
}

pub async fn regions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RegionsQuery>,
) -> Response {
    match api::regions_payload(&state, query.country.as_deref()) {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

pub async fn export_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FilterQuery>,
) -> Response {
    match api::export_payload(&state, &query) {
        Ok(export) => {
            tracing::info!(
                filename = %export.filename,
                rows = export.counts.total,
                "csv export"
            );
            let disposition = format!("attachment; filename=\"{}\"", export.filename);
            (
                [
                    (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                export.body,
            )
                .into_response()
        }
        Err(err) => err.into_response(),
    }
}

pub async fn classify(Query(query): Query<ClassifyQuery>) -> Response {
    match api::classify_payload(&query) {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => ApiError::from(err).into_response(),
    }
}

pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Route not found")
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Query(_) => error_response(StatusCode::BAD_REQUEST, &self.to_string()),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "request failed");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &self.to_string())
            }
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "status": "error",
            "message": message,
        })),
    )
        .into_response()
}
