use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::api::AppState;
use crate::models::*;
use crate::services::{AbortError, ScheduleError};

// ============================================================
// Error Handling
// ============================================================

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

/// Client-visible error body, matching the `{"error": "..."}` contract.
fn error_body(status: StatusCode, message: impl Into<String>) -> ErrorResponse {
    (status, Json(serde_json::json!({ "error": message.into() })))
}

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> ErrorResponse {
    tracing::error!("Internal error: {}", e);
    error_body(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Planets
// ============================================================

pub async fn list_planets(
    State(state): State<AppState>,
) -> Result<Json<Vec<Planet>>, ErrorResponse> {
    state.db.get_all_planets().map(Json).map_err(internal_error)
}

// ============================================================
// Launches
// ============================================================

/// Page/limit pagination. `limit` of 0 (the default) returns everything;
/// negative values are taken by absolute value.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl PaginationQuery {
    fn skip_limit(&self) -> (u64, u64) {
        let page = self.page.map(i64::unsigned_abs).unwrap_or(0).max(1);
        let limit = self.limit.map(i64::unsigned_abs).unwrap_or(0);
        // Saturate: a page past the end is an empty page, not an overflow.
        ((page - 1).saturating_mul(limit), limit)
    }
}

pub async fn list_launches(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<Launch>>, ErrorResponse> {
    let (skip, limit) = query.skip_limit();
    state
        .db
        .list_launches(skip, limit)
        .map(Json)
        .map_err(internal_error)
}

/// Create-launch request as received on the wire. Fields stay optional and
/// the date stays a string so that missing or malformed input maps to the
/// contract's 400 bodies instead of a generic deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLaunchRequest {
    pub mission: Option<String>,
    pub rocket: Option<String>,
    pub launch_date: Option<String>,
    pub target: Option<String>,
    pub customers: Option<Vec<String>>,
}

/// Accepts RFC 3339 timestamps as well as bare or human-readable dates
/// ("2028-01-04", "January 4, 2028").
fn parse_launch_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

pub async fn create_launch(
    State(state): State<AppState>,
    Json(request): Json<CreateLaunchRequest>,
) -> Result<(StatusCode, Json<Launch>), ErrorResponse> {
    let (Some(mission), Some(rocket), Some(raw_date), Some(target)) = (
        request.mission,
        request.rocket,
        request.launch_date,
        request.target,
    ) else {
        return Err(error_body(
            StatusCode::BAD_REQUEST,
            "Missing required launch property",
        ));
    };

    let Some(launch_date) = parse_launch_date(&raw_date) else {
        return Err(error_body(StatusCode::BAD_REQUEST, "Invalid launch date"));
    };

    let input = ScheduleLaunchInput {
        mission,
        rocket,
        launch_date,
        target,
        customers: request.customers,
    };

    match state.scheduling.schedule(input).await {
        Ok(launch) => Ok((StatusCode::CREATED, Json(launch))),
        Err(err @ ScheduleError::TargetNotFound) => {
            Err(error_body(StatusCode::BAD_REQUEST, err.to_string()))
        }
        Err(ScheduleError::Storage(err)) => Err(internal_error(err)),
    }
}

pub async fn abort_launch(
    State(state): State<AppState>,
    Path(flight_number): Path<u32>,
) -> Result<Json<Launch>, ErrorResponse> {
    match state.lifecycle.abort(flight_number) {
        Ok(launch) => Ok(Json(launch)),
        Err(err @ AbortError::NotFound) => {
            Err(error_body(StatusCode::NOT_FOUND, err.to_string()))
        }
        Err(AbortError::Storage(err)) => Err(internal_error(err)),
    }
}
