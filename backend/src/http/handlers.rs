//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::dto::{
    ActivityHistory, ActivityListing, HealthResponse, MessageResponse, SignupParams,
    StatisticsReport, UnregisterParams,
};
use super::error::AppError;
use super::state::AppState;
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Activities
// =============================================================================

/// GET /activities
pub async fn list_activities(State(state): State<AppState>) -> HandlerResult<ActivityListing> {
    let listing = services::list_activities(state.repository.as_ref()).await?;
    Ok(Json(listing))
}

/// GET /activities/statistics
pub async fn get_statistics(State(state): State<AppState>) -> HandlerResult<StatisticsReport> {
    let report = services::get_statistics(state.repository.as_ref()).await?;
    Ok(Json(report))
}

/// GET /activities/{name}/history
pub async fn get_activity_history(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult<ActivityHistory> {
    let history = services::get_activity_history(state.repository.as_ref(), &name).await?;
    Ok(Json(history))
}

/// POST /activities/{name}/signup?email=...&name=...&grade_level=...
pub async fn sign_up(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<SignupParams>,
) -> HandlerResult<MessageResponse> {
    let reply = services::sign_up(state.repository.as_ref(), params.into_request(name)).await?;
    Ok(Json(reply))
}

/// DELETE /activities/{name}/unregister?email=...
pub async fn unregister(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<UnregisterParams>,
) -> HandlerResult<MessageResponse> {
    let reply = services::unregister(state.repository.as_ref(), &name, &params.email).await?;
    Ok(Json(reply))
}
