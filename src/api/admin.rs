//! Leaderboard, health and admin maintenance endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{HealthResponse, LeaderboardEntry, MessageResponse, StatsResponse, Team};
use crate::views;
use crate::AppState;

/// GET /api/leaderboard - First ten finishers.
pub async fn get_leaderboard(State(state): State<AppState>) -> ApiResult<Vec<LeaderboardEntry>> {
    Ok(Json(views::leaderboard(state.store.as_ref()).await?))
}

/// GET /api/health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        database: state.store.backend_name(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// GET /api/admin/teams - Every team record.
pub async fn list_teams(State(state): State<AppState>) -> ApiResult<Vec<Team>> {
    Ok(Json(state.store.list_all().await?))
}

/// GET /api/admin/stats
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<StatsResponse> {
    Ok(Json(views::stats(state.store.as_ref()).await?))
}

/// DELETE /api/admin/teams/{teamId}
pub async fn delete_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> ApiResult<MessageResponse> {
    if !state.progression.delete_team(&team_id).await? {
        return Err(AppError::NotFound(format!("Team {} not found", team_id)));
    }
    Ok(Json(MessageResponse::ok("Team deleted")))
}

/// DELETE /api/admin/clear-all
pub async fn clear_all_teams(State(state): State<AppState>) -> ApiResult<MessageResponse> {
    state.progression.clear_teams().await?;
    Ok(Json(MessageResponse::ok("All teams cleared")))
}
