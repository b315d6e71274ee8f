//! Team registration and lookup endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use super::ApiResult;
use crate::models::{RegisterResponse, RegisterTeamRequest, Team};
use crate::AppState;

/// POST /api/teams/register - Register a new team.
pub async fn register_team(
    State(state): State<AppState>,
    payload: Result<Json<RegisterTeamRequest>, JsonRejection>,
) -> ApiResult<RegisterResponse> {
    let Json(request) = payload?;
    let team = state.progression.register(&request).await?;

    Ok(Json(RegisterResponse {
        success: true,
        message: "Registration successful!".to_string(),
        team,
    }))
}

/// GET /api/teams/{teamName} - Resume by team name.
pub async fn get_team_by_name(
    State(state): State<AppState>,
    Path(team_name): Path<String>,
) -> ApiResult<Team> {
    Ok(Json(state.progression.team_by_name(&team_name).await?))
}
