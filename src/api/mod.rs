//! REST API module.
//!
//! Handlers for every `/api` route, grouped by surface. Handlers stay thin:
//! parse the body, pull required fields, call into the progression
//! controller or the content tables, and shape the response.

mod admin;
mod content;
mod phases;
mod teams;

pub use admin::*;
pub use content::*;
pub use phases::*;
pub use teams::*;

use axum::Json;

use crate::errors::AppError;

/// Handler result. Errors render as the JSON error body.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Require a non-blank string field.
fn required(value: Option<String>, message: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::Validation(message.to_string())),
    }
}

fn required_team_id(team_id: Option<String>) -> Result<String, AppError> {
    required(team_id, "Team ID is required")
}
