//! Static content endpoints. Answers are stripped before anything leaves here.

use axum::{extract::Path, Json};

use super::ApiResult;
use crate::content::{
    self, PublicCodeQuestion, PublicQuizQuestion, PublicRiddle, BUGGY_CODE, CODE_QUESTIONS,
    QUIZ_QUESTIONS, RIDDLES,
};
use crate::errors::AppError;
use crate::models::{BuggyCodeResponse, LocationRiddleResponse};

/// GET /api/phase2/questions
pub async fn phase2_questions() -> Json<Vec<PublicQuizQuestion>> {
    Json(QUIZ_QUESTIONS.iter().map(|q| q.public()).collect())
}

/// GET /api/phase3/questions
pub async fn phase3_questions() -> Json<Vec<PublicCodeQuestion>> {
    Json(CODE_QUESTIONS.iter().map(|q| q.public()).collect())
}

/// GET /api/phase4/code
pub async fn phase4_code() -> Json<BuggyCodeResponse> {
    Json(BuggyCodeResponse { code: BUGGY_CODE })
}

/// GET /api/phase5/riddles
pub async fn phase5_riddles() -> Json<Vec<PublicRiddle>> {
    Json(RIDDLES.iter().map(|r| r.public()).collect())
}

/// GET /api/location-riddle/{stage}
pub async fn location_riddle(Path(stage): Path<String>) -> ApiResult<LocationRiddleResponse> {
    let riddle = stage
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(content::location_riddle)
        .ok_or_else(|| AppError::Validation("Invalid stage. Must be 1-6.".to_string()))?;

    Ok(Json(LocationRiddleResponse {
        success: true,
        riddle,
    }))
}
