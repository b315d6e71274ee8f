//! Phase submission endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{required, required_team_id, ApiResult};
use crate::content::{CODE_QUESTIONS, DEBUG_ROOM};
use crate::errors::AppError;
use crate::models::{
    AnswerSheetRequest, CheckAnswerRequest, CheckAnswerResponse, CodeReadingResponse,
    DebugFixRequest, DebugFixResponse, FinishResponse, LocationSubmitRequest, MessageResponse,
    PromptSubmitRequest, QuizSubmitResponse, RiddleAnswerRequest, RiddleCompleteRequest,
    RiddleCompleteResponse,
};
use crate::progression::DebugOutcome;
use crate::AppState;

fn required_answers(answers: Option<Vec<Option<i64>>>) -> Result<Vec<Option<i64>>, AppError> {
    answers.ok_or_else(|| AppError::Validation("Answers are required".to_string()))
}

/// POST /api/phase1/submit
pub async fn submit_phase1(
    State(state): State<AppState>,
    payload: Result<Json<PromptSubmitRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;
    let ai_prompt = required(request.ai_prompt, "AI prompt is required")?;

    state
        .progression
        .submit_prompt(&team_id, &ai_prompt, request.drive_link)
        .await?;

    Ok(Json(MessageResponse::ok("Phase 1 completed!")))
}

/// POST /api/phase2/check-answer - Check one answer. Not tied to a team.
pub async fn check_phase2_answer(
    payload: Result<Json<CheckAnswerRequest>, JsonRejection>,
) -> ApiResult<CheckAnswerResponse> {
    let Json(request) = payload?;
    let (Some(question_index), Some(answer)) = (request.question_index, request.answer) else {
        return Err(AppError::Validation(
            "questionIndex and answer are required".to_string(),
        ));
    };

    let correct = crate::validator::check_quiz_answer(question_index, answer)?;
    Ok(Json(CheckAnswerResponse {
        success: true,
        correct,
    }))
}

/// POST /api/phase2/complete - Finish phase 2 after per-question checks.
pub async fn complete_phase2(
    State(state): State<AppState>,
    payload: Result<Json<AnswerSheetRequest>, JsonRejection>,
) -> ApiResult<MessageResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;
    let answers = required_answers(request.answers)?;

    state.progression.complete_quiz(&team_id, &answers).await?;

    Ok(Json(MessageResponse::ok("Phase 2 completed!")))
}

/// POST /api/phase2/submit - Score the whole quiz at once.
pub async fn submit_phase2(
    State(state): State<AppState>,
    payload: Result<Json<AnswerSheetRequest>, JsonRejection>,
) -> ApiResult<QuizSubmitResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;
    let answers = required_answers(request.answers)?;

    let result = state.progression.submit_quiz(&team_id, &answers).await?;

    Ok(Json(QuizSubmitResponse {
        success: true,
        score: result.score,
        total: result.total,
        passed: result.passed,
        results: result.results,
    }))
}

/// POST /api/phase3/submit - Score the code-reading quiz. The response
/// reveals the answers whether or not the team passed.
pub async fn submit_phase3(
    State(state): State<AppState>,
    payload: Result<Json<AnswerSheetRequest>, JsonRejection>,
) -> ApiResult<CodeReadingResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;
    let answers = required_answers(request.answers)?;

    let result = state
        .progression
        .submit_code_reading(&team_id, &answers)
        .await?;

    Ok(Json(CodeReadingResponse {
        success: true,
        score: result.score,
        passed: result.passed,
        results: result.results,
        questions: &CODE_QUESTIONS,
    }))
}

/// POST /api/phase4/submit
pub async fn submit_phase4(
    State(state): State<AppState>,
    payload: Result<Json<DebugFixRequest>, JsonRejection>,
) -> ApiResult<DebugFixResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;
    let answer = required(request.answer, "Answer is required")?;

    let response = match state.progression.submit_debug_fix(&team_id, &answer).await? {
        DebugOutcome::Solved => DebugFixResponse {
            success: true,
            correct: true,
            message: "Correct! Head to the CS Labs to find the next clue!".to_string(),
            room: Some(DEBUG_ROOM.to_string()),
        },
        DebugOutcome::Wrong => DebugFixResponse {
            success: false,
            correct: false,
            message: "Incorrect output. Try again!".to_string(),
            room: None,
        },
    };

    Ok(Json(response))
}

/// POST /api/phase5/answer - Check one riddle. Nothing is saved.
pub async fn check_phase5_answer(
    State(state): State<AppState>,
    payload: Result<Json<RiddleAnswerRequest>, JsonRejection>,
) -> ApiResult<CheckAnswerResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;
    let (Some(riddle_id), Some(answer)) = (request.riddle_id, request.answer) else {
        return Err(AppError::Validation(
            "riddleId and answer are required".to_string(),
        ));
    };

    let correct = state
        .progression
        .check_riddle(&team_id, riddle_id, &answer)
        .await?;

    Ok(Json(CheckAnswerResponse {
        success: true,
        correct,
    }))
}

/// POST /api/phase5/complete - Re-score every riddle and finish phase 5.
pub async fn complete_phase5(
    State(state): State<AppState>,
    payload: Result<Json<RiddleCompleteRequest>, JsonRejection>,
) -> ApiResult<RiddleCompleteResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;

    let result = state
        .progression
        .complete_riddles(&team_id, &request.answers)
        .await?;

    let response = if result.passed {
        RiddleCompleteResponse {
            success: true,
            score: result.score,
            total: None,
            message: "Phase 5 completed! Proceed to the final phase.".to_string(),
        }
    } else {
        RiddleCompleteResponse {
            success: false,
            score: result.score,
            total: Some(result.total),
            message: format!(
                "You scored {}/{}. All challenges must be correct to pass. Try again!",
                result.score, result.total
            ),
        }
    };

    Ok(Json(response))
}

/// POST /api/phase6/submit - Record the location answer and finish the hunt.
pub async fn submit_phase6(
    State(state): State<AppState>,
    payload: Result<Json<LocationSubmitRequest>, JsonRejection>,
) -> ApiResult<FinishResponse> {
    let Json(request) = payload?;
    let team_id = required_team_id(request.team_id)?;

    let team = state
        .progression
        .submit_location(&team_id, request.location_answer)
        .await?;

    Ok(Json(FinishResponse {
        success: true,
        message: "Congratulations! You have completed CodeHunt-2026!".to_string(),
        team_name: team.team_name,
        team_leader: team.team_leader,
    }))
}
