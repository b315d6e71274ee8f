//! Request bodies accepted by the hunt endpoints.
//!
//! Fields are optional at the type level so that missing values surface as
//! validation errors with a readable message instead of body rejections.

use std::collections::HashMap;

use serde::Deserialize;

/// Request body for registering a new team.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTeamRequest {
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_leader: Option<String>,
    /// Comma separated member names.
    #[serde(default)]
    pub team_members: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
}

/// Phase 1 submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSubmitRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub ai_prompt: Option<String>,
    /// Link to the generated image. Stored as given.
    #[serde(default)]
    pub drive_link: Option<String>,
}

/// Single quiz answer check. Not tied to a team.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckAnswerRequest {
    #[serde(default)]
    pub question_index: Option<i64>,
    #[serde(default)]
    pub answer: Option<i64>,
}

/// Answer indices for a whole question set, in question order.
/// Unanswered questions may be sent as `null`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSheetRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub answers: Option<Vec<Option<i64>>>,
}

/// Phase 4 submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugFixRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

/// An answer to a riddle: an option index for multiple choice, free text otherwise.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RiddleAnswer {
    Choice(i64),
    Text(String),
}

impl RiddleAnswer {
    /// Text form used when matching against accepted answers.
    pub fn as_text(&self) -> String {
        match self {
            RiddleAnswer::Choice(index) => index.to_string(),
            RiddleAnswer::Text(text) => text.clone(),
        }
    }
}

/// Incremental check of one riddle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiddleAnswerRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub riddle_id: Option<u32>,
    #[serde(default)]
    pub answer: Option<RiddleAnswer>,
}

/// One entry of the riddle answer map. Clients also send their own `correct`
/// verdict, which is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RiddleAnswerEntry {
    #[serde(default)]
    pub answer: Option<RiddleAnswer>,
}

/// Phase 5 completion. Answers are keyed by riddle ID. Any client-reported
/// `score` field is ignored; the server scores the answers itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiddleCompleteRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub answers: HashMap<String, RiddleAnswerEntry>,
}

/// Phase 6 submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSubmitRequest {
    #[serde(default)]
    pub team_id: Option<String>,
    #[serde(default)]
    pub location_answer: Option<String>,
}
