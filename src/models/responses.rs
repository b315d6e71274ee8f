//! Response bodies returned by the hunt endpoints.

use serde::Serialize;

use super::Team;
use crate::content::{CodeQuestion, LocationRiddle};
use crate::validator::{CodeReadingResult, QuizResult};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub team: Team,
}

#[derive(Debug, Serialize)]
pub struct CheckAnswerResponse {
    pub success: bool,
    pub correct: bool,
}

/// Phase 2 bulk result. Reports which answers were right, never the right indices.
#[derive(Debug, Serialize)]
pub struct QuizSubmitResponse {
    pub success: bool,
    pub score: u32,
    pub total: u32,
    pub passed: bool,
    pub results: Vec<QuizResult>,
}

/// Phase 3 result, with the full question set and answers for review.
#[derive(Debug, Serialize)]
pub struct CodeReadingResponse {
    pub success: bool,
    pub score: u32,
    pub passed: bool,
    pub results: Vec<CodeReadingResult>,
    pub questions: &'static [CodeQuestion],
}

#[derive(Debug, Serialize)]
pub struct BuggyCodeResponse {
    pub code: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DebugFixResponse {
    pub success: bool,
    pub correct: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RiddleCompleteResponse {
    pub success: bool,
    pub score: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishResponse {
    pub success: bool,
    pub message: String,
    pub team_name: String,
    pub team_leader: String,
}

#[derive(Debug, Serialize)]
pub struct LocationRiddleResponse {
    pub success: bool,
    pub riddle: &'static LocationRiddle,
}

/// Completed-phase counts across all teams.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PhaseStats {
    pub phase1: u64,
    pub phase2: u64,
    pub phase3: u64,
    pub phase4: u64,
    pub phase5: u64,
    pub phase6: u64,
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_teams: u64,
    pub phase_stats: PhaseStats,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub timestamp: String,
}
