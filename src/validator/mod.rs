//! Per-phase answer checking and scoring.
//!
//! Every function here is pure: it looks only at its arguments and the static
//! content tables. Gating and persistence live in `progression`.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::content::{
    self, RiddleKind, CODE_QUESTIONS, CODE_READING_PASS_SCORE, DEBUG_ACCEPTED_ANSWERS,
    PROMPT_KEYWORD, QUIZ_QUESTIONS, RIDDLES,
};
use crate::errors::AppError;
use crate::models::{RegisterTeamRequest, RiddleAnswer, RiddleAnswerEntry, Theme};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

pub const MIN_MEMBERS: usize = 3;
pub const MAX_MEMBERS: usize = 4;

/// Registration fields after validation, ready to become a `Team`.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidRegistration {
    /// Normalized: trimmed and lower-cased.
    pub team_name: String,
    pub team_leader: String,
    pub team_members: Vec<String>,
    pub email: String,
    pub theme: Theme,
}

/// Lower-cased, trimmed form used for name uniqueness and lookup.
pub fn normalize_team_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn required(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Check a registration request. Name uniqueness needs the store and is
/// checked by the caller.
pub fn validate_registration(request: &RegisterTeamRequest) -> Result<ValidRegistration, AppError> {
    let (Some(team_name), Some(team_leader), Some(members), Some(email), Some(theme)) = (
        required(&request.team_name),
        required(&request.team_leader),
        required(&request.team_members),
        required(&request.email),
        required(&request.theme),
    ) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };

    if !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    let theme = Theme::parse(theme)
        .ok_or_else(|| AppError::Validation("Please select a valid theme".to_string()))?;

    let team_members: Vec<String> = members
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if !(MIN_MEMBERS..=MAX_MEMBERS).contains(&team_members.len()) {
        return Err(AppError::Validation(format!(
            "Team must have {}-{} members",
            MIN_MEMBERS, MAX_MEMBERS
        )));
    }

    Ok(ValidRegistration {
        team_name: normalize_team_name(team_name),
        team_leader: team_leader.to_string(),
        team_members,
        email: email.to_string(),
        theme,
    })
}

/// Phase 1: the prompt must mention the hunt keyword, in any case.
pub fn check_prompt(prompt: &str) -> Result<(), AppError> {
    if prompt.to_uppercase().contains(PROMPT_KEYWORD) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "AI Prompt must contain keyword \"{}\"",
            PROMPT_KEYWORD
        )))
    }
}

fn index_matches(answer: Option<i64>, correct: usize) -> bool {
    answer.is_some_and(|a| usize::try_from(a) == Ok(correct))
}

/// Phase 2: check one answer without revealing the correct option.
pub fn check_quiz_answer(question_index: i64, answer: i64) -> Result<bool, AppError> {
    let question = usize::try_from(question_index)
        .ok()
        .and_then(|i| QUIZ_QUESTIONS.get(i))
        .ok_or_else(|| AppError::Validation("Invalid question index".to_string()))?;
    Ok(index_matches(Some(answer), question.correct_answer))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub question_index: usize,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizScore {
    pub score: u32,
    pub total: u32,
    pub passed: bool,
    pub results: Vec<QuizResult>,
}

/// Phase 2: score a full answer sheet. Only a perfect sheet passes.
pub fn score_quiz(answers: &[Option<i64>]) -> QuizScore {
    let results: Vec<QuizResult> = QUIZ_QUESTIONS
        .iter()
        .enumerate()
        .map(|(index, q)| QuizResult {
            question_index: index,
            is_correct: index_matches(answers.get(index).copied().flatten(), q.correct_answer),
        })
        .collect();

    let score = results.iter().filter(|r| r.is_correct).count() as u32;
    let total = QUIZ_QUESTIONS.len() as u32;

    QuizScore {
        score,
        total,
        passed: score == total,
        results,
    }
}

/// Per-question feedback for phase 3, including the correct option.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CodeReadingResult {
    pub question_id: u32,
    pub user_answer: Option<i64>,
    pub correct_answer: usize,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CodeReadingScore {
    pub score: u32,
    pub passed: bool,
    pub results: Vec<CodeReadingResult>,
}

/// Phase 3: score the code-reading answers against the pass threshold.
pub fn score_code_reading(answers: &[Option<i64>]) -> CodeReadingScore {
    let results: Vec<CodeReadingResult> = CODE_QUESTIONS
        .iter()
        .enumerate()
        .map(|(index, q)| {
            let user_answer = answers.get(index).copied().flatten();
            CodeReadingResult {
                question_id: q.id,
                user_answer,
                correct_answer: q.correct_answer,
                is_correct: index_matches(user_answer, q.correct_answer),
            }
        })
        .collect();

    let score = results.iter().filter(|r| r.is_correct).count() as u32;

    CodeReadingScore {
        score,
        passed: score >= CODE_READING_PASS_SCORE,
        results,
    }
}

/// Phase 4: the fixed program's output, or just the number it prints.
pub fn check_debug_fix(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    DEBUG_ACCEPTED_ANSWERS.contains(&answer.as_str())
}

/// Phase 5: check one riddle answer.
pub fn check_riddle(riddle_id: u32, answer: &RiddleAnswer) -> Result<bool, AppError> {
    let riddle = content::riddle_by_id(riddle_id)
        .ok_or_else(|| AppError::NotFound(format!("Riddle {} not found", riddle_id)))?;

    Ok(match (&riddle.kind, answer) {
        (RiddleKind::Choice { correct_answer, .. }, RiddleAnswer::Choice(index)) => {
            index_matches(Some(*index), *correct_answer)
        }
        (RiddleKind::Choice { .. }, RiddleAnswer::Text(_)) => false,
        (RiddleKind::Text { accepted_answers }, answer) => {
            let given = answer.as_text().trim().to_lowercase();
            accepted_answers
                .iter()
                .any(|accepted| accepted.trim().to_lowercase() == given)
        }
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiddleScore {
    pub score: u32,
    pub total: u32,
    pub passed: bool,
}

/// Phase 5: re-score every submitted answer. All riddles must be right.
///
/// Answers are looked up by the exact riddle ID key (`"1"`, not `"01"`).
/// Other keys and entries without an answer score nothing.
pub fn score_riddles(answers: &HashMap<String, RiddleAnswerEntry>) -> RiddleScore {
    let score = RIDDLES
        .iter()
        .filter(|riddle| {
            answers
                .get(&riddle.id.to_string())
                .and_then(|entry| entry.answer.as_ref())
                .is_some_and(|answer| check_riddle(riddle.id, answer).unwrap_or(false))
        })
        .count() as u32;
    let total = RIDDLES.len() as u32;

    RiddleScore {
        score,
        total,
        passed: score == total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> RegisterTeamRequest {
        RegisterTeamRequest {
            team_name: Some("  Night Owls ".into()),
            team_leader: Some("Asha".into()),
            team_members: Some("Asha, Ben, ,Chen".into()),
            email: Some("asha@example.com".into()),
            theme: Some("AI in Smart Cities".into()),
        }
    }

    fn quiz_key() -> Vec<Option<i64>> {
        QUIZ_QUESTIONS
            .iter()
            .map(|q| Some(q.correct_answer as i64))
            .collect()
    }

    fn code_key() -> Vec<Option<i64>> {
        CODE_QUESTIONS
            .iter()
            .map(|q| Some(q.correct_answer as i64))
            .collect()
    }

    fn wrong(index: usize) -> Option<i64> {
        Some(((index + 1) % 4) as i64)
    }

    #[test]
    fn test_registration_normalizes() {
        let valid = validate_registration(&registration()).unwrap();
        assert_eq!(valid.team_name, "night owls");
        assert_eq!(valid.team_members, vec!["Asha", "Ben", "Chen"]);
        assert_eq!(valid.theme, Theme::SmartCities);
    }

    #[test]
    fn test_registration_rejections() {
        let mut req = registration();
        req.email = Some("   ".into());
        assert!(matches!(validate_registration(&req), Err(AppError::Validation(m)) if m == "All fields are required"));

        let mut req = registration();
        req.email = Some("asha@example".into());
        assert!(matches!(validate_registration(&req), Err(AppError::Validation(m)) if m == "Invalid email format"));

        let mut req = registration();
        req.theme = Some("AI in Space".into());
        assert!(matches!(validate_registration(&req), Err(AppError::Validation(m)) if m == "Please select a valid theme"));

        let mut req = registration();
        req.team_members = Some("Asha, Ben, , ".into());
        assert!(matches!(validate_registration(&req), Err(AppError::Validation(m)) if m == "Team must have 3-4 members"));

        let mut req = registration();
        req.team_members = Some("A,B,C,D,E".into());
        assert!(validate_registration(&req).is_err());
    }

    #[test]
    fn test_prompt_keyword_any_case() {
        assert!(check_prompt("a skyline for vu2050 at dusk").is_ok());
        assert!(check_prompt("VU2050").is_ok());
        assert!(check_prompt("a skyline for VU 2050").is_err());
    }

    #[test]
    fn test_quiz_single_answer() {
        assert!(check_quiz_answer(0, 0).unwrap());
        assert!(!check_quiz_answer(0, 1).unwrap());
        assert!(check_quiz_answer(9, 3).unwrap());
        assert!(check_quiz_answer(10, 0).is_err());
        assert!(check_quiz_answer(-1, 0).is_err());
    }

    #[test]
    fn test_quiz_requires_perfect_sheet() {
        let perfect = score_quiz(&quiz_key());
        assert_eq!((perfect.score, perfect.total, perfect.passed), (10, 10, true));

        let mut sheet = quiz_key();
        sheet[4] = wrong(QUIZ_QUESTIONS[4].correct_answer);
        let nine = score_quiz(&sheet);
        assert_eq!((nine.score, nine.passed), (9, false));
        assert!(!nine.results[4].is_correct);
        assert!(nine.results[3].is_correct);

        let short = score_quiz(&quiz_key()[..5]);
        assert_eq!((short.score, short.passed), (5, false));
    }

    #[test]
    fn test_code_reading_threshold() {
        let mut sheet = code_key();
        sheet[0] = wrong(CODE_QUESTIONS[0].correct_answer);
        sheet[1] = wrong(CODE_QUESTIONS[1].correct_answer);
        let three = score_code_reading(&sheet);
        assert_eq!((three.score, three.passed), (3, true));
        assert_eq!(three.results[0].correct_answer, CODE_QUESTIONS[0].correct_answer);

        sheet[2] = None;
        let two = score_code_reading(&sheet);
        assert_eq!((two.score, two.passed), (2, false));
        assert_eq!(two.results[2].user_answer, None);
    }

    #[test]
    fn test_debug_fix_forms() {
        assert!(check_debug_fix("120"));
        assert!(check_debug_fix("  Factorial of 5: 120 \n"));
        assert!(check_debug_fix("FACTORIAL OF 5: 120"));
        assert!(!check_debug_fix("Factorial of 5 = 120"));
        assert!(!check_debug_fix("121"));
        assert!(!check_debug_fix(""));
    }

    #[test]
    fn test_riddle_checks() {
        assert!(check_riddle(1, &RiddleAnswer::Choice(1)).unwrap());
        assert!(!check_riddle(1, &RiddleAnswer::Choice(0)).unwrap());
        assert!(!check_riddle(1, &RiddleAnswer::Text("1".into())).unwrap());
        assert!(check_riddle(3, &RiddleAnswer::Text(" NeXtGeN ".into())).unwrap());
        assert!(!check_riddle(3, &RiddleAnswer::Text("next gen".into())).unwrap());
        assert!(matches!(
            check_riddle(9, &RiddleAnswer::Choice(0)),
            Err(AppError::NotFound(_))
        ));
    }

    fn entry(answer: RiddleAnswer) -> RiddleAnswerEntry {
        RiddleAnswerEntry {
            answer: Some(answer),
        }
    }

    #[test]
    fn test_riddle_set_needs_all_three() {
        let mut answers = HashMap::new();
        answers.insert("1".to_string(), entry(RiddleAnswer::Choice(1)));
        answers.insert("2".to_string(), entry(RiddleAnswer::Choice(1)));
        answers.insert("3".to_string(), entry(RiddleAnswer::Text("nextgen".into())));
        assert_eq!(
            score_riddles(&answers),
            RiddleScore {
                score: 3,
                total: 3,
                passed: true
            }
        );

        answers.insert("2".to_string(), entry(RiddleAnswer::Choice(3)));
        let two = score_riddles(&answers);
        assert_eq!((two.score, two.passed), (2, false));

        answers.insert("2".to_string(), RiddleAnswerEntry { answer: None });
        answers.insert("99".to_string(), entry(RiddleAnswer::Choice(1)));
        assert_eq!(score_riddles(&answers).score, 2);
    }

    #[test]
    fn test_riddle_keys_match_exactly() {
        let mut answers = HashMap::new();
        answers.insert("1".to_string(), entry(RiddleAnswer::Choice(0)));
        answers.insert("01".to_string(), entry(RiddleAnswer::Choice(1)));
        answers.insert(" 1".to_string(), entry(RiddleAnswer::Choice(1)));
        answers.insert("2".to_string(), entry(RiddleAnswer::Choice(1)));
        answers.insert("3".to_string(), entry(RiddleAnswer::Text("nextgen".into())));

        for _ in 0..50 {
            let result = score_riddles(&answers);
            assert_eq!((result.score, result.passed), (2, false));
        }
    }
}
