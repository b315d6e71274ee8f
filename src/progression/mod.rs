//! Phase progression controller.
//!
//! Loads the team, applies the gating rule, asks the validator for a verdict
//! and writes the result back through the store. Read-check-write sequences
//! for one team run under that team's lock, so two concurrent submissions for
//! the same phase cannot both pass the "not yet completed" check.
//!
//! Gating rule, identical for every team-scoped write: the team must exist,
//! the phase must not be completed yet, and `current_phase` must equal the
//! phase number.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::db::TeamStore;
use crate::errors::AppError;
use crate::models::{
    LocationPatch, LocationPhase, Phase, PhaseRecord, PromptPatch, PromptPhase,
    RegisterTeamRequest, RiddleAnswer, RiddleAnswerEntry, Team, TeamPatch,
};
use crate::validator::{self, CodeReadingScore, QuizScore, RiddleScore};

/// Per-team async locks, created on first use and dropped with the last
/// guard, so the map only holds teams with a submission in flight.
#[derive(Default)]
struct TeamLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TeamLocks {
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Arc<Mutex<()>>>> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn acquire(&self, team_id: &str) -> TeamGuard<'_> {
        let lock = self
            .entries()
            .entry(team_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        // Built before waiting so a cancelled wait still cleans up the entry.
        let mut team_guard = TeamGuard {
            locks: self,
            team_id: team_id.to_string(),
            guard: None,
        };
        team_guard.guard = Some(lock.lock_owned().await);
        team_guard
    }
}

/// Holds one team's lock. On drop, removes the map entry if no other task
/// holds or waits on it.
struct TeamGuard<'a> {
    locks: &'a TeamLocks,
    team_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for TeamGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut entries = self.locks.entries();
        if entries
            .get(&self.team_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            entries.remove(&self.team_id);
        }
    }
}

/// Result of a phase 4 attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum DebugOutcome {
    Solved,
    Wrong,
}

/// Orchestrates validation and persistence of every hunt submission.
pub struct Progression {
    store: Arc<dyn TeamStore>,
    locks: TeamLocks,
    registration: Mutex<()>,
}

impl Progression {
    pub fn new(store: Arc<dyn TeamStore>) -> Self {
        Self {
            store,
            locks: TeamLocks::default(),
            registration: Mutex::new(()),
        }
    }

    /// Register a new team at phase 1.
    pub async fn register(&self, request: &RegisterTeamRequest) -> Result<Team, AppError> {
        let valid = validator::validate_registration(request)?;

        // The name check and insert must not interleave with another registration.
        let _guard = self.registration.lock().await;

        if self.store.get_by_name(&valid.team_name).await?.is_some() {
            return Err(AppError::Validation("Team name already exists".to_string()));
        }

        let now = Utc::now();
        let team = Team {
            team_id: generate_team_id(now.timestamp_millis()),
            team_name: valid.team_name,
            team_leader: valid.team_leader,
            team_members: valid.team_members,
            email: valid.email,
            theme: valid.theme,
            phase1: PromptPhase::default(),
            phase2: PhaseRecord::default(),
            phase3: PhaseRecord::default(),
            phase4: PhaseRecord::default(),
            phase5: PhaseRecord::default(),
            phase6: LocationPhase::default(),
            current_phase: Phase::Prompt.number(),
            created_at: now.to_rfc3339(),
            updated_at: now.to_rfc3339(),
        };

        self.store.create(&team).await?;

        tracing::info!(
            "Team registered: {} (theme: {}, store: {})",
            team.team_name,
            team.theme.as_str(),
            self.store.backend_name()
        );

        Ok(team)
    }

    /// Fetch a team by name, normalizing it first.
    pub async fn team_by_name(&self, name: &str) -> Result<Team, AppError> {
        self.store
            .get_by_name(&validator::normalize_team_name(name))
            .await?
            .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
    }

    async fn load(&self, team_id: &str) -> Result<Team, AppError> {
        self.store
            .get_by_id(team_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Team not found".to_string()))
    }

    /// Load a team and check that it may submit `phase`.
    async fn load_for(&self, team_id: &str, phase: Phase) -> Result<Team, AppError> {
        let team = self.load(team_id).await?;
        if team.is_completed(phase) {
            return Err(AppError::StateConflict(format!(
                "Phase {} already completed",
                phase.number()
            )));
        }
        ensure_on_phase(&team, phase)?;
        Ok(team)
    }

    /// Phase 1: store the prompt and advance when it contains the keyword.
    pub async fn submit_prompt(
        &self,
        team_id: &str,
        ai_prompt: &str,
        drive_link: Option<String>,
    ) -> Result<Team, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        let team = self.load_for(team_id, Phase::Prompt).await?;

        validator::check_prompt(ai_prompt)?;

        let mut patch = TeamPatch::complete(Phase::Prompt);
        patch.phase1 = PromptPatch {
            completed: Some(true),
            ai_prompt: Some(ai_prompt.to_string()),
            drive_link,
        };
        let updated = self.store.merge(team_id, &patch).await?;

        tracing::info!("Phase 1 - team {} submitted their AI image prompt", team.team_name);
        Ok(updated)
    }

    /// Phase 2 bulk submission. A perfect sheet completes the phase; any other
    /// score is recorded as an attempt without advancing.
    pub async fn submit_quiz(
        &self,
        team_id: &str,
        answers: &[Option<i64>],
    ) -> Result<QuizScore, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        let team = self.load_for(team_id, Phase::Quiz).await?;

        let result = validator::score_quiz(answers);
        let patch = if result.passed {
            TeamPatch::complete(Phase::Quiz)
        } else {
            TeamPatch::default()
        }
        .with_score(Phase::Quiz, result.score);
        self.store.merge(team_id, &patch).await?;

        tracing::info!(
            "Phase 2 - team {}, score {}/{}, passed: {}",
            team.team_name,
            result.score,
            result.total,
            result.passed
        );
        Ok(result)
    }

    /// Phase 2 completion after answering question by question. The answers
    /// are scored again here; only a perfect sheet completes the phase.
    pub async fn complete_quiz(
        &self,
        team_id: &str,
        answers: &[Option<i64>],
    ) -> Result<QuizScore, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        let team = self.load_for(team_id, Phase::Quiz).await?;

        let result = validator::score_quiz(answers);
        if !result.passed {
            tracing::info!(
                "Phase 2 - team {} tried to complete with {}/{}",
                team.team_name,
                result.score,
                result.total
            );
            return Err(AppError::StateConflict(format!(
                "All questions must be answered correctly ({}/{})",
                result.score, result.total
            )));
        }

        let patch = TeamPatch::complete(Phase::Quiz).with_score(Phase::Quiz, result.score);
        self.store.merge(team_id, &patch).await?;

        tracing::info!("Phase 2 - team {} completed all questions correctly", team.team_name);
        Ok(result)
    }

    /// Phase 3. A failing attempt leaves the record untouched.
    pub async fn submit_code_reading(
        &self,
        team_id: &str,
        answers: &[Option<i64>],
    ) -> Result<CodeReadingScore, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        let team = self.load_for(team_id, Phase::CodeReading).await?;

        let result = validator::score_code_reading(answers);
        if result.passed {
            let patch = TeamPatch::complete(Phase::CodeReading)
                .with_score(Phase::CodeReading, result.score);
            self.store.merge(team_id, &patch).await?;
        }

        tracing::info!(
            "Phase 3 - team {}, score {}/{}, passed: {}",
            team.team_name,
            result.score,
            result.results.len(),
            result.passed
        );
        Ok(result)
    }

    /// Phase 4. Wrong answers change nothing.
    pub async fn submit_debug_fix(
        &self,
        team_id: &str,
        answer: &str,
    ) -> Result<DebugOutcome, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        let team = self.load_for(team_id, Phase::Debugging).await?;

        if !validator::check_debug_fix(answer) {
            tracing::debug!("Phase 4 - team {} answered incorrectly", team.team_name);
            return Ok(DebugOutcome::Wrong);
        }

        self.store
            .merge(team_id, &TeamPatch::complete(Phase::Debugging))
            .await?;

        tracing::info!("Phase 4 - team {} solved the buggy code", team.team_name);
        Ok(DebugOutcome::Solved)
    }

    /// Phase 5 incremental check. Nothing is persisted.
    pub async fn check_riddle(
        &self,
        team_id: &str,
        riddle_id: u32,
        answer: &RiddleAnswer,
    ) -> Result<bool, AppError> {
        let team = self.load(team_id).await?;
        ensure_on_phase(&team, Phase::Riddles)?;
        validator::check_riddle(riddle_id, answer)
    }

    /// Phase 5 completion: every riddle must be answered correctly.
    pub async fn complete_riddles(
        &self,
        team_id: &str,
        answers: &HashMap<String, RiddleAnswerEntry>,
    ) -> Result<RiddleScore, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        let team = self.load_for(team_id, Phase::Riddles).await?;

        let result = validator::score_riddles(answers);
        if result.passed {
            let patch =
                TeamPatch::complete(Phase::Riddles).with_score(Phase::Riddles, result.score);
            self.store.merge(team_id, &patch).await?;
        }

        tracing::info!(
            "Phase 5 - team {}, score {}/{}, passed: {}",
            team.team_name,
            result.score,
            result.total,
            result.passed
        );
        Ok(result)
    }

    /// Phase 6: any location answer finishes the hunt.
    pub async fn submit_location(
        &self,
        team_id: &str,
        location_answer: Option<String>,
    ) -> Result<Team, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        self.load_for(team_id, Phase::Location).await?;

        let location_answer = location_answer.unwrap_or_default();
        let mut patch = TeamPatch::complete(Phase::Location);
        patch.phase6 = LocationPatch {
            completed: Some(true),
            location_answer: Some(location_answer.clone()),
        };
        let updated = self.store.merge(team_id, &patch).await?;

        tracing::info!(
            "COMPLETED - team {} | location: {}",
            updated.team_name,
            if location_answer.is_empty() {
                "none"
            } else {
                location_answer.as_str()
            }
        );
        Ok(updated)
    }

    /// Admin removal of one team.
    pub async fn delete_team(&self, team_id: &str) -> Result<bool, AppError> {
        let _guard = self.locks.acquire(team_id).await;
        let removed = self.store.delete(team_id).await?;
        if removed {
            tracing::info!("Team deleted: {}", team_id);
        }
        Ok(removed)
    }

    /// Admin removal of every team.
    pub async fn clear_teams(&self) -> Result<u64, AppError> {
        let _guard = self.registration.lock().await;
        let removed = self.store.clear().await?;
        tracing::info!("All teams cleared ({} removed)", removed);
        Ok(removed)
    }
}

fn ensure_on_phase(team: &Team, phase: Phase) -> Result<(), AppError> {
    if team.current_phase != phase.number() {
        return Err(AppError::StateConflict(format!(
            "Not on Phase {}",
            phase.number()
        )));
    }
    Ok(())
}

/// `TEAM_<unix millis>_<9 random hex chars>`.
fn generate_team_id(millis: i64) -> String {
    let random = uuid::Uuid::new_v4().simple().to_string();
    format!("TEAM_{}_{}", millis, &random[..9])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CODE_QUESTIONS, QUIZ_QUESTIONS};
    use crate::db::MemoryStore;
    use crate::models::FINAL_PHASE;

    fn progression() -> Progression {
        Progression::new(Arc::new(MemoryStore::new()))
    }

    fn registration(name: &str) -> RegisterTeamRequest {
        RegisterTeamRequest {
            team_name: Some(name.into()),
            team_leader: Some("Asha".into()),
            team_members: Some("Asha, Ben, Chen".into()),
            email: Some("asha@example.com".into()),
            theme: Some("AI in Healthcare".into()),
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

    fn riddle_key() -> HashMap<String, RiddleAnswerEntry> {
        [
            ("1", RiddleAnswer::Choice(1)),
            ("2", RiddleAnswer::Choice(1)),
            ("3", RiddleAnswer::Text("NEXTGEN".into())),
        ]
        .into_iter()
        .map(|(id, answer)| {
            (
                id.to_string(),
                RiddleAnswerEntry {
                    answer: Some(answer),
                },
            )
        })
        .collect()
    }

    #[test]
    fn test_team_id_shape() {
        let id = generate_team_id(1_700_000_000_000);
        assert!(id.starts_with("TEAM_1700000000000_"));
        assert_eq!(id.len(), "TEAM_1700000000000_".len() + 9);
    }

    #[tokio::test]
    async fn test_register_rejects_name_differing_by_case() {
        let p = progression();
        let team = p.register(&registration("Night Owls")).await.unwrap();
        assert_eq!(team.team_name, "night owls");
        assert_eq!(team.current_phase, 1);

        let err = p.register(&registration("NIGHT OWLS")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(m) if m == "Team name already exists"));

        assert_eq!(
            p.team_by_name("Night OWLS").await.unwrap().team_id,
            team.team_id
        );
    }

    #[tokio::test]
    async fn test_full_hunt() {
        let p = progression();
        let id = p.register(&registration("owls")).await.unwrap().team_id;

        let team = p
            .submit_prompt(&id, "a vu2050 campus", Some("https://drive/x".into()))
            .await
            .unwrap();
        assert_eq!(team.current_phase, 2);
        assert_eq!(team.phase1.drive_link.as_deref(), Some("https://drive/x"));

        assert!(p.submit_quiz(&id, &quiz_key()).await.unwrap().passed);
        assert!(p.submit_code_reading(&id, &code_key()).await.unwrap().passed);
        assert_eq!(
            p.submit_debug_fix(&id, " 120 ").await.unwrap(),
            DebugOutcome::Solved
        );
        let riddle = RiddleAnswer::Text("nextgen".into());
        assert!(p.check_riddle(&id, 3, &riddle).await.unwrap());
        assert!(p.complete_riddles(&id, &riddle_key()).await.unwrap().passed);

        let done = p.submit_location(&id, None).await.unwrap();
        assert_eq!(done.current_phase, FINAL_PHASE);
        assert_eq!(done.phase6.location_answer.as_deref(), Some(""));
        assert!(done.phase1.completed && done.phase5.completed && done.phase6.completed);
        assert_eq!(done.phase2.score, Some(10));
        assert_eq!(done.phase5.score, Some(3));
    }

    #[tokio::test]
    async fn test_prompt_without_keyword_is_rejected() {
        let p = progression();
        let id = p.register(&registration("owls")).await.unwrap().team_id;

        let err = p.submit_prompt(&id, "a campus", None).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(p.store.get_by_id(&id).await.unwrap().unwrap().current_phase, 1);
    }

    #[tokio::test]
    async fn test_second_completion_is_state_conflict() {
        let p = progression();
        let id = p.register(&registration("owls")).await.unwrap().team_id;
        p.submit_prompt(&id, "VU2050", None).await.unwrap();

        let err = p.submit_prompt(&id, "VU2050 again", None).await.unwrap_err();
        assert!(matches!(err, AppError::StateConflict(m) if m == "Phase 1 already completed"));
        let team = p.store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(team.phase1.ai_prompt.as_deref(), Some("VU2050"));
    }

    #[tokio::test]
    async fn test_out_of_order_submission_is_state_conflict() {
        let p = progression();
        let id = p.register(&registration("owls")).await.unwrap().team_id;

        let err = p.submit_quiz(&id, &quiz_key()).await.unwrap_err();
        assert!(matches!(err, AppError::StateConflict(m) if m == "Not on Phase 2"));
        let err = p.submit_location(&id, Some("x".into())).await.unwrap_err();
        assert!(matches!(err, AppError::StateConflict(_)));
        let err = p
            .check_riddle(&id, 1, &RiddleAnswer::Choice(1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StateConflict(_)));
    }

    #[tokio::test]
    async fn test_failed_quiz_records_attempt_only() {
        let p = progression();
        let id = p.register(&registration("owls")).await.unwrap().team_id;
        p.submit_prompt(&id, "VU2050", None).await.unwrap();

        let mut sheet = quiz_key();
        sheet[9] = Some(0);
        let result = p.submit_quiz(&id, &sheet).await.unwrap();
        assert_eq!((result.score, result.passed), (9, false));

        let team = p.store.get_by_id(&id).await.unwrap().unwrap();
        assert_eq!(team.current_phase, 2);
        assert!(!team.phase2.completed);
        assert_eq!(team.phase2.score, Some(9));

        let err = p.complete_quiz(&id, &sheet).await.unwrap_err();
        assert!(matches!(err, AppError::StateConflict(_)));
        assert!(p.complete_quiz(&id, &quiz_key()).await.unwrap().passed);
        assert_eq!(p.store.get_by_id(&id).await.unwrap().unwrap().current_phase, 3);
    }

    #[tokio::test]
    async fn test_unknown_team() {
        let p = progression();
        let err = p.submit_debug_fix("TEAM_missing", "120").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(matches!(
            p.team_by_name("ghosts").await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_completions_advance_once() {
        let p = Arc::new(progression());
        let id = p.register(&registration("owls")).await.unwrap().team_id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let p = Arc::clone(&p);
                let id = id.clone();
                tokio::spawn(async move { p.submit_prompt(&id, "VU2050", None).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(p.store.get_by_id(&id).await.unwrap().unwrap().current_phase, 2);
    }

    #[tokio::test]
    async fn test_locks_released_after_submissions() {
        let p = progression();
        for i in 0..1000 {
            let err = p
                .submit_debug_fix(&format!("TEAM_unknown_{}", i), "120")
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::NotFound(_)));
        }
        assert!(p.locks.entries().is_empty());

        let id = p.register(&registration("owls")).await.unwrap().team_id;
        p.submit_prompt(&id, "VU2050", None).await.unwrap();
        assert!(p.submit_prompt(&id, "VU2050", None).await.is_err());
        assert!(p.locks.entries().is_empty());
    }

    #[tokio::test]
    async fn test_lock_entry_kept_while_contended() {
        let locks = TeamLocks::default();
        let first = locks.acquire("TEAM_1").await;

        let waiter = {
            let lock = locks.entries()["TEAM_1"].clone();
            tokio::spawn(async move { lock.lock_owned().await })
        };
        tokio::task::yield_now().await;
        assert_eq!(locks.entries().len(), 1);

        drop(first);
        assert_eq!(locks.entries().len(), 1);
        drop(waiter.await.unwrap());
        drop(locks.acquire("TEAM_1").await);
        assert!(locks.entries().is_empty());
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let p = progression();
        let id = p.register(&registration("owls")).await.unwrap().team_id;
        p.register(&registration("hawks")).await.unwrap();

        assert!(p.delete_team(&id).await.unwrap());
        assert!(!p.delete_team(&id).await.unwrap());
        assert_eq!(p.clear_teams().await.unwrap(), 1);
        assert!(p.register(&registration("owls")).await.is_ok());
    }
}
