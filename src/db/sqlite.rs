//! Durable team store backed by SQLite.
//!
//! Each phase sub-record maps to its own columns, so a merge is a single
//! `UPDATE` that only touches the columns the patch sets.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Row, SqlitePool};

use super::TeamStore;
use crate::errors::AppError;
use crate::models::{
    FINAL_PHASE, LeaderboardEntry, LocationPhase, PhaseRecord, PromptPhase, Team, TeamPatch, Theme,
};

const TEAM_COLUMNS: &str = r#"id, team_name, team_leader, team_members, email, theme, current_phase,
    phase1_completed, phase1_ai_prompt, phase1_drive_link,
    phase2_completed, phase2_score, phase3_completed, phase3_score,
    phase4_completed, phase4_score, phase5_completed, phase5_score,
    phase6_completed, phase6_location_answer, created_at, updated_at"#;

/// SQLite-backed team store.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "SQLite"
    }

    async fn create(&self, team: &Team) -> Result<(), AppError> {
        let members_json = serde_json::to_string(&team.team_members)
            .map_err(|e| AppError::Internal(format!("Failed to encode members: {}", e)))?;

        let result = sqlx::query(
            r#"INSERT INTO teams (
                id, team_name, team_leader, team_members, email, theme, current_phase,
                phase1_completed, phase1_ai_prompt, phase1_drive_link,
                phase2_completed, phase2_score, phase3_completed, phase3_score,
                phase4_completed, phase4_score, phase5_completed, phase5_score,
                phase6_completed, phase6_location_answer, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&team.team_id)
        .bind(&team.team_name)
        .bind(&team.team_leader)
        .bind(&members_json)
        .bind(&team.email)
        .bind(team.theme.as_str())
        .bind(team.current_phase as i64)
        .bind(team.phase1.completed as i32)
        .bind(&team.phase1.ai_prompt)
        .bind(&team.phase1.drive_link)
        .bind(team.phase2.completed as i32)
        .bind(team.phase2.score.map(i64::from))
        .bind(team.phase3.completed as i32)
        .bind(team.phase3.score.map(i64::from))
        .bind(team.phase4.completed as i32)
        .bind(team.phase4.score.map(i64::from))
        .bind(team.phase5.completed as i32)
        .bind(team.phase5.score.map(i64::from))
        .bind(team.phase6.completed as i32)
        .bind(&team.phase6.location_answer)
        .bind(&team.created_at)
        .bind(&team.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                if db_err.message().contains("teams.team_name") {
                    Err(AppError::Validation("Team name already exists".to_string()))
                } else {
                    Err(AppError::DuplicateId(format!("Team {} already exists", team.team_id)))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Team>, AppError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = ?", TEAM_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(team_from_row).transpose()
    }

    async fn get_by_name(&self, normalized_name: &str) -> Result<Option<Team>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE team_name = ? LIMIT 1",
            TEAM_COLUMNS
        ))
        .bind(normalized_name)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(team_from_row).transpose()
    }

    async fn merge(&self, id: &str, patch: &TeamPatch) -> Result<Team, AppError> {
        let now = Utc::now().to_rfc3339();

        // MAX() keeps current_phase and the completed flags monotonic.
        let result = sqlx::query(
            r#"UPDATE teams SET
                current_phase = MAX(current_phase, COALESCE(?, current_phase)),
                phase1_completed = MAX(phase1_completed, COALESCE(?, phase1_completed)),
                phase1_ai_prompt = COALESCE(?, phase1_ai_prompt),
                phase1_drive_link = COALESCE(?, phase1_drive_link),
                phase2_completed = MAX(phase2_completed, COALESCE(?, phase2_completed)),
                phase2_score = COALESCE(?, phase2_score),
                phase3_completed = MAX(phase3_completed, COALESCE(?, phase3_completed)),
                phase3_score = COALESCE(?, phase3_score),
                phase4_completed = MAX(phase4_completed, COALESCE(?, phase4_completed)),
                phase4_score = COALESCE(?, phase4_score),
                phase5_completed = MAX(phase5_completed, COALESCE(?, phase5_completed)),
                phase5_score = COALESCE(?, phase5_score),
                phase6_completed = MAX(phase6_completed, COALESCE(?, phase6_completed)),
                phase6_location_answer = COALESCE(?, phase6_location_answer),
                updated_at = ?
            WHERE id = ?"#,
        )
        .bind(patch.current_phase.map(i64::from))
        .bind(patch.phase1.completed.map(|b| b as i32))
        .bind(&patch.phase1.ai_prompt)
        .bind(&patch.phase1.drive_link)
        .bind(patch.phase2.completed.map(|b| b as i32))
        .bind(patch.phase2.score.map(i64::from))
        .bind(patch.phase3.completed.map(|b| b as i32))
        .bind(patch.phase3.score.map(i64::from))
        .bind(patch.phase4.completed.map(|b| b as i32))
        .bind(patch.phase4.score.map(i64::from))
        .bind(patch.phase5.completed.map(|b| b as i32))
        .bind(patch.phase5.score.map(i64::from))
        .bind(patch.phase6.completed.map(|b| b as i32))
        .bind(&patch.phase6.location_answer)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Team {} not found", id)));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))
    }

    async fn list_all(&self) -> Result<Vec<Team>, AppError> {
        let rows = sqlx::query(&format!("SELECT {} FROM teams ORDER BY rowid", TEAM_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(team_from_row).collect()
    }

    async fn list_completed(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AppError> {
        let rows = sqlx::query(
            "SELECT id, team_name, team_leader FROM teams \
             WHERE phase6_completed = 1 ORDER BY rowid LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| LeaderboardEntry {
                team_id: row.get("id"),
                team_name: row.get("team_name"),
                team_leader: row.get("team_leader"),
            })
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM teams")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// Helper functions for row conversion

fn team_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Team, AppError> {
    let theme_str: String = row.get("theme");
    let theme = Theme::parse(&theme_str)
        .ok_or_else(|| AppError::Internal(format!("Unknown theme stored: {}", theme_str)))?;
    let members_str: String = row.get("team_members");
    let current_phase: i64 = row.get("current_phase");

    Ok(Team {
        team_id: row.get("id"),
        team_name: row.get("team_name"),
        team_leader: row.get("team_leader"),
        team_members: parse_json_array(&members_str),
        email: row.get("email"),
        theme,
        phase1: PromptPhase {
            completed: flag(row, "phase1_completed"),
            ai_prompt: row.get("phase1_ai_prompt"),
            drive_link: row.get("phase1_drive_link"),
        },
        phase2: phase_record(row, "phase2"),
        phase3: phase_record(row, "phase3"),
        phase4: phase_record(row, "phase4"),
        phase5: phase_record(row, "phase5"),
        phase6: LocationPhase {
            completed: flag(row, "phase6_completed"),
            location_answer: row.get("phase6_location_answer"),
        },
        current_phase: u8::try_from(current_phase)
            .ok()
            .filter(|p| (1..=FINAL_PHASE).contains(p))
            .ok_or_else(|| {
                AppError::Internal(format!("Invalid phase stored: {}", current_phase))
            })?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn flag(row: &sqlx::sqlite::SqliteRow, column: &str) -> bool {
    let value: i32 = row.get(column);
    value != 0
}

fn phase_record(row: &sqlx::sqlite::SqliteRow, prefix: &str) -> PhaseRecord {
    let score: Option<i64> = row.get(format!("{}_score", prefix).as_str());
    PhaseRecord {
        completed: flag(row, &format!("{}_completed", prefix)),
        score: score.and_then(|s| u32::try_from(s).ok()),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
