//! Read-only aggregate views over the team store.

use crate::db::TeamStore;
use crate::errors::AppError;
use crate::models::{LeaderboardEntry, Phase, PhaseStats, StatsResponse, Team};

/// Leaderboard size.
pub const LEADERBOARD_LIMIT: usize = 10;

/// First finishers in store order. Not ranked by score.
pub async fn leaderboard(store: &dyn TeamStore) -> Result<Vec<LeaderboardEntry>, AppError> {
    store.list_completed(LEADERBOARD_LIMIT).await
}

pub async fn stats(store: &dyn TeamStore) -> Result<StatsResponse, AppError> {
    let teams = store.list_all().await?;
    Ok(tally(&teams))
}

fn tally(teams: &[Team]) -> StatsResponse {
    let count = |phase: Phase| teams.iter().filter(|t| t.is_completed(phase)).count() as u64;

    StatsResponse {
        total_teams: teams.len() as u64,
        phase_stats: PhaseStats {
            phase1: count(Phase::Prompt),
            phase2: count(Phase::Quiz),
            phase3: count(Phase::CodeReading),
            phase4: count(Phase::Debugging),
            phase5: count(Phase::Riddles),
            phase6: count(Phase::Location),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::models::fixtures;

    #[test]
    fn test_tally_counts_each_phase() {
        let mut a = fixtures::team("TEAM_A", "a");
        a.phase1.completed = true;
        a.phase2.completed = true;
        let mut b = fixtures::team("TEAM_B", "b");
        b.phase1.completed = true;
        let c = fixtures::team("TEAM_C", "c");

        let stats = tally(&[a, b, c]);
        assert_eq!(stats.total_teams, 3);
        assert_eq!(
            stats.phase_stats,
            PhaseStats {
                phase1: 2,
                phase2: 1,
                ..PhaseStats::default()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        assert_eq!(stats(&store).await.unwrap(), StatsResponse::default());
        assert!(leaderboard(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_leaderboard_caps_at_ten_finishers() {
        let store = MemoryStore::new();
        for i in 0..12 {
            let mut team = fixtures::team(&format!("TEAM_{}", i), &format!("team {}", i));
            team.phase6.completed = true;
            team.current_phase = 7;
            store.create(&team).await.unwrap();
        }
        store
            .create(&fixtures::team("TEAM_X", "unfinished"))
            .await
            .unwrap();

        let board = leaderboard(&store).await.unwrap();
        assert_eq!(board.len(), LEADERBOARD_LIMIT);
        assert!(board.iter().all(|e| e.team_id != "TEAM_X"));
    }
}
