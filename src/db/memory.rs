//! Volatile team store kept in process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::TeamStore;
use crate::errors::AppError;
use crate::models::{LeaderboardEntry, Team, TeamPatch};

#[derive(Default)]
struct Inner {
    teams: HashMap<String, Team>,
    /// IDs in insertion order, for stable listing.
    order: Vec<String>,
}

/// In-memory team store. Lives as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "In-Memory"
    }

    async fn create(&self, team: &Team) -> Result<(), AppError> {
        let mut inner = self.inner.write().await;
        if inner.teams.contains_key(&team.team_id) {
            return Err(AppError::DuplicateId(format!(
                "Team {} already exists",
                team.team_id
            )));
        }
        inner.order.push(team.team_id.clone());
        inner.teams.insert(team.team_id.clone(), team.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Team>, AppError> {
        Ok(self.inner.read().await.teams.get(id).cloned())
    }

    async fn get_by_name(&self, normalized_name: &str) -> Result<Option<Team>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .teams
            .values()
            .find(|t| t.team_name == normalized_name)
            .cloned())
    }

    async fn merge(&self, id: &str, patch: &TeamPatch) -> Result<Team, AppError> {
        let mut inner = self.inner.write().await;
        let team = inner
            .teams
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Team {} not found", id)))?;
        team.apply(patch, &Utc::now().to_rfc3339());
        Ok(team.clone())
    }

    async fn list_all(&self) -> Result<Vec<Team>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.teams.get(id).cloned())
            .collect())
    }

    async fn list_completed(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, AppError> {
        let inner = self.inner.read().await;
        Ok(inner
            .order
            .iter()
            .filter_map(|id| inner.teams.get(id))
            .filter(|t| t.finished_hunt())
            .take(limit)
            .map(LeaderboardEntry::from)
            .collect())
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let mut inner = self.inner.write().await;
        let existed = inner.teams.remove(id).is_some();
        if existed {
            inner.order.retain(|existing| existing != id);
        }
        Ok(existed)
    }

    async fn clear(&self) -> Result<u64, AppError> {
        let mut inner = self.inner.write().await;
        let removed = inner.teams.len() as u64;
        inner.teams.clear();
        inner.order.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures, Phase};

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryStore::new();
        store.create(&fixtures::team("TEAM_1", "owls")).await.unwrap();

        assert!(store.get_by_id("TEAM_1").await.unwrap().is_some());
        assert_eq!(
            store.get_by_name("owls").await.unwrap().unwrap().team_id,
            "TEAM_1"
        );
        assert!(store.get_by_name("hawks").await.unwrap().is_none());
        assert!(store.get_by_id("TEAM_2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let store = MemoryStore::new();
        store.create(&fixtures::team("TEAM_1", "owls")).await.unwrap();
        let err = store
            .create(&fixtures::team("TEAM_1", "hawks"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicateId(_)));
    }

    #[tokio::test]
    async fn test_merge_unknown_team() {
        let store = MemoryStore::new();
        let err = store
            .merge("nope", &TeamPatch::complete(Phase::Prompt))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_completed_listing_respects_order_and_limit() {
        let store = MemoryStore::new();
        for i in 0..14 {
            let mut team = fixtures::team(&format!("TEAM_{}", i), &format!("team {}", i));
            team.phase6.completed = i % 7 != 3;
            store.create(&team).await.unwrap();
        }

        let board = store.list_completed(10).await.unwrap();
        assert_eq!(board.len(), 10);
        assert_eq!(board[0].team_id, "TEAM_0");
        assert!(board.iter().all(|e| e.team_id != "TEAM_3"));
        assert_eq!(board[3].team_id, "TEAM_4");
    }

    #[tokio::test]
    async fn test_delete_and_clear() {
        let store = MemoryStore::new();
        store.create(&fixtures::team("TEAM_1", "owls")).await.unwrap();
        store.create(&fixtures::team("TEAM_2", "hawks")).await.unwrap();

        assert!(store.delete("TEAM_1").await.unwrap());
        assert!(!store.delete("TEAM_1").await.unwrap());
        assert_eq!(store.list_all().await.unwrap().len(), 1);

        assert_eq!(store.clear().await.unwrap(), 1);
        assert!(store.list_all().await.unwrap().is_empty());
    }
}
