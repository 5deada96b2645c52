use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{
    ContentItem, ContentStatus, RecommendationRecord, UserInteraction, UserPreferences,
};
use crate::stores::{ContentStore, InteractionStore, PreferenceStore, RecommendationStore};

/// In-memory implementation of all store contracts
///
/// Content is kept in insertion order so the candidate pool has a stable
/// encounter order across calls, which the engine's tie-break relies on.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    preferences: HashMap<Uuid, UserPreferences>,
    interactions: HashMap<Uuid, Vec<UserInteraction>>,
    content: Vec<ContentItem>,
    recommendations: HashMap<Uuid, Vec<RecommendationRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored content items, regardless of status
    pub async fn content_len(&self) -> usize {
        self.inner.read().await.content.len()
    }
}

#[async_trait::async_trait]
impl PreferenceStore for InMemoryStore {
    async fn get_preferences(&self, user_id: Uuid) -> AppResult<Option<UserPreferences>> {
        let inner = self.inner.read().await;
        Ok(inner.preferences.get(&user_id).cloned())
    }

    async fn upsert_preferences(&self, preferences: UserPreferences) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner.preferences.insert(preferences.user_id, preferences);
        Ok(())
    }
}

#[async_trait::async_trait]
impl InteractionStore for InMemoryStore {
    async fn get_interactions(&self, user_id: Uuid) -> AppResult<Vec<UserInteraction>> {
        let inner = self.inner.read().await;
        let mut interactions = inner.interactions.get(&user_id).cloned().unwrap_or_default();
        interactions.sort_by_key(|i| i.created_at);
        Ok(interactions)
    }

    async fn record_interaction(&self, interaction: UserInteraction) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        inner
            .interactions
            .entry(interaction.user_id)
            .or_default()
            .push(interaction);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ContentStore for InMemoryStore {
    async fn get_approved_candidates(&self) -> AppResult<Vec<ContentItem>> {
        let inner = self.inner.read().await;
        Ok(inner
            .content
            .iter()
            .filter(|c| c.status == ContentStatus::Approved)
            .cloned()
            .collect())
    }

    async fn get_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<ContentItem>> {
        let inner = self.inner.read().await;
        let by_id: HashMap<Uuid, &ContentItem> =
            inner.content.iter().map(|c| (c.id, c)).collect();
        Ok(ids
            .iter()
            .filter_map(|id| by_id.get(id).map(|c| (*c).clone()))
            .collect())
    }

    async fn upsert_item(&self, item: ContentItem) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.content.iter_mut().find(|c| c.id == item.id) {
            *existing = item;
        } else {
            inner.content.push(item);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl RecommendationStore for InMemoryStore {
    async fn store_batch(&self, records: Vec<RecommendationRecord>) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        for record in records {
            inner
                .recommendations
                .entry(record.user_id)
                .or_default()
                .push(record);
        }
        Ok(())
    }

    async fn get(
        &self,
        user_id: Uuid,
        recommendation_id: Uuid,
    ) -> AppResult<Option<RecommendationRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .recommendations
            .get(&user_id)
            .and_then(|records| records.iter().find(|r| r.id == recommendation_id))
            .cloned())
    }

    async fn update(&self, record: RecommendationRecord) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let records = inner
            .recommendations
            .get_mut(&record.user_id)
            .ok_or_else(|| AppError::NotFound("Recommendation not found".to_string()))?;

        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(AppError::NotFound("Recommendation not found".to_string())),
        }
    }

    async fn history(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> AppResult<(Vec<RecommendationRecord>, usize)> {
        let inner = self.inner.read().await;
        let records = inner.recommendations.get(&user_id);
        let total = records.map(|r| r.len()).unwrap_or(0);

        let mut page: Vec<RecommendationRecord> = records
            .map(|r| r.iter().cloned().collect::<Vec<_>>())
            .unwrap_or_default();
        page.sort_by(|a, b| b.shown_at.cmp(&a.shown_at));

        Ok((page.into_iter().skip(offset).take(limit).collect(), total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExplanationFactors, InteractionType, ScoredRecommendation};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_preferences_round_trip() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();

        assert!(store.get_preferences(user_id).await.unwrap().is_none());

        let prefs = UserPreferences::new(user_id);
        store.upsert_preferences(prefs.clone()).await.unwrap();
        assert_eq!(store.get_preferences(user_id).await.unwrap(), Some(prefs));
    }

    #[tokio::test]
    async fn test_interactions_ordered_oldest_first() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let newer = UserInteraction::new(user_id, Uuid::new_v4(), InteractionType::View)
            .with_created_at(now);
        let older = UserInteraction::new(user_id, Uuid::new_v4(), InteractionType::Like)
            .with_created_at(now - Duration::hours(1));

        store.record_interaction(newer.clone()).await.unwrap();
        store.record_interaction(older.clone()).await.unwrap();

        let interactions = store.get_interactions(user_id).await.unwrap();
        assert_eq!(interactions, vec![older, newer]);
    }

    #[tokio::test]
    async fn test_approved_candidates_filters_and_keeps_order() {
        let store = InMemoryStore::new();
        let first = ContentItem::new("first", "video", "youtube").approved();
        let pending = ContentItem::new("pending", "video", "youtube");
        let second = ContentItem::new("second", "article", "arxiv").approved();

        store.upsert_item(first.clone()).await.unwrap();
        store.upsert_item(pending).await.unwrap();
        store.upsert_item(second.clone()).await.unwrap();

        let approved = store.get_approved_candidates().await.unwrap();
        assert_eq!(approved, vec![first, second]);
    }

    #[tokio::test]
    async fn test_get_by_ids_preserves_requested_order() {
        let store = InMemoryStore::new();
        let a = ContentItem::new("a", "video", "youtube").approved();
        let b = ContentItem::new("b", "video", "youtube").approved();
        store.upsert_item(a.clone()).await.unwrap();
        store.upsert_item(b.clone()).await.unwrap();

        let items = store
            .get_by_ids(&[b.id, Uuid::new_v4(), a.id])
            .await
            .unwrap();
        assert_eq!(items, vec![b, a]);
    }

    #[tokio::test]
    async fn test_recommendation_feedback_update() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();
        let scored = ScoredRecommendation {
            content_id: Uuid::new_v4(),
            score: 0.5,
            factors: ExplanationFactors::fallback(),
            explanation: None,
        };
        let record = RecommendationRecord::from_scored(user_id, &scored, "v1.0");
        store.store_batch(vec![record.clone()]).await.unwrap();

        let mut updated = record.clone();
        updated.feedback_rating = Some(5);
        store.update(updated).await.unwrap();

        let fetched = store.get(user_id, record.id).await.unwrap().unwrap();
        assert_eq!(fetched.feedback_rating, Some(5));
    }

    #[tokio::test]
    async fn test_update_unknown_recommendation_is_not_found() {
        let store = InMemoryStore::new();
        let scored = ScoredRecommendation {
            content_id: Uuid::new_v4(),
            score: 0.5,
            factors: ExplanationFactors::default(),
            explanation: None,
        };
        let record = RecommendationRecord::from_scored(Uuid::new_v4(), &scored, "v1.0");
        let err = store.update(record).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_history_pages_newest_first() {
        let store = InMemoryStore::new();
        let user_id = Uuid::new_v4();

        let mut records = Vec::new();
        for i in 0..3 {
            let scored = ScoredRecommendation {
                content_id: Uuid::new_v4(),
                score: 0.5,
                factors: ExplanationFactors::default(),
                explanation: None,
            };
            let mut record = RecommendationRecord::from_scored(user_id, &scored, "v1.0");
            record.shown_at = Utc::now() - Duration::minutes(i);
            records.push(record);
        }
        store.store_batch(records.clone()).await.unwrap();

        let (page, total) = store.history(user_id, 2, 0).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(page.len(), 2);
        // records[0] has the latest shown_at
        assert_eq!(page[0].id, records[0].id);

        let (rest, _) = store.history(user_id, 2, 2).await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, records[2].id);
    }
}
