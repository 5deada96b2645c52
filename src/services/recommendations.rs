use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::{
    cache::{Cache, CacheKey},
    cached,
    config::Config,
    error::{AppError, AppResult},
    models::{ContentItem, FeedbackType, RecommendationRecord, ScoredRecommendation},
    providers::ExplanationProvider,
    services::scoring::{build_interest_vector, RecommendationScorer},
    stores::{ContentStore, InteractionStore, PreferenceStore, RecommendationStore},
};

/// Version tag stamped on every persisted recommendation
pub const ALGORITHM_VERSION: &str = "v1.0";

/// Generates personalized recommendation feeds
///
/// Composes the stores, the pure scorer, the explanation provider, and the
/// feed cache. All collaborators are injected at construction; the service
/// holds no global state and every request works on an immutable snapshot.
pub struct RecommendationService {
    preferences: Arc<dyn PreferenceStore>,
    interactions: Arc<dyn InteractionStore>,
    content: Arc<dyn ContentStore>,
    recommendations: Arc<dyn RecommendationStore>,
    explainer: Arc<dyn ExplanationProvider>,
    cache: Cache,
    config: Config,
}

impl RecommendationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        preferences: Arc<dyn PreferenceStore>,
        interactions: Arc<dyn InteractionStore>,
        content: Arc<dyn ContentStore>,
        recommendations: Arc<dyn RecommendationStore>,
        explainer: Arc<dyn ExplanationProvider>,
        cache: Cache,
        config: Config,
    ) -> Self {
        Self {
            preferences,
            interactions,
            content,
            recommendations,
            explainer,
            cache,
            config,
        }
    }

    /// Generates up to `limit` recommendations for a user
    ///
    /// Serves from the feed cache unless `refresh` is set. A missing
    /// preference record, an empty catalog, a cache outage, or a provider
    /// failure all degrade to a reduced but valid feed; none of them fail
    /// the request.
    pub async fn generate(
        &self,
        user_id: Uuid,
        limit: usize,
        refresh: bool,
    ) -> AppResult<Vec<ScoredRecommendation>> {
        if limit == 0 {
            return Err(AppError::InvalidInput(
                "Recommendation limit must be positive".to_string(),
            ));
        }
        let limit = limit.min(self.config.max_recommendations);
        let key = CacheKey::RecommendationFeed(user_id, limit);

        tracing::info!(user_id = %user_id, limit, refresh, "Generating recommendations");

        if refresh {
            let feed = self.compute_feed(user_id, limit).await?;
            self.cache
                .set_in_background(&key, &feed, self.config.cache_ttl_secs);
            return Ok(feed);
        }

        cached!(
            self.cache,
            key,
            self.config.cache_ttl_secs,
            self.compute_feed(user_id, limit)
        )
    }

    /// Scores the catalog and enriches the surviving candidates
    async fn compute_feed(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> AppResult<Vec<ScoredRecommendation>> {
        let start = Instant::now();

        let preferences = self.preferences.get_preferences(user_id).await?;
        let history = self.interactions.get_interactions(user_id).await?;
        let pool = self.content.get_approved_candidates().await?;

        if pool.is_empty() {
            tracing::info!(user_id = %user_id, "No approved content available");
            return Ok(Vec::new());
        }

        if preferences.is_none() {
            tracing::info!(user_id = %user_id, "No preferences found, serving popular content");
        }

        let interest_vector = self.interest_vector(&history).await;

        let scorer = RecommendationScorer::new(
            preferences.as_ref(),
            &history,
            interest_vector.as_deref(),
        )
        .with_min_score(self.config.min_score_threshold);

        let mut feed = scorer.rank(&pool, limit);

        // The fallback path carries its fixed factors; only scored
        // recommendations get provider explanations.
        if preferences.is_some() {
            self.attach_explanations(&mut feed, &pool).await;
        }

        self.persist(user_id, &feed).await;

        tracing::info!(
            user_id = %user_id,
            count = feed.len(),
            processing_time_ms = start.elapsed().as_millis(),
            "Recommendations generated"
        );

        Ok(feed)
    }

    /// Resolves the recent interaction window's content and averages its
    /// embeddings. Failures skip the similarity term instead of aborting.
    async fn interest_vector(&self, history: &[crate::models::UserInteraction]) -> Option<Vec<f32>> {
        if history.is_empty() {
            return None;
        }

        let mut recent: Vec<_> = history.iter().collect();
        recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let ids: Vec<Uuid> = recent
            .iter()
            .take(self.config.recent_interest_window)
            .map(|i| i.content_id)
            .collect();

        match self.content.get_by_ids(&ids).await {
            Ok(items) => {
                let content_by_id: HashMap<Uuid, ContentItem> =
                    items.into_iter().map(|c| (c.id, c)).collect();
                build_interest_vector(history, &content_by_id, self.config.recent_interest_window)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to resolve recent content, skipping similarity term"
                );
                None
            }
        }
    }

    /// Fans out explanation requests in parallel
    ///
    /// A provider failure for one candidate falls back to the heuristic
    /// reason for that candidate only.
    async fn attach_explanations(&self, feed: &mut [ScoredRecommendation], pool: &[ContentItem]) {
        let by_id: HashMap<Uuid, &ContentItem> = pool.iter().map(|c| (c.id, c)).collect();

        let mut tasks = Vec::new();
        for (idx, rec) in feed.iter().enumerate() {
            let Some(content) = by_id.get(&rec.content_id) else {
                continue;
            };
            let prompt = Self::explanation_prompt(content, &rec.factors);
            let explainer = Arc::clone(&self.explainer);
            tasks.push((
                idx,
                tokio::spawn(async move { explainer.explain(&prompt).await }),
            ));
        }

        for (idx, task) in tasks {
            let fallback = feed[idx].factors.reason.clone();
            match task.await {
                Ok(Ok(text)) => feed[idx].explanation = Some(text),
                Ok(Err(e)) => {
                    tracing::warn!(
                        error = %e,
                        content_id = %feed[idx].content_id,
                        "Explanation provider unavailable, using heuristic reason"
                    );
                    feed[idx].explanation = fallback;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Explanation task join error");
                    feed[idx].explanation = fallback;
                }
            }
        }
    }

    fn explanation_prompt(content: &ContentItem, factors: &crate::models::ExplanationFactors) -> String {
        let reason = factors.reason.as_deref().unwrap_or("Popular content");
        format!(
            "Explain in one or two sentences why \"{}\" ({}) is a good next step \
             for this learner. Base reason: {}. Topics: {}.",
            content.title,
            content.content_type,
            reason,
            content.topics.join(", ")
        )
    }

    /// Logs the shown batch; a log failure never fails the feed
    async fn persist(&self, user_id: Uuid, feed: &[ScoredRecommendation]) {
        if feed.is_empty() {
            return;
        }

        let records: Vec<RecommendationRecord> = feed
            .iter()
            .map(|rec| RecommendationRecord::from_scored(user_id, rec, ALGORITHM_VERSION))
            .collect();

        if let Err(e) = self.recommendations.store_batch(records).await {
            tracing::error!(error = %e, user_id = %user_id, "Failed to log recommendations");
        }
    }

    /// Records user feedback on a previously shown recommendation
    pub async fn record_feedback(
        &self,
        user_id: Uuid,
        recommendation_id: Uuid,
        rating: u8,
        feedback_type: Option<FeedbackType>,
    ) -> AppResult<()> {
        if !(1..=5).contains(&rating) {
            return Err(AppError::InvalidInput(
                "Feedback rating must be between 1 and 5".to_string(),
            ));
        }

        let mut record = self
            .recommendations
            .get(user_id, recommendation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recommendation not found".to_string()))?;

        record.feedback_rating = Some(rating);
        record.feedback_type = feedback_type;
        self.recommendations.update(record).await?;

        tracing::info!(
            user_id = %user_id,
            recommendation_id = %recommendation_id,
            rating,
            "Recommendation feedback recorded"
        );

        Ok(())
    }

    /// Marks a shown recommendation as clicked
    pub async fn record_click(&self, user_id: Uuid, recommendation_id: Uuid) -> AppResult<()> {
        let mut record = self
            .recommendations
            .get(user_id, recommendation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Recommendation not found".to_string()))?;

        record.clicked_at = Some(chrono::Utc::now());
        self.recommendations.update(record).await
    }

    /// Newest-first page of the user's recommendation log with total count
    pub async fn history(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> AppResult<(Vec<RecommendationRecord>, usize)> {
        self.recommendations.history(user_id, limit, offset).await
    }
}
