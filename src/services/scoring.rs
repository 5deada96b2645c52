use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::math;
use crate::models::{
    ContentItem, ExplanationFactors, ScoredRecommendation, SkillLevel, UserInteraction,
    UserPreferences,
};

// Score weights for algorithm v1.0. Factors accumulate additively, then the
// repetition penalty halves the running score, then popularity and
// similarity are added, then the result is clamped to [0, 1].
const DOMAIN_MATCH_BOOST: f64 = 0.20;
const SKILL_EXACT_BOOST: f64 = 0.15;
const SKILL_APPROPRIATE_BOOST: f64 = 0.10;
const CONTENT_TYPE_BOOST: f64 = 0.10;
const REPEAT_PENALTY_FACTOR: f64 = 0.5;
const POPULARITY_BOOST_PER_INTERACTION: f64 = 0.05;
const POPULARITY_BOOST_CAP: f64 = 0.05;
const SIMILARITY_WEIGHT: f64 = 0.5;

/// Constant difficulty factor attached to every scored recommendation
const DIFFICULTY_APPROPRIATENESS_FACTOR: f64 = 0.6;

/// Placeholder score assigned on the no-preferences fallback path
const FALLBACK_SCORE: f64 = 0.5;

/// Default minimum score a candidate must reach to be recommended
pub const DEFAULT_MIN_SCORE: f64 = 0.3;

/// Default number of recent interactions feeding the interest vector
pub const DEFAULT_INTEREST_WINDOW: usize = 5;

/// Builds the user's recent-interest vector: the mean embedding of the
/// content referenced by the most recent `window` interaction records.
///
/// Interactions whose content is unknown or carries no embedding are
/// skipped; they still consume a slot in the window. Returns `None` when no
/// usable embedding remains.
pub fn build_interest_vector(
    history: &[UserInteraction],
    content_by_id: &HashMap<Uuid, ContentItem>,
    window: usize,
) -> Option<Vec<f32>> {
    let mut recent: Vec<&UserInteraction> = history.iter().collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let embeddings = recent
        .iter()
        .take(window)
        .filter_map(|interaction| content_by_id.get(&interaction.content_id))
        .filter_map(|content| content.embedding.as_deref())
        .filter(|embedding| !embedding.is_empty());

    math::mean_vector(embeddings)
}

/// Scores a candidate pool against one user's preferences and history
///
/// Pure and deterministic: no I/O, no provider calls. Inputs are an
/// immutable snapshot supplied by the caller; compute and persist are
/// separate concerns.
pub struct RecommendationScorer<'a> {
    preferences: Option<&'a UserPreferences>,
    history: &'a [UserInteraction],
    interest_vector: Option<&'a [f32]>,
    min_score: f64,
}

impl<'a> RecommendationScorer<'a> {
    /// Creates a scorer over an immutable snapshot of user state
    pub fn new(
        preferences: Option<&'a UserPreferences>,
        history: &'a [UserInteraction],
        interest_vector: Option<&'a [f32]>,
    ) -> Self {
        Self {
            preferences,
            history,
            interest_vector,
            min_score: DEFAULT_MIN_SCORE,
        }
    }

    /// Overrides the minimum score threshold
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    /// Scores, thresholds, and ranks the candidate pool
    ///
    /// Returns at most `limit` recommendations, sorted by descending score
    /// with ties kept in pool encounter order. With no stored preferences
    /// the fallback path returns up to `limit` candidates at the placeholder
    /// score with no threshold applied.
    pub fn rank(&self, pool: &[ContentItem], limit: usize) -> Vec<ScoredRecommendation> {
        let Some(preferences) = self.preferences else {
            return Self::fallback(pool, limit);
        };

        let mut scored: Vec<ScoredRecommendation> = pool
            .iter()
            .map(|candidate| self.score_candidate(preferences, candidate))
            .filter(|rec| rec.score >= self.min_score)
            .collect();

        // Stable sort: equal scores keep pool encounter order
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// No-preferences path: unscored popular content, never an error
    fn fallback(pool: &[ContentItem], limit: usize) -> Vec<ScoredRecommendation> {
        pool.iter()
            .take(limit)
            .map(|candidate| ScoredRecommendation {
                content_id: candidate.id,
                score: FALLBACK_SCORE,
                factors: ExplanationFactors::fallback(),
                explanation: None,
            })
            .collect()
    }

    fn score_candidate(
        &self,
        preferences: &UserPreferences,
        candidate: &ContentItem,
    ) -> ScoredRecommendation {
        let mut score = 0.0;
        let mut factors = ExplanationFactors::default();

        // Domain match
        if candidate.covers_any_topic(&preferences.learning_domains) {
            score += DOMAIN_MATCH_BOOST;
            factors.domain_match = Some(DOMAIN_MATCH_BOOST);
        }

        // Skill-level match, once per candidate topic the user has rated
        for topic in &candidate.topics {
            if let Some(user_tag) = preferences.skill_levels.get(topic) {
                score += skill_boost(user_tag, candidate.difficulty_level.as_deref());
            }
        }

        // Content-type preference
        if preferences.prefers_content_type(&candidate.content_type) {
            score += CONTENT_TYPE_BOOST;
            factors.content_type_match = Some(CONTENT_TYPE_BOOST);
        }

        // Repetition penalty, applied before popularity and similarity
        let seen_count = self
            .history
            .iter()
            .filter(|i| i.content_id == candidate.id)
            .count();
        if seen_count > 0 {
            score *= REPEAT_PENALTY_FACTOR;
        }

        // Popularity boost, capped at one interaction's worth
        score += (seen_count as f64 * POPULARITY_BOOST_PER_INTERACTION).min(POPULARITY_BOOST_CAP);

        // Embedding similarity against the recent-interest vector
        if let (Some(interest), Some(embedding)) =
            (self.interest_vector, candidate.embedding.as_deref())
        {
            if embedding.len() == interest.len() {
                let similarity = f64::from(math::cosine_similarity(interest, embedding));
                score += similarity * SIMILARITY_WEIGHT;
                factors.vector_similarity = Some(similarity);
            } else {
                tracing::warn!(
                    content_id = %candidate.id,
                    expected = interest.len(),
                    actual = embedding.len(),
                    "Skipping similarity term for malformed embedding"
                );
            }
        }

        factors.difficulty_appropriateness = Some(DIFFICULTY_APPROPRIATENESS_FACTOR);
        factors.reason = Some(primary_reason(preferences, candidate));

        ScoredRecommendation {
            content_id: candidate.id,
            score: score.clamp(0.0, 1.0),
            factors,
            explanation: None,
        }
    }
}

/// Skill contribution for one topic the user has rated.
///
/// Exact level match earns the full boost; content at the user's level or
/// one step harder earns the reduced boost. Unrecognized or absent level
/// tags are treated as appropriate rather than rejected.
fn skill_boost(user_tag: &str, candidate_tag: Option<&str>) -> f64 {
    let user_level = SkillLevel::from_tag(user_tag);
    let candidate_level = candidate_tag.and_then(SkillLevel::from_tag);

    match (user_level, candidate_level) {
        (Some(user), Some(candidate)) if user == candidate => SKILL_EXACT_BOOST,
        (Some(user), Some(candidate)) if candidate.is_appropriate_for(user) => {
            SKILL_APPROPRIATE_BOOST
        }
        (Some(_), Some(_)) => 0.0,
        _ => SKILL_APPROPRIATE_BOOST,
    }
}

/// Primary human-readable reason: matching domain, else matching content
/// type, else generic popularity.
fn primary_reason(preferences: &UserPreferences, candidate: &ContentItem) -> String {
    if let Some(domain) = preferences
        .learning_domains
        .iter()
        .find(|d| candidate.topics.contains(d))
    {
        return format!("Matches your interest in {}", domain);
    }

    if preferences.prefers_content_type(&candidate.content_type) {
        return format!("Matches your preferred {} content", candidate.content_type);
    }

    "Popular content".to_string()
}
