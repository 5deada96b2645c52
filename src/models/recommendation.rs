use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Structured breakdown of why a recommendation scored as it did.
///
/// Only factors that actually contributed are set; absent factors are
/// omitted from the serialized form entirely.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExplanationFactors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_appropriateness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vector_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    /// Primary human-readable reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ExplanationFactors {
    /// Factors attached to fallback recommendations when no preferences exist
    pub fn fallback() -> Self {
        Self {
            popularity: Some(0.5),
            reason: Some("Popular content".to_string()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A scored recommendation produced by the engine for one content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredRecommendation {
    pub content_id: Uuid,
    /// Final score in [0, 1]
    pub score: f64,
    pub factors: ExplanationFactors,
    /// Free-text explanation, absent when the provider is unavailable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// Feedback tags a user may attach to a shown recommendation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackType {
    Helpful,
    NotHelpful,
    Irrelevant,
    AlreadySeen,
    NotInterested,
}

/// A recommendation as persisted in the recommendation log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub score: f64,
    pub factors: ExplanationFactors,
    pub algorithm_version: String,
    pub shown_at: DateTime<Utc>,
    pub clicked_at: Option<DateTime<Utc>>,
    pub feedback_rating: Option<u8>,
    pub feedback_type: Option<FeedbackType>,
}

impl RecommendationRecord {
    pub fn from_scored(
        user_id: Uuid,
        scored: &ScoredRecommendation,
        algorithm_version: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content_id: scored.content_id,
            score: scored.score,
            factors: scored.factors.clone(),
            algorithm_version: algorithm_version.into(),
            shown_at: Utc::now(),
            clicked_at: None,
            feedback_rating: None,
            feedback_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_factors_shape() {
        let factors = ExplanationFactors::fallback();
        let json = serde_json::to_value(&factors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"popularity": 0.5, "reason": "Popular content"})
        );
    }

    #[test]
    fn test_unfired_factors_are_omitted() {
        let factors = ExplanationFactors {
            domain_match: Some(0.2),
            difficulty_appropriateness: Some(0.6),
            ..Default::default()
        };
        let json = serde_json::to_value(&factors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"domain_match": 0.2, "difficulty_appropriateness": 0.6})
        );
    }

    #[test]
    fn test_default_factors_are_empty() {
        assert!(ExplanationFactors::default().is_empty());
        assert!(!ExplanationFactors::fallback().is_empty());
    }

    #[test]
    fn test_feedback_type_serialization() {
        let json = serde_json::to_string(&FeedbackType::NotInterested).unwrap();
        assert_eq!(json, "\"not_interested\"");
    }

    #[test]
    fn test_record_from_scored() {
        let user_id = Uuid::new_v4();
        let scored = ScoredRecommendation {
            content_id: Uuid::new_v4(),
            score: 0.45,
            factors: ExplanationFactors {
                domain_match: Some(0.2),
                ..Default::default()
            },
            explanation: None,
        };

        let record = RecommendationRecord::from_scored(user_id, &scored, "v1.0");
        assert_eq!(record.user_id, user_id);
        assert_eq!(record.content_id, scored.content_id);
        assert_eq!(record.score, 0.45);
        assert_eq!(record.algorithm_version, "v1.0");
        assert!(record.feedback_rating.is_none());
    }
}
