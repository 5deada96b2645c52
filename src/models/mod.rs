pub mod content;
pub mod interaction;
pub mod preferences;
pub mod recommendation;

pub use content::{ContentItem, ContentStatus, EMBEDDING_DIMENSIONS};
pub use interaction::{InteractionType, UserInteraction};
pub use preferences::{SkillLevel, UserPreferences};
pub use recommendation::{
    ExplanationFactors, FeedbackType, RecommendationRecord, ScoredRecommendation,
};
