/// Storage collaborator contracts
///
/// The engine reads preferences, interaction history, and the approved
/// catalog through these traits and writes shown recommendations back
/// through the recommendation log. Implementations are external (typically
/// database-backed); `memory` provides an in-process implementation used by
/// tests and embedders without a database.
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{ContentItem, RecommendationRecord, UserInteraction, UserPreferences};

pub mod memory;

pub use memory::InMemoryStore;

/// Per-user learning preferences
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Preferences for a user, `None` when the user never saved any
    async fn get_preferences(&self, user_id: Uuid) -> AppResult<Option<UserPreferences>>;

    /// Creates or replaces a user's preferences
    async fn upsert_preferences(&self, preferences: UserPreferences) -> AppResult<()>;
}

/// Time-ordered log of user actions on content
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// All interactions for a user, oldest first. Never absent; a user with
    /// no history yields an empty list.
    async fn get_interactions(&self, user_id: Uuid) -> AppResult<Vec<UserInteraction>>;

    /// Appends one interaction
    async fn record_interaction(&self, interaction: UserInteraction) -> AppResult<()>;
}

/// Approved content catalog
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// The full approved candidate pool in stable encounter order. The
    /// engine never filters by status itself.
    async fn get_approved_candidates(&self) -> AppResult<Vec<ContentItem>>;

    /// Resolve content items by id, preserving the order of `ids`; unknown
    /// ids are silently skipped
    async fn get_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<ContentItem>>;

    /// Creates or replaces a content item
    async fn upsert_item(&self, item: ContentItem) -> AppResult<()>;
}

/// Write-side log of shown recommendations and their feedback
#[async_trait::async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Persists one generation batch
    async fn store_batch(&self, records: Vec<RecommendationRecord>) -> AppResult<()>;

    /// One recommendation, scoped to its owning user
    async fn get(
        &self,
        user_id: Uuid,
        recommendation_id: Uuid,
    ) -> AppResult<Option<RecommendationRecord>>;

    /// Replaces a previously stored recommendation (feedback updates)
    async fn update(&self, record: RecommendationRecord) -> AppResult<()>;

    /// Newest-first page of a user's log plus the total count
    async fn history(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> AppResult<(Vec<RecommendationRecord>, usize)>;
}
