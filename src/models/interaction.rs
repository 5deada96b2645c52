use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of action a user took on a content item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    View,
    Like,
    Dislike,
    Complete,
    Bookmark,
    Share,
}

impl InteractionType {
    /// Whether the action signals positive interest
    pub fn is_positive(&self) -> bool {
        matches!(
            self,
            InteractionType::Like | InteractionType::Complete | InteractionType::Bookmark
        )
    }
}

/// One user's past action on one content item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInteraction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub interaction_type: InteractionType,
    /// Optional 1-5 rating
    pub rating: Option<u8>,
    pub time_spent_minutes: Option<u32>,
    pub completion_percentage: Option<f32>,
    pub created_at: DateTime<Utc>,
}

impl UserInteraction {
    pub fn new(user_id: Uuid, content_id: Uuid, interaction_type: InteractionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            content_id,
            interaction_type,
            rating: None,
            time_spent_minutes: None,
            completion_percentage: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}
