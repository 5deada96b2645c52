use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Embedding width produced by the text-embedding model
pub const EMBEDDING_DIMENSIONS: usize = 1536;

/// Moderation status of a content item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Pending,
    Approved,
    Rejected,
}

/// An approved content item eligible for recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentItem {
    /// Unique identifier for the item
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Content-type tag (e.g., "video", "article", "paper")
    pub content_type: String,
    /// Origin of the item (e.g., "youtube", "arxiv", "upload")
    pub source: String,
    pub url: Option<String>,
    pub duration_minutes: Option<u32>,
    /// Difficulty tag, compared against user skill levels when recognized
    pub difficulty_level: Option<String>,
    /// Topic tags used for domain matching
    pub topics: Vec<String>,
    pub language: String,
    /// Semantic embedding of title + description, absent until processed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// Creates a new content item with no embedding
    pub fn new(
        title: impl Into<String>,
        content_type: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            content_type: content_type.into(),
            source: source.into(),
            url: None,
            duration_minutes: None,
            difficulty_level: None,
            topics: Vec::new(),
            language: "en".to_string(),
            embedding: None,
            status: ContentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn approved(mut self) -> Self {
        self.status = ContentStatus::Approved;
        self
    }

    pub fn with_topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    pub fn with_difficulty(mut self, level: impl Into<String>) -> Self {
        self.difficulty_level = Some(level.into());
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Whether the item carries a well-formed embedding
    pub fn has_valid_embedding(&self) -> bool {
        self.embedding
            .as_ref()
            .is_some_and(|e| e.len() == EMBEDDING_DIMENSIONS)
    }

    /// Whether any of the given topic tags appears on this item
    pub fn covers_any_topic<'a, I>(&self, topics: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        topics.into_iter().any(|t| self.topics.contains(t))
    }
}
