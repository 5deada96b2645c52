use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Skill or difficulty level on a total order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    /// Parses a level tag. Unrecognized tags yield `None`; callers treat
    /// those permissively rather than rejecting the content.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_lowercase().as_str() {
            "beginner" => Some(SkillLevel::Beginner),
            "intermediate" => Some(SkillLevel::Intermediate),
            "advanced" => Some(SkillLevel::Advanced),
            _ => None,
        }
    }

    /// Position in the beginner < intermediate < advanced order
    pub fn index(&self) -> u8 {
        match self {
            SkillLevel::Beginner => 0,
            SkillLevel::Intermediate => 1,
            SkillLevel::Advanced => 2,
        }
    }

    /// Whether content at this level suits a user at `user_level`: same
    /// level or exactly one step harder.
    pub fn is_appropriate_for(&self, user_level: SkillLevel) -> bool {
        self.index() <= user_level.index() + 1
    }
}

/// A user's learning preferences and goals
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserPreferences {
    /// Owning user
    pub user_id: Uuid,
    /// Learning domains the user cares about (e.g., "AI", "Web Development")
    pub learning_domains: Vec<String>,
    /// Self-reported skill level per domain (e.g., {"AI": "beginner"})
    pub skill_levels: HashMap<String, String>,
    /// Preferred content-type tags (e.g., "video", "article", "paper")
    pub preferred_content_types: Vec<String>,
    /// Free-form time constraints (e.g., {"max_duration": 30})
    pub time_constraints: HashMap<String, serde_json::Value>,
    /// Ordered language codes, most preferred first
    pub language_preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserPreferences {
    /// Creates empty preferences for a user
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            learning_domains: Vec::new(),
            skill_levels: HashMap::new(),
            preferred_content_types: Vec::new(),
            time_constraints: HashMap::new(),
            language_preferences: vec!["en".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    /// Adds a learning domain with an optional skill level
    pub fn add_domain(&mut self, domain: impl Into<String>, level: Option<SkillLevel>) {
        let domain = domain.into();
        if let Some(level) = level {
            let tag = serde_json::to_value(level)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            self.skill_levels.insert(domain.clone(), tag);
        }
        if !self.learning_domains.contains(&domain) {
            self.learning_domains.push(domain);
        }
        self.updated_at = Utc::now();
    }

    /// Parsed skill level for a domain, `None` when unset or unrecognized
    pub fn skill_level_for(&self, domain: &str) -> Option<SkillLevel> {
        self.skill_levels
            .get(domain)
            .and_then(|tag| SkillLevel::from_tag(tag))
    }

    /// Whether the user listed this domain as a learning goal
    pub fn prefers_domain(&self, domain: &str) -> bool {
        self.learning_domains.iter().any(|d| d == domain)
    }

    /// Whether the user listed this content type as preferred
    pub fn prefers_content_type(&self, content_type: &str) -> bool {
        self.preferred_content_types
            .iter()
            .any(|t| t == content_type)
    }
}
