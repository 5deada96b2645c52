use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// OpenAI-compatible API key
    pub openai_api_key: String,

    /// OpenAI-compatible API base URL
    #[serde(default = "default_openai_api_url")]
    pub openai_api_url: String,

    /// Chat model used for explanation generation
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Embedding model name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Minimum score a candidate must reach to be recommended
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: f64,

    /// How many recent interactions feed the interest vector
    #[serde(default = "default_recent_interest_window")]
    pub recent_interest_window: usize,

    /// Hard cap on recommendations per request
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,

    /// Feed cache TTL in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_openai_api_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_min_score_threshold() -> f64 {
    0.3
}

fn default_recent_interest_window() -> usize {
    5
}

fn default_max_recommendations() -> usize {
    50
}

fn default_cache_ttl_secs() -> u64 {
    3600
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_tuning() {
        assert_eq!(default_min_score_threshold(), 0.3);
        assert_eq!(default_recent_interest_window(), 5);
        assert_eq!(default_max_recommendations(), 50);
        assert_eq!(default_cache_ttl_secs(), 3600);
    }
}
