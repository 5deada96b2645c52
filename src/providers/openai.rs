/// OpenAI-compatible AI provider
///
/// Implements both embedding and explanation generation against an
/// OpenAI-style HTTP API (`/v1/embeddings` and `/v1/chat/completions`).
/// The base URL is configurable so a compatible proxy can stand in.
use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::EMBEDDING_DIMENSIONS,
    providers::{EmbeddingProvider, ExplanationProvider},
};
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

/// Conservative input cap below the embedding model's token limit
const MAX_EMBED_CHARS: usize = 8000;
const EXPLANATION_MAX_TOKENS: u32 = 500;
const EXPLANATION_TEMPERATURE: f32 = 0.7;

const EXPLANATION_SYSTEM_PROMPT: &str = "You are a learning assistant providing personalized \
explanations. Be clear, concise, and adapt your language to the learner's level. Focus on \
practical understanding and real-world applications.";

#[derive(Clone)]
pub struct OpenAiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    llm_model: String,
    embedding_model: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: EmbeddingInput,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

impl OpenAiClient {
    /// Creates a provider from application configuration
    pub fn new(config: &Config) -> Self {
        Self::with_endpoint(
            config.openai_api_key.clone(),
            config.openai_api_url.clone(),
            config.llm_model.clone(),
            config.embedding_model.clone(),
        )
    }

    /// Creates a provider against an explicit endpoint
    pub fn with_endpoint(
        api_key: String,
        api_url: String,
        llm_model: String,
        embedding_model: String,
    ) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            llm_model,
            embedding_model,
        }
    }

    fn truncate(text: &str) -> &str {
        match text.char_indices().nth(MAX_EMBED_CHARS) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }

    fn check_dimensions(embedding: &[f32]) -> AppResult<()> {
        if embedding.len() != EMBEDDING_DIMENSIONS {
            return Err(AppError::ExternalApi(format!(
                "Unexpected embedding dimensions: {}",
                embedding.len()
            )));
        }
        Ok(())
    }

    async fn request_embeddings(&self, input: EmbeddingInput) -> AppResult<Vec<Vec<f32>>> {
        let url = format!("{}/v1/embeddings", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                model: &self.embedding_model,
                input,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Embedding API returned status {}: {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = response.json().await?;

        let embeddings: Vec<Vec<f32>> = parsed.data.into_iter().map(|d| d.embedding).collect();
        for embedding in &embeddings {
            Self::check_dimensions(embedding)?;
        }

        Ok(embeddings)
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for OpenAiClient {
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Embedding text cannot be empty".to_string(),
            ));
        }

        let input = EmbeddingInput::Single(Self::truncate(text).to_string());
        let mut embeddings = self.request_embeddings(input).await?;

        let embedding = embeddings
            .pop()
            .ok_or_else(|| AppError::ExternalApi("Embedding API returned no data".to_string()))?;

        tracing::debug!(
            text_length = text.len(),
            provider = EmbeddingProvider::name(self),
            "Embedding generated"
        );

        Ok(embedding)
    }

    /// Bulk endpoint override: one request for the whole batch
    async fn embed_batch(&self, texts: Vec<String>) -> AppResult<Vec<Vec<f32>>> {
        let valid_texts: Vec<String> = texts
            .into_iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| Self::truncate(&t).to_string())
            .collect();

        if valid_texts.is_empty() {
            return Ok(Vec::new());
        }

        let count = valid_texts.len();
        let embeddings = self
            .request_embeddings(EmbeddingInput::Batch(valid_texts))
            .await?;

        tracing::info!(
            requested = count,
            received = embeddings.len(),
            provider = EmbeddingProvider::name(self),
            "Batch embeddings generated"
        );

        Ok(embeddings)
    }

    fn clone_for_task(&self) -> Box<dyn EmbeddingProvider> {
        Box::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[async_trait::async_trait]
impl ExplanationProvider for OpenAiClient {
    async fn explain(&self, prompt: &str) -> AppResult<String> {
        let url = format!("{}/v1/chat/completions", self.api_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.llm_model,
                messages: vec![
                    ChatMessage {
                        role: "system".to_string(),
                        content: EXPLANATION_SYSTEM_PROMPT.to_string(),
                    },
                    ChatMessage {
                        role: "user".to_string(),
                        content: prompt.to_string(),
                    },
                ],
                max_tokens: EXPLANATION_MAX_TOKENS,
                temperature: EXPLANATION_TEMPERATURE,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Chat API returned status {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response.json().await?;
        let explanation = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| AppError::ExternalApi("Chat API returned no choices".to_string()))?;

        tracing::debug!(
            prompt_length = prompt.len(),
            provider = ExplanationProvider::name(self),
            "Explanation generated"
        );

        Ok(explanation)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client() -> OpenAiClient {
        OpenAiClient::with_endpoint(
            "test_key".to_string(),
            "http://test.local".to_string(),
            "gpt-4o-mini".to_string(),
            "text-embedding-3-small".to_string(),
        )
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        let text = "short text";
        assert_eq!(OpenAiClient::truncate(text), text);
    }

    #[test]
    fn test_truncate_caps_long_text() {
        let text = "a".repeat(MAX_EMBED_CHARS + 100);
        assert_eq!(OpenAiClient::truncate(&text).len(), MAX_EMBED_CHARS);
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "é".repeat(MAX_EMBED_CHARS + 10);
        let truncated = OpenAiClient::truncate(&text);
        assert_eq!(truncated.chars().count(), MAX_EMBED_CHARS);
    }

    #[test]
    fn test_check_dimensions_accepts_expected_width() {
        let embedding = vec![0.0f32; EMBEDDING_DIMENSIONS];
        assert!(OpenAiClient::check_dimensions(&embedding).is_ok());
    }

    #[test]
    fn test_check_dimensions_rejects_wrong_width() {
        let embedding = vec![0.0f32; 16];
        let err = OpenAiClient::check_dimensions(&embedding).unwrap_err();
        assert!(matches!(err, AppError::ExternalApi(_)));
    }

    #[tokio::test]
    async fn test_embed_rejects_empty_text() {
        let client = create_test_client();
        let err = client.embed("   ").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_embed_batch_empty_input_short_circuits() {
        let client = create_test_client();
        // Only blank texts: filtered out before any network call is made.
        let result = client
            .embed_batch(vec!["".to_string(), "  ".to_string()])
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_embedding_response_deserialization() {
        let json = r#"{
            "data": [
                {"embedding": [0.1, 0.2, 0.3], "index": 0, "object": "embedding"}
            ],
            "model": "text-embedding-3-small",
            "object": "list"
        }"#;

        let parsed: EmbeddingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.data[0].embedding, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_chat_response_deserialization() {
        let json = r#"{
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "Because you like AI."},
                    "finish_reason": "stop"
                }
            ]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Because you like AI.");
    }

    #[test]
    fn test_embedding_request_single_serialization() {
        let request = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: EmbeddingInput::Single("hello".to_string()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"], "hello");
    }

    #[test]
    fn test_embedding_request_batch_serialization() {
        let request = EmbeddingRequest {
            model: "text-embedding-3-small",
            input: EmbeddingInput::Batch(vec!["a".to_string(), "b".to_string()]),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"], serde_json::json!(["a", "b"]));
    }
}
