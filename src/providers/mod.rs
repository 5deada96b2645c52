/// AI provider abstraction
///
/// This module provides a pluggable architecture for the external AI
/// collaborators of the recommendation engine: text embedding and
/// explanation generation. Concrete providers wrap a network API; the
/// engine only sees these traits, so tests can substitute deterministic
/// fakes and a provider outage degrades a request instead of failing it.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiClient;

/// Trait for text-embedding providers
///
/// Produces fixed-length semantic vectors for text. Failures are reported
/// as transient external errors; callers skip the similarity term rather
/// than aborting scoring.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text into a fixed-length vector
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>>;

    /// Embed multiple texts
    ///
    /// Default implementation embeds each text in parallel. Providers with a
    /// bulk endpoint should override to batch into one request.
    async fn embed_batch(&self, texts: Vec<String>) -> AppResult<Vec<Vec<f32>>> {
        let mut tasks = Vec::new();

        for text in texts {
            let provider = self.clone_for_task();
            let task = tokio::spawn(async move { provider.embed(&text).await });
            tasks.push(task);
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(Ok(embedding)) => results.push(embedding),
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Embedding failed for text");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Task join error");
                    return Err(crate::error::AppError::Internal(e.to_string()));
                }
            }
        }

        Ok(results)
    }

    /// Clone provider for parallel task execution
    fn clone_for_task(&self) -> Box<dyn EmbeddingProvider>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Trait for explanation providers
///
/// Turns a scored candidate into a human-readable justification. Absence of
/// an explanation never blocks scoring.
#[async_trait::async_trait]
pub trait ExplanationProvider: Send + Sync {
    /// Generate a free-text explanation for the given prompt
    async fn explain(&self, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
