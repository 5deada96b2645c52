use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{ContentItem, EMBEDDING_DIMENSIONS},
    providers::EmbeddingProvider,
};

/// Attaches semantic embeddings to content items
///
/// Newly ingested items carry no embedding; this service builds the
/// embedding text from the item's metadata and asks the embedding provider
/// for a vector. Malformed items are skipped individually so one bad item
/// never sinks a batch.
pub struct ContentProcessor {
    embedder: Arc<dyn EmbeddingProvider>,
}

impl ContentProcessor {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { embedder }
    }

    /// Text fed to the embedding model: title, description, and topic tags
    pub fn embedding_text(item: &ContentItem) -> String {
        let mut parts = vec![item.title.clone()];
        if let Some(description) = &item.description {
            parts.push(description.clone());
        }
        if !item.topics.is_empty() {
            parts.push(item.topics.join(" "));
        }
        parts.join(" ")
    }

    /// Embeds a single content item
    ///
    /// Fails with `InvalidCandidate` when the item has no text to embed or
    /// the provider returns a vector of the wrong width.
    pub async fn embed_item(&self, mut item: ContentItem) -> AppResult<ContentItem> {
        let text = Self::embedding_text(&item);
        if text.trim().is_empty() {
            return Err(AppError::InvalidCandidate(format!(
                "Content {} has no text to embed",
                item.id
            )));
        }

        let embedding = self.embedder.embed(&text).await?;
        if embedding.len() != EMBEDDING_DIMENSIONS {
            return Err(AppError::InvalidCandidate(format!(
                "Embedding for content {} has {} dimensions, expected {}",
                item.id,
                embedding.len(),
                EMBEDDING_DIMENSIONS
            )));
        }

        item.embedding = Some(embedding);
        Ok(item)
    }

    /// Embeds a batch of content items in parallel
    ///
    /// Items that fail are dropped from the result with a warning; the rest
    /// proceed, keeping their input order.
    pub async fn embed_batch(&self, items: Vec<ContentItem>) -> Vec<ContentItem> {
        let total = items.len();
        let mut tasks = Vec::new();

        for item in items {
            let embedder = Arc::clone(&self.embedder);
            tasks.push(tokio::spawn(async move {
                ContentProcessor { embedder }.embed_item(item).await
            }));
        }

        let mut embedded = Vec::new();
        let mut failures = 0usize;

        for task in tasks {
            match task.await {
                Ok(Ok(item)) => embedded.push(item),
                Ok(Err(e)) => {
                    failures += 1;
                    tracing::warn!(error = %e, "Skipping content item that failed embedding");
                }
                Err(e) => {
                    failures += 1;
                    tracing::error!(error = %e, "Embedding task join error");
                }
            }
        }

        if failures > 0 {
            tracing::warn!(
                total,
                embedded = embedded.len(),
                failures,
                "Partial embedding batch failure"
            );
        }

        embedded
    }
}
