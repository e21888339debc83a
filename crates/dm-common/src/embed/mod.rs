pub mod hash_embedder;
pub mod similarity;

use std::sync::Arc;

use async_trait::async_trait;

pub use hash_embedder::HashEmbedder;
pub use similarity::cosine_similarity;

/// Maps text to a fixed-length vector for semantic comparison.
///
/// Implementations may block on I/O (a remote embedding API); the core only
/// requires that identical text embeds identically within a session and
/// that absence (`None`) is a valid answer — callers treat it as zero
/// similarity, never as an error.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Implementation name, recorded alongside persisted matches.
    fn name(&self) -> &'static str;

    /// Embedding dimension.
    fn dimension(&self) -> usize;

    /// Embed one piece of text. `None` means no embedding is available.
    async fn embed(&self, text: &str) -> Option<Vec<f32>>;

    /// Embed a batch; the default loops, implementations backed by batch
    /// APIs should override.
    async fn embed_batch(&self, texts: &[String]) -> Vec<Option<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await);
        }
        out
    }
}

/// Embedder factory. Unknown names fall back to the deterministic hash
/// implementation so a misconfigured deployment still produces scores.
pub fn create_embedder(name: &str, dimension: usize) -> Arc<dyn TextEmbedder> {
    match name {
        "hash" => Arc::new(HashEmbedder::new(dimension)),
        other => {
            tracing::warn!(embedder = other, "unknown embedder; falling back to hash");
            Arc::new(HashEmbedder::new(dimension))
        }
    }
}
