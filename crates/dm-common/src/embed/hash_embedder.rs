use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use siphasher::sip::SipHasher13;

use super::TextEmbedder;

/// Fixed seed for deterministic hashing. Changing these values changes
/// every embedding, so bump the embedder name/version if they ever move.
const HASH_SEED_K0: u64 = 0x7061_6765_5f68_6173;
const HASH_SEED_K1: u64 = 0x686d_6174_6368_0001;

/// Feature-hashing text embedder: deterministic, training-free, O(tokens).
///
/// Tokens are lowercased whitespace splits; each token adds ±1 (sign hash)
/// at a hashed dimension index and the vector is L2-normalized. SipHash-1-3
/// with fixed keys keeps embeddings stable across processes and Rust
/// versions, which makes this the default embedder for tests and for
/// deployments without a remote embedding service.
pub struct HashEmbedder {
    dimension: usize,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn hash_token(&self, token: &str) -> usize {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        token.hash(&mut hasher);
        (hasher.finish() as usize) % self.dimension
    }

    fn sign(&self, token: &str) -> f32 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K1, HASH_SEED_K0);
        token.hash(&mut hasher);
        if hasher.finish() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    fn embed_sync(&self, text: &str) -> Option<Vec<f32>> {
        let mut vector = vec![0.0_f32; self.dimension];
        let mut any = false;

        for token in text.split_whitespace() {
            let token = token.to_lowercase();
            let idx = self.hash_token(&token);
            vector[idx] += self.sign(&token);
            any = true;
        }

        if !any {
            return None;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Some(vector)
    }
}

#[async_trait]
impl TextEmbedder for HashEmbedder {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Option<Vec<f32>> {
        self.embed_sync(text)
    }
}
