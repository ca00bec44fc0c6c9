//! Offline embedding provider.
//!
//! Hashes lower-cased words and their character trigrams into a fixed number
//! of buckets and normalizes the result. Texts sharing vocabulary land close
//! together, which is enough for local runs against a snapshot index built
//! with the same provider.

use crate::embeddings::EmbeddingProvider;
use assistant_core::AppResult;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "what", "how", "does",
];

#[derive(Debug)]
pub struct MockProvider {
    dimensions: usize,
}

impl MockProvider {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn bucket(&self, token: &str, seed: u64) -> usize {
        let hash = token
            .bytes()
            .fold(seed, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        (hash % self.dimensions as u64) as usize
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimensions];
        if self.dimensions == 0 {
            return vector;
        }

        let lower = text.to_lowercase();
        let words = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 1 && !STOP_WORDS.contains(w));

        for word in words {
            vector[self.bucket(word, 7)] += 1.0;

            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram: String = window.iter().collect();
                vector[self.bucket(&trigram, 13)] += 0.5;
            }
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for MockProvider {
    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-trigram"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        Ok(self.vectorize(text))
    }
}
