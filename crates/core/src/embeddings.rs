use crate::traits::EmbeddingProvider;
use crate::ProviderError;
use async_trait::async_trait;

pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 128;

const NGRAM: usize = 3;

/// Offline embedder hashing character trigrams into a normalized vector.
/// Deterministic, so identical text always lands on the identical vector.
/// Text shorter than a trigram is hashed whole.
#[derive(Debug, Clone, Copy)]
pub struct CharacterNgramEmbedder {
    pub dimensions: usize,
}

impl Default for CharacterNgramEmbedder {
    fn default() -> Self {
        Self {
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }
}

impl CharacterNgramEmbedder {
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let buckets = self.dimensions.max(1);
        let mut vector = vec![0f32; buckets];
        let chars: Vec<char> = text.trim().to_lowercase().chars().collect();

        match chars.len() {
            0 => return vector,
            n if n < NGRAM => vector[bucket_of(&chars, buckets)] += 1.0,
            _ => chars
                .windows(NGRAM)
                .for_each(|gram| vector[bucket_of(gram, buckets)] += 1.0),
        }

        let norm = vector.iter().map(|value| value * value).sum::<f32>().sqrt();
        vector.iter_mut().for_each(|value| *value /= norm);
        vector
    }
}

// FNV-1a over the UTF-8 bytes of the gram.
fn bucket_of(gram: &[char], buckets: usize) -> usize {
    let mut buffer = [0u8; 4];
    let hash = gram.iter().fold(0xcbf2_9ce4_8422_2325_u64, |hash, ch| {
        ch.encode_utf8(&mut buffer)
            .bytes()
            .fold(hash, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3))
    });
    (hash % buckets as u64) as usize
}

#[async_trait]
impl EmbeddingProvider for CharacterNgramEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        Ok(self.embed_text(text))
    }
}
