use crate::error::IngestError;
use crate::models::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use regex::Regex;

/// Break points tried in order, coarsest first: paragraph, line, sentence, word.
const BOUNDARY_PATTERNS: [&str; 4] = [r"\n[ \t]*\n", r"\n", r#"[.!?]["')\]]*\s"#, r"\s"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters repeated at the start of a chunk from the end of the previous one.
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.chunk_size == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "chunk size must be positive".to_string(),
            ));
        }
        if self.overlap >= self.chunk_size {
            return Err(IngestError::InvalidChunkConfig(format!(
                "overlap {} must be smaller than chunk size {}",
                self.overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Splits page text into overlapping chunks of at most `chunk_size` characters.
///
/// Each cut lands on the latest paragraph break inside the window, falling back
/// to line, sentence and word boundaries, and finally a hard cut at
/// `chunk_size`. The next chunk restarts exactly `overlap` characters before
/// the cut, so dropping the first `overlap` characters of every chunk after the
/// first and concatenating yields the trimmed page text.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    config: ChunkingConfig,
    boundaries: Vec<Regex>,
}

impl TextSplitter {
    pub fn new(config: ChunkingConfig) -> Result<Self, IngestError> {
        config.validate()?;
        let boundaries = BOUNDARY_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { config, boundaries })
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    pub fn split(&self, page_text: &str) -> Vec<String> {
        let text = page_text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= self.config.chunk_size {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            if chars.len() - start <= self.config.chunk_size {
                chunks.push(chars[start..].iter().collect());
                break;
            }

            let window = &chars[start..start + self.config.chunk_size];
            let end = start + self.cut_point(window);
            chunks.push(chars[start..end].iter().collect());
            start = end - self.config.overlap;
        }

        chunks
    }

    /// Length of the next chunk taken from `window`. Always exceeds the overlap.
    fn cut_point(&self, window: &[char]) -> usize {
        let text: String = window.iter().collect();

        for boundary in &self.boundaries {
            if let Some(found) = boundary.find_iter(&text).last() {
                let length = text[..found.end()].chars().count();
                if length > self.config.overlap {
                    return length;
                }
            }
        }

        window.len()
    }
}

pub fn split_text(
    page_text: &str,
    chunk_size: usize,
    overlap: usize,
) -> Result<Vec<String>, IngestError> {
    let splitter = TextSplitter::new(ChunkingConfig {
        chunk_size,
        overlap,
    })?;
    Ok(splitter.split(page_text))
}
