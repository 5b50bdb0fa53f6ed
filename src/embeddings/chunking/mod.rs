
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A piece of extracted text sized for embedding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    pub content: String,
    pub chunk_index: usize,
    pub token_count: usize,
}

/// Configuration for text chunking.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in tokens
    pub target_chunk_size: usize,
    /// Maximum chunk size in tokens before forced splitting
    pub max_chunk_size: usize,
    /// Minimum chunk size in tokens (smaller chunks are merged)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    #[inline]
    fn default() -> Self {
        Self {
            target_chunk_size: 650,
            max_chunk_size: 1000,
            min_chunk_size: 100,
        }
    }
}

/// Split extracted text into embedding-ready chunks.
///
/// Paragraphs are packed up to the target size; a paragraph over the hard
/// cap is broken at sentence boundaries, then at word boundaries as a last
/// resort. Undersized leftovers are merged into their predecessor.
#[inline]
pub fn chunk_text(text: &str, config: &ChunkingConfig) -> Vec<TextChunk> {
    let mut splits: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_tokens = 0;

    for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
        let paragraph_tokens = estimate_token_count(paragraph);

        if paragraph_tokens > config.max_chunk_size {
            flush(&mut splits, &mut current, &mut current_tokens);
            split_oversized(paragraph, config, &mut splits);
            continue;
        }

        if current_tokens + paragraph_tokens > config.target_chunk_size && !current.is_empty() {
            flush(&mut splits, &mut current, &mut current_tokens);
        }

        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(paragraph);
        current_tokens += paragraph_tokens;
    }
    flush(&mut splits, &mut current, &mut current_tokens);

    let merged = merge_small_splits(splits, config);

    let chunks: Vec<TextChunk> = merged
        .into_iter()
        .enumerate()
        .map(|(chunk_index, content)| {
            let token_count = estimate_token_count(&content);
            TextChunk {
                content,
                chunk_index,
                token_count,
            }
        })
        .collect();

    debug!("Chunked {} chars into {} chunks", text.len(), chunks.len());
    chunks
}

fn flush(splits: &mut Vec<String>, current: &mut String, current_tokens: &mut usize) {
    if !current.trim().is_empty() {
        splits.push(current.trim().to_string());
    }
    current.clear();
    *current_tokens = 0;
}

/// Break a paragraph that exceeds the hard cap, preferring sentence
/// boundaries.
fn split_oversized(paragraph: &str, config: &ChunkingConfig, splits: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_tokens = 0;

    for sentence in split_sentences(paragraph) {
        let sentence_tokens = estimate_token_count(&sentence);

        if sentence_tokens > config.max_chunk_size {
            flush(splits, &mut current, &mut current_tokens);
            split_words(&sentence, config, splits);
            continue;
        }

        if current_tokens + sentence_tokens > config.target_chunk_size && !current.is_empty() {
            flush(splits, &mut current, &mut current_tokens);
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
        current_tokens += sentence_tokens;
    }
    flush(splits, &mut current, &mut current_tokens);
}

fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                sentences.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }

    sentences
}

/// Word-boundary splitting as a last resort for text with no sentence
/// structure.
fn split_words(text: &str, config: &ChunkingConfig, splits: &mut Vec<String>) {
    let mut current = String::new();
    let mut current_tokens = 0;

    for word in text.split_whitespace() {
        let word_tokens = estimate_token_count(word);

        if current_tokens + word_tokens > config.target_chunk_size && !current.is_empty() {
            splits.push(std::mem::take(&mut current));
            current_tokens = 0;
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
        current_tokens += word_tokens;
    }

    if !current.is_empty() {
        splits.push(current);
    }
}

fn merge_small_splits(splits: Vec<String>, config: &ChunkingConfig) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(splits.len());

    for split in splits {
        let tokens = estimate_token_count(&split);
        if tokens < config.min_chunk_size {
            if let Some(last) = merged.last_mut() {
                if estimate_token_count(last) + tokens <= config.max_chunk_size {
                    last.push_str("\n\n");
                    last.push_str(&split);
                    continue;
                }
            }
        }
        merged.push(split);
    }

    merged
}

/// Estimate token count using a simple heuristic
/// This is a rough approximation - actual tokenization would be more accurate
#[inline]
pub fn estimate_token_count(text: &str) -> usize {
    // Rough heuristic: 1 token ≈ 0.75 words for English text
    let word_count = text.split_whitespace().count();
    let punct_count = text.chars().filter(|c| c.is_ascii_punctuation()).count();

    (punct_count as f64).mul_add(0.1, word_count as f64 / 0.75) as usize
}
