//! Chunk-level semantic comparison between a job description and a resume

use crate::config::SemanticConfig;
use crate::error::Result;
use crate::processing::embeddings::{cosine_similarity, Embedder};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// A resume chunk paired with one of its closest job description chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticMatch {
    #[serde(rename = "jd")]
    pub job: String,
    pub resume: String,
    /// Rounded to 3 decimals
    pub similarity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticComparison {
    /// Normalized into [0, 1]
    pub avg_similarity: f64,
    /// Best first
    pub matches: Vec<SemanticMatch>,
}

impl SemanticComparison {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Never fails; faults degrade to [`SemanticComparison::empty`]
pub trait SemanticComparator: Send + Sync {
    fn compare(&self, job_text: &str, resume_text: &str) -> SemanticComparison;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingOptions {
    pub max_chars: usize,
    pub max_chunks: usize,
    pub top_k: usize,
    pub max_matches: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            max_chars: 300,
            max_chunks: 50,
            top_k: 3,
            max_matches: 20,
        }
    }
}

impl From<&SemanticConfig> for ChunkingOptions {
    fn from(config: &SemanticConfig) -> Self {
        Self {
            max_chars: config.chunk_max_chars,
            max_chunks: config.max_chunks,
            top_k: config.top_k,
            max_matches: config.max_matches,
        }
    }
}

/// Pack sentences into chunks of at most `max_chars` characters.
///
/// A single sentence longer than 1.5x the limit is re-split on words.
pub fn chunk_text(text: &str, max_chars: usize, max_chunks: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let sentences = text
        .split(|c| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let chunks = pack(sentences, max_chars);

    let long_limit = max_chars as f64 * 1.5;
    let mut final_chunks = Vec::new();
    for chunk in chunks {
        if chunk.chars().count() as f64 > long_limit {
            final_chunks.extend(pack(chunk.split_whitespace(), max_chars));
        } else {
            final_chunks.push(chunk);
        }
    }

    final_chunks.truncate(max_chunks);
    final_chunks
}

/// Greedily join pieces with single spaces while staying under the limit
fn pack<'a>(pieces: impl Iterator<Item = &'a str>, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for piece in pieces {
        let piece_len = piece.chars().count();
        if !current.is_empty() && current_len + piece_len + 1 > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(piece);
        current_len += piece_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub struct EmbeddingComparator<E: Embedder> {
    embedder: E,
    options: ChunkingOptions,
}

impl<E: Embedder> EmbeddingComparator<E> {
    pub fn new(embedder: E, options: ChunkingOptions) -> Self {
        Self { embedder, options }
    }

    fn try_compare(&self, job_text: &str, resume_text: &str) -> Result<SemanticComparison> {
        let opts = self.options;
        let job_chunks = chunk_text(job_text, opts.max_chars, opts.max_chunks);
        let resume_chunks = chunk_text(resume_text, opts.max_chars, opts.max_chunks);

        if job_chunks.is_empty() || resume_chunks.is_empty() {
            return Ok(SemanticComparison::empty());
        }

        debug!(
            "Comparing {} resume chunks against {} job chunks",
            resume_chunks.len(),
            job_chunks.len()
        );

        let job_vectors = self.embedder.embed(&job_chunks)?;
        let resume_vectors = self.embedder.embed(&resume_chunks)?;
        let top_k = opts.top_k.min(job_chunks.len());

        let mut matches = Vec::new();
        let mut best_per_job_chunk: HashMap<&str, f64> = HashMap::new();

        for (resume_chunk, resume_vector) in resume_chunks.iter().zip(&resume_vectors) {
            let mut scored = match job_vectors
                .iter()
                .enumerate()
                .map(|(i, job_vector)| cosine_similarity(resume_vector, job_vector).map(|s| (i, s)))
                .collect::<Result<Vec<(usize, f32)>>>()
            {
                Ok(scored) => scored,
                Err(e) => {
                    warn!("Skipping resume chunk: {}", e);
                    continue;
                }
            };

            scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

            for &(job_index, similarity) in scored.iter().take(top_k) {
                let similarity = pair_similarity(similarity);
                let job_chunk = job_chunks[job_index].as_str();

                matches.push(SemanticMatch {
                    job: job_chunk.to_string(),
                    resume: resume_chunk.clone(),
                    similarity: (similarity * 1000.0).round() / 1000.0,
                });

                best_per_job_chunk
                    .entry(job_chunk)
                    .and_modify(|best| *best = best.max(similarity))
                    .or_insert(similarity);
            }
        }

        let avg_similarity = if best_per_job_chunk.is_empty() {
            0.0
        } else {
            best_per_job_chunk.values().sum::<f64>() / best_per_job_chunk.len() as f64
        };
        // Stretch [0.5, 1.0] over [0, 1]
        let normalized = ((avg_similarity - 0.5) / 0.5).clamp(0.0, 1.0);

        matches.sort_by(|a, b| b.similarity.partial_cmp(&a.similarity).unwrap_or(Ordering::Equal));
        matches.truncate(opts.max_matches);

        info!(
            "Semantic similarity {:.3} (raw {:.3}) from {} matches",
            normalized,
            avg_similarity,
            matches.len()
        );

        Ok(SemanticComparison {
            avg_similarity: normalized,
            matches,
        })
    }
}

impl<E: Embedder> SemanticComparator for EmbeddingComparator<E> {
    fn compare(&self, job_text: &str, resume_text: &str) -> SemanticComparison {
        self.try_compare(job_text, resume_text).unwrap_or_else(|e| {
            error!("Semantic comparison failed: {}", e);
            SemanticComparison::empty()
        })
    }

    fn name(&self) -> &str {
        self.embedder.model_name()
    }
}

/// Cosine of two unit vectors mapped onto `1 - d`, where `d = 2 - 2cos` is the
/// squared L2 distance between them. Anything at or below cos 0.5 scores zero.
pub fn pair_similarity(cosine: f32) -> f64 {
    (2.0 * f64::from(cosine) - 1.0).max(0.0)
}

/// Stand-in when no embedding model is available
pub struct OfflineComparator;

impl SemanticComparator for OfflineComparator {
    fn compare(&self, _job_text: &str, _resume_text: &str) -> SemanticComparison {
        SemanticComparison::empty()
    }

    fn name(&self) -> &str {
        "offline"
    }
}
