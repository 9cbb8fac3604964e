//! In-memory document index
//!
//! Holds (vector, chunk) pairs for one loaded collection and answers
//! nearest-neighbor queries by brute-force cosine similarity. The index
//! is an owned object guarded by an `RwLock`; callers are expected to
//! keep at most one ingestion in flight at a time.

pub mod chunker;

use crate::error::{AlmanacError, Result};
use std::sync::RwLock;

/// A chunk of document text stored in the index
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub text: String,
    /// Byte offset of the chunk in the source document
    pub position: usize,
}

/// A retrieved chunk with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

struct Entry {
    chunk: IndexedChunk,
    vector: Vec<f32>,
}

/// In-memory vector index for one collection
pub struct DocumentIndex {
    collection: String,
    entries: RwLock<Vec<Entry>>,
}

impl DocumentIndex {
    /// Create an empty index for the given collection name
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Get collection name
    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Add chunks with their embeddings to the index.
    ///
    /// All-or-nothing: a chunk/vector length mismatch fails before any
    /// entry is stored, so a failed ingestion leaves prior state intact.
    pub fn upsert(&self, chunks: Vec<IndexedChunk>, vectors: Vec<Vec<f32>>) -> Result<()> {
        if chunks.len() != vectors.len() {
            return Err(AlmanacError::Index(format!(
                "chunk/vector count mismatch: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let mut entries = self.entries.write().unwrap();
        entries.extend(
            chunks
                .into_iter()
                .zip(vectors)
                .map(|(chunk, vector)| Entry { chunk, vector }),
        );
        tracing::debug!(total = entries.len(), collection = %self.collection, "index updated");
        Ok(())
    }

    /// Return the top-k chunks by cosine similarity to the query vector.
    ///
    /// An empty index yields an empty result, never an error.
    pub fn search(&self, query_vector: &[f32], k: usize) -> Vec<ScoredChunk> {
        let entries = self.entries.read().unwrap();

        let mut scored: Vec<ScoredChunk> = entries
            .iter()
            .map(|entry| ScoredChunk {
                text: entry.chunk.text.clone(),
                score: cosine_similarity(query_vector, &entry.vector),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

/// Cosine similarity between two vectors.
///
/// Degenerate inputs (mismatched lengths, zero vectors) score 0.0
/// rather than erroring; a bad score only demotes a chunk.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = (norm_a * norm_b).sqrt();
    if denom <= f32::EPSILON {
        return 0.0;
    }
    dot / denom
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str) -> IndexedChunk {
        IndexedChunk {
            text: text.to_string(),
            position: 0,
        }
    }

    #[test]
    fn test_cosine_is_scale_invariant() {
        let a = [0.3, 0.4, 1.2, -0.7];
        let scaled: Vec<f32> = a.iter().map(|x| x * 8.0).collect();
        let sim = cosine_similarity(&a, &scaled);
        assert!((sim - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let sim = cosine_similarity(&[0.5, -1.5, 2.0], &[-0.5, 1.5, -2.0]);
        assert!((sim + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_zero_vector_scores_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_cosine_length_mismatch_scores_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_search_empty_index() {
        let index = DocumentIndex::new("pdf_documents");
        assert!(index.is_empty());
        assert!(index.search(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn test_search_ranks_by_similarity() {
        let index = DocumentIndex::new("pdf_documents");
        index
            .upsert(
                vec![chunk("east"), chunk("north"), chunk("northeast")],
                vec![
                    vec![1.0, 0.0],
                    vec![0.0, 1.0],
                    vec![0.7, 0.7],
                ],
            )
            .unwrap();

        let results = index.search(&[1.0, 0.0], 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "east");
        assert_eq!(results[1].text, "northeast");
    }

    #[test]
    fn test_upsert_mismatch_leaves_index_unchanged() {
        let index = DocumentIndex::new("pdf_documents");
        index
            .upsert(vec![chunk("one")], vec![vec![1.0, 0.0]])
            .unwrap();

        let result = index.upsert(vec![chunk("two"), chunk("three")], vec![vec![0.0, 1.0]]);
        assert!(result.is_err());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let index = DocumentIndex::new("pdf_documents");
        index
            .upsert(vec![chunk("only")], vec![vec![1.0]])
            .unwrap();
        assert_eq!(index.search(&[1.0], 3).len(), 1);
    }
}
