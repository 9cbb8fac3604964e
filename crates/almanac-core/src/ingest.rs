//! PDF ingestion: extract, chunk, embed, upsert

use crate::config::RetrievalConfig;
use crate::error::{AlmanacError, Result};
use crate::index::{chunker, DocumentIndex};
use crate::llm::Embedder;
use std::fs;
use std::path::Path;

/// Summary of a successful ingestion
#[derive(Debug, Clone, Copy)]
pub struct DocumentStats {
    pub chunks: usize,
    pub characters: usize,
}

/// Extract text from a PDF file
pub fn extract_pdf_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| {
        AlmanacError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read PDF file {:?}: {}", path, e),
        ))
    })?;

    let text = pdf_extract::extract_text_from_mem(&bytes).map_err(|e| {
        AlmanacError::Ingest(format!("Failed to extract text from PDF {:?}: {}", path, e))
    })?;

    if text.trim().is_empty() {
        return Err(AlmanacError::Ingest(format!(
            "PDF file {:?} contains no extractable text (may be image-based)",
            path
        )));
    }

    Ok(text)
}

/// Ingest a PDF into the index.
///
/// Chunks and embeddings are fully computed before the index is touched,
/// so a failure at any stage leaves prior index state unchanged.
pub async fn ingest_pdf(
    path: &Path,
    embedder: &dyn Embedder,
    index: &DocumentIndex,
    retrieval: &RetrievalConfig,
) -> Result<DocumentStats> {
    let text = extract_pdf_text(path)?;
    let characters = text.len();

    let chunks = chunker::split_text(&text, retrieval.chunk_size, retrieval.chunk_overlap);
    let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();

    tracing::info!(
        path = %path.display(),
        chunks = chunks.len(),
        characters,
        "embedding document chunks"
    );

    let vectors = embedder.embed_batch(&texts).await?;

    index.upsert(chunks, vectors)?;

    Ok(DocumentStats {
        chunks: texts.len(),
        characters,
    })
}
