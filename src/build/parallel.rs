//! Parallel document loading.
//!
//! Loading JSON files from disk and analyzing their HTML content are
//! both embarrassingly parallel. Grounded on the teacher's
//! `build/parallel.rs::load_documents` (`par_iter().map(...).collect()`
//! then sort for deterministic ordering) and spec section 5's permitted
//! parallelism model: analyze documents in a worker pool that feeds a
//! single serial partial-builder sink.

use std::fs;
use std::path::Path;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::analyzer::{self, AnalyzedDocument};
use crate::build::document::{Document, InputManifest};
use crate::error::{CorpusIdxError, Result};
use crate::stemmer::Stemmer;

/// Read and parse every document listed in the manifest. Warns and skips
/// on a per-file parse failure rather than aborting the whole load.
#[cfg(feature = "parallel")]
pub fn load_documents(input_dir: &Path, manifest: &InputManifest) -> Result<Vec<Document>> {
    let docs: Vec<Document> = manifest
        .documents
        .par_iter()
        .filter_map(|filename| read_document(input_dir, filename))
        .collect();
    Ok(docs)
}

#[cfg(not(feature = "parallel"))]
pub fn load_documents(input_dir: &Path, manifest: &InputManifest) -> Result<Vec<Document>> {
    let docs: Vec<Document> = manifest
        .documents
        .iter()
        .filter_map(|filename| read_document(input_dir, filename))
        .collect();
    Ok(docs)
}

fn read_document(input_dir: &Path, filename: &str) -> Option<Document> {
    let path = input_dir.join(filename);
    let content = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "failed to read document");
            return None;
        }
    };
    match serde_json::from_str::<Document>(&content) {
        Ok(doc) => Some(doc),
        Err(e) => {
            let err = CorpusIdxError::Decode {
                doc_id: filename.to_string(),
                source: Box::new(e),
            };
            tracing::warn!(file = %path.display(), error = %err, "skipping document");
            None
        }
    }
}

/// Analyze every loaded document (canonicalize, extract text, tokenize,
/// stem) in parallel, sharing one `Stemmer` across the worker pool.
#[cfg(feature = "parallel")]
pub fn analyze_documents(
    docs: &[Document],
    stemmer: &Stemmer,
    min_token_len: usize,
) -> Vec<AnalyzedDocument> {
    docs.par_iter()
        .map(|doc| analyzer::analyze_document(&doc.url, &doc.content, stemmer, min_token_len))
        .collect()
}

#[cfg(not(feature = "parallel"))]
pub fn analyze_documents(
    docs: &[Document],
    stemmer: &Stemmer,
    min_token_len: usize,
) -> Vec<AnalyzedDocument> {
    docs.iter()
        .map(|doc| analyzer::analyze_document(&doc.url, &doc.content, stemmer, min_token_len))
        .collect()
}

/// Read the manifest file from the input directory.
pub fn load_manifest(input_dir: &Path) -> Result<InputManifest> {
    let path = input_dir.join("manifest.json");
    let content = fs::read_to_string(&path).map_err(CorpusIdxError::Io)?;
    serde_json::from_str(&content).map_err(CorpusIdxError::Json)
}
