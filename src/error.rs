//! The error taxonomy for the indexer and query engine.
//!
//! Each variant has a defined recovery behavior at its call site — see
//! the handling notes on each variant. None of these drive ordinary
//! control flow; `NotFound` in particular is always matched and handled
//! locally by the ranker rather than allowed to propagate as fatal.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CorpusIdxError {
    /// A document failed to decode or analyze. Recovery: log a warning,
    /// skip the document, continue the build.
    #[error("failed to decode document {doc_id}: {source}")]
    Decode {
        doc_id: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Any I/O failure. Recovery: propagate, abort the operation in
    /// progress.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A malformed partial record. Recovery: abort the merge entirely.
    #[error("corrupt partial record in {file}:{line}")]
    CorruptPartial { file: PathBuf, line: usize },

    /// A term absent from the dictionary. Recovery: treated as an empty
    /// posting list by the ranker, not fatal to the query.
    #[error("term not found: {term}")]
    NotFound { term: String },

    /// A required index file is missing at query-session startup.
    /// Recovery: none, fatal to the session.
    #[error("missing index file: {}", path.display())]
    MissingIndex { path: PathBuf },

    /// An optional sidecar file is missing. Recovery: disable the
    /// corresponding dedup mode or length-normalization source, log a
    /// warning, continue.
    #[error("missing sidecar file for {mode}: {}", path.display())]
    MissingSidecar { path: PathBuf, mode: &'static str },

    /// A JSON record failed to parse where a structural guarantee (not
    /// line/file position) was the relevant context.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CorpusIdxError>;
