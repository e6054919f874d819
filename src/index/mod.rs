//! Dictionary loading, posting fetch, and the explicit query session
//! context (spec 4.5 and section 9's "no global mutable singletons").
//!
//! Grounded on `original_source/search.py::load_metadata` /
//! `search.py::search`'s seek-and-read-one-line fetch, re-expressed as a
//! constructed `QueryContext` rather than module-level globals.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::build::merge::read_term_record_at;
use crate::build::partial::Posting;
use crate::config::{DedupMode, SearchConfig};
use crate::dedup;
use crate::error::{CorpusIdxError, Result};
use crate::rank::{self, TermPostings};
use crate::stemmer::Stemmer;
use crate::tokenizer;

pub struct QueryContext {
    postings_path: PathBuf,
    dictionary: HashMap<String, u64>,
    total_docs: u64,
    doc_lengths: HashMap<String, u64>,
    fingerprints: Option<HashMap<String, String>>,
    simhashes: Option<HashMap<String, u64>>,
    stemmer: Stemmer,
    config: SearchConfig,
}

#[derive(Debug)]
pub struct SearchResult {
    pub doc_ids: Vec<String>,
}

impl QueryContext {
    /// Load the index directory once per session. Fails fatally if the
    /// required postings file or dictionary is missing; missing sidecars
    /// are tolerated (the corresponding mode is disabled with a warning).
    pub fn load(config: SearchConfig) -> Result<Self> {
        let postings_path = config.index_dir.join("index.ndjson");
        let dictionary_path = config.index_dir.join("term_index.json");

        if !postings_path.exists() {
            return Err(CorpusIdxError::MissingIndex { path: postings_path });
        }
        if !dictionary_path.exists() {
            return Err(CorpusIdxError::MissingIndex { path: dictionary_path });
        }

        let dictionary: HashMap<String, u64> =
            serde_json::from_str(&fs::read_to_string(&dictionary_path)?)?;

        let meta_path = config.index_dir.join("meta.json");
        let total_docs = if meta_path.exists() {
            let meta: serde_json::Value = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
            meta["total_docs"].as_u64().unwrap_or(0)
        } else {
            tracing::warn!(path = %meta_path.display(), "missing meta.json, total document count is 0");
            0
        };

        let doc_lengths = load_sidecar_map(&config.index_dir.join("doc_lengths.json"), "length")
            .unwrap_or_default();

        let fingerprints = load_sidecar_strings(
            &config.index_dir.join("doc_fingerprints.json"),
            "exact dedup",
        );
        let simhashes =
            load_sidecar_map(&config.index_dir.join("doc_simhashes.json"), "near dedup");

        Ok(Self {
            postings_path,
            dictionary,
            total_docs,
            doc_lengths,
            fingerprints,
            simhashes,
            stemmer: Stemmer::new(),
            config,
        })
    }

    /// Look up a single stemmed term's posting list. A term absent from
    /// the dictionary is an empty list (not fatal).
    fn fetch(&self, term: &str) -> Vec<Posting> {
        match self.dictionary.get(term) {
            None => {
                let err = CorpusIdxError::NotFound { term: term.to_string() };
                tracing::debug!(error = %err, "term absent from dictionary");
                Vec::new()
            }
            Some(&offset) => match read_term_record_at(&self.postings_path, offset) {
                Ok(record) => record.postings,
                Err(e) => {
                    tracing::warn!(term, error = %e, "failed to read term record");
                    Vec::new()
                }
            },
        }
    }

    /// Parse, stem, rank, AND-filter, and deduplicate a query string.
    pub fn search(&self, query: &str) -> SearchResult {
        let query_terms: Vec<String> = tokenizer::tokenize_query(query, self.config.min_token_len)
            .into_iter()
            .map(|t| self.stemmer.stem(&t))
            .collect();

        let distinct_terms: Vec<&str> = {
            let mut seen = std::collections::HashSet::new();
            query_terms
                .iter()
                .filter(|t| seen.insert(t.as_str()))
                .map(|t| t.as_str())
                .collect()
        };

        let postings_by_term: Vec<Vec<Posting>> =
            distinct_terms.iter().map(|t| self.fetch(*t)).collect();
        let term_postings: Vec<TermPostings<'_>> = distinct_terms
            .iter()
            .zip(postings_by_term.iter())
            .map(|(term, postings)| TermPostings {
                term: *term,
                postings: postings.as_slice(),
            })
            .collect();

        let ranked = rank::rank(&query_terms, &term_postings, self.total_docs, &self.doc_lengths);

        let doc_ids = match self.config.dedup_mode {
            DedupMode::None => ranked,
            DedupMode::Exact => match &self.fingerprints {
                Some(fp) => dedup::remove_exact_duplicates(&ranked, fp),
                None => ranked,
            },
            DedupMode::Near => match &self.simhashes {
                Some(sh) => dedup::remove_near_duplicates(&ranked, sh, self.config.simhash_threshold),
                None => ranked,
            },
        };

        SearchResult {
            doc_ids: doc_ids.into_iter().take(self.config.max_results).collect(),
        }
    }
}

fn load_sidecar_map(path: &Path, mode: &'static str) -> Option<HashMap<String, u64>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), mode, "missing sidecar, disabling dependent mode");
        return None;
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
}

fn load_sidecar_strings(path: &Path, mode: &'static str) -> Option<HashMap<String, String>> {
    if !path.exists() {
        tracing::warn!(path = %path.display(), mode, "missing sidecar, disabling dependent mode");
        return None;
    }
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str(&content).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;

    fn build_sample_index(dir: &Path) {
        fs::write(dir.join("manifest.json"), r#"{"documents": ["a.json", "b.json"]}"#).unwrap();
        fs::write(
            dir.join("a.json"),
            r#"{"url":"https://a.com","content":"<p>the cat sat</p>"}"#,
        )
        .unwrap();
        fs::write(
            dir.join("b.json"),
            r#"{"url":"https://b.com","content":"<p>the cat slept</p>"}"#,
        )
        .unwrap();
    }

    #[test]
    fn loads_and_queries_a_built_index() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        build_sample_index(input.path());

        let config = BuildConfig::new(input.path().to_path_buf(), output.path().to_path_buf());
        crate::build::run_build(&config).unwrap();

        let mut search_config = SearchConfig::new(output.path().to_path_buf());
        search_config.dedup_mode = DedupMode::None;
        let ctx = QueryContext::load(search_config).unwrap();
        let result = ctx.search("cat");
        assert_eq!(result.doc_ids.len(), 2);
    }

    #[test]
    fn missing_index_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = SearchConfig::new(dir.path().to_path_buf());
        let err = QueryContext::load(config).unwrap_err();
        matches!(err, CorpusIdxError::MissingIndex { .. });
    }
}
