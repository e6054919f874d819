//! Build pipeline orchestration.
//!
//! Reads a directory of per-document JSON files (listed by `manifest.json`),
//! analyzes them in parallel, folds them into bounded-memory partials, k-way
//! merges the partials into the final postings file and dictionary, and
//! writes the sidecars (`doc_lengths.json`, `doc_fingerprints.json`,
//! `doc_simhashes.json`, `meta.json`). Grounded on the teacher's
//! `build/mod.rs::run_build` staging (load -> build -> write, with
//! progress bars under the `parallel` feature).

pub mod document;
pub mod merge;
pub mod parallel;
pub mod partial;

use std::fs;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

#[cfg(feature = "parallel")]
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::BuildConfig;
use crate::dedup::{compute_content_hash, compute_simhash};
use crate::error::Result;
use crate::stemmer::Stemmer;

#[cfg(feature = "parallel")]
fn progress_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {prefix:<10} [{bar:40.cyan/dim}] {pos}/{len} {msg}")
        .unwrap()
        .progress_chars("━━╸")
}

pub struct BuildSummary {
    pub documents_indexed: u64,
    pub term_count: usize,
    pub partial_count: usize,
    pub elapsed_secs: f64,
}

pub fn run_build(config: &BuildConfig) -> Result<BuildSummary> {
    let started = Instant::now();
    fs::create_dir_all(&config.output_dir)?;

    let working_dir = config.output_dir.join("partials");
    fs::create_dir_all(&working_dir)?;

    tracing::info!(input = %config.input_dir.display(), "loading manifest");
    let manifest = parallel::load_manifest(&config.input_dir)?;

    #[cfg(feature = "parallel")]
    let load_pb = ProgressBar::new(manifest.documents.len() as u64);
    #[cfg(feature = "parallel")]
    load_pb.set_style(progress_style());
    #[cfg(feature = "parallel")]
    load_pb.set_prefix("loading");

    let documents = parallel::load_documents(&config.input_dir, &manifest)?;
    #[cfg(feature = "parallel")]
    load_pb.finish_with_message(format!("{} documents", documents.len()));
    tracing::info!(count = documents.len(), "documents loaded");

    let stemmer = Stemmer::new();

    #[cfg(feature = "parallel")]
    let analyze_pb = ProgressBar::new(documents.len() as u64);
    #[cfg(feature = "parallel")]
    analyze_pb.set_style(progress_style());
    #[cfg(feature = "parallel")]
    analyze_pb.set_prefix("analyzing");

    let analyzed = parallel::analyze_documents(&documents, &stemmer, config.min_token_len);
    #[cfg(feature = "parallel")]
    analyze_pb.finish_with_message("done");

    let mut builder = partial::PartialBuilder::new(working_dir.clone(), config.batch_size);
    let mut fingerprints: std::collections::HashMap<String, String> = std::collections::HashMap::new();
    let mut simhashes: std::collections::HashMap<String, u64> = std::collections::HashMap::new();

    for (doc, analyzed_doc) in documents.iter().zip(analyzed.iter()) {
        builder.add(analyzed_doc)?;
        fingerprints.insert(
            analyzed_doc.doc_id.clone(),
            compute_content_hash(&doc.content),
        );
        let stems: Vec<&str> = analyzed_doc.terms.iter().map(|t| t.stem.as_str()).collect();
        simhashes.insert(analyzed_doc.doc_id.clone(), compute_simhash(&stems));
    }
    builder.flush()?;

    tracing::info!(partials = builder.partial_files.len(), "k-way merging partials");
    let merged = merge::merge_partials(&builder.partial_files, &config.output_dir)?;

    let built_at_unix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    write_json(&config.output_dir.join("doc_lengths.json"), &builder.doc_lengths)?;
    write_json(&config.output_dir.join("doc_fingerprints.json"), &fingerprints)?;
    write_json(&config.output_dir.join("doc_simhashes.json"), &simhashes)?;
    write_json(
        &config.output_dir.join("meta.json"),
        &serde_json::json!({
            "total_docs": builder.total_docs,
            "batch_size": config.batch_size,
            "built_at_unix": built_at_unix,
        }),
    )?;

    let summary = BuildSummary {
        documents_indexed: builder.total_docs,
        term_count: merged.term_count,
        partial_count: builder.partial_files.len(),
        elapsed_secs: started.elapsed().as_secs_f64(),
    };
    tracing::info!(
        docs = summary.documents_indexed,
        terms = summary.term_count,
        secs = summary.elapsed_secs,
        "build complete"
    );
    Ok(summary)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec(value)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_corpus(dir: &Path) {
        fs::write(
            dir.join("manifest.json"),
            r#"{"documents": ["a.json", "b.json"]}"#,
        )
        .unwrap();
        fs::write(
            dir.join("a.json"),
            r#"{"url":"https://a.com/#x","content":"<title>Cats</title><p>The cat sat on the mat</p>"}"#,
        )
        .unwrap();
        fs::write(
            dir.join("b.json"),
            r#"{"url":"https://b.com","content":"<p>The cat slept</p>"}"#,
        )
        .unwrap();
    }

    #[test]
    fn runs_end_to_end_build() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write_corpus(input.path());

        let mut config = BuildConfig::new(input.path().to_path_buf(), output.path().to_path_buf());
        config.batch_size = 1;

        let summary = run_build(&config).unwrap();
        assert_eq!(summary.documents_indexed, 2);
        assert!(summary.term_count > 0);
        assert!(output.path().join("index.ndjson").exists());
        assert!(output.path().join("term_index.json").exists());
        assert!(output.path().join("doc_lengths.json").exists());
        assert!(output.path().join("meta.json").exists());
    }
}
