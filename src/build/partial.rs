//! Bounded-memory partial index builder and serializer (spec 4.2, 4.3).
//!
//! Grounded on `original_source/compile_indexes.py`'s partial record
//! shape and the teacher's `inverted.rs::build_inverted_index`
//! accumulation pattern. `pending` is a `BTreeMap` so a flush never
//! needs an explicit sort — iteration order is already term-ascending.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analyzer::AnalyzedDocument;
use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: String,
    pub freq: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PartialRecord {
    pub term: String,
    pub postings: Vec<Posting>,
}

/// Accumulates `term -> posting list` in memory and flushes to a new
/// partial file every `batch_size`-th document added.
pub struct PartialBuilder {
    pending: BTreeMap<String, Vec<Posting>>,
    docs_in_batch: usize,
    batch_size: usize,
    working_dir: PathBuf,
    next_partial_index: usize,
    pub partial_files: Vec<PathBuf>,
    pub doc_lengths: BTreeMap<String, u64>,
    pub total_docs: u64,
}

impl PartialBuilder {
    pub fn new(working_dir: PathBuf, batch_size: usize) -> Self {
        Self {
            pending: BTreeMap::new(),
            docs_in_batch: 0,
            batch_size,
            working_dir,
            next_partial_index: 0,
            partial_files: Vec::new(),
            doc_lengths: BTreeMap::new(),
            total_docs: 0,
        }
    }

    /// Fold one analyzed document's stems into the in-memory posting
    /// lists, flushing when the batch threshold is reached.
    pub fn add(&mut self, doc: &AnalyzedDocument) -> Result<()> {
        self.doc_lengths
            .insert(doc.doc_id.clone(), doc.terms.len() as u64);
        self.total_docs += 1;

        for term in &doc.terms {
            let postings = self.pending.entry(term.stem.clone()).or_default();
            match postings.iter_mut().find(|p| p.doc_id == doc.doc_id) {
                Some(p) => p.freq += 1,
                None => postings.push(Posting {
                    doc_id: doc.doc_id.clone(),
                    freq: 1,
                }),
            }
        }

        self.docs_in_batch += 1;
        if self.docs_in_batch >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Serialize the current batch to a new partial file and reset.
    /// A no-op when `pending` is empty (nothing added since the last flush).
    pub fn flush(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            self.docs_in_batch = 0;
            return Ok(());
        }

        let path = self
            .working_dir
            .join(format!("partial_{:05}.ndjson", self.next_partial_index));
        write_partial(&path, &self.pending)?;
        self.partial_files.push(path);
        self.next_partial_index += 1;

        self.pending.clear();
        self.docs_in_batch = 0;
        Ok(())
    }
}

fn write_partial(path: &Path, pending: &BTreeMap<String, Vec<Posting>>) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for (term, postings) in pending {
        let record = PartialRecord {
            term: term.clone(),
            postings: postings.clone(),
        };
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalyzedTerm;

    fn doc(doc_id: &str, stems: &[&str]) -> AnalyzedDocument {
        AnalyzedDocument {
            doc_id: doc_id.to_string(),
            terms: stems
                .iter()
                .map(|s| AnalyzedTerm {
                    stem: s.to_string(),
                    important: false,
                })
                .collect(),
        }
    }

    #[test]
    fn flushes_every_batch_size_documents() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = PartialBuilder::new(dir.path().to_path_buf(), 2);

        builder.add(&doc("d1", &["cat", "sat"])).unwrap();
        assert_eq!(builder.partial_files.len(), 0);
        builder.add(&doc("d2", &["cat", "slept"])).unwrap();
        assert_eq!(builder.partial_files.len(), 1);

        builder.add(&doc("d3", &["dog"])).unwrap();
        builder.flush().unwrap();
        assert_eq!(builder.partial_files.len(), 2);

        let content = std::fs::read_to_string(&builder.partial_files[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        // "cat" < "sat" < "slept" lexicographically within first batch.
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"cat\""));
    }

    #[test]
    fn increments_freq_on_repeat_term() {
        let dir = tempfile::tempdir().unwrap();
        let mut builder = PartialBuilder::new(dir.path().to_path_buf(), 10);
        builder.add(&doc("d1", &["cat", "cat", "cat"])).unwrap();
        builder.flush().unwrap();

        let content = std::fs::read_to_string(&builder.partial_files[0]).unwrap();
        let record: PartialRecord = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(record.postings[0].freq, 3);
    }
}
