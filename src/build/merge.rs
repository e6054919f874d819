//! K-way merge of sorted partials into the final postings file and term
//! dictionary (spec 4.4).
//!
//! The pop/fold/refill discipline is taken directly from
//! `original_source/compile_indexes.py::k_way_merge_partials_to_terms`;
//! the `BinaryHeap<Reverse<HeapEntry>>` shape, keyed `(term,
//! source_index)` so ties break on which partial was read first, mirrors
//! `examples/other_examples/e44acb88_beshubh-harvest__src-indexer.rs.rs`
//! and `examples/motedb-motedb/src/storage/lsm/merging_iterator.rs`.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::build::partial::{PartialRecord, Posting};
use crate::error::{CorpusIdxError, Result};

struct HeapEntry {
    term: String,
    source_index: usize,
    postings: Vec<Posting>,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.term == other.term && self.source_index == other.source_index
    }
}
impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.term
            .cmp(&other.term)
            .then_with(|| self.source_index.cmp(&other.source_index))
    }
}

struct PartialReader {
    lines: std::io::Lines<BufReader<File>>,
    path: PathBuf,
    line_no: usize,
}

impl PartialReader {
    fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            lines: BufReader::new(file).lines(),
            path: path.to_path_buf(),
            line_no: 0,
        })
    }

    fn next_record(&mut self) -> Result<Option<PartialRecord>> {
        match self.lines.next() {
            None => Ok(None),
            Some(line) => {
                let line = line?;
                self.line_no += 1;
                if line.trim().is_empty() {
                    return self.next_record();
                }
                serde_json::from_str(&line).map(Some).map_err(|_| {
                    CorpusIdxError::CorruptPartial {
                        file: self.path.clone(),
                        line: self.line_no,
                    }
                })
            }
        }
    }
}

pub struct MergeOutput {
    pub postings_path: PathBuf,
    pub dictionary_path: PathBuf,
    pub term_count: usize,
}

/// Merge `partial_files` (each already sorted ascending by term) into
/// `output_dir/index.ndjson` and `output_dir/term_index.json`.
pub fn merge_partials(partial_files: &[PathBuf], output_dir: &Path) -> Result<MergeOutput> {
    let mut readers: Vec<PartialReader> = partial_files
        .iter()
        .map(|p| PartialReader::open(p))
        .collect::<Result<_>>()?;

    let mut heap: BinaryHeap<Reverse<HeapEntry>> = BinaryHeap::new();
    for (idx, reader) in readers.iter_mut().enumerate() {
        if let Some(record) = reader.next_record()? {
            heap.push(Reverse(HeapEntry {
                term: record.term,
                source_index: idx,
                postings: record.postings,
            }));
        }
    }

    let postings_path = output_dir.join("index.ndjson");
    let dictionary_path = output_dir.join("term_index.json");
    let postings_tmp_path = postings_path.with_extension("ndjson.tmp");
    let file = File::create(&postings_tmp_path)?;
    let mut writer = BufWriter::new(file);

    let mut dictionary: HashMap<String, u64> = HashMap::new();
    let mut offset: u64 = 0;

    while let Some(Reverse(popped)) = heap.pop() {
        let term = popped.term;
        let mut merged: HashMap<String, u32> = HashMap::new();
        for p in popped.postings {
            *merged.entry(p.doc_id).or_insert(0) += p.freq;
        }

        // Refill the source of the entry we just popped.
        refill(&mut readers, popped.source_index, &mut heap)?;

        // Fold in any other heap entries sharing this term.
        while let Some(top) = heap.peek() {
            if top.0.term != term {
                break;
            }
            let Reverse(next) = heap.pop().unwrap();
            for p in next.postings {
                *merged.entry(p.doc_id).or_insert(0) += p.freq;
            }
            refill(&mut readers, next.source_index, &mut heap)?;
        }

        let mut postings: Vec<Posting> = merged
            .into_iter()
            .map(|(doc_id, freq)| Posting { doc_id, freq })
            .collect();
        postings.sort_by(|a, b| a.doc_id.cmp(&b.doc_id));
        let sf: u64 = postings.iter().map(|p| p.freq as u64).sum();

        dictionary.insert(term.clone(), offset);

        let line = serde_json::to_string(&serde_json::json!({
            "term": term,
            "sf": sf,
            "postings": postings,
        }))?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        offset += line.len() as u64 + 1;
    }
    writer.flush()?;
    drop(writer);
    fs::rename(&postings_tmp_path, &postings_path)?;

    let dictionary_tmp_path = dictionary_path.with_extension("json.tmp");
    let dict_file = File::create(&dictionary_tmp_path)?;
    serde_json::to_writer(dict_file, &dictionary)?;
    fs::rename(&dictionary_tmp_path, &dictionary_path)?;

    Ok(MergeOutput {
        term_count: dictionary.len(),
        postings_path,
        dictionary_path,
    })
}

fn refill(
    readers: &mut [PartialReader],
    source_index: usize,
    heap: &mut BinaryHeap<Reverse<HeapEntry>>,
) -> Result<()> {
    if let Some(record) = readers[source_index].next_record()? {
        heap.push(Reverse(HeapEntry {
            term: record.term,
            source_index,
            postings: record.postings,
        }));
    }
    Ok(())
}

/// Final term record as read back from `index.ndjson`.
#[derive(Debug, serde::Deserialize)]
pub struct TermRecord {
    pub term: String,
    pub sf: u64,
    pub postings: Vec<Posting>,
}

/// Seek to `offset` in the postings file and parse exactly one record.
pub fn read_term_record_at(postings_path: &Path, offset: u64) -> Result<TermRecord> {
    let mut file = File::open(postings_path)?;
    file.seek(SeekFrom::Start(offset))?;
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    reader.read_line(&mut line)?;
    serde_json::from_str(&line).map_err(CorpusIdxError::Json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_partial(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut f = File::create(&path).unwrap();
        for line in lines {
            writeln!(f, "{line}").unwrap();
        }
        path
    }

    #[test]
    fn merges_and_aggregates_across_partials() {
        // P1 {apple:[(D1,2)]}, P2 {apple:[(D1,3),(D2,1)], banana:[(D2,1)]}
        // merges to apple sf=6 [(D1,5),(D2,1)], banana sf=1 [(D2,1)].
        let dir = tempfile::tempdir().unwrap();
        let p1 = write_partial(
            dir.path(),
            "p1.ndjson",
            &[r#"{"term":"apple","postings":[{"doc_id":"D1","freq":2}]}"#],
        );
        let p2 = write_partial(
            dir.path(),
            "p2.ndjson",
            &[r#"{"term":"apple","postings":[{"doc_id":"D1","freq":3},{"doc_id":"D2","freq":1}]}"#,
              r#"{"term":"banana","postings":[{"doc_id":"D2","freq":1}]}"#],
        );

        let out = merge_partials(&[p1, p2], dir.path()).unwrap();
        assert_eq!(out.term_count, 2);

        let content = std::fs::read_to_string(&out.postings_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["term"], "apple");
        assert_eq!(first["sf"], 6);
        assert_eq!(first["postings"][0]["doc_id"], "D1");
        assert_eq!(first["postings"][0]["freq"], 5);
        assert_eq!(first["postings"][1]["doc_id"], "D2");
        assert_eq!(first["postings"][1]["freq"], 1);

        let dict: HashMap<String, u64> =
            serde_json::from_reader(File::open(&out.dictionary_path).unwrap()).unwrap();
        let record = read_term_record_at(&out.postings_path, dict["banana"]).unwrap();
        assert_eq!(record.term, "banana");
        assert_eq!(record.sf, 1);
    }

    #[test]
    fn corrupt_partial_line_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let p1 = write_partial(dir.path(), "p1.ndjson", &["not json at all"]);
        let err = merge_partials(&[p1], dir.path()).unwrap_err();
        match err {
            CorpusIdxError::CorruptPartial { line, .. } => assert_eq!(line, 1),
            other => panic!("expected CorruptPartial, got {other:?}"),
        }
    }
}
