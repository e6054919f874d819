//! Benchmarks for the build pipeline (partial flush + k-way merge) and
//! query-time ranking across a handful of corpus sizes.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::tempdir;

use corpusidx::build::partial::PartialBuilder;
use corpusidx::analyzer::{self, AnalyzedDocument};
use corpusidx::stemmer::Stemmer;

const CORPUS_SIZES: &[usize] = &[20, 100, 500];

const WORDS: &[&str] = &[
    "rust", "search", "index", "token", "stem", "query", "rank", "corpus", "document", "term",
];

fn generate_html(doc_id: usize, word_count: usize) -> String {
    let body: String = (0..word_count)
        .map(|i| WORDS[(doc_id * 7 + i * 3) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ");
    format!("<html><title>Document {doc_id}</title><body>{body}</body></html>")
}

fn analyzed_corpus(doc_count: usize, words_per_doc: usize) -> Vec<AnalyzedDocument> {
    let stemmer = Stemmer::new();
    (0..doc_count)
        .map(|i| {
            let html = generate_html(i, words_per_doc);
            analyzer::analyze_document(&format!("https://example.com/{i}"), &html, &stemmer, 3)
        })
        .collect()
}

fn bench_partial_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_build");

    for &size in CORPUS_SIZES {
        let docs = analyzed_corpus(size, 200);

        group.bench_with_input(BenchmarkId::new("flush", size), &docs, |b, docs| {
            b.iter(|| {
                let dir = tempdir().unwrap();
                let mut builder = PartialBuilder::new(dir.path().to_path_buf(), 2000);
                for doc in docs {
                    builder.add(black_box(doc)).unwrap();
                }
                builder.flush().unwrap();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partial_build);
criterion_main!(benches);
