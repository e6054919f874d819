//! CLI definitions for the corpusidx command-line interface.
//!
//! Two subcommands: `build` to construct an index from a corpus
//! directory, and `search` to open an interactive REPL against a built
//! index.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DedupMode, DEFAULT_BATCH_SIZE, DEFAULT_MIN_TOKEN_LEN, DEFAULT_SIMHASH_THRESHOLD};

#[derive(Parser)]
#[command(name = "corpusidx", about = "Batch-built inverted-index search engine", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a search index from a directory of JSON documents.
    Build {
        /// Input directory containing manifest.json and document files.
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the index, dictionary, and sidecars.
        #[arg(short, long)]
        output: PathBuf,

        /// Flush a partial index file every N documents.
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,

        /// Minimum surviving token length.
        #[arg(long, default_value_t = DEFAULT_MIN_TOKEN_LEN)]
        min_token_len: usize,
    },

    /// Open an interactive query REPL against a built index.
    Search {
        /// Directory containing index.ndjson and term_index.json.
        #[arg(short, long)]
        index: PathBuf,

        /// Hamming distance threshold for near-duplicate suppression.
        #[arg(long, default_value_t = DEFAULT_SIMHASH_THRESHOLD)]
        simhash_threshold: u32,

        /// Duplicate suppression mode: none, exact, or near.
        #[arg(long, default_value = "near")]
        dedup: String,

        /// Maximum results to display per query.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

impl Commands {
    pub fn dedup_mode(dedup: &str) -> DedupMode {
        dedup.parse().unwrap_or(DedupMode::Near)
    }
}
