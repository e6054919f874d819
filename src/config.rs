//! Tunables shared by the build and query pipelines, with the spec's
//! defaults. Constructed once from parsed CLI args; never a global.

use std::path::PathBuf;

pub const DEFAULT_BATCH_SIZE: usize = 2000;
pub const DEFAULT_SIMHASH_THRESHOLD: u32 = 3;
pub const DEFAULT_MIN_TOKEN_LEN: usize = 3;
pub const DEFAULT_DOC_LENGTH: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupMode {
    None,
    Exact,
    Near,
}

impl std::str::FromStr for DedupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "exact" => Ok(Self::Exact),
            "near" => Ok(Self::Near),
            other => Err(format!("unknown dedup mode: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub batch_size: usize,
    pub min_token_len: usize,
}

impl BuildConfig {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            batch_size: DEFAULT_BATCH_SIZE,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub index_dir: PathBuf,
    pub simhash_threshold: u32,
    pub min_token_len: usize,
    pub dedup_mode: DedupMode,
    pub max_results: usize,
}

impl SearchConfig {
    pub fn new(index_dir: PathBuf) -> Self {
        Self {
            index_dir,
            simhash_threshold: DEFAULT_SIMHASH_THRESHOLD,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            dedup_mode: DedupMode::Near,
            max_results: 100,
        }
    }
}
