//! Exact and near duplicate suppression (spec 4.7).
//!
//! Grounded on `original_source/search.py`: `compute_exact_hash` (MD5),
//! `compute_simhash` (±1 bit-voting accumulator over 64 bits),
//! `hamming_distance` (popcount of XOR), `remove_exact_duplicates`, and
//! `remove_near_duplicates`.

use std::collections::HashSet;

/// MD5 hex digest of document content, used as the exact-duplicate key.
pub fn compute_content_hash(content: &str) -> String {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// 64-bit SimHash over a document's (stemmed) tokens.
pub fn compute_simhash(tokens: &[&str]) -> u64 {
    let mut votes = [0i32; 64];
    for token in tokens {
        let digest = md5::compute(token.as_bytes());
        let hash = u64::from_be_bytes(digest.0[0..8].try_into().unwrap());
        for (i, vote) in votes.iter_mut().enumerate() {
            if hash & (1 << i) != 0 {
                *vote += 1;
            } else {
                *vote -= 1;
            }
        }
    }

    let mut fingerprint: u64 = 0;
    for (i, vote) in votes.iter().enumerate() {
        if *vote > 0 {
            fingerprint |= 1 << i;
        }
    }
    fingerprint
}

pub fn hamming_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Keep only the first occurrence of each content hash. Docs with no
/// recorded hash fall back to their own doc_id (so they are effectively
/// never deduplicated against anything else). Preserves relative order.
pub fn remove_exact_duplicates(
    doc_ids: &[String],
    fingerprints: &std::collections::HashMap<String, String>,
) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    doc_ids
        .iter()
        .filter(|doc_id| {
            let key = fingerprints
                .get(doc_id.as_str())
                .cloned()
                .unwrap_or_else(|| (*doc_id).clone());
            seen.insert(key)
        })
        .cloned()
        .collect()
}

/// Keep a doc only if its simhash's Hamming distance to every previously
/// emitted simhash exceeds `threshold`. Docs with no recorded simhash are
/// always kept. Preserves relative order.
pub fn remove_near_duplicates(
    doc_ids: &[String],
    simhashes: &std::collections::HashMap<String, u64>,
    threshold: u32,
) -> Vec<String> {
    let mut seen_hashes: Vec<u64> = Vec::new();
    doc_ids
        .iter()
        .filter(|doc_id| match simhashes.get(doc_id.as_str()) {
            None => true,
            Some(hash) => {
                let is_dup = seen_hashes
                    .iter()
                    .any(|seen| hamming_distance(*hash, *seen) <= threshold);
                if !is_dup {
                    seen_hashes.push(*hash);
                }
                !is_dup
            }
        })
        .cloned()
        .collect()
}
