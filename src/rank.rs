//! TF-IDF ranking with length normalization and boolean AND filtering
//! (spec 4.6).
//!
//! Grounded on `original_source/search.py::compute_tf_idf_scores` and
//! `merge_postings_ranked` — same formulas, same rank-then-intersect
//! ordering, same insertion-order tie-break.

use std::collections::{HashMap, HashSet};

use crate::build::partial::Posting;
use crate::config::DEFAULT_DOC_LENGTH;

/// One query term's fetched posting list (empty if the term was absent
/// from the dictionary).
pub struct TermPostings<'a> {
    pub term: &'a str,
    pub postings: &'a [Posting],
}

/// Rank documents by TF-IDF score, then narrow to the boolean AND
/// intersection of every non-empty query term's posting list.
///
/// `query_terms` preserves multiplicities: a repeated term is scored once
/// per occurrence (matching `original_source/search.py::compute_tf_idf_scores`'s
/// `zip(query_terms, postings_list)` over the non-deduplicated query), so
/// `"cat cat"` contributes twice what `"cat"` alone does. `term_postings`
/// carries one entry per *distinct* term (the already-fetched posting
/// list), looked up by name for each occurrence in `query_terms`.
pub fn rank(
    query_terms: &[String],
    term_postings: &[TermPostings<'_>],
    total_docs: u64,
    doc_lengths: &HashMap<String, u64>,
) -> Vec<String> {
    // df and idf per distinct query term, plus a name -> postings lookup
    // for scoring each occurrence in `query_terms`.
    let mut term_idf: HashMap<&str, f64> = HashMap::new();
    let mut postings_by_term: HashMap<&str, &[Posting]> = HashMap::new();
    for tp in term_postings {
        let df = tp.postings.len();
        let idf = if df > 0 {
            (total_docs as f64 / df as f64).ln()
        } else {
            0.0
        };
        term_idf.insert(tp.term, idf);
        postings_by_term.insert(tp.term, tp.postings);
    }

    // Insertion-ordered score accumulation, once per query-term occurrence.
    let mut order: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut scores: Vec<f64> = Vec::new();

    for term in query_terms {
        let postings = match postings_by_term.get(term.as_str()) {
            Some(postings) if !postings.is_empty() => *postings,
            _ => continue,
        };
        let idf = term_idf[term.as_str()];
        for posting in postings {
            let tf = posting.freq;
            let tf_weight = if tf > 0 { 1.0 + (tf as f64).ln() } else { 0.0 };
            let doc_len = *doc_lengths
                .get(&posting.doc_id)
                .unwrap_or(&DEFAULT_DOC_LENGTH);
            let len_norm = if doc_len > 0 {
                1.0 / (doc_len as f64).sqrt()
            } else {
                1.0
            };
            let contribution = tf_weight * idf * len_norm;

            match index.get(&posting.doc_id) {
                Some(&i) => scores[i] += contribution,
                None => {
                    index.insert(posting.doc_id.clone(), order.len());
                    order.push(posting.doc_id.clone());
                    scores.push(contribution);
                }
            }
        }
    }

    let mut ranked: Vec<(String, f64)> = order.into_iter().zip(scores).collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let ranked_ids: Vec<String> = ranked.into_iter().map(|(id, _)| id).collect();

    if query_terms.is_empty() {
        return ranked_ids;
    }

    let non_empty_sets: Vec<HashSet<&str>> = term_postings
        .iter()
        .filter(|tp| !tp.postings.is_empty())
        .map(|tp| tp.postings.iter().map(|p| p.doc_id.as_str()).collect())
        .collect();

    if non_empty_sets.is_empty() {
        return Vec::new();
    }

    ranked_ids
        .into_iter()
        .filter(|doc_id| non_empty_sets.iter().all(|set| set.contains(doc_id.as_str())))
        .collect()
}
