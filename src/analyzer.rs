//! Turns a raw corpus document into stemmed, posting-ready terms.
//!
//! Grounded on `original_source/indexer.py`'s per-document pipeline:
//! strip the URL fragment, extract text, tokenize, stem every token.

use crate::html;
use crate::stemmer::Stemmer;
use crate::tokenizer;

/// A single stemmed occurrence in a document, with its important flag.
pub struct AnalyzedTerm {
    pub stem: String,
    pub important: bool,
}

pub struct AnalyzedDocument {
    pub doc_id: String,
    pub terms: Vec<AnalyzedTerm>,
}

/// Canonical URL: the part before the first `#` fragment marker.
pub fn canonical_url(url: &str) -> String {
    url.split('#').next().unwrap_or(url).to_string()
}

pub fn analyze_document(
    url: &str,
    html_content: &str,
    stemmer: &Stemmer,
    min_token_len: usize,
) -> AnalyzedDocument {
    let doc_id = canonical_url(url);
    let extracted = html::extract_text(html_content);

    let mut terms = Vec::new();
    let mut offset = 0usize;
    for token in tokenizer::tokenize_build(&extracted.text, min_token_len) {
        // Re-locate the token's approximate position to judge importance.
        // tokenize_build lowercases and strips delimiters, so we track
        // position by scanning forward from the last match; this is
        // approximate but sufficient since important_spans only need to
        // overlap the originating tag's text, not byte-exact token spans.
        let lower = extracted.text.to_lowercase();
        let found = lower[offset..].find(&token).map(|p| p + offset);
        let important = match found {
            Some(pos) => {
                offset = pos + token.len();
                extracted
                    .important_spans
                    .iter()
                    .any(|(start, end)| pos >= *start && pos < *end)
            }
            None => false,
        };

        terms.push(AnalyzedTerm {
            stem: stemmer.stem(&token),
            important,
        });
    }

    AnalyzedDocument { doc_id, terms }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fragment_from_url() {
        assert_eq!(canonical_url("https://a.com/p#section"), "https://a.com/p");
        assert_eq!(canonical_url("https://a.com/p"), "https://a.com/p");
    }

    #[test]
    fn analyzes_title_terms_as_important() {
        let stemmer = Stemmer::new();
        let doc = analyze_document(
            "https://a.com/#x",
            "<title>Running Dogs</title><p>content about cats</p>",
            &stemmer,
            3,
        );
        assert_eq!(doc.doc_id, "https://a.com/");
        let important: Vec<_> = doc.terms.iter().filter(|t| t.important).collect();
        assert!(important.iter().any(|t| t.stem == "run" || t.stem == "dog"));
        assert!(doc.terms.iter().any(|t| t.stem == "cat" && !t.important));
    }
}
