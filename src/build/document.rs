//! Raw corpus document shape and the manifest listing which files to
//! load.
//!
//! Grounded on `original_source/indexer.py`'s per-document JSON shape
//! (`{content, encoding, url}`) and the teacher's
//! `src/build/manifest.rs` (`InputManifest`) / `src/build/document.rs`
//! (`Document`) split between "what to load" and "what was loaded".

use serde::{Deserialize, Serialize};

/// One raw document as read from the corpus directory: HTML content plus
/// its source URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Document {
    pub url: String,
    pub content: String,
    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

/// Lists the document files to load, relative to the input directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputManifest {
    pub documents: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_defaults_encoding() {
        let doc: Document =
            serde_json::from_str(r#"{"url":"https://a.com","content":"<p>hi</p>"}"#).unwrap();
        assert_eq!(doc.encoding, "utf-8");
    }

    #[test]
    fn manifest_round_trips() {
        let manifest = InputManifest {
            documents: vec!["a.json".into(), "b.json".into()],
        };
        let json = serde_json::to_string(&manifest).unwrap();
        let back: InputManifest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.documents, manifest.documents);
    }
}
