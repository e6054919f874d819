//! Thin wrapper around the external Porter-style stemmer.
//!
//! The stemming algorithm itself is an external collaborator per spec;
//! this module owns only the call site, so the rest of the crate never
//! constructs a `rust_stemmers::Stemmer` directly.

use rust_stemmers::{Algorithm, Stemmer as RustStemmer};

pub struct Stemmer {
    inner: RustStemmer,
}

impl Stemmer {
    pub fn new() -> Self {
        Self {
            inner: RustStemmer::create(Algorithm::English),
        }
    }

    pub fn stem(&self, token: &str) -> String {
        self.inner.stem(token).into_owned()
    }
}

impl Default for Stemmer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems_common_suffixes() {
        let stemmer = Stemmer::new();
        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("sleeping"), "sleep");
        assert_eq!(stemmer.stem("cats"), "cat");
    }
}
