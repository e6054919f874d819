//! Build-time and query-time tokenization.
//!
//! Build-time tokens are maximal runs of ASCII alphabetic characters;
//! query-time tokens additionally allow digits, so a query like "rfc2822"
//! still extracts as one run (matching the alphabetic subset at build
//! time so stems agree). Both modes apply the same minimum-length
//! filter.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Alphabetic,
    Alphanumeric,
}

fn scan(text: &str, min_len: usize, mode: Mode) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut tokens = Vec::new();
    let mut run = String::new();

    let keep = |c: char| match mode {
        Mode::Alphabetic => c.is_ascii_alphabetic(),
        Mode::Alphanumeric => c.is_ascii_alphanumeric(),
    };

    for c in lower.chars() {
        if keep(c) {
            run.push(c);
        } else if !run.is_empty() {
            if run.len() >= min_len {
                tokens.push(std::mem::take(&mut run));
            } else {
                run.clear();
            }
        }
    }
    if run.len() >= min_len {
        tokens.push(run);
    }

    tokens
}

/// Tokenize document text at build time: lowercase, maximal alphabetic
/// runs, minimum length `min_len` (default 3, see `original_source/tokenizer.py`).
pub fn tokenize_build(text: &str, min_len: usize) -> Vec<String> {
    scan(text, min_len, Mode::Alphabetic)
}

/// Tokenize a query string: same scan, but digits are allowed in a run.
pub fn tokenize_query(text: &str, min_len: usize) -> Vec<String> {
    scan(text, min_len, Mode::Alphanumeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_non_alphabetic() {
        let tokens = tokenize_build("The cat sat, slept!", 3);
        assert_eq!(tokens, vec!["the", "cat", "sat", "slept"]);
    }

    #[test]
    fn drops_short_runs() {
        let tokens = tokenize_build("a an the ox cat", 3);
        assert_eq!(tokens, vec!["the", "cat"]);
    }

    #[test]
    fn query_mode_keeps_digits() {
        let tokens = tokenize_query("rfc2822 and rfc822", 3);
        assert_eq!(tokens, vec!["rfc2822", "and", "rfc822"]);
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokenize_build("", 3).is_empty());
        assert!(tokenize_build("12345 !!! ", 3).is_empty());
    }
}
