//! Minimal, dependency-free HTML-to-text extraction.
//!
//! This is a stand-in for the external collaborator that the spec
//! assumes the host supplies (see `SPEC_FULL.md` section 1) — no corpus-
//! specific HTML quirks are handled, just enough tag-stripping to run
//! the pipeline end to end. It tracks which output spans came from
//! title/h1-h3/strong/b tags so the analyzer can tag "important" terms.

const IMPORTANT_TAGS: &[&str] = &["title", "h1", "h2", "h3", "strong", "b"];
const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// Extracted plain text plus the byte ranges (into that text) that came
/// from an important tag.
pub struct Extracted {
    pub text: String,
    pub important_spans: Vec<(usize, usize)>,
}

pub fn extract_text(html: &str) -> Extracted {
    let mut out = String::new();
    let mut important_spans = Vec::new();
    let mut tag_stack: Vec<String> = Vec::new();
    let mut important_start: Option<usize> = None;

    let chars: Vec<char> = html.chars().collect();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '<' {
            let start = i;
            while i < chars.len() && chars[i] != '>' {
                i += 1;
            }
            let tag_inner: String = chars[start + 1..i].iter().collect();
            i += 1; // consume '>'

            let closing = tag_inner.starts_with('/');
            let name_src = if closing { &tag_inner[1..] } else { &tag_inner[..] };
            let name: String = name_src
                .chars()
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            let self_closing = tag_inner.trim_end().ends_with('/');

            if closing {
                if let Some(top) = tag_stack.last() {
                    if *top == name {
                        tag_stack.pop();
                    }
                }
                if IMPORTANT_TAGS.contains(&name.as_str()) && !is_important(&tag_stack) {
                    if let Some(start) = important_start.take() {
                        if out.len() > start {
                            important_spans.push((start, out.len()));
                        }
                    }
                }
            } else if !self_closing {
                tag_stack.push(name.clone());
                if IMPORTANT_TAGS.contains(&name.as_str()) && important_start.is_none() {
                    important_start = Some(out.len());
                }
            }
            continue;
        }

        if let Some(top) = tag_stack.last() {
            if SKIPPED_TAGS.contains(&top.as_str()) {
                i += 1;
                continue;
            }
        }

        // Collapse runs of whitespace inline so that `important_spans`
        // (recorded as byte offsets into `out`) stay valid against the
        // text we actually return, rather than against a pre-collapse
        // string with different offsets.
        if chars[i].is_whitespace() {
            if !out.is_empty() && !out.ends_with(' ') {
                out.push(' ');
            }
        } else {
            out.push(chars[i]);
        }
        i += 1;
    }

    if let Some(start) = important_start.take() {
        if out.len() > start {
            important_spans.push((start, out.len()));
        }
    }

    let trimmed_len = out.trim_end().len();
    out.truncate(trimmed_len);
    let text = out.trim_start().to_string();
    let trim_offset = out.len() - text.len();
    let important_spans = important_spans
        .into_iter()
        .filter_map(|(start, end)| {
            let start = start.saturating_sub(trim_offset);
            let end = end.saturating_sub(trim_offset);
            if end > start {
                Some((start, end))
            } else {
                None
            }
        })
        .collect();

    Extracted {
        text,
        important_spans,
    }
}

fn is_important(stack: &[String]) -> bool {
    stack.iter().any(|t| IMPORTANT_TAGS.contains(&t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let extracted = extract_text("<html><body><p>Hello   <b>world</b></p></body></html>");
        assert_eq!(extracted.text, "Hello world");
    }

    #[test]
    fn skips_script_and_style_content() {
        let extracted = extract_text("<p>Keep</p><script>var x = 1;</script><style>.a{}</style>");
        assert_eq!(extracted.text, "Keep");
    }

    #[test]
    fn title_text_is_not_lost() {
        let extracted = extract_text("<title>My Page</title><p>Body text</p>");
        assert_eq!(extracted.text, "My Page Body text");
        assert_eq!(extracted.important_spans.len(), 1);
    }
}
