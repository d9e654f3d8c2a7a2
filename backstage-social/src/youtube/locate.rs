//! Blob locator: find the inline script that carries `ytInitialData` and parse the object
//! literal assigned to it.
//!
//! The literal is delimited by bracket matching rather than by searching for the next
//! `};`, which also occurs inside string values of real pages.
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use super::error::ExtractError;

pub const MARKER: &str = "ytInitialData";

// Matches `ytInitialData = `, `var ytInitialData = ` and `window["ytInitialData"] = `.
static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"ytInitialData"?\]?\s*=\s*"#).expect("valid assignment regex"));

static SCRIPT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script").expect("valid script selector"));

/// Parse the embedded data blob out of a channel page.
pub fn locate_blob(html: &str) -> Result<Value, ExtractError> {
    let script = marked_script(html).ok_or(ExtractError::NotFound { marker: MARKER })?;
    let literal = object_literal(&script)?;
    tracing::debug!(
        script_len = script.len(),
        blob_len = literal.len(),
        "community.blob.located"
    );
    serde_json::from_str(literal).map_err(|e| ExtractError::Parse(e.to_string()))
}

/// Body of the first inline script, in document order, that mentions the marker.
pub fn marked_script(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    doc.select(&SCRIPT)
        .map(|el| el.text().collect::<String>())
        .find(|body| body.contains(MARKER))
}

fn object_literal(script: &str) -> Result<&str, ExtractError> {
    let mut saw_assignment = false;
    for m in ASSIGNMENT.find_iter(script) {
        let rest = &script[m.end()..];
        if !rest.starts_with('{') {
            continue;
        }
        saw_assignment = true;
        if let Some(obj) = balanced_object(rest) {
            return Ok(obj);
        }
    }
    if saw_assignment {
        Err(ExtractError::Parse("object literal is never closed".into()))
    } else {
        Err(ExtractError::Parse("no object assigned to ytInitialData".into()))
    }
}

/// `s` starts with `{`; returns the prefix up to its matching `}`.
fn balanced_object(s: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in s.bytes().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(scripts: &[&str]) -> String {
        let body: String = scripts
            .iter()
            .map(|s| format!("<script>{s}</script>"))
            .collect();
        format!("<html><head></head><body>{body}</body></html>")
    }

    #[test]
    fn missing_marker_is_not_found() {
        let html = page(&["var x = 1;", "console.log('hi');"]);
        assert!(matches!(
            locate_blob(&html),
            Err(ExtractError::NotFound { .. })
        ));
    }

    #[test]
    fn marker_outside_scripts_is_not_found() {
        let html = "<html><body><p>ytInitialData = {\"a\":1};</p></body></html>";
        assert!(matches!(
            locate_blob(html),
            Err(ExtractError::NotFound { .. })
        ));
    }

    #[test]
    fn invalid_json_is_parse_error() {
        let html = page(&[r#"var ytInitialData = {"a": };"#]);
        assert!(matches!(locate_blob(&html), Err(ExtractError::Parse(_))));
    }

    #[test]
    fn unterminated_object_is_parse_error() {
        let html = page(&[r#"var ytInitialData = {"a": {"b": 1};"#]);
        assert!(matches!(locate_blob(&html), Err(ExtractError::Parse(_))));
    }

    #[test]
    fn marker_without_assignment_is_parse_error() {
        let html = page(&["if (window.ytInitialData) { run(); }"]);
        assert!(matches!(locate_blob(&html), Err(ExtractError::Parse(_))));
    }

    #[test]
    fn string_values_may_contain_braces_and_terminators() {
        let html = page(&[r#"var ytInitialData = {"text": "a };\"} b", "n": {"k": [1, 2]}}; var other = {};"#]);
        let blob = locate_blob(&html).unwrap();
        assert_eq!(blob["text"], "a };\"} b");
        assert_eq!(blob["n"]["k"][1], 2);
    }

    #[test]
    fn window_index_assignment_is_supported() {
        let html = page(&[r#"window["ytInitialData"] = {"ok": true};"#]);
        assert_eq!(locate_blob(&html).unwrap()["ok"], true);
    }

    #[test]
    fn first_marked_script_wins() {
        let html = page(&[
            "var ytcfg = {};",
            r#"var ytInitialData = {"which": "first"};"#,
            r#"var ytInitialData = {"which": "second"};"#,
        ]);
        assert_eq!(locate_blob(&html).unwrap()["which"], "first");
    }

    #[test]
    fn skips_non_object_mentions_before_the_assignment() {
        let html = page(&[r#"window.ytInitialData = window.ytInitialData || null; ytInitialData = {"x": 1};"#]);
        assert_eq!(locate_blob(&html).unwrap()["x"], 1);
    }
}
