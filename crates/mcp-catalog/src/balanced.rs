//! Balanced-brace extraction of JSON objects embedded in prose.

/// Finds the first `{` in `text` and returns the substring up to its
/// matching `}`, inclusive.
///
/// Matching is plain depth counting: `{` increments, `}` decrements, and the
/// substring ends where depth returns to zero. Braces inside JSON strings are
/// counted too. Returns `None` if there is no `{` or the braces never
/// balance before the end of `text`.
///
/// # Examples
///
/// ```
/// use mcp_catalog::extract_balanced_json;
///
/// let text = r#"  {"type":"object","properties":{"a":{}}} trailing"#;
/// assert_eq!(
///     extract_balanced_json(text),
///     Some(r#"{"type":"object","properties":{"a":{}}}"#)
/// );
/// assert_eq!(extract_balanced_json(r#"{"a": 1"#), None);
/// assert_eq!(extract_balanced_json("no braces"), None);
/// ```
#[must_use]
pub fn extract_balanced_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;

    for (offset, byte) in text.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}
