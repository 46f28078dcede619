//! Locating the server section inside the source document.

use mcp_core::Delimiters;
use std::borrow::Cow;
use thiserror::Error;

/// Errors locating the server section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SectionError {
    /// The start delimiter does not occur in the document.
    #[error("start delimiter not found")]
    StartNotFound,
}

/// The text of the server section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section<'a> {
    /// Text strictly between the delimiters.
    pub body: &'a str,

    /// `false` when the end delimiter was missing and `body` runs to the end
    /// of the document.
    pub terminated: bool,
}

/// Converts `\r\n` line endings to `\n`.
///
/// Delimiters are matched as literal strings, so this must run before
/// [`locate_section`].
///
/// # Examples
///
/// ```
/// use mcp_catalog::normalize_line_endings;
///
/// assert_eq!(normalize_line_endings("a\r\nb\n"), "a\nb\n");
/// ```
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Finds the text between `delimiters.start` and the first `delimiters.end`
/// after it.
///
/// A missing end delimiter is tolerated: the section then runs to the end
/// of `text` and [`Section::terminated`] is `false`.
///
/// # Errors
///
/// Returns [`SectionError::StartNotFound`] if the start delimiter is absent.
///
/// # Examples
///
/// ```
/// use mcp_catalog::locate_section;
/// use mcp_core::Delimiters;
///
/// let delimiters = Delimiters {
///     start: "<<".to_string(),
///     end: ">>".to_string(),
/// };
/// let section = locate_section("a << servers >> b", &delimiters).unwrap();
/// assert_eq!(section.body, " servers ");
/// assert!(section.terminated);
/// ```
pub fn locate_section<'a>(
    text: &'a str,
    delimiters: &Delimiters,
) -> Result<Section<'a>, SectionError> {
    let start = text
        .find(&delimiters.start)
        .ok_or(SectionError::StartNotFound)?
        + delimiters.start.len();

    let rest = &text[start..];
    Ok(match rest.find(&delimiters.end) {
        Some(end) => Section {
            body: &rest[..end],
            terminated: true,
        },
        None => Section {
            body: rest,
            terminated: false,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delimiters() -> Delimiters {
        Delimiters {
            start: "\n\nSTART\n\n".to_string(),
            end: "\n## End".to_string(),
        }
    }

    #[test]
    fn test_section_between_delimiters() {
        let doc = "intro\n\nSTART\n\n## A (a)\nbody\n## End\ntail";
        let section = locate_section(doc, &delimiters()).unwrap();
        assert_eq!(section.body, "## A (a)\nbody");
        assert!(section.terminated);
    }

    #[test]
    fn test_missing_start() {
        let doc = "no delimiter here\n## End";
        assert_eq!(
            locate_section(doc, &delimiters()),
            Err(SectionError::StartNotFound)
        );
    }

    #[test]
    fn test_missing_end_runs_to_eof() {
        let doc = "x\n\nSTART\n\n## A (a)\nbody\n";
        let section = locate_section(doc, &delimiters()).unwrap();
        assert_eq!(section.body, "## A (a)\nbody\n");
        assert!(!section.terminated);
    }

    #[test]
    fn test_end_before_start_is_ignored() {
        let doc = "\n## End\n\n\nSTART\n\nbody";
        let section = locate_section(doc, &delimiters()).unwrap();
        assert_eq!(section.body, "body");
        assert!(!section.terminated);
    }

    #[test]
    fn test_crlf_must_be_normalized_first() {
        let doc = "x\r\n\r\nSTART\r\n\r\nbody\r\n## End";
        assert!(locate_section(doc, &delimiters()).is_err());

        let normalized = normalize_line_endings(doc);
        let section = locate_section(&normalized, &delimiters()).unwrap();
        assert_eq!(section.body, "body");
    }

    #[test]
    fn test_normalize_borrows_when_clean() {
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }
}
