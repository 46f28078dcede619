//! In-memory injection: placeholder substitution and marker replacement.
//!
//! [`Injector::apply`] is pure; file handling lives in [`crate::file`].

use crate::error::Result;
use mcp_core::{InjectConfig, Markers};
use regex::{Captures, Regex};
use serde::Serialize;
use std::borrow::Cow;

/// Where the fragment was (or would have been) placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionSite {
    /// A block written by an earlier run, delimited by start and end markers
    ExistingBlock,
    /// A `# [CONNECTED_MCP_SERVERS]` line
    Placeholder,
}

/// What happened to the marker region of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InjectionOutcome {
    /// The fragment was placed at the injection site
    Injected,
    /// A site exists but there was no fragment; the site was left alone
    SkippedNoContent,
    /// Neither markers nor placeholder were found
    SkippedNoSite,
}

impl InjectionOutcome {
    /// Returns `true` unless the fragment was injected.
    #[must_use]
    pub const fn is_skip(&self) -> bool {
        !matches!(self, Self::Injected)
    }
}

/// Result of [`Injector::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
    /// The updated text.
    pub content: String,

    /// Marker outcome.
    pub outcome: InjectionOutcome,

    /// Site found in the text, if any.
    pub site: Option<InjectionSite>,

    /// Number of placeholder tokens substituted.
    pub placeholders_replaced: usize,

    /// Whether `content` differs from the input.
    pub changed: bool,
}

/// Applies placeholder values and the YAML fragment to template text.
///
/// # Examples
///
/// ```
/// use mcp_core::InjectConfig;
/// use mcp_inject::{InjectionOutcome, Injector};
///
/// let injector = Injector::new(
///     &InjectConfig::default(),
///     vec![("[OS_PLACEHOLDER]".to_string(), "Linux".to_string())],
/// )
/// .unwrap();
///
/// let template = "OS: [OS_PLACEHOLDER]\nservers:\n  # [CONNECTED_MCP_SERVERS]\nrest\n";
/// let result = injector.apply(template, Some("    servers: []"));
///
/// assert_eq!(result.outcome, InjectionOutcome::Injected);
/// assert_eq!(
///     result.content,
///     "OS: Linux\nservers:\n  # MCP Server list injected by script\n    servers: []\n  # End MCP Server list\nrest\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Injector {
    substitutions: Vec<(String, String)>,
    start_marker: String,
    end_marker: String,
    site_regex: Regex,
    expand_escapes: bool,
    dry_run: bool,
}

impl Injector {
    /// Creates an injector for the configured markers.
    ///
    /// `substitutions` pairs each placeholder token with its value and is
    /// applied in order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::InjectError::Pattern`] if the marker pattern cannot be
    /// compiled.
    pub fn new(config: &InjectConfig, substitutions: Vec<(String, String)>) -> Result<Self> {
        let markers = &config.markers;
        Ok(Self {
            substitutions,
            start_marker: markers.start.trim().to_string(),
            end_marker: markers.end.trim().to_string(),
            site_regex: Regex::new(&site_pattern(markers))?,
            expand_escapes: true,
            dry_run: false,
        })
    }

    /// When enabled, [`Injector::process_file`] reports but never writes.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Whether fragments carry doubled backslashes that are collapsed on
    /// insertion (see [`expand_replacement`]). Enabled by default; disable
    /// it for fragments rendered without backslash escaping so they are
    /// inserted verbatim.
    #[must_use]
    pub const fn expand_escapes(mut self, enabled: bool) -> Self {
        self.expand_escapes = enabled;
        self
    }

    /// Returns `true` if writes are disabled.
    #[must_use]
    pub const fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Substitutes placeholders, then replaces the first injection site.
    ///
    /// With `fragment == None` the site is left untouched and the outcome is
    /// [`InjectionOutcome::SkippedNoContent`]. Placeholder substitution
    /// happens regardless.
    #[must_use]
    pub fn apply(&self, content: &str, fragment: Option<&str>) -> Injection {
        let (text, placeholders_replaced) = self.substitute(content);

        let found = self.site_regex.captures(&text).map(|caps| {
            let replacement = fragment.map(|f| self.render_block(&caps, f));
            (site_kind(&caps), caps.get_match().range(), replacement)
        });

        let (updated, outcome, site) = match found {
            None => (text, InjectionOutcome::SkippedNoSite, None),
            Some((site, _, None)) => (text, InjectionOutcome::SkippedNoContent, Some(site)),
            Some((site, span, Some(replacement))) => {
                let mut updated = text;
                updated.replace_range(span, &replacement);
                (updated, InjectionOutcome::Injected, Some(site))
            }
        };

        Injection {
            changed: updated != content,
            content: updated,
            outcome,
            site,
            placeholders_replaced,
        }
    }

    fn substitute(&self, content: &str) -> (String, usize) {
        let mut text = content.to_string();
        let mut count = 0;
        for (token, value) in &self.substitutions {
            if token.is_empty() {
                continue;
            }
            let occurrences = text.matches(token.as_str()).count();
            if occurrences > 0 {
                count += occurrences;
                text = text.replace(token.as_str(), value);
            }
        }
        (text, count)
    }

    fn render_block(&self, caps: &Captures<'_>, fragment: &str) -> String {
        let indent = caps
            .name("block_indent")
            .or_else(|| caps.name("placeholder_indent"))
            .map_or("", |m| m.as_str());
        let terminator = caps
            .name("block_eol")
            .or_else(|| caps.name("placeholder_eol"))
            .map_or("", |m| m.as_str());
        let newline = if terminator == "\r\n" { "\r\n" } else { "\n" };

        let body = if self.expand_escapes {
            expand_replacement(fragment)
        } else {
            Cow::Borrowed(fragment)
        };
        let body = if newline == "\n" {
            body
        } else {
            Cow::Owned(body.replace('\n', newline))
        };

        format!(
            "{indent}{start}{newline}{body}{newline}{indent}{end}{terminator}",
            start = self.start_marker,
            end = self.end_marker,
        )
    }
}

fn site_kind(caps: &Captures<'_>) -> InjectionSite {
    if caps.name("block").is_some() {
        InjectionSite::ExistingBlock
    } else {
        InjectionSite::Placeholder
    }
}

/// Pattern matching either an existing marker block or a placeholder line,
/// whichever comes first.
fn site_pattern(markers: &Markers) -> String {
    let start = regex::escape(markers.start.trim());
    let end = regex::escape(markers.end.trim());
    let placeholder = regex::escape(markers.placeholder.trim());
    format!(
        r"(?m)(?P<block>^(?P<block_indent>[ \t]*){start}[ \t]*\r?\n(?s:.*?)^[ \t]*{end}[ \t]*(?P<block_eol>\r?\n|\z))|(?P<placeholder>^(?P<placeholder_indent>[ \t]*)#[ \t]*{placeholder}[ \t]*(?P<placeholder_eol>\r?\n|\z))"
    )
}

/// Expands a replacement template: `\\` becomes `\`, every other character,
/// including `$` and a lone backslash, is literal.
///
/// This undoes the backslash doubling applied when the fragment was
/// rendered.
///
/// # Examples
///
/// ```
/// use mcp_inject::expand_replacement;
///
/// assert_eq!(expand_replacement(r"C:\\tools\\a.exe"), r"C:\tools\a.exe");
/// assert_eq!(expand_replacement("cost: $5"), "cost: $5");
/// ```
#[must_use]
pub fn expand_replacement(template: &str) -> Cow<'_, str> {
    if !template.contains('\\') {
        return Cow::Borrowed(template);
    }

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' && chars.peek() == Some(&'\\') {
            chars.next();
        }
    }
    Cow::Owned(out)
}
