//! Low-level markup scanning for listing and detail pages.
//!
//! These helpers are deliberately naive and keyed to the archive's table
//! layout. Tag names match case-insensitively, and an unclosed element ends
//! where the next sibling of the same kind starts (or at the end of its
//! parent).

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Compiles a regex at static init; panics on invalid pattern.
pub(crate) fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

static TABLE_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)<table\b[^>]*>"));
static TABLE_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)</table\s*>"));
static TR_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)<tr\b[^>]*>"));
static TR_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)</tr\s*>"));
static TD_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)<td\b[^>]*>"));
static TD_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)</td\s*>"));
static ANCHOR_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)<a\b([^>]*)>"));
static ANCHOR_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)</a\s*>"));
// `href` must be a whole attribute name: `data-href` is not a link.
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(r#"(?is)(?:^|\s)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
});
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?s)<!--.*?(?:-->|$)"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?s)<[^>]*>"));

/// An `<a>` element: its `href` (if any) and visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Anchor {
    pub href: Option<String>,
    pub text: String,
}

/// Returns the inner markup of the first `<table>` in the document.
pub(crate) fn first_table(html: &str) -> Option<&str> {
    let open = TABLE_OPEN_RE.find(html)?;
    let rest = &html[open.end()..];
    let end = TABLE_CLOSE_RE.find(rest).map_or(rest.len(), |m| m.start());
    Some(&rest[..end])
}

/// Inner markup of each `<tr>` in `table`, in document order.
pub(crate) fn rows(table: &str) -> Vec<&str> {
    blocks(table, &TR_OPEN_RE, &TR_CLOSE_RE)
}

/// Inner markup of each `<td>` in `row`, in document order. `<th>` cells are not included.
pub(crate) fn cells(row: &str) -> Vec<&str> {
    blocks(row, &TD_OPEN_RE, &TD_CLOSE_RE)
}

/// First anchor in `fragment`.
pub(crate) fn first_anchor(fragment: &str) -> Option<Anchor> {
    anchors(fragment).next()
}

/// All anchors in `fragment`, in document order.
///
/// An anchor without a close tag ends where the next `<a>` starts.
pub(crate) fn anchors(fragment: &str) -> impl Iterator<Item = Anchor> + '_ {
    let opens: Vec<_> = ANCHOR_OPEN_RE.captures_iter(fragment).collect();
    let limits: Vec<usize> = opens
        .iter()
        .skip(1)
        .filter_map(|caps| caps.get(0).map(|m| m.start()))
        .chain(std::iter::once(fragment.len()))
        .collect();
    opens
        .into_iter()
        .zip(limits)
        .filter_map(move |(caps, limit)| {
            let tag = caps.get(0)?;
            let body = &fragment[tag.end()..limit];
            let inner = ANCHOR_CLOSE_RE.find(body).map_or(body, |end| &body[..end.start()]);
            Some(anchor_from_parts(caps.get(1).map_or("", |m| m.as_str()), inner))
        })
}

/// Removes `<!-- ... -->` comments; an unterminated comment runs to the end.
pub(crate) fn strip_comments(html: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(html, "")
}

/// Removes tags, decodes entities and trims.
pub(crate) fn visible_text(fragment: &str) -> String {
    decode_entities(&TAG_RE.replace_all(fragment, ""))
        .trim()
        .to_string()
}

/// Decodes named and numeric character references.
pub(crate) fn decode_entities(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}

fn anchor_from_parts(attributes: &str, inner: &str) -> Anchor {
    let href = HREF_RE.captures(attributes).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .or_else(|| caps.get(3))
            .map(|m| decode_entities(m.as_str()))
    });
    Anchor {
        href,
        text: visible_text(inner),
    }
}

/// Splits `html` into the inner markup of each `open`..`close` element.
/// An element without a close tag ends where the next one opens.
fn blocks<'a>(html: &'a str, open: &Regex, close: &Regex) -> Vec<&'a str> {
    let starts: Vec<_> = open.find_iter(html).collect();
    starts
        .iter()
        .enumerate()
        .map(|(i, start)| {
            let limit = starts.get(i + 1).map_or(html.len(), |next| next.start());
            let body = &html[start.end()..limit];
            close.find(body).map_or(body, |end| &body[..end.start()])
        })
        .collect()
}
