//! Link normalization for scraped `href` values.

/// Turns a scraped `href` into an absolute URL.
///
/// - `//host/path` becomes `https://host/path`
/// - `/path` is prefixed with `site_root`
/// - anything else is returned unchanged (assumed absolute)
///
/// ```
/// use midi_downloader::parser::normalize_url;
///
/// let root = "https://www.khinsider.com";
/// assert_eq!(normalize_url("//x/y.mid", root), "https://x/y.mid");
/// assert_eq!(normalize_url("/x/y.mid", root), "https://www.khinsider.com/x/y.mid");
/// assert_eq!(normalize_url("https://a/b.mid", root), "https://a/b.mid");
/// ```
#[must_use]
pub fn normalize_url(href: &str, site_root: &str) -> String {
    let href = href.trim();
    if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else if href.starts_with('/') {
        format!("{}{href}", site_root.trim_end_matches('/'))
    } else {
        href.to_string()
    }
}
