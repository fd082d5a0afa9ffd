//! Default User-Agent string for archive requests.

/// Default User-Agent: browser-compatible prefix so the site serves normal
/// pages, followed by the tool name and crate version.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("Mozilla/5.0 (compatible; MIDIDownloader/{version})")
}
