//! A single downloadable MIDI track.

/// A downloadable MIDI file belonging to a game.
///
/// Created while parsing a game's listing page. The `url` starts out as the
/// listing link and is overwritten with the direct-download link once the
/// detail page has been resolved. `size_bytes` and `downloaded` are only set
/// by the download pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MidiFile {
    /// Display name taken from the listing anchor text.
    pub name: String,
    /// Listing URL, or the resolved direct-download URL.
    pub url: String,
    /// Name of the owning game.
    pub game_name: String,
    /// Name of the owning system.
    pub system: String,
    /// Size on disk, 0 until downloaded.
    pub size_bytes: u64,
    /// Whether the file has been saved (or was found on disk in resume mode).
    pub downloaded: bool,
}

impl MidiFile {
    /// Creates a file entry that has not been downloaded yet.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        game_name: impl Into<String>,
        system: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            game_name: game_name.into(),
            system: system.into(),
            size_bytes: 0,
            downloaded: false,
        }
    }

    /// Filename used on disk: the last path segment of `url`, or
    /// `<name>.mid` when the URL is empty.
    ///
    /// The segment is returned verbatim (no percent-decoding). Callers that
    /// turn it into a path must sanitize it first.
    #[must_use]
    pub fn filename(&self) -> String {
        if self.url.is_empty() {
            return format!("{}.mid", self.name);
        }
        self.url
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    /// Marks this file as downloaded.
    pub fn mark_downloaded(&mut self) {
        self.downloaded = true;
    }
}
