//! Scraping of archive listing and detail pages.
//!
//! The archive renders both game lists and file lists as the first `<table>`
//! of the page; each data row links the entity from its first cell. Per-file
//! detail pages carry a "Click here to download" anchor with the direct link.
//!
//! Parsing never fails. Missing tables, rows, cells or anchors simply yield
//! fewer results, so a site redesign shows up as empty listings rather than
//! errors.

mod html;
mod url;

pub use url::normalize_url;

use tracing::debug;

use crate::domain::{Game, MidiFile};
use crate::http::constants::DEFAULT_SITE_ROOT;

/// Anchor text marking the direct-download link on a detail page.
pub const DOWNLOAD_LINK_TEXT: &str = "Click here to download";

/// Substring a file link must contain to be treated as a MIDI file.
const MIDI_URL_MARKER: &str = ".mid";

/// Extracts games, files and download links from archive HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParser {
    site_root: String,
}

impl Default for PageParser {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_ROOT)
    }
}

impl PageParser {
    /// Creates a parser resolving root-relative links against `site_root`.
    #[must_use]
    pub fn new(site_root: impl Into<String>) -> Self {
        Self {
            site_root: site_root.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn site_root(&self) -> &str {
        &self.site_root
    }

    /// Normalizes a scraped link against this parser's site root.
    #[must_use]
    pub fn normalize_url(&self, href: &str) -> String {
        normalize_url(href, &self.site_root)
    }

    /// Parses a system page into its games, in row order.
    ///
    /// The first table row is a header and is skipped.
    #[must_use]
    pub fn parse_game_list(&self, html: &str, system_name: &str) -> Vec<Game> {
        let games: Vec<Game> = self
            .linked_rows(html, 1)
            .into_iter()
            .map(|(name, url)| Game::new(name, url, system_name))
            .collect();
        debug!(system = system_name, games = games.len(), "parsed game list");
        games
    }

    /// Parses a game page into its MIDI files, in row order.
    ///
    /// No row is skipped; rows whose link does not contain `.mid` are dropped.
    #[must_use]
    pub fn parse_midi_list(&self, html: &str, game_name: &str, system_name: &str) -> Vec<MidiFile> {
        let files: Vec<MidiFile> = self
            .linked_rows(html, 0)
            .into_iter()
            .filter(|(_, url)| url.contains(MIDI_URL_MARKER))
            .map(|(name, url)| MidiFile::new(name, url, game_name, system_name))
            .collect();
        debug!(
            game = game_name,
            system = system_name,
            files = files.len(),
            "parsed MIDI list"
        );
        files
    }

    /// Finds the direct-download link on a detail page.
    ///
    /// Returns the normalized `href` of the first anchor whose text contains
    /// [`DOWNLOAD_LINK_TEXT`], or `None` if there is none or its `href` is empty.
    #[must_use]
    pub fn parse_download_url(&self, html: &str) -> Option<String> {
        let html = html::strip_comments(html);
        let anchor = html::anchors(&html).find(|a| a.text.contains(DOWNLOAD_LINK_TEXT))?;
        let href = anchor.href.filter(|href| !href.trim().is_empty())?;
        Some(self.normalize_url(&href))
    }

    /// `(name, normalized url)` of every row of the first table with at least
    /// two cells and an anchor in the first cell, after skipping `skip` rows.
    /// Commented-out markup is ignored.
    fn linked_rows(&self, html: &str, skip: usize) -> Vec<(String, String)> {
        let html = html::strip_comments(html);
        let Some(table) = html::first_table(&html) else {
            debug!("no table found on page");
            return Vec::new();
        };

        html::rows(table)
            .into_iter()
            .skip(skip)
            .filter_map(|row| {
                let cells = html::cells(row);
                if cells.len() < 2 {
                    return None;
                }
                let anchor = html::first_anchor(cells[0])?;
                let url = self.normalize_url(anchor.href.as_deref().unwrap_or_default());
                Some((anchor.text, url))
            })
            .collect()
    }
}
