//! Archive catalog: what systems, games and files exist.
//!
//! [`CatalogRepository`] is the seam the download pipeline depends on;
//! [`KhinsiderCatalog`] implements it by fetching pages through the shared
//! [`KhinsiderClient`] and handing them to [`PageParser`]. Fetch failures have
//! already been logged by the client and surface here as empty listings.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::domain::{Game, GameSystem, MidiFile};
use crate::http::KhinsiderClient;
use crate::parser::PageParser;

/// Placeholder for a name that cannot be derived from a game URL.
pub const UNKNOWN_NAME: &str = "unknown";

/// Listing operations needed by the download pipeline.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// All systems offered by the archive.
    async fn list_systems(&self) -> Vec<GameSystem>;

    /// Games listed for `system` (the system's URL segment, e.g. `gameboy`).
    async fn list_games(&self, system: &str) -> Vec<Game>;

    /// MIDI files of the game at `game_url`, with direct-download URLs
    /// resolved where the detail page provides one.
    async fn list_midi_files(&self, game_url: &str) -> Vec<MidiFile>;
}

/// [`CatalogRepository`] that scrapes the live archive.
#[derive(Debug)]
pub struct KhinsiderCatalog<'a> {
    client: &'a KhinsiderClient,
    parser: PageParser,
}

impl<'a> KhinsiderCatalog<'a> {
    #[must_use]
    pub fn new(client: &'a KhinsiderClient, parser: PageParser) -> Self {
        Self { client, parser }
    }

    #[must_use]
    pub fn parser(&self) -> &PageParser {
        &self.parser
    }

    /// Listing URL of `system`: `{site_root}/midi/{system}`, with `system`
    /// percent-encoded as a single path segment.
    ///
    /// `None` for an empty, `.` or `..` system name, or a site root that is
    /// not an absolute URL.
    #[must_use]
    pub fn listing_url(&self, system: &str) -> Option<String> {
        if matches!(system, "" | "." | "..") {
            return None;
        }
        let mut url = Url::parse(self.parser.site_root()).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .push("midi")
            .push(system);
        Some(url.into())
    }

    /// Replaces the listing URL of each file with the direct link from its
    /// detail page, one fetch per file in listing order.
    async fn resolve_download_urls(&self, files: &mut [MidiFile]) {
        for file in files.iter_mut().filter(|f| !f.url.is_empty()) {
            let Some(html) = self.client.fetch_text(&file.url).await else {
                continue;
            };
            match self.parser.parse_download_url(&html) {
                Some(direct) => {
                    debug!(name = %file.name, from = %file.url, to = %direct, "resolved download URL");
                    file.url = direct;
                }
                None => debug!(name = %file.name, url = %file.url, "no download link on detail page"),
            }
        }
    }
}

#[async_trait]
impl CatalogRepository for KhinsiderCatalog<'_> {
    async fn list_systems(&self) -> Vec<GameSystem> {
        debug!("system enumeration is not supported by the archive scraper");
        Vec::new()
    }

    #[instrument(skip(self))]
    async fn list_games(&self, system: &str) -> Vec<Game> {
        let Some(url) = self.listing_url(system) else {
            warn!(system, "not a valid system name");
            return Vec::new();
        };
        let Some(html) = self.client.fetch_text(&url).await else {
            return Vec::new();
        };
        self.parser.parse_game_list(&html, system)
    }

    #[instrument(skip(self))]
    async fn list_midi_files(&self, game_url: &str) -> Vec<MidiFile> {
        let Some(html) = self.client.fetch_text(game_url).await else {
            return Vec::new();
        };

        let (game_name, system_name) = names_from_game_url(game_url);
        let mut files = self.parser.parse_midi_list(&html, &game_name, &system_name);
        info!(game = %game_name, files = files.len(), "resolving download links");

        self.resolve_download_urls(&mut files).await;
        files
    }
}

/// `(game, system)` names taken from the last two path segments of a game URL.
///
/// Trailing slashes are ignored; a missing or empty segment reads as
/// [`UNKNOWN_NAME`].
#[must_use]
pub fn names_from_game_url(game_url: &str) -> (String, String) {
    let mut segments = game_url.trim_end_matches('/').rsplit('/');
    let mut next_name = || {
        segments
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_NAME)
            .to_string()
    };
    let game = next_name();
    let system = next_name();
    (game, system)
}
