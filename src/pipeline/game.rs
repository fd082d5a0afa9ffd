//! Downloading every MIDI file of one game.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use super::progress::{ProgressReporter, item_label};
use crate::catalog::CatalogRepository;
use crate::domain::MidiFile;
use crate::http::KhinsiderClient;
use crate::storage::{FileRepository, sanitize_path_component};

/// Per-game pipeline: list the game's files, then fetch and save each one.
#[derive(Clone)]
pub struct GameDownloader<'a> {
    client: &'a KhinsiderClient,
    catalog: &'a dyn CatalogRepository,
    storage: &'a dyn FileRepository,
    progress: ProgressReporter,
}

impl std::fmt::Debug for GameDownloader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameDownloader")
            .field("client", &self.client)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl<'a> GameDownloader<'a> {
    #[must_use]
    pub fn new(
        client: &'a KhinsiderClient,
        catalog: &'a dyn CatalogRepository,
        storage: &'a dyn FileRepository,
    ) -> Self {
        Self {
            client,
            catalog,
            storage,
            progress: ProgressReporter::default(),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Downloads the files of the game at `game_url` into `output_dir`.
    ///
    /// Returns the files that are on disk afterwards, in listing order. With
    /// `resume`, a file whose destination already exists counts as downloaded
    /// without being fetched again. Files whose fetch or save fails are left
    /// out; they never abort the rest of the game.
    #[instrument(skip(self, output_dir), fields(output_dir = %output_dir.display()))]
    pub async fn execute(&self, game_url: &str, output_dir: &Path, resume: bool) -> Vec<MidiFile> {
        let midi_files = self.catalog.list_midi_files(game_url).await;
        if midi_files.is_empty() {
            info!("No MIDI files found for this game.");
            return Vec::new();
        }

        self.storage.create_directory(output_dir).await;

        let bar = self.progress.bar(midi_files.len(), "Downloading MIDIs", "file");
        let mut downloaded = Vec::with_capacity(midi_files.len());

        for midi in midi_files {
            bar.set_message(item_label(&midi.name));
            if let Some(midi) = self.download_one(midi, output_dir, resume).await {
                downloaded.push(midi);
            }
            bar.inc(1);
        }

        bar.finish_and_clear();
        debug!(downloaded = downloaded.len(), "game finished");
        downloaded
    }

    async fn download_one(
        &self,
        mut midi: MidiFile,
        output_dir: &Path,
        resume: bool,
    ) -> Option<MidiFile> {
        let destination = output_dir.join(sanitize_path_component(&midi.filename()));

        if resume && self.storage.file_exists(&destination).await {
            midi.size_bytes = self.storage.file_size(&destination).await;
            midi.mark_downloaded();
            debug!(path = %destination.display(), "already on disk, skipping");
            return Some(midi);
        }

        let content = self.client.fetch_bytes(&midi.url).await?;
        if !self.storage.save_file(&content, &destination).await {
            warn!(name = %midi.name, path = %destination.display(), "skipping file that could not be saved");
            return None;
        }

        midi.size_bytes = content.len() as u64;
        midi.mark_downloaded();
        debug!(path = %destination.display(), bytes = midi.size_bytes, "downloaded");
        Some(midi)
    }
}
