//! Downloading every game of one system.

use std::path::Path;

use tracing::{info, instrument};

use super::game::GameDownloader;
use super::progress::{ProgressReporter, item_label};
use crate::catalog::CatalogRepository;
use crate::domain::Game;
use crate::storage::{FileRepository, sanitize_path_component};

/// Per-system pipeline: list the system's games and run [`GameDownloader`]
/// on each, one after another.
#[derive(Clone)]
pub struct SystemDownloader<'a> {
    catalog: &'a dyn CatalogRepository,
    storage: &'a dyn FileRepository,
    games: GameDownloader<'a>,
    progress: ProgressReporter,
}

impl std::fmt::Debug for SystemDownloader<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemDownloader")
            .field("games", &self.games)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl<'a> SystemDownloader<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a dyn CatalogRepository,
        storage: &'a dyn FileRepository,
        games: GameDownloader<'a>,
    ) -> Self {
        Self {
            catalog,
            storage,
            games,
            progress: ProgressReporter::default(),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    /// Downloads every game of `system` into `output_dir/<system>/<game>/`.
    ///
    /// Returns all listed games in order, each carrying the files that ended
    /// up on disk (possibly none).
    #[instrument(skip(self, output_dir), fields(output_dir = %output_dir.display()))]
    pub async fn execute(&self, system: &str, output_dir: &Path, resume: bool) -> Vec<Game> {
        let mut games = self.catalog.list_games(system).await;
        if games.is_empty() {
            info!("No games found for system: {system}");
            return Vec::new();
        }
        info!("Found {} games for {system}", games.len());

        let system_dir = output_dir.join(sanitize_path_component(system));
        self.storage.create_directory(&system_dir).await;

        let bar = self
            .progress
            .bar(games.len(), &format!("Processing {system}"), "game");
        for game in &mut games {
            bar.set_message(item_label(&game.name));
            let game_dir = system_dir.join(sanitize_path_component(&game.name));
            game.midi_files = self.games.execute(&game.url, &game_dir, resume).await;
            bar.inc(1);
        }
        bar.finish_and_clear();

        games
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::{GameSystem, MidiFile};
    use crate::http::{ClientConfig, KhinsiderClient};
    use crate::storage::FileSystemRepository;
    use async_trait::async_trait;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Two games; only `zelda` has a file, already present on disk.
    struct TwoGames;

    #[async_trait]
    impl CatalogRepository for TwoGames {
        async fn list_systems(&self) -> Vec<GameSystem> {
            Vec::new()
        }
        async fn list_games(&self, system: &str) -> Vec<Game> {
            if system != "gameboy" {
                return Vec::new();
            }
            vec![
                Game::new("Zelda: Awakening", "https://x/midi/gameboy/zelda", system),
                Game::new("Tetris", "https://x/midi/gameboy/tetris", system),
            ]
        }
        async fn list_midi_files(&self, game_url: &str) -> Vec<MidiFile> {
            if game_url.ends_with("zelda") {
                vec![MidiFile::new(
                    "Overworld",
                    "http://127.0.0.1:1/overworld.mid",
                    "zelda",
                    "gameboy",
                )]
            } else {
                Vec::new()
            }
        }
    }

    #[tokio::test]
    async fn test_execute_unknown_system_returns_empty() {
        let temp = TempDir::new().unwrap();
        let client =
            KhinsiderClient::new(ClientConfig::default().with_rate_limit_delay(Duration::ZERO))
                .unwrap();
        let storage = FileSystemRepository::new();
        let games = GameDownloader::new(&client, &TwoGames, &storage)
            .with_progress(ProgressReporter::hidden());
        let downloader = SystemDownloader::new(&TwoGames, &storage, games)
            .with_progress(ProgressReporter::hidden());

        assert!(downloader.execute("snes", temp.path(), false).await.is_empty());
        assert!(!temp.path().join("snes").exists());
    }

    #[tokio::test]
    async fn test_execute_places_games_under_sanitized_dirs() {
        let temp = TempDir::new().unwrap();
        let zelda_dir = temp.path().join("gameboy").join("Zelda_ Awakening");
        std::fs::create_dir_all(&zelda_dir).unwrap();
        std::fs::write(zelda_dir.join("overworld.mid"), b"MThd").unwrap();

        let client =
            KhinsiderClient::new(ClientConfig::default().with_rate_limit_delay(Duration::ZERO))
                .unwrap();
        let storage = FileSystemRepository::new();
        let games = GameDownloader::new(&client, &TwoGames, &storage)
            .with_progress(ProgressReporter::hidden());
        let downloader = SystemDownloader::new(&TwoGames, &storage, games)
            .with_progress(ProgressReporter::hidden());

        let result = downloader.execute("gameboy", temp.path(), true).await;

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].name, "Zelda: Awakening");
        assert_eq!(result[0].total_midi_count(), 1);
        assert!(result[0].midi_files[0].downloaded);
        assert_eq!(result[1].total_midi_count(), 0);
        assert!(temp.path().join("gameboy").is_dir());
        assert!(!temp.path().join("gameboy").join("Tetris").exists());
    }
}
