//! A gaming system (gameboy, nes, ...).

use super::Game;

/// A gaming system grouping games.
///
/// The catalog does not enumerate systems yet, so nothing in the download
/// flow builds one of these; it exists for callers that assemble their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSystem {
    pub name: String,
    pub url: String,
    pub games: Vec<Game>,
}

impl GameSystem {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            games: Vec::new(),
        }
    }

    pub fn add_game(&mut self, game: Game) {
        self.games.push(game);
    }

    #[must_use]
    pub fn total_games(&self) -> usize {
        self.games.len()
    }
}
