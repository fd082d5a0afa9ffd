//! A game and its MIDI files.

use super::MidiFile;

/// A game listed under a system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub name: String,
    /// Listing page for this game's files.
    pub url: String,
    pub system: String,
    /// Filled in after the game has been downloaded.
    pub midi_files: Vec<MidiFile>,
}

impl Game {
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>, system: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            system: system.into(),
            midi_files: Vec::new(),
        }
    }

    pub fn add_midi_file(&mut self, midi_file: MidiFile) {
        self.midi_files.push(midi_file);
    }

    #[must_use]
    pub fn total_midi_count(&self) -> usize {
        self.midi_files.len()
    }
}
