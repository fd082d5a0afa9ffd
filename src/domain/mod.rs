//! Entities scraped from the archive.
//!
//! All entities live for a single run. The file system is the only durable
//! store: a downloaded [`MidiFile`] is persisted as bytes on disk and nothing
//! else is kept between invocations.

mod game;
mod game_system;
mod midi_file;

pub use game::Game;
pub use game_system::GameSystem;
pub use midi_file::MidiFile;
