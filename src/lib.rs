//! MIDI Downloader Library
//!
//! Downloads MIDI files from the khinsider.com archive, one game at a time or
//! a whole gaming system at once.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`domain`] - Systems, games and MIDI files
//! - [`http`] - Rate-limited, retrying HTTP client with a browser-like session
//! - [`parser`] - Table-based scraping of listing and detail pages
//! - [`catalog`] - Listing games and files through the client and parser
//! - [`storage`] - Writing files into the output tree
//! - [`pipeline`] - Per-game and per-system download runs

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod domain;
pub mod http;
pub mod parser;
pub mod pipeline;
pub mod storage;

mod user_agent;

// Re-export commonly used types
pub use catalog::{CatalogRepository, KhinsiderCatalog};
pub use domain::{Game, GameSystem, MidiFile};
pub use http::{ClientConfig, FetchError, KhinsiderClient};
pub use parser::PageParser;
pub use pipeline::{GameDownloader, ProgressReporter, SystemDownloader};
pub use storage::{FileRepository, FileSystemRepository, StorageError};
