//! Download pipelines.
//!
//! [`GameDownloader`] handles one game; [`SystemDownloader`] walks a whole
//! system and delegates each game to it. Both run strictly sequentially through
//! the shared rate-limited client.

mod game;
mod progress;
mod system;

pub use game::GameDownloader;
pub use progress::ProgressReporter;
pub use system::SystemDownloader;
