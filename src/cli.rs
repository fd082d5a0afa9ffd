//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use midi_downloader::http::constants::{DEFAULT_MAX_RETRIES, DEFAULT_SITE_ROOT, REQUEST_TIMEOUT_SECS};

/// Largest accepted `--delay`, in seconds.
const MAX_DELAY_SECS: f64 = 60.0;

/// Download MIDI files from the khinsider.com archive.
///
/// Fetches either one game (`--game <URL>`) or every game of a system
/// (`--system <NAME>`) into an output directory, politely rate limited.
#[derive(Parser, Debug)]
#[command(name = "midi-downloader")]
#[command(author, version, about)]
#[command(group(ArgGroup::new("target").required(true).args(["system", "game"])))]
pub struct Args {
    /// Gaming system to download (e.g. gameboy, nes)
    #[arg(long, value_name = "NAME")]
    pub system: Option<String>,

    /// Specific game page URL to download
    #[arg(long, value_name = "URL")]
    pub game: Option<String>,

    /// Output directory for downloads
    #[arg(short, long, value_name = "DIR", default_value = "./midi_downloads")]
    pub output: PathBuf,

    /// Delay between requests in seconds (0 to disable, max 60)
    #[arg(short, long, value_name = "SECS", default_value_t = 1.0, value_parser = parse_delay)]
    pub delay: f64,

    /// Skip files already present in the output directory
    #[arg(long)]
    pub resume: bool,

    /// Custom User-Agent string
    #[arg(long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Maximum retries for transient server errors (0-10)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(0..=10))]
    pub max_retries: u8,

    /// Per-request timeout in seconds (1-600)
    #[arg(long, value_name = "SECS", default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout: u64,

    /// Archive root that listing pages and relative links resolve against
    #[arg(long, value_name = "URL", default_value = DEFAULT_SITE_ROOT)]
    pub site_root: String,

    /// Hide progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

fn parse_delay(value: &str) -> Result<f64, String> {
    let secs: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    if !(0.0..=MAX_DELAY_SECS).contains(&secs) {
        return Err(format!("delay must be between 0 and {MAX_DELAY_SECS} seconds"));
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_game_mode_defaults() {
        let args =
            Args::try_parse_from(["midi-downloader", "--game", "https://x/midi/nes/metroid"])
                .unwrap();
        assert_eq!(args.game.as_deref(), Some("https://x/midi/nes/metroid"));
        assert_eq!(args.system, None);
        assert_eq!(args.output, PathBuf::from("./midi_downloads"));
        assert!((args.delay - 1.0).abs() < f64::EPSILON);
        assert!(!args.resume);
        assert_eq!(args.user_agent, None);
        assert_eq!(args.max_retries, 3); // DEFAULT_MAX_RETRIES
        assert_eq!(args.timeout, 30);
        assert_eq!(args.site_root, "https://www.khinsider.com");
        assert!(!args.no_progress);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_system_mode_with_all_flags() {
        let args = Args::try_parse_from([
            "midi-downloader",
            "--system",
            "gameboy",
            "-o",
            "/tmp/midis",
            "-d",
            "0.5",
            "--resume",
            "--user-agent",
            "custom/2.0",
            "-r",
            "5",
            "--timeout",
            "90",
            "--no-progress",
        ])
        .unwrap();
        assert_eq!(args.system.as_deref(), Some("gameboy"));
        assert_eq!(args.output, PathBuf::from("/tmp/midis"));
        assert!((args.delay - 0.5).abs() < f64::EPSILON);
        assert!(args.resume);
        assert_eq!(args.user_agent.as_deref(), Some("custom/2.0"));
        assert_eq!(args.max_retries, 5);
        assert_eq!(args.timeout, 90);
        assert!(args.no_progress);
    }

    #[test]
    fn test_cli_requires_system_or_game() {
        let err = Args::try_parse_from(["midi-downloader"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_cli_rejects_system_and_game_together() {
        let err = Args::try_parse_from([
            "midi-downloader",
            "--system",
            "nes",
            "--game",
            "https://x/midi/nes/metroid",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["midi-downloader", "--system", "nes", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let args = Args::try_parse_from(["midi-downloader", "--system", "nes", "-q"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["midi-downloader", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["midi-downloader", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    // ==================== Delay Tests ====================

    #[test]
    fn test_cli_delay_zero_disables() {
        let args =
            Args::try_parse_from(["midi-downloader", "--system", "nes", "-d", "0"]).unwrap();
        assert!(args.delay.abs() < f64::EPSILON);
    }

    #[test]
    fn test_cli_delay_out_of_range_rejected() {
        for bad in ["-1", "60.5", "abc", "NaN"] {
            let flag = format!("--delay={bad}");
            let err = Args::try_parse_from(["midi-downloader", "--system", "nes", flag.as_str()])
                .unwrap_err();
            assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation, "{bad}");
        }
    }

    #[test]
    fn test_cli_delay_max_value() {
        let args =
            Args::try_parse_from(["midi-downloader", "--system", "nes", "-d", "60"]).unwrap();
        assert!((args.delay - 60.0).abs() < f64::EPSILON);
    }

    // ==================== Retry / Timeout Tests ====================

    #[test]
    fn test_cli_max_retries_over_max_rejected() {
        let err = Args::try_parse_from(["midi-downloader", "--system", "nes", "-r", "11"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cli_max_retries_zero_allowed() {
        let args =
            Args::try_parse_from(["midi-downloader", "--system", "nes", "-r", "0"]).unwrap();
        assert_eq!(args.max_retries, 0);
    }

    #[test]
    fn test_cli_timeout_zero_rejected() {
        let err = Args::try_parse_from(["midi-downloader", "--system", "nes", "--timeout", "0"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_parse_delay_accepts_fractions() {
        assert!((parse_delay(" 2.5 ").unwrap() - 2.5).abs() < f64::EPSILON);
        assert!(parse_delay("60.01").is_err());
    }
}
