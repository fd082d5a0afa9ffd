//! Progress bars for download runs.

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Longest item name shown next to a bar before it is cut.
const LABEL_MAX_CHARS: usize = 30;

/// Hands out progress bars; every bar is hidden when progress is disabled.
///
/// Clones share one [`MultiProgress`], so a per-game bar created while a
/// per-system bar is active is drawn beneath it instead of fighting over the
/// same terminal line.
///
/// The default reporter is hidden; callers that own a terminal opt in with
/// [`ProgressReporter::new`].
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    multi: Option<MultiProgress>,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::hidden()
    }
}

impl ProgressReporter {
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            multi: enabled.then(MultiProgress::new),
        }
    }

    /// A reporter whose bars are never drawn.
    #[must_use]
    pub fn hidden() -> Self {
        Self::new(false)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.multi.is_some()
    }

    /// Creates a bar over `len` items of `unit`, prefixed with `prefix`.
    pub(crate) fn bar(&self, len: usize, prefix: &str, unit: &str) -> ProgressBar {
        let Some(multi) = &self.multi else {
            return ProgressBar::hidden();
        };
        let bar = multi.add(ProgressBar::new(u64::try_from(len).unwrap_or(u64::MAX)));
        bar.set_style(
            ProgressStyle::with_template(&format!(
                "{{prefix}}: {{percent:>3}}%|{{bar:25}}| {{pos}}/{{len}} {unit} {{msg}}"
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix(prefix.to_string());
        bar
    }
}

/// Item label shown beside a bar: the first 30 characters of `name` plus `...`.
pub(crate) fn item_label(name: &str) -> String {
    let truncated: String = name.chars().take(LABEL_MAX_CHARS).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_label_truncates_to_thirty_chars() {
        assert_eq!(item_label("Overworld"), "Overworld...");
        let long = "A".repeat(45);
        assert_eq!(item_label(&long), format!("{}...", "A".repeat(30)));
    }

    #[test]
    fn test_item_label_counts_chars_not_bytes() {
        let name = "ドラゴンクエスト".repeat(5);
        let label = item_label(&name);
        assert_eq!(label.chars().count(), 33);
    }

    #[test]
    fn test_hidden_reporter_creates_hidden_bars() {
        let reporter = ProgressReporter::hidden();
        assert!(!reporter.is_enabled());
        assert!(reporter.bar(3, "Downloading MIDIs", "file").is_hidden());
    }

    #[test]
    fn test_default_reporter_is_hidden() {
        let reporter = ProgressReporter::default();
        assert!(!reporter.is_enabled());
        assert!(reporter.bar(1, "Processing nes", "game").is_hidden());
    }

    #[test]
    fn test_enabled_reporter_tracks_length() {
        let reporter = ProgressReporter::new(true);
        assert!(reporter.is_enabled());
        let bar = reporter.bar(5, "Processing nes", "game");
        assert_eq!(bar.length(), Some(5));
        bar.finish_and_clear();
    }
}
