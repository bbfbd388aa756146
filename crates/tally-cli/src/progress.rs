//! Progress display on stderr for long-running commands.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

/// A spinner or bar that stays hidden unless progress display is enabled.
pub struct Progress(ProgressBar);

impl Progress {
    /// Spinner for work of unknown length.
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        let progress = Self::styled(ProgressBar::new_spinner(), "{spinner:.cyan} {msg}");
        progress.0.enable_steady_tick(Duration::from_millis(100));
        progress.0.set_message(message.to_string());
        progress
    }

    /// One step per label of a batch run.
    #[must_use]
    pub fn labels(total: u64) -> Self {
        Self::styled(ProgressBar::new(total), "{wide_bar:.cyan/blue} {pos}/{len} {msg}")
    }

    fn styled(bar: ProgressBar, template: &str) -> Self {
        if !ui::prefs().progress {
            return Self(ProgressBar::hidden());
        }
        let style = ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_bar());
        Self(bar.with_style(style))
    }

    /// Count one finished label and show its name.
    pub fn advance(&self, label: &str) {
        self.0.set_message(label.to_string());
        self.0.inc(1);
    }

    pub fn finish(&self) {
        self.0.finish_and_clear();
    }
}
