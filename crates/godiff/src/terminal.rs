//! Terminal UI helpers: a spinner, a cycle progress bar, and styled messages.
//!
//! Everything here writes to stderr so stdout stays clean for reports and
//! generated programs.

use std::borrow::Cow;
use std::time::Duration;

use console::{Term, style};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

fn stderr_target() -> ProgressDrawTarget {
    if Term::stderr().is_term() {
        ProgressDrawTarget::stderr()
    } else {
        ProgressDrawTarget::hidden()
    }
}

/// Spinner for indeterminate progress.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        let bar = ProgressBar::with_draw_target(None, stderr_target());
        if let Ok(spinner_style) = ProgressStyle::default_spinner()
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(spinner_style);
        }
        bar.set_message(message);
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    pub fn finish_with_success(&self, message: &str) {
        self.bar.finish_and_clear();
        success(message);
    }

    pub fn finish_with_failure(&self, message: &str) {
        self.bar.finish_and_clear();
        error(message);
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Progress bar over a fixed number of cycles.
///
/// Hidden when stderr is not a terminal.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    pub fn new(total: u64, message: &str) -> Self {
        let bar = ProgressBar::with_draw_target(Some(total), stderr_target());
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("{msg} [{bar:30.cyan/dim}] {pos}/{len}")
        {
            bar.set_style(bar_style.progress_chars("━╸━"));
        }
        bar.set_message(message.to_string());
        Self { bar }
    }

    pub fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    /// Hide the bar while `f` prints, then redraw it.
    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        self.bar.suspend(f)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    eprintln!("{} {}", style("→").cyan(), message);
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    eprintln!("{} {}", style("✓").green().bold(), message);
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    eprintln!("{} {}", style("!").yellow().bold(), message);
}
