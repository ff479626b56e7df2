//! Spinner for network-bound steps
//!
//! Fetching the workspace list can take a while on a slow link; the spinner
//! shows what is being waited on and for how long.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

const TICK_CHARS: &str = "\u{28CB}\u{2819}\u{2839}\u{2838}\u{283C}\u{2834}\u{2826}\u{2827}\u{2807}\u{280F}";

/// Spinner with elapsed time, silent in quiet mode or when stderr is not a terminal
pub struct CommandSpinner {
    bar: Option<ProgressBar>,
}

impl CommandSpinner {
    /// Start ticking immediately with `message`
    pub fn new(message: &str) -> Self {
        let style = ProgressStyle::with_template("{spinner:.green} {msg} ({elapsed:.dim})")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars(TICK_CHARS);

        let bar = ProgressBar::new_spinner();
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }

    /// Like `new`, but a no-op when `quiet` or output is piped
    pub fn new_maybe(message: &str, quiet: bool) -> Self {
        if quiet || !console::Term::stderr().is_term() {
            Self { bar: None }
        } else {
            Self::new(message)
        }
    }

    /// Finish with a green checkmark
    pub fn success(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!(
                "{} {}",
                console::style("\u{2713}").green(),
                message
            ));
        }
    }

    /// Finish with a red cross
    pub fn fail(self, message: &str) {
        if let Some(bar) = self.bar {
            bar.finish_with_message(format!("{} {}", console::style("\u{2717}").red(), message));
        }
    }
}
