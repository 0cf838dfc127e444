//! Spinner for indeterminate progress.

use indicatif::{ProgressBar as IndicatifProgressBar, ProgressStyle as IndicatifProgressStyle};
use std::time::Duration;

fn spinner_style(unicode: bool) -> IndicatifProgressStyle {
    let template = if unicode { "{spinner:.green} {msg}" } else { "{spinner} {msg}" };
    let tick_chars = if unicode { "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏" } else { "-\\|/" };
    IndicatifProgressStyle::default_bar()
        .template(template)
        .expect("valid template")
        .tick_chars(tick_chars)
}

/// Spinner for indeterminate progress.
pub struct Spinner {
    inner: IndicatifProgressBar,
}

impl Spinner {
    /// Create a new spinner with a message.
    pub fn new(msg: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        let unicode = crate::output::unicode_enabled();
        let pb = IndicatifProgressBar::new_spinner();
        pb.set_style(spinner_style(unicode));
        pb.set_message(msg);
        pb.enable_steady_tick(Duration::from_millis(80));
        Self { inner: pb }
    }

    /// Set the message.
    pub fn set_message(&self, msg: impl Into<std::borrow::Cow<'static, str>>) {
        self.inner.set_message(msg);
    }

    /// Finish and clear the spinner.
    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_style_templates_are_valid() {
        let _ = spinner_style(true);
        let _ = spinner_style(false);
    }
}
