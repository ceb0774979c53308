//! Terminal styling helpers
//!
//! Colors are applied only when the output stream supports them.

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};
use std::fmt::Display;

/// Semantic styles for CLI output
pub trait Stylize: Display {
    /// Secondary information
    fn muted(&self) -> String {
        self.paint(Style::new().dimmed())
    }

    /// Headings and identifiers the eye should land on
    fn emphasis(&self) -> String {
        self.paint(Style::new().bold())
    }

    /// Names of labels, methods and PRs
    fn accent(&self) -> String {
        self.paint(Style::new().cyan())
    }

    /// Positive outcomes
    fn success(&self) -> String {
        self.paint(Style::new().green())
    }

    /// Blockers and soft failures
    fn warn(&self) -> String {
        self.paint(Style::new().yellow())
    }

    /// Render with `style` if stdout supports color
    fn paint(&self, style: Style) -> String {
        format!(
            "{}",
            self.if_supports_color(Stream::Stdout, |text| text.style(style))
        )
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    "✓".success()
}

/// Red cross
pub fn cross() -> String {
    format!(
        "{}",
        "✗".if_supports_color(Stream::Stdout, |text| text.red())
    )
}

/// Spinner style for network waits
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner().tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
