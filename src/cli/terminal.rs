//! Terminal capability detection and colour helpers

use orgchart::domain::company::CompanyStatus;
use owo_colors::{OwoColorize, colors::css};

fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Check if the terminal is narrower than 60 columns
pub fn is_narrow() -> bool {
    terminal_size::terminal_size().is_some_and(|(w, _)| w.0 < 60)
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// Short bracketed tag for a company's lifecycle state.
pub fn status_badge(status: CompanyStatus) -> String {
    match status {
        CompanyStatus::Active => paint("[active]", |s| s.fg::<css::Green>().to_string()),
        CompanyStatus::Onboarding => {
            paint("[onboarding]", |s| s.fg::<css::SteelBlue>().to_string())
        }
        CompanyStatus::Decommissioned => {
            paint("[decommissioned]", |s| s.fg::<css::Orange>().to_string())
        }
    }
}

/// Extension trait for colouring report lines
pub trait Colorize {
    /// Green, for checks that passed
    fn success(&self) -> String;
    /// Amber, for problems that need attention
    fn warning(&self) -> String;
    /// Dimmed, for hints and decoration
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        paint(self, |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self, |s| s.fg::<css::Orange>().to_string())
    }

    fn dim(&self) -> String {
        paint(self, |s| s.dimmed().to_string())
    }
}
