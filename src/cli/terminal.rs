//! Terminal capability detection and styling

use owo_colors::{OwoColorize, colors::css};

/// Width of a rendered vital meter, in cells.
const METER_WIDTH: usize = 10;

/// Whether stdout can show colours.
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Terminal width, if stdout is a terminal.
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 60 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 60)
}

/// Renders a 0-100 vital as a fixed-width meter, e.g. `[######----]  62`.
pub fn meter(value: u8) -> String {
    let filled = (usize::from(value.min(100)) * METER_WIDTH + 50) / 100;
    format!(
        "[{}{}] {value:>3}",
        "#".repeat(filled),
        "-".repeat(METER_WIDTH - filled)
    )
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as danger (red)
    fn danger(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn danger(&self) -> String {
        if supports_color() {
            self.fg::<css::Crimson>().to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn danger(&self) -> String {
        self.as_str().danger()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::meter;

    #[test_case(0, "[----------]   0")]
    #[test_case(4, "[----------]   4")]
    #[test_case(5, "[#---------]   5")]
    #[test_case(62, "[######----]  62")]
    #[test_case(100, "[##########] 100")]
    fn meter_fills_proportionally(value: u8, expected: &str) {
        assert_eq!(meter(value), expected);
    }
}
