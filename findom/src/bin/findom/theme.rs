//! Colors and glyphs for findom's terminal output.

use colored::Color;

/// Message severity, each with its own glyph and color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Pass,
    Fail,
    Notice,
    Note,
    Detail,
}

impl Tone {
    pub const fn glyph(self) -> &'static str {
        match self {
            Tone::Pass => PASS,
            Tone::Fail => FAIL,
            Tone::Notice => "⚠",
            Tone::Note => "ℹ",
            Tone::Detail => ARROW,
        }
    }

    pub const fn color(self) -> Color {
        match self {
            Tone::Pass => Color::Green,
            Tone::Fail => Color::Red,
            Tone::Notice => Color::Yellow,
            Tone::Note => Color::Blue,
            Tone::Detail => Color::BrightBlack,
        }
    }
}

/// Table mark for a qualifying field
pub const PASS: &str = "✓";
pub const FAIL: &str = "✗";
pub const ARROW: &str = "→";
