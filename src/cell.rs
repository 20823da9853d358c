// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Cell {
    /// Background only.
    #[default]
    Blank,
    /// A rain glyph drawn over the background.
    Glyph { ch: char, fg: Color },
    /// Prompt and overlay text, drawn with the terminal's default style.
    Text { ch: char, fg: Option<Color> },
}

impl Cell {
    pub fn text(ch: char) -> Self {
        Cell::Text { ch, fg: None }
    }

    #[allow(dead_code)]
    pub fn ch(self) -> char {
        match self {
            Cell::Blank => ' ',
            Cell::Glyph { ch, .. } | Cell::Text { ch, .. } => ch,
        }
    }
}
