// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::charset::Charset;
use crate::config::print_heading;
use crate::palette::color_listing_lines;

pub const HELP_TITLE: &str = "Available commands:";

/// One line per prompt command, in display order.
pub const HELP_LINES: [(&str, &str); 17] = [
    ("max_rains <int>", "Set the maximum number of rains."),
    ("min_gap <int>", "Set the minimum gap between rains."),
    ("frame_ms <int>", "Set the frame delay in milliseconds."),
    ("density <double>", "Set the rain density."),
    ("base_speed <double>", "Set the base rain speed."),
    ("speed_var <double>", "Set the rain speed variation."),
    ("fade <double>", "Set the rain fade rate."),
    ("flicker <double>", "Set the rain flicker rate."),
    ("bias <double>", "Set the rain bias."),
    ("max_rain_length <int>", "Set the base max rain length."),
    ("rain_length_var <int>", "Set the rain length variation."),
    ("head_char_freq <double>", "Set the head char probability."),
    (
        "chars <string>",
        "Set the character set (basic, katakana, both).",
    ),
    (
        "segment_config <char_set> <new_char_set>",
        "Retag tiers, or 'list'.",
    ),
    (
        "rain_color <color_code> <new_color_code>",
        "Recolor tiers, or 'list'.",
    ),
    ("back", "Go back to animation."),
    ("resize", "Resize the terminal to default values."),
];

/// Rows reserved above the prompt for an overlay block.
pub const OVERLAY_ROWS: u16 = HELP_LINES.len() as u16 + 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverlayLine {
    pub text: String,
    pub swatch: Option<Color>,
}

impl OverlayLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            swatch: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    Animation,
    Help,
    List(Vec<OverlayLine>),
}

impl Overlay {
    /// Escape key: help on from anything but help, off from help.
    pub fn toggle_help(&mut self) {
        *self = match self {
            Overlay::Help => Overlay::Animation,
            _ => Overlay::Help,
        };
    }

    pub fn lines(&self) -> Vec<OverlayLine> {
        match self {
            Overlay::Animation => Vec::new(),
            Overlay::Help => help_lines(),
            Overlay::List(lines) => lines.clone(),
        }
    }

    /// Listing text with swatches shown as `█`.
    #[allow(dead_code)]
    pub fn text(&self) -> String {
        self.lines()
            .iter()
            .map(|l| match l.swatch {
                Some(_) => format!("{}█", l.text),
                None => l.text.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

pub fn help_lines() -> Vec<OverlayLine> {
    let mut out = vec![OverlayLine::plain(HELP_TITLE)];
    out.extend(
        HELP_LINES
            .iter()
            .map(|(usage, desc)| OverlayLine::plain(format!("  {usage} : {desc}"))),
    );
    out
}

pub fn charset_listing() -> Vec<OverlayLine> {
    let names: Vec<&str> = Charset::ALL.iter().map(|c| c.name()).collect();
    vec![OverlayLine::plain(format!(
        "Available character sets: {}",
        names.join(", ")
    ))]
}

pub fn color_listing() -> Vec<OverlayLine> {
    let mut out = vec![OverlayLine::plain("Available colors:")];
    out.extend(color_listing_lines().into_iter().map(|(idx, color)| OverlayLine {
        text: format!("{idx}  "),
        swatch: Some(color),
    }));
    out
}

pub fn print_help_commands() {
    let lines = help_lines();
    if let Some((title, rest)) = lines.split_first() {
        print_heading(&title.text);
        for line in rest {
            println!("{}", line.text);
        }
    }
}
