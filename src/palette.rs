// Copyright (c) 2026 rezky_nightky

use crossterm::style::{Color, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::Command;

use crate::charset::Charset;
use crate::config::print_heading;

/// Brightest (near white) first, then four descending greens.
pub const RAIN_ANSI: [u8; 5] = [255, 40, 34, 28, 22];
pub const BACKGROUND_ANSI: u8 = 232;

/// Tier `i` draws with `RAIN_ANSI[DEFAULT_TIER_SHADES[i]]`.
const DEFAULT_TIER_SHADES: [usize; 11] = [0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4];

fn from_ansi_list(list: &[u8]) -> Vec<Color> {
    list.iter().map(|&v| Color::AnsiValue(v)).collect()
}

pub fn rain_colors() -> Vec<Color> {
    from_ansi_list(&RAIN_ANSI)
}

pub fn background() -> Color {
    Color::AnsiValue(BACKGROUND_ANSI)
}

pub fn push_fg(out: &mut String, color: Color) {
    let _ = SetForegroundColor(color).write_ansi(out);
}

pub fn push_bg(out: &mut String, color: Color) {
    let _ = SetBackgroundColor(color).write_ansi(out);
}

pub fn push_reset(out: &mut String) {
    let _ = ResetColor.write_ansi(out);
}

/// Index `n` such that `Color::AnsiValue(n)` renders the same sequence.
pub fn ansi_index(color: Color) -> Option<u8> {
    let mut want = String::new();
    push_fg(&mut want, color);
    let mut probe = String::new();
    (0..=u8::MAX).find(|&i| {
        probe.clear();
        push_fg(&mut probe, Color::AnsiValue(i));
        probe == want
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tier {
    pub charset: Charset,
    pub color: Color,
}

/// Character-set tag and color per distance from a stream head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppearanceTable {
    tiers: Vec<Tier>,
}

impl Default for AppearanceTable {
    fn default() -> Self {
        let colors = rain_colors();
        let tiers = DEFAULT_TIER_SHADES
            .iter()
            .map(|&shade| Tier {
                charset: Charset::Both,
                color: colors[shade],
            })
            .collect();
        Self { tiers }
    }
}

impl AppearanceTable {
    #[allow(dead_code)]
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn last_index(&self) -> usize {
        self.tiers.len().saturating_sub(1)
    }

    pub fn tier(&self, idx: usize) -> Tier {
        self.tiers[idx.min(self.last_index())]
    }

    /// Retags every tier tagged `from`; returns how many changed.
    pub fn retag_charset(&mut self, from: Charset, to: Charset) -> usize {
        let mut n = 0;
        for t in self.tiers.iter_mut().filter(|t| t.charset == from) {
            t.charset = to;
            n += 1;
        }
        n
    }

    /// Recolors every tier drawn with `from`; returns how many changed.
    pub fn recolor(&mut self, from: Color, to: Color) -> usize {
        let mut n = 0;
        for t in self.tiers.iter_mut().filter(|t| t.color == from) {
            t.color = to;
            n += 1;
        }
        n
    }
}

pub fn color_listing_lines() -> Vec<(u8, Color)> {
    rain_colors()
        .into_iter()
        .filter_map(|c| ansi_index(c).map(|i| (i, c)))
        .collect()
}

pub fn print_list_colors() {
    print_heading("AVAILABLE RAIN COLORS:");
    println!();
    println!("CODE  SWATCH");
    for (idx, color) in color_listing_lines() {
        let mut line = format!("{idx:<5} ");
        push_fg(&mut line, color);
        line.push('█');
        push_reset(&mut line);
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_fades_from_white_to_dark_green() {
        let t = AppearanceTable::default();
        assert_eq!(t.tiers().len(), 11);
        assert_eq!(t.tier(0).color, Color::AnsiValue(255));
        assert_eq!(t.tier(10).color, Color::AnsiValue(22));
        assert_eq!(t.tier(99).color, Color::AnsiValue(22));
    }

    #[test]
    fn recolor_touches_only_matching_tiers() {
        let mut t = AppearanceTable::default();
        let n = t.recolor(Color::AnsiValue(40), Color::AnsiValue(196));
        assert_eq!(n, 2);
        assert_eq!(t.tier(3).color, Color::AnsiValue(196));
        assert_eq!(t.tier(4).color, Color::AnsiValue(196));
        assert_eq!(t.tier(5).color, Color::AnsiValue(34));
    }

    #[test]
    fn retag_moves_all_matching_tiers() {
        let mut t = AppearanceTable::default();
        assert_eq!(t.retag_charset(Charset::Basic, Charset::Katakana), 0);
        assert_eq!(t.retag_charset(Charset::Both, Charset::Katakana), 11);
        assert!(t.tiers().iter().all(|x| x.charset == Charset::Katakana));
    }

    #[test]
    fn fg_sequence_is_256_color_escape() {
        let mut s = String::new();
        push_fg(&mut s, Color::AnsiValue(40));
        assert_eq!(s, "\x1b[38;5;40m");
    }

    #[test]
    fn listing_has_one_entry_per_palette_color() {
        let lines = color_listing_lines();
        let idx: Vec<u8> = lines.iter().map(|(i, _)| *i).collect();
        assert_eq!(idx, RAIN_ANSI.to_vec());
    }
}
