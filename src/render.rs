// Copyright (c) 2026 rezky_nightky

use crate::cell::Cell;
use crate::cloud::Cloud;
use crate::config::Settings;
use crate::frame::Frame;
use crate::overlay::{Overlay, OverlayLine, OVERLAY_ROWS};
use crate::palette::background;

pub const PROMPT: &str = "> ";

/// Projects the streams onto a fresh grid. Streams later in the cloud
/// overwrite earlier ones where they overlap.
pub fn compose(cloud: &Cloud, settings: &Settings) -> Frame {
    let mut frame = Frame::new(cloud.cols, cloud.lines);
    let lines = cloud.lines as f64;

    for s in cloud.streams() {
        for (i, g) in s.glyphs().iter().enumerate() {
            let y = (s.head - i as f64).floor();
            if y < 0.0 || y >= lines || g.alpha <= 0.0 {
                continue;
            }
            let fg = settings.appearance.tier(g.tier).color;
            frame.set(s.column, y as u16, Cell::Glyph { ch: g.ch, fg });
        }
    }
    frame
}

fn overlay_row(line: &OverlayLine) -> Vec<Cell> {
    let mut cells: Vec<Cell> = line.text.chars().map(Cell::text).collect();
    if let Some(fg) = line.swatch {
        cells.push(Cell::Text {
            ch: '█',
            fg: Some(fg),
        });
    }
    cells
}

/// Writes the prompt on the bottom row and any overlay block above it.
pub fn decorate(frame: &mut Frame, command_line: &str, overlay: &Overlay) {
    if frame.height == 0 {
        return;
    }
    let bottom = frame.height - 1;
    frame.put_text_row(bottom, &format!("{PROMPT}{command_line}"));

    let start = frame.height.saturating_sub(OVERLAY_ROWS);
    for (i, line) in overlay.lines().iter().enumerate() {
        let y = start + i as u16;
        if y >= bottom {
            break;
        }
        frame.put_row(y, overlay_row(line));
    }
}

pub fn render(cloud: &Cloud, settings: &Settings, command_line: &str, overlay: &Overlay) -> String {
    let mut frame = compose(cloud, settings);
    decorate(&mut frame, command_line, overlay);
    frame.serialize(background())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::strip_ansi;
    use crate::overlay::{charset_listing, color_listing, HELP_TITLE};
    use crate::rng::Rng;

    fn busy_cloud(cols: u16, lines: u16) -> (Cloud, Settings) {
        let settings = Settings::default();
        let mut cloud = Cloud::new(cols, lines, Rng::seeded(42));
        cloud.regenerate(&settings.params);
        for _ in 0..15 {
            cloud.advance(&settings);
        }
        (cloud, settings)
    }

    #[test]
    fn compose_covers_full_grid() {
        let (cloud, settings) = busy_cloud(40, 12);
        let frame = compose(&cloud, &settings);
        assert_eq!(frame.cells().len(), 40 * 12);
        let visible = strip_ansi(&frame.serialize(background()));
        assert_eq!(visible.chars().count(), 40 * 12);
    }

    #[test]
    fn compose_places_visible_glyphs_only() {
        let (cloud, settings) = busy_cloud(30, 10);
        let frame = compose(&cloud, &settings);
        for s in cloud.streams() {
            for (i, g) in s.glyphs().iter().enumerate() {
                let y = (s.head - i as f64).floor();
                if y < 0.0 || y >= 10.0 {
                    continue;
                }
                let cell = frame.get(s.column, y as u16).unwrap();
                if g.alpha > 0.0 {
                    assert!(matches!(cell, Cell::Glyph { .. }));
                }
            }
        }
    }

    #[test]
    fn last_stream_wins_on_shared_cell() {
        use crate::stream::Stream;

        let mut settings = Settings::default();
        settings.params.flicker = 0.0;
        settings.params.bias = 0.0;
        let mut cloud = Cloud::new(5, 5, Rng::seeded(1));
        let mut params = settings.params.clone();
        params.min_gap = 0;
        params.density = 0.0;
        cloud.regenerate(&params);

        let mut a = Stream::new(2, 0.0, 1.0, 3, Rng::seeded(10));
        let mut b = Stream::new(2, 0.0, 1.0, 3, Rng::seeded(20));
        a.advance(&settings, 5);
        b.advance(&settings, 5);
        let expected = b.glyphs()[0].ch;
        cloud.push_for_test(a);
        cloud.push_for_test(b);

        let frame = compose(&cloud, &settings);
        assert_eq!(frame.get(2, 1).map(Cell::ch), Some(expected));
    }

    #[test]
    fn prompt_occupies_bottom_row() {
        let (cloud, settings) = busy_cloud(20, 8);
        let mut frame = compose(&cloud, &settings);
        decorate(&mut frame, "fade 0.2", &Overlay::Animation);
        assert_eq!(frame.row_text(7), format!("{:<20}", "> fade 0.2"));
    }

    #[test]
    fn help_block_sits_above_prompt() {
        let (cloud, settings) = busy_cloud(80, 25);
        let mut frame = compose(&cloud, &settings);
        decorate(&mut frame, "", &Overlay::Help);
        assert!(frame.row_text(6).starts_with(HELP_TITLE));
        assert!(frame.row_text(23).trim_start().starts_with("resize"));
        assert!(frame.row_text(24).starts_with("> "));
    }

    #[test]
    fn list_overlay_replaces_help_region() {
        let (cloud, settings) = busy_cloud(80, 25);
        let mut frame = compose(&cloud, &settings);
        decorate(&mut frame, "", &Overlay::List(charset_listing()));
        assert!(frame
            .row_text(6)
            .starts_with("Available character sets: basic, katakana, both"));
        assert!(!frame.row_text(7).starts_with("  max_rains"));
    }

    #[test]
    fn color_listing_draws_swatches() {
        let (cloud, settings) = busy_cloud(80, 25);
        let mut frame = compose(&cloud, &settings);
        decorate(&mut frame, "", &Overlay::List(color_listing()));
        assert_eq!(frame.row_text(7).trim_end(), "255  █");
        assert!(matches!(
            frame.get(5, 7),
            Some(Cell::Text { ch: '█', fg: Some(_) })
        ));
    }

    #[test]
    fn short_viewport_clips_overlay() {
        let (cloud, settings) = busy_cloud(30, 4);
        let mut frame = compose(&cloud, &settings);
        decorate(&mut frame, "x", &Overlay::Help);
        assert!(frame.row_text(0).starts_with(HELP_TITLE));
        assert!(frame.row_text(3).starts_with("> x"));
    }

    #[test]
    fn rendered_output_starts_at_home_row() {
        let (cloud, settings) = busy_cloud(10, 3);
        let out = render(&cloud, &settings, "", &Overlay::Animation);
        assert!(out.starts_with("\x1b[1;1H"));
    }
}
