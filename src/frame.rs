// Copyright (c) 2026 rezky_nightky

use crossterm::cursor::MoveTo;
use crossterm::style::Color;
use crossterm::Command;

use crate::cell::Cell;
use crate::palette::{push_bg, push_fg, push_reset};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Pen {
    Unset,
    Background,
    Plain,
}

/// Fixed `width × height` grid, row-major. Writes overwrite whatever the
/// cell held before.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    pub fn new(width: u16, height: u16) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::Blank; len],
        }
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    #[allow(dead_code)]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Replaces row `y` with `cells`, truncated to the width and padded with
    /// plain spaces.
    pub fn put_row<I>(&mut self, y: u16, cells: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        if y >= self.height {
            return;
        }
        let mut it = cells.into_iter();
        for x in 0..self.width {
            let cell = it.next().unwrap_or(Cell::text(' '));
            self.set(x, y, cell);
        }
    }

    pub fn put_text_row(&mut self, y: u16, text: &str) {
        self.put_row(y, text.chars().map(Cell::text));
    }

    /// Row text without styling, for inspection.
    #[allow(dead_code)]
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(Cell::ch)
            .collect()
    }

    /// Serializes the grid to escape-sequence output. Each glyph is followed
    /// by a reset, then the background is re-applied for what follows.
    pub fn serialize(&self, bg: Color) -> String {
        let mut out = String::with_capacity(self.cells.len() * 12 + 64);
        let mut pen = Pen::Unset;

        for y in 0..self.height {
            let _ = MoveTo(0, y).write_ansi(&mut out);
            for x in 0..self.width {
                let Some(cell) = self.get(x, y) else {
                    continue;
                };
                match cell {
                    Cell::Blank => {
                        if pen != Pen::Background {
                            push_bg(&mut out, bg);
                            pen = Pen::Background;
                        }
                        out.push(' ');
                    }
                    Cell::Glyph { ch, fg } => {
                        if pen != Pen::Background {
                            push_bg(&mut out, bg);
                        }
                        push_fg(&mut out, fg);
                        out.push(ch);
                        push_reset(&mut out);
                        push_bg(&mut out, bg);
                        pen = Pen::Background;
                    }
                    Cell::Text { ch, fg } => {
                        if pen != Pen::Plain {
                            push_reset(&mut out);
                            pen = Pen::Plain;
                        }
                        match fg {
                            Some(fg) => {
                                push_fg(&mut out, fg);
                                out.push(ch);
                                push_reset(&mut out);
                            }
                            None => out.push(ch),
                        }
                    }
                }
            }
        }

        push_reset(&mut out);
        out
    }
}

#[cfg(test)]
pub(crate) fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                for n in chars.by_ref() {
                    if n.is_ascii_alphabetic() {
                        break;
                    }
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_write_wins() {
        let mut f = Frame::new(4, 2);
        f.set(1, 1, Cell::Glyph { ch: 'a', fg: Color::AnsiValue(40) });
        f.set(1, 1, Cell::Glyph { ch: 'b', fg: Color::AnsiValue(22) });
        assert_eq!(
            f.get(1, 1),
            Some(Cell::Glyph { ch: 'b', fg: Color::AnsiValue(22) })
        );
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut f = Frame::new(3, 3);
        f.set(3, 0, Cell::text('x'));
        f.set(0, 3, Cell::text('x'));
        assert!(f.cells().iter().all(|c| *c == Cell::Blank));
    }

    #[test]
    fn serialized_grid_accounts_for_every_cell() {
        let mut f = Frame::new(7, 3);
        f.set(2, 0, Cell::Glyph { ch: 'q', fg: Color::AnsiValue(255) });
        f.set(6, 2, Cell::Glyph { ch: 'z', fg: Color::AnsiValue(22) });
        let out = f.serialize(Color::AnsiValue(232));
        let visible = strip_ansi(&out);
        assert_eq!(visible.chars().count(), 7 * 3);
        assert_eq!(visible.chars().filter(|c| *c != ' ').count(), 2);
    }

    #[test]
    fn glyph_is_followed_by_reset() {
        let mut f = Frame::new(2, 1);
        f.set(0, 0, Cell::Glyph { ch: 'k', fg: Color::AnsiValue(40) });
        let out = f.serialize(Color::AnsiValue(232));
        assert!(out.contains("\x1b[38;5;40mk\x1b[0m"));
        assert!(out.ends_with("\x1b[0m"));
    }

    #[test]
    fn put_text_row_pads_and_truncates() {
        let mut f = Frame::new(5, 2);
        f.put_text_row(1, "ab");
        assert_eq!(f.row_text(1), "ab   ");
        f.put_text_row(0, "abcdefgh");
        assert_eq!(f.row_text(0), "abcde");
    }
}
