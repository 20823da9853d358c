// Copyright (c) 2026 rezky_nightky

use std::char;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::config::print_heading;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Charset {
    Basic,
    Katakana,
    Both,
}

impl Charset {
    pub const ALL: [Charset; 3] = [Charset::Basic, Charset::Katakana, Charset::Both];

    pub fn name(self) -> &'static str {
        match self {
            Charset::Basic => "basic",
            Charset::Katakana => "katakana",
            Charset::Both => "both",
        }
    }

    pub fn chars(self) -> &'static [char] {
        match self {
            Charset::Basic => &BASIC,
            Charset::Katakana => &KATAKANA,
            Charset::Both => &BOTH,
        }
    }

    /// Pool for a glyph whose appearance tier is tagged `self`: `both` defers
    /// to the active set.
    pub fn resolve(self, active: Charset) -> Charset {
        match self {
            Charset::Both => active,
            tagged => tagged,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "basic" => Ok(Charset::Basic),
            "katakana" => Ok(Charset::Katakana),
            "both" => Ok(Charset::Both),
            _ => Err(format!(
                "unsupported charset: {} (use basic, katakana or both)",
                s.trim()
            )),
        }
    }
}

fn push_range(out: &mut Vec<char>, start: u32, end: u32) {
    for v in start..=end {
        if let Some(ch) = char::from_u32(v) {
            out.push(ch);
        }
    }
}

fn build_basic() -> Vec<char> {
    let mut out = Vec::new();
    push_range(&mut out, 0x61, 0x7A);
    push_range(&mut out, 0x41, 0x5A);
    push_range(&mut out, 0x30, 0x39);
    push_range(&mut out, 0x21, 0x2F);
    push_range(&mut out, 0x3A, 0x40);
    push_range(&mut out, 0x5B, 0x60);
    push_range(&mut out, 0x7B, 0x7E);
    out
}

fn build_katakana() -> Vec<char> {
    // Half-width forms, one terminal column each.
    let mut out = Vec::new();
    push_range(&mut out, 0xFF66, 0xFF9D);
    out
}

static BASIC: LazyLock<Vec<char>> = LazyLock::new(build_basic);
static KATAKANA: LazyLock<Vec<char>> = LazyLock::new(build_katakana);
static BOTH: LazyLock<Vec<char>> = LazyLock::new(|| {
    let mut out = build_basic();
    out.extend(build_katakana());
    out
});

pub fn print_list_charsets() {
    print_heading("AVAILABLE CHARACTER SETS:");
    println!();
    println!("VALUE        DESCRIPTION");
    println!("basic        ASCII letters, digits and punctuation");
    println!("katakana     Half-width katakana");
    println!("both         basic followed by katakana");
}
