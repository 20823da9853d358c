// Copyright (c) 2026 rezky_nightky

use std::fmt;

use crossterm::style::Color;
use tracing::{debug, info};

use crate::charset::Charset;
use crate::config::{Param, RangeError, Settings};
use crate::overlay::{charset_listing, color_listing, Overlay};

/// What the caller must do after a command was applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Regenerate,
    ResetViewport,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CommandError {
    Unknown(String),
    MissingValue(&'static str),
    MissingSecond(&'static str),
    BadNumber { command: &'static str, value: String },
    OutOfRange(RangeError),
    BadCharset { command: &'static str, value: String },
    BadColor { command: &'static str, value: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(cmd) => write!(f, "unknown command: {cmd}"),
            CommandError::MissingValue(cmd) => write!(f, "missing value for {cmd}"),
            CommandError::MissingSecond(cmd) => write!(
                f,
                "invalid format, use {cmd} <value> <new_value> or {cmd} list"
            ),
            CommandError::BadNumber { command, value } => {
                write!(f, "invalid value for {command}: {value}")
            }
            CommandError::OutOfRange(e) => fmt::Display::fmt(e, f),
            CommandError::BadCharset { command, value } => write!(
                f,
                "invalid {command} value: {value} (use basic, katakana or both)"
            ),
            CommandError::BadColor { command, value } => write!(
                f,
                "invalid {command} color code: {value} (use 0-255)"
            ),
        }
    }
}

impl std::error::Error for CommandError {}

impl CommandError {
    pub fn command(&self) -> &str {
        match self {
            CommandError::Unknown(cmd) => cmd.as_str(),
            CommandError::MissingValue(cmd) | CommandError::MissingSecond(cmd) => cmd,
            CommandError::BadNumber { command, .. }
            | CommandError::BadCharset { command, .. }
            | CommandError::BadColor { command, .. } => command,
            CommandError::OutOfRange(e) => e.param.name(),
        }
    }
}

/// Sub-commands that rewrite the appearance table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TableCommand {
    SegmentConfig,
    RainColor,
}

impl TableCommand {
    fn name(self) -> &'static str {
        match self {
            TableCommand::SegmentConfig => "segment_config",
            TableCommand::RainColor => "rain_color",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Command {
    Help,
    Back,
    Resize,
    Set(Param, f64),
    Chars(Charset),
    Retag(Charset, Charset),
    Recolor(Color, Color),
    List(TableCommand),
}

fn parse_number(param: Param, raw: Option<&str>) -> Result<f64, CommandError> {
    let raw = raw.ok_or(CommandError::MissingValue(param.name()))?;
    let v: f64 = raw.parse().map_err(|_| CommandError::BadNumber {
        command: param.name(),
        value: raw.to_string(),
    })?;
    param.validate(v).map_err(CommandError::OutOfRange)
}

fn parse_charset(command: &'static str, raw: &str) -> Result<Charset, CommandError> {
    raw.parse().map_err(|_| CommandError::BadCharset {
        command,
        value: raw.to_string(),
    })
}

fn parse_color(command: &'static str, raw: &str) -> Result<Color, CommandError> {
    raw.parse::<u8>()
        .map(Color::AnsiValue)
        .map_err(|_| CommandError::BadColor {
            command,
            value: raw.to_string(),
        })
}

fn parse_table(
    which: TableCommand,
    p1: Option<&str>,
    p2: Option<&str>,
) -> Result<Command, CommandError> {
    let name = which.name();
    let p1 = p1.ok_or(CommandError::MissingSecond(name))?;
    if p1 == "list" {
        return Ok(Command::List(which));
    }
    let p2 = p2.ok_or(CommandError::MissingSecond(name))?;
    match which {
        TableCommand::SegmentConfig => Ok(Command::Retag(
            parse_charset(name, p1)?,
            parse_charset(name, p2)?,
        )),
        TableCommand::RainColor => Ok(Command::Recolor(
            parse_color(name, p1)?,
            parse_color(name, p2)?,
        )),
    }
}

/// `None` for a blank line.
fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(cmd) = words.next() else {
        return Ok(None);
    };
    let p1 = words.next();
    let p2 = words.next();

    let parsed = match cmd {
        "help" => Command::Help,
        "back" => Command::Back,
        "resize" => Command::Resize,
        "chars" => {
            let raw = p1.ok_or(CommandError::MissingValue("chars"))?;
            Command::Chars(parse_charset("chars", raw)?)
        }
        "segment_config" => parse_table(TableCommand::SegmentConfig, p1, p2)?,
        "rain_color" => parse_table(TableCommand::RainColor, p1, p2)?,
        other => match Param::from_name(other) {
            Some(param) => Command::Set(param, parse_number(param, p1)?),
            None => return Err(CommandError::Unknown(other.to_string())),
        },
    };
    Ok(Some(parsed))
}

/// Parses and applies one committed prompt line. A rejected line leaves
/// `settings` and `overlay` untouched.
pub fn execute(
    line: &str,
    settings: &mut Settings,
    overlay: &mut Overlay,
) -> Result<Effect, CommandError> {
    let Some(cmd) = parse(line)? else {
        return Ok(Effect::None);
    };

    let effect = match cmd {
        Command::Help => {
            *overlay = Overlay::Help;
            return Ok(Effect::None);
        }
        Command::Back => {
            *overlay = Overlay::Animation;
            return Ok(Effect::None);
        }
        Command::List(which) => {
            *overlay = Overlay::List(match which {
                TableCommand::SegmentConfig => charset_listing(),
                TableCommand::RainColor => color_listing(),
            });
            return Ok(Effect::None);
        }
        Command::Resize => Effect::ResetViewport,
        Command::Set(param, v) => {
            let old = settings.params.get(param);
            settings.params.set(param, v);
            info!(
                param = param.name(),
                old,
                new = settings.params.get(param),
                "parameter changed"
            );
            Effect::Regenerate
        }
        Command::Chars(cs) => {
            settings.params.chars = cs;
            info!(chars = cs.name(), "character set changed");
            Effect::Regenerate
        }
        Command::Retag(from, to) => {
            let n = settings.appearance.retag_charset(from, to);
            debug!(from = from.name(), to = to.name(), tiers = n, "segments retagged");
            Effect::None
        }
        Command::Recolor(from, to) => {
            let n = settings.appearance.recolor(from, to);
            debug!(?from, ?to, tiers = n, "segments recolored");
            Effect::None
        }
    };

    *overlay = Overlay::Animation;
    Ok(effect)
}
