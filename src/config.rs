// Copyright (c) 2026 rezky_nightky

use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;

use clap::Parser;

use crate::charset::Charset;
use crate::palette::AppearanceTable;

pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 25;

pub fn color_enabled_stdout() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(std::env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

/// Listing heading, bold cyan when stdout is a color terminal.
pub fn print_heading(text: &str) {
    if color_enabled_stdout() {
        println!("\x1b[1;36m{}\x1b[0m", text);
    } else {
        println!("{}", text);
    }
}

/// Tunables read by the simulator and the compositor.
#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub max_rains: usize,
    pub min_gap: u16,
    pub frame_ms: u64,
    pub density: f64,
    pub base_speed: f64,
    pub speed_var: f64,
    pub fade: f64,
    pub flicker: f64,
    pub bias: f64,
    pub max_rain_length: i64,
    pub rain_length_var: i64,
    pub head_char_freq: f64,
    pub chars: Charset,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_rains: 150,
            min_gap: 1,
            frame_ms: 30,
            density: 0.6,
            base_speed: 2.5,
            speed_var: 0.6,
            fade: 0.1,
            flicker: 0.2,
            bias: 0.5,
            max_rain_length: 20,
            rain_length_var: 5,
            head_char_freq: 0.33,
            chars: Charset::Both,
        }
    }
}

impl Params {
    pub fn get(&self, p: Param) -> f64 {
        match p {
            Param::MaxRains => self.max_rains as f64,
            Param::MinGap => self.min_gap as f64,
            Param::FrameMs => self.frame_ms as f64,
            Param::Density => self.density,
            Param::BaseSpeed => self.base_speed,
            Param::SpeedVar => self.speed_var,
            Param::Fade => self.fade,
            Param::Flicker => self.flicker,
            Param::Bias => self.bias,
            Param::MaxRainLength => self.max_rain_length as f64,
            Param::RainLengthVar => self.rain_length_var as f64,
            Param::HeadCharFreq => self.head_char_freq,
        }
    }

    /// Stores `v`, truncating for integral fields. Range checks happen in
    /// [`Param::validate`].
    pub fn set(&mut self, p: Param, v: f64) {
        match p {
            Param::MaxRains => self.max_rains = v.trunc() as usize,
            Param::MinGap => self.min_gap = v.trunc() as u16,
            Param::FrameMs => self.frame_ms = v.trunc() as u64,
            Param::Density => self.density = v,
            Param::BaseSpeed => self.base_speed = v,
            Param::SpeedVar => self.speed_var = v,
            Param::Fade => self.fade = v,
            Param::Flicker => self.flicker = v,
            Param::Bias => self.bias = v,
            Param::MaxRainLength => self.max_rain_length = v.trunc() as i64,
            Param::RainLengthVar => self.rain_length_var = v.trunc() as i64,
            Param::HeadCharFreq => self.head_char_freq = v,
        }
    }

    /// Streams the regeneration pass aims for on a `width`-column viewport.
    pub fn target_streams(&self, width: u16) -> usize {
        (width as f64 * self.density).floor().max(0.0) as usize
    }
}

/// Everything the interpreter may write and the simulation reads.
#[derive(Clone, Debug, Default)]
pub struct Settings {
    pub params: Params,
    pub appearance: AppearanceTable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Param {
    MaxRains,
    MinGap,
    FrameMs,
    Density,
    BaseSpeed,
    SpeedVar,
    Fade,
    Flicker,
    Bias,
    MaxRainLength,
    RainLengthVar,
    HeadCharFreq,
}

impl Param {
    pub const ALL: [Param; 12] = [
        Param::MaxRains,
        Param::MinGap,
        Param::FrameMs,
        Param::Density,
        Param::BaseSpeed,
        Param::SpeedVar,
        Param::Fade,
        Param::Flicker,
        Param::Bias,
        Param::MaxRainLength,
        Param::RainLengthVar,
        Param::HeadCharFreq,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Param::MaxRains => "max_rains",
            Param::MinGap => "min_gap",
            Param::FrameMs => "frame_ms",
            Param::Density => "density",
            Param::BaseSpeed => "base_speed",
            Param::SpeedVar => "speed_var",
            Param::Fade => "fade",
            Param::Flicker => "flicker",
            Param::Bias => "bias",
            Param::MaxRainLength => "max_rain_length",
            Param::RainLengthVar => "rain_length_var",
            Param::HeadCharFreq => "head_char_freq",
        }
    }

    pub fn from_name(name: &str) -> Option<Param> {
        Param::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn range(self) -> (f64, f64) {
        match self {
            Param::MaxRains => (0.0, 10_000.0),
            Param::MinGap => (0.0, 1_000.0),
            Param::FrameMs => (1.0, 1_000.0),
            Param::Density => (0.0, 10.0),
            Param::BaseSpeed => (0.0, 100.0),
            Param::SpeedVar => (0.0, 100.0),
            Param::Fade => (0.0, 1.0),
            Param::Flicker => (0.0, 1.0),
            Param::Bias => (-0.9, 10.0),
            Param::MaxRainLength => (1.0, 1_000.0),
            Param::RainLengthVar => (0.0, 1_000.0),
            Param::HeadCharFreq => (0.0, 1.0),
        }
    }

    pub fn validate(self, v: f64) -> Result<f64, RangeError> {
        let (min, max) = self.range();
        if !v.is_finite() || v < min || v > max {
            return Err(RangeError {
                param: self,
                value: v,
                min,
                max,
            });
        }
        Ok(v)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeError {
    pub param: Param,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to apply {} {} (min {} max {})",
            self.param, self.value, self.min, self.max
        )
    }
}

impl std::error::Error for RangeError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharsetArg(pub Charset);

impl FromStr for CharsetArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(CharsetArg)
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "rainprompt", version, disable_version_flag = true)]
pub struct Args {
    #[arg(
        long = "max-rains",
        help_heading = "RAIN",
        help = "Maximum number of streams (min 0 max 10000)"
    )]
    pub max_rains: Option<f64>,

    #[arg(
        long = "min-gap",
        help_heading = "RAIN",
        help = "Minimum column gap between streams (min 0 max 1000)"
    )]
    pub min_gap: Option<f64>,

    #[arg(
        long = "frame-ms",
        help_heading = "RAIN",
        help = "Frame interval in milliseconds (min 1 max 1000)"
    )]
    pub frame_ms: Option<f64>,

    #[arg(
        short = 'd',
        long = "density",
        help_heading = "RAIN",
        help = "Streams per column of width (min 0 max 10)"
    )]
    pub density: Option<f64>,

    #[arg(
        short = 'S',
        long = "base-speed",
        help_heading = "MOTION",
        help = "Base rows per tick (min 0 max 100)"
    )]
    pub base_speed: Option<f64>,

    #[arg(
        long = "speed-var",
        help_heading = "MOTION",
        help = "Speed variation (min 0 max 100)"
    )]
    pub speed_var: Option<f64>,

    #[arg(
        long = "bias",
        allow_negative_numbers = true,
        help_heading = "MOTION",
        help = "Vertical bias multiplier (min -0.9 max 10)"
    )]
    pub bias: Option<f64>,

    #[arg(
        long = "fade",
        help_heading = "APPEARANCE",
        help = "Alpha lost per tick (min 0 max 1)"
    )]
    pub fade: Option<f64>,

    #[arg(
        long = "flicker",
        help_heading = "APPEARANCE",
        help = "Flicker probability (min 0 max 1)"
    )]
    pub flicker: Option<f64>,

    #[arg(
        long = "max-rain-length",
        help_heading = "APPEARANCE",
        help = "Base trail length (min 1 max 1000)"
    )]
    pub max_rain_length: Option<f64>,

    #[arg(
        long = "rain-length-var",
        help_heading = "APPEARANCE",
        help = "Trail length variation (min 0 max 1000)"
    )]
    pub rain_length_var: Option<f64>,

    #[arg(
        long = "head-char-freq",
        help_heading = "APPEARANCE",
        help = "Bright head probability (min 0 max 1)"
    )]
    pub head_char_freq: Option<f64>,

    #[arg(
        short = 'c',
        long = "chars",
        help_heading = "APPEARANCE",
        help = "Character set: basic, katakana or both"
    )]
    pub chars: Option<CharsetArg>,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed the generator instead of using the clock"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "log-level",
        default_value = "warn",
        help_heading = "GENERAL",
        help = "Diagnostic filter when RAINPROMPT_LOG is unset"
    )]
    pub log_level: String,

    #[arg(
        long = "help-commands",
        help_heading = "HELP",
        help = "Print the prompt command reference and exit"
    )]
    pub help_commands: bool,

    #[arg(
        long = "list-charsets",
        help_heading = "HELP",
        help = "List character sets and exit"
    )]
    pub list_charsets: bool,

    #[arg(
        long = "list-colors",
        help_heading = "HELP",
        help = "List rain colors and exit"
    )]
    pub list_colors: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

impl Args {
    fn overrides(&self) -> [(Param, Option<f64>); 12] {
        [
            (Param::MaxRains, self.max_rains),
            (Param::MinGap, self.min_gap),
            (Param::FrameMs, self.frame_ms),
            (Param::Density, self.density),
            (Param::BaseSpeed, self.base_speed),
            (Param::SpeedVar, self.speed_var),
            (Param::Fade, self.fade),
            (Param::Flicker, self.flicker),
            (Param::Bias, self.bias),
            (Param::MaxRainLength, self.max_rain_length),
            (Param::RainLengthVar, self.rain_length_var),
            (Param::HeadCharFreq, self.head_char_freq),
        ]
    }

    /// Startup parameters: defaults overlaid with every option given.
    pub fn params(&self) -> Result<Params, RangeError> {
        let mut params = Params::default();
        for (p, v) in self.overrides() {
            if let Some(v) = v {
                params.set(p, p.validate(v)?);
            }
        }
        if let Some(CharsetArg(cs)) = self.chars {
            params.chars = cs;
        }
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for p in Param::ALL {
            assert_eq!(Param::from_name(p.name()), Some(p));
        }
        assert_eq!(Param::from_name("chars"), None);
    }

    #[test]
    fn integral_fields_truncate() {
        let mut params = Params::default();
        params.set(Param::MaxRains, 10.9);
        params.set(Param::MaxRainLength, 7.2);
        assert_eq!(params.max_rains, 10);
        assert_eq!(params.max_rain_length, 7);
    }

    #[test]
    fn validate_rejects_out_of_range_and_non_finite() {
        assert!(Param::Fade.validate(1.5).is_err());
        assert!(Param::MaxRainLength.validate(-3.0).is_err());
        assert!(Param::Density.validate(f64::NAN).is_err());
        assert_eq!(Param::Flicker.validate(0.5), Ok(0.5));
    }

    #[test]
    fn target_streams_floors_width_times_density() {
        let params = Params::default();
        assert_eq!(params.target_streams(80), 48);
        assert_eq!(params.target_streams(0), 0);
    }

    #[test]
    fn args_override_defaults() {
        let args = Args::parse_from(["rainprompt", "--max-rains", "10", "--chars", "katakana"]);
        let params = args.params().unwrap();
        assert_eq!(params.max_rains, 10);
        assert_eq!(params.chars, Charset::Katakana);
        assert_eq!(params.fade, Params::default().fade);
    }

    #[test]
    fn args_out_of_range_is_an_error() {
        let args = Args::parse_from(["rainprompt", "--flicker", "2"]);
        let err = args.params().unwrap_err();
        assert_eq!(err.param, Param::Flicker);
    }
}
