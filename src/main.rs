// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod cloud;
mod command;
mod config;
mod frame;
mod logging;
mod overlay;
mod palette;
mod prompt;
mod render;
mod rng;
mod stream;
mod terminal;

use std::thread;
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use tracing::{info, warn};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::charset::print_list_charsets;
use crate::cloud::Cloud;
use crate::command::Effect;
use crate::config::{color_enabled_stdout, Args, Settings};
use crate::overlay::{print_help_commands, Overlay};
use crate::palette::{print_list_colors, AppearanceTable};
use crate::prompt::{Prompt, PromptAction};
use crate::render::render;
use crate::rng::Rng;
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

const AFTER_HELP: &str = "\
Type commands at the '> ' prompt while the rain runs. Esc toggles the
command reference, Ctrl-C quits. See --help-commands for the full list.";

fn build_info() -> String {
    let build = env!("RAINPROMPT_BUILD");
    let sha = env!("RAINPROMPT_GIT_SHA");
    if sha.is_empty() {
        build.to_string()
    } else {
        format!("{build} ({sha})")
    }
}

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    restore_terminal_best_effort();
                    std::process::exit(128 + sig);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(130);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn parse_args() -> Args {
    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template).after_help(AFTER_HELP);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }

    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn main() -> anyhow::Result<()> {
    install_exit_handlers();
    let args = parse_args();

    if args.list_charsets {
        print_list_charsets();
        return Ok(());
    }

    if args.list_colors {
        print_list_colors();
        return Ok(());
    }

    if args.help_commands {
        print_help_commands();
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", build_info());
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let params = match args.params() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let _log_guard = logging::init(&args.log_level).context("failed to set up diagnostics")?;
    info!(?params, seed = ?args.seed, "starting");

    let rng = args.seed.map_or_else(Rng::from_clock, Rng::seeded);
    let mut settings = Settings {
        params,
        appearance: AppearanceTable::default(),
    };

    let mut term = Terminal::new().context("failed to initialise terminal")?;
    let (w, h) = term.size();
    let mut cloud = Cloud::new(w, h, rng);
    cloud.regenerate(&settings.params);

    let mut prompt = Prompt::default();
    let mut overlay = Overlay::default();
    let mut running = true;

    while running {
        let (w, h) = term.size();
        cloud.resize(w, h, &settings.params);
        cloud.advance(&settings);

        let (frame, keys) = thread::scope(|s| {
            let worker = s.spawn(|| render(&cloud, &settings, prompt.text(), &overlay));
            let keys = Terminal::pending_keys();
            (worker.join(), keys)
        });
        let frame = frame.map_err(|_| anyhow!("render worker panicked"))?;

        for key in keys? {
            match prompt.handle_key(key) {
                PromptAction::None => {}
                PromptAction::ToggleHelp => overlay.toggle_help(),
                PromptAction::Quit => running = false,
                PromptAction::Submit(line) => {
                    match command::execute(&line, &mut settings, &mut overlay) {
                        Ok(Effect::None) => {}
                        Ok(Effect::Regenerate) => cloud.regenerate(&settings.params),
                        Ok(Effect::ResetViewport) => cloud.reset_viewport(&settings.params),
                        Err(e) => warn!(command = e.command(), line = %line, "{e}"),
                    }
                }
            }
        }

        term.draw(&frame)?;
        thread::sleep(Duration::from_millis(settings.params.frame_ms));
    }

    Ok(())
}
