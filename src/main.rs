mod config;
mod debug;
mod game;
mod game_loop;
mod lobby;
mod network;
mod session;
mod ui;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use config::Config;

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    server: Option<String>,
    name: Option<String>,
    debug: bool,
    config_path: Option<PathBuf>,
    log_level: Option<String>,
}

#[derive(Debug, PartialEq)]
enum CliCommand {
    Run(CliOptions),
    Help,
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("netpong");

    let options = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(CliCommand::Run(options)) => options,
        Ok(CliCommand::Help) => {
            print_usage(program);
            return Ok(());
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            print_usage(program);
            std::process::exit(1);
        }
    };

    let mut config = match &options.config_path {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
    .context("loading configuration")?;
    apply_overrides(&mut config, &options);

    debug::init(
        options.debug,
        &config.logging.level,
        Path::new(&config.logging.file),
    )?;
    tracing::info!("Coordinator: {}", config.network.server_url);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Release events make paddle movement exact where the terminal supports them
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = game_loop::run_online(&mut terminal, &config, options.name);

    if enhanced {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!("Client stopped with error: {}", e);
    }
    result.context("running client")
}

/// Parse everything after the program name
fn parse_args(args: &[String]) -> Result<CliCommand, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let flag = arg.as_str();
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("{} requires a value", flag))
        };

        match flag {
            "--server" | "-s" => options.server = Some(value(flag)?),
            "--name" | "-n" => options.name = Some(value(flag)?),
            "--config" | "-c" => options.config_path = Some(PathBuf::from(value(flag)?)),
            "--log-level" => options.log_level = Some(value(flag)?),
            "--debug" | "-d" => options.debug = true,
            "--help" | "-h" => return Ok(CliCommand::Help),
            other => return Err(format!("Unknown argument: {}", other)),
        }
    }

    Ok(CliCommand::Run(options))
}

/// Command line flags win over the config file
fn apply_overrides(config: &mut Config, options: &CliOptions) {
    if let Some(server) = &options.server {
        config.network.server_url = server.clone();
    }
    if let Some(level) = &options.log_level {
        config.logging.level = level.clone();
    }
}

fn print_usage(program: &str) {
    println!("netpong - terminal Pong against online opponents");
    println!();
    println!("Usage: {} [options]", program);
    println!();
    println!("Options:");
    println!("  -s, --server <url>      Match coordinator (default from config)");
    println!("  -n, --name <name>       Register under this name as soon as connected");
    println!("  -c, --config <path>     Use this config file instead of the default");
    println!("      --log-level <lvl>   error, warn, info, debug or trace");
    println!("  -d, --debug             Write a diagnostic log file");
    println!("  -h, --help              Show this help");
    println!();
    println!("Controls:");
    println!("  Up/Down or W/S          Move paddle");
    println!("  X                       Surrender");
    println!("  Tab                     Refresh leaderboard");
    println!("  Enter                   Submit name / play again");
    println!("  Q or Esc                Quit");
}
