mod cli;
mod config;
mod git;
mod keymap;
mod profile;
mod select;
mod session;
mod store;
mod tui;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use colored::Colorize;
use config::Settings;
use git::GitConfig;
use session::Session;
use std::fs::{self, OpenOptions};
use std::sync::Mutex;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::from_cli(&cli)?;
    init_logging(&settings)?;

    let mut session = Session::start(settings, GitConfig);
    tui::run(&mut session)?;

    if let Some(message) = session.message() {
        println!("{}", message.green());
    }
    Ok(())
}

/// Log to a file next to the profile store; the terminal belongs to the UI.
fn init_logging(settings: &Settings) -> Result<()> {
    let log_path = settings.log_path();
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .init();

    Ok(())
}
