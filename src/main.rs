mod cli;
mod config;
mod controller;
mod geo;
mod loader;
mod logging;
mod map;
mod model;
mod search;
mod store;
mod tui;
mod view;

use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser};
use dotenvy::dotenv;
use tracing::info;

use crate::config::{AppConfig, CliOverrides, ConfigWarning};
use crate::controller::Notifier;
use crate::loader::spawn_loader;
use crate::tui::TuiApp;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dishmap",
    version,
    about = "Search a restaurant list and show picks on a map (TUI)"
)]
pub struct Cli {
    /// Use plain line mode (disable TUI)
    #[arg(long, action = ArgAction::SetTrue)]
    no_tui: bool,

    /// Run a single search, print the results and exit
    #[arg(long, short)]
    query: Option<String>,

    /// Restaurant data: a path or an http(s) URL
    #[arg(long)]
    data: Option<String>,

    /// Color theme (dark, light)
    #[arg(long)]
    theme: Option<String>,

    /// Log level (error,warn,info,debug,trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log file used while the TUI owns the terminal
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let line_mode = cli.no_tui || cli.query.is_some();

    let overrides = CliOverrides {
        data: cli.data.clone(),
        theme: cli.theme.clone(),
        log_file: cli.log_file.clone(),
    };
    let (cfg, warnings) = AppConfig::from_cli(overrides)?;

    if line_mode {
        logging::init_stderr_logging(&cli.log_level)?;
    } else {
        logging::init_file_logging(&cli.log_level, &cfg.log_file)?;
    }
    for w in &warnings {
        w.log();
    }
    info!(?cfg, "app config");

    if let Some(query) = cli.query.as_deref() {
        return cli::run_query(cfg, query).await;
    }
    if cli.no_tui {
        return cli::run_cli_loop(cfg).await;
    }
    run_tui(cfg, &warnings)
}

fn run_tui(cfg: AppConfig, warnings: &[ConfigWarning]) -> Result<()> {
    let inbox = spawn_loader(cfg.data.clone(), reqwest::Client::new());
    let mut app = TuiApp::new("dishmap", &cfg).with_inbox(inbox);
    // the log file is out of sight while the TUI runs
    for w in warnings {
        app.controller.notifier_mut().alert(w.to_string());
    }
    app.run()
}
