use std::io::Write;

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

use crate::config::AppConfig;
use crate::controller::{FrameTarget, Notifier, PanelContainer, SearchController};
use crate::geo::EmbedRequest;
use crate::loader::{LoadResult, load_dataset, spawn_load_task};
use crate::store::DatasetState;
use crate::view::PanelView;

const HELP: &str = "\
<text>     Search by name, cuisine or type (empty line shows all)
:open <n>  Show result n on the map
:close     Close the results
:help      Show help
:quit      Quit
Commands also accept a leading '/' (/open, /close, /help, /quit).";

/// Frame that reports its new source as a line of output.
#[derive(Debug, Default)]
pub struct LineFrame {
    pub src: Option<String>,
    out: Vec<String>,
}

impl FrameTarget for LineFrame {
    fn navigate(&mut self, request: EmbedRequest, src: String) {
        let name = request.label.unwrap_or_default();
        self.out.push(format!("map: {name} -> {src}"));
        self.src = Some(src);
    }

    fn reveal(&mut self) {}
}

#[derive(Debug, Default)]
pub struct LinePanel {
    view: Option<PanelView>,
    out: Vec<String>,
}

impl PanelContainer for LinePanel {
    fn mount(&mut self, panel: PanelView) {
        self.out.extend(format_panel(&panel));
        self.view = Some(panel);
    }

    fn unmount(&mut self) -> bool {
        self.view.take().is_some()
    }

    fn mounted(&self) -> Option<&PanelView> {
        self.view.as_ref()
    }
}

#[derive(Debug, Default)]
pub struct LineNotifier {
    out: Vec<String>,
}

impl Notifier for LineNotifier {
    fn alert(&mut self, message: String) {
        self.out.push(format!("[alert] {message}"));
    }
}

pub type LineController = SearchController<LineFrame, LinePanel, LineNotifier>;

pub fn format_panel(panel: &PanelView) -> Vec<String> {
    let mut lines = vec![format!("{}  (:close)", panel.header)];
    for (i, card) in panel.cards.iter().enumerate() {
        lines.push(format!("{:>3}. {}", i + 1, card.name));
        for detail in card.detail_lines() {
            lines.push(format!("     {detail}"));
        }
        lines.push(format!("     :open {} to view on map", i + 1));
    }
    lines
}

pub fn new_controller(cfg: &AppConfig) -> LineController {
    SearchController::new(
        cfg,
        LineFrame::default(),
        LinePanel::default(),
        LineNotifier::default(),
    )
}

/// What a single input line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum LineCommand {
    Search(String),
    Open(usize),
    Close,
    Help,
    Quit,
    Invalid(String),
}

/// Commands start with `:` (or `/`); any other line, including an unknown command, is a search.
pub fn parse_line(line: &str) -> LineCommand {
    let trimmed = line.trim();
    let Some(cmd) = trimmed
        .strip_prefix(':')
        .or_else(|| trimmed.strip_prefix('/'))
    else {
        return LineCommand::Search(line.to_string());
    };
    let (name, arg) = match cmd.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (cmd, ""),
    };
    match name {
        "quit" | "exit" => LineCommand::Quit,
        "help" => LineCommand::Help,
        "close" => LineCommand::Close,
        "open" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => LineCommand::Open(n - 1),
            _ => LineCommand::Invalid("usage: :open <n>".to_string()),
        },
        _ => LineCommand::Search(line.to_string()),
    }
}

/// Apply one command; returns the lines to print, or None to quit.
pub fn apply(ctl: &mut LineController, cmd: LineCommand) -> Option<Vec<String>> {
    match cmd {
        LineCommand::Quit => return None,
        LineCommand::Help => return Some(HELP.lines().map(str::to_string).collect()),
        LineCommand::Invalid(msg) => return Some(vec![msg]),
        LineCommand::Search(text) => ctl.on_search(&text),
        LineCommand::Close => ctl.on_close(),
        LineCommand::Open(i) => {
            if !ctl.on_select_index(i) {
                return Some(vec![format!("no result {}", i + 1)]);
            }
        }
    }
    Some(take_output(ctl))
}

fn take_output(ctl: &mut LineController) -> Vec<String> {
    let mut lines = std::mem::take(&mut ctl.notifier_mut().out);
    lines.append(&mut std::mem::take(&mut ctl.frame_mut().out));
    lines.append(&mut std::mem::take(&mut ctl.panel_mut().out));
    lines
}

fn write_lines<W: Write>(out: &mut W, lines: Vec<String>) -> Result<()> {
    for l in lines {
        writeln!(out, "{l}")?;
    }
    out.flush()?;
    Ok(())
}

/// Resolves when the load task finishes; pends forever once it has been consumed.
async fn load_finished(task: &mut Option<JoinHandle<LoadResult>>) -> Result<LoadResult, JoinError> {
    match task.as_mut() {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

/// Serve input lines until EOF or `:quit`, reporting the load as soon as it settles.
async fn drive<R, W>(
    ctl: &mut LineController,
    mut task: Option<JoinHandle<LoadResult>>,
    mut lines: Lines<R>,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        tokio::select! {
            biased;
            joined = load_finished(&mut task) => {
                task = None;
                ctl.on_loaded(joined.context("restaurant loader task failed")?);
                write_lines(out, take_output(ctl))?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                debug!(line = %line, "line input");
                match apply(ctl, parse_line(&line)) {
                    Some(reply) => write_lines(out, reply)?,
                    None => break,
                }
            }
        }
    }
    Ok(())
}

pub async fn run_cli_loop(cfg: AppConfig) -> Result<()> {
    println!("dishmap (line mode) - type :help for commands");
    let mut ctl = new_controller(&cfg);
    let task = spawn_load_task(cfg.data.clone(), reqwest::Client::new());
    let lines = BufReader::new(tokio::io::stdin()).lines();
    drive(&mut ctl, Some(task), lines, &mut std::io::stdout()).await
}

/// Wait for the dataset, run one search and print the outcome.
pub async fn run_query(cfg: AppConfig, query: &str) -> Result<()> {
    let mut ctl = new_controller(&cfg);
    let result = load_dataset(&cfg.data, &reqwest::Client::new()).await;
    ctl.on_loaded(result);
    ctl.on_search(query);
    for l in take_output(&mut ctl) {
        println!("{l}");
    }
    if let DatasetState::Failed(e) = ctl.dataset() {
        bail!("could not load {}: {}", cfg.data, e);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;
    use crate::model::Restaurant;
    use std::time::Duration;

    fn loaded() -> LineController {
        let mut ctl = new_controller(&AppConfig::default());
        ctl.on_loaded(Ok(vec![Restaurant {
            name: "Tony's Pizza".into(),
            kind: "Restaurant".into(),
            cuisine: "Italian".into(),
            address: "1 Main St".into(),
            lat: 40.0,
            lon: -73.0,
        }]));
        ctl
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line(":quit"), LineCommand::Quit);
        assert_eq!(parse_line(":help"), LineCommand::Help);
        assert_eq!(parse_line(" :close "), LineCommand::Close);
        assert_eq!(parse_line(":open 1"), LineCommand::Open(0));
        assert_eq!(parse_line(":open  3 "), LineCommand::Open(2));
        assert!(matches!(parse_line(":open 0"), LineCommand::Invalid(_)));
        assert!(matches!(parse_line(":open x"), LineCommand::Invalid(_)));
        assert!(matches!(parse_line(":open"), LineCommand::Invalid(_)));
        assert_eq!(parse_line("pizza"), LineCommand::Search("pizza".into()));
        assert_eq!(parse_line(""), LineCommand::Search(String::new()));
        assert_eq!(parse_line(":pizza"), LineCommand::Search(":pizza".into()));
    }

    #[test]
    fn test_parse_line_slash_aliases() {
        assert_eq!(parse_line("/quit"), LineCommand::Quit);
        assert_eq!(parse_line("/exit"), LineCommand::Quit);
        assert_eq!(parse_line("/close"), LineCommand::Close);
        assert_eq!(parse_line("/open 2"), LineCommand::Open(1));
    }

    #[test]
    fn test_colon_open_moves_map() {
        let mut ctl = loaded();
        apply(&mut ctl, parse_line("pizza"));
        let out = apply(&mut ctl, parse_line(":open 1")).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("map: Tony's Pizza -> "));
        assert!(ctl.frame().src.as_deref().unwrap().contains("marker=40,-73"));
    }

    #[test]
    fn test_help_lists_commands() {
        let mut ctl = loaded();
        let out = apply(&mut ctl, LineCommand::Help).unwrap();
        assert!(out.iter().any(|l| l.starts_with(":open <n>")));
        assert!(out.iter().any(|l| l.starts_with(":quit")));
    }

    #[test]
    fn test_search_prints_panel() {
        let mut ctl = loaded();
        let out = apply(&mut ctl, parse_line("pizza")).unwrap();
        assert_eq!(out[0], "Found 1 results  (:close)");
        assert_eq!(out[1], "  1. Tony's Pizza");
        assert!(out.contains(&"     Type: Restaurant".to_string()));
    }

    #[test]
    fn test_no_match_prints_alert() {
        let mut ctl = loaded();
        let out = apply(&mut ctl, parse_line("sushi")).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("[alert] No restaurants found matching \"sushi\""));
    }

    #[test]
    fn test_open_prints_map_url() {
        let mut ctl = loaded();
        apply(&mut ctl, parse_line("pizza"));
        let out = apply(&mut ctl, parse_line("/open 1")).unwrap();
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("map: Tony's Pizza -> https://www.openstreetmap.org/export/embed.html?bbox="));
        assert!(ctl.panel().mounted().is_none());
        assert!(ctl.frame().src.as_deref().unwrap().contains("marker=40,-73"));

        let out = apply(&mut ctl, parse_line("/open 1")).unwrap();
        assert_eq!(out, vec!["no result 1".to_string()]);
    }

    fn failed_task() -> JoinHandle<LoadResult> {
        tokio::spawn(async { Err(LoadError::Status(404)) })
    }

    #[tokio::test]
    async fn test_failed_load_reported_without_input() {
        let mut ctl = new_controller(&AppConfig::default());
        let task = failed_task();
        // stdin stays open and silent
        let (_stdin_tx, stdin_rx) = tokio::io::duplex(64);
        let lines = BufReader::new(stdin_rx).lines();
        let mut out = Vec::new();

        let waited = tokio::time::timeout(
            Duration::from_millis(300),
            drive(&mut ctl, Some(task), lines, &mut out),
        )
        .await;
        assert!(waited.is_err(), "loop should still be waiting for input");

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "[alert] Failed to load restaurant data. Make sure restaurants.json exists.\n"
        );
        assert!(matches!(ctl.dataset(), DatasetState::Failed(_)));
    }

    #[tokio::test]
    async fn test_load_reported_before_pending_quit() {
        let mut ctl = new_controller(&AppConfig::default());
        let task = failed_task();
        while !task.is_finished() {
            tokio::task::yield_now().await;
        }
        let lines = BufReader::new(&b":quit\n"[..]).lines();
        let mut out = Vec::new();

        drive(&mut ctl, Some(task), lines, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("[alert] Failed to load restaurant data."));
    }

    #[tokio::test]
    async fn test_drive_searches_after_load() {
        let mut ctl = new_controller(&AppConfig::default());
        let task: JoinHandle<LoadResult> = tokio::spawn(async {
            Ok(vec![Restaurant {
                name: "Tony's Pizza".into(),
                kind: "Restaurant".into(),
                cuisine: "Italian".into(),
                address: "1 Main St".into(),
                lat: 40.0,
                lon: -73.0,
            }])
        });
        while !task.is_finished() {
            tokio::task::yield_now().await;
        }
        let lines = BufReader::new(&b"pizza\n:open 1\n"[..]).lines();
        let mut out = Vec::new();

        drive(&mut ctl, Some(task), lines, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Found 1 results  (:close)\n"));
        assert!(text.contains("map: Tony's Pizza -> "));
    }

    #[test]
    fn test_quit() {
        let mut ctl = loaded();
        assert!(apply(&mut ctl, LineCommand::Quit).is_none());
    }
}
