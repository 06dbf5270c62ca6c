use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute, terminal,
};
use std::io;
use std::time::Duration;
use tracing::info;

use crate::tui::event_handlers::handle_key;
use crate::tui::state::TuiApp;

type TerminalType = Terminal<CrosstermBackend<io::Stdout>>;

impl TuiApp {
    pub fn run(&mut self) -> Result<()> {
        struct TuiGuard;
        impl Drop for TuiGuard {
            fn drop(&mut self) {
                let mut stdout = io::stdout();
                let _ = execute!(stdout, terminal::LeaveAlternateScreen, cursor::Show);
                let _ = terminal::disable_raw_mode();
            }
        }
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(stdout, terminal::EnterAlternateScreen)?;
        let _guard = TuiGuard;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        terminal.clear()?;
        self.event_loop(&mut terminal)
    }

    fn event_loop(&mut self, terminal: &mut TerminalType) -> Result<()> {
        loop {
            self.drain_inbox();
            if self.dirty {
                terminal.draw(|f| self.view(f))?;
                self.dirty = false;
            }
            if !event::poll(Duration::from_millis(50))? {
                continue;
            }
            match event::read()? {
                Event::Key(k) if k.kind == KeyEventKind::Press => {
                    if handle_key(self, k) {
                        info!("exit requested");
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => self.dirty = true,
                _ => {}
            }
        }
    }
}
