use std::sync::mpsc;
use std::time::Instant;

use ratatui::widgets::{Block, Borders};
use tracing::{debug, warn};
use tui_textarea::TextArea;

use crate::config::AppConfig;
use crate::controller::{PanelPhase, SearchController};
use crate::loader::LoadResult;
use crate::map::MapView;
use crate::tui::surface::{AlertQueue, EmbedFrame, ResultsPanel};
use crate::tui::theme::Theme;

pub type TuiController = SearchController<EmbedFrame, ResultsPanel, AlertQueue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Results,
}

pub struct TuiApp {
    pub title: String,
    pub controller: TuiController,
    pub map: MapView,
    pub textarea: TextArea<'static>,
    pub focus: Focus,
    pub theme: Theme,
    pub dirty: bool,
    pub(crate) inbox_rx: Option<mpsc::Receiver<LoadResult>>,
    pub(crate) last_ctrl_c_at: Option<Instant>,
}

pub(crate) fn new_search_input() -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(Block::default().borders(Borders::ALL).title("Search"));
    textarea.set_placeholder_text("Name, cuisine or type; Enter on empty input shows all");
    textarea.set_cursor_line_style(ratatui::style::Style::default());
    textarea
}

impl TuiApp {
    pub fn new(title: impl Into<String>, cfg: &AppConfig) -> Self {
        let map = MapView::init(&cfg.map);
        let frame = EmbedFrame::new(map.initial_embed(&cfg.embed.layer), &cfg.embed.base_url);
        let controller = SearchController::new(
            cfg,
            frame,
            ResultsPanel::default(),
            AlertQueue::default(),
        );
        let theme = Theme::by_name(&cfg.theme);
        if theme.name != cfg.theme {
            warn!(requested = %cfg.theme, using = %theme.name, "unknown theme");
        }
        Self {
            title: title.into(),
            controller,
            map,
            textarea: new_search_input(),
            focus: Focus::Input,
            theme,
            dirty: true,
            inbox_rx: None,
            last_ctrl_c_at: None,
        }
    }

    pub fn with_inbox(mut self, rx: mpsc::Receiver<LoadResult>) -> Self {
        self.inbox_rx = Some(rx);
        self
    }

    pub fn input_text(&self) -> String {
        self.textarea.lines().join(" ")
    }

    /// Deliver a finished load, if any. Returns true when state changed.
    pub fn drain_inbox(&mut self) -> bool {
        let Some(rx) = self.inbox_rx.as_ref() else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.controller.on_loaded(result);
                self.inbox_rx = None;
                self.dirty = true;
                true
            }
            Err(mpsc::TryRecvError::Empty) => false,
            Err(mpsc::TryRecvError::Disconnected) => {
                debug!("loader inbox disconnected");
                self.inbox_rx = None;
                false
            }
        }
    }

    /// Keep focus consistent with the controller after an action.
    pub(crate) fn settle_focus(&mut self) {
        if self.controller.frame_mut().take_reveal() {
            self.focus = Focus::Input;
        }
        if self.controller.phase() == PanelPhase::Idle {
            self.focus = Focus::Input;
        }
    }
}
