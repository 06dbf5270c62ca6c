use std::collections::VecDeque;

use tracing::debug;

use crate::controller::{FrameTarget, Notifier, PanelContainer};
use crate::geo::EmbedRequest;
use crate::view::PanelView;

/// Map pane state: the request the pane shows and its embed URL.
#[derive(Debug, Clone)]
pub struct EmbedFrame {
    pub request: EmbedRequest,
    pub src: String,
    reveal_pending: bool,
}

impl EmbedFrame {
    pub fn new(request: EmbedRequest, base_url: &str) -> Self {
        let src = request.url(base_url);
        Self {
            request,
            src,
            reveal_pending: false,
        }
    }

    pub fn take_reveal(&mut self) -> bool {
        std::mem::take(&mut self.reveal_pending)
    }
}

impl FrameTarget for EmbedFrame {
    fn navigate(&mut self, request: EmbedRequest, src: String) {
        debug!(src = %src, "frame navigate");
        self.request = request;
        self.src = src;
    }

    fn reveal(&mut self) {
        self.reveal_pending = true;
    }
}

#[derive(Debug, Default)]
pub struct ResultsPanel {
    view: Option<PanelView>,
    pub selected: usize,
}

impl ResultsPanel {
    pub fn select_next(&mut self) {
        let len = self.view.as_ref().map(|v| v.cards.len()).unwrap_or(0);
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

impl PanelContainer for ResultsPanel {
    fn mount(&mut self, panel: PanelView) {
        self.view = Some(panel);
        self.selected = 0;
    }

    fn unmount(&mut self) -> bool {
        self.selected = 0;
        self.view.take().is_some()
    }

    fn mounted(&self) -> Option<&PanelView> {
        self.view.as_ref()
    }
}

/// Modal alerts; the front one blocks input until dismissed.
#[derive(Debug, Default)]
pub struct AlertQueue {
    pending: VecDeque<String>,
}

impl AlertQueue {
    pub fn current(&self) -> Option<&str> {
        self.pending.front().map(String::as_str)
    }

    pub fn dismiss(&mut self) -> Option<String> {
        self.pending.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Notifier for AlertQueue {
    fn alert(&mut self, message: String) {
        self.pending.push_back(message);
    }
}
