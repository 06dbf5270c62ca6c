use tracing::{debug, error, info};

use crate::config::{AppConfig, EmbedConfig};
use crate::geo::EmbedRequest;
use crate::loader::{DataSource, LoadError};
use crate::model::Restaurant;
use crate::search::{SearchQuery, filter, no_match_message};
use crate::store::{DatasetState, DatasetStore};
use crate::view::{CardAction, PanelView, build_panel};

pub const STILL_LOADING: &str = "Restaurant data is still loading. Please try again.";
pub const NOTHING_LOADED: &str = "No restaurants are available.";

/// The embedded map frame.
pub trait FrameTarget {
    fn navigate(&mut self, request: EmbedRequest, src: String);
    /// Bring the frame back into view.
    fn reveal(&mut self);
}

/// Host of the results panel.
pub trait PanelContainer {
    /// Replace whatever is mounted with `panel`.
    fn mount(&mut self, panel: PanelView);
    /// Returns whether a panel was mounted.
    fn unmount(&mut self) -> bool;
    fn mounted(&self) -> Option<&PanelView>;
}

/// Blocking, user-facing notice.
pub trait Notifier {
    fn alert(&mut self, message: String);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    Idle,
    ShowingResults,
}

pub struct SearchController<F, P, N> {
    store: DatasetStore,
    frame: F,
    panel: P,
    notifier: N,
    embed: EmbedConfig,
    suggestions: Vec<String>,
    source: DataSource,
}

impl<F, P, N> SearchController<F, P, N>
where
    F: FrameTarget,
    P: PanelContainer,
    N: Notifier,
{
    pub fn new(cfg: &AppConfig, frame: F, panel: P, notifier: N) -> Self {
        Self {
            store: DatasetStore::new(),
            frame,
            panel,
            notifier,
            embed: cfg.embed.clone(),
            suggestions: cfg.suggestions.clone(),
            source: cfg.data.clone(),
        }
    }

    pub fn on_loaded(&mut self, result: Result<Vec<Restaurant>, LoadError>) {
        let failure = result.as_ref().err().map(|e| e.to_string());
        if !self.store.resolve(result) {
            return;
        }
        match failure {
            None => info!("dataset ready"),
            Some(e) => {
                error!(error = %e, source = %self.source, "error loading restaurant data");
                self.notifier.alert(format!(
                    "Failed to load restaurant data. Make sure {} exists.",
                    self.source
                ));
            }
        }
    }

    pub fn on_search(&mut self, input: &str) {
        let data = match self.store.state() {
            DatasetState::Loaded(rows) => rows.clone(),
            DatasetState::Unloaded => {
                self.notifier.alert(STILL_LOADING.to_string());
                return;
            }
            DatasetState::Failed(e) => {
                let msg = format!("Restaurant data failed to load: {e}");
                self.notifier.alert(msg);
                return;
            }
        };

        let query = SearchQuery::from_input(input);
        let results = filter(&data, &query);
        debug!(?query, hits = results.len(), "search");

        if results.is_empty() {
            let msg = match &query {
                SearchQuery::Term(term) => no_match_message(term, &self.suggestions),
                SearchQuery::All => NOTHING_LOADED.to_string(),
            };
            self.notifier.alert(msg);
            return;
        }
        self.panel.mount(build_panel(&results, &query));
    }

    pub fn on_select(&mut self, action: &CardAction) {
        let CardAction::Locate { lat, lon, name } = action;
        info!(name = %name, lat, lon, "zooming to location");
        let request =
            EmbedRequest::focus(*lat, *lon, self.embed.offset, &self.embed.layer).with_label(name);
        let src = request.url(&self.embed.base_url);
        self.frame.navigate(request, src);
        self.frame.reveal();
        self.on_close();
    }

    /// Select the card at `index` of the mounted panel. Returns false if there is none.
    pub fn on_select_index(&mut self, index: usize) -> bool {
        let action = self
            .panel
            .mounted()
            .and_then(|p| p.cards.get(index))
            .map(|c| c.action.clone());
        match action {
            Some(action) => {
                self.on_select(&action);
                true
            }
            None => false,
        }
    }

    pub fn on_close(&mut self) {
        if self.panel.unmount() {
            debug!("results panel closed");
        }
    }

    pub fn phase(&self) -> PanelPhase {
        if self.panel.mounted().is_some() {
            PanelPhase::ShowingResults
        } else {
            PanelPhase::Idle
        }
    }

    pub fn dataset(&self) -> &DatasetState {
        self.store.state()
    }

    pub fn frame(&self) -> &F {
        &self.frame
    }

    pub fn frame_mut(&mut self) -> &mut F {
        &mut self.frame
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
