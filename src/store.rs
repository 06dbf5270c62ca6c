use std::sync::Arc;

use tracing::warn;

use crate::loader::LoadError;
use crate::model::Restaurant;

/// Session-scoped dataset. Only the loader resolves it, exactly once.
#[derive(Debug, Clone, Default)]
pub enum DatasetState {
    #[default]
    Unloaded,
    Loaded(Arc<[Restaurant]>),
    Failed(Arc<LoadError>),
}

#[derive(Debug, Default)]
pub struct DatasetStore {
    state: DatasetState,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DatasetState {
        &self.state
    }

    /// Returns false when the store was already resolved; the new result is dropped.
    pub fn resolve(&mut self, result: Result<Vec<Restaurant>, LoadError>) -> bool {
        if !matches!(self.state, DatasetState::Unloaded) {
            warn!("dataset already resolved; ignoring late load result");
            return false;
        }
        self.state = match result {
            Ok(rows) => DatasetState::Loaded(rows.into()),
            Err(e) => DatasetState::Failed(Arc::new(e)),
        };
        true
    }
}
