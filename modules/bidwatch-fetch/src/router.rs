// Adapter dispatch: first registered adapter whose pattern matches wins.

use std::sync::Arc;

use crate::adapters::cardhobby::CardHobbyAdapter;
use crate::adapters::SourceAdapter;
use crate::error::{FetchError, Result};

#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: Vec<Arc<dyn SourceAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in adapter at its default settings.
    pub fn with_defaults() -> Self {
        Self::new().register(CardHobbyAdapter::new())
    }

    pub fn register(mut self, adapter: impl SourceAdapter + 'static) -> Self {
        self.adapters.push(Arc::new(adapter));
        self
    }

    pub fn resolve(&self, url: &str) -> Result<Arc<dyn SourceAdapter>> {
        self.adapters
            .iter()
            .find(|adapter| adapter.matches(url.trim()))
            .cloned()
            .ok_or_else(|| FetchError::NoAdapter {
                url: url.to_string(),
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
