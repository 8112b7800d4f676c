use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::{ProviderError, TranscodingProvider};
use crate::config::settings::AppConfig;

/// Builds a provider client from the process configuration.
pub type ProviderFactory =
    Arc<dyn Fn(&AppConfig) -> Result<Box<dyn TranscodingProvider>, ProviderError> + Send + Sync>;

/// Name → factory table shared by the whole process.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    factories: Arc<RwLock<HashMap<String, ProviderFactory>>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: &str, factory: ProviderFactory) -> Result<(), ProviderError> {
        let mut factories = self.factories.write().unwrap_or_else(PoisonError::into_inner);
        if factories.contains_key(name) {
            return Err(ProviderError::AlreadyRegistered(name.to_string()));
        }
        factories.insert(name.to_string(), factory);
        info!(provider = name, "registered transcoding provider");
        Ok(())
    }

    pub fn get_provider_factory(&self, name: &str) -> Result<ProviderFactory, ProviderError> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
