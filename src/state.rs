use crate::config::settings::AppConfig;
use crate::modules::provider::registry::ProviderRegistry;
use crate::repository::Repository;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub repository: Repository,
    pub providers: ProviderRegistry,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        repository: Repository,
        providers: ProviderRegistry,
    ) -> Self {
        Self {
            config,
            repository,
            providers,
        }
    }
}
