use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::ClinicRepository;

/// Shared by every router. The repository is opened once at startup and
/// injected here rather than reached through a global.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repository: Arc<dyn ClinicRepository>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Arc<dyn ClinicRepository>) -> Self {
        Self {
            config: Arc::new(config),
            repository,
        }
    }
}
