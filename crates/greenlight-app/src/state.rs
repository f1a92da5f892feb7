use std::{sync::Arc, time::Duration};

use greenlight_dal::Pool;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { pool, app_config }),
        }
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.state.app_config
    }
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Upper bound for a single database statement, none means unbounded.
    pub db_timeout: Option<Duration>,
}
