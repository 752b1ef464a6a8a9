use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::ServerConfig;
use crate::store::ScoreStore;

pub type SharedScoreStore = Arc<RwLock<ScoreStore>>;

#[derive(Clone)]
pub struct AppState {
    pub scores: SharedScoreStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            scores: Arc::new(RwLock::new(ScoreStore::with_capacity(
                config.limits.max_records,
            ))),
            config: Arc::new(config),
        }
    }
}
