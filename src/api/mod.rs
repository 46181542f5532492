// src/api/mod.rs
pub mod health;
pub mod job;

use std::sync::Arc;

// AppState definition
use crate::config::Config;
use crate::services::WalletProfiler;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub profiler: Arc<WalletProfiler>,
}

impl AppState {
    pub fn new(config: Config, profiler: WalletProfiler) -> Self {
        Self {
            config: Arc::new(config),
            profiler: Arc::new(profiler),
        }
    }
}
