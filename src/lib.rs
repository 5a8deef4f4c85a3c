pub mod admin;
pub mod catalog;
pub mod config;
pub mod db;
pub mod editor;
pub mod error;
pub mod export;
pub mod gate;
pub mod http_server;
pub mod loader;
pub mod models;
pub mod render;

use admin::AdminPanel;
use config::AppConfig;
use tokio::sync::Mutex;

/// Everything the request handlers share, built once at startup
pub struct AppState {
    pub config: AppConfig,
    pub admin: Mutex<AdminPanel>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let admin = Mutex::new(AdminPanel::new(&config));
        Self { config, admin }
    }
}
