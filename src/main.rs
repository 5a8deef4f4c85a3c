use recipe_press::config::{AppConfig, DEFAULT_CONFIG_PATH};
use recipe_press::{db, http_server, AppState};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config_path = std::env::var("RECIPES_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let config = AppConfig::load(&config_path);

    log::info!("Recipe data: {:?}", config.data_path);
    log::info!("Local store: {:?}", config.store_path);

    // Serving continues without a store; the admin then starts from an empty
    // collection and every save reports an error
    if let Err(e) = db::init_database(&config.store_path) {
        log::error!("Failed to initialize local store: {:#}", e);
    }

    let state = Arc::new(AppState::new(config));

    if let Err(e) = http_server::start_server(state).await {
        log::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
