use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_CONFIG_PATH: &str = "recipes.config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    pub bind_address: String,

    pub port: u16,

    /// Bundled static collection (JSON array of recipes)
    pub data_path: PathBuf,

    /// SQLite file holding the admin's local override copy
    pub store_path: PathBuf,

    /// Static admin secret. Compared verbatim; this is a UI convenience, not a security boundary.
    pub admin_secret: String,

    /// Number of cards shown on the homepage grid
    pub homepage_limit: usize,

    /// Category choices offered by the admin form
    pub categories: Vec<String>,

    /// Image shown when a recipe has no primary image
    pub placeholder_image: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 3737,
            data_path: PathBuf::from("data/recipes.json"),
            store_path: PathBuf::from("data/local.db"),
            admin_secret: "krishna123".to_string(),
            homepage_limit: 6,
            categories: vec![
                "breakfast".to_string(),
                "main-course".to_string(),
                "snacks".to_string(),
                "desserts".to_string(),
                "beverages".to_string(),
            ],
            placeholder_image:
                "https://via.placeholder.com/400x300/d4691a/ffffff?text=Recipe+Image".to_string(),
        }
    }
}

impl AppConfig {
    /// Load settings from an optional JSON file, then apply environment overrides.
    /// A missing or unreadable file falls back to defaults.
    pub fn load(path: &Path) -> Self {
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<AppConfig>(&contents) {
                Ok(config) => {
                    log::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config file {:?} ({}), using defaults", path, e);
                    AppConfig::default()
                }
            },
            Err(_) => {
                log::info!("No config file at {:?}, using defaults", path);
                AppConfig::default()
            }
        };

        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(port) = try_env("RECIPES_PORT") {
            self.port = port;
        }
        if let Some(data_path) = try_env::<String>("RECIPES_DATA") {
            self.data_path = PathBuf::from(data_path);
        }
        if let Some(store_path) = try_env::<String>("RECIPES_STORE") {
            self.store_path = PathBuf::from(store_path);
        }
        if let Some(secret) = try_env("RECIPES_ADMIN_SECRET") {
            self.admin_secret = secret;
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn try_env<T: FromStr>(key: &str) -> Option<T>
where
    T::Err: Display,
{
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => {
            log::debug!("{} overridden from environment", key);
            Some(value)
        }
        Err(e) => {
            log::warn!("Ignoring invalid {} value: {}", key, e);
            None
        }
    }
}
