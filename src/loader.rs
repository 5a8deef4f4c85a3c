use crate::db;
use crate::error::LoadError;
use crate::models::Recipe;
use std::path::Path;

/// Load the bundled collection. Failures are logged and yield an empty collection.
pub async fn load_static(data_path: &Path) -> Vec<Recipe> {
    match read_static(data_path).await {
        Ok(recipes) => {
            log::debug!("Loaded {} recipes from {:?}", recipes.len(), data_path);
            recipes
        }
        Err(e) => {
            log::error!("Error loading recipes from {:?}: {}", data_path, e);
            Vec::new()
        }
    }
}

/// Load the admin's collection: the local override when one was saved, the bundled file otherwise.
pub async fn load_with_override(store_path: &Path, data_path: &Path) -> Vec<Recipe> {
    let path = store_path.to_path_buf();
    let result = tokio::task::spawn_blocking(move || read_override(&path))
        .await
        .unwrap_or_else(|e| Err(LoadError::Store(e.into())));

    match result {
        Ok(Some(recipes)) => {
            log::info!("Loaded {} recipes from local store", recipes.len());
            recipes
        }
        Ok(None) => load_static(data_path).await,
        Err(e) => {
            log::error!("Error loading recipes from local store: {}", e);
            Vec::new()
        }
    }
}

async fn read_static(data_path: &Path) -> Result<Vec<Recipe>, LoadError> {
    let contents = tokio::fs::read_to_string(data_path).await?;
    Ok(serde_json::from_str(&contents)?)
}

fn read_override(store_path: &Path) -> Result<Option<Vec<Recipe>>, LoadError> {
    match db::get_item(store_path, db::RECIPES_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Persist the full collection as the local override
pub fn save_override(store_path: &Path, recipes: &[Recipe]) -> anyhow::Result<()> {
    let json = serde_json::to_string(recipes)?;
    db::set_item(store_path, db::RECIPES_KEY, &json)
}
