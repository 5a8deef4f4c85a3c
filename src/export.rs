use crate::models::Recipe;
use chrono::{DateTime, Utc};

pub const EXPORT_FILENAME: &str = "recipes.json";

pub const PUBLISH_HINT: &str =
    "Replace the file in data/recipes.json and commit to GitHub to publish changes.";

/// Pretty-printed snapshot of the full collection, offered for download after each write
#[derive(Debug, Clone)]
pub struct Export {
    pub body: String,
    pub recipe_count: usize,
    pub generated_at: DateTime<Utc>,
}

impl Export {
    pub fn from_recipes(recipes: &[Recipe]) -> serde_json::Result<Self> {
        Ok(Self {
            body: serde_json::to_string_pretty(recipes)?,
            recipe_count: recipes.len(),
            generated_at: Utc::now(),
        })
    }

    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", EXPORT_FILENAME)
    }
}
