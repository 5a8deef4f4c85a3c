use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Draft,
    Published,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Draft => "draft",
            Status::Published => "published",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryImage {
    /// Instruction step this image illustrates
    pub step: u32,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// 1-based position within the recipe
    pub step: u32,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_string_as_none"
    )]
    pub primary_image: Option<String>,
    #[serde(default)]
    pub secondary_images: Vec<SecondaryImage>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub prep_time: String,
    #[serde(default)]
    pub cook_time: String,
    #[serde(default)]
    pub total_time: String,
    #[serde(default)]
    pub servings: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub status: Status,
}

impl Recipe {
    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }

    /// Secondary image paired with an instruction step, if any
    pub fn image_for_step(&self, step: u32) -> Option<&SecondaryImage> {
        self.secondary_images.iter().find(|img| img.step == step)
    }

    /// Case-insensitive substring match over title, description, tags and ingredients.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.tags.iter().any(|t| t.to_lowercase().contains(needle))
            || self
                .ingredients
                .iter()
                .any(|i| i.to_lowercase().contains(needle))
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn recipe(id: &str, title: &str, status: Status) -> Recipe {
        Recipe {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{} description", title),
            primary_image: None,
            secondary_images: Vec::new(),
            ingredients: vec!["salt".to_string()],
            instructions: vec![Instruction {
                step: 1,
                text: "Cook it".to_string(),
            }],
            prep_time: "10 min".to_string(),
            cook_time: "20 min".to_string(),
            total_time: "30 min".to_string(),
            servings: "4".to_string(),
            tags: Vec::new(),
            category: "dinner".to_string(),
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "dal",
            "title": "Dal Tadka",
            "description": "Yellow lentils",
            "primaryImage": "",
            "secondaryImages": [{"step": 2, "url": "img/2.jpg", "description": "Tempering"}],
            "ingredients": ["Toor dal", "Ghee"],
            "instructions": [{"step": 1, "text": "Wash"}, {"step": 2, "text": "Temper"}],
            "prepTime": "10 mins",
            "cookTime": "25 mins",
            "totalTime": "35 mins",
            "servings": "4",
            "tags": ["lentils", "vegetarian"],
            "category": "main-course",
            "status": "published"
        }"#;

        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.primary_image, None);
        assert_eq!(recipe.prep_time, "10 mins");
        assert!(recipe.is_published());
        assert_eq!(recipe.image_for_step(2).unwrap().description, "Tempering");
        assert!(recipe.image_for_step(1).is_none());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let recipe: Recipe = serde_json::from_str(r#"{"id": "x", "title": "X"}"#).unwrap();
        assert!(recipe.secondary_images.is_empty());
        assert!(recipe.tags.is_empty());
        assert_eq!(recipe.status, Status::Draft);
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let mut recipe = fixtures::recipe("x", "X", Status::Published);
        recipe.primary_image = Some("a.jpg".to_string());
        let value = serde_json::to_value(&recipe).unwrap();
        assert_eq!(value["primaryImage"], "a.jpg");
        assert_eq!(value["totalTime"], "30 min");
        assert_eq!(value["status"], "published");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let mut recipe = fixtures::recipe("x", "Paneer Tikka", Status::Published);
        recipe.tags = vec!["Spicy".to_string()];
        assert!(recipe.matches("paneer"));
        assert!(recipe.matches("spicy"));
        assert!(recipe.matches("salt"));
        assert!(!recipe.matches("chocolate"));
    }
}
