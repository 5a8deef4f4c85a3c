use crate::error::EditorError;
use crate::models::{Instruction, Recipe, SecondaryImage, Status};
use serde::{Deserialize, Serialize};

pub const ADD_TITLE: &str = "Add New Recipe";
pub const EDIT_TITLE: &str = "Edit Recipe";

/// Admin form payload, one field per form control
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeForm {
    pub id: String,
    pub title: String,
    pub description: String,
    pub primary_image: String,
    /// One ingredient per line
    pub ingredients: String,
    /// One step per line
    pub instructions: String,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub servings: String,
    /// Comma separated
    pub tags: String,
    pub category: String,
    pub status: Status,
}

impl RecipeForm {
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            primary_image: recipe.primary_image.clone().unwrap_or_default(),
            ingredients: recipe.ingredients.join("\n"),
            instructions: recipe
                .instructions
                .iter()
                .map(|i| i.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
            prep_time: recipe.prep_time.clone(),
            cook_time: recipe.cook_time.clone(),
            total_time: recipe.total_time.clone(),
            servings: recipe.servings.clone(),
            tags: recipe.tags.join(", "),
            category: recipe.category.clone(),
            status: recipe.status,
        }
    }

    /// Build a recipe from the form. The form has no control for secondary
    /// images, so callers pass the ones to carry over.
    pub fn into_recipe(self, secondary_images: Vec<SecondaryImage>) -> Recipe {
        let primary_image = Some(self.primary_image.trim().to_string()).filter(|s| !s.is_empty());

        Recipe {
            id: self.id.trim().to_string(),
            title: self.title,
            description: self.description,
            primary_image,
            secondary_images,
            ingredients: parse_lines(&self.ingredients),
            instructions: parse_instructions(&self.instructions),
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            total_time: self.total_time,
            servings: self.servings,
            tags: parse_tags(&self.tags),
            category: self.category,
            status: self.status,
        }
    }
}

/// Split on newlines, trim, drop blank lines
pub fn parse_lines(input: &str) -> Vec<String> {
    input
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Non-blank lines become steps numbered by position, starting at 1
pub fn parse_instructions(input: &str) -> Vec<Instruction> {
    parse_lines(input)
        .into_iter()
        .zip(1..)
        .map(|(text, step)| Instruction { step, text })
        .collect()
}

pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Collection being edited plus the edit-mode marker
#[derive(Debug, Clone, Default)]
pub struct Editor {
    recipes: Vec<Recipe>,
    editing: Option<String>,
}

impl Editor {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self {
            recipes,
            editing: None,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn form_title(&self) -> &'static str {
        if self.editing.is_some() {
            EDIT_TITLE
        } else {
            ADD_TITLE
        }
    }

    pub fn create(&mut self, recipe: Recipe) -> Result<(), EditorError> {
        if self.find(&recipe.id).is_some() {
            return Err(EditorError::DuplicateId(recipe.id));
        }

        log::info!("Adding recipe '{}'", recipe.id);
        self.recipes.push(recipe);
        Ok(())
    }

    /// Replace the record being edited. The submitted id must be the one under
    /// edit; the session is cleared on success.
    pub fn update(&mut self, recipe: Recipe) -> Result<(), EditorError> {
        let Some(editing) = self.editing.as_deref() else {
            return Err(EditorError::NoActiveEdit);
        };

        // An id changed in the form never reaches another record
        if recipe.id != editing {
            return Err(EditorError::NotFound(recipe.id));
        }

        let index = self
            .recipes
            .iter()
            .position(|r| r.id == recipe.id)
            .ok_or_else(|| EditorError::NotFound(recipe.id.clone()))?;

        log::info!("Updating recipe '{}'", recipe.id);
        self.recipes[index] = recipe;
        self.editing = None;
        Ok(())
    }

    /// Filter out every record carrying `id`, returning how many were removed
    pub fn delete(&mut self, id: &str) -> Result<usize, EditorError> {
        let before = self.recipes.len();
        self.recipes.retain(|r| r.id != id);
        let removed = before - self.recipes.len();

        if removed == 0 {
            return Err(EditorError::NotFound(id.to_string()));
        }

        log::info!("Deleted {} recipe(s) with id '{}'", removed, id);
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        Ok(removed)
    }

    /// Enter edit mode for `id`, returning the prefilled form. Unknown ids are ignored.
    pub fn edit(&mut self, id: &str) -> Option<RecipeForm> {
        let form = RecipeForm::from_recipe(self.find(id)?);
        self.editing = Some(id.to_string());
        Some(form)
    }

    pub fn reset(&mut self) {
        self.editing = None;
    }

    /// Route a submitted form to update while editing, create otherwise
    pub fn submit(&mut self, form: RecipeForm) -> Result<(), EditorError> {
        match self.editing.clone() {
            Some(editing) => {
                let images = self
                    .find(&editing)
                    .map(|r| r.secondary_images.clone())
                    .unwrap_or_default();
                self.update(form.into_recipe(images))
            }
            None => self.create(form.into_recipe(Vec::new())),
        }
    }
}
