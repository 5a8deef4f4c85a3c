use crate::models::Recipe;

pub const ALL_CATEGORIES: &str = "all";

/// Public view over a loaded collection. Only published recipes are ever
/// visible through `filtered`; `find` reaches the whole collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    filtered: Vec<usize>,
}

impl Catalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        let mut catalog = Self {
            recipes,
            filtered: Vec::new(),
        };
        catalog.reset();
        catalog
    }

    fn published(&self) -> impl Iterator<Item = (usize, &Recipe)> {
        self.recipes
            .iter()
            .enumerate()
            .filter(|(_, recipe)| recipe.is_published())
    }

    fn reset(&mut self) {
        self.filtered = self.published().map(|(idx, _)| idx).collect();
    }

    /// Re-filter the published subset by a case-insensitive substring query.
    /// A blank query restores the full published subset.
    pub fn search(&mut self, query: &str) {
        if query.trim().is_empty() {
            self.reset();
            return;
        }
        // Surrounding whitespace is part of the needle
        let needle = query.to_lowercase();

        self.filtered = self
            .published()
            .filter(|(_, recipe)| recipe.matches(&needle))
            .map(|(idx, _)| idx)
            .collect();

        log::debug!("Search '{}' matched {} recipes", query, self.filtered.len());
    }

    /// Restrict to one category; `"all"` restores the full published subset
    pub fn filter_by_category(&mut self, category: &str) {
        if category == ALL_CATEGORIES {
            self.reset();
            return;
        }

        self.filtered = self
            .published()
            .filter(|(_, recipe)| recipe.category == category)
            .map(|(idx, _)| idx)
            .collect();
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Recipe> {
        self.filtered.iter().map(|&idx| &self.recipes[idx])
    }

    pub fn featured(&self) -> Option<&Recipe> {
        self.filtered().next()
    }

    /// Up to `limit` recipes of the filtered set; `None` means unbounded
    pub fn grid(&self, limit: Option<usize>) -> Vec<&Recipe> {
        self.filtered()
            .take(limit.unwrap_or(usize::MAX))
            .collect()
    }

    /// Look up any recipe by id, drafts included
    pub fn find(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// Distinct categories of published recipes, first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for (_, recipe) in self.published() {
            if !categories.contains(&recipe.category) {
                categories.push(recipe.category.clone());
            }
        }
        categories
    }

    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}
