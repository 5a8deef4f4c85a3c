use crate::admin::Notice;
use crate::catalog::{Catalog, ALL_CATEGORIES};
use crate::editor::RecipeForm;
use crate::export::{Export, PUBLISH_HINT};
use crate::models::{Recipe, Status};
use askama::Template;

const CARD_EXCERPT_CHARS: usize = 100;
const ADMIN_EXCERPT_CHARS: usize = 50;
const CARD_TAG_LIMIT: usize = 3;

/// Cut to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn image_url(image: Option<&str>, placeholder: &str) -> String {
    image.unwrap_or(placeholder).to_string()
}

pub fn recipe_href(id: &str) -> String {
    format!("/recipe?id={}", urlencoding::encode(id))
}

#[derive(Debug, Clone)]
pub struct CardView {
    pub title: String,
    pub image: String,
    pub excerpt: String,
    pub total_time: String,
    pub servings: String,
    pub tags: Vec<String>,
    pub href: String,
}

impl CardView {
    fn new(recipe: &Recipe, placeholder: &str) -> Self {
        Self {
            title: recipe.title.clone(),
            image: image_url(recipe.primary_image.as_deref(), placeholder),
            excerpt: truncate(&recipe.description, CARD_EXCERPT_CHARS),
            total_time: recipe.total_time.clone(),
            servings: recipe.servings.clone(),
            tags: recipe.tags.iter().take(CARD_TAG_LIMIT).cloned().collect(),
            href: recipe_href(&recipe.id),
        }
    }
}

/// Featured slot: first recipe of the current filtered set
pub fn featured_card(catalog: &Catalog, placeholder: &str) -> Option<CardView> {
    catalog
        .featured()
        .map(|recipe| CardView::new(recipe, placeholder))
}

pub fn grid_cards(catalog: &Catalog, limit: Option<usize>, placeholder: &str) -> Vec<CardView> {
    catalog
        .grid(limit)
        .into_iter()
        .map(|recipe| CardView::new(recipe, placeholder))
        .collect()
}

#[derive(Debug, Clone)]
pub struct CategoryLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

/// Category menu; the active entry comes from the category the request asked for
pub fn category_links(categories: &[String], active: &str) -> Vec<CategoryLink> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(categories.iter().cloned())
        .map(|category| CategoryLink {
            href: format!("/recipes?category={}", urlencoding::encode(&category)),
            active: category == active,
            label: category,
        })
        .collect()
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub query: String,
    pub featured: Option<CardView>,
    pub cards: Vec<CardView>,
    pub categories: Vec<CategoryLink>,
}

#[derive(Template)]
#[template(path = "recipes.html")]
pub struct ListingPage {
    pub query: String,
    pub category: String,
    pub cards: Vec<CardView>,
    pub categories: Vec<CategoryLink>,
}

#[derive(Debug, Clone)]
pub struct StepImage {
    pub url: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct StepView {
    pub step: u32,
    pub text: String,
    pub image: Option<StepImage>,
}

#[derive(Template)]
#[template(path = "recipe.html")]
pub struct DetailPage {
    pub title: String,
    pub description: String,
    pub image: String,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub servings: String,
    pub tags: Vec<String>,
    pub ingredients: Vec<String>,
    pub steps: Vec<StepView>,
    pub share_twitter: String,
    pub share_facebook: String,
}

impl DetailPage {
    /// `page_url` is the absolute address of this page, used by the share links
    pub fn new(recipe: &Recipe, page_url: &str, placeholder: &str) -> Self {
        let steps = recipe
            .instructions
            .iter()
            .map(|instruction| StepView {
                step: instruction.step,
                text: instruction.text.clone(),
                image: recipe.image_for_step(instruction.step).map(|img| StepImage {
                    url: image_url(Some(&img.url), placeholder),
                    description: img.description.clone(),
                }),
            })
            .collect();

        Self {
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            image: image_url(recipe.primary_image.as_deref(), placeholder),
            prep_time: recipe.prep_time.clone(),
            cook_time: recipe.cook_time.clone(),
            total_time: recipe.total_time.clone(),
            servings: recipe.servings.clone(),
            tags: recipe.tags.clone(),
            ingredients: recipe.ingredients.clone(),
            steps,
            share_twitter: format!(
                "https://twitter.com/intent/tweet?text={}",
                urlencoding::encode(&format!("{} - {}", recipe.title, page_url))
            ),
            share_facebook: format!(
                "https://www.facebook.com/sharer/sharer.php?u={}",
                urlencoding::encode(page_url)
            ),
        }
    }
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundPage {
    pub id: String,
}

#[derive(Template)]
#[template(path = "admin_login.html")]
pub struct LoginPage {
    pub show_error: bool,
}

#[derive(Debug, Clone)]
pub struct AdminRow {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub category: String,
    pub status: String,
    pub published: bool,
    pub edit_href: String,
    pub delete_href: String,
}

impl AdminRow {
    fn new(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            excerpt: truncate(&recipe.description, ADMIN_EXCERPT_CHARS),
            image: image_url(
                recipe.primary_image.as_deref(),
                "https://via.placeholder.com/60x40",
            ),
            category: recipe.category.clone(),
            status: recipe.status.to_string(),
            published: recipe.is_published(),
            edit_href: format!("/admin/edit?id={}", urlencoding::encode(&recipe.id)),
            delete_href: format!("/admin/delete?id={}", urlencoding::encode(&recipe.id)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone)]
pub struct ExportView {
    pub recipe_count: usize,
    pub generated_at: String,
    pub hint: String,
}

impl ExportView {
    pub fn new(export: &Export) -> Self {
        Self {
            recipe_count: export.recipe_count,
            generated_at: export.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            hint: PUBLISH_HINT.to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminPage {
    pub notice: Option<Notice>,
    pub rows: Vec<AdminRow>,
    pub form_title: String,
    pub editing: bool,
    pub form: RecipeForm,
    pub categories: Vec<SelectOption>,
    pub statuses: Vec<SelectOption>,
    pub export: Option<ExportView>,
}

impl AdminPage {
    pub fn new(
        recipes: &[Recipe],
        form: &RecipeForm,
        form_title: &str,
        editing: bool,
        categories: &[String],
        export: Option<&Export>,
        notice: Option<Notice>,
    ) -> Self {
        let mut category_options: Vec<SelectOption> = categories
            .iter()
            .map(|c| SelectOption {
                value: c.clone(),
                selected: *c == form.category,
            })
            .collect();
        // Keep a record's category selectable even if it left the configured list
        if !form.category.is_empty() && !categories.contains(&form.category) {
            category_options.push(SelectOption {
                value: form.category.clone(),
                selected: true,
            });
        }

        let statuses = [Status::Draft, Status::Published]
            .iter()
            .map(|s| SelectOption {
                value: s.to_string(),
                selected: *s == form.status,
            })
            .collect();

        Self {
            notice,
            rows: recipes.iter().map(AdminRow::new).collect(),
            form_title: form_title.to_string(),
            editing,
            form: form.clone(),
            categories: category_options,
            statuses,
            export: export.map(ExportView::new),
        }
    }
}

#[derive(Template)]
#[template(path = "admin_delete.html")]
pub struct ConfirmDeletePage {
    pub id: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{fixtures, SecondaryImage};

    const PLACEHOLDER: &str = "placeholder.png";

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("abcdef", 3), "abc...");
        // Counts characters, not bytes
        assert_eq!(truncate("crème brûlée", 5), "crème...");
    }

    #[test]
    fn test_image_fallback() {
        assert_eq!(image_url(None, PLACEHOLDER), PLACEHOLDER);
        assert_eq!(image_url(Some("a.jpg"), PLACEHOLDER), "a.jpg");
    }

    #[test]
    fn test_home_page_published_only() {
        let catalog = Catalog::new(vec![
            fixtures::recipe("draft", "Hidden Draft", Status::Draft),
            fixtures::recipe("pub", "Visible Dish", Status::Published),
        ]);

        let html = HomePage {
            query: String::new(),
            featured: featured_card(&catalog, PLACEHOLDER),
            cards: grid_cards(&catalog, Some(6), PLACEHOLDER),
            categories: category_links(&catalog.categories(), ALL_CATEGORIES),
        }
        .render()
        .unwrap();

        assert!(html.contains("Visible Dish"));
        assert!(!html.contains("Hidden Draft"));
        assert!(!html.contains("No recipes found."));
    }

    #[test]
    fn test_empty_grid_message_and_no_featured() {
        let catalog = Catalog::new(vec![fixtures::recipe("d", "Draft", Status::Draft)]);
        assert!(featured_card(&catalog, PLACEHOLDER).is_none());

        let html = ListingPage {
            query: String::new(),
            category: ALL_CATEGORIES.to_string(),
            cards: grid_cards(&catalog, None, PLACEHOLDER),
            categories: category_links(&[], ALL_CATEGORIES),
        }
        .render()
        .unwrap();
        assert!(html.contains("No recipes found."));
    }

    #[test]
    fn test_render_is_idempotent() {
        let catalog = Catalog::new(vec![fixtures::recipe("a", "Alpha", Status::Published)]);
        let render = || {
            HomePage {
                query: String::new(),
                featured: featured_card(&catalog, PLACEHOLDER),
                cards: grid_cards(&catalog, Some(6), PLACEHOLDER),
                categories: Vec::new(),
            }
            .render()
            .unwrap()
        };
        assert_eq!(render(), render());
    }

    #[test]
    fn test_category_links_mark_active() {
        let links = category_links(&["desserts".to_string(), "snacks".to_string()], "snacks");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].label, "all");
        assert!(!links[0].active);
        assert!(links[2].active);
        assert_eq!(links[1].href, "/recipes?category=desserts");
    }

    #[test]
    fn test_detail_pairs_step_images() {
        let mut recipe = fixtures::recipe("a", "Alpha", Status::Published);
        recipe.instructions.push(crate::models::Instruction {
            step: 2,
            text: "Serve".to_string(),
        });
        recipe.secondary_images = vec![SecondaryImage {
            step: 2,
            url: "plating.jpg".to_string(),
            description: "Plating".to_string(),
        }];

        let page = DetailPage::new(&recipe, "http://localhost/recipe?id=a", PLACEHOLDER);
        assert!(page.steps[0].image.is_none());
        assert_eq!(page.steps[1].image.as_ref().unwrap().url, "plating.jpg");
        assert!(page.share_facebook.contains("http%3A%2F%2Flocalhost"));

        let html = page.render().unwrap();
        assert!(html.contains("Step 2"));
        assert!(html.contains("Plating"));
    }

    #[test]
    fn test_user_text_is_escaped() {
        let mut recipe = fixtures::recipe("x", "<script>alert(1)</script>", Status::Published);
        recipe.description = "Tasty".to_string();
        let html = DetailPage::new(&recipe, "http://localhost", PLACEHOLDER)
            .render()
            .unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_admin_page_edit_mode() {
        let recipe = fixtures::recipe("a", "Alpha", Status::Published);
        let form = RecipeForm::from_recipe(&recipe);
        let page = AdminPage::new(
            &[recipe],
            &form,
            "Edit Recipe",
            true,
            &["desserts".to_string()],
            None,
            Some(Notice::error("Recipe ID already exists.")),
        );

        // Fixture category is not configured but stays selectable
        assert!(page.categories.iter().any(|c| c.value == "dinner" && c.selected));
        assert!(page.statuses.iter().any(|s| s.value == "published" && s.selected));

        let html = page.render().unwrap();
        assert!(html.contains("Edit Recipe"));
        assert!(html.contains("Recipe ID already exists."));
        assert!(html.contains("Alpha description"));
    }
}
