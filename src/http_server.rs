use axum::{
    extract::{Form, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use askama::Template;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::catalog::{Catalog, ALL_CATEGORIES};
use crate::editor::RecipeForm;
use crate::error::AppError;
use crate::export::Export;
use crate::loader;
use crate::models::Recipe;
use crate::render::{
    category_links, featured_card, grid_cards, AdminPage, ConfirmDeletePage, DetailPage,
    HomePage, ListingPage, LoginPage, NotFoundPage,
};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: String,
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    pub id: String,
    #[serde(default)]
    pub confirm: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    // The JSON feed is readable from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/recipes", get(listing))
        .route("/recipe", get(detail))
        .route("/api/recipes", get(api_recipes))
        .route("/api/health", get(health_check))
        .route("/admin", get(admin_page))
        .route("/admin/login", post(admin_login))
        .route("/admin/logout", post(admin_logout))
        .route("/admin/recipes", post(admin_submit))
        .route("/admin/edit", get(admin_edit))
        .route("/admin/reset", post(admin_reset))
        .route("/admin/delete", get(admin_confirm_delete).post(admin_delete))
        .route("/admin/export", get(admin_export))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl+C or SIGTERM
pub async fn start_server(state: Arc<AppState>) -> Result<(), Box<dyn std::error::Error>> {
    let address = state.config.address();
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    log::info!("HTTP server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        log::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Each public page load reads the bundled collection afresh
async fn load_catalog(state: &AppState) -> Catalog {
    Catalog::new(loader::load_static(&state.config.data_path).await)
}

/// Homepage: featured recipe plus a limited grid, optionally searched
async fn home(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQuery>,
) -> Result<Html<String>, AppError> {
    let placeholder = &state.config.placeholder_image;
    let mut catalog = load_catalog(&state).await;

    // Featured is picked before the search narrows the grid
    let featured = featured_card(&catalog, placeholder);
    catalog.search(&params.q);

    let page = HomePage {
        query: params.q.clone(),
        featured,
        cards: grid_cards(&catalog, Some(state.config.homepage_limit), placeholder),
        categories: category_links(&catalog.categories(), ALL_CATEGORIES),
    };

    Ok(Html(page.render()?))
}

/// Full listing. A non-blank query searches all published recipes and
/// takes precedence over the category filter.
async fn listing(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CatalogQuery>,
) -> Result<Html<String>, AppError> {
    let mut catalog = load_catalog(&state).await;

    let category = if params.q.trim().is_empty() {
        let category = params
            .category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| ALL_CATEGORIES.to_string());
        catalog.filter_by_category(&category);
        category
    } else {
        catalog.search(&params.q);
        ALL_CATEGORIES.to_string()
    };

    let page = ListingPage {
        query: params.q.clone(),
        cards: grid_cards(&catalog, None, &state.config.placeholder_image),
        categories: category_links(&catalog.categories(), &category),
        category,
    };

    Ok(Html(page.render()?))
}

async fn detail(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdQuery>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let catalog = load_catalog(&state).await;

    let Some(recipe) = catalog.find(&params.id) else {
        log::info!("Recipe not found: '{}'", params.id);
        let page = NotFoundPage { id: params.id };
        return Ok((StatusCode::NOT_FOUND, Html(page.render()?)).into_response());
    };

    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("localhost");
    let page_url = format!(
        "http://{}/recipe?id={}",
        host,
        urlencoding::encode(&recipe.id)
    );

    let page = DetailPage::new(recipe, &page_url, &state.config.placeholder_image);
    Ok(Html(page.render()?).into_response())
}

/// Published recipes as JSON
async fn api_recipes(State(state): State<Arc<AppState>>) -> Json<Vec<Recipe>> {
    let catalog = load_catalog(&state).await;
    Json(catalog.filtered().cloned().collect())
}

async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn to_admin() -> Response {
    Redirect::to("/admin").into_response()
}

async fn admin_page(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let mut panel = state.admin.lock().await;

    if !panel.is_unlocked() {
        let page = LoginPage {
            show_error: panel.gate().show_error(),
        };
        return Ok(Html(page.render()?));
    }

    let notice = panel.take_notice();
    let editor = panel.editor();
    let page = AdminPage::new(
        editor.recipes(),
        panel.form(),
        editor.form_title(),
        editor.editing().is_some(),
        &state.config.categories,
        panel.export(),
        notice,
    );

    Ok(Html(page.render()?))
}

async fn admin_login(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    let mut panel = state.admin.lock().await;
    panel.login(&form.password).await;
    to_admin()
}

async fn admin_logout(State(state): State<Arc<AppState>>) -> Response {
    state.admin.lock().await.logout();
    to_admin()
}

async fn admin_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RecipeForm>,
) -> Result<Response, AppError> {
    let mut panel = state.admin.lock().await;
    if panel.is_unlocked() {
        panel.submit(form).await?;
    }
    Ok(to_admin())
}

async fn admin_edit(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdQuery>,
) -> Response {
    let mut panel = state.admin.lock().await;
    if panel.is_unlocked() && !panel.edit(&params.id) {
        log::debug!("Edit requested for unknown recipe '{}'", params.id);
    }
    to_admin()
}

async fn admin_reset(State(state): State<Arc<AppState>>) -> Response {
    let mut panel = state.admin.lock().await;
    if panel.is_unlocked() {
        panel.reset_form();
    }
    to_admin()
}

/// Confirmation step in front of every delete
async fn admin_confirm_delete(
    State(state): State<Arc<AppState>>,
    Query(params): Query<IdQuery>,
) -> Result<Response, AppError> {
    let panel = state.admin.lock().await;
    if !panel.is_unlocked() {
        return Ok(to_admin());
    }

    match panel.editor().find(&params.id) {
        Some(recipe) => {
            let page = ConfirmDeletePage {
                id: recipe.id.clone(),
                title: recipe.title.clone(),
            };
            Ok(Html(page.render()?).into_response())
        }
        None => Ok(to_admin()),
    }
}

async fn admin_delete(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DeleteForm>,
) -> Result<Response, AppError> {
    let mut panel = state.admin.lock().await;
    if panel.is_unlocked() {
        panel.delete(&form.id, form.confirm == "yes").await?;
    }
    Ok(to_admin())
}

/// Download the full collection as recipes.json
async fn admin_export(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let panel = state.admin.lock().await;
    if !panel.is_unlocked() {
        return Ok(to_admin());
    }

    let export = match panel.export() {
        Some(export) => export.clone(),
        None => Export::from_recipes(panel.editor().recipes()).map_err(anyhow::Error::from)?,
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, export.content_disposition()),
        ],
        export.body,
    )
        .into_response())
}
