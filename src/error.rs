use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure reading the recipe collection
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed recipe data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Local store unavailable: {0}")]
    Store(#[from] anyhow::Error),
}

/// Rejected admin mutation. The collection is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Recipe ID already exists. Please use a different ID.")]
    DuplicateId(String),

    #[error("Recipe '{0}' was not found")]
    NotFound(String),

    #[error("No recipe is being edited")]
    NoActiveEdit,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        log::error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
