use crate::config::AppConfig;
use crate::editor::{Editor, RecipeForm};
use crate::export::Export;
use crate::gate::{AccessGate, GateEvent};
use crate::loader;
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-shot alert shown on the next admin page render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

/// The admin side of the site: gate, editor, local store and latest export
pub struct AdminPanel {
    gate: AccessGate,
    editor: Editor,
    form: RecipeForm,
    store_path: PathBuf,
    data_path: PathBuf,
    export: Option<Export>,
    notice: Option<Notice>,
}

impl AdminPanel {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            gate: AccessGate::new(config.admin_secret.clone()),
            editor: Editor::default(),
            form: RecipeForm::default(),
            store_path: config.store_path.clone(),
            data_path: config.data_path.clone(),
            export: None,
            notice: None,
        }
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn is_unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// Current contents of the recipe form
    pub fn form(&self) -> &RecipeForm {
        &self.form
    }

    pub fn export(&self) -> Option<&Export> {
        self.export.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Submit the password. Unlocking (re)loads the collection, local copy first.
    pub async fn login(&mut self, password: &str) -> GateEvent {
        let event = self.gate.submit(password);
        if event == GateEvent::Unlocked {
            let recipes = loader::load_with_override(&self.store_path, &self.data_path).await;
            self.editor = Editor::new(recipes);
            self.form = RecipeForm::default();
        }
        event
    }

    pub fn logout(&mut self) {
        self.gate.logout();
        self.editor.reset();
        self.form = RecipeForm::default();
        self.notice = None;
    }

    /// Create or update depending on edit mode. A rejected submit keeps the
    /// form contents and leaves an error notice; store failures are returned.
    /// The in-memory collection only changes once the store write succeeded.
    pub async fn submit(&mut self, form: RecipeForm) -> Result<()> {
        let updating = self.editor.editing().is_some();
        let mut next = self.editor.clone();

        if let Err(e) = next.submit(form.clone()) {
            log::warn!("Recipe submit rejected: {}", e);
            self.form = form;
            self.notice = Some(Notice::error(e.to_string()));
            return Ok(());
        }

        if let Err(e) = self.commit(next).await {
            log::error!("Failed to save recipe: {:#}", e);
            self.form = form;
            self.notice = Some(Notice::error("Could not save to local storage"));
            return Err(e);
        }

        self.form = RecipeForm::default();
        self.notice = Some(Notice::success(if updating {
            "Recipe updated successfully!"
        } else {
            "Recipe added successfully!"
        }));
        Ok(())
    }

    /// Load a recipe into the form. Unknown ids leave the form as is.
    pub fn edit(&mut self, id: &str) -> bool {
        match self.editor.edit(id) {
            Some(form) => {
                self.form = form;
                true
            }
            None => false,
        }
    }

    pub fn reset_form(&mut self) {
        self.editor.reset();
        self.form = RecipeForm::default();
    }

    /// Delete after the operator confirmed; an unconfirmed request changes nothing
    pub async fn delete(&mut self, id: &str, confirmed: bool) -> Result<()> {
        if !confirmed {
            log::debug!("Delete of '{}' not confirmed", id);
            return Ok(());
        }

        let mut next = self.editor.clone();
        if let Err(e) = next.delete(id) {
            log::warn!("Recipe delete rejected: {}", e);
            self.notice = Some(Notice::error(e.to_string()));
            return Ok(());
        }

        if let Err(e) = self.commit(next).await {
            log::error!("Failed to delete recipe '{}': {:#}", id, e);
            self.notice = Some(Notice::error("Could not save to local storage"));
            return Err(e);
        }

        if self.editor.editing().is_none() && self.form.id == id {
            self.form = RecipeForm::default();
        }
        self.notice = Some(Notice::success("Recipe deleted successfully!"));
        Ok(())
    }

    /// Write `next` to the local store, then adopt it along with a fresh export.
    /// On failure the current editor and export are left as they were.
    async fn commit(&mut self, next: Editor) -> Result<()> {
        let export = Export::from_recipes(next.recipes()).context("Failed to serialize export")?;
        let recipes = next.recipes().to_vec();
        let store_path = self.store_path.clone();

        tokio::task::spawn_blocking(move || loader::save_override(&store_path, &recipes))
            .await
            .context("Local store task panicked")??;

        log::info!("Saved {} recipes; export refreshed", export.recipe_count);
        self.editor = next;
        self.export = Some(export);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::{fixtures, Recipe, Status};
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn setup() -> (TempDir, AppConfig) {
        let dir = tempdir().unwrap();
        let config = AppConfig {
            data_path: dir.path().join("recipes.json"),
            store_path: dir.path().join("local.db"),
            admin_secret: "letmein".to_string(),
            ..AppConfig::default()
        };

        let recipes = vec![
            fixtures::recipe("a", "Alpha", Status::Published),
            fixtures::recipe("b", "Beta", Status::Draft),
        ];
        std::fs::write(&config.data_path, serde_json::to_string(&recipes).unwrap()).unwrap();
        db::init_database(&config.store_path).unwrap();

        (dir, config)
    }

    fn stored(store_path: &Path) -> Vec<Recipe> {
        let raw = db::get_item(store_path, db::RECIPES_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn new_form(id: &str) -> RecipeForm {
        RecipeForm {
            id: id.to_string(),
            title: "Fresh".to_string(),
            instructions: "Mix\n\nBake".to_string(),
            tags: "a, b,,  c ".to_string(),
            status: Status::Published,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_login_loads_collection() {
        let (_dir, config) = setup();
        let mut panel = AdminPanel::new(&config);

        assert_eq!(panel.login("wrong").await, GateEvent::Rejected);
        assert!(panel.editor().recipes().is_empty());
        assert!(panel.gate().show_error());

        assert_eq!(panel.login("letmein").await, GateEvent::Unlocked);
        assert_eq!(panel.editor().recipes().len(), 2);
    }

    #[tokio::test]
    async fn test_create_persists_and_exports() {
        let (_dir, config) = setup();
        let mut panel = AdminPanel::new(&config);
        panel.login("letmein").await;

        panel.submit(new_form("c")).await.unwrap();

        let notice = panel.take_notice().unwrap();
        assert_eq!(notice.message, "Recipe added successfully!");
        assert!(panel.take_notice().is_none());

        let saved = stored(&config.store_path);
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[2].tags, vec!["a", "b", "c"]);
        assert_eq!(saved[2].instructions[1].step, 2);

        let export = panel.export().unwrap();
        assert_eq!(export.recipe_count, 3);
        assert_eq!(panel.form(), &RecipeForm::default());
    }

    #[tokio::test]
    async fn test_duplicate_keeps_form_and_store() {
        let (_dir, config) = setup();
        let mut panel = AdminPanel::new(&config);
        panel.login("letmein").await;

        panel.submit(new_form("a")).await.unwrap();

        let notice = panel.take_notice().unwrap();
        assert!(notice.is_error());
        assert_eq!(panel.form().id, "a");
        assert_eq!(panel.editor().recipes().len(), 2);
        assert!(db::get_item(&config.store_path, db::RECIPES_KEY).unwrap().is_none());
        assert!(panel.export().is_none());
    }

    #[tokio::test]
    async fn test_edit_then_update() {
        let (_dir, config) = setup();
        let mut panel = AdminPanel::new(&config);
        panel.login("letmein").await;

        assert!(panel.edit("b"));
        let mut form = panel.form().clone();
        form.status = Status::Published;
        panel.submit(form).await.unwrap();

        assert_eq!(panel.take_notice().unwrap().message, "Recipe updated successfully!");
        assert_eq!(panel.editor().editing(), None);
        assert!(stored(&config.store_path)[1].is_published());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let (_dir, config) = setup();
        let mut panel = AdminPanel::new(&config);
        panel.login("letmein").await;

        panel.delete("a", false).await.unwrap();
        assert_eq!(panel.editor().recipes().len(), 2);
        assert!(panel.take_notice().is_none());

        panel.delete("a", true).await.unwrap();
        assert_eq!(panel.editor().recipes().len(), 1);
        assert_eq!(stored(&config.store_path).len(), 1);

        panel.delete("zzz", true).await.unwrap();
        assert!(panel.take_notice().unwrap().is_error());
        assert_eq!(panel.editor().recipes().len(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_collection_unchanged() {
        let (_dir, config) = setup();
        let mut panel = AdminPanel::new(&config);
        panel.login("letmein").await;

        let conn = rusqlite::Connection::open(&config.store_path).unwrap();
        conn.execute("DROP TABLE local_storage", []).unwrap();
        drop(conn);

        assert!(panel.submit(new_form("c")).await.is_err());
        assert!(panel.take_notice().unwrap().is_error());
        assert_eq!(panel.form().id, "c");
        assert_eq!(panel.editor().recipes().len(), 2);
        assert!(panel.export().is_none());

        assert!(panel.delete("a", true).await.is_err());
        assert!(panel.take_notice().unwrap().is_error());
        let ids: Vec<_> = panel.editor().recipes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(panel.export().is_none());
    }

    #[tokio::test]
    async fn test_relogin_prefers_local_copy() {
        let (_dir, config) = setup();
        let mut panel = AdminPanel::new(&config);
        panel.login("letmein").await;
        panel.delete("b", true).await.unwrap();

        panel.logout();
        assert!(!panel.is_unlocked());
        assert_eq!(panel.gate().input(), "");

        panel.login("letmein").await;
        assert_eq!(panel.editor().recipes().len(), 1);
    }
}
