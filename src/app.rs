//! View state core: screen transitions, forms and store mutations, with no
//! rendering concerns. The TUI layer draws this state and feeds key events
//! and generation results back into it.

use chrono::Utc;

use crate::generate::GenerateResult;
use crate::project::{MANUAL_MODEL_TAG, Project};
use crate::store::ProjectStore;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Compose,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ComposeField {
    Name,
    Description,
    ManualPrd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditField {
    Name,
    Description,
}

pub struct ComposeForm {
    pub name: String,
    pub description: String,
    pub manual_prd: String,
    pub ai_mode: bool,
    pub field: ComposeField,
    pub error: Option<String>,
}

impl ComposeForm {
    fn new(ai_mode: bool) -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            manual_prd: String::new(),
            ai_mode,
            field: ComposeField::Name,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.field = match (self.field, self.ai_mode) {
            (ComposeField::Name, _) => ComposeField::Description,
            (ComposeField::Description, true) => ComposeField::Name,
            (ComposeField::Description, false) => ComposeField::ManualPrd,
            (ComposeField::ManualPrd, _) => ComposeField::Name,
        };
    }

    pub fn active_buffer(&mut self) -> &mut String {
        match self.field {
            ComposeField::Name => &mut self.name,
            ComposeField::Description => &mut self.description,
            ComposeField::ManualPrd => &mut self.manual_prd,
        }
    }
}

pub struct EditForm {
    pub name: String,
    pub description: String,
    pub field: EditField,
    pub error: Option<String>,
}

impl EditForm {
    pub fn next_field(&mut self) {
        self.field = match self.field {
            EditField::Name => EditField::Description,
            EditField::Description => EditField::Name,
        };
    }

    pub fn active_buffer(&mut self) -> &mut String {
        match self.field {
            EditField::Name => &mut self.name,
            EditField::Description => &mut self.description,
        }
    }
}

/// Inputs for one generation workflow run, handed to the caller so it can
/// drive the async workflow outside the core.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub name: String,
    pub description: String,
}

pub struct App {
    pub store: ProjectStore,
    model_tag: String,
    ai_available: bool,

    pub view: View,
    pub selected_id: Option<String>,
    pub dashboard_index: usize,
    pub compose: ComposeForm,
    pub generating: bool,
    pub edit: Option<EditForm>,
    pub confirm_delete: bool,
    pub detail_scroll: u16,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(store: ProjectStore, model_tag: String, ai_available: bool) -> Self {
        Self {
            store,
            model_tag,
            ai_available,
            view: View::Dashboard,
            selected_id: None,
            dashboard_index: 0,
            compose: ComposeForm::new(ai_available),
            generating: false,
            edit: None,
            confirm_delete: false,
            detail_scroll: 0,
            status: None,
            should_quit: false,
        }
    }

    pub fn ai_available(&self) -> bool {
        self.ai_available
    }

    // ── Dashboard ───────────────────────────────────────────────

    pub fn dashboard_up(&mut self) {
        self.dashboard_index = self.dashboard_index.saturating_sub(1);
    }

    pub fn dashboard_down(&mut self) {
        if !self.store.is_empty() && self.dashboard_index < self.store.len() - 1 {
            self.dashboard_index += 1;
        }
    }

    pub fn open_selected(&mut self) {
        let Some(project) = self.store.projects().get(self.dashboard_index) else {
            return;
        };
        let id = project.id.clone();
        self.select_project(&id);
    }

    pub fn select_project(&mut self, id: &str) {
        if self.store.get(id).is_none() {
            return;
        }
        self.selected_id = Some(id.to_string());
        self.view = View::Detail;
        self.edit = None;
        self.confirm_delete = false;
        self.detail_scroll = 0;
        self.status = None;
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_id.as_deref().and_then(|id| self.store.get(id))
    }

    // ── Compose ─────────────────────────────────────────────────

    pub fn open_compose(&mut self) {
        self.compose = ComposeForm::new(self.ai_available);
        self.view = View::Compose;
        self.status = None;
    }

    /// Cancel is ignored while a generation is in flight.
    pub fn cancel_compose(&mut self) {
        if self.generating {
            return;
        }
        self.view = View::Dashboard;
        self.compose = ComposeForm::new(self.ai_available);
    }

    pub fn toggle_compose_mode(&mut self) {
        if self.generating {
            return;
        }
        self.compose.ai_mode = !self.compose.ai_mode;
        if self.compose.field == ComposeField::ManualPrd && self.compose.ai_mode {
            self.compose.field = ComposeField::Description;
        }
    }

    /// Validates the form and either creates a manual record immediately or
    /// returns the inputs for an AI generation run. Re-submission while a
    /// run is pending is ignored.
    pub fn submit_compose(&mut self) -> Option<GenerationRequest> {
        if self.generating {
            return None;
        }

        let name = self.compose.name.trim().to_string();
        let description = self.compose.description.trim().to_string();
        if name.is_empty() || description.is_empty() {
            self.compose.error =
                Some("Please fill in both the name and the description.".to_string());
            return None;
        }

        if !self.compose.ai_mode {
            self.create_manual(name, description);
            return None;
        }

        if !self.ai_available {
            self.compose.error = Some(
                "GEMINI_API_KEY is not set. Switch to manual mode or configure a key."
                    .to_string(),
            );
            return None;
        }

        self.compose.error = None;
        self.generating = true;
        Some(GenerationRequest { name, description })
    }

    fn create_manual(&mut self, name: String, description: String) {
        let prd = self.compose.manual_prd.trim();
        let full_prd = if prd.is_empty() {
            description.clone()
        } else {
            prd.to_string()
        };

        let project = Project {
            id: self.store.next_id(),
            name,
            description,
            full_prd,
            image_url: None,
            created_at: Utc::now().timestamp_millis(),
            model_used: MANUAL_MODEL_TAG.to_string(),
        };
        self.insert_and_view(project);
    }

    /// Delivers the outcome of a spawned generation run. An error is the
    /// generic "creation failed" path: nothing is persisted, the form stays
    /// up for a retry.
    pub fn finish_generation(&mut self, result: Result<GenerateResult, String>) {
        self.generating = false;

        let generated = match result {
            Ok(generated) => generated,
            Err(e) => {
                tracing::error!(error = %e, "Generation workflow failed");
                self.compose.error =
                    Some("Failed to generate the project. Please try again.".to_string());
                return;
            }
        };

        let project = Project {
            id: self.store.next_id(),
            name: self.compose.name.trim().to_string(),
            description: self.compose.description.trim().to_string(),
            full_prd: generated.prd,
            image_url: generated.image_url,
            created_at: Utc::now().timestamp_millis(),
            model_used: self.model_tag.clone(),
        };
        self.insert_and_view(project);
    }

    fn insert_and_view(&mut self, project: Project) {
        let id = project.id.clone();
        if let Err(e) = self.store.add(project) {
            tracing::warn!(error = %e, "Failed to persist project store");
        }
        self.compose = ComposeForm::new(self.ai_available);
        self.dashboard_index = 0;
        self.select_project(&id);
    }

    // ── Detail ──────────────────────────────────────────────────

    pub fn back_to_dashboard(&mut self) {
        self.view = View::Dashboard;
        self.selected_id = None;
        self.edit = None;
        self.confirm_delete = false;
        self.detail_scroll = 0;
        self.clamp_dashboard_index();
    }

    pub fn start_edit(&mut self) {
        let Some(project) = self.selected_project() else {
            return;
        };
        self.edit = Some(EditForm {
            name: project.name.clone(),
            description: project.description.clone(),
            field: EditField::Name,
            error: None,
        });
        self.confirm_delete = false;
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    pub fn save_edit(&mut self) {
        let Some(id) = self.selected_id.clone() else {
            return;
        };
        let Some(edit) = self.edit.as_mut() else {
            return;
        };

        let name = edit.name.trim().to_string();
        let description = edit.description.trim().to_string();
        if name.is_empty() || description.is_empty() {
            edit.error = Some("Name and description cannot be empty.".to_string());
            return;
        }

        if let Err(e) = self.store.update(&id, &name, &description) {
            tracing::warn!(error = %e, "Failed to persist project store");
        }
        self.edit = None;
    }

    pub fn request_delete(&mut self) {
        if self.selected_id.is_some() {
            self.confirm_delete = true;
            self.edit = None;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.confirm_delete = false;
    }

    /// Removes the viewed record after confirmation and returns to the
    /// dashboard.
    pub fn confirm_delete_project(&mut self) {
        let Some(id) = self.selected_id.clone() else {
            return;
        };
        match self.store.remove(&id) {
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to persist project store"),
        }
        self.back_to_dashboard();
    }

    pub fn scroll_detail_up(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
    }

    pub fn scroll_detail_down(&mut self) {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    fn clamp_dashboard_index(&mut self) {
        if self.store.is_empty() {
            self.dashboard_index = 0;
        } else {
            self.dashboard_index = self.dashboard_index.min(self.store.len() - 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn test_app(dir: &std::path::Path, ai_available: bool) -> App {
        let store = ProjectStore::load(dir.join("projects.json"));
        App::new(store, "Gemini 2.5 Flash".to_string(), ai_available)
    }

    fn compose_inputs(app: &mut App, name: &str, description: &str) {
        app.open_compose();
        app.compose.name = name.to_string();
        app.compose.description = description.to_string();
    }

    #[test]
    fn test_manual_creation_selects_and_views_record() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.compose.manual_prd = "# My own PRD".to_string();
        assert!(app.submit_compose().is_none());

        assert_eq!(app.view, View::Detail);
        let project = app.selected_project().unwrap();
        assert_eq!(project.name, "FitTracker");
        assert_eq!(project.full_prd, "# My own PRD");
        assert!(project.image_url.is_none());
        assert_eq!(project.model_used, "Manual");
    }

    #[test]
    fn test_manual_blank_prd_falls_back_to_description() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.compose.manual_prd = "   ".to_string();
        app.submit_compose();

        assert_eq!(app.selected_project().unwrap().full_prd, "Track workouts");
    }

    #[test]
    fn test_validation_blocks_empty_fields() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "  ", "Track workouts");
        assert!(app.submit_compose().is_none());

        assert!(app.compose.error.is_some());
        assert_eq!(app.view, View::Compose);
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_ai_submit_returns_request_and_blocks_resubmission() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), true);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        let request = app.submit_compose().unwrap();
        assert_eq!(request.name, "FitTracker");
        assert!(app.generating);

        // Second submit while pending is ignored
        assert!(app.submit_compose().is_none());
        // So is cancelling out of the compose screen
        app.cancel_compose();
        assert_eq!(app.view, View::Compose);
    }

    #[test]
    fn test_ai_mode_without_key_is_rejected() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.compose.ai_mode = true;
        assert!(app.submit_compose().is_none());
        assert!(app.compose.error.as_deref().unwrap().contains("GEMINI_API_KEY"));
        assert!(!app.generating);
    }

    #[test]
    fn test_finish_generation_inserts_at_front_with_ai_tag() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), true);

        compose_inputs(&mut app, "Older", "Older idea");
        app.compose.ai_mode = false;
        app.submit_compose();
        app.back_to_dashboard();

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.submit_compose().unwrap();
        app.finish_generation(Ok(GenerateResult {
            prd: "# PRD...".to_string(),
            image_url: Some("data:image/png;base64,QUJD".to_string()),
        }));

        assert_eq!(app.view, View::Detail);
        let project = &app.store.projects()[0];
        assert_eq!(project.name, "FitTracker");
        assert_eq!(project.full_prd, "# PRD...");
        assert_eq!(
            project.image_url.as_deref(),
            Some("data:image/png;base64,QUJD")
        );
        assert_eq!(project.model_used, "Gemini 2.5 Flash");
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.projects()[1].name, "Older");
    }

    #[test]
    fn test_failed_generation_keeps_form_for_retry() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), true);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.submit_compose().unwrap();
        app.finish_generation(Err("task panicked".to_string()));

        assert!(!app.generating);
        assert_eq!(app.view, View::Compose);
        assert!(app.compose.error.is_some());
        assert_eq!(app.compose.name, "FitTracker");
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_edit_rejects_empty_fields() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.submit_compose();

        app.start_edit();
        app.edit.as_mut().unwrap().name = String::new();
        app.save_edit();

        assert!(app.edit.as_ref().unwrap().error.is_some());
        assert_eq!(app.selected_project().unwrap().name, "FitTracker");
    }

    #[test]
    fn test_edit_updates_only_name_and_description() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.compose.manual_prd = "# PRD".to_string();
        app.submit_compose();
        let created_at = app.selected_project().unwrap().created_at;

        app.start_edit();
        {
            let edit = app.edit.as_mut().unwrap();
            edit.name = "FitTracker Pro".to_string();
            edit.description = "Track more workouts".to_string();
        }
        app.save_edit();

        assert!(app.edit.is_none());
        let project = app.selected_project().unwrap();
        assert_eq!(project.name, "FitTracker Pro");
        assert_eq!(project.description, "Track more workouts");
        assert_eq!(project.full_prd, "# PRD");
        assert_eq!(project.created_at, created_at);
        assert!(project.image_url.is_none());
    }

    #[test]
    fn test_delete_requires_confirmation_and_clears_selection() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "FitTracker", "Track workouts");
        app.submit_compose();

        app.request_delete();
        assert!(app.confirm_delete);
        app.cancel_delete();
        assert!(!app.confirm_delete);
        assert_eq!(app.store.len(), 1);

        app.request_delete();
        app.confirm_delete_project();
        assert_eq!(app.view, View::Dashboard);
        assert!(app.selected_id.is_none());
        assert!(app.store.is_empty());
    }

    #[test]
    fn test_dashboard_navigation_clamps() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        compose_inputs(&mut app, "One", "First");
        app.submit_compose();
        app.back_to_dashboard();
        compose_inputs(&mut app, "Two", "Second");
        app.submit_compose();
        app.back_to_dashboard();

        app.dashboard_down();
        app.dashboard_down();
        assert_eq!(app.dashboard_index, 1);
        app.dashboard_up();
        app.dashboard_up();
        assert_eq!(app.dashboard_index, 0);

        app.dashboard_down();
        app.open_selected();
        assert_eq!(app.selected_project().unwrap().name, "One");
    }

    #[test]
    fn test_compose_cancel_returns_to_dashboard() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);

        app.open_compose();
        app.compose.name = "Draft".to_string();
        app.cancel_compose();

        assert_eq!(app.view, View::Dashboard);
        assert!(app.compose.name.is_empty());
    }

    #[test]
    fn test_compose_field_cycle_respects_mode() {
        let dir = tempdir().unwrap();
        let mut app = test_app(dir.path(), false);
        app.open_compose();

        // Manual mode cycles through the PRD field
        assert_eq!(app.compose.field, ComposeField::Name);
        app.compose.next_field();
        assert_eq!(app.compose.field, ComposeField::Description);
        app.compose.next_field();
        assert_eq!(app.compose.field, ComposeField::ManualPrd);
        app.compose.next_field();
        assert_eq!(app.compose.field, ComposeField::Name);

        // AI mode skips it, and toggling away from it refocuses
        app.compose.field = ComposeField::ManualPrd;
        app.toggle_compose_mode();
        assert!(app.compose.ai_mode);
        assert_eq!(app.compose.field, ComposeField::Description);
        app.compose.next_field();
        assert_eq!(app.compose.field, ComposeField::Name);
    }
}
