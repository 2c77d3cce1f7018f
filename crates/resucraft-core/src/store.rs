// SPDX-License-Identifier: AGPL-3.0
// ResuCraft Core - Client state store
//
// Process-wide source of truth for user, resume, application and
// interview data. State lives in memory and is snapshotted to a local
// JSON file on every mutation; the active-resume pointer and the
// sidebar flag are ephemeral and stay out of the snapshot.

use crate::types::{
    AppError, ApplicationUpdate, InterviewSession, JobApplication, Resume, ResumeUpdate, UiState,
    User,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::broadcast;

/// Change notification sent to subscribers after each mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    UserChanged,
    AuthChanged,
    ResumesChanged,
    ActiveResumeChanged,
    ApplicationsChanged,
    SessionsChanged,
    UiChanged,
}

/// Full in-memory state. The active resume is tracked by id so the
/// resume collection stays the single source of truth.
#[derive(Debug, Clone, Default)]
struct StoreState {
    user: Option<User>,
    authenticated: bool,
    resumes: Vec<Resume>,
    active_resume_id: Option<String>,
    applications: Vec<JobApplication>,
    interview_sessions: Vec<InterviewSession>,
    ui: UiState,
}

/// The subset of state written to the snapshot file
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    user: Option<User>,
    is_authenticated: bool,
    resumes: Vec<Resume>,
    applications: Vec<JobApplication>,
    interview_sessions: Vec<InterviewSession>,
    dark_mode: bool,
}

impl PersistedState {
    fn project(state: &StoreState) -> Self {
        Self {
            user: state.user.clone(),
            is_authenticated: state.authenticated,
            resumes: state.resumes.clone(),
            applications: state.applications.clone(),
            interview_sessions: state.interview_sessions.clone(),
            dark_mode: state.ui.dark_mode,
        }
    }

    fn restore(self) -> StoreState {
        StoreState {
            user: self.user,
            authenticated: self.is_authenticated,
            resumes: self.resumes,
            active_resume_id: None,
            applications: self.applications,
            interview_sessions: self.interview_sessions,
            ui: UiState {
                dark_mode: self.dark_mode,
                ..UiState::default()
            },
        }
    }
}

/// Reactive client state container, persisted to a local JSON file
pub struct ClientStore {
    state: RwLock<StoreState>,
    file_path: PathBuf,
    changes: broadcast::Sender<StoreChange>,
}

impl ClientStore {
    /// Create a store backed by the given snapshot file, rehydrating
    /// from it if present
    pub fn open(path: &Path) -> Result<Self, AppError> {
        let state = if path.exists() {
            let content = fs::read_to_string(path)
                .map_err(|e| AppError::FileIo(format!("Failed to read snapshot: {}", e)))?;

            serde_json::from_str::<PersistedState>(&content)
                .map(PersistedState::restore)
                .unwrap_or_else(|e| {
                    tracing::warn!("Failed to parse snapshot, starting fresh: {}", e);
                    StoreState::default()
                })
        } else {
            StoreState::default()
        };

        let (changes, _) = broadcast::channel(64);

        Ok(Self {
            state: RwLock::new(state),
            file_path: path.to_path_buf(),
            changes,
        })
    }

    /// Create a store backed by the default snapshot location
    pub fn from_default_location() -> Result<Self, AppError> {
        Self::open(&Self::default_snapshot_path()?)
    }

    /// Get the default path to the snapshot file
    fn default_snapshot_path() -> Result<PathBuf, AppError> {
        let config_dir = directories::ProjectDirs::from("com", "resucraft", "resucraft")
            .ok_or_else(|| AppError::FileIo("Could not determine config directory".to_string()))?
            .config_dir()
            .to_path_buf();

        // Ensure the directory exists
        fs::create_dir_all(&config_dir)
            .map_err(|e| AppError::FileIo(format!("Failed to create config dir: {}", e)))?;

        Ok(config_dir.join("resucraft-storage.json"))
    }

    /// Subscribe to change notifications. Each mutation sends exactly
    /// one event after the write completes; lagging receivers never
    /// block a mutation.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }

    /// Write the persisted projection to disk
    fn persist(&self) -> Result<(), AppError> {
        let snapshot = PersistedState::project(&self.state.read().unwrap());

        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| AppError::Serialization(format!("Failed to serialize snapshot: {}", e)))?;

        fs::write(&self.file_path, content)
            .map_err(|e| AppError::FileIo(format!("Failed to write snapshot: {}", e)))?;

        Ok(())
    }

    fn notify(&self, change: StoreChange) {
        // Send fails only when no subscriber is listening
        let _ = self.changes.send(change);
    }

    // --- Read access (cloned snapshots) ---

    pub fn user(&self) -> Option<User> {
        self.state.read().unwrap().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().unwrap().authenticated
    }

    pub fn resumes(&self) -> Vec<Resume> {
        self.state.read().unwrap().resumes.clone()
    }

    /// Resolve the active pointer against the collection
    pub fn active_resume(&self) -> Option<Resume> {
        let state = self.state.read().unwrap();
        let id = state.active_resume_id.as_deref()?;
        state.resumes.iter().find(|r| r.id == id).cloned()
    }

    pub fn active_resume_id(&self) -> Option<String> {
        self.state.read().unwrap().active_resume_id.clone()
    }

    pub fn applications(&self) -> Vec<JobApplication> {
        self.state.read().unwrap().applications.clone()
    }

    pub fn interview_sessions(&self) -> Vec<InterviewSession> {
        self.state.read().unwrap().interview_sessions.clone()
    }

    pub fn ui(&self) -> UiState {
        self.state.read().unwrap().ui.clone()
    }

    // --- Mutation actions ---

    /// Replace the user profile
    pub fn set_user(&self, user: Option<User>) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.user = user;
        }
        self.notify(StoreChange::UserChanged);
        self.persist()
    }

    /// Replace the authentication flag
    pub fn set_authenticated(&self, authenticated: bool) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.authenticated = authenticated;
        }
        self.notify(StoreChange::AuthChanged);
        self.persist()
    }

    /// Append a resume. Supplying a unique id is the caller's
    /// responsibility.
    pub fn add_resume(&self, resume: Resume) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.resumes.push(resume);
        }
        self.notify(StoreChange::ResumesChanged);
        self.persist()
    }

    /// Shallow-merge a partial update into the matching resume.
    /// Unknown ids are a no-op.
    pub fn update_resume(&self, id: &str, update: ResumeUpdate) -> Result<(), AppError> {
        let found = {
            let mut state = self.state.write().unwrap();
            match state.resumes.iter_mut().find(|r| r.id == id) {
                Some(resume) => {
                    if let Some(title) = update.title {
                        resume.title = title;
                    }
                    if let Some(template) = update.template {
                        resume.template = template;
                    }
                    if let Some(content) = update.content {
                        resume.content = content;
                    }
                    if let Some(ats_score) = update.ats_score {
                        resume.ats_score = ats_score;
                    }
                    if let Some(last_modified) = update.last_modified {
                        resume.last_modified = last_modified;
                    }
                    if let Some(is_public) = update.is_public {
                        resume.is_public = is_public;
                    }
                    true
                }
                None => false,
            }
        };

        if !found {
            tracing::debug!("update_resume: no resume with id {}", id);
            return Ok(());
        }

        self.notify(StoreChange::ResumesChanged);
        self.persist()
    }

    /// Remove the matching resume, clearing the active pointer if it
    /// referenced the removed entity. Unknown ids are a no-op.
    pub fn delete_resume(&self, id: &str) -> Result<(), AppError> {
        let removed = {
            let mut state = self.state.write().unwrap();
            let original_len = state.resumes.len();
            state.resumes.retain(|r| r.id != id);

            if state.resumes.len() == original_len {
                false
            } else {
                if state.active_resume_id.as_deref() == Some(id) {
                    state.active_resume_id = None;
                }
                true
            }
        };

        if !removed {
            tracing::debug!("delete_resume: no resume with id {}", id);
            return Ok(());
        }

        self.notify(StoreChange::ResumesChanged);
        self.persist()
    }

    /// Replace the whole resume collection, keeping the active pointer
    /// only if it still resolves
    pub fn replace_resumes(&self, resumes: Vec<Resume>) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            if let Some(active) = state.active_resume_id.clone() {
                if !resumes.iter().any(|r| r.id == active) {
                    state.active_resume_id = None;
                }
            }
            state.resumes = resumes;
        }
        self.notify(StoreChange::ResumesChanged);
        self.persist()
    }

    /// Replace the active pointer. The id must reference a resume in
    /// the collection or be `None`; that is the caller's
    /// responsibility.
    pub fn set_active_resume(&self, id: Option<String>) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.active_resume_id = id;
        }
        self.notify(StoreChange::ActiveResumeChanged);
        self.persist()
    }

    /// Append a job application
    pub fn add_application(&self, application: JobApplication) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.applications.push(application);
        }
        self.notify(StoreChange::ApplicationsChanged);
        self.persist()
    }

    /// Shallow-merge a partial update into the matching application.
    /// Unknown ids are a no-op. Status transitions are not validated.
    pub fn update_application(&self, id: &str, update: ApplicationUpdate) -> Result<(), AppError> {
        let found = {
            let mut state = self.state.write().unwrap();
            match state.applications.iter_mut().find(|a| a.id == id) {
                Some(application) => {
                    if let Some(company) = update.company {
                        application.company = company;
                    }
                    if let Some(position) = update.position {
                        application.position = position;
                    }
                    if let Some(status) = update.status {
                        tracing::debug!(
                            "application {} status: {:?} -> {:?}",
                            id,
                            application.status,
                            status
                        );
                        application.status = status;
                    }
                    if let Some(applied_date) = update.applied_date {
                        application.applied_date = applied_date;
                    }
                    if let Some(match_score) = update.match_score {
                        application.match_score = match_score;
                    }
                    true
                }
                None => false,
            }
        };

        if !found {
            tracing::debug!("update_application: no application with id {}", id);
            return Ok(());
        }

        self.notify(StoreChange::ApplicationsChanged);
        self.persist()
    }

    /// Append a completed interview session. Sessions are never
    /// mutated or removed afterwards.
    pub fn add_interview_session(&self, session: InterviewSession) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.interview_sessions.push(session);
        }
        self.notify(StoreChange::SessionsChanged);
        self.persist()
    }

    /// Flip the dark-mode flag
    pub fn toggle_dark_mode(&self) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.ui.dark_mode = !state.ui.dark_mode;
        }
        self.notify(StoreChange::UiChanged);
        self.persist()
    }

    /// Flip the sidebar flag
    pub fn toggle_sidebar(&self) -> Result<(), AppError> {
        {
            let mut state = self.state.write().unwrap();
            state.ui.sidebar_open = !state.ui.sidebar_open;
        }
        self.notify(StoreChange::UiChanged);
        self.persist()
    }
}
