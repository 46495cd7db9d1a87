// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring form state, messages, and commands.
//!
//! The form moves Idle → Submitting on a valid submit and back to Idle when the
//! completion command reports in. Invalid submits stay Idle with field errors attached.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::components::avatar::{self, AvatarCommand, AvatarModel, AvatarMsg};
use crate::components::techs::{self, TechsModel, TechsMsg};
use crate::config::FormConfig;
use crate::models::avatar::FileHandle;
use crate::models::field_error::{FieldError, FieldErrors};
use crate::models::form::{FormInput, ValidForm, validate_form};
use crate::storage::{BlobStore, StoredBlob, object_key};

/// What happens to a valid form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompletionMode {
    /// Render the normalized data only.
    #[default]
    Print,
    /// Store the avatar in the bucket, then render.
    Upload,
}

/// Whether a submission is in flight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

/// Top-level form state.
#[derive(Default)]
pub struct FormModel {
    /// Validation limits and storage settings.
    pub config: FormConfig,
    pub mode: CompletionMode,
    pub name: String,
    pub email: String,
    pub password: String,
    /// Avatar picker state.
    pub avatar: AvatarModel,
    /// Technology rows.
    pub techs: TechsModel,
    pub phase: SubmitPhase,
    /// Per-field problems from the latest submit attempt.
    pub field_errors: FieldErrors,
    /// Rendered result of the latest successful submission.
    pub output: Option<String>,
    /// Receipt of the latest upload, if any.
    pub stored: Option<StoredBlob>,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl FormModel {
    pub fn new(config: FormConfig, mode: CompletionMode) -> Self {
        Self {
            config,
            mode,
            ..Default::default()
        }
    }

    /// Snapshot of the current raw field values.
    pub fn input(&self) -> FormInput {
        FormInput {
            avatar: self.avatar.files().to_vec(),
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
            techs: self.techs.list().entries(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }
}

/// Messages routed through the update function.
#[derive(Debug)]
pub enum Msg {
    NameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    Avatar(AvatarMsg),
    Techs(TechsMsg),
    SubmitRequested,
    SubmitCompleted(Result<Submission, String>),
    DismissError,
}

/// Commands represent side-effects executed outside `update`.
#[derive(Debug)]
pub enum Command {
    InspectAvatar { path: PathBuf },
    Submit(SubmitPayload),
}

/// Validated data plus what to do with it.
#[derive(Debug)]
pub struct SubmitPayload {
    pub form: ValidForm,
    pub mode: CompletionMode,
    /// Prefix for the avatar object key.
    pub key_prefix: String,
}

/// Outcome of a completed submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    /// Text block shown to the user.
    pub rendered: String,
    pub stored: Option<StoredBlob>,
}

/// Update the form model and enqueue commands.
pub fn update(model: &mut FormModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::NameChanged(text) => model.name = text,
        Msg::EmailChanged(text) => model.email = text,
        Msg::PasswordChanged(text) => model.password = text,
        Msg::DismissError => model.error = None,
        Msg::Avatar(m) => {
            let mut avatar_cmds = Vec::new();
            if let Some(event) = avatar::update(&mut model.avatar, m, &mut avatar_cmds) {
                surface_event(model, event.message, event.is_error);
            }
            for c in avatar_cmds {
                match c {
                    AvatarCommand::InspectFile { path } => {
                        cmds.push(Command::InspectAvatar { path })
                    }
                }
            }
        }
        Msg::Techs(m) => {
            if let Some(event) = techs::update(&mut model.techs, m) {
                surface_event(model, event.message, event.is_error);
            }
        }
        Msg::SubmitRequested => {
            if model.is_submitting() {
                log::warn!("submit ignored: a submission is already in progress");
                surface_event(model, "Submission already in progress.".to_string(), false);
                return;
            }
            model.output = None;
            model.stored = None;
            model.error = None;
            match validate_form(&model.input(), &model.config) {
                Ok(form) => {
                    model.field_errors = FieldErrors::default();
                    model.phase = SubmitPhase::Submitting;
                    cmds.push(Command::Submit(SubmitPayload {
                        form,
                        mode: model.mode,
                        key_prefix: model.config.storage.key_prefix.clone(),
                    }));
                    surface_event(model, "Submitting...".to_string(), false);
                }
                Err(mut errors) => {
                    if let Some(failure) = model.avatar.last_failure()
                        && errors.contains("avatar")
                    {
                        errors.push_front("avatar", FieldError::Format(failure.to_string()));
                    }
                    log::info!("submit rejected: {} field(s) invalid", errors.len());
                    let message =
                        format!("Please fix {} field(s) before submitting.", errors.len());
                    model.field_errors = errors;
                    surface_event(model, message, true);
                }
            }
        }
        Msg::SubmitCompleted(result) => {
            model.phase = SubmitPhase::Idle;
            match result {
                Ok(submission) => {
                    log::info!("submission completed");
                    model.error = None;
                    model.output = Some(submission.rendered);
                    model.stored = submission.stored;
                    surface_event(model, "Form submitted.".to_string(), false);
                }
                Err(err) => {
                    log::warn!("submission failed: {err}");
                    surface_event(model, format!("Failed to submit form:\n\n{err}"), true);
                }
            }
        }
    }
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command, store: &dyn BlobStore) -> Msg {
    match cmd {
        Command::InspectAvatar { path } => match FileHandle::from_path(&path) {
            Ok(handle) => Msg::Avatar(AvatarMsg::Inspected(handle)),
            Err(err) => Msg::Avatar(AvatarMsg::InspectFailed {
                path,
                error: format!("{err:#}"),
            }),
        },
        Command::Submit(payload) => {
            Msg::SubmitCompleted(complete_submission(payload, store).map_err(|e| format!("{e:#}")))
        }
    }
}

/// Store the avatar when uploading, then render the result.
fn complete_submission(payload: SubmitPayload, store: &dyn BlobStore) -> Result<Submission> {
    let stored = match payload.mode {
        CompletionMode::Print => None,
        CompletionMode::Upload => {
            let avatar = &payload.form.avatar;
            let key = object_key(&payload.key_prefix, &avatar.name);
            Some(store.store(&key, avatar)?)
        }
    };
    let rendered = render_submission(&payload.form, stored.as_ref())?;
    Ok(Submission { rendered, stored })
}

#[derive(Serialize)]
struct RenderedSubmission<'a> {
    #[serde(flatten)]
    form: &'a ValidForm,
    #[serde(skip_serializing_if = "Option::is_none")]
    stored: Option<&'a StoredBlob>,
}

/// Serialize the normalized form (and upload receipt) as pretty JSON.
pub fn render_submission(form: &ValidForm, stored: Option<&StoredBlob>) -> Result<String> {
    serde_json::to_string_pretty(&RenderedSubmission { form, stored })
        .context("Failed to render submission")
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut FormModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;
    use crate::storage::MemoryStore;
    use tempfile::TempDir;

    /// Fill the model with a valid form whose avatar lives in `dir`.
    fn fill_valid(model: &mut FormModel, dir: &TempDir, store: &MemoryStore) {
        let path = dir.path().join("Me Photo.png");
        std::fs::write(&path, b"png-bytes").unwrap();

        let mut cmds = Vec::new();
        update(model, Msg::NameChanged("  ada   lovelace".into()), &mut cmds);
        update(model, Msg::EmailChanged("Ada@Rocketseat.com.br".into()), &mut cmds);
        update(model, Msg::PasswordChanged("hunter22".into()), &mut cmds);
        update(model, Msg::Avatar(AvatarMsg::FilesPicked(vec![path])), &mut cmds);
        assert_eq!(cmds.len(), 1, "picking should enqueue an inspection");

        let msg = run_command(cmds.pop().unwrap(), store);
        update(model, msg, &mut cmds);
        assert!(cmds.is_empty());

        add_tech(model, "Rust", "90");
        add_tech(model, "SQL", "30");
    }

    fn add_tech(model: &mut FormModel, title: &str, knowledge: &str) {
        let mut cmds = Vec::new();
        let index = model.techs.list().len();
        update(model, Msg::Techs(TechsMsg::Append), &mut cmds);
        update(
            model,
            Msg::Techs(TechsMsg::TitleChanged {
                index,
                title: title.into(),
            }),
            &mut cmds,
        );
        update(
            model,
            Msg::Techs(TechsMsg::KnowledgeChanged {
                index,
                value: knowledge.into(),
            }),
            &mut cmds,
        );
        assert!(cmds.is_empty(), "tech edits should not enqueue commands");
    }

    #[test]
    fn valid_submit_prints_normalized_data() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut model = FormModel::default();
        fill_valid(&mut model, &tmp, &store);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        assert_eq!(model.phase, SubmitPhase::Submitting);
        assert_eq!(cmds.len(), 1);

        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut cmds);

        assert_eq!(model.phase, SubmitPhase::Idle);
        assert!(model.error.is_none());
        let output = model.output.as_deref().unwrap();
        assert!(output.contains("\"name\": \"Ada Lovelace\""));
        assert!(output.contains("ada@rocketseat.com.br"));
        assert!(!output.contains("hunter22"));
        assert!(store.keys().is_empty(), "print mode must not upload");
    }

    #[test]
    fn upload_mode_stores_avatar_under_prefixed_key() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut model = FormModel::new(FormConfig::default(), CompletionMode::Upload);
        fill_valid(&mut model, &tmp, &store);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut cmds);

        assert_eq!(store.keys(), vec!["images/Me_Photo.png".to_string()]);
        assert_eq!(model.stored.as_ref().map(|s| s.size), Some(9));
        assert!(model.output.as_deref().unwrap().contains("images/Me_Photo.png"));
    }

    #[test]
    fn resubmission_is_blocked_while_submitting() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut model = FormModel::default();
        fill_valid(&mut model, &tmp, &store);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert_eq!(cmds.len(), 1, "second submit must not enqueue");
        assert_eq!(
            model.status.as_deref(),
            Some("Submission already in progress.")
        );

        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut cmds);
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        assert_eq!(cmds.len(), 1, "submit is allowed again once resolved");
    }

    #[test]
    fn upload_failure_is_surfaced_and_unblocks() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::failing("bucket offline");
        let mut model = FormModel::new(FormConfig::default(), CompletionMode::Upload);
        fill_valid(&mut model, &tmp, &store);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut cmds);

        assert_eq!(model.phase, SubmitPhase::Idle);
        assert!(model.error.as_deref().unwrap().contains("bucket offline"));
        assert!(model.output.is_none());
    }

    #[test]
    fn invalid_submit_attaches_field_errors() {
        let mut model = FormModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert!(cmds.is_empty());
        assert_eq!(model.phase, SubmitPhase::Idle);
        assert!(model.error.is_some());
        assert!(model.field_errors.contains("avatar"));
        assert!(model.field_errors.contains("name"));
        assert!(model.field_errors.contains("techs"));
    }

    #[test]
    fn removing_down_to_one_reproduces_minimum_count_failure() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut model = FormModel::default();
        fill_valid(&mut model, &tmp, &store);

        let mut cmds = Vec::new();
        update(&mut model, Msg::Techs(TechsMsg::Remove(1)), &mut cmds);
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert!(cmds.is_empty());
        assert_eq!(
            model.field_errors.get("techs"),
            &[FieldError::CollectionSize { min: 2 }]
        );
    }

    #[test]
    fn appended_default_row_fails_row_rules() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut model = FormModel::default();
        fill_valid(&mut model, &tmp, &store);

        let mut cmds = Vec::new();
        update(&mut model, Msg::Techs(TechsMsg::Append), &mut cmds);
        update(&mut model, Msg::SubmitRequested, &mut cmds);

        assert!(cmds.is_empty());
        assert!(model.field_errors.contains("techs.2.title"));
        assert!(model.field_errors.contains("techs.2.knowledge"));
        assert!(!model.field_errors.contains("techs"));
    }

    #[test]
    fn missing_avatar_file_reports_inspection_error() {
        let store = MemoryStore::new();
        let mut model = FormModel::default();
        let mut cmds = Vec::new();

        update(
            &mut model,
            Msg::Avatar(AvatarMsg::FilesPicked(vec![PathBuf::from("/nope/me.png")])),
            &mut cmds,
        );
        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut cmds);

        assert!(model.avatar.files().is_empty());
        assert!(model.error.as_deref().unwrap().contains("/nope/me.png"));

        update(&mut model, Msg::SubmitRequested, &mut cmds);
        let shown = model.field_errors.message("avatar").unwrap();
        assert!(shown.starts_with("Could not read /nope/me.png"), "{shown}");
        assert!(
            model
                .field_errors
                .get("avatar")
                .contains(&FieldError::Required { label: "Avatar" })
        );
    }

    #[test]
    fn earlier_results_are_cleared_on_each_submit() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut model = FormModel::default();
        let mut cmds = Vec::new();

        update(&mut model, Msg::SubmitRequested, &mut cmds);
        assert!(model.output.is_none());
        assert!(model.error.is_some());
        assert!(!model.field_errors.is_empty());

        fill_valid(&mut model, &tmp, &store);
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        assert!(model.error.is_none());
        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut cmds);
        assert!(model.output.is_some());
        assert!(model.error.is_none());
        assert!(model.field_errors.is_empty());

        update(&mut model, Msg::Techs(TechsMsg::Remove(1)), &mut cmds);
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        assert!(cmds.is_empty());
        assert!(model.output.is_none());
        assert!(model.stored.is_none());
        assert_eq!(
            model.error.as_deref(),
            Some("Please fix 1 field(s) before submitting.")
        );
        assert_eq!(
            model.field_errors.get("techs"),
            &[FieldError::CollectionSize { min: 2 }]
        );
    }

    #[test]
    fn success_after_failed_upload_clears_error() {
        let tmp = TempDir::new().unwrap();
        let store = MemoryStore::new();
        let mut model = FormModel::default();
        fill_valid(&mut model, &tmp, &store);

        let mut cmds = Vec::new();
        update(&mut model, Msg::SubmitRequested, &mut cmds);
        cmds.clear();
        update(
            &mut model,
            Msg::SubmitCompleted(Err("bucket offline".into())),
            &mut cmds,
        );
        assert!(model.error.is_some());

        update(&mut model, Msg::SubmitRequested, &mut cmds);
        let msg = run_command(cmds.pop().unwrap(), &store);
        update(&mut model, msg, &mut cmds);
        assert!(model.error.is_none());
        assert_eq!(model.status.as_deref(), Some("Form submitted."));
    }

    #[test]
    fn dismiss_error_clears_error_only() {
        let mut model = FormModel::default();
        model.error = Some("boom".into());
        model.status = Some("boom".into());

        update(&mut model, Msg::DismissError, &mut Vec::new());

        assert!(model.error.is_none());
        assert_eq!(model.status.as_deref(), Some("boom"));
    }
}
