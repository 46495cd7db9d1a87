// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Headless driver: replays a form draft as user input through the MVU kernel
//! and runs side effects on a command worker.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender};
use serde::Deserialize;

use crate::cli::Cli;
use crate::components::avatar::AvatarMsg;
use crate::components::techs::TechsMsg;
use crate::config::{FormConfig, load_config};
use crate::models::field_error::FieldErrors;
use crate::models::techs::TechEntry;
use crate::mvu::{self, Command, FormModel, Msg};
use crate::storage::{BlobStore, DirectoryStore};

/// Form values as saved in a draft file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormDraft {
    /// Avatar path; relative paths resolve against the draft's directory.
    pub avatar: Option<PathBuf>,
    pub name: String,
    pub email: String,
    pub password: String,
    pub techs: Vec<TechEntry>,
}

impl FormDraft {
    /// Read a JSON draft, resolving a relative avatar path next to the draft file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read form draft: {}", path.display()))?;
        let mut draft: FormDraft = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse form draft: {}", path.display()))?;
        if let Some(avatar) = draft.avatar.take() {
            let base = path.parent().unwrap_or_else(|| Path::new(""));
            draft.avatar = Some(if avatar.is_relative() {
                base.join(avatar)
            } else {
                avatar
            });
        }
        Ok(draft)
    }

    /// The edits a user would make to fill the form with this draft.
    pub fn into_messages(self) -> Vec<Msg> {
        let mut msgs = vec![
            Msg::NameChanged(self.name),
            Msg::EmailChanged(self.email),
            Msg::PasswordChanged(self.password),
        ];
        if let Some(path) = self.avatar {
            msgs.push(Msg::Avatar(AvatarMsg::FilesPicked(vec![path])));
        }
        for (index, tech) in self.techs.into_iter().enumerate() {
            msgs.push(Msg::Techs(TechsMsg::Append));
            msgs.push(Msg::Techs(TechsMsg::TitleChanged {
                index,
                title: tech.title,
            }));
            msgs.push(Msg::Techs(TechsMsg::KnowledgeChanged {
                index,
                value: tech.knowledge,
            }));
        }
        msgs
    }
}

/// Form model plus a command worker connected by channels.
pub struct FormApp {
    model: FormModel,
    cmd_tx: Sender<Command>,
    msg_rx: Receiver<Msg>,
}

impl FormApp {
    /// Spawn the command worker. It exits once the app is dropped.
    pub fn new(model: FormModel, store: Arc<dyn BlobStore>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        std::thread::spawn(move || {
            for cmd in cmd_rx.iter() {
                let msg = mvu::run_command(cmd, store.as_ref());
                if msg_tx.send(msg).is_err() {
                    break;
                }
            }
        });

        Self {
            model,
            cmd_tx,
            msg_rx,
        }
    }

    pub fn model(&self) -> &FormModel {
        &self.model
    }

    /// Apply one message and hand any resulting commands to the worker.
    pub fn dispatch(&mut self, msg: Msg) {
        let mut commands = Vec::new();
        mvu::update(&mut self.model, msg, &mut commands);
        for cmd in commands {
            if self.cmd_tx.send(cmd).is_ok() {
                self.model.pending_commands += 1;
            }
        }
    }

    /// Block until every queued command has reported back.
    pub fn settle(&mut self) -> Result<()> {
        while self.model.pending_commands > 0 {
            let msg = self
                .msg_rx
                .recv()
                .context("Command worker stopped unexpectedly")?;
            self.model.pending_commands -= 1;
            self.dispatch(msg);
        }
        Ok(())
    }

    /// Fill the form from `draft`, submit it, and wait for the outcome.
    pub fn submit_draft(&mut self, draft: FormDraft) -> Result<()> {
        for msg in draft.into_messages() {
            self.dispatch(msg);
        }
        self.settle()?;
        self.dispatch(Msg::SubmitRequested);
        self.settle()
    }
}

/// Merge command-line overrides into the loaded configuration.
pub fn effective_config(cli: &Cli) -> Result<FormConfig> {
    let mut config = load_config(&cli.config)?;
    if let Some(dir) = &cli.bucket_dir {
        config.storage.bucket_dir = dir.clone();
    }
    if let Some(suffix) = &cli.email_suffix {
        config.email_suffix = suffix.clone();
    }
    Ok(config)
}

/// One `path: message` line per failing field.
pub fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .messages()
        .map(|(path, message)| format!("{path}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the CLI: submit the draft and report the outcome.
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let config = effective_config(cli)?;
    let store = Arc::new(DirectoryStore::new(config.storage.bucket_dir.clone()));
    let draft = FormDraft::load(&cli.draft)?;
    log::debug!("loaded draft from {}", cli.draft.display());

    let mut app = FormApp::new(FormModel::new(config, cli.mode.into()), store);
    app.submit_draft(draft)?;

    let model = app.model();
    if let Some(output) = &model.output {
        println!("{output}");
        return Ok(ExitCode::SUCCESS);
    }
    if !model.field_errors.is_empty() {
        eprintln!("{}", format_field_errors(&model.field_errors));
    } else if let Some(error) = &model.error {
        eprintln!("{error}");
    }
    Ok(ExitCode::FAILURE)
}
