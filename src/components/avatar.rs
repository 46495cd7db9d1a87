// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Avatar picker state: picked paths are inspected off the update path, then recorded.

use std::path::{Path, PathBuf};

use crate::models::avatar::FileHandle;

/// Files currently selected for the avatar field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvatarModel {
    files: Vec<FileHandle>,
    /// Paths from the latest pick whose inspection has not reported back yet.
    inspecting: Vec<PathBuf>,
    last_failure: Option<String>,
}

impl AvatarModel {
    /// Selected files in picker order.
    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    /// Why the latest picked file could not be read, if it could not.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Take `path` off the in-flight list. False for replies to an earlier pick.
    fn settle(&mut self, path: &Path) -> bool {
        match self.inspecting.iter().position(|p| p == path) {
            Some(idx) => {
                self.inspecting.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Messages for the avatar picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarMsg {
    /// The picker returned these paths; replaces the current selection.
    FilesPicked(Vec<PathBuf>),
    /// A picked path was inspected successfully.
    Inspected(FileHandle),
    InspectFailed { path: PathBuf, error: String },
    /// Set a handle directly, e.g. one produced by a host file picker.
    Selected(FileHandle),
    Clear,
}

/// Side effects requested by the avatar picker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarCommand {
    InspectFile { path: PathBuf },
}

/// Feedback surfaced to the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the avatar model. Returns a user-facing event when relevant.
pub fn update(
    model: &mut AvatarModel,
    msg: AvatarMsg,
    cmds: &mut Vec<AvatarCommand>,
) -> Option<AvatarEvent> {
    match msg {
        AvatarMsg::FilesPicked(paths) => {
            model.files.clear();
            model.last_failure = None;
            model.inspecting = paths.clone();
            if paths.is_empty() {
                return None;
            }
            for path in paths {
                cmds.push(AvatarCommand::InspectFile { path });
            }
            Some(AvatarEvent {
                message: "Reading avatar...".into(),
                is_error: false,
            })
        }
        AvatarMsg::Inspected(handle) => {
            if !model.settle(&handle.path) {
                log::debug!("dropping stale inspection of {}", handle.path.display());
                return None;
            }
            select(model, handle)
        }
        AvatarMsg::Selected(handle) => select(model, handle),
        AvatarMsg::InspectFailed { path, error } => {
            if !model.settle(&path) {
                log::debug!("dropping stale inspection failure for {}", path.display());
                return None;
            }
            let message = format!("Could not read {}: {error}", path.display());
            model.last_failure = Some(message.clone());
            Some(AvatarEvent {
                message,
                is_error: true,
            })
        }
        AvatarMsg::Clear => {
            model.files.clear();
            model.inspecting.clear();
            model.last_failure = None;
            None
        }
    }
}

fn select(model: &mut AvatarModel, handle: FileHandle) -> Option<AvatarEvent> {
    let message = format!("Avatar selected: {}", handle.name);
    model.last_failure = None;
    model.files.push(handle);
    Some(AvatarEvent {
        message,
        is_error: false,
    })
}
