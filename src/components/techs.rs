// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Technology list editor in an MVU-friendly shape.

use crate::models::techs::TechList;

/// Editor state for the technology rows, kept free of side effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TechsModel {
    list: TechList,
}

impl TechsModel {
    pub fn list(&self) -> &TechList {
        &self.list
    }
}

/// Messages emitted while editing the technology rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TechsMsg {
    Append,
    Remove(usize),
    TitleChanged { index: usize, title: String },
    KnowledgeChanged { index: usize, value: String },
}

/// Feedback surfaced to the status line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TechsEvent {
    pub message: String,
    pub is_error: bool,
}

/// Apply a message to the model. Returns a feedback event when relevant.
///
/// Edits addressed to a missing row are ignored; the list size is never
/// constrained here.
pub fn update(model: &mut TechsModel, msg: TechsMsg) -> Option<TechsEvent> {
    match msg {
        TechsMsg::Append => {
            let id = model.list.append();
            log::debug!("appended technology row {id}");
            None
        }
        TechsMsg::Remove(index) => {
            let (id, entry) = model.list.remove(index)?;
            log::debug!("removed technology row {id} at {index}");
            let label = if entry.title.trim().is_empty() {
                "Technology".to_string()
            } else {
                entry.title
            };
            Some(TechsEvent {
                message: format!("{label} removed"),
                is_error: false,
            })
        }
        TechsMsg::TitleChanged { index, title } => {
            if let Some(entry) = model.list.get_mut(index) {
                entry.title = title;
            }
            None
        }
        TechsMsg::KnowledgeChanged { index, value } => {
            if let Some(entry) = model.list.get_mut(index) {
                entry.knowledge = value;
            }
            None
        }
    }
}
