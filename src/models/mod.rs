// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: pure data types and validation helpers shared by the form kernel and the CLI.

pub mod avatar;
pub mod field_error;
pub mod form;
pub mod techs;

pub use avatar::FileHandle;
pub use field_error::{FieldError, FieldErrors};
pub use form::{FormInput, ValidForm, validate_form};
pub use techs::{TechEntry, TechId, TechList};
