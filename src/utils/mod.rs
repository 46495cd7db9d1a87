// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities for storage keys.

pub mod sanitize_component;

/// Sanitize user-provided file names into safe object-key components.
pub use sanitize_component::sanitize_component;
