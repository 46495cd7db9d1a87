// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Sign-up form core: schema validation with normalization, a dynamic
//! technology list with stable row identities, and an MVU kernel that
//! submits valid forms by printing them or uploading the avatar.

pub mod app;
pub mod cli;
pub mod components;
pub mod config;
pub mod models;
pub mod mvu;
pub mod storage;
pub mod utils;
