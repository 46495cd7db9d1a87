// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_CONFIG_PATH;
use crate::mvu::CompletionMode;

/// Validate a sign-up form draft and print or upload the result.
#[derive(Parser, Debug, Clone)]
#[command(name = "techform", version, about, long_about = None)]
pub struct Cli {
    /// JSON form draft to submit
    pub draft: PathBuf,

    /// Path to the configuration file
    #[arg(short, long, env = "TECHFORM_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// What to do with a valid form
    #[arg(short, long, value_enum, default_value_t = Mode::Print)]
    pub mode: Mode,

    /// Directory used as the storage bucket (overrides the config)
    #[arg(long, env = "TECHFORM_BUCKET_DIR")]
    pub bucket_dir: Option<PathBuf>,

    /// Required email domain suffix (overrides the config)
    #[arg(long)]
    pub email_suffix: Option<String>,
}

/// Completion mode as spelled on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Print,
    Upload,
}

impl From<Mode> for CompletionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Print => CompletionMode::Print,
            Mode::Upload => CompletionMode::Upload,
        }
    }
}
