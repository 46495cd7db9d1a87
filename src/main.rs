// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use std::process::ExitCode;

use clap::Parser;
use techform::cli::Cli;

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    techform::app::run(&cli)
}
