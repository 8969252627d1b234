// Copyright 2023-2025 StorSwift Inc.
// SPDX-License-Identifier: Apache-2.0

use clap::Parser;
use randbeacon::cli::Cli;

fn main() -> anyhow::Result<()> {
    Cli::parse().run()
}
