// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! benchtrack CLI entry point.

fn main() {
    if let Err(e) = benchtrack_cli::run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
