// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for benchtrack.
//!
//! This crate provides the `benchtrack` command-line interface: ingest a
//! harness run into the dashboard data file, query series, and render
//! regression reports.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use benchtrack_core::{telemetry, DetectorConfig, Settings};
use benchtrack_store::{io, markdown, SeriesStore};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// benchtrack CLI.
#[derive(Parser, Debug)]
#[command(name = "benchtrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./benchtrack.toml if present).
    #[arg(short, long, global = true, env = "BENCHTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Dashboard data file override.
    #[arg(short, long, global = true)]
    pub data: Option<PathBuf>,

    /// Regression window override (number of prior points).
    #[arg(long, global = true)]
    pub window: Option<usize>,

    /// Regression threshold override (0.1 = 10%).
    #[arg(long, global = true)]
    pub threshold: Option<f64>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Append a harness run to the data file and check it for regressions.
    Ingest {
        /// Run JSON file: {commit, date, tool, benches}.
        #[arg(short, long)]
        run: PathBuf,

        /// Record a re-run of a commit that is already present.
        #[arg(long)]
        overwrite: bool,

        /// Write the markdown check report to this file.
        #[arg(long)]
        report: Option<PathBuf>,

        /// Exit with an error if any benchmark regressed.
        #[arg(long)]
        fail_on_regression: bool,
    },

    /// Check a harness run against history without recording it.
    Check {
        /// Run JSON file: {commit, date, tool, benches}.
        #[arg(short, long)]
        run: PathBuf,

        /// Exit with an error if any benchmark regressed.
        #[arg(long)]
        fail_on_regression: bool,
    },

    /// Print the history of one benchmark as JSON.
    Series {
        /// Benchmark name.
        name: String,

        /// First commit of a commit range (requires --to).
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Last commit of a commit range (requires --from).
        #[arg(long, requires = "from")]
        to: Option<String>,

        /// Earliest commit timestamp (RFC 3339).
        #[arg(long, conflicts_with = "from")]
        since: Option<DateTime<Utc>>,

        /// Latest commit timestamp (RFC 3339).
        #[arg(long, conflicts_with = "from")]
        until: Option<DateTime<Utc>>,

        /// Write the JSON to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a markdown summary of every series.
    Report {
        /// Write the summary to this file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and data file status.
    Status {
        /// List every series.
        #[arg(long)]
        detailed: bool,
    },
}

impl Cli {
    /// Load settings and apply command-line overrides.
    pub fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = Settings::load(self.config.as_deref()).context("loading settings")?;
        if let Some(data) = &self.data {
            settings.storage.data_file = data.clone();
        }
        if let Some(window) = self.window {
            settings.detector.window = window;
        }
        if let Some(threshold) = self.threshold {
            settings.detector.threshold = threshold;
        }
        settings.detector.validate()?;
        Ok(settings)
    }
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;
    // A subscriber may already be installed when embedded; keep going without ours.
    let _ = telemetry::init_tracing(&settings.log);

    let stdout = std::io::stdout();
    execute(cli.command, &settings, &mut stdout.lock())
}

/// Execute one command against the configured data file, writing output to `out`.
pub fn execute(command: Commands, settings: &Settings, out: &mut dyn Write) -> anyhow::Result<()> {
    let data_file = &settings.storage.data_file;
    let (store, data) = benchtrack_store::open(settings)
        .with_context(|| format!("loading {}", data_file.display()))?;
    tracing::debug!(path = %data_file.display(), series = store.len(), "data file loaded");

    match command {
        Commands::Ingest {
            run,
            overwrite,
            report,
            fail_on_regression,
        } => {
            let input = io::read_run(&run).with_context(|| format!("reading {}", run.display()))?;
            let commit = input.commit.clone();
            let outcome = store.ingest(input, overwrite)?;
            if outcome.appended == 0 && !outcome.rejected.is_empty() {
                bail!("every bench record of {} was rejected", run.display());
            }

            benchtrack_store::save(&store, settings, data.repo_url.clone())
                .with_context(|| format!("writing {}", data_file.display()))?;

            let rendered = markdown::generate_check_report(&commit, &outcome, &settings.detector);
            match report {
                Some(path) => std::fs::write(&path, &rendered)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => write!(out, "{rendered}")?,
            }
            writeln!(
                out,
                "Appended {} benchmark(s) for {} to {}",
                outcome.appended,
                commit.short_id(),
                data_file.display()
            )?;

            regression_gate(fail_on_regression, outcome.regressions().count())
        }

        Commands::Check {
            run,
            fail_on_regression,
        } => {
            let input = io::read_run(&run).with_context(|| format!("reading {}", run.display()))?;
            let outcome = store.check_run(&input);
            write!(
                out,
                "{}",
                markdown::generate_check_report(&input.commit, &outcome, &settings.detector)
            )?;
            regression_gate(fail_on_regression, outcome.regressions().count())
        }

        Commands::Series {
            name,
            from,
            to,
            since,
            until,
            output,
        } => {
            let points = match (from, to, since, until) {
                (Some(from), Some(to), _, _) => store.get_range(&name, &from, &to)?,
                (_, _, None, None) => store.get_series(&name)?,
                (_, _, since, until) => store.get_time_range(
                    &name,
                    since.unwrap_or(DateTime::<Utc>::MIN_UTC),
                    until.unwrap_or(DateTime::<Utc>::MAX_UTC),
                )?,
            };

            match output {
                Some(path) => io::write_series_json(&points, &path)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => writeln!(out, "{}", serde_json::to_string_pretty(&points)?)?,
            }
            Ok(())
        }

        Commands::Report { output } => {
            let summary = markdown::generate_summary(&store);
            match output {
                Some(path) => std::fs::write(&path, summary)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => write!(out, "{summary}")?,
            }
            Ok(())
        }

        Commands::Status { detailed } => {
            write_status(out, settings, &store, detailed)?;
            Ok(())
        }
    }
}

fn regression_gate(enabled: bool, regressions: usize) -> anyhow::Result<()> {
    if enabled && regressions > 0 {
        bail!("{regressions} benchmark(s) regressed");
    }
    Ok(())
}

fn write_status(
    out: &mut dyn Write,
    settings: &Settings,
    store: &SeriesStore,
    detailed: bool,
) -> std::io::Result<()> {
    let DetectorConfig { window, threshold } = settings.detector;

    writeln!(out, "benchtrack")?;
    writeln!(out, "Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "Data file: {}", settings.storage.data_file.display())?;
    writeln!(out, "Window: {window} | Threshold: {:.1}%", threshold * 100.0)?;
    writeln!(out, "Series: {} | Points: {}", store.len(), store.total_points())?;

    if detailed {
        writeln!(out)?;
        for name in store.series_names() {
            let points = store.get_series(&name).map(|p| p.len()).unwrap_or_default();
            writeln!(out, "  - {name} ({points})")?;
        }
    }
    Ok(())
}
