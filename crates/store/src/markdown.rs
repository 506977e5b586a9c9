// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown output generation for benchmark series.
//!
//! This module renders the regression report for one ingestion and a summary
//! of every series in a store.

use crate::store::{AppendOutcome, SeriesStore};
use benchtrack_core::types::format_range;
use benchtrack_core::{CommitRef, DetectorConfig};
use benchtrack_detector::{CheckOutcome, Classification, DetectionStats};
use std::fmt::{self, Write};

/// Generate a markdown report for the checks of one ingestion.
pub fn generate_check_report(
    commit: &CommitRef,
    outcome: &AppendOutcome,
    config: &DetectorConfig,
) -> String {
    render_check_report(commit, outcome, config).unwrap_or_default()
}

/// Generate a markdown summary of the latest point of every series.
pub fn generate_summary(store: &SeriesStore) -> String {
    render_summary(store).unwrap_or_default()
}

fn render_check_report(
    commit: &CommitRef,
    outcome: &AppendOutcome,
    config: &DetectorConfig,
) -> Result<String, fmt::Error> {
    let mut output = String::new();
    let stats = outcome.stats();

    writeln!(output, "# Benchmark Check: `{}`", commit.short_id())?;
    writeln!(output)?;
    if !commit.message.is_empty() {
        writeln!(output, "> {}", commit.message.lines().next().unwrap_or_default())?;
        writeln!(output)?;
    }
    writeln!(
        output,
        "Compared against the median of the last {} point(s), threshold {:.0}%.",
        config.window,
        config.threshold * 100.0
    )?;
    writeln!(output)?;

    let regressions: Vec<&CheckOutcome> = outcome.regressions().collect();
    if !regressions.is_empty() {
        writeln!(output, "## :warning: Regressions")?;
        writeln!(output)?;
        for check in &regressions {
            writeln!(
                output,
                "- **{}**: {} ({}, {})",
                check.name,
                format_value(check.value),
                format_change(check),
                check
                    .severity
                    .map(|s| format!("{s:?}"))
                    .unwrap_or_default()
            )?;
        }
        writeln!(output)?;
    }

    writeln!(output, "## Results")?;
    writeln!(output)?;
    writeln!(output, "| Benchmark | Value | Baseline | Change | Verdict |")?;
    writeln!(output, "|-----------|-------|----------|--------|---------|")?;
    for check in &outcome.checks {
        writeln!(
            output,
            "| {} | {} | {} | {} | {} |",
            check.name,
            format_value(check.value),
            check.baseline.map(format_value).unwrap_or_else(|| "-".to_string()),
            format_change(check),
            verdict(check.classification)
        )?;
    }

    if !outcome.rejected.is_empty() {
        writeln!(output)?;
        writeln!(output, "## Rejected Records")?;
        writeln!(output)?;
        for rejected in &outcome.rejected {
            writeln!(
                output,
                "- #{} `{}`: {}",
                rejected.index, rejected.name, rejected.error
            )?;
        }
    }

    writeln!(output)?;
    writeln!(output, "---")?;
    write_stats(&mut output, &stats)?;

    Ok(output)
}

fn render_summary(store: &SeriesStore) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(output, "# Benchmark Summary")?;
    writeln!(output)?;
    writeln!(output, "Generated: {}", chrono::Utc::now().to_rfc3339())?;
    writeln!(output)?;
    writeln!(output, "## Series")?;
    writeln!(output)?;
    writeln!(output, "| Benchmark | Points | Latest | Range | Unit | Commit | Verdict |")?;
    writeln!(output, "|-----------|--------|--------|-------|------|--------|---------|")?;

    let mut checks = Vec::new();
    for series in store.snapshot() {
        let points = series.points();
        let Some((latest, prior)) = points.split_last() else {
            continue;
        };
        let check = benchtrack_detector::check(prior, &latest.bench, store.detector_config());

        writeln!(
            output,
            "| {} | {} | {} | {} | {} | {} | {} |",
            series.name(),
            points.len(),
            format_value(latest.bench.value),
            format_range(latest.bench.error_margin),
            latest.bench.unit,
            latest.commit.short_id(),
            verdict(check.classification)
        )?;
        checks.push(check);
    }

    writeln!(output)?;
    writeln!(output, "---")?;
    writeln!(output, "Total series: {}", checks.len())?;
    write_stats(&mut output, &DetectionStats::from_outcomes(&checks))?;

    Ok(output)
}

fn write_stats(output: &mut String, stats: &DetectionStats) -> fmt::Result {
    writeln!(
        output,
        "Checked: {} | Regressed: {} | Improved: {} | OK: {} | Insufficient data: {}",
        stats.total, stats.regressed, stats.improved, stats.ok, stats.insufficient_data
    )
}

fn verdict(classification: Classification) -> &'static str {
    match classification {
        Classification::Ok => "ok",
        Classification::Regressed => ":x: regressed",
        Classification::Improved => ":rocket: improved",
        Classification::InsufficientData => "insufficient data",
    }
}

fn format_change(check: &CheckOutcome) -> String {
    check
        .change_percent()
        .map(|pct| format!("{pct:+.2}%"))
        .unwrap_or_else(|| "-".to_string())
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}
