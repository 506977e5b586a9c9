// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! Regression detection for benchmark series.
//!
//! A new point is compared against a baseline built from the trailing window
//! of prior points in its series:
//!
//! - baseline = median value of the last K prior points
//! - tolerance = median error margin of the same K points
//!
//! For smaller-is-better units (`ns/iter`, `bytes`) the point has regressed
//! when `value > baseline * (1 + threshold)`, and improved when
//! `value < baseline * (1 - threshold)`. For `ops/sec` the directions are
//! mirrored. Either verdict requires the tolerance bands not to overlap;
//! otherwise the change is within noise and the point is `ok`.
//!
//! # Example
//!
//! ```
//! use benchtrack_core::{BenchRecord, DetectorConfig, Unit};
//! use benchtrack_detector::{Classification, RegressionDetector};
//!
//! let detector = RegressionDetector::new(DetectorConfig::default());
//! let point = BenchRecord {
//!     name: "verifying/bundle/1".into(),
//!     value: 31330509.0,
//!     error_margin: 0.0,
//!     unit: Unit::NsPerIter,
//! };
//!
//! // Nothing to compare against yet.
//! let outcome = detector.check(&[], &point);
//! assert_eq!(outcome.classification, Classification::InsufficientData);
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use benchtrack_core::{BenchRecord, DetectorConfig, SeriesPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for a new point relative to its series history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// Within threshold or within noise
    Ok,
    /// Worse than the baseline beyond threshold and noise
    Regressed,
    /// Better than the baseline beyond threshold and noise
    Improved,
    /// Fewer than K comparable prior points
    InsufficientData,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Classification::Ok => "ok",
            Classification::Regressed => "regressed",
            Classification::Improved => "improved",
            Classification::InsufficientData => "insufficient-data",
        })
    }
}

/// How far a change overshoots the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Up to 2x the threshold
    Low,
    /// Over 2x the threshold
    Medium,
    /// Over 3x the threshold
    High,
    /// Over 5x the threshold
    Critical,
}

/// Result of checking one point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// Bench case name
    pub name: String,
    /// Verdict
    pub classification: Classification,
    /// Value of the checked point
    pub value: f64,
    /// Median of the trailing window, if one could be formed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline: Option<f64>,
    /// Median error margin of the trailing window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_margin: Option<f64>,
    /// `value / baseline`, absent when the baseline is zero
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
    /// Set for `regressed` and `improved`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    /// Number of prior points the baseline was computed from
    pub window: usize,
}

impl CheckOutcome {
    /// Whether the point regressed.
    pub fn is_regression(&self) -> bool {
        self.classification == Classification::Regressed
    }

    /// Relative change against the baseline, as a percentage.
    pub fn change_percent(&self) -> Option<f64> {
        self.ratio.map(|r| (r - 1.0) * 100.0)
    }
}

/// Counts of each verdict over a set of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionStats {
    /// Total outcomes
    pub total: usize,
    /// `ok` outcomes
    pub ok: usize,
    /// `regressed` outcomes
    pub regressed: usize,
    /// `improved` outcomes
    pub improved: usize,
    /// `insufficient-data` outcomes
    pub insufficient_data: usize,
}

impl DetectionStats {
    /// Tally a set of outcomes.
    pub fn from_outcomes<'a>(outcomes: impl IntoIterator<Item = &'a CheckOutcome>) -> Self {
        let mut stats = Self::default();
        for outcome in outcomes {
            stats.total += 1;
            match outcome.classification {
                Classification::Ok => stats.ok += 1,
                Classification::Regressed => stats.regressed += 1,
                Classification::Improved => stats.improved += 1,
                Classification::InsufficientData => stats.insufficient_data += 1,
            }
        }
        stats
    }
}

/// Compares new points against series history.
///
/// Holds only configuration; every check is a pure function of its inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegressionDetector {
    config: DetectorConfig,
}

impl RegressionDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Get the current configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Classify `point` against the points that precede it in its series.
    ///
    /// Only prior points with the same unit as `point` take part. The
    /// window is clamped to at least one point.
    pub fn check(&self, prior: &[SeriesPoint], point: &BenchRecord) -> CheckOutcome {
        let k = self.config.window.max(1);
        let comparable: Vec<&BenchRecord> = prior
            .iter()
            .map(|p| &p.bench)
            .filter(|b| b.unit == point.unit)
            .collect();

        if comparable.len() < k {
            tracing::trace!(
                name = %point.name,
                available = comparable.len(),
                window = k,
                "not enough history to classify"
            );
            return CheckOutcome {
                name: point.name.clone(),
                classification: Classification::InsufficientData,
                value: point.value,
                baseline: None,
                baseline_margin: None,
                ratio: None,
                severity: None,
                window: comparable.len(),
            };
        }

        let trailing = &comparable[comparable.len() - k..];
        let baseline = median(trailing.iter().map(|b| b.value));
        let baseline_margin = median(trailing.iter().map(|b| b.error_margin));
        let ratio = (baseline > 0.0).then(|| point.value / baseline);

        let classification = self.classify(point, baseline, baseline_margin);
        let severity = match classification {
            Classification::Regressed | Classification::Improved => {
                Some(self.severity(point.value, baseline))
            }
            _ => None,
        };

        tracing::debug!(
            name = %point.name,
            value = point.value,
            baseline,
            %classification,
            "point classified"
        );

        CheckOutcome {
            name: point.name.clone(),
            classification,
            value: point.value,
            baseline: Some(baseline),
            baseline_margin: Some(baseline_margin),
            ratio,
            severity,
            window: k,
        }
    }

    fn classify(&self, point: &BenchRecord, baseline: f64, baseline_margin: f64) -> Classification {
        let overlaps =
            point.lower() <= baseline + baseline_margin && baseline - baseline_margin <= point.upper();
        if overlaps {
            return Classification::Ok;
        }

        let above = point.value > baseline * (1.0 + self.config.threshold);
        let below = point.value < baseline * (1.0 - self.config.threshold);
        let (worse, better) = if point.unit.bigger_is_better() {
            (below, above)
        } else {
            (above, below)
        };

        if worse {
            Classification::Regressed
        } else if better {
            Classification::Improved
        } else {
            Classification::Ok
        }
    }

    /// Calculate severity based on how far the change overshoots the threshold.
    fn severity(&self, value: f64, baseline: f64) -> Severity {
        if baseline <= 0.0 {
            return Severity::Critical;
        }
        let change = (value / baseline - 1.0).abs();
        let overshoot = if self.config.threshold > 0.0 {
            change / self.config.threshold
        } else {
            change * 10.0
        };

        if overshoot > 5.0 {
            Severity::Critical
        } else if overshoot > 3.0 {
            Severity::High
        } else if overshoot > 2.0 {
            Severity::Medium
        } else {
            Severity::Low
        }
    }
}

/// Check `point` against `prior` with the given configuration.
pub fn check(prior: &[SeriesPoint], point: &BenchRecord, config: &DetectorConfig) -> CheckOutcome {
    RegressionDetector::new(*config).check(prior, point)
}

fn median(values: impl Iterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.collect();
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchtrack_core::{Author, CommitRef, Unit};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn record(value: f64, margin: f64, unit: Unit) -> BenchRecord {
        BenchRecord {
            name: "verifying/bundle/1".to_string(),
            value,
            error_margin: margin,
            unit,
        }
    }

    fn history(values: &[(f64, f64)], unit: Unit) -> Vec<SeriesPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, &(value, margin))| {
                let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::hours(i as i64);
                SeriesPoint {
                    commit: Arc::new(CommitRef::new(format!("c{i}"), ts, Author::new("dev"))),
                    date: ts.timestamp_millis(),
                    tool: "cargo".to_string(),
                    bench: record(value, margin, unit),
                }
            })
            .collect()
    }

    #[test]
    fn test_bundle_regression() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(24535907.0, 311830.0)], Unit::NsPerIter);

        let outcome = detector.check(&prior, &record(31330509.0, 422354.0, Unit::NsPerIter));
        assert_eq!(outcome.classification, Classification::Regressed);
        assert_eq!(outcome.baseline, Some(24535907.0));
        assert_eq!(outcome.severity, Some(Severity::Medium));

        let change = outcome.change_percent().unwrap();
        assert!((change - 27.69).abs() < 0.01, "change was {change}");
    }

    #[test]
    fn test_insufficient_data_below_window() {
        let detector = RegressionDetector::new(DetectorConfig::new(3, 0.1));

        for n in 0..3 {
            let prior = history(&vec![(100.0, 1.0); n], Unit::NsPerIter);
            let outcome = detector.check(&prior, &record(1000.0, 0.0, Unit::NsPerIter));
            assert_eq!(outcome.classification, Classification::InsufficientData);
            assert_eq!(outcome.window, n);
            assert!(outcome.baseline.is_none());
        }
    }

    #[test]
    fn test_overlapping_bands_are_ok() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(100.0, 15.0)], Unit::NsPerIter);

        // 20% slower, but the bands [85, 115] and [115, 125] touch.
        let outcome = detector.check(&prior, &record(120.0, 5.0, Unit::NsPerIter));
        assert_eq!(outcome.classification, Classification::Ok);
        assert!(outcome.severity.is_none());
    }

    #[test]
    fn test_within_threshold_is_ok() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(100.0, 0.0)], Unit::NsPerIter);

        let outcome = detector.check(&prior, &record(105.0, 0.0, Unit::NsPerIter));
        assert_eq!(outcome.classification, Classification::Ok);
    }

    #[test]
    fn test_improvement() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(100.0, 1.0)], Unit::Bytes);

        let outcome = detector.check(&prior, &record(60.0, 1.0, Unit::Bytes));
        assert_eq!(outcome.classification, Classification::Improved);
        assert_eq!(outcome.severity, Some(Severity::High));
    }

    #[test]
    fn test_throughput_direction_is_mirrored() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(1000.0, 10.0)], Unit::OpsPerSec);

        let slower = detector.check(&prior, &record(700.0, 10.0, Unit::OpsPerSec));
        assert_eq!(slower.classification, Classification::Regressed);

        let faster = detector.check(&prior, &record(1500.0, 10.0, Unit::OpsPerSec));
        assert_eq!(faster.classification, Classification::Improved);
    }

    #[test]
    fn test_baseline_is_median_of_trailing_window() {
        let detector = RegressionDetector::new(DetectorConfig::new(3, 0.1));
        // Oldest point falls outside the window; the 500 outlier is damped.
        let prior = history(
            &[(1.0, 0.0), (100.0, 0.0), (500.0, 0.0), (110.0, 0.0)],
            Unit::NsPerIter,
        );

        let outcome = detector.check(&prior, &record(112.0, 0.0, Unit::NsPerIter));
        assert_eq!(outcome.baseline, Some(110.0));
        assert_eq!(outcome.window, 3);
        assert_eq!(outcome.classification, Classification::Ok);
    }

    #[test]
    fn test_other_units_are_ignored() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(100.0, 0.0)], Unit::Bytes);

        let outcome = detector.check(&prior, &record(500.0, 0.0, Unit::NsPerIter));
        assert_eq!(outcome.classification, Classification::InsufficientData);
    }

    #[test]
    fn test_zero_baseline() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(0.0, 0.0)], Unit::Bytes);

        let outcome = detector.check(&prior, &record(64.0, 0.0, Unit::Bytes));
        assert_eq!(outcome.classification, Classification::Regressed);
        assert_eq!(outcome.ratio, None);
        assert_eq!(outcome.severity, Some(Severity::Critical));
    }

    #[test]
    fn test_stats_tracking() {
        let detector = RegressionDetector::new(DetectorConfig::new(1, 0.1));
        let prior = history(&[(100.0, 0.0)], Unit::NsPerIter);

        let outcomes = vec![
            detector.check(&prior, &record(200.0, 0.0, Unit::NsPerIter)),
            detector.check(&prior, &record(50.0, 0.0, Unit::NsPerIter)),
            detector.check(&prior, &record(101.0, 0.0, Unit::NsPerIter)),
            detector.check(&[], &record(101.0, 0.0, Unit::NsPerIter)),
        ];

        let stats = DetectionStats::from_outcomes(&outcomes);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.regressed, 1);
        assert_eq!(stats.improved, 1);
        assert_eq!(stats.ok, 1);
        assert_eq!(stats.insufficient_data, 1);
    }

    #[test]
    fn test_classification_serializes_kebab_case() {
        let json = serde_json::to_string(&Classification::InsufficientData).unwrap();
        assert_eq!(json, "\"insufficient-data\"");
        assert_eq!(Classification::InsufficientData.to_string(), "insufficient-data");
    }
}
