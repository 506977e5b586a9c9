// Copyright 2025 benchtrack Contributors
// SPDX-License-Identifier: Apache-2.0

//! In-memory series store.
//!
//! The store owns every [`Series`]. Each series sits behind its own lock in a
//! concurrent map, so appends to different benchmark names proceed
//! independently while appends to the same name are serialized. A batch
//! write-locks every series it touches (in name order) for its whole
//! duration, so readers observe either the state before a batch or after it,
//! never a partially-appended point.

use benchtrack_core::{
    BenchRecord, CommitRef, DetectorConfig, DuplicateCommitError, NotFoundError, RawBench,
    Result, RunInput, SeriesPoint, ValidationError,
};
use benchtrack_detector::{CheckOutcome, DetectionStats, RegressionDetector};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Ordered, append-only history of one benchmark name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    points: Vec<SeriesPoint>,
    /// Ingestion sequence number of each point, parallel to `points`.
    sequence: Vec<u64>,
}

impl Series {
    /// Create an empty series.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
            sequence: Vec::new(),
        }
    }

    /// Benchmark name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points in ingestion order.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any point belongs to `commit_id`.
    pub fn contains_commit(&self, commit_id: &str) -> bool {
        self.points.iter().any(|p| p.commit.id == commit_id)
    }

    /// Most recent point.
    pub fn latest(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }

    /// Points paired with the sequence number of the batch that appended them.
    ///
    /// Sequence numbers grow in ingestion order across the whole store, so
    /// they order batches that share no series as well.
    pub fn entries(&self) -> impl Iterator<Item = (u64, &SeriesPoint)> + '_ {
        self.sequence.iter().copied().zip(self.points.iter())
    }

    fn push(&mut self, sequence: u64, point: SeriesPoint) {
        self.sequence.push(sequence);
        self.points.push(point);
    }
}

/// Run-level metadata attached to every point of an ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMeta {
    /// Time of the run in milliseconds since the Unix epoch.
    pub date: i64,
    /// Harness name.
    pub tool: String,
}

/// A raw record the normalizer refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// Position of the record in the submitted batch.
    pub index: usize,
    /// Name as submitted.
    pub name: String,
    /// Why it was rejected.
    pub error: ValidationError,
}

/// Result of ingesting one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppendOutcome {
    /// Identifier of this ingestion event.
    pub ingestion_id: Uuid,
    /// Commit the run belongs to.
    pub commit_id: String,
    /// Number of points appended.
    pub appended: usize,
    /// Records rejected by the normalizer.
    pub rejected: Vec<RejectedRecord>,
    /// Detector verdict for each appended point, in batch order.
    pub checks: Vec<CheckOutcome>,
}

impl AppendOutcome {
    /// Outcomes classified as regressions.
    pub fn regressions(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| c.is_regression())
    }

    /// Verdict counts.
    pub fn stats(&self) -> DetectionStats {
        DetectionStats::from_outcomes(&self.checks)
    }
}

/// Concurrent store of benchmark series.
#[derive(Debug, Default)]
pub struct SeriesStore {
    series: DashMap<String, Arc<RwLock<Series>>>,
    detector: RegressionDetector,
    next_sequence: AtomicU64,
}

impl SeriesStore {
    /// Create an empty store using the given detector configuration.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            series: DashMap::new(),
            detector: RegressionDetector::new(config),
            next_sequence: AtomicU64::new(0),
        }
    }

    /// Detector configuration used on append.
    pub fn detector_config(&self) -> &DetectorConfig {
        self.detector.config()
    }

    /// Normalize and append one harness run.
    ///
    /// Records that fail validation are reported in the outcome and skipped;
    /// the rest of the batch is appended. Fails without appending anything if
    /// the commit is already recorded in any target series and `overwrite`
    /// is not set.
    pub fn ingest(&self, run: RunInput, overwrite: bool) -> Result<AppendOutcome> {
        let RunInput {
            commit,
            date,
            tool,
            benches,
        } = run;

        let (records, rejected) = normalize_batch(&benches);
        for rejection in &rejected {
            tracing::warn!(
                commit = %commit.id,
                index = rejection.index,
                name = %rejection.name,
                error = %rejection.error,
                "bench record rejected"
            );
        }
        metrics::counter!("benchtrack_records_rejected_total").increment(rejected.len() as u64);

        let commit_id = commit.id.clone();
        let checks = self.append(Arc::new(commit), RunMeta { date, tool }, records, overwrite)?;

        Ok(AppendOutcome {
            ingestion_id: Uuid::new_v4(),
            commit_id,
            appended: checks.len(),
            rejected,
            checks,
        })
    }

    /// Append normalized records for one commit.
    ///
    /// Every point is checked against its series history before being
    /// appended; the verdicts are returned in `records` order.
    #[tracing::instrument(skip(self, commit, meta, records), fields(commit = %commit.id, records = records.len()))]
    pub fn append(
        &self,
        commit: Arc<CommitRef>,
        meta: RunMeta,
        records: Vec<BenchRecord>,
        overwrite: bool,
    ) -> Result<Vec<CheckOutcome>> {
        let mut names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
        names.sort_unstable();
        names.dedup();

        let handles: Vec<Arc<RwLock<Series>>> = names
            .iter()
            .map(|name| {
                self.series
                    .entry(name.clone())
                    .or_insert_with(|| Arc::new(RwLock::new(Series::new(name.as_str()))))
                    .clone()
            })
            .collect();

        // Locks are always taken in name order.
        let mut guards: Vec<_> = handles.iter().map(|h| h.write()).collect();
        let slot = |name: &str| {
            names
                .binary_search_by(|n| n.as_str().cmp(name))
                .unwrap_or_default()
        };

        if !overwrite {
            let mut seen = HashSet::new();
            for record in &records {
                let existing = guards[slot(record.name.as_str())].contains_commit(&commit.id);
                if existing || !seen.insert(record.name.as_str()) {
                    tracing::debug!(series = %record.name, "duplicate commit refused");
                    return Err(DuplicateCommitError {
                        series: record.name.clone(),
                        commit_id: commit.id.clone(),
                    }
                    .into());
                }
            }
        }

        // Taken under the series locks, so batches sharing a series get
        // sequence numbers in the order they were appended to it.
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);

        let mut checks = Vec::with_capacity(records.len());
        for record in records {
            let series = &mut guards[slot(record.name.as_str())];
            let outcome = self.detector.check(series.points(), &record);
            if outcome.is_regression() {
                tracing::warn!(
                    series = %record.name,
                    commit = %commit.id,
                    value = record.value,
                    baseline = ?outcome.baseline,
                    severity = ?outcome.severity,
                    "performance regression detected"
                );
                metrics::counter!("benchtrack_regressions_total").increment(1);
            }
            series.push(
                sequence,
                SeriesPoint {
                    commit: Arc::clone(&commit),
                    date: meta.date,
                    tool: meta.tool.clone(),
                    bench: record,
                },
            );
            checks.push(outcome);
        }

        metrics::counter!("benchtrack_records_appended_total").increment(checks.len() as u64);
        tracing::info!(appended = checks.len(), sequence, "commit appended");
        Ok(checks)
    }

    /// Check `record` against the current history of its series without
    /// appending it.
    pub fn check(&self, record: &BenchRecord) -> CheckOutcome {
        match self.handle(&record.name) {
            Some(handle) => self.detector.check(handle.read().points(), record),
            None => self.detector.check(&[], record),
        }
    }

    /// Normalize and check a run without appending it.
    ///
    /// The outcome has `appended == 0`; its checks are what [`Self::ingest`]
    /// would report if no other writer got there first.
    pub fn check_run(&self, run: &RunInput) -> AppendOutcome {
        let (records, rejected) = normalize_batch(&run.benches);
        AppendOutcome {
            ingestion_id: Uuid::new_v4(),
            commit_id: run.commit.id.clone(),
            appended: 0,
            rejected,
            checks: records.iter().map(|r| self.check(r)).collect(),
        }
    }

    /// Full ordered history of `name`.
    pub fn get_series(&self, name: &str) -> Result<Vec<SeriesPoint>> {
        self.read(name, |series| series.points().to_vec())
    }

    /// Points from the first occurrence of `from_commit` through the last
    /// occurrence of `to_commit`, inclusive.
    ///
    /// Empty when `from_commit` only appears after `to_commit`.
    pub fn get_range(
        &self,
        name: &str,
        from_commit: &str,
        to_commit: &str,
    ) -> Result<Vec<SeriesPoint>> {
        self.read(name, |series| {
            let points = series.points();
            let start = points.iter().position(|p| p.commit.id == from_commit);
            let end = points.iter().rposition(|p| p.commit.id == to_commit);

            match (start, end) {
                (None, _) => Err(commit_not_found(name, from_commit)),
                (_, None) => Err(commit_not_found(name, to_commit)),
                (Some(start), Some(end)) if start > end => Ok(Vec::new()),
                (Some(start), Some(end)) => Ok(points[start..=end].to_vec()),
            }
        })?
    }

    /// Points whose commit timestamp lies within `[since, until]`, in series order.
    pub fn get_time_range(
        &self,
        name: &str,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<SeriesPoint>> {
        self.read(name, |series| {
            series
                .points()
                .iter()
                .filter(|p| p.commit.timestamp >= since && p.commit.timestamp <= until)
                .cloned()
                .collect()
        })
    }

    /// Most recent point of `name`.
    pub fn latest(&self, name: &str) -> Result<SeriesPoint> {
        self.read(name, |series| series.latest().cloned())?
            .ok_or_else(|| series_not_found(name))
    }

    /// Names of all non-empty series, sorted.
    pub fn series_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .series
            .iter()
            .filter(|entry| !entry.value().read().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    /// Copy of every non-empty series, sorted by name.
    pub fn snapshot(&self) -> Vec<Series> {
        self.series_names()
            .into_iter()
            .filter_map(|name| self.handle(&name).map(|h| h.read().clone()))
            .collect()
    }

    /// Number of non-empty series.
    pub fn len(&self) -> usize {
        self.series_names().len()
    }

    /// Whether the store holds no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of points across all series.
    pub fn total_points(&self) -> usize {
        self.series.iter().map(|entry| entry.value().read().len()).sum()
    }

    fn handle(&self, name: &str) -> Option<Arc<RwLock<Series>>> {
        self.series.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Run `f` under a read lock of a non-empty series.
    ///
    /// The map guard is released before the series lock is taken.
    fn read<T>(&self, name: &str, f: impl FnOnce(&Series) -> T) -> Result<T> {
        let handle = self.handle(name).ok_or_else(|| series_not_found(name))?;
        let series = handle.read();
        if series.is_empty() {
            return Err(series_not_found(name));
        }
        Ok(f(&series))
    }
}

/// Normalize a batch, keeping valid records in order and collecting rejections.
pub fn normalize_batch(benches: &[RawBench]) -> (Vec<BenchRecord>, Vec<RejectedRecord>) {
    let mut records = Vec::with_capacity(benches.len());
    let mut rejected = Vec::new();

    for (index, raw) in benches.iter().enumerate() {
        match benchtrack_core::normalize(raw) {
            Ok(record) => records.push(record),
            Err(error) => rejected.push(RejectedRecord {
                index,
                name: raw.name.clone(),
                error,
            }),
        }
    }

    (records, rejected)
}

fn series_not_found(name: &str) -> benchtrack_core::TrackError {
    NotFoundError::Series {
        name: name.to_string(),
    }
    .into()
}

fn commit_not_found(name: &str, commit_id: &str) -> benchtrack_core::TrackError {
    NotFoundError::Commit {
        series: name.to_string(),
        commit_id: commit_id.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchtrack_core::{Author, Field, TrackError, Unit};
    use benchtrack_detector::Classification;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap()
    }

    fn run(commit: &str, hour: u32, benches: Vec<RawBench>) -> RunInput {
        RunInput {
            commit: CommitRef::new(commit, ts(hour), Author::new("dev"))
                .with_message(format!("commit {commit}")),
            date: ts(hour).timestamp_millis(),
            tool: "cargo".to_string(),
            benches,
        }
    }

    fn bench(name: &str, value: f64, margin: f64) -> RawBench {
        RawBench::new(name, value, margin, "ns/iter")
    }

    fn store_with_history(n: u32) -> SeriesStore {
        let store = SeriesStore::default();
        for i in 0..n {
            store
                .ingest(
                    run(&format!("c{i}"), i, vec![bench("verify", 100.0 + i as f64, 1.0)]),
                    false,
                )
                .unwrap();
        }
        store
    }

    #[test]
    fn test_append_preserves_order() {
        let store = store_with_history(6);

        let points = store.get_series("verify").unwrap();
        assert_eq!(points.len(), 6);
        let ids: Vec<&str> = points.iter().map(|p| p.commit.id.as_str()).collect();
        assert_eq!(ids, ["c0", "c1", "c2", "c3", "c4", "c5"]);
        assert_eq!(points[5].bench.value, 105.0);
        assert_eq!(store.total_points(), 6);
    }

    #[test]
    fn test_bundle_regression_on_append() {
        let store = SeriesStore::new(DetectorConfig::new(1, 0.1));
        let first = store
            .ingest(
                run("a1", 1, vec![bench("verifying/bundle/1", 24535907.0, 311830.0)]),
                false,
            )
            .unwrap();
        assert_eq!(first.checks[0].classification, Classification::InsufficientData);

        let second = store
            .ingest(
                run("b2", 2, vec![bench("verifying/bundle/1", 31330509.0, 422354.0)]),
                false,
            )
            .unwrap();
        assert_eq!(second.checks[0].classification, Classification::Regressed);
        assert_eq!(second.regressions().count(), 1);
        assert_eq!(second.stats().regressed, 1);
    }

    #[test]
    fn test_commit_ref_is_shared_within_batch() {
        let store = SeriesStore::default();
        store
            .ingest(run("a1", 1, vec![bench("x", 1.0, 0.0), bench("y", 2.0, 0.0)]), false)
            .unwrap();

        let x = store.latest("x").unwrap();
        let y = store.latest("y").unwrap();
        assert!(Arc::ptr_eq(&x.commit, &y.commit));
    }

    #[test]
    fn test_invalid_records_are_skipped() {
        let store = SeriesStore::default();
        let mut bad_unit = bench("z", 3.0, 0.0);
        bad_unit.unit = "parsecs".to_string();

        let outcome = store
            .ingest(
                run("a1", 1, vec![bench("x", 1.0, 0.0), bad_unit, bench("", 2.0, 0.0)]),
                false,
            )
            .unwrap();

        assert_eq!(outcome.appended, 1);
        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.rejected[0].index, 1);
        assert_eq!(outcome.rejected[0].error.field, Field::Unit);
        assert_eq!(outcome.rejected[1].error.field, Field::Name);
        assert_eq!(store.series_names(), ["x"]);
    }

    #[test]
    fn test_duplicate_commit_leaves_store_untouched() {
        let store = SeriesStore::default();
        store.ingest(run("a1", 1, vec![bench("x", 1.0, 0.0)]), false).unwrap();

        let err = store
            .ingest(run("a1", 2, vec![bench("new", 5.0, 0.0), bench("x", 2.0, 0.0)]), false)
            .unwrap_err();

        assert_eq!(
            err,
            TrackError::DuplicateCommit(DuplicateCommitError {
                series: "x".to_string(),
                commit_id: "a1".to_string(),
            })
        );
        assert_eq!(store.get_series("x").unwrap().len(), 1);
        assert!(matches!(store.get_series("new"), Err(TrackError::NotFound(_))));
        assert_eq!(store.series_names(), ["x"]);
    }

    #[test]
    fn test_duplicate_name_within_batch() {
        let store = SeriesStore::default();
        let err = store
            .ingest(run("a1", 1, vec![bench("x", 1.0, 0.0), bench("x", 2.0, 0.0)]), false)
            .unwrap_err();
        assert!(matches!(err, TrackError::DuplicateCommit(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_overwrite_records_rerun() {
        let store = SeriesStore::default();
        store.ingest(run("a1", 1, vec![bench("x", 1.0, 0.0)]), false).unwrap();
        let outcome = store.ingest(run("a1", 1, vec![bench("x", 1.5, 0.0)]), true).unwrap();

        assert_eq!(outcome.appended, 1);
        let points = store.get_series("x").unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].bench.value, 1.5);
    }

    #[test]
    fn test_get_range_inclusive() {
        let store = store_with_history(5);

        let range = store.get_range("verify", "c1", "c3").unwrap();
        let ids: Vec<&str> = range.iter().map(|p| p.commit.id.as_str()).collect();
        assert_eq!(ids, ["c1", "c2", "c3"]);

        let single = store.get_range("verify", "c4", "c4").unwrap();
        assert_eq!(single.len(), 1);

        let reversed = store.get_range("verify", "c3", "c1").unwrap();
        assert!(reversed.is_empty());
    }

    #[test]
    fn test_get_range_unknown_commit() {
        let store = store_with_history(3);

        let err = store.get_range("verify", "c0", "nope").unwrap_err();
        assert_eq!(
            err,
            TrackError::NotFound(NotFoundError::Commit {
                series: "verify".to_string(),
                commit_id: "nope".to_string(),
            })
        );
        assert!(store.get_range("verify", "nope", "c1").is_err());
        assert!(matches!(
            store.get_range("missing", "c0", "c1"),
            Err(TrackError::NotFound(NotFoundError::Series { .. }))
        ));
    }

    #[test]
    fn test_get_time_range() {
        let store = store_with_history(6);

        let points = store.get_time_range("verify", ts(2), ts(4)).unwrap();
        let ids: Vec<&str> = points.iter().map(|p| p.commit.id.as_str()).collect();
        assert_eq!(ids, ["c2", "c3", "c4"]);

        assert!(store.get_time_range("verify", ts(10), ts(12)).unwrap().is_empty());
    }

    #[test]
    fn test_check_does_not_append() {
        let store = store_with_history(2);
        let record = benchtrack_core::normalize(&bench("verify", 500.0, 0.0)).unwrap();

        let outcome = store.check(&record);
        assert_eq!(outcome.classification, Classification::Regressed);
        assert_eq!(store.get_series("verify").unwrap().len(), 2);

        let unknown = BenchRecord {
            name: "fresh".to_string(),
            value: 1.0,
            error_margin: 0.0,
            unit: Unit::NsPerIter,
        };
        assert_eq!(store.check(&unknown).classification, Classification::InsufficientData);
    }

    #[test]
    fn test_check_run_is_a_dry_run() {
        let store = store_with_history(1);
        let outcome = store.check_run(&run("c9", 9, vec![bench("verify", 300.0, 0.0)]));

        assert_eq!(outcome.appended, 0);
        assert_eq!(outcome.checks[0].classification, Classification::Regressed);
        assert_eq!(store.get_series("verify").unwrap().len(), 1);
    }

    #[test]
    fn test_window_from_config() {
        let store = SeriesStore::new(DetectorConfig::new(3, 0.1));
        for (i, value) in [100.0, 100.0, 100.0].into_iter().enumerate() {
            let outcome = store
                .ingest(run(&format!("c{i}"), i as u32, vec![bench("w", value, 0.0)]), false)
                .unwrap();
            assert_eq!(outcome.checks[0].classification, Classification::InsufficientData);
        }

        let outcome = store.ingest(run("c3", 3, vec![bench("w", 150.0, 0.0)]), false).unwrap();
        assert_eq!(outcome.checks[0].classification, Classification::Regressed);
    }

    #[test]
    fn test_readers_never_observe_partial_batch() {
        use std::sync::atomic::AtomicBool;

        let store = Arc::new(SeriesStore::default());
        let done = Arc::new(AtomicBool::new(false));
        let len = |store: &SeriesStore, name: &str| store.get_series(name).map_or(0, |p| p.len());

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                let done = Arc::clone(&done);
                std::thread::spawn(move || {
                    while !done.load(Ordering::Acquire) {
                        // `right` is read second, so it can only be ahead.
                        let left = len(&store, "left");
                        let right = len(&store, "right");
                        assert!(left <= right, "left={left} right={right}");

                        let right = len(&store, "right");
                        let left = len(&store, "left");
                        assert!(right <= left, "right={right} left={left}");
                    }
                })
            })
            .collect();

        for i in 0..300 {
            store
                .ingest(
                    run(
                        &format!("c{i}"),
                        0,
                        vec![bench("right", 1.0, 0.0), bench("left", 1.0, 0.0)],
                    ),
                    false,
                )
                .unwrap();
        }
        done.store(true, Ordering::Release);

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(len(&store, "left"), 300);
        assert_eq!(len(&store, "right"), 300);
    }

    #[test]
    fn test_sequence_follows_ingestion_order() {
        let store = SeriesStore::default();
        store.ingest(run("new", 5, vec![bench("x", 1.0, 0.0)]), false).unwrap();
        store.ingest(run("other", 1, vec![bench("y", 1.0, 0.0)]), false).unwrap();
        store.ingest(run("old", 1, vec![bench("x", 2.0, 0.0), bench("y", 2.0, 0.0)]), false).unwrap();

        let snapshot = store.snapshot();
        let x: Vec<(u64, &str)> = snapshot[0].entries().map(|(s, p)| (s, p.commit.id.as_str())).collect();
        let y: Vec<(u64, &str)> = snapshot[1].entries().map(|(s, p)| (s, p.commit.id.as_str())).collect();
        assert_eq!(x, [(0, "new"), (2, "old")]);
        assert_eq!(y, [(1, "other"), (2, "old")]);
    }

    #[test]
    fn test_concurrent_appends_to_distinct_series() {
        let store = Arc::new(SeriesStore::default());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        store
                            .ingest(
                                run(
                                    &format!("t{t}-c{i}"),
                                    0,
                                    vec![bench(&format!("series-{t}"), 10.0, 0.0), bench("shared", 1.0, 0.0)],
                                ),
                                false,
                            )
                            .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 9);
        assert_eq!(store.get_series("shared").unwrap().len(), 400);
        for t in 0..8 {
            let points = store.get_series(&format!("series-{t}")).unwrap();
            let ids: Vec<String> = points.iter().map(|p| p.commit.id.clone()).collect();
            let expected: Vec<String> = (0..50).map(|i| format!("t{t}-c{i}")).collect();
            assert_eq!(ids, expected);
        }
    }
}
