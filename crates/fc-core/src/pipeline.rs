//! One ingestion run, end to end.
//!
//! Fetch → type → filter → snapshot → timeline merge, then the same filtered
//! records → directory merge. Every failure aborts the run; nothing is
//! retried or skipped.

use crate::fetch::{HttpSource, InstanceSource};
use crate::ingest::{build_snapshot, filter_records, Batch, TemporalWindow};
use crate::merge::{append_timeline, merge_directory, DirectoryMerge, TimelineMerge};
use chrono::{DateTime, TimeDelta, Utc};
use fc_common::{DirectoryEntry, Result, RunId, TimelineEntry};
use fc_config::{ApiToken, Settings, DEFAULT_WINDOW_SECS};
use fc_store::{ParquetTable, TableStore};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, info_span, warn};

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub run_id: RunId,
    pub fetched: usize,
    pub typed: usize,
    pub retained: usize,
    pub reference_time: DateTime<Utc>,
    pub update_at: Option<DateTime<Utc>>,
    pub timeline: TimelineMerge,
    pub directory: DirectoryMerge,
}

/// The run's collaborators: a record source and the two stores.
pub struct Pipeline<S, T, D> {
    source: S,
    timeline: T,
    directory: D,
    half_width: TimeDelta,
}

impl<S, T, D> Pipeline<S, T, D>
where
    S: InstanceSource,
    T: TableStore<Row = TimelineEntry>,
    D: TableStore<Row = DirectoryEntry>,
{
    pub fn new(source: S, timeline: T, directory: D) -> Self {
        Self {
            source,
            timeline,
            directory,
            half_width: TimeDelta::seconds(DEFAULT_WINDOW_SECS as i64),
        }
    }

    /// Half-width of the temporal filter window.
    pub fn with_window(mut self, half_width: TimeDelta) -> Self {
        self.half_width = half_width;
        self
    }

    pub fn timeline(&self) -> &T {
        &self.timeline
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn run(&self, run_id: RunId) -> Result<RunSummary> {
        let span = info_span!("run", run_id = %run_id);
        let _enter = span.enter();

        let raw = self.source.fetch()?;
        let fetched = raw.len();

        let batch = Batch::from_raw(raw)?;
        let reference_time = batch.reference_time;
        let typed = batch.records.len();
        let window = TemporalWindow::around(reference_time, self.half_width);
        let retained = filter_records(batch.records, &window);

        let snapshot = build_snapshot(&retained, reference_time);
        let update_at = snapshot.first().map(|e| e.update_at);
        let timeline = append_timeline(&self.timeline, snapshot)?;

        let names = retained.iter().map(DirectoryEntry::from).collect();
        let directory = merge_directory(&self.directory, names)?;

        info!(
            fetched,
            typed,
            retained = retained.len(),
            reference_time = %reference_time,
            "run complete"
        );
        Ok(RunSummary {
            run_id,
            fetched,
            typed,
            retained: retained.len(),
            reference_time,
            update_at,
            timeline,
            directory,
        })
    }
}

/// Run once against the configured endpoint and store files.
///
/// The token is checked before anything else, so a missing token fails
/// without network traffic or store access.
pub fn run_once(settings: &Settings) -> Result<RunSummary> {
    let token = ApiToken::from_env(&settings.token_env)?;
    run_with_token(settings, token)
}

pub fn run_with_token(settings: &Settings, token: ApiToken) -> Result<RunSummary> {
    let source = HttpSource::new(settings.request_url(), token, settings.timeout());
    let pipeline = Pipeline::new(
        source,
        ParquetTable::<TimelineEntry>::new(settings.timeline_path()),
        ParquetTable::<DirectoryEntry>::new(settings.directory_path()),
    )
    .with_window(TimeDelta::seconds(settings.window_secs as i64));

    pipeline.run(RunId::new())
}

/// Outcome of store initialisation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
    pub existing: Vec<PathBuf>,
}

/// Create whichever stores are missing, leaving existing ones alone.
///
/// This is a setup step; `run` never creates stores.
pub fn init_stores(settings: &Settings) -> Result<InitReport> {
    let mut report = InitReport::default();

    let timeline = ParquetTable::<TimelineEntry>::new(settings.timeline_path());
    init_one(timeline.path().to_path_buf(), || timeline.create_empty(), &mut report)?;

    let directory = ParquetTable::<DirectoryEntry>::new(settings.directory_path());
    init_one(directory.path().to_path_buf(), || directory.create_empty(), &mut report)?;

    Ok(report)
}

fn init_one<F>(path: PathBuf, create: F, report: &mut InitReport) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    if path.exists() {
        warn!(path = %path.display(), "store exists, leaving it untouched");
        report.existing.push(path);
    } else {
        create()?;
        info!(path = %path.display(), "store created");
        report.created.push(path);
    }
    Ok(())
}
