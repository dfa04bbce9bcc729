// src/app/sources.rs
// Row source for the bundled "Worker Activity" dialog. Rows are derived from the wall
// clock so cyclic reload visibly changes them.

use crate::app::{
    dialog::TableSource,
    error::HookResult,
    reconcile::{RowTint, TableItemCreator, TableWidget},
    state::Row,
    utils::format_elapsed,
};
use chrono::{DateTime, Local};

/// Tint for idle workers.
const IDLE_TINT: RowTint = RowTint { r: 60, g: 60, b: 60 };

/// A simulated worker: how long before launch it started and how often it finishes a job.
#[derive(Debug, Clone)]
struct Worker {
    name: &'static str,
    started_before_launch: u64,
    job_seconds: u64,
    note: &'static str,
}

const WORKERS: &[Worker] = &[
    Worker { name: "indexer", started_before_launch: 40, job_seconds: 3, note: "" },
    Worker { name: "fetcher-1", started_before_launch: 95, job_seconds: 7, note: "rate limited" },
    Worker { name: "fetcher-2", started_before_launch: 4_000, job_seconds: 11, note: "" },
    Worker { name: "compactor", started_before_launch: 90_000, job_seconds: 120, note: "nightly" },
    Worker { name: "watchdog", started_before_launch: 5, job_seconds: 1, note: "" },
    Worker { name: "uploader", started_before_launch: 3_650, job_seconds: 30, note: "retrying" },
];

/// Greys out idle rows.
#[derive(Debug, Default)]
pub struct StatusTint;

impl StatusTint {
    fn apply(widget: &mut dyn TableWidget, row: &Row, index: usize) {
        let idle = row.get(WorkerActivitySource::STATUS_COLUMN).map(String::as_str) == Some("idle");
        widget.set_item_tint(index, idle.then_some(IDLE_TINT));
    }
}

impl TableItemCreator for StatusTint {
    fn create(&mut self, widget: &mut dyn TableWidget, row: &Row, index: usize) -> HookResult {
        Self::apply(widget, row, index);
        Ok(())
    }

    fn update(&mut self, widget: &mut dyn TableWidget, row: &Row, index: usize) -> HookResult {
        Self::apply(widget, row, index);
        Ok(())
    }
}

#[derive(Debug)]
pub struct WorkerActivitySource {
    launched_at: DateTime<Local>,
    tint: StatusTint,
}

impl WorkerActivitySource {
    pub const STATUS_COLUMN: usize = 4;

    pub fn new() -> Self {
        Self::launched_at(Local::now())
    }

    pub fn launched_at(launched_at: DateTime<Local>) -> Self {
        Self {
            launched_at,
            tint: StatusTint,
        }
    }

    /// Builds the body as of `now`.
    pub fn rows_at(&self, now: DateTime<Local>) -> Vec<Row> {
        let since_launch = (now - self.launched_at).num_seconds().max(0) as u64;
        WORKERS
            .iter()
            .enumerate()
            .map(|(i, worker)| {
                let uptime = since_launch + worker.started_before_launch;
                let jobs = uptime / worker.job_seconds;
                let status = if jobs % 3 == 0 { "idle" } else { "busy" };
                vec![
                    (i + 1).to_string(),
                    worker.name.to_string(),
                    format_elapsed(uptime),
                    jobs.to_string(),
                    status.to_string(),
                    worker.note.to_string(),
                    now.format("%H:%M:%S").to_string(),
                ]
            })
            .collect()
    }
}

impl Default for WorkerActivitySource {
    fn default() -> Self {
        Self::new()
    }
}

impl TableSource for WorkerActivitySource {
    fn title(&self) -> String {
        "Worker Activity".to_string()
    }

    fn table_header(&self) -> Vec<String> {
        ["No.", "Worker", "Uptime", "Jobs", "Status", "Note", "Updated"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn update_table_body(&mut self) -> Vec<Row> {
        self.rows_at(Local::now())
    }

    fn item_creator(&mut self) -> &mut dyn TableItemCreator {
        &mut self.tint
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn rows_align_with_header() {
        let source = WorkerActivitySource::new();
        let header = source.table_header();
        let rows = source.rows_at(Local::now());
        assert_eq!(rows.len(), WORKERS.len());
        assert!(rows.iter().all(|r| r.len() == header.len()));
        assert_eq!(header[WorkerActivitySource::STATUS_COLUMN], "Status");
    }

    #[test]
    fn uptime_grows_with_time() {
        let launched = Local::now();
        let source = WorkerActivitySource::launched_at(launched);
        let rows = source.rows_at(launched + Duration::seconds(20));
        // watchdog started 5s before launch
        assert_eq!(rows[4][2], "25秒");
        assert_eq!(rows[4][3], "25");
    }
}
