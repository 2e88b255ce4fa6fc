//! Concurrent download of update tasks into the install tree.
//!
//! Every task is attempted exactly once. Failures are collected into the
//! [`DownloadReport`] instead of being returned as errors: a file that could
//! not be fetched stays stale and is picked up again by the next sync.

use std::fs;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::diff::UpdateTask;
use crate::error::{SyncError, SyncResult};
use crate::http::HttpClient;
use crate::install::InstallTree;
use crate::pool::worker_pool;

/// A task that was not completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDownload {
    pub relative_path: String,
    pub reason: String,
}

/// Result of a download batch.
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Files written.
    pub downloaded: usize,
    /// Bytes written across all files.
    pub bytes: u64,
    /// Tasks that failed, with the reason.
    pub skipped: Vec<SkippedDownload>,
}

impl DownloadReport {
    pub fn has_failures(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Fetches patch files and writes them under the install root.
pub struct PatchDownloader {
    client: Arc<dyn HttpClient>,
    install: InstallTree,
    concurrency: usize,
}

impl PatchDownloader {
    pub fn new(client: Arc<dyn HttpClient>, install: InstallTree, concurrency: usize) -> Self {
        Self {
            client,
            install,
            concurrency: concurrency.max(1),
        }
    }

    /// Download all tasks on a bounded worker pool and wait for them.
    ///
    /// Only fails if the pool itself cannot be started.
    pub fn download_all(&self, tasks: &[UpdateTask]) -> SyncResult<DownloadReport> {
        let pool = worker_pool("download", self.concurrency)?;
        let results: Vec<(&UpdateTask, SyncResult<u64>)> = pool.install(|| {
            tasks
                .par_iter()
                .map(|task| (task, self.download(task)))
                .collect()
        });

        let mut report = DownloadReport::default();
        for (task, result) in results {
            match result {
                Ok(bytes) => {
                    report.downloaded += 1;
                    report.bytes += bytes;
                }
                Err(e) => {
                    debug!(path = %task.relative_path, error = %e, "Download skipped");
                    report.skipped.push(SkippedDownload {
                        relative_path: task.relative_path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Fetch one task and overwrite its destination with the body.
    fn download(&self, task: &UpdateTask) -> SyncResult<u64> {
        let body = self.client.get(&task.remote_url)?;

        let dest = self.install.resolve(&task.relative_path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
        }
        fs::write(&dest, &body).map_err(|e| SyncError::io(&dest, e))?;

        info!(path = %task.relative_path, bytes = body.len(), "Downloaded");
        Ok(body.len() as u64)
    }
}
