//! Local integrity diffing against a decoded manifest.
//!
//! For every [`FileRecord`] the differ decides whether the local copy can be
//! kept. Missing files, checksum mismatches and unreadable files all produce
//! an [`UpdateTask`]; matching files produce nothing.

use std::fs;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::checksum::file_crc32;
use crate::error::SyncResult;
use crate::install::InstallTree;
use crate::manifest::FileRecord;
use crate::pool::worker_pool;
use crate::urls::PatchUrls;

/// A file that must be (re)downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UpdateTask {
    /// Path relative to the install root.
    pub relative_path: String,
    /// Where to fetch it from.
    pub remote_url: String,
}

/// Why a record needs an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    UpToDate,
    Missing,
    Mismatch,
    Unreadable,
}

/// Outcome of diffing one manifest against the install tree.
#[derive(Debug, Clone, Default)]
pub struct DiffReport {
    /// Files to download. Order is unspecified.
    pub tasks: Vec<UpdateTask>,
    pub up_to_date: usize,
    pub missing: usize,
    pub mismatched: usize,
    pub unreadable: usize,
}

impl DiffReport {
    pub fn checked(&self) -> usize {
        self.up_to_date + self.missing + self.mismatched + self.unreadable
    }
}

/// Compares manifest records with what is on disk.
#[derive(Debug, Clone)]
pub struct IntegrityDiffer {
    install: InstallTree,
    urls: PatchUrls,
    concurrency: usize,
}

impl IntegrityDiffer {
    pub fn new(install: InstallTree, urls: PatchUrls, concurrency: usize) -> Self {
        Self {
            install,
            urls,
            concurrency: concurrency.max(1),
        }
    }

    /// Check every record on a bounded worker pool.
    ///
    /// Parent directories of missing files are created as a side effect.
    pub fn diff(&self, records: &[FileRecord]) -> SyncResult<DiffReport> {
        let pool = worker_pool("verify", self.concurrency)?;
        let verdicts: Vec<(Verdict, &FileRecord)> = pool.install(|| {
            records
                .par_iter()
                .map(|record| (self.check(record), record))
                .collect()
        });

        let mut report = DiffReport::default();
        for (verdict, record) in verdicts {
            match verdict {
                Verdict::UpToDate => {
                    report.up_to_date += 1;
                    continue;
                }
                Verdict::Missing => report.missing += 1,
                Verdict::Mismatch => report.mismatched += 1,
                Verdict::Unreadable => report.unreadable += 1,
            }
            report.tasks.push(self.task_for(record));
        }
        Ok(report)
    }

    fn check(&self, record: &FileRecord) -> Verdict {
        let relative = record.relative_path();
        let path = self.install.resolve(&relative);

        if !path.is_file() {
            if let Some(parent) = path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!(path = %parent.display(), error = %e, "Failed to create directory");
                }
            }
            return Verdict::Missing;
        }

        match file_crc32(&path) {
            Ok(actual) if actual == record.expected_checksum => Verdict::UpToDate,
            Ok(actual) => {
                debug!(
                    path = %relative,
                    expected = %format!("{:08x}", record.expected_checksum),
                    actual = %format!("{:08x}", actual),
                    "Checksum mismatch"
                );
                Verdict::Mismatch
            }
            Err(e) => {
                debug!(path = %relative, error = %e, "Unreadable file, scheduling update");
                Verdict::Unreadable
            }
        }
    }

    fn task_for(&self, record: &FileRecord) -> UpdateTask {
        let relative_path = record.relative_path();
        UpdateTask {
            remote_url: self.urls.patch_file(
                &record.manifest_major,
                &record.manifest_minor,
                &relative_path,
            ),
            relative_path,
        }
    }
}
