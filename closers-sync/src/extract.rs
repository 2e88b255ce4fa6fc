//! Extraction of bootstrap archives dropped into the install tree.
//!
//! The launcher ships part of the client as `CLIENT_CLOSERS_{n}.zip`. Once
//! such an archive appears it is:
//! - Validated (every entry read and checked against its stored CRC)
//! - Extracted into the install root on a bounded worker pool
//! - Deleted
//!
//! A failed validation leaves the tree untouched so the next poll can try
//! again once the launcher has finished writing the file.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{SyncError, SyncResult};
use crate::install::InstallTree;
use crate::pool::worker_pool;

/// Result of one extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// No archive candidate is present.
    NoArchive,
    /// The archive was unpacked and deleted.
    Extracted { archive: PathBuf, entries: usize },
    /// The archive could not be used yet; nothing was deleted.
    Failed { archive: PathBuf, reason: String },
}

impl ExtractOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Unpacks bootstrap archives into the install tree.
#[derive(Debug, Clone)]
pub struct ArchiveExtractor {
    install: InstallTree,
    concurrency: usize,
}

impl ArchiveExtractor {
    pub fn new(install: InstallTree, concurrency: usize) -> Self {
        Self {
            install,
            concurrency: concurrency.max(1),
        }
    }

    /// Extract the first archive candidate present, if any.
    pub fn extract_pending(&self) -> ExtractOutcome {
        let Some(archive) = self.install.find_archive() else {
            return ExtractOutcome::NoArchive;
        };

        let started = Instant::now();
        info!(archive = %archive.display(), "Loading archive");

        match self.extract(&archive) {
            Ok(entries) => {
                info!(
                    archive = %archive.display(),
                    entries,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Archive extracted"
                );
                ExtractOutcome::Extracted { archive, entries }
            }
            Err(e) => {
                debug!(archive = %archive.display(), error = %e, "Archive not ready");
                ExtractOutcome::Failed {
                    reason: e.to_string(),
                    archive,
                }
            }
        }
    }

    /// Validate, extract and delete `archive`. Returns the number of entries.
    pub fn extract(&self, archive: &Path) -> SyncResult<usize> {
        let entries = validate_archive(archive)?;
        let root = self.install.root();

        let pool = worker_pool("extract", self.concurrency)?;
        let written: usize = pool.install(|| {
            (0..entries)
                .into_par_iter()
                .map_init(
                    || open_archive(archive),
                    |opened, index| match opened {
                        Ok(zip) => extract_entry(zip, index, root, archive),
                        Err(e) => Err(archive_error(archive, e.to_string())),
                    },
                )
                .collect::<SyncResult<Vec<()>>>()
                .map(|done| done.len())
        })?;

        fs::remove_file(archive).map_err(|e| SyncError::io(archive, e))?;
        Ok(written)
    }
}

fn archive_error(archive: &Path, reason: impl Into<String>) -> SyncError {
    SyncError::Archive {
        path: archive.to_path_buf(),
        reason: reason.into(),
    }
}

fn open_archive(archive: &Path) -> SyncResult<ZipArchive<File>> {
    let file = File::open(archive).map_err(|e| SyncError::io(archive, e))?;
    ZipArchive::new(file).map_err(|e| archive_error(archive, e.to_string()))
}

/// Read every entry to the end so each stored CRC is checked, and refuse
/// entries whose names would land outside the install root.
///
/// Returns the number of entries.
pub fn validate_archive(archive: &Path) -> SyncResult<usize> {
    let mut zip = open_archive(archive)?;
    for index in 0..zip.len() {
        let mut entry = zip
            .by_index(index)
            .map_err(|e| archive_error(archive, e.to_string()))?;
        let name = entry.name().to_string();
        if entry.enclosed_name().is_none() {
            return Err(archive_error(archive, format!("unsafe entry name {}", name)));
        }
        io::copy(&mut entry, &mut io::sink())
            .map_err(|e| archive_error(archive, format!("entry {}: {}", name, e)))?;
    }
    Ok(zip.len())
}

fn extract_entry(
    zip: &mut ZipArchive<File>,
    index: usize,
    root: &Path,
    archive: &Path,
) -> SyncResult<()> {
    let mut entry = zip
        .by_index(index)
        .map_err(|e| archive_error(archive, e.to_string()))?;
    let relative = entry
        .enclosed_name()
        .ok_or_else(|| archive_error(archive, format!("unsafe entry name {}", entry.name())))?;
    let dest = root.join(relative);

    if entry.is_dir() {
        return fs::create_dir_all(&dest).map_err(|e| SyncError::io(&dest, e));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    let mut out = File::create(&dest).map_err(|e| SyncError::io(&dest, e))?;
    io::copy(&mut entry, &mut out).map_err(|e| SyncError::io(&dest, e))?;
    Ok(())
}
