//! Sync states, context and outcomes

use std::fmt;
use std::ops::RangeInclusive;

use crate::diff::DiffReport;
use crate::download::DownloadReport;
use crate::install::InstallTree;
use crate::urls::PatchUrls;
use crate::version::VersionInfo;

/// Which native program a launch step starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    /// `LAUNCHER.exe`, which installs the client.
    Launcher,
    /// `CLOSERS.exe`, which writes the manifests.
    Client,
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchTarget::Launcher => write!(f, "launcher"),
            LaunchTarget::Client => write!(f, "client"),
        }
    }
}

/// Observable state of a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    ResolvingVersion,
    LocatingLauncher,
    Launching(LaunchTarget),
    PollingForManifest,
    Syncing,
    Finalizing,
    Done,
    Failed,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncState::ResolvingVersion => write!(f, "resolving version"),
            SyncState::LocatingLauncher => write!(f, "locating launcher"),
            SyncState::Launching(target) => write!(f, "launching {}", target),
            SyncState::PollingForManifest => write!(f, "polling for client"),
            SyncState::Syncing => write!(f, "syncing"),
            SyncState::Finalizing => write!(f, "finalizing"),
            SyncState::Done => write!(f, "done"),
            SyncState::Failed => write!(f, "failed"),
        }
    }
}

/// Everything fixed once the release version is known.
///
/// Built once per run and only read afterwards.
#[derive(Debug, Clone)]
pub struct SyncContext {
    pub install: InstallTree,
    pub version: VersionInfo,
    pub urls: PatchUrls,
    pub code_range: RangeInclusive<u32>,
}

/// What happened for one code-table index.
#[derive(Debug, Clone, Default)]
pub struct IndexReport {
    pub index: u32,
    /// Why the manifest could not be decoded, if it could not.
    pub unavailable: Option<String>,
    /// Manifest rows skipped as undecodable.
    pub rejected_rows: usize,
    pub diff: DiffReport,
    pub download: DownloadReport,
}

/// Summary of a completed sync.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub version: VersionInfo,
    /// One entry per code-table index, in processing order.
    pub indices: Vec<IndexReport>,
    /// Bootstrap archives unpacked while the client ran.
    pub archives_extracted: usize,
    /// Extraction attempts that found an archive not yet usable.
    pub archive_retries: usize,
}

impl SyncReport {
    pub fn new(version: VersionInfo) -> Self {
        Self {
            version,
            indices: Vec::new(),
            archives_extracted: 0,
            archive_retries: 0,
        }
    }

    pub fn files_checked(&self) -> usize {
        self.indices.iter().map(|i| i.diff.checked()).sum()
    }

    pub fn files_downloaded(&self) -> usize {
        self.indices.iter().map(|i| i.download.downloaded).sum()
    }

    pub fn bytes_downloaded(&self) -> u64 {
        self.indices.iter().map(|i| i.download.bytes).sum()
    }

    pub fn downloads_skipped(&self) -> usize {
        self.indices.iter().map(|i| i.download.skipped.len()).sum()
    }

    pub fn unavailable_manifests(&self) -> usize {
        self.indices.iter().filter(|i| i.unavailable.is_some()).count()
    }
}

/// Why a sync stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    /// State the run was in when it failed.
    pub state: SyncState,
    pub reason: String,
    /// Exit code of the native process, when its exit caused the failure.
    pub exit_code: Option<i32>,
}

impl SyncFailure {
    pub fn new(state: SyncState, reason: impl Into<String>) -> Self {
        Self {
            state,
            reason: reason.into(),
            exit_code: None,
        }
    }

    pub fn with_exit_code(mut self, code: Option<i32>) -> Self {
        self.exit_code = code;
        self
    }
}

impl fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sync failed while {}: {}", self.state, self.reason)?;
        if let Some(code) = self.exit_code {
            write!(f, " (exit code {})", code)?;
        }
        Ok(())
    }
}

/// Terminal result of [`SyncOrchestrator::run`](super::SyncOrchestrator::run).
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    Done(SyncReport),
    Failed(SyncFailure),
}

impl SyncOutcome {
    pub fn is_done(&self) -> bool {
        matches!(self, SyncOutcome::Done(_))
    }

    /// Process exit code for a command-line front end.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncOutcome::Done(_) => 0,
            SyncOutcome::Failed(_) => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failure = SyncFailure::new(SyncState::Syncing, "client exited")
            .with_exit_code(Some(7));
        assert_eq!(
            failure.to_string(),
            "sync failed while syncing: client exited (exit code 7)"
        );
    }

    #[test]
    fn test_report_totals() {
        let mut report = SyncReport::new(VersionInfo::new("1055", "7"));
        report.indices.push(IndexReport {
            index: 0,
            download: DownloadReport {
                downloaded: 2,
                bytes: 10,
                skipped: vec![],
            },
            ..Default::default()
        });
        report.indices.push(IndexReport {
            index: 1,
            unavailable: Some("no output".to_string()),
            ..Default::default()
        });

        assert_eq!(report.files_downloaded(), 2);
        assert_eq!(report.bytes_downloaded(), 10);
        assert_eq!(report.unavailable_manifests(), 1);
        assert_eq!(SyncOutcome::Done(report).exit_code(), 0);
    }
}
