//! The sync state machine.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::types::{
    IndexReport, LaunchTarget, SyncContext, SyncFailure, SyncOutcome, SyncReport, SyncState,
};
use crate::config::SyncConfig;
use crate::diff::IntegrityDiffer;
use crate::download::PatchDownloader;
use crate::error::SyncResult;
use crate::extract::{ArchiveExtractor, ExtractOutcome};
use crate::http::HttpClient;
use crate::install::{InstallTree, CLIENT_EXE, LAUNCHER_EXE};
use crate::manifest::{ManifestDecoder, ManifestOutcome};
use crate::process::{launch_args, ProcessLauncher, RunningProcess};
use crate::urls::PatchUrls;
use crate::version::{read_version_file, write_version_file, VersionInfo, VersionResolver};

/// A state together with what it owns.
enum Stage {
    LocatingLauncher,
    Launching(LaunchTarget),
    PollingForManifest(Box<dyn RunningProcess>),
    Syncing {
        process: Box<dyn RunningProcess>,
        markers_seen: bool,
    },
    Finalizing,
    Done,
    Failed(SyncFailure),
}

impl Stage {
    fn state(&self) -> SyncState {
        match self {
            Stage::LocatingLauncher => SyncState::LocatingLauncher,
            Stage::Launching(target) => SyncState::Launching(*target),
            Stage::PollingForManifest(_) => SyncState::PollingForManifest,
            Stage::Syncing { .. } => SyncState::Syncing,
            Stage::Finalizing => SyncState::Finalizing,
            Stage::Done => SyncState::Done,
            Stage::Failed(_) => SyncState::Failed,
        }
    }
}

/// Next stage and how long to wait before running it.
type Step = (Stage, Option<Duration>);

fn fail(state: SyncState, reason: impl Into<String>) -> Step {
    (Stage::Failed(SyncFailure::new(state, reason)), None)
}

/// Runs one full sync cycle.
///
/// All collaborators are injected so the state machine can be driven by
/// fakes in tests.
pub struct SyncOrchestrator {
    config: SyncConfig,
    client: Arc<dyn HttpClient>,
    decoder: Arc<dyn ManifestDecoder>,
    launcher: Arc<dyn ProcessLauncher>,
}

impl SyncOrchestrator {
    pub fn new(
        config: SyncConfig,
        client: Arc<dyn HttpClient>,
        decoder: Arc<dyn ManifestDecoder>,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> Self {
        Self {
            config,
            client,
            decoder,
            launcher,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run until the install is synced or the run fails.
    ///
    /// This is the only place that sleeps.
    pub fn run(&self) -> SyncOutcome {
        let ctx = match self.prepare() {
            Ok(ctx) => ctx,
            Err(e) => {
                return SyncOutcome::Failed(SyncFailure::new(
                    SyncState::ResolvingVersion,
                    e.to_string(),
                ))
            }
        };

        let mut report = SyncReport::new(ctx.version.clone());
        let mut stage = Stage::LocatingLauncher;
        loop {
            let from = stage.state();
            let (next, wait) = self.step(&ctx, stage, &mut report);

            let to = next.state();
            if to != from {
                debug!(from = %from, to = %to, "State transition");
            }
            stage = match next {
                Stage::Done => {
                    info!(
                        version = %report.version,
                        checked = report.files_checked(),
                        downloaded = report.files_downloaded(),
                        skipped = report.downloads_skipped(),
                        "Sync complete"
                    );
                    return SyncOutcome::Done(report);
                }
                Stage::Failed(failure) => {
                    warn!(state = %failure.state, reason = %failure.reason, "Sync failed");
                    return SyncOutcome::Failed(failure);
                }
                other => other,
            };

            if let Some(wait) = wait {
                thread::sleep(wait);
            }
        }
    }

    /// Resolve the release version and fix the run's context.
    fn prepare(&self) -> SyncResult<SyncContext> {
        self.config.validate()?;

        let urls = PatchUrls::new(self.config.base_url.as_str());
        let version = VersionResolver::new(self.client.as_ref(), &urls).resolve()?;
        let install = InstallTree::new(&self.config.install_dir);

        match read_version_file(&install.version_file()) {
            Ok(current) => info!(current = %current, latest = %version, "Release version"),
            Err(_) => info!(latest = %version, "Release version"),
        }

        Ok(SyncContext {
            install,
            version,
            urls,
            code_range: self.config.code_range(),
        })
    }

    fn step(&self, ctx: &SyncContext, stage: Stage, report: &mut SyncReport) -> Step {
        match stage {
            Stage::LocatingLauncher => self.locate(ctx),
            Stage::Launching(target) => self.launch(ctx, target),
            Stage::PollingForManifest(process) => self.poll_for_client(ctx, process),
            Stage::Syncing {
                process,
                markers_seen,
            } => self.sync_tick(ctx, process, markers_seen, report),
            Stage::Finalizing => self.finalize(ctx),
            done @ (Stage::Done | Stage::Failed(_)) => (done, None),
        }
    }

    fn locate(&self, ctx: &SyncContext) -> Step {
        if ctx.install.client_exe().is_file() {
            info!(path = %ctx.install.client_exe().display(), "Found client");
            return (Stage::Launching(LaunchTarget::Client), None);
        }

        let launcher = ctx.install.launcher_exe();
        if !launcher.is_file() {
            return fail(
                SyncState::LocatingLauncher,
                format!("{} not found in {}", LAUNCHER_EXE, ctx.install.root().display()),
            );
        }
        if !self.decoder.is_available() {
            return fail(
                SyncState::LocatingLauncher,
                format!("manifest decoder {} not found", self.config.decoder_path.display()),
            );
        }

        info!(path = %launcher.display(), "Found launcher");
        (Stage::Launching(LaunchTarget::Launcher), None)
    }

    fn launch(&self, ctx: &SyncContext, target: LaunchTarget) -> Step {
        let state = SyncState::Launching(target);
        if let Err(e) = write_version_file(&ctx.install.version_file(), &VersionInfo::placeholder())
        {
            return fail(state, e.to_string());
        }

        let program = match target {
            LaunchTarget::Launcher => ctx.install.launcher_exe(),
            LaunchTarget::Client => ctx.install.client_exe(),
        };
        let args = launch_args(&self.config.launcher_token);
        let process = match self.launcher.spawn(&program, &args) {
            Ok(process) => process,
            Err(e) => return fail(state, e.to_string()),
        };
        info!(program = %program.display(), "Started {}", target);

        match target {
            LaunchTarget::Launcher => (
                Stage::PollingForManifest(process),
                Some(self.config.launcher_poll_interval),
            ),
            LaunchTarget::Client => (
                Stage::Syncing {
                    process,
                    markers_seen: false,
                },
                Some(self.config.client_poll_interval),
            ),
        }
    }

    fn poll_for_client(&self, ctx: &SyncContext, mut process: Box<dyn RunningProcess>) -> Step {
        let state = SyncState::PollingForManifest;
        match process.try_wait() {
            Ok(Some(status)) => {
                let (stage, wait) = fail(state, "launcher exited before the client was installed");
                return (with_exit_code(stage, status.code), wait);
            }
            Ok(None) => {}
            Err(e) => {
                kill_quietly(process.as_mut());
                return fail(state, e.to_string());
            }
        }

        if !ctx.install.client_exe().is_file() {
            return (
                Stage::PollingForManifest(process),
                Some(self.config.launcher_poll_interval),
            );
        }

        info!("Client installed, restarting through the client");
        kill_quietly(process.as_mut());
        self.launcher.kill_by_name(LAUNCHER_EXE);
        self.launcher.kill_by_name(CLIENT_EXE);
        (Stage::Launching(LaunchTarget::Client), None)
    }

    fn sync_tick(
        &self,
        ctx: &SyncContext,
        mut process: Box<dyn RunningProcess>,
        markers_seen: bool,
        report: &mut SyncReport,
    ) -> Step {
        let state = SyncState::Syncing;

        if markers_seen {
            kill_quietly(process.as_mut());
            return match self.sync_indices(ctx, report) {
                Ok(()) => (Stage::Finalizing, None),
                Err(e) => fail(state, e.to_string()),
            };
        }

        match process.try_wait() {
            Ok(Some(status)) => {
                let (stage, wait) = fail(state, "client exited before writing its manifests");
                return (with_exit_code(stage, status.code), wait);
            }
            Ok(None) => {}
            Err(e) => {
                kill_quietly(process.as_mut());
                return fail(state, e.to_string());
            }
        }

        let extractor = ArchiveExtractor::new(ctx.install.clone(), self.config.concurrency);
        match extractor.extract_pending() {
            ExtractOutcome::NoArchive => {}
            ExtractOutcome::Extracted { .. } => report.archives_extracted += 1,
            ExtractOutcome::Failed { .. } => report.archive_retries += 1,
        }

        if ctx.install.manifests_present(ctx.code_range.clone()) {
            info!("Manifests written, stopping client");
            return (
                Stage::Syncing {
                    process,
                    markers_seen: true,
                },
                Some(self.config.marker_grace),
            );
        }

        (
            Stage::Syncing {
                process,
                markers_seen: false,
            },
            Some(self.config.client_poll_interval),
        )
    }

    /// Decode, diff and download each index in increasing order.
    fn sync_indices(&self, ctx: &SyncContext, report: &mut SyncReport) -> SyncResult<()> {
        let differ = IntegrityDiffer::new(
            ctx.install.clone(),
            ctx.urls.clone(),
            self.config.concurrency,
        );
        let downloader = PatchDownloader::new(
            Arc::clone(&self.client),
            ctx.install.clone(),
            self.config.concurrency,
        );
        let total = ctx.code_range.clone().count();

        for (position, index) in ctx.code_range.clone().enumerate() {
            let mut entry = IndexReport {
                index,
                ..Default::default()
            };

            let records = match self.decoder.decode(&ctx.install.manifest_file(index)) {
                ManifestOutcome::Decoded { records, rejected } => {
                    entry.rejected_rows = rejected;
                    records
                }
                ManifestOutcome::Unavailable { reason } => {
                    warn!(index, reason = %reason, "Manifest unavailable, nothing to check");
                    entry.unavailable = Some(reason);
                    Vec::new()
                }
            };

            entry.diff = differ.diff(&records)?;
            info!(
                index,
                checked = entry.diff.checked(),
                updates = entry.diff.tasks.len(),
                "Checked manifest {}/{}",
                position + 1,
                total
            );

            entry.download = downloader.download_all(&entry.diff.tasks)?;
            if entry.download.has_failures() {
                warn!(
                    index,
                    skipped = entry.download.skipped.len(),
                    "Some files could not be downloaded"
                );
            }
            report.indices.push(entry);
        }
        Ok(())
    }

    fn finalize(&self, ctx: &SyncContext) -> Step {
        match write_version_file(&ctx.install.version_file(), &ctx.version) {
            Ok(()) => (Stage::Done, None),
            Err(e) => fail(SyncState::Finalizing, e.to_string()),
        }
    }
}

fn with_exit_code(stage: Stage, code: Option<i32>) -> Stage {
    match stage {
        Stage::Failed(failure) => Stage::Failed(failure.with_exit_code(code)),
        other => other,
    }
}

fn kill_quietly(process: &mut dyn RunningProcess) {
    if let Err(e) = process.kill() {
        warn!(error = %e, "Failed to stop process");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::bytes_crc32;
    use crate::error::SyncError;
    use crate::http::tests::MockHttpClient;
    use crate::manifest::FileRecord;
    use crate::process::ExitStatus;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::TempDir;

    const BASE: &str = "http://patch.local";
    const VERSION_BODY: &[u8] = b"[Ver]\nMVer=1055\nTime=7\nCrc=0\n";

    type Files = Vec<(String, Vec<u8>)>;

    /// What a fake native process does while it is polled.
    #[derive(Clone)]
    enum Script {
        /// On poll `n`, write the files listed for `n` (relative to the
        /// install root).
        Write(Vec<(usize, Files)>),
        /// Exit with `code` on poll `after`.
        Exit { after: usize, code: i32 },
    }

    fn write_on(poll: usize, files: Files) -> Script {
        Script::Write(vec![(poll, files)])
    }

    struct FakeProcess {
        root: PathBuf,
        script: Script,
        polls: usize,
        killed: bool,
    }

    impl RunningProcess for FakeProcess {
        fn try_wait(&mut self) -> SyncResult<Option<ExitStatus>> {
            if self.killed {
                return Ok(Some(ExitStatus { code: None }));
            }
            self.polls += 1;
            match &self.script {
                Script::Write(steps) => {
                    let due = steps.iter().filter(|(poll, _)| *poll == self.polls);
                    for (relative, body) in due.flat_map(|(_, files)| files) {
                        let path = self.root.join(relative);
                        fs::create_dir_all(path.parent().unwrap()).unwrap();
                        fs::write(path, body).unwrap();
                    }
                    Ok(None)
                }
                Script::Exit { after, code } if self.polls >= *after => {
                    Ok(Some(ExitStatus { code: Some(*code) }))
                }
                Script::Exit { .. } => Ok(None),
            }
        }

        fn kill(&mut self) -> SyncResult<()> {
            self.killed = true;
            Ok(())
        }
    }

    struct FakeLauncher {
        root: PathBuf,
        launcher: Script,
        client: Script,
        spawned: Mutex<Vec<(String, Vec<String>)>>,
        killed_by_name: Mutex<Vec<String>>,
    }

    impl FakeLauncher {
        fn new(root: &Path, launcher: Script, client: Script) -> Self {
            Self {
                root: root.to_path_buf(),
                launcher,
                client,
                spawned: Mutex::new(Vec::new()),
                killed_by_name: Mutex::new(Vec::new()),
            }
        }

        fn spawned_names(&self) -> Vec<String> {
            self.spawned
                .lock()
                .unwrap()
                .iter()
                .map(|(name, _)| name.clone())
                .collect()
        }
    }

    impl ProcessLauncher for FakeLauncher {
        fn spawn(&self, program: &Path, args: &[String]) -> SyncResult<Box<dyn RunningProcess>> {
            let name = program.file_name().unwrap().to_string_lossy().into_owned();
            if !program.is_file() {
                return Err(SyncError::Process {
                    program: name,
                    reason: "not found".to_string(),
                });
            }
            self.spawned
                .lock()
                .unwrap()
                .push((name.clone(), args.to_vec()));
            let script = if name == LAUNCHER_EXE {
                self.launcher.clone()
            } else {
                self.client.clone()
            };
            Ok(Box::new(FakeProcess {
                root: self.root.clone(),
                script,
                polls: 0,
                killed: false,
            }))
        }

        fn kill_by_name(&self, image: &str) {
            self.killed_by_name.lock().unwrap().push(image.to_string());
        }
    }

    /// Decoder returning canned outcomes keyed by manifest file name.
    struct CannedDecoder {
        outcomes: HashMap<String, ManifestOutcome>,
        available: bool,
        decoded: Mutex<Vec<String>>,
    }

    impl CannedDecoder {
        fn new() -> Self {
            Self {
                outcomes: HashMap::new(),
                available: true,
                decoded: Mutex::new(Vec::new()),
            }
        }

        fn with(mut self, index: u32, outcome: ManifestOutcome) -> Self {
            self.outcomes
                .insert(crate::install::manifest_file_name(index), outcome);
            self
        }
    }

    impl ManifestDecoder for CannedDecoder {
        fn decode(&self, manifest_path: &Path) -> ManifestOutcome {
            let name = manifest_path
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned();
            self.decoded.lock().unwrap().push(name.clone());
            self.outcomes
                .get(&name)
                .cloned()
                .unwrap_or(ManifestOutcome::Unavailable {
                    reason: "no output".to_string(),
                })
        }

        fn is_available(&self) -> bool {
            self.available
        }
    }

    fn record(dir: &str, name: &str, checksum: u32) -> FileRecord {
        FileRecord {
            relative_path_parts: vec![dir.to_string(), name.to_string()],
            expected_checksum: checksum,
            size_or_flags: vec![],
            manifest_major: "1055".to_string(),
            manifest_minor: "7".to_string(),
        }
    }

    fn markers() -> Files {
        (0..=2)
            .map(|i| (crate::install::manifest_file_name(i), b"encoded".to_vec()))
            .collect()
    }

    fn fast_config(root: &Path) -> SyncConfig {
        SyncConfig::new(root)
            .with_base_url(BASE)
            .with_concurrency(4)
            .with_poll_intervals(
                Duration::from_millis(1),
                Duration::from_millis(1),
                Duration::from_millis(1),
            )
    }

    fn orchestrator(
        root: &Path,
        client: MockHttpClient,
        decoder: CannedDecoder,
        launcher: Arc<FakeLauncher>,
    ) -> SyncOrchestrator {
        SyncOrchestrator::new(
            fast_config(root),
            Arc::new(client),
            Arc::new(decoder),
            launcher,
        )
    }

    fn idle() -> Script {
        Script::Exit {
            after: usize::MAX,
            code: 0,
        }
    }

    #[test]
    fn test_version_failure_stops_before_launch() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CLIENT_EXE), b"").unwrap();
        let launcher = Arc::new(FakeLauncher::new(temp.path(), idle(), idle()));

        let outcome = orchestrator(
            temp.path(),
            MockHttpClient::default(),
            CannedDecoder::new(),
            launcher.clone(),
        )
        .run();

        match outcome {
            SyncOutcome::Failed(failure) => assert_eq!(failure.state, SyncState::ResolvingVersion),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(launcher.spawned_names().is_empty());
        assert!(!temp.path().join("VER.DLL").exists());
    }

    #[test]
    fn test_missing_launcher_fails() {
        let temp = TempDir::new().unwrap();
        let launcher = Arc::new(FakeLauncher::new(temp.path(), idle(), idle()));
        let client = MockHttpClient::default().with(&format!("{}/VER.DLL", BASE), VERSION_BODY);

        let outcome = orchestrator(temp.path(), client, CannedDecoder::new(), launcher).run();

        match outcome {
            SyncOutcome::Failed(failure) => {
                assert_eq!(failure.state, SyncState::LocatingLauncher);
                assert!(failure.reason.contains(LAUNCHER_EXE));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_decoder_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LAUNCHER_EXE), b"").unwrap();
        let launcher = Arc::new(FakeLauncher::new(temp.path(), idle(), idle()));
        let client = MockHttpClient::default().with(&format!("{}/VER.DLL", BASE), VERSION_BODY);
        let mut decoder = CannedDecoder::new();
        decoder.available = false;

        let outcome = orchestrator(temp.path(), client, decoder, launcher.clone()).run();

        assert!(matches!(
            outcome,
            SyncOutcome::Failed(SyncFailure {
                state: SyncState::LocatingLauncher,
                ..
            })
        ));
        assert!(launcher.spawned_names().is_empty());
    }

    #[test]
    fn test_bootstrap_then_sync() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LAUNCHER_EXE), b"").unwrap();

        let launcher = Arc::new(FakeLauncher::new(
            temp.path(),
            write_on(2, vec![(CLIENT_EXE.to_string(), b"client".to_vec())]),
            write_on(2, markers()),
        ));
        let client = MockHttpClient::default()
            .with(&format!("{}/VER.DLL", BASE), VERSION_BODY)
            .with(&format!("{}/PATCH/PATCH_1055_7/DATA/a.pak", BASE), b"alpha");
        let decoder = CannedDecoder::new()
            .with(
                0,
                ManifestOutcome::Decoded {
                    records: vec![record("DATA/", "a.pak", bytes_crc32(b"alpha"))],
                    rejected: 1,
                },
            )
            .with(
                2,
                ManifestOutcome::Decoded {
                    records: vec![],
                    rejected: 0,
                },
            );
        let decoder = Arc::new(decoder);

        let orchestrator = SyncOrchestrator::new(
            fast_config(temp.path()),
            Arc::new(client),
            decoder.clone(),
            launcher.clone(),
        );
        let report = match orchestrator.run() {
            SyncOutcome::Done(report) => report,
            SyncOutcome::Failed(failure) => panic!("sync failed: {}", failure),
        };

        assert_eq!(launcher.spawned_names(), vec![LAUNCHER_EXE, CLIENT_EXE]);
        for (_, args) in launcher.spawned.lock().unwrap().iter() {
            assert_eq!(args, &launch_args(&orchestrator.config().launcher_token));
        }
        let killed = launcher.killed_by_name.lock().unwrap().clone();
        assert!(killed.contains(&LAUNCHER_EXE.to_string()));
        assert!(killed.contains(&CLIENT_EXE.to_string()));

        assert_eq!(
            *decoder.decoded.lock().unwrap(),
            vec!["CLIENT_CODE_0.LUA", "CLIENT_CODE_1.LUA", "CLIENT_CODE_2.LUA"]
        );
        assert_eq!(report.indices.len(), 3);
        assert_eq!(report.indices[0].rejected_rows, 1);
        assert_eq!(report.unavailable_manifests(), 1);
        assert!(report.indices[1].unavailable.is_some());
        assert_eq!(report.files_downloaded(), 1);

        assert_eq!(fs::read(temp.path().join("DATA/a.pak")).unwrap(), b"alpha");
        let written = read_version_file(&temp.path().join("VER.DLL")).unwrap();
        assert_eq!(written, VersionInfo::new("1055", "7"));
    }

    #[test]
    fn test_launcher_exit_fails_with_code() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(LAUNCHER_EXE), b"").unwrap();
        let launcher = Arc::new(FakeLauncher::new(
            temp.path(),
            Script::Exit { after: 1, code: 2 },
            idle(),
        ));
        let client = MockHttpClient::default().with(&format!("{}/VER.DLL", BASE), VERSION_BODY);

        let outcome = orchestrator(temp.path(), client, CannedDecoder::new(), launcher).run();

        match outcome {
            SyncOutcome::Failed(failure) => {
                assert_eq!(failure.state, SyncState::PollingForManifest);
                assert_eq!(failure.exit_code, Some(2));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_client_exit_leaves_placeholder_version() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CLIENT_EXE), b"").unwrap();
        let launcher = Arc::new(FakeLauncher::new(
            temp.path(),
            idle(),
            Script::Exit { after: 3, code: 7 },
        ));
        let client = MockHttpClient::default().with(&format!("{}/VER.DLL", BASE), VERSION_BODY);
        let decoder = Arc::new(CannedDecoder::new());

        let outcome = SyncOrchestrator::new(
            fast_config(temp.path()),
            Arc::new(client),
            decoder.clone(),
            launcher,
        )
        .run();

        match outcome {
            SyncOutcome::Failed(failure) => {
                assert_eq!(failure.state, SyncState::Syncing);
                assert_eq!(failure.exit_code, Some(7));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(decoder.decoded.lock().unwrap().is_empty());
        let written = read_version_file(&temp.path().join("VER.DLL")).unwrap();
        assert!(written.is_placeholder());
    }

    #[test]
    fn test_archive_extracted_while_client_runs() {
        use std::io::Write;
        use zip::write::SimpleFileOptions;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(CLIENT_EXE), b"").unwrap();

        let mut archive = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut archive));
            writer
                .start_file("BIN/core.dll", SimpleFileOptions::default())
                .unwrap();
            writer.write_all(b"core").unwrap();
            writer.finish().unwrap();
        }

        // The archive appears on the first poll, the manifest on the third.
        let launcher = Arc::new(FakeLauncher::new(
            temp.path(),
            idle(),
            Script::Write(vec![
                (1, vec![("CLIENT_CLOSERS_0.zip".to_string(), archive)]),
                (3, vec![("CLIENT_CODE_0.LUA".to_string(), b"encoded".to_vec())]),
            ]),
        ));
        let client = MockHttpClient::default().with(&format!("{}/VER.DLL", BASE), VERSION_BODY);
        let outcome = SyncOrchestrator::new(
            fast_config(temp.path()).with_code_range(0, 0),
            Arc::new(client),
            Arc::new(CannedDecoder::new()),
            launcher,
        )
        .run();

        let report = match outcome {
            SyncOutcome::Done(report) => report,
            SyncOutcome::Failed(failure) => panic!("sync failed: {}", failure),
        };
        assert_eq!(report.archives_extracted, 1);
        assert!(!temp.path().join("CLIENT_CLOSERS_0.zip").exists());
        assert_eq!(fs::read(temp.path().join("BIN/core.dll")).unwrap(), b"core");
    }
}
