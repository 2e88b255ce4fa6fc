//! Native launcher and client processes.
//!
//! The orchestrator only needs to start a process, ask whether it is still
//! running, and kill it. Those operations sit behind [`ProcessLauncher`] and
//! [`RunningProcess`] so tests can script a fake launcher.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::{debug, warn};

use crate::error::{SyncError, SyncResult};

/// Region tag passed as the first launch argument.
pub const REGION_ARG: &str = "_KOR";
/// Launcher token passed as the second launch argument.
pub const DEFAULT_LAUNCHER_TOKEN: &str =
    "naddiclauncherkor:000000000%0000000000-0000-0000-0000-000000000000";
/// Literal flag passed as the third launch argument.
pub const LC_FLAG: &str = "_LC";
/// Literal value passed as the fourth launch argument.
pub const LC_VALUE: &str = "1";

/// The fixed four-argument command line for launcher and client.
pub fn launch_args(token: &str) -> Vec<String> {
    vec![
        REGION_ARG.to_string(),
        token.to_string(),
        LC_FLAG.to_string(),
        LC_VALUE.to_string(),
    ]
}

/// How a process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
}

/// A spawned native process.
pub trait RunningProcess: Send {
    /// `Some` once the process has exited.
    fn try_wait(&mut self) -> SyncResult<Option<ExitStatus>>;

    /// Forcibly terminate the process. Killing an exited process is not an
    /// error.
    fn kill(&mut self) -> SyncResult<()>;
}

/// Starts native processes and terminates them by image name.
pub trait ProcessLauncher: Send + Sync {
    fn spawn(&self, program: &Path, args: &[String]) -> SyncResult<Box<dyn RunningProcess>>;

    /// Terminate every running process whose image name is `image`.
    fn kill_by_name(&self, image: &str);
}

/// [`ProcessLauncher`] backed by `std::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeLauncher;

impl NativeLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessLauncher for NativeLauncher {
    fn spawn(&self, program: &Path, args: &[String]) -> SyncResult<Box<dyn RunningProcess>> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = program.parent().filter(|d| !d.as_os_str().is_empty()) {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|e| SyncError::Process {
            program: program.display().to_string(),
            reason: e.to_string(),
        })?;

        let name = image_name(program);
        if let Some(stdout) = child.stdout.take() {
            drain_output(name.clone(), stdout);
        }
        if let Some(stderr) = child.stderr.take() {
            drain_output(name.clone(), stderr);
        }

        Ok(Box::new(NativeProcess { child, name }))
    }

    fn kill_by_name(&self, image: &str) {
        let result = if cfg!(windows) {
            Command::new("taskkill")
                .args(["/F", "/IM", image])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
        } else {
            Command::new("pkill")
                .args(["-x", image])
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
        };
        match result {
            Ok(status) => debug!(image, %status, "Kill by name"),
            Err(e) => warn!(image, error = %e, "Failed to kill by name"),
        }
    }
}

fn image_name(program: &Path) -> String {
    program
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

/// Forward a captured stream to debug logs so the child never blocks on a
/// full pipe.
fn drain_output<R: Read + Send + 'static>(name: String, stream: R) {
    let spawned = thread::Builder::new()
        .name(format!("{}-output", name))
        .spawn(move || {
            for line in BufReader::new(stream).lines() {
                match line {
                    Ok(line) => debug!(process = %name, "{}", line),
                    Err(_) => break,
                }
            }
        });
    if let Err(e) = spawned {
        warn!(error = %e, "Failed to start output reader");
    }
}

struct NativeProcess {
    child: Child,
    name: String,
}

impl RunningProcess for NativeProcess {
    fn try_wait(&mut self) -> SyncResult<Option<ExitStatus>> {
        self.child
            .try_wait()
            .map(|status| status.map(|s| ExitStatus { code: s.code() }))
            .map_err(|e| SyncError::Process {
                program: self.name.clone(),
                reason: e.to_string(),
            })
    }

    fn kill(&mut self) -> SyncResult<()> {
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return Ok(());
        }
        self.child.kill().map_err(|e| SyncError::Process {
            program: self.name.clone(),
            reason: e.to_string(),
        })?;
        // Reap it so no zombie is left behind.
        self.child.wait().ok();
        Ok(())
    }
}
