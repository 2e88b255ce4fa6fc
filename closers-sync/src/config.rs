//! Configuration for the sync engine.
//!
//! [`SyncConfig`] holds every tunable with the live deployment's defaults.
//! An optional INI file can override them:
//!
//! ```text
//! [patch]
//! base_url = https://patch-cls.naddic.co.kr/closerskr/LIVE
//! code_min = 0
//! code_max = 2
//!
//! [install]
//! dir = C:\Games\CLOSERS
//!
//! [sync]
//! concurrency = 100
//! http_timeout_secs = 0
//!
//! [decoder]
//! path = luadec.exe
//! ```

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;

use crate::error::{SyncError, SyncResult};
use crate::pool::DEFAULT_CONCURRENCY;
use crate::process::DEFAULT_LAUNCHER_TOKEN;
use crate::urls::DEFAULT_BASE_URL;

/// Default decoder executable, looked up relative to the working directory.
pub const DEFAULT_DECODER: &str = if cfg!(windows) { "luadec.exe" } else { "luadec" };

/// Interval between checks while the bootstrap launcher runs.
pub const DEFAULT_LAUNCHER_POLL: Duration = Duration::from_secs(4);

/// Interval between checks while the client runs.
pub const DEFAULT_CLIENT_POLL: Duration = Duration::from_secs(1);

/// Wait after the manifest markers appear before killing the client.
pub const DEFAULT_MARKER_GRACE: Duration = Duration::from_secs(3);

/// Install directory used when none is chosen: `test` next to the program.
pub fn default_install_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("test")
}

/// Configuration for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root of the local game install.
    pub install_dir: PathBuf,

    /// Patch server base URL.
    pub base_url: String,

    /// First code-table index.
    pub code_min: u32,

    /// Last code-table index (inclusive).
    pub code_max: u32,

    /// Workers per fan-out batch.
    pub concurrency: usize,

    /// Manifest decoder executable.
    pub decoder_path: PathBuf,

    /// Token passed to the launcher and client.
    pub launcher_token: String,

    pub launcher_poll_interval: Duration,
    pub client_poll_interval: Duration,
    pub marker_grace: Duration,

    /// Per-request HTTP timeout. `None` waits indefinitely.
    pub http_timeout: Option<Duration>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            install_dir: default_install_dir(),
            base_url: DEFAULT_BASE_URL.to_string(),
            code_min: 0,
            code_max: 2,
            concurrency: DEFAULT_CONCURRENCY,
            decoder_path: PathBuf::from(DEFAULT_DECODER),
            launcher_token: DEFAULT_LAUNCHER_TOKEN.to_string(),
            launcher_poll_interval: DEFAULT_LAUNCHER_POLL,
            client_poll_interval: DEFAULT_CLIENT_POLL,
            marker_grace: DEFAULT_MARKER_GRACE,
            http_timeout: None,
        }
    }
}

impl SyncConfig {
    /// Create a configuration for the given install directory.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_code_range(mut self, min: u32, max: u32) -> Self {
        self.code_min = min;
        self.code_max = max;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_decoder_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.decoder_path = path.into();
        self
    }

    /// Set both poll intervals and the marker grace period.
    pub fn with_poll_intervals(mut self, launcher: Duration, client: Duration, grace: Duration) -> Self {
        self.launcher_poll_interval = launcher;
        self.client_poll_interval = client;
        self.marker_grace = grace;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Code-table indices, in processing order.
    pub fn code_range(&self) -> RangeInclusive<u32> {
        self.code_min..=self.code_max
    }

    /// Check invariants that the builder cannot enforce.
    pub fn validate(&self) -> SyncResult<()> {
        if self.code_min > self.code_max {
            return Err(SyncError::Config(format!(
                "code_min ({}) is greater than code_max ({})",
                self.code_min, self.code_max
            )));
        }
        if self.base_url.trim().is_empty() {
            return Err(SyncError::Config("base_url is empty".to_string()));
        }
        Ok(())
    }
}

/// Overrides loaded from an INI file. Unset keys keep their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub code_min: Option<u32>,
    pub code_max: Option<u32>,
    pub install_dir: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub http_timeout_secs: Option<u64>,
    pub decoder_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Load from disk.
    pub fn load(path: &Path) -> SyncResult<Self> {
        let ini = Ini::load_from_file(path)
            .map_err(|e| SyncError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_ini(&ini)
    }

    /// Parse from INI text.
    pub fn parse(text: &str) -> SyncResult<Self> {
        let ini = Ini::load_from_str(text).map_err(|e| SyncError::Config(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> SyncResult<Self> {
        let text = |section: &str, key: &str| {
            ini.get_from(Some(section), key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            base_url: text("patch", "base_url"),
            code_min: parse_key(ini, "patch", "code_min")?,
            code_max: parse_key(ini, "patch", "code_max")?,
            install_dir: text("install", "dir").map(PathBuf::from),
            concurrency: parse_key(ini, "sync", "concurrency")?,
            http_timeout_secs: parse_key(ini, "sync", "http_timeout_secs")?,
            decoder_path: text("decoder", "path").map(PathBuf::from),
        })
    }

    /// Apply the overrides on top of `config`.
    pub fn apply(&self, mut config: SyncConfig) -> SyncConfig {
        if let Some(url) = &self.base_url {
            config.base_url = url.clone();
        }
        if let Some(min) = self.code_min {
            config.code_min = min;
        }
        if let Some(max) = self.code_max {
            config.code_max = max;
        }
        if let Some(dir) = &self.install_dir {
            config.install_dir = dir.clone();
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency.max(1);
        }
        if let Some(secs) = self.http_timeout_secs {
            config.http_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(path) = &self.decoder_path {
            config.decoder_path = path.clone();
        }
        config
    }
}

fn parse_key<T: FromStr>(ini: &Ini, section: &str, key: &str) -> SyncResult<Option<T>> {
    match ini.get_from(Some(section), key).map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(|_| {
            SyncError::Config(format!("[{}] {} has invalid value '{}'", section, key, raw))
        }),
    }
}
