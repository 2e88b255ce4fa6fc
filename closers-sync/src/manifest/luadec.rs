//! Subprocess-backed manifest decoder.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};

use super::{parse_manifest, ManifestDecoder, ManifestOutcome};

/// Runs `luadec <manifest>` and parses what it prints.
#[derive(Debug, Clone)]
pub struct LuadecDecoder {
    program: PathBuf,
}

impl LuadecDecoder {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The path handed to the OS when spawning.
    ///
    /// A relative path naming an existing file is anchored to the working
    /// directory, since Windows does not search it for bare program names.
    pub fn command_path(&self) -> PathBuf {
        if self.program.is_relative() && self.program.is_file() {
            if let Ok(cwd) = std::env::current_dir() {
                return cwd.join(&self.program);
            }
        }
        self.program.clone()
    }
}

impl ManifestDecoder for LuadecDecoder {
    /// A path with a directory part must name a file; a bare name may also
    /// be found on `PATH`.
    fn is_available(&self) -> bool {
        if self.program.is_file() {
            return true;
        }
        if self.program.components().count() != 1 {
            return false;
        }
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join(&self.program).is_file()))
            .unwrap_or(false)
    }

    fn decode(&self, manifest_path: &Path) -> ManifestOutcome {
        let source_name = manifest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| manifest_path.display().to_string());

        let output = match Command::new(self.command_path()).arg(manifest_path).output() {
            Ok(output) => output,
            Err(e) => {
                return ManifestOutcome::Unavailable {
                    reason: format!("failed to run {}: {}", self.program.display(), e),
                }
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return ManifestOutcome::Unavailable {
                reason: format!(
                    "{} produced no output ({}): {}",
                    self.program.display(),
                    output.status,
                    stderr.trim()
                ),
            };
        }
        if !output.status.success() {
            debug!(
                manifest = %source_name,
                status = %output.status,
                "Decoder exited unsuccessfully, parsing its output anyway"
            );
        }

        match parse_manifest(&stdout, &source_name) {
            Ok(parsed) => {
                for reason in &parsed.rejected {
                    warn!(manifest = %source_name, "Skipping manifest row: {}", reason);
                }
                ManifestOutcome::Decoded {
                    rejected: parsed.rejected.len(),
                    records: parsed.records,
                }
            }
            Err(e) => ManifestOutcome::Unavailable {
                reason: e.to_string(),
            },
        }
    }
}
