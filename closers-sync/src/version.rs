//! Remote and local version descriptors (`VER.DLL`).
//!
//! Both the server's descriptor and the local marker are small INI documents:
//!
//! ```text
//! [Ver]
//! MVer=1056
//! Time=20240101
//! Crc=0
//! ```
//!
//! The local marker additionally carries `PATCH=1` once a sync completed.

use std::fmt;
use std::fs;
use std::path::Path;

use ini::Ini;
use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::http::HttpClient;
use crate::urls::PatchUrls;

const SECTION: &str = "Ver";
const KEY_MAJOR: &str = "MVer";
const KEY_TIME: &str = "Time";
const KEY_CRC: &str = "Crc";
const KEY_PATCHED: &str = "PATCH";

/// Version identifiers of a release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub major_version: String,
    pub timestamp: String,
    pub crc: String,
}

impl VersionInfo {
    pub fn new(major_version: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            major_version: major_version.into(),
            timestamp: timestamp.into(),
            crc: "0".to_string(),
        }
    }

    /// All-zero version written before launching so the native process does
    /// not consider the install already patched.
    pub fn placeholder() -> Self {
        Self::new("0", "0")
    }

    pub fn is_placeholder(&self) -> bool {
        self.major_version == "0" && self.timestamp == "0"
    }

    /// Parse an INI version document.
    ///
    /// `source_name` only labels errors.
    pub fn parse(text: &str, source_name: &str) -> SyncResult<Self> {
        let text = text.trim_start_matches('\u{feff}');
        let ini = Ini::load_from_str(text)
            .map_err(|e| SyncError::format(source_name, e.to_string()))?;

        let field = |key: &str| lookup(&ini, key).map(str::to_string);

        let major_version = field(KEY_MAJOR).ok_or_else(|| {
            SyncError::format(source_name, format!("missing [{}] {}", SECTION, KEY_MAJOR))
        })?;
        let timestamp = field(KEY_TIME).ok_or_else(|| {
            SyncError::format(source_name, format!("missing [{}] {}", SECTION, KEY_TIME))
        })?;
        let crc = field(KEY_CRC).unwrap_or_else(|| "0".to_string());

        Ok(Self {
            major_version,
            timestamp,
            crc,
        })
    }

    /// Render as a version file. Real versions carry the `PATCH=1` flag.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        let mut section = ini.with_section(Some(SECTION));
        section
            .set(KEY_MAJOR, self.major_version.as_str())
            .set(KEY_TIME, self.timestamp.as_str())
            .set(KEY_CRC, self.crc.as_str());
        if !self.is_placeholder() {
            section.set(KEY_PATCHED, "1");
        }
        ini
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.major_version, self.timestamp)
    }
}

/// Case-insensitive key lookup in the `[Ver]` section.
fn lookup<'a>(ini: &'a Ini, key: &str) -> Option<&'a str> {
    ini.iter()
        .filter(|(name, _)| name.is_some_and(|n| n.eq_ignore_ascii_case(SECTION)))
        .flat_map(|(_, props)| props.iter())
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.trim())
        .filter(|v| !v.is_empty())
}

/// Fetches the latest release identifiers from the patch server.
pub struct VersionResolver<'a> {
    client: &'a dyn HttpClient,
    urls: &'a PatchUrls,
}

impl<'a> VersionResolver<'a> {
    pub fn new(client: &'a dyn HttpClient, urls: &'a PatchUrls) -> Self {
        Self { client, urls }
    }

    /// Fetch and parse `{base}/VER.DLL`.
    ///
    /// # Errors
    ///
    /// [`SyncError::Network`] on transport failure, [`SyncError::ManifestFormat`]
    /// if `MVer` or `Time` is missing.
    pub fn resolve(&self) -> SyncResult<VersionInfo> {
        let url = self.urls.version();
        debug!(url = %url, "Fetching version descriptor");
        let body = self.client.get(&url)?;
        VersionInfo::parse(&String::from_utf8_lossy(&body), &url)
    }
}

/// Read the local version marker.
pub fn read_version_file(path: &Path) -> SyncResult<VersionInfo> {
    let text = fs::read_to_string(path).map_err(|e| SyncError::io(path, e))?;
    VersionInfo::parse(&text, &path.display().to_string())
}

/// Write `version` to the local version marker, replacing it.
pub fn write_version_file(path: &Path, version: &VersionInfo) -> SyncResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| SyncError::io(parent, e))?;
    }
    version
        .to_ini()
        .write_to_file(path)
        .map_err(|e| SyncError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockHttpClient;
    use tempfile::TempDir;

    #[test]
    fn test_parse_descriptor() {
        let version = VersionInfo::parse("[Ver]\nMVer=1056\nTime=20240101\nCrc=99\n", "test")
            .unwrap();
        assert_eq!(version.major_version, "1056");
        assert_eq!(version.timestamp, "20240101");
        assert_eq!(version.crc, "99");
    }

    #[test]
    fn test_parse_tolerates_case_and_bom() {
        let version =
            VersionInfo::parse("\u{feff}[ver]\r\nmver = 7\r\nTIME = 8\r\n", "test").unwrap();
        assert_eq!(version, VersionInfo::new("7", "8"));
    }

    #[test]
    fn test_parse_missing_major_is_format_error() {
        let result = VersionInfo::parse("[Ver]\nTime=20240101\n", "test");
        match result {
            Err(SyncError::ManifestFormat { reason, .. }) => assert!(reason.contains("MVer")),
            other => panic!("expected ManifestFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_wrong_section_is_format_error() {
        assert!(VersionInfo::parse("[Other]\nMVer=1\nTime=2\n", "test").is_err());
    }

    #[test]
    fn test_resolver_fetches_descriptor() {
        let urls = PatchUrls::new("http://patch.local");
        let client =
            MockHttpClient::default().with("http://patch.local/VER.DLL", b"[Ver]\nMVer=3\nTime=4\n");

        let version = VersionResolver::new(&client, &urls).resolve().unwrap();
        assert_eq!(version, VersionInfo::new("3", "4"));
    }

    #[test]
    fn test_resolver_network_failure() {
        let urls = PatchUrls::new("http://patch.local");
        let client = MockHttpClient::default();

        let result = VersionResolver::new(&client, &urls).resolve();
        assert!(matches!(result, Err(SyncError::Network { .. })));
    }

    #[test]
    fn test_placeholder_file_has_no_patch_flag() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("VER.DLL");

        write_version_file(&path, &VersionInfo::placeholder()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("MVer=0"));
        assert!(!text.contains("PATCH"));
        assert!(read_version_file(&path).unwrap().is_placeholder());
    }

    #[test]
    fn test_real_version_round_trips_through_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("VER.DLL");
        let version = VersionInfo::new("1056", "20240101");

        write_version_file(&path, &version).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("PATCH=1"));
        assert_eq!(read_version_file(&path).unwrap(), version);
    }
}
