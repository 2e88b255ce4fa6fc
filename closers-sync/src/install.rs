//! Layout of the local install tree.
//!
//! Every well-known file the sync engine touches is named here so the
//! orchestrator, differ and extractor agree on where things live.

use std::path::{Path, PathBuf};

/// Native game client executable.
pub const CLIENT_EXE: &str = "CLOSERS.exe";

/// Bootstrap launcher executable.
pub const LAUNCHER_EXE: &str = "LAUNCHER.exe";

/// Persisted version marker.
pub const VERSION_FILE: &str = "VER.DLL";

/// Number of bootstrap archive candidates (`CLIENT_CLOSERS_0.zip` ..= `_13`).
pub const ARCHIVE_CANDIDATES: u32 = 14;

/// Encoded manifest file name for a code-table index.
pub fn manifest_file_name(index: u32) -> String {
    format!("CLIENT_CODE_{}.LUA", index)
}

/// Bootstrap archive file name for a candidate index.
pub fn archive_file_name(index: u32) -> String {
    format!("CLIENT_CLOSERS_{}.zip", index)
}

/// The local directory the game is installed into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTree {
    root: PathBuf,
}

impl InstallTree {
    /// Create a tree rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a manifest-relative path (either separator) under the root.
    pub fn resolve(&self, relative: &str) -> PathBuf {
        relative
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |path, part| path.join(part))
    }

    pub fn version_file(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }

    pub fn client_exe(&self) -> PathBuf {
        self.root.join(CLIENT_EXE)
    }

    pub fn launcher_exe(&self) -> PathBuf {
        self.root.join(LAUNCHER_EXE)
    }

    /// Path of the encoded manifest the launcher drops for `index`.
    pub fn manifest_file(&self, index: u32) -> PathBuf {
        self.root.join(manifest_file_name(index))
    }

    /// True once every manifest marker in `indices` exists.
    pub fn manifests_present(&self, indices: impl IntoIterator<Item = u32>) -> bool {
        indices
            .into_iter()
            .all(|index| self.manifest_file(index).exists())
    }

    /// First bootstrap archive candidate present on disk, if any.
    pub fn find_archive(&self) -> Option<PathBuf> {
        (0..ARCHIVE_CANDIDATES)
            .map(|index| self.root.join(archive_file_name(index)))
            .find(|path| path.is_file())
    }
}

/// Returns true if a manifest-relative path stays inside the install root.
///
/// Absolute paths, drive prefixes and `..` components are refused.
pub fn is_safe_relative_path(relative: &str) -> bool {
    if relative.is_empty() || relative.starts_with(['/', '\\']) || relative.contains(':') {
        return false;
    }
    relative
        .split(['/', '\\'])
        .all(|part| part != ".." && part != ".")
        && relative.split(['/', '\\']).any(|part| !part.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_accepts_both_separators() {
        let tree = InstallTree::new("/games/closers");
        assert_eq!(
            tree.resolve("DATA\\sub/a.pak"),
            PathBuf::from("/games/closers/DATA/sub/a.pak")
        );
    }

    #[test]
    fn test_well_known_files() {
        let tree = InstallTree::new("/games/closers");
        assert_eq!(tree.version_file(), PathBuf::from("/games/closers/VER.DLL"));
        assert_eq!(
            tree.manifest_file(2),
            PathBuf::from("/games/closers/CLIENT_CODE_2.LUA")
        );
        assert_eq!(archive_file_name(13), "CLIENT_CLOSERS_13.zip");
    }

    #[test]
    fn test_manifests_present() {
        let temp = TempDir::new().unwrap();
        let tree = InstallTree::new(temp.path());

        std::fs::write(tree.manifest_file(0), b"x").unwrap();
        std::fs::write(tree.manifest_file(1), b"x").unwrap();
        assert!(!tree.manifests_present(0..=2));

        std::fs::write(tree.manifest_file(2), b"x").unwrap();
        assert!(tree.manifests_present(0..=2));
    }

    #[test]
    fn test_find_archive_picks_lowest_candidate() {
        let temp = TempDir::new().unwrap();
        let tree = InstallTree::new(temp.path());
        assert!(tree.find_archive().is_none());

        std::fs::write(temp.path().join("CLIENT_CLOSERS_7.zip"), b"x").unwrap();
        std::fs::write(temp.path().join("CLIENT_CLOSERS_3.zip"), b"x").unwrap();
        std::fs::write(temp.path().join("CLIENT_CLOSERS_14.zip"), b"x").unwrap();

        assert_eq!(
            tree.find_archive(),
            Some(temp.path().join("CLIENT_CLOSERS_3.zip"))
        );
    }

    #[test]
    fn test_safe_relative_paths() {
        assert!(is_safe_relative_path("DATA/a.pak"));
        assert!(is_safe_relative_path("DATA\\a.pak"));
        assert!(!is_safe_relative_path("../evil.dll"));
        assert!(!is_safe_relative_path("DATA/../../evil.dll"));
        assert!(!is_safe_relative_path("/etc/passwd"));
        assert!(!is_safe_relative_path("C:\\Windows\\evil.dll"));
        assert!(!is_safe_relative_path(""));
        assert!(!is_safe_relative_path("//"));
    }
}
