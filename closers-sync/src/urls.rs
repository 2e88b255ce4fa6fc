//! URL construction for the patch server.

/// Default live patch server.
pub const DEFAULT_BASE_URL: &str = "https://patch-cls.naddic.co.kr/closerskr/LIVE";

/// Builds every URL the sync engine requests from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchUrls {
    base: String,
}

impl PatchUrls {
    /// Create from a base URL; a trailing slash is ignored.
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Remote version descriptor.
    pub fn version(&self) -> String {
        format!("{}/VER.DLL", self.base)
    }

    /// Encoded manifest for a code-table index of a release.
    pub fn manifest(&self, major: &str, time: &str, index: u32) -> String {
        format!(
            "{}/PATCH/PATCH_{}_{}/CLIENT_CODE_{}.LUA",
            self.base, major, time, index
        )
    }

    /// One patch file, addressed by the release its manifest row names.
    pub fn patch_file(&self, major: &str, minor: &str, relative_path: &str) -> String {
        format!(
            "{}/PATCH/PATCH_{}_{}/{}",
            self.base, major, minor, relative_path
        )
    }
}

impl Default for PatchUrls {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
