//! Remote manifest decoding.
//!
//! Each code-table index has an encoded manifest (`CLIENT_CODE_{i}.LUA`)
//! that only an external decompiler can turn into text. This module:
//! - Runs that decompiler behind the [`ManifestDecoder`] trait (`luadec`)
//! - Parses its Lua output with a real grammar (`table`)
//! - Decodes `CODE_TABLE` rows into [`FileRecord`]s (`record`)
//!
//! # Architecture
//!
//! ```text
//! CLIENT_CODE_{i}.LUA ──► ManifestDecoder ──► parse_manifest ──► ManifestOutcome
//!                         (subprocess)        (table + record)
//! ```
//!
//! Decoder failures never abort a sync. They are reported as
//! [`ManifestOutcome::Unavailable`], which callers treat like an empty
//! manifest while still logging why.

mod luadec;
mod record;
mod table;

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{SyncError, SyncResult};
use crate::http::HttpClient;
use crate::install::InstallTree;
use crate::urls::PatchUrls;
use crate::version::VersionInfo;

pub use luadec::LuadecDecoder;
pub use record::FileRecord;
pub use table::{parse_chunk, parse_value, Chunk, LuaTable, LuaValue, ParseError};

/// Name of the assignment holding the file list.
pub const CODE_TABLE: &str = "CODE_TABLE";

/// Turns an encoded manifest file into file records.
pub trait ManifestDecoder: Send + Sync {
    /// Decode the manifest at `manifest_path`. Never fails; problems are
    /// reported through [`ManifestOutcome::Unavailable`].
    fn decode(&self, manifest_path: &std::path::Path) -> ManifestOutcome;

    /// Whether the decoder can be run at all.
    fn is_available(&self) -> bool {
        true
    }
}

/// Result of decoding one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestOutcome {
    /// The manifest was read. `records` may legitimately be empty.
    Decoded {
        records: Vec<FileRecord>,
        /// Rows skipped because they could not be decoded.
        rejected: usize,
    },
    /// The decoder could not produce a usable table.
    Unavailable { reason: String },
}

impl ManifestOutcome {
    /// Records to check; empty when the manifest was unavailable.
    pub fn into_records(self) -> Vec<FileRecord> {
        match self {
            Self::Decoded { records, .. } => records,
            Self::Unavailable { .. } => Vec::new(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// A decoded manifest plus the reasons any rows were skipped.
#[derive(Debug, Clone, Default)]
pub struct ParsedManifest {
    pub records: Vec<FileRecord>,
    pub rejected: Vec<String>,
}

/// Parse decoder output and decode its `CODE_TABLE`.
///
/// # Errors
///
/// [`SyncError::ManifestFormat`] if the text is not a parseable chunk or has
/// no `CODE_TABLE` table.
pub fn parse_manifest(text: &str, source_name: &str) -> SyncResult<ParsedManifest> {
    let chunk = parse_chunk(text).map_err(|e| SyncError::format(source_name, e.to_string()))?;
    let table = chunk
        .get(CODE_TABLE)
        .ok_or_else(|| SyncError::format(source_name, format!("no {} assignment", CODE_TABLE)))?;
    let (records, rejected) =
        record::decode_rows(table).map_err(|reason| SyncError::format(source_name, reason))?;

    Ok(ParsedManifest { records, rejected })
}

/// Download the encoded manifest for `index` into the install root.
///
/// Returns the path it was written to.
pub fn fetch_encoded_manifest(
    client: &dyn HttpClient,
    urls: &PatchUrls,
    version: &VersionInfo,
    index: u32,
    install: &InstallTree,
) -> SyncResult<PathBuf> {
    let url = urls.manifest(&version.major_version, &version.timestamp, index);
    debug!(url = %url, index, "Fetching encoded manifest");
    let body = client.get(&url)?;

    let dest = install.manifest_file(index);
    fs::create_dir_all(install.root()).map_err(|e| SyncError::io(install.root(), e))?;
    fs::write(&dest, body).map_err(|e| SyncError::io(&dest, e))?;
    Ok(dest)
}
