//! Positional decoding of manifest rows into [`FileRecord`]s.

use crate::install::is_safe_relative_path;

use super::table::{LuaTable, LuaValue};

/// Column holding the directory part of the path.
const COL_DIR: usize = 0;
/// Column holding the file name part of the path.
const COL_NAME: usize = 1;
/// Column holding the expected CRC32.
const COL_CHECKSUM: usize = 2;
/// Column holding the release major version the file ships in.
const COL_MAJOR: usize = 6;
/// Column holding the release minor version the file ships in.
const COL_MINOR: usize = 9;
/// Rows must have at least this many columns.
const MIN_COLUMNS: usize = COL_MINOR + 1;

/// One file the manifest expects in the install tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path segments as listed in the manifest (directory, file name).
    pub relative_path_parts: Vec<String>,
    /// CRC32 the local file must have.
    pub expected_checksum: u32,
    /// Remaining integer columns, in column order. Not interpreted.
    pub size_or_flags: Vec<i64>,
    /// Release major version used to address the file on the server.
    pub manifest_major: String,
    /// Release minor version used to address the file on the server.
    pub manifest_minor: String,
}

impl FileRecord {
    /// Path relative to the install root, as the server addresses it.
    pub fn relative_path(&self) -> String {
        self.relative_path_parts.concat()
    }

    /// Decode one manifest row.
    pub fn from_row(row: &LuaTable) -> Result<Self, String> {
        let columns = &row.array;
        if columns.len() < MIN_COLUMNS {
            return Err(format!(
                "expected at least {} columns, found {}",
                MIN_COLUMNS,
                columns.len()
            ));
        }

        let text = |index: usize| {
            columns[index]
                .to_text()
                .ok_or_else(|| format!("column {} is not a string or integer", index))
        };

        let relative_path_parts = vec![text(COL_DIR)?, text(COL_NAME)?];
        let relative_path = relative_path_parts.concat();
        if !is_safe_relative_path(&relative_path) {
            return Err(format!("unsafe path '{}'", relative_path));
        }

        let expected_checksum = columns[COL_CHECKSUM]
            .as_integer()
            .and_then(checksum_from_integer)
            .ok_or_else(|| format!("column {} is not a CRC32", COL_CHECKSUM))?;

        let size_or_flags = columns
            .iter()
            .enumerate()
            .filter(|(i, _)| ![COL_DIR, COL_NAME, COL_CHECKSUM, COL_MAJOR, COL_MINOR].contains(i))
            .filter_map(|(_, v)| v.as_integer())
            .collect();

        Ok(Self {
            relative_path_parts,
            expected_checksum,
            size_or_flags,
            manifest_major: text(COL_MAJOR)?,
            manifest_minor: text(COL_MINOR)?,
        })
    }
}

/// Checksums are published unsigned, but a signed 32-bit rendering is
/// accepted too.
fn checksum_from_integer(value: i64) -> Option<u32> {
    u32::try_from(value)
        .ok()
        .or_else(|| i32::try_from(value).ok().map(|v| v as u32))
}

/// Rows of a `CODE_TABLE` value: decoded records plus rejection reasons.
pub(crate) fn decode_rows(table: &LuaValue) -> Result<(Vec<FileRecord>, Vec<String>), String> {
    let table = table
        .as_table()
        .ok_or_else(|| "CODE_TABLE is not a table".to_string())?;

    let mut records = Vec::with_capacity(table.array.len());
    let mut rejected = Vec::new();

    for (i, row) in table.array.iter().enumerate() {
        match row.as_table().ok_or_else(|| "row is not a table".to_string()) {
            Ok(row) => match FileRecord::from_row(row) {
                Ok(record) => records.push(record),
                Err(reason) => rejected.push(format!("row {}: {}", i + 1, reason)),
            },
            Err(reason) => rejected.push(format!("row {}: {}", i + 1, reason)),
        }
    }

    Ok((records, rejected))
}
