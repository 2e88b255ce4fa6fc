//! Streaming CRC32 calculation for file verification.
//!
//! The patch server publishes zlib-compatible CRC32 values for every file,
//! so files are folded chunk by chunk instead of being read into memory.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use flate2::Crc;

use crate::error::{SyncError, SyncResult};

/// Chunk size used when streaming files (64KB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Calculate the CRC32 of a file.
///
/// # Errors
///
/// Returns [`SyncError::Io`] if the file cannot be opened or a read fails
/// part way through.
pub fn file_crc32(path: &Path) -> SyncResult<u32> {
    let file = File::open(path).map_err(|e| SyncError::io(path, e))?;
    checksum_reader(file, CHUNK_SIZE).map_err(|e| SyncError::io(path, e))
}

/// Fold a CRC32 over everything `reader` yields, `chunk_size` bytes at a time.
///
/// The result does not depend on `chunk_size`.
pub fn checksum_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<u32> {
    let mut crc = Crc::new();
    let mut buffer = vec![0u8; chunk_size.max(1)];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        crc.update(&buffer[..bytes_read]);
    }

    Ok(crc.sum())
}

/// CRC32 of an in-memory buffer.
pub fn bytes_crc32(data: &[u8]) -> u32 {
    let mut crc = Crc::new();
    crc.update(data);
    crc.sum()
}
