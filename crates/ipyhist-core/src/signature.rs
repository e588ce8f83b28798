//! SQLite file signature check.
//!
//! Runs before anything hands the file to SQLite.

use crate::{IpyHistError, Result};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::{debug, warn};

/// "SQLite format 3\0"
pub const SQLITE_SIGNATURE: [u8; 16] = [
    0x53, 0x51, 0x4C, 0x69, 0x74, 0x65, 0x20, 0x66, 0x6F, 0x72, 0x6D, 0x61, 0x74, 0x20, 0x33, 0x00,
];

/// Whether `header` starts with the SQLite signature. Trailing bytes are ignored.
pub fn matches(header: &[u8]) -> bool {
    header.len() >= SQLITE_SIGNATURE.len() && header[..SQLITE_SIGNATURE.len()] == SQLITE_SIGNATURE
}

/// Read the first 16 bytes of `path` and require a positive match.
pub fn validate(path: &Path) -> Result<()> {
    let mut file = File::open(path)
        .map_err(|e| IpyHistError::format(path, format!("file is unreadable: {}", e)))?;

    let mut header = [0u8; SQLITE_SIGNATURE.len()];
    if let Err(e) = file.read_exact(&mut header) {
        let reason = match e.kind() {
            ErrorKind::UnexpectedEof => "file is shorter than 16 bytes".to_string(),
            _ => format!("file is unreadable: {}", e),
        };
        return Err(IpyHistError::format(path, reason));
    }

    if !matches(&header) {
        warn!(target: "ipyhist::signature", "Negative match for {}", path.display());
        return Err(IpyHistError::format(path, "negative match"));
    }

    debug!(target: "ipyhist::signature", "Positive match for {}", path.display());
    Ok(())
}
