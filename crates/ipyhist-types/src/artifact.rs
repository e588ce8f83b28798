//! The evidence file under analysis.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Input file held fully in memory.
///
/// Read once and never mutated; dropped as soon as digests are taken.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Chain-of-custody digests of an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactDigests {
    /// Total bytes hashed.
    pub byte_count: u64,
    /// Lowercase hex MD5.
    pub md5: String,
    /// Lowercase hex SHA1.
    pub sha1: String,
}
