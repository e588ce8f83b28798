//! Chain-of-custody hashing.

use crate::{IpyHistError, Result};
use ipyhist_types::{Artifact, ArtifactDigests};
use sha1::{Digest, Sha1};
use std::path::Path;
use tracing::info;

/// Read the whole artifact into memory.
pub fn read_artifact(path: &Path) -> Result<Artifact> {
    let bytes = std::fs::read(path).map_err(|source| IpyHistError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    info!(target: "ipyhist::digest", "{} bytes read", bytes.len());
    Ok(Artifact {
        path: path.to_path_buf(),
        bytes,
    })
}

/// Compute MD5 and SHA1 over the same bytes.
///
/// The two digests run on separate scoped threads over the shared slice.
pub fn compute(bytes: &[u8]) -> ArtifactDigests {
    let (md5, sha1) = std::thread::scope(|scope| {
        let md5 = scope.spawn(|| format!("{:x}", md5::compute(bytes)));
        let sha1 = scope.spawn(|| {
            let mut hasher = Sha1::new();
            hasher.update(bytes);
            format!("{:x}", hasher.finalize())
        });
        (join(md5), join(sha1))
    });

    ArtifactDigests {
        byte_count: bytes.len() as u64,
        md5,
        sha1,
    }
}

/// Digests of an artifact already in memory.
pub fn digest_artifact(artifact: &Artifact) -> ArtifactDigests {
    let digests = compute(&artifact.bytes);
    info!(target: "ipyhist::digest", "MD5 Hash: {}", digests.md5);
    info!(target: "ipyhist::digest", "SHA1 Hash: {}", digests.sha1);
    digests
}

fn join<T>(handle: std::thread::ScopedJoinHandle<'_, T>) -> T {
    handle
        .join()
        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
}
