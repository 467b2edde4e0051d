//! Streaming content hashing for attachment dedup.
//!
//! Attachments are identified by the SHA-256 of their bytes, computed in one
//! pass while the data is still inside the compressed stream. The digest is
//! chunking-independent: identical bytes always produce identical hashes.

use std::io::{self, Read};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Chunk size for streaming reads.
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Errors specific to hashing a bounded stream.
#[derive(Debug, Error)]
pub enum HashStreamError {
    /// IO error while reading the stream
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// The running byte total passed the ceiling before the stream ended
    #[error("stream exceeds the {limit}-byte limit")]
    LimitExceeded {
        /// The configured ceiling in bytes
        limit: u64,
    },
}

/// Hashes a byte stream, bounded by a size ceiling.
///
/// Reads in [`HASH_CHUNK_SIZE`] chunks, keeping a running total; crossing
/// `limit` aborts with [`HashStreamError::LimitExceeded`] without reading
/// further. Returns the lower-case hex digest.
///
/// # Example
///
/// ```
/// use chatvault::archive::hash_stream;
///
/// let mut bytes: &[u8] = b"hello world";
/// let hash = hash_stream(&mut bytes, 1024).unwrap();
/// assert_eq!(
///     hash,
///     "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
/// );
/// ```
pub fn hash_stream<R: Read>(reader: &mut R, limit: u64) -> Result<String, HashStreamError> {
    let mut hasher = Sha256::new();
    let mut chunk = vec![0u8; HASH_CHUNK_SIZE];
    let mut total: u64 = 0;

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        total += n as u64;
        if total > limit {
            return Err(HashStreamError::LimitExceeded { limit });
        }
        hasher.update(&chunk[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}
