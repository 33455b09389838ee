//! Content hashing for build artifacts.
//!
//! Every artifact is fingerprinted with a full SHA-256 digest, hex encoded.
//! Each call owns a fresh hasher, so no state can leak between jobs.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

use crate::consts::HASH_BUFFER_SIZE;

/// A full 64-character SHA-256 hash of an artifact's bytes.
///
/// # Format
///
/// The hash is a lowercase hexadecimal string (64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Stream a file through SHA-256.
///
/// The file is read in fixed-size chunks so large binaries are never held in
/// memory at once.
pub async fn hash_file(path: &Path) -> std::io::Result<ContentHash> {
  let mut file = tokio::fs::File::open(path).await?;

  let mut hasher = Sha256::new();
  let mut buffer = vec![0u8; HASH_BUFFER_SIZE];

  loop {
    let bytes_read = file.read(&mut buffer).await?;
    if bytes_read == 0 {
      break;
    }
    hasher.update(&buffer[..bytes_read]);
  }

  Ok(ContentHash(hex::encode(hasher.finalize())))
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}
