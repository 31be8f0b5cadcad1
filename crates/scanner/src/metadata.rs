use crate::error::Result;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::io::AsyncReadExt;

const HASH_BUF_BYTES: usize = 64 * 1024;

/// File identity used to decide whether a cached parse result is still valid
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
    /// Hex sha256 of the file contents
    pub content_hash: String,
}

impl FileMetadata {
    pub async fn compute(path: &Path) -> Result<Self> {
        let meta = tokio::fs::metadata(path).await?;
        let modified = meta.modified()?;

        let mut file = tokio::fs::File::open(path).await?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; HASH_BUF_BYTES];
        loop {
            let n = file.read(&mut buf).await?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(Self {
            path: path.to_path_buf(),
            modified,
            size: meta.len(),
            content_hash: hex(&hasher.finalize()),
        })
    }

    /// Like [`FileMetadata::compute`], with every failure treated as "unknown"
    pub async fn probe(path: &Path) -> Option<Self> {
        match Self::compute(path).await {
            Ok(meta) => Some(meta),
            Err(e) => {
                log::debug!("Metadata unavailable for {}: {e}", path.display());
                None
            }
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    bytes.iter().fold(String::with_capacity(bytes.len() * 2), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}
