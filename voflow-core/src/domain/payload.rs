//! Upload payloads
//!
//! A transfer can carry either bytes already in memory (typically a query
//! result) or the contents of a local file. Reading happens lazily, just
//! before the push.

use std::path::PathBuf;

/// Data to be pushed to the store
#[derive(Debug, Clone)]
pub enum Payload {
    Bytes(Vec<u8>),
    File(PathBuf),
}

impl Payload {
    /// Produce the upload-ready bytes
    pub async fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes),
            Self::File(path) => tokio::fs::read(path).await,
        }
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<PathBuf> for Payload {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}
