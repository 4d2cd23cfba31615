use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::InferenceError;

/// Delivery mechanism for a binary module's bytes.
///
/// A worker is handed one `ModuleSource` at construction time and fetches from
/// it exactly once, before loading. The source only has to eventually yield
/// the raw bytes or fail with a descriptive error; where the bytes come from
/// (filesystem, embedded data, a remote store) is its own business.
#[async_trait]
pub trait ModuleSource: Send + Sync + 'static {
    /// Produces the module's raw bytes.
    ///
    /// Failures surface as [`InferenceError::ModuleLoad`] and are fatal to
    /// the worker that requested them.
    async fn fetch(&self) -> Result<Vec<u8>, InferenceError>;
}

/// Reads the module from a file on disk.
pub struct FileModuleSource {
    path: PathBuf,
}

impl FileModuleSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ModuleSource for FileModuleSource {
    async fn fetch(&self) -> Result<Vec<u8>, InferenceError> {
        tokio::fs::read(&self.path).await.map_err(|e| {
            InferenceError::ModuleLoad(format!("reading {}: {}", self.path.display(), e))
        })
    }
}

/// Serves module bytes already resident in memory.
pub struct StaticModuleSource {
    bytes: Vec<u8>,
}

impl StaticModuleSource {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
impl ModuleSource for StaticModuleSource {
    async fn fetch(&self) -> Result<Vec<u8>, InferenceError> {
        Ok(self.bytes.clone())
    }
}
