//! Where asset bytes come from.

use crate::{prelude::HashMap, MapError, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Anything that can produce the raw bytes of an asset given its location.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetch the bytes stored at `location`.
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

/// Reads assets from the local filesystem, optionally relative to a root.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    root: Option<PathBuf>,
}

impl FileSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, location: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(location),
            None => PathBuf::from(location),
        }
    }
}

#[async_trait]
impl AssetSource for FileSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = self.resolve(location);
        log::debug!("reading asset from {}", path.display());

        #[cfg(feature = "tokio-runtime")]
        let bytes = tokio::fs::read(&path).await?;
        #[cfg(not(feature = "tokio-runtime"))]
        let bytes = std::fs::read(&path)?;

        Ok(bytes)
    }
}

/// Fetches assets over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("nearmap/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl AssetSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        log::debug!("fetching asset {}", location);
        let response = self.client.get(location).send().await?;
        if !response.status().is_success() {
            return Err(MapError::AssetLoad {
                asset: location.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

/// Serves `http://` and `https://` locations over the network and
/// everything else from the filesystem.
#[derive(Debug, Clone)]
pub struct DefaultSource {
    file: FileSource,
    http: HttpSource,
}

impl DefaultSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            file: FileSource::new(),
            http: HttpSource::new()?,
        })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            file: FileSource::with_root(root),
            http: HttpSource::new()?,
        })
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

#[async_trait]
impl AssetSource for DefaultSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if is_remote(location) {
            self.http.fetch(location).await
        } else {
            self.file.fetch(location).await
        }
    }
}

/// In-memory assets, for embedding resources in a binary or for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(location.into(), bytes.into());
    }

    pub fn with(mut self, location: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(location, bytes);
        self
    }
}

#[async_trait]
impl AssetSource for MemorySource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        self.entries
            .get(location)
            .cloned()
            .ok_or_else(|| MapError::AssetLoad {
                asset: location.to_string(),
                reason: "not found".to_string(),
            })
    }
}
