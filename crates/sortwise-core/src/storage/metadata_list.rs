//! Declarative metadata lists: the masterlist and userlist files that supply
//! hand-written metadata for plugins.
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::kernel::error::{Error, Result};
use crate::metadata::plugin::PluginMetadata;
use crate::storage::config::ConfigFormat;
use crate::storage::error::StorageSystemError;

/// On-disk shape of a metadata list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataList {
    #[serde(default)]
    pub plugins: Vec<PluginMetadata>,
}

impl MetadataList {
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self> {
        format.parse(data)
    }

    pub fn to_string(&self, format: ConfigFormat) -> Result<String> {
        format.serialize(self)
    }
}

/// Somewhere metadata records come from
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Name of this source, for logging
    fn name(&self) -> &str;

    async fn load(&self) -> Result<Vec<PluginMetadata>>;
}

/// A metadata list read from a file, format chosen by extension
#[derive(Debug, Clone)]
pub struct FileMetadataSource {
    path: PathBuf,
    name: String,
}

impl FileMetadataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path.display().to_string();
        Self { path, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MetadataSource for FileMetadataSource {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self) -> Result<Vec<PluginMetadata>> {
        let format = ConfigFormat::require_from_path(&self.path)?;
        if !self.path.exists() {
            return Err(Error::StorageSystem(StorageSystemError::FileNotFound(self.path.clone())));
        }

        debug!("Reading metadata list {}", self.path.display());
        let data = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::io(e, "read_metadata_list", self.path.clone()))?;

        let list = MetadataList::parse(&data, format)?;
        info!("Loaded {} records from {}", list.plugins.len(), self.name);
        Ok(list.plugins)
    }
}

/// Load several sources in order, one record list per source
pub async fn load_all(sources: &[Box<dyn MetadataSource>]) -> Result<Vec<Vec<PluginMetadata>>> {
    let mut lists = Vec::with_capacity(sources.len());
    for source in sources {
        lists.push(source.load().await?);
    }
    Ok(lists)
}
