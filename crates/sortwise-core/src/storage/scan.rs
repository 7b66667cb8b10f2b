//! Scan lists: pre-computed content scans of plugin files, standing in for
//! a binary plugin parser.
use std::collections::HashMap;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::kernel::error::{Error, Result};
use crate::metadata::content::{ContentExtractor, ExtractedContent};
use crate::metadata::error::MetadataError;
use crate::storage::config::ConfigFormat;
use crate::utils::name_key;

/// Scan output for one plugin file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub name: String,
    #[serde(default)]
    pub is_master: bool,
    #[serde(default)]
    pub masters: Vec<String>,
    /// Raw 32-bit record identifiers
    #[serde(default)]
    pub records: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanList {
    #[serde(default)]
    pub plugins: Vec<ScanRecord>,
}

impl ScanList {
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self> {
        format.parse(data)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::require_from_path(path)?;
        let data = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(e, "read_scan_list", path.to_path_buf()))?;
        Self::parse(&data, format)
    }
}

/// Serves [`ExtractedContent`] from a scan list
#[derive(Debug, Clone, Default)]
pub struct ScanListExtractor {
    records: HashMap<String, ScanRecord>,
    order: Vec<String>,
}

impl ScanListExtractor {
    /// Later records for the same plugin replace earlier ones
    pub fn new(list: ScanList) -> Self {
        let mut extractor = Self::default();
        for record in list.plugins {
            let key = name_key(&record.name);
            if extractor.records.insert(key, record.clone()).is_some() {
                debug!("Duplicate scan record for '{}', keeping the last", record.name);
                extractor.order.retain(|name| name_key(name) != name_key(&record.name));
            }
            extractor.order.push(record.name);
        }
        extractor
    }

    /// Plugin names in scan list order
    pub fn plugin_names(&self) -> &[String] {
        &self.order
    }
}

impl ContentExtractor for ScanListExtractor {
    fn name(&self) -> &str {
        "scan-list"
    }

    fn extract(&self, plugin_name: &str) -> Result<ExtractedContent> {
        let record = self.records.get(&name_key(plugin_name)).ok_or_else(|| {
            Error::Metadata(MetadataError::Extraction {
                plugin: plugin_name.to_string(),
                message: "no scan record".to_string(),
            })
        })?;

        ExtractedContent::from_raw_records(
            &record.name,
            record.is_master,
            record.masters.clone(),
            &record.records,
            record.description.clone(),
        )
    }
}
