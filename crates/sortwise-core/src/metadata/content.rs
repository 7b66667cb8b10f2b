use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use log::warn;
use serde::Serialize;

use crate::kernel::constants::{CONTENT_INDEX_SHIFT, CONTENT_LOCAL_ID_MASK};
use crate::kernel::error::Result;
use crate::metadata::error::MetadataError;
use crate::utils::name_key;

/// Identifies one content record, scoped to the plugin that defines it.
///
/// Equality, ordering and hashing use the owning plugin name case-insensitively
/// together with the local id. There are no setters: a resolved identifier
/// never changes.
#[derive(Debug, Clone, Serialize)]
pub struct ContentIdentifier {
    owning_plugin: String,
    local_id: u32,
    #[serde(skip)]
    plugin_key: String,
}

impl ContentIdentifier {
    /// Create an identifier from an owning plugin and a local id.
    /// Only the low 24 bits of `local_id` are kept.
    pub fn new(owning_plugin: &str, local_id: u32) -> Self {
        Self {
            owning_plugin: owning_plugin.to_string(),
            local_id: local_id & CONTENT_LOCAL_ID_MASK,
            plugin_key: name_key(owning_plugin),
        }
    }

    /// Resolve a combined 32-bit value against the ordered list of plugins
    /// that contribute to a plugin's records (its masters, then itself).
    ///
    /// An index past the end of `sources` is clamped to the last entry and
    /// logged. Fails only when `sources` is empty.
    pub fn resolve(sources: &[String], raw: u32) -> Result<Self> {
        match Self::resolve_strict(sources, raw) {
            Err(err @ MetadataError::MalformedContentIdentifier { .. }) => {
                warn!("{}; using the last contributing plugin", err);
                Ok(Self::clamp_to_last(sources, raw))
            }
            other => Ok(other?),
        }
    }

    fn clamp_to_last(sources: &[String], raw: u32) -> Self {
        Self::new(sources.last().map_or("", String::as_str), raw)
    }

    /// Like [`resolve`](Self::resolve) but reports an out-of-range index as
    /// [`MetadataError::MalformedContentIdentifier`] instead of clamping.
    pub fn resolve_strict(
        sources: &[String],
        raw: u32,
    ) -> std::result::Result<Self, MetadataError> {
        if sources.is_empty() {
            return Err(MetadataError::NoContributingPlugins { raw });
        }
        let index = (raw >> CONTENT_INDEX_SHIFT) as usize;
        match sources.get(index) {
            Some(plugin) => Ok(Self::new(plugin, raw)),
            None => Err(MetadataError::MalformedContentIdentifier {
                raw,
                index,
                known: sources.len(),
            }),
        }
    }

    pub fn owning_plugin(&self) -> &str {
        &self.owning_plugin
    }

    pub fn local_id(&self) -> u32 {
        self.local_id
    }
}

impl PartialEq for ContentIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.local_id == other.local_id && self.plugin_key == other.plugin_key
    }
}

impl Eq for ContentIdentifier {}

impl Hash for ContentIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.plugin_key.hash(state);
        self.local_id.hash(state);
    }
}

impl PartialOrd for ContentIdentifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ContentIdentifier {
    fn cmp(&self, other: &Self) -> Ordering {
        self.plugin_key
            .cmp(&other.plugin_key)
            .then(self.local_id.cmp(&other.local_id))
    }
}

impl fmt::Display for ContentIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:06X}", self.owning_plugin, self.local_id)
    }
}

/// What a content scan of one plugin file yields.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    pub is_master: bool,
    pub master_plugins: Vec<String>,
    pub content_ids: BTreeSet<ContentIdentifier>,
    /// Free-text description, which may embed category tags
    pub description: Option<String>,
    /// Raw identifiers that had to be clamped during resolution
    pub malformed_ids: usize,
}

impl ExtractedContent {
    /// Build scan output from raw record identifiers.
    ///
    /// Raw ids are resolved against `master_plugins` followed by the plugin
    /// itself, which is how plugin files number their contributing plugins.
    pub fn from_raw_records(
        plugin_name: &str,
        is_master: bool,
        master_plugins: Vec<String>,
        raw_ids: &[u32],
        description: Option<String>,
    ) -> Result<Self> {
        let mut sources = master_plugins.clone();
        sources.push(plugin_name.to_string());

        let mut content_ids = BTreeSet::new();
        let mut malformed_ids = 0;
        for &raw in raw_ids {
            let id = match ContentIdentifier::resolve_strict(&sources, raw) {
                Err(MetadataError::MalformedContentIdentifier { .. }) => {
                    malformed_ids += 1;
                    ContentIdentifier::clamp_to_last(&sources, raw)
                }
                other => other?,
            };
            content_ids.insert(id);
        }

        if malformed_ids > 0 {
            warn!(
                "'{}' has {} record(s) with an out-of-range plugin index",
                plugin_name, malformed_ids
            );
        }

        Ok(Self {
            is_master,
            master_plugins,
            content_ids,
            description,
            malformed_ids,
        })
    }
}

/// Source of content scans. Parsing plugin files is left to implementors.
pub trait ContentExtractor: Send + Sync {
    /// Name of this extractor, for logging
    fn name(&self) -> &str;

    /// Scan the named plugin
    fn extract(&self, plugin_name: &str) -> Result<ExtractedContent>;
}
