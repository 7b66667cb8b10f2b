use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::kernel::constants::{
    EMBEDDED_TAGS_CLOSE, EMBEDDED_TAGS_OPEN, REGEX_NAME_SUFFIXES,
};
use crate::metadata::content::{ContentIdentifier, ExtractedContent};
use crate::metadata::entry::{
    CategoryTag, EntrySet, FileReference, FileSpec, Message, TagSpec,
};
use crate::utils::names_match;

fn default_enabled() -> bool {
    true
}

/// Everything known about one plugin from one or more sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginMetadata {
    /// Plugin file name; compared case-insensitively
    pub name: String,

    /// Disabled records contribute nothing when merged
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Lower values load earlier
    #[serde(default)]
    pub priority: i32,

    /// Plugins this plugin was built on, in file order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub master_plugins: Vec<String>,

    /// Whether the plugin is flagged as a master file
    #[serde(default)]
    pub is_master_file: bool,

    #[serde(default, skip_serializing_if = "EntrySet::is_empty")]
    pub load_after: EntrySet<FileSpec>,

    #[serde(default, skip_serializing_if = "EntrySet::is_empty")]
    pub requirements: EntrySet<FileSpec>,

    #[serde(default, skip_serializing_if = "EntrySet::is_empty")]
    pub incompatibilities: EntrySet<FileSpec>,

    #[serde(default, skip_serializing_if = "EntrySet::is_empty")]
    pub tags: EntrySet<TagSpec>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,

    /// Only ever filled from a content scan
    #[serde(skip)]
    content_ids: BTreeSet<ContentIdentifier>,
}

impl PluginMetadata {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            priority: 0,
            master_plugins: Vec::new(),
            is_master_file: false,
            load_after: EntrySet::new(),
            requirements: EntrySet::new(),
            incompatibilities: EntrySet::new(),
            tags: EntrySet::new(),
            messages: Vec::new(),
            content_ids: BTreeSet::new(),
        }
    }

    /// Build the record a content scan describes, including any category
    /// tags embedded in the plugin's description.
    pub fn from_content(name: &str, content: ExtractedContent) -> Self {
        let mut plugin = Self::new(name);
        plugin.apply_content(content);
        plugin
    }

    /// Overwrite the scan-owned fields (master flag, masters, content ids)
    /// with a content scan. Embedded tags are added unless a tag of the same
    /// name is already present.
    pub fn apply_content(&mut self, content: ExtractedContent) {
        if let Some(description) = &content.description {
            for tag in embedded_tags(description) {
                self.tags.insert_if_absent(tag);
            }
        }
        self.is_master_file = content.is_master;
        self.master_plugins = content.master_plugins;
        self.content_ids = content.content_ids;
    }

    pub fn content_ids(&self) -> &BTreeSet<ContentIdentifier> {
        &self.content_ids
    }

    pub(crate) fn set_content_ids(&mut self, content_ids: BTreeSet<ContentIdentifier>) {
        self.content_ids = content_ids;
    }

    /// True if this record carries nothing beyond the plugin's name
    pub fn has_name_only(&self) -> bool {
        self.priority == 0
            && self.enabled
            && self.load_after.is_empty()
            && self.requirements.is_empty()
            && self.incompatibilities.is_empty()
            && self.messages.is_empty()
            && self.tags.is_empty()
    }

    /// True if the name is a pattern (ends in an escaped plugin extension)
    /// rather than a concrete file name
    pub fn is_regex_name(&self) -> bool {
        let lower = self.name.to_lowercase();
        REGEX_NAME_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
    }

    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }

    /// True if this plugin must load after `other`: `other` is one of its
    /// masters, requirements or load-after targets.
    pub fn must_load_after(&self, other: &PluginMetadata) -> bool {
        self.master_plugins.iter().any(|m| names_match(m, &other.name))
            || self.requirements.contains(&other.name)
            || self.load_after.contains(&other.name)
    }

    /// Content identifiers defined by both plugins
    pub fn overlapping_content(&self, other: &PluginMetadata) -> BTreeSet<ContentIdentifier> {
        self.content_ids
            .intersection(&other.content_ids)
            .cloned()
            .collect()
    }

    /// True if the plugins define at least one common content identifier
    pub fn shares_content(&self, other: &PluginMetadata) -> bool {
        let (small, large) = if self.content_ids.len() <= other.content_ids.len() {
            (&self.content_ids, &other.content_ids)
        } else {
            (&other.content_ids, &self.content_ids)
        };
        small.iter().any(|id| large.contains(id))
    }

    /// True if an addition tag with this name is present
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.get(name).is_some_and(|tag| tag.is_addition())
    }

    /// Messages to show to a reader of the given language
    pub fn messages_for_language<'a>(&'a self, language: &'a str) -> impl Iterator<Item = &'a Message> {
        self.messages.iter().filter(move |m| m.is_for_language(language))
    }
}

/// Category tags embedded in a description as `{{BASH:Tag1,-Tag2}}`.
pub fn embedded_tags(description: &str) -> Vec<CategoryTag> {
    let Some(start) = description.find(EMBEDDED_TAGS_OPEN) else {
        return Vec::new();
    };
    let body_start = start + EMBEDDED_TAGS_OPEN.len();
    let Some(len) = description[body_start..].find(EMBEDDED_TAGS_CLOSE) else {
        return Vec::new();
    };

    description[body_start..body_start + len]
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(CategoryTag::tag)
        .collect()
}

/// Builder for creating plugin metadata
pub struct PluginMetadataBuilder {
    metadata: PluginMetadata,
}

impl PluginMetadataBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            metadata: PluginMetadata::new(name),
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.metadata.enabled = enabled;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.metadata.priority = priority;
        self
    }

    pub fn master_file(mut self, is_master: bool) -> Self {
        self.metadata.is_master_file = is_master;
        self
    }

    pub fn master(mut self, name: &str) -> Self {
        self.metadata.master_plugins.push(name.to_string());
        self
    }

    pub fn load_after(mut self, file: FileReference) -> Self {
        self.metadata.load_after.insert(file);
        self
    }

    pub fn requirement(mut self, file: FileReference) -> Self {
        self.metadata.requirements.insert(file);
        self
    }

    pub fn incompatibility(mut self, file: FileReference) -> Self {
        self.metadata.incompatibilities.insert(file);
        self
    }

    pub fn tag(mut self, tag: CategoryTag) -> Self {
        self.metadata.tags.insert(tag);
        self
    }

    pub fn message(mut self, message: Message) -> Self {
        self.metadata.messages.push(message);
        self
    }

    /// Content identifiers as a scan would report them
    pub fn content_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = ContentIdentifier>,
    {
        self.metadata.set_content_ids(ids.into_iter().collect());
        self
    }

    pub fn build(self) -> PluginMetadata {
        self.metadata
    }
}
