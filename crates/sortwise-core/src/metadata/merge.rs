//! Combining records that describe the same plugin.
//!
//! Every field has a named policy, listed by [`MetadataMerger::policy`]:
//!
//! | field | policy |
//! |---|---|
//! | `priority`, `master_plugins`, `content_ids`, `is_master_file` | [`FieldPolicy::Replace`] |
//! | `load_after`, `requirements`, `incompatibilities` | [`FieldPolicy::UnionKeepTarget`] |
//! | `tags` | [`FieldPolicy::UnionSourceWins`] |
//! | `messages` | [`FieldPolicy::Concatenate`] |
//! | `name`, `enabled` | [`FieldPolicy::Keep`] |
//!
//! Sources are merged from least to most specific, so replaced fields end up
//! holding the value of the last enabled source.
use std::collections::HashMap;

use log::debug;

use crate::metadata::plugin::PluginMetadata;
use crate::utils::{name_key, names_match};

/// Fields of [`PluginMetadata`] as seen by the merger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataField {
    Name,
    Enabled,
    Priority,
    MasterPlugins,
    ContentIds,
    IsMasterFile,
    LoadAfter,
    Requirements,
    Incompatibilities,
    Tags,
    Messages,
}

/// How a field of the source record combines with the target's
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Target value is never changed
    Keep,
    /// Source value replaces target value
    Replace,
    /// Set union; on an identity collision the target entry stays
    UnionKeepTarget,
    /// Set union; on an identity collision the source entry wins
    UnionSourceWins,
    /// Target entries followed by source entries, duplicates kept
    Concatenate,
}

/// Merges records describing the same plugin
pub struct MetadataMerger;

impl MetadataMerger {
    /// Policy applied to a field
    pub fn policy(field: MetadataField) -> FieldPolicy {
        match field {
            MetadataField::Name | MetadataField::Enabled => FieldPolicy::Keep,
            MetadataField::Priority
            | MetadataField::MasterPlugins
            | MetadataField::ContentIds
            | MetadataField::IsMasterFile => FieldPolicy::Replace,
            MetadataField::LoadAfter
            | MetadataField::Requirements
            | MetadataField::Incompatibilities => FieldPolicy::UnionKeepTarget,
            MetadataField::Tags => FieldPolicy::UnionSourceWins,
            MetadataField::Messages => FieldPolicy::Concatenate,
        }
    }

    /// Merge `source` into `target`.
    ///
    /// Returns `target` untouched if the names differ or `source` is disabled.
    pub fn merge(mut target: PluginMetadata, source: &PluginMetadata) -> PluginMetadata {
        target.merge_from(source);
        target
    }

    /// Fold same-named records, least specific first. The first enabled
    /// record's name is kept; disabled records and records for other plugins
    /// are ignored. `None` if no record is enabled.
    pub fn merge_all<I>(records: I) -> Option<PluginMetadata>
    where
        I: IntoIterator<Item = PluginMetadata>,
    {
        let mut records = records.into_iter().filter(|record| record.enabled);
        let first = records.next()?;
        Some(records.fold(first, |acc, next| Self::merge(acc, &next)))
    }

    /// Group records from several sources by plugin name and merge each
    /// group. Sources are given least specific first. Disabled records are
    /// dropped. The output keeps the order in which plugin names were first
    /// seen.
    pub fn merge_sources<S>(sources: S) -> Vec<PluginMetadata>
    where
        S: IntoIterator<Item = Vec<PluginMetadata>>,
    {
        let mut merged: Vec<PluginMetadata> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for source in sources {
            for record in source {
                if !record.enabled {
                    debug!("Ignoring disabled metadata record for '{}'", record.name);
                    continue;
                }
                match index.get(&name_key(&record.name)) {
                    Some(&i) => merged[i].merge_from(&record),
                    None => {
                        index.insert(name_key(&record.name), merged.len());
                        merged.push(record);
                    }
                }
            }
        }

        merged
    }
}

impl PluginMetadata {
    /// In-place form of [`MetadataMerger::merge`]
    pub fn merge_from(&mut self, source: &PluginMetadata) {
        if !names_match(&self.name, &source.name) || !source.enabled {
            debug!(
                "Skipping merge of '{}' into '{}' (enabled: {})",
                source.name, self.name, source.enabled
            );
            return;
        }

        self.priority = source.priority;
        self.master_plugins = source.master_plugins.clone();
        self.set_content_ids(source.content_ids().clone());
        self.is_master_file = source.is_master_file;

        for file in source.load_after.iter() {
            self.load_after.insert_if_absent(file.clone());
        }
        for file in source.requirements.iter() {
            self.requirements.insert_if_absent(file.clone());
        }
        for file in source.incompatibilities.iter() {
            self.incompatibilities.insert_if_absent(file.clone());
        }

        for tag in source.tags.iter() {
            self.tags.insert(tag.clone());
        }

        self.messages.extend(source.messages.iter().cloned());
    }
}
