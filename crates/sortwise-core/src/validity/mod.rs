//! # Install Validity
//!
//! Checks a plugin's masters, requirements and incompatibilities against
//! what is actually installed. Problems are reported, never raised: a missing
//! file is a normal state.
use std::collections::BTreeMap;

use crate::kernel::constants::FILTER_TAG;
use crate::metadata::entry::Message;
use crate::metadata::plugin::PluginMetadata;

/// Answers whether a file is present in the game's install
pub trait InstallState: Send + Sync {
    fn has_file(&self, name: &str) -> bool;
}

/// Problem map: `false` means a needed file is missing, `true` means an
/// incompatible file is present.
pub type ValidityReport = BTreeMap<String, bool>;

/// Checks plugins against an install state
pub struct InstallValidityChecker<'a> {
    state: &'a dyn InstallState,
}

impl<'a> InstallValidityChecker<'a> {
    pub fn new(state: &'a dyn InstallState) -> Self {
        Self { state }
    }

    /// Problems for one plugin. Empty means no problems.
    pub fn check(&self, metadata: &PluginMetadata) -> ValidityReport {
        check_validity(metadata, self.state)
    }

    /// Problems rendered as error messages
    pub fn messages(&self, metadata: &PluginMetadata) -> Vec<Message> {
        validity_messages(&self.check(metadata))
    }
}

/// Report missing masters and requirements, and present incompatibilities.
///
/// Masters are skipped for plugins carrying the `Filter` tag, which are
/// built to work without them.
pub fn check_validity(metadata: &PluginMetadata, state: &dyn InstallState) -> ValidityReport {
    let mut issues = ValidityReport::new();

    if !metadata.has_tag(FILTER_TAG) {
        for master in &metadata.master_plugins {
            if !state.has_file(master) {
                issues.insert(master.clone(), false);
            }
        }
    }

    for file in metadata.requirements.iter() {
        if !state.has_file(file.name()) {
            issues.insert(file.name().to_string(), false);
        }
    }

    for file in metadata.incompatibilities.iter() {
        if state.has_file(file.name()) {
            issues.insert(file.name().to_string(), true);
        }
    }

    issues
}

/// Turn a problem map into error messages, in file name order
pub fn validity_messages(report: &ValidityReport) -> Vec<Message> {
    report
        .iter()
        .map(|(file, present)| {
            let text = if *present {
                format!("This plugin is incompatible with \"{}\", but both are present.", file)
            } else {
                format!("This plugin requires \"{}\" to be installed, but it is missing.", file)
            };
            Message::error(&text)
        })
        .collect()
}
