//! # Metadata Errors
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetadataError {
    /// A raw content identifier points past the contributing plugin list.
    /// Normally recovered by clamping to the last plugin.
    #[error("Content identifier {raw:#010x} selects plugin index {index}, but only {known} plugins contribute")]
    MalformedContentIdentifier { raw: u32, index: usize, known: usize },

    #[error("Cannot resolve content identifier {raw:#010x}: no contributing plugins")]
    NoContributingPlugins { raw: u32 },

    #[error("Metadata for '{found}' cannot be used as metadata for '{expected}'")]
    NameMismatch { expected: String, found: String },

    #[error("Content extraction failed for '{plugin}': {message}")]
    Extraction { plugin: String, message: String },
}
