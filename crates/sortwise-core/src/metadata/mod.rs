//! # Plugin Metadata
//!
//! The data model describing one plugin and the rules for combining records
//! about the same plugin that come from different sources.
//!
//! - **[`content`]**: [`ContentIdentifier`] values and the content-scan
//!   interface ([`ContentExtractor`]) that produces them.
//! - **[`entry`]**: [`ConditionalEntry`] and its three variants
//!   ([`FileReference`], [`CategoryTag`], [`Message`]) plus [`EntrySet`].
//! - **[`plugin`]**: [`PluginMetadata`], the per-plugin aggregate.
//! - **[`merge`]**: [`MetadataMerger`] and its explicit per-field policy.
//! - **[`error`]**: [`MetadataError`](error::MetadataError).
pub mod content;
pub mod entry;
pub mod error;
pub mod merge;
pub mod plugin;

pub use content::{ContentExtractor, ContentIdentifier, ExtractedContent};
pub use entry::{
    CategoryTag, ConditionalEntry, EntryKey, EntrySet, FileReference, FileSpec, Message,
    MessageBody, MessageSeverity, TagSpec,
};
pub use merge::{FieldPolicy, MetadataField, MetadataMerger};
pub use plugin::{PluginMetadata, PluginMetadataBuilder};

#[cfg(test)]
mod tests;
