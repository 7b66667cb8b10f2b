//! # Sortwise Core
//!
//! Plugin metadata model, merging, condition filtering and load order
//! sorting for games that load content plugins in a fixed order.
pub mod condition;
pub mod kernel;
pub mod metadata;
pub mod sorting;
pub mod storage;
pub mod utils;
pub mod validity;

// Re-export key public types for the binary and downstream callers
pub use condition::{ActiveConstraintFilter, BasicConditionEvaluator, ConditionEvaluator, GameState};
pub use kernel::error::{Error, Result};
pub use metadata::{
    CategoryTag, ConditionalEntry, ContentIdentifier, FileReference, Message, MessageSeverity,
    MetadataMerger, PluginMetadata,
};
pub use sorting::{
    LoadOrderComparator, LoadOrderPipeline, LoadOrderSorter, SortError, SortOutcome, SortReport, Strictness,
};
pub use storage::{FileMetadataSource, MetadataSource, ScanList, ScanListExtractor, SortConfig};
pub use validity::{InstallState, InstallValidityChecker};

#[cfg(test)]
mod tests;
