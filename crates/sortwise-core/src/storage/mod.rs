//! # Storage
//!
//! File-backed adapters around the core: configuration, declarative metadata
//! lists, content scan lists and the live data directory.
pub mod config;
pub mod error;
pub mod local;
pub mod metadata_list;
pub mod scan;

pub use config::{ConfigFormat, SortConfig};
pub use local::LocalDataDirectory;
pub use metadata_list::{FileMetadataSource, MetadataList, MetadataSource};
pub use scan::{ScanList, ScanListExtractor, ScanRecord};

#[cfg(test)]
mod tests;
