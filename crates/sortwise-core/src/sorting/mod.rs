//! # Sorting
//!
//! Orders plugins by the pairwise [`LoadOrderComparator`] relation.
//! [`LoadOrderSorter`] sorts an already filtered batch; [`LoadOrderPipeline`]
//! runs the whole flow from scans and metadata lists to a report.
pub mod comparator;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod sorter;

pub use comparator::{LoadOrderComparator, Strictness};
pub use error::SortError;
pub use graph::DependencyGraph;
pub use pipeline::{LoadOrderPipeline, SortOutcome, SortReport};
pub use sorter::LoadOrderSorter;

#[cfg(test)]
mod tests;
