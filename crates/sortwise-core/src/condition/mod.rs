//! # Conditions
//!
//! Metadata entries may carry a condition string that decides whether they
//! currently apply. This module defines the evaluation seam
//! ([`ConditionEvaluator`]), the snapshot of game state conditions are
//! evaluated against ([`GameState`]), a small built-in evaluator
//! ([`BasicConditionEvaluator`]) and the filter that prunes inactive entries
//! from a record ([`ActiveConstraintFilter`]).
pub mod basic;
pub mod error;
pub mod filter;

use std::collections::HashSet;
use std::path::Path;

use crate::kernel::error::Result;
use crate::storage::local::LocalDataDirectory;
use crate::utils::name_key;
use crate::validity::InstallState;

pub use basic::BasicConditionEvaluator;
pub use error::ConditionError;
pub use filter::{ActiveConstraintFilter, EvaluationFailurePolicy, FailurePolicies};

/// Evaluates condition strings against the current game state.
///
/// Implementations must be usable from several threads at once.
pub trait ConditionEvaluator: Send + Sync {
    fn evaluate(&self, condition: &str, state: &GameState) -> std::result::Result<bool, ConditionError>;
}

/// Snapshot of which files are installed and which plugins are active.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    installed: HashSet<String>,
    active: HashSet<String>,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the files directly inside a game's data directory
    pub fn from_data_dir(path: &Path) -> Result<Self> {
        let dir = LocalDataDirectory::new(path.to_path_buf());
        let mut state = Self::new();
        for file in dir.list_files()? {
            state.add_file(&file);
        }
        Ok(state)
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for file in files {
            self.add_file(file.as_ref());
        }
        self
    }

    pub fn with_active<I, S>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for plugin in plugins {
            self.active.insert(name_key(plugin.as_ref()));
        }
        self
    }

    pub fn add_file(&mut self, name: &str) {
        self.installed.insert(name_key(name));
    }

    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(&name_key(name))
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(&name_key(name))
    }
}

impl InstallState for GameState {
    fn has_file(&self, name: &str) -> bool {
        self.is_installed(name)
    }
}
