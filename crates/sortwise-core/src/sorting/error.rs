//! # Sorting Errors
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortError {
    /// Each plugin must load after the other
    #[error("Cyclic interaction detected between \"{first}\" and \"{second}\": each must load after the other")]
    OrderingCycle { first: String, second: String },

    /// Explicit load-after, requirement or master relations form a loop
    #[error("Cyclic interaction detected: {}", describe_cycle(.0))]
    DependencyCycle(Vec<String>),
}

impl SortError {
    pub fn is_cycle(&self) -> bool {
        matches!(self, SortError::OrderingCycle { .. } | SortError::DependencyCycle(_))
    }

    /// Plugins named by the error
    pub fn plugins(&self) -> Vec<String> {
        match self {
            SortError::OrderingCycle { first, second } => vec![first.clone(), second.clone()],
            SortError::DependencyCycle(path) => {
                let mut plugins = path.clone();
                // The path repeats its first node at the end
                if plugins.len() > 1 && plugins.first() == plugins.last() {
                    plugins.pop();
                }
                plugins
            }
        }
    }
}

/// Render a cycle path as `A --> B --> A`
pub fn describe_cycle(path: &[String]) -> String {
    path.join(" --> ")
}
