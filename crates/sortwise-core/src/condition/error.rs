//! # Condition Errors
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConditionError {
    #[error("Could not parse condition '{condition}': {message}")]
    Parse { condition: String, message: String },

    #[error("Unknown function '{function}' in condition '{condition}'")]
    UnknownFunction { condition: String, function: String },

    #[error("Could not evaluate condition '{condition}': {message}")]
    Evaluation { condition: String, message: String },
}

impl ConditionError {
    pub fn parse(condition: &str, message: impl Into<String>) -> Self {
        ConditionError::Parse {
            condition: condition.to_string(),
            message: message.into(),
        }
    }

    /// The condition string that failed
    pub fn condition(&self) -> &str {
        match self {
            ConditionError::Parse { condition, .. }
            | ConditionError::UnknownFunction { condition, .. }
            | ConditionError::Evaluation { condition, .. } => condition,
        }
    }
}
