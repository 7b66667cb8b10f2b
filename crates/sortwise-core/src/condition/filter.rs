use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::condition::error::ConditionError;
use crate::condition::{ConditionEvaluator, GameState};
use crate::metadata::entry::{EntryKey, EntrySet, Message};
use crate::metadata::plugin::PluginMetadata;

/// What to do with an entry whose condition cannot be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationFailurePolicy {
    /// Drop the entry and attach an error message to the plugin
    #[default]
    Substitute,
    /// Return the error to the caller
    Propagate,
}

/// Failure policy per entry group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FailurePolicies {
    /// Load-after targets, requirements and incompatibilities
    pub files: EvaluationFailurePolicy,
    pub tags: EvaluationFailurePolicy,
    pub messages: EvaluationFailurePolicy,
}

impl FailurePolicies {
    pub fn all(policy: EvaluationFailurePolicy) -> Self {
        Self {
            files: policy,
            tags: policy,
            messages: policy,
        }
    }
}

/// Removes entries whose conditions do not currently hold.
pub struct ActiveConstraintFilter<'a> {
    evaluator: &'a dyn ConditionEvaluator,
    state: &'a GameState,
    policies: FailurePolicies,
}

impl<'a> ActiveConstraintFilter<'a> {
    pub fn new(evaluator: &'a dyn ConditionEvaluator, state: &'a GameState) -> Self {
        Self {
            evaluator,
            state,
            policies: FailurePolicies::default(),
        }
    }

    pub fn with_policies(mut self, policies: FailurePolicies) -> Self {
        self.policies = policies;
        self
    }

    /// Filter a record, never failing: entries whose conditions cannot be
    /// evaluated are dropped and reported as error messages.
    pub fn filter_active(&self, metadata: PluginMetadata) -> PluginMetadata {
        let (filtered, _) = self.run(metadata, FailurePolicies::all(EvaluationFailurePolicy::Substitute));
        filtered
    }

    /// Filter a record following the configured failure policies.
    pub fn try_filter_active(&self, metadata: PluginMetadata) -> Result<PluginMetadata, ConditionError> {
        match self.run(metadata, self.policies) {
            (filtered, None) => Ok(filtered),
            (_, Some(e)) => Err(e),
        }
    }

    fn run(
        &self,
        mut metadata: PluginMetadata,
        policies: FailurePolicies,
    ) -> (PluginMetadata, Option<ConditionError>) {
        let name = metadata.name.clone();
        let mut diagnostics = Vec::new();
        let mut failure = None;

        self.prune_set(&name, &mut metadata.load_after, policies.files, &mut diagnostics, &mut failure);
        self.prune_set(&name, &mut metadata.requirements, policies.files, &mut diagnostics, &mut failure);
        self.prune_set(&name, &mut metadata.incompatibilities, policies.files, &mut diagnostics, &mut failure);
        self.prune_set(&name, &mut metadata.tags, policies.tags, &mut diagnostics, &mut failure);
        metadata.messages.retain(|message| {
            self.keep(&name, &message.condition, policies.messages, &mut diagnostics, &mut failure)
        });

        metadata.messages.extend(diagnostics);
        (metadata, failure)
    }

    fn prune_set<T: EntryKey>(
        &self,
        plugin: &str,
        set: &mut EntrySet<T>,
        policy: EvaluationFailurePolicy,
        diagnostics: &mut Vec<Message>,
        failure: &mut Option<ConditionError>,
    ) {
        set.retain(|entry| self.keep(plugin, &entry.condition, policy, diagnostics, failure));
    }

    /// Decide whether one entry stays. Empty conditions always stay.
    fn keep(
        &self,
        plugin: &str,
        condition: &str,
        policy: EvaluationFailurePolicy,
        diagnostics: &mut Vec<Message>,
        failure: &mut Option<ConditionError>,
    ) -> bool {
        if condition.is_empty() {
            return true;
        }
        match self.evaluator.evaluate(condition, self.state) {
            Ok(active) => {
                if !active {
                    debug!("'{}': condition '{}' is false, dropping entry", plugin, condition);
                }
                active
            }
            Err(e) => match policy {
                EvaluationFailurePolicy::Substitute => {
                    error!(
                        "\"{}\" contains a condition that could not be evaluated. Details: {}",
                        plugin, e
                    );
                    diagnostics.push(evaluation_failure_message(plugin, &e));
                    false
                }
                EvaluationFailurePolicy::Propagate => {
                    failure.get_or_insert(e);
                    true
                }
            },
        }
    }
}

/// Error message attached to a plugin in place of an entry whose condition
/// could not be evaluated
pub fn evaluation_failure_message(plugin: &str, error: &ConditionError) -> Message {
    Message::error(&format!(
        "\"{}\" contains a condition that could not be evaluated. Details: {}",
        plugin, error
    ))
}

/// Filter `metadata` against `state`, substituting diagnostics for
/// conditions that cannot be evaluated.
pub fn filter_active(
    metadata: PluginMetadata,
    evaluator: &dyn ConditionEvaluator,
    state: &GameState,
) -> PluginMetadata {
    ActiveConstraintFilter::new(evaluator, state).filter_active(metadata)
}
