use std::cmp::Ordering;

use log::{Level, debug, log_enabled, warn};
use serde::{Deserialize, Serialize};

use crate::metadata::plugin::PluginMetadata;
use crate::sorting::error::SortError;

/// How mutual load-after constraints between two plugins are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Report the pair as a cycle and refuse to order it
    #[default]
    Strict,
    /// Break the pair by case-sensitive name order and carry on
    Lenient,
}

/// The ordering relation used to sort plugins.
///
/// Rules, first decisive rule wins:
/// 1. master files load before non-master files
/// 2. a plugin loads after its masters, requirements and load-after targets
/// 3. lower priority loads first
/// 4. if the plugins share content, the one defining more content loads first
/// 5. case-sensitive name order
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOrderComparator {
    strictness: Strictness,
}

impl LoadOrderComparator {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// True if `a` must load before `b`.
    ///
    /// A plugin never loads before itself. Fails only when each plugin must
    /// load after the other and the comparator is strict.
    pub fn must_load_before(&self, a: &PluginMetadata, b: &PluginMetadata) -> Result<bool, SortError> {
        if a.is_named(&b.name) {
            return Ok(false);
        }

        if a.is_master_file != b.is_master_file {
            return Ok(a.is_master_file);
        }

        let b_after_a = b.must_load_after(a);
        let a_after_b = a.must_load_after(b);
        match (b_after_a, a_after_b) {
            (true, true) => match self.strictness {
                Strictness::Strict => {
                    return Err(SortError::OrderingCycle {
                        first: a.name.clone(),
                        second: b.name.clone(),
                    });
                }
                Strictness::Lenient => {
                    let (first, second) = if a.name < b.name { (a, b) } else { (b, a) };
                    warn!(
                        "\"{}\" and \"{}\" must each load after the other; loading \"{}\" first",
                        first.name, second.name, first.name
                    );
                    return Ok(a.name < b.name);
                }
            },
            (true, false) => return Ok(true),
            (false, true) => return Ok(false),
            (false, false) => {}
        }

        if a.priority != b.priority {
            return Ok(a.priority < b.priority);
        }

        let (a_count, b_count) = (a.content_ids().len(), b.content_ids().len());
        if a_count != b_count && a.shares_content(b) {
            if log_enabled!(Level::Debug) {
                debug!(
                    "\"{}\" and \"{}\" edit {} common records; the larger plugin loads first",
                    a.name,
                    b.name,
                    a.overlapping_content(b).len()
                );
            }
            return Ok(a_count > b_count);
        }

        Ok(a.name < b.name)
    }

    /// Ordering derived from [`must_load_before`](Self::must_load_before)
    pub fn compare(&self, a: &PluginMetadata, b: &PluginMetadata) -> Result<Ordering, SortError> {
        if self.must_load_before(a, b)? {
            Ok(Ordering::Less)
        } else if self.must_load_before(b, a)? {
            Ok(Ordering::Greater)
        } else {
            Ok(Ordering::Equal)
        }
    }
}
