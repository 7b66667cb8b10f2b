use std::collections::HashSet;

use log::{debug, info, warn};

use crate::metadata::plugin::PluginMetadata;
use crate::sorting::comparator::{LoadOrderComparator, Strictness};
use crate::sorting::error::SortError;
use crate::sorting::graph::DependencyGraph;
use crate::utils::name_key;

/// Sorts a batch of filtered plugin records into a load order.
///
/// Explicit relations (masters, requirements, load-after) are honoured by a
/// topological sort over the batch's [`DependencyGraph`]. Whenever several
/// plugins are free to go next, the comparator picks among them. It may be
/// non-transitive on contradictory data, so the pick is a single scan over
/// the ready plugins in name order and never assumes a total order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadOrderSorter {
    comparator: LoadOrderComparator,
}

struct Pending {
    plugin: PluginMetadata,
    /// Keys of plugins this one still waits for
    waiting_on: HashSet<String>,
}

impl LoadOrderSorter {
    pub fn new(comparator: LoadOrderComparator) -> Self {
        Self { comparator }
    }

    pub fn with_strictness(strictness: Strictness) -> Self {
        Self::new(LoadOrderComparator::new(strictness))
    }

    pub fn comparator(&self) -> &LoadOrderComparator {
        &self.comparator
    }

    /// Sort the batch. In strict mode any explicit dependency cycle stops the
    /// sort and is returned; in lenient mode cycles are broken by the
    /// comparator.
    pub fn sort(&self, mut plugins: Vec<PluginMetadata>) -> Result<Vec<PluginMetadata>, SortError> {
        let strict = self.comparator.strictness() == Strictness::Strict;
        let graph = DependencyGraph::from_plugins(&plugins);
        if strict {
            check_cycles_in(&graph)?;
        }

        // Fixed starting order so the result does not depend on input order
        plugins.sort_by(|a, b| a.name.cmp(&b.name));

        let mut pending: Vec<Pending> = plugins
            .into_iter()
            .map(|plugin| {
                let waiting_on = graph
                    .dependencies_of(&plugin.name)
                    .iter()
                    .map(|dep| name_key(dep))
                    .collect();
                Pending { plugin, waiting_on }
            })
            .collect();

        let mut sorted = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            let ready: Vec<usize> = (0..pending.len())
                .filter(|&i| pending[i].waiting_on.is_empty())
                .collect();

            let candidates = if ready.is_empty() {
                let names: Vec<String> = pending.iter().map(|p| p.plugin.name.clone()).collect();
                if strict {
                    return Err(SortError::DependencyCycle(names));
                }
                warn!("Breaking dependency cycle among: {}", names.join(", "));
                (0..pending.len()).collect()
            } else {
                ready
            };

            let next = self.pick(&pending, &candidates)?;
            let placed = pending.remove(next).plugin;
            let key = name_key(&placed.name);
            for entry in pending.iter_mut() {
                entry.waiting_on.remove(&key);
            }

            debug!("Placing \"{}\" at position {}", placed.name, sorted.len());
            sorted.push(placed);
        }

        info!("Sorted {} plugins", sorted.len());
        Ok(sorted)
    }

    /// The candidate that nothing scanned after it must precede
    fn pick(&self, pending: &[Pending], candidates: &[usize]) -> Result<usize, SortError> {
        let mut best = candidates[0];
        for &i in &candidates[1..] {
            if self.comparator.must_load_before(&pending[i].plugin, &pending[best].plugin)? {
                best = i;
            }
        }
        Ok(best)
    }
}

/// Fail if the explicit relations in the batch form a cycle
pub fn check_cycles(plugins: &[PluginMetadata]) -> Result<(), SortError> {
    check_cycles_in(&DependencyGraph::from_plugins(plugins))
}

fn check_cycles_in(graph: &DependencyGraph) -> Result<(), SortError> {
    match graph.find_cycle() {
        None => Ok(()),
        Some(path) if path.len() == 3 => Err(SortError::OrderingCycle {
            first: path[0].clone(),
            second: path[1].clone(),
        }),
        Some(path) => Err(SortError::DependencyCycle(path)),
    }
}
