use std::collections::{HashMap, HashSet};

use crate::metadata::plugin::PluginMetadata;
use crate::utils::name_key;

/// Explicit "loads after" relations between the plugins of one batch.
///
/// Nodes are normalized plugin names; edges point from a plugin to the
/// plugins it must load after. Relations naming plugins outside the batch are
/// ignored, as are relations the master rule overrides (a master file that
/// asks to load after a non-master file).
pub struct DependencyGraph {
    /// Normalized name -> display name, in insertion order
    nodes: Vec<(String, String)>,
    /// plugin -> plugins it loads after
    edges: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: HashMap::new(),
        }
    }

    /// Build the graph for a batch of plugins
    pub fn from_plugins(plugins: &[PluginMetadata]) -> Self {
        let mut graph = Self::new();
        for plugin in plugins {
            graph.add_node(&plugin.name);
        }
        for plugin in plugins {
            for other in plugins {
                if plugin.is_named(&other.name) {
                    continue;
                }
                let overridden = plugin.is_master_file && !other.is_master_file;
                if !overridden && plugin.must_load_after(other) {
                    graph.add_edge(&plugin.name, &other.name);
                }
            }
        }
        graph
    }

    pub fn add_node(&mut self, name: &str) {
        let key = name_key(name);
        if !self.edges.contains_key(&key) {
            self.edges.insert(key.clone(), Vec::new());
            self.nodes.push((key, name.to_string()));
        }
    }

    /// Record that `plugin` must load after `dependency`
    pub fn add_edge(&mut self, plugin: &str, dependency: &str) {
        self.add_node(plugin);
        self.add_node(dependency);
        let deps = self.edges.entry(name_key(plugin)).or_default();
        let dependency = name_key(dependency);
        if !deps.contains(&dependency) {
            deps.push(dependency);
        }
    }

    /// Plugins `name` must load after
    pub fn dependencies_of(&self, name: &str) -> Vec<String> {
        self.edges
            .get(&name_key(name))
            .map(|deps| deps.iter().map(|d| self.display_name(d)).collect())
            .unwrap_or_default()
    }

    /// First cycle found, as a path of display names that starts and ends
    /// with the same plugin
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();

        for (key, _) in &self.nodes {
            if !visited.contains(key) {
                if let Some(cycle) = self.cycle_dfs(key, &mut visited, &mut stack) {
                    return Some(cycle.iter().map(|k| self.display_name(k)).collect());
                }
            }
        }

        None
    }

    fn cycle_dfs(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        stack: &mut Vec<String>,
    ) -> Option<Vec<String>> {
        visited.insert(node.to_string());
        stack.push(node.to_string());

        if let Some(deps) = self.edges.get(node) {
            for dep in deps {
                if let Some(pos) = stack.iter().position(|s| s == dep) {
                    let mut cycle = stack[pos..].to_vec();
                    cycle.push(dep.clone());
                    return Some(cycle);
                }
                if !visited.contains(dep) {
                    if let Some(cycle) = self.cycle_dfs(dep, visited, stack) {
                        return Some(cycle);
                    }
                }
            }
        }

        stack.pop();
        None
    }

    fn display_name(&self, key: &str) -> String {
        self.nodes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, name)| name.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

impl Default for DependencyGraph {
    fn default() -> Self {
        Self::new()
    }
}
