//! The end-to-end sort: assemble each plugin's record from its content scan
//! and the metadata lists, drop inactive entries, check install validity and
//! order the result.
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use log::{debug, error, info, warn};

use crate::condition::filter::ActiveConstraintFilter;
use crate::condition::{ConditionEvaluator, GameState};
use crate::kernel::error::{Error, Result};
use crate::metadata::content::{ContentExtractor, ExtractedContent};
use crate::metadata::entry::Message;
use crate::metadata::merge::MetadataMerger;
use crate::metadata::plugin::PluginMetadata;
use crate::sorting::error::SortError;
use crate::sorting::sorter::LoadOrderSorter;
use crate::storage::config::SortConfig;
use crate::utils::name_key;
use crate::validity::{ValidityReport, check_validity, validity_messages};

/// Result of ordering a batch
#[derive(Debug, Clone)]
pub enum SortOutcome {
    Sorted(Vec<PluginMetadata>),
    /// No order exists. The plugins are returned unsorted, with an error
    /// message attached to each plugin the cycle names.
    Cycle {
        error: SortError,
        plugins: Vec<PluginMetadata>,
    },
}

#[derive(Debug, Clone)]
pub struct SortReport {
    pub outcome: SortOutcome,
    /// Install problems per plugin; plugins without problems are absent
    pub problems: BTreeMap<String, ValidityReport>,
}

impl SortReport {
    pub fn is_sorted(&self) -> bool {
        matches!(self.outcome, SortOutcome::Sorted(_))
    }

    pub fn plugins(&self) -> &[PluginMetadata] {
        match &self.outcome {
            SortOutcome::Sorted(plugins) => plugins,
            SortOutcome::Cycle { plugins, .. } => plugins,
        }
    }

    /// Plugin names in load order, or `None` if sorting failed
    pub fn load_order(&self) -> Option<Vec<&str>> {
        match &self.outcome {
            SortOutcome::Sorted(plugins) => Some(plugins.iter().map(|p| p.name.as_str()).collect()),
            SortOutcome::Cycle { .. } => None,
        }
    }

    pub fn cycle(&self) -> Option<&SortError> {
        match &self.outcome {
            SortOutcome::Sorted(_) => None,
            SortOutcome::Cycle { error, .. } => Some(error),
        }
    }
}

pub struct LoadOrderPipeline {
    evaluator: Arc<dyn ConditionEvaluator>,
    state: Arc<GameState>,
    config: SortConfig,
}

impl LoadOrderPipeline {
    pub fn new(evaluator: Arc<dyn ConditionEvaluator>, state: GameState) -> Self {
        Self {
            evaluator,
            state: Arc::new(state),
            config: SortConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SortConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SortConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Build one record per scanned plugin.
    ///
    /// List records are merged first, least specific list first, then the
    /// scan is applied on top so that lists cannot erase scanned masters or
    /// content. List records for plugins that were not scanned are ignored.
    pub fn assemble(
        &self,
        scans: Vec<(String, ExtractedContent)>,
        lists: Vec<Vec<PluginMetadata>>,
    ) -> Vec<PluginMetadata> {
        let mut listed: HashMap<String, PluginMetadata> = HashMap::new();
        for record in MetadataMerger::merge_sources(lists) {
            if record.is_regex_name() {
                debug!("Ignoring pattern-named metadata record '{}'", record.name);
                continue;
            }
            listed.insert(name_key(&record.name), record);
        }

        let mut seen = HashSet::new();
        let mut plugins = Vec::with_capacity(scans.len());
        for (name, content) in scans {
            if !seen.insert(name_key(&name)) {
                warn!("Plugin '{}' was scanned more than once; using the first scan", name);
                continue;
            }
            let mut plugin = PluginMetadata::new(&name);
            if let Some(record) = listed.remove(&name_key(&name)) {
                plugin.merge_from(&record);
            }
            plugin.apply_content(content);
            plugins.push(plugin);
        }

        for record in listed.values() {
            debug!("No installed plugin matches metadata record '{}'", record.name);
        }
        plugins
    }

    /// Apply the active-constraint filter to every plugin, keeping order
    pub async fn filter(&self, plugins: Vec<PluginMetadata>) -> Result<Vec<PluginMetadata>> {
        let policies = self.config.condition_failures;

        if !self.config.parallel {
            let filter = ActiveConstraintFilter::new(self.evaluator.as_ref(), &self.state)
                .with_policies(policies);
            return plugins
                .into_iter()
                .map(|plugin| filter.try_filter_active(plugin).map_err(Error::from))
                .collect();
        }

        let mut handles = Vec::with_capacity(plugins.len());
        for plugin in plugins {
            let evaluator = Arc::clone(&self.evaluator);
            let state = Arc::clone(&self.state);
            handles.push(tokio::task::spawn_blocking(move || {
                ActiveConstraintFilter::new(evaluator.as_ref(), &state)
                    .with_policies(policies)
                    .try_filter_active(plugin)
            }));
        }

        let mut filtered = Vec::with_capacity(handles.len());
        for handle in handles {
            let plugin = handle.await.map_err(|e| Error::Task {
                operation: "filter_active".to_string(),
                message: e.to_string(),
            })??;
            filtered.push(plugin);
        }
        Ok(filtered)
    }

    /// Attach install problems to each plugin as error messages
    pub fn check_validity(&self, plugins: &mut [PluginMetadata]) -> BTreeMap<String, ValidityReport> {
        let mut problems = BTreeMap::new();
        for plugin in plugins.iter_mut() {
            let report = check_validity(plugin, &*self.state);
            if report.is_empty() {
                continue;
            }
            plugin.messages.extend(validity_messages(&report));
            problems.insert(plugin.name.clone(), report);
        }
        problems
    }

    /// Scan each named plugin with `extractor`, keeping name order
    pub fn scan(
        &self,
        extractor: &dyn ContentExtractor,
        names: &[String],
    ) -> Result<Vec<(String, ExtractedContent)>> {
        let mut scans = Vec::with_capacity(names.len());
        for name in names {
            debug!("Scanning '{}' with {}", name, extractor.name());
            scans.push((name.clone(), extractor.extract(name)?));
        }
        Ok(scans)
    }

    /// Assemble, filter and check, stopping short of sorting
    pub async fn prepare(
        &self,
        scans: Vec<(String, ExtractedContent)>,
        lists: Vec<Vec<PluginMetadata>>,
    ) -> Result<(Vec<PluginMetadata>, BTreeMap<String, ValidityReport>)> {
        let plugins = self.assemble(scans, lists);
        info!("Assembled metadata for {} plugins", plugins.len());

        let mut plugins = self.filter(plugins).await?;
        let problems = self.check_validity(&mut plugins);
        if !problems.is_empty() {
            warn!("{} plugins have install problems", problems.len());
        }
        Ok((plugins, problems))
    }

    /// Assemble, filter, check and sort.
    ///
    /// A dependency cycle does not fail the run: it is reported through
    /// [`SortOutcome::Cycle`]. Errors are reserved for I/O, task and
    /// propagated condition failures.
    pub async fn run(
        &self,
        scans: Vec<(String, ExtractedContent)>,
        lists: Vec<Vec<PluginMetadata>>,
    ) -> Result<SortReport> {
        let (mut plugins, problems) = self.prepare(scans, lists).await?;

        let sorter = LoadOrderSorter::with_strictness(self.config.strictness);
        // The sorter consumes its input, so keep a copy for the failure report
        let outcome = match sorter.sort(plugins.clone()) {
            Ok(sorted) => SortOutcome::Sorted(sorted),
            Err(e) => {
                error!("{}", e);
                attach_cycle_messages(&mut plugins, &e);
                SortOutcome::Cycle { error: e, plugins }
            }
        };

        Ok(SortReport { outcome, problems })
    }

    /// Like [`run`](Self::run), scanning each named plugin with `extractor`
    pub async fn run_with_extractor(
        &self,
        extractor: &dyn ContentExtractor,
        names: &[String],
        lists: Vec<Vec<PluginMetadata>>,
    ) -> Result<SortReport> {
        let scans = self.scan(extractor, names)?;
        self.run(scans, lists).await
    }
}

fn attach_cycle_messages(plugins: &mut [PluginMetadata], error: &SortError) {
    let named: HashSet<String> = error.plugins().iter().map(|name| name_key(name)).collect();
    let text = error.to_string();
    for plugin in plugins.iter_mut().filter(|p| named.contains(&name_key(&p.name))) {
        plugin.messages.push(Message::error(&text));
    }
}
