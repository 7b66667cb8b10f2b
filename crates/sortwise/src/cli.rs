use std::collections::BTreeMap;

use sortwise_core::validity::ValidityReport;
use sortwise_core::{PluginMetadata, SortOutcome, SortReport};

/// Prints sort results to the console.
///
/// Messages are filtered to one language; messages without a language are
/// always shown.
#[derive(Debug)]
pub struct ReportPrinter<'a> {
    language: &'a str,
}

impl<'a> ReportPrinter<'a> {
    pub fn new(language: &'a str) -> Self {
        Self { language }
    }

    pub fn print_report(&self, report: &SortReport) {
        match &report.outcome {
            SortOutcome::Sorted(plugins) => {
                println!("Load order:");
                for (i, plugin) in plugins.iter().enumerate() {
                    println!("{:>4}. {}", i + 1, plugin.name);
                }
            }
            SortOutcome::Cycle { error, .. } => {
                eprintln!("Sorting failed: {}", error);
            }
        }
        self.print_messages(report.plugins());
    }

    pub fn print_messages(&self, plugins: &[PluginMetadata]) {
        let mut header = false;
        for plugin in plugins {
            for message in plugin.messages_for_language(self.language) {
                if !header {
                    println!();
                    println!("Messages:");
                    header = true;
                }
                println!("  {} [{}] {}", plugin.name, message.severity(), message.text());
            }
        }
    }

    pub fn print_problems(&self, problems: &BTreeMap<String, ValidityReport>) {
        if problems.is_empty() {
            println!("No install problems found.");
            return;
        }
        for (plugin, report) in problems {
            println!("{}:", plugin);
            for (file, present) in report {
                if *present {
                    println!("  incompatible file present: {}", file);
                } else {
                    println!("  missing file: {}", file);
                }
            }
        }
    }
}
