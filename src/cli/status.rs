use std::{collections::BTreeMap, path::Path, process};

use clap::Parser;
use traceaudit::LinkageReport;
use tracing::instrument;

use super::terminal::{is_narrow, Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "Show item counts and linkage coverage")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, input: &Path) -> anyhow::Result<()> {
        let graph = super::load_graph(input)?;

        if graph.is_empty() {
            println!("No items found in the export.");
            return Ok(());
        }

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for item in graph.items() {
            *counts.entry(item.kind.to_string()).or_insert(0) += 1;
        }
        let total: usize = counts.values().sum();

        let report = LinkageReport::classify(&graph);
        let unlinked_count = report.total() - report.linked_count();

        match self.output {
            OutputFormat::Json => Self::output_json(&counts, total, &report)?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(total, &report);
                } else {
                    Self::output_table(&counts, total, &report);
                }
            }
        }

        // Exit with a non-zero code when the export needs attention.
        if unlinked_count > 0 {
            process::exit(2);
        }

        Ok(())
    }

    fn output_json(
        counts: &BTreeMap<String, usize>,
        total: usize,
        report: &LinkageReport,
    ) -> anyhow::Result<()> {
        use serde_json::json;

        let kinds: Vec<_> = counts
            .iter()
            .map(|(kind, count)| json!({"kind": kind, "count": count}))
            .collect();

        let output = json!({
            "kinds": kinds,
            "total": total,
            "requirements": {
                "total": report.total(),
                "linked": report.linked_count(),
                "unlinked": report.total() - report.linked_count(),
                "coverage": report.coverage(),
            }
        });

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn output_quiet(total: usize, report: &LinkageReport) {
        println!(
            "total={total} requirements={} linked={} coverage={:.1}",
            report.total(),
            report.linked_count(),
            report.coverage()
        );
    }

    fn output_table(counts: &BTreeMap<String, usize>, total: usize, report: &LinkageReport) {
        let narrow = is_narrow();
        let unlinked = report.total() - report.linked_count();

        println!("Item counts");
        println!("{}", "───────────".dim());

        if narrow {
            // Stacked output for narrow terminals
            for (kind, count) in counts {
                println!("{kind}: {count}");
            }
            println!("Total: {total}");
        } else {
            // Table layout
            println!("{:<10} {:<6}", "Kind", "Count");
            for (kind, count) in counts {
                println!("{kind:<10} {count:<6}");
            }
            println!("Total      {total}");
        }

        println!();

        if report.total() == 0 {
            println!("No requirements in the export.");
            return;
        }

        println!(
            "Decision linkage: {}/{} ({:.1}%)",
            report.linked_count(),
            report.total(),
            report.coverage()
        );

        if unlinked == 0 {
            println!("Unlinked requirements: {} ✅", "0".success());
        } else {
            println!(
                "Unlinked requirements: {} ⚠️",
                unlinked.to_string().warning()
            );
            println!("{}", "Run 'trau unlinked' to investigate.".dim());
        }
    }
}
