use std::path::Path;

use clap::Parser;
use traceaudit::{IssueId, LinkageReport};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Report requirements with no decision linkage in either direction")]
pub struct Unlinked {}

fn rule() -> String {
    "=".repeat(100)
}

impl Unlinked {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, input: &Path) -> anyhow::Result<()> {
        let graph = super::load_graph(input)?;
        let report = LinkageReport::classify(&graph);
        let unlinked_count = report.total() - report.linked_count();

        println!("Total requirements: {}", report.total());
        println!("With forward links to ADRs: {}", report.forward_count());
        println!("With backward links from ADRs: {}", report.backward_count());
        println!("With ANY ADR linkage: {}", report.linked_count());
        println!("WITHOUT any ADR linkage: {unlinked_count}");

        println!("\n{}", rule());
        println!("UNLINKED REQUIREMENTS ({unlinked_count} total):");
        println!("{}\n", rule());

        for (topic, items) in report.unlinked_by_topic(&graph) {
            println!("\n{} ({}):", topic.heading(), items.len());
            for item in items {
                println!("  {}: {}", item.id, item.title);
            }
        }

        println!("\n{}", rule());
        println!("AVAILABLE ADRs/ARC-Cs TO LINK TO:");
        println!("{}\n", rule());

        for decision in graph.decisions() {
            // Only references that land on a requirement count here.
            let mut req_refs: Vec<IssueId> = graph
                .references_from(decision.id)
                .filter(|id| graph.get(*id).is_some_and(|item| item.kind.is_requirement()))
                .collect();
            req_refs.sort_unstable();

            println!("{}: {}", decision.id, decision.title);
            if req_refs.is_empty() {
                println!("  Links to 0 requirements");
            } else {
                let shown: Vec<String> = req_refs.iter().take(5).map(ToString::to_string).collect();
                let suffix = if req_refs.len() > 5 { "..." } else { "" };
                println!(
                    "  Currently links to {} requirements: {}{}",
                    req_refs.len(),
                    shown.join(", "),
                    suffix
                );
            }
        }

        Ok(())
    }
}
