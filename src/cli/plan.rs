use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use traceaudit::{LinkageReport, UpdatePlan};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Print the hand-authored linkage update plan and its projected coverage")]
pub struct Plan {
    /// The path to the plan file
    #[arg(long, default_value = "plans/adr-backlog.toml")]
    plan: PathBuf,
}

fn rule() -> String {
    "=".repeat(80)
}

impl Plan {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, input: &Path) -> anyhow::Result<()> {
        let graph = super::load_graph(input)?;
        let report = LinkageReport::classify(&graph);
        let plan = UpdatePlan::from_path(&self.plan)
            .with_context(|| format!("could not load update plan from {}", self.plan.display()))?;

        println!("ADR Linkage Update Plan");
        println!("{}", rule());
        println!("\nTotal requirements to update: {}", plan.mapped_count());
        println!("Total ADR links to add: {}", plan.link_count());

        println!("\n{}", rule());
        println!("UPDATE PLAN:");
        println!("{}\n", rule());

        for mapping in plan.sorted_mappings() {
            let title = graph.title(mapping.requirement).unwrap_or("UNKNOWN");
            println!("{}: {}", mapping.requirement, title);
            for decision in &mapping.decisions {
                let title = graph.title(*decision).unwrap_or("UNKNOWN");
                println!("  + Add link to {decision}: {title}");
            }
            println!();
        }

        if !plan.needed.is_empty() {
            println!("{}", rule());
            println!("NEW ADRs NEEDED (Not yet created):");
            println!("{}\n", rule());
            for needed in &plan.needed {
                println!("  - {needed}");
            }
        }

        println!("\n{}", rule());
        println!("COVERAGE IMPACT ESTIMATE:");
        println!("{}\n", rule());

        // Naive linear estimate: mapped requirements already in the linked
        // set are counted again, so the projection can overstate coverage.
        let projection = plan.projection(report.linked_count(), report.total());
        let gap = projection.gap(plan.target);

        println!(
            "Current ADR linkage: {}/{} = {:.1}%",
            projection.current_linked,
            projection.total,
            projection.current()
        );
        println!(
            "After adding links:  {}/{} = {}",
            projection.current_linked + projection.mapped,
            projection.total,
            format!("{:.1}%", projection.projected()).info()
        );
        println!("Target threshold:   {:.1}%", plan.target);

        if gap <= 0.0 {
            println!(
                "Gap after updates:  {gap:.1}pp {}",
                "✅ THRESHOLD MET".success()
            );
        } else {
            println!("Gap after updates:  {gap:.1}pp {}", "❌ Still short".warning());
        }

        Ok(())
    }
}
