use std::path::Path;

use clap::Parser;
use traceaudit::{linkage, ItemKind, LinkageReport};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Report decision coverage from requirement-side references")]
pub struct Coverage {}

/// Ellipsizes a title to at most `max` characters.
fn shorten(title: &str, max: usize) -> String {
    if title.chars().count() > max {
        let cut: String = title.chars().take(max).collect();
        format!("{cut}...")
    } else {
        title.to_string()
    }
}

fn rule() -> String {
    "=".repeat(100)
}

impl Coverage {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, input: &Path) -> anyhow::Result<()> {
        let graph = super::load_graph(input)?;
        let report = LinkageReport::classify(&graph);

        let decisions: Vec<_> = graph.decisions().collect();
        println!("Found {} ADRs:", decisions.len());
        for decision in &decisions {
            println!("  {}: {}", decision.id, decision.title);
        }

        println!("\n{}\n", rule());

        let (with_refs, without_refs): (Vec<_>, Vec<_>) = report
            .records()
            .iter()
            .partition(|record| !record.forward.is_empty());
        let total = report.total();

        println!("SUMMARY:");
        println!("  Total requirements: {total}");
        println!(
            "  WITH ADR references: {} ({:.1}%)",
            with_refs.len(),
            linkage::percent(with_refs.len(), total)
        );
        println!(
            "  WITHOUT ADR references: {} ({:.1}%)",
            without_refs.len(),
            linkage::percent(without_refs.len(), total)
        );

        println!("\n{}", rule());
        println!(
            "REQUIREMENTS WITHOUT ADR REFERENCES ({} total):",
            without_refs.len()
        );
        println!("{}\n", rule());

        let functional: Vec<_> = without_refs
            .iter()
            .filter(|record| record.kind == ItemKind::Functional)
            .collect();
        let non_functional: Vec<_> = without_refs
            .iter()
            .filter(|record| record.kind == ItemKind::NonFunctional)
            .collect();

        println!("\nFUNCTIONAL ({}):", functional.len());
        for record in functional {
            println!("  {}: {}", record.id, shorten(&record.title, 80));
        }

        println!("\nNON-FUNCTIONAL ({}):", non_functional.len());
        for record in non_functional {
            println!("  {}: {}", record.id, shorten(&record.title, 80));
        }

        println!("\n{}", rule());
        println!(
            "REQUIREMENTS WITH ADR REFERENCES ({} total):",
            with_refs.len()
        );
        println!("{}\n", rule());

        for record in with_refs {
            let refs: Vec<String> = record.forward.iter().map(ToString::to_string).collect();
            println!("{}: {}", record.id, shorten(&record.title, 70));
            println!("  -> ADRs: {}", refs.join(", "));
        }

        Ok(())
    }
}
