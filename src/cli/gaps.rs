use std::path::Path;

use clap::Parser;
use traceaudit::{Item, ItemKind};
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Report declared-link gaps from the export's typed links")]
pub struct Gaps {}

fn rule() -> String {
    "=".repeat(80)
}

impl Gaps {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, input: &Path) -> anyhow::Result<()> {
        let graph = super::load_graph(input)?;

        let (linked, unlinked): (Vec<&Item>, Vec<&Item>) = graph
            .requirements()
            .partition(|req| !req.declared_links("ADR").is_empty());
        let total = linked.len() + unlinked.len();

        println!("Total requirements: {total}");
        println!("Requirements WITH ADR links: {}", linked.len());
        println!("Requirements WITHOUT ADR links: {}", unlinked.len());
        println!("\n{}", rule());
        println!("UNLINKED REQUIREMENTS ({} total):", unlinked.len());
        println!("{}\n", rule());

        // Group by the tracker's type labels rather than the kind field; the
        // two can disagree when an issue was relabeled after creation.
        let functional: Vec<&&Item> = unlinked
            .iter()
            .filter(|req| req.has_label("type:requirement:functional"))
            .collect();
        let non_functional: Vec<&&Item> = unlinked
            .iter()
            .filter(|req| req.has_label("type:requirement:non-functional"))
            .collect();

        println!("\nFUNCTIONAL REQUIREMENTS ({}):", functional.len());
        for req in functional {
            println!("  {}: {}", req.id, req.title);
        }

        println!("\nNON-FUNCTIONAL REQUIREMENTS ({}):", non_functional.len());
        for req in non_functional {
            println!("  {}: {}", req.id, req.title);
        }

        println!("\n{}", rule());
        println!("EXISTING ADRs:");
        println!("{}\n", rule());

        for adr in graph.items().filter(|item| item.kind == ItemKind::Adr) {
            let links = adr.declared_links("REQ");
            println!("{}: {}", adr.id, adr.title);
            if links.is_empty() {
                println!("  Links to 0 requirements: NONE");
            } else {
                let ids: Vec<String> = links.iter().map(ToString::to_string).collect();
                println!("  Links to {} requirements: {}", links.len(), ids.join(", "));
            }
        }

        Ok(())
    }
}
