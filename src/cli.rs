use std::path::PathBuf;

mod coverage;
mod extract;
mod gaps;
mod plan;
mod status;
mod terminal;
mod unlinked;

use clap::ArgAction;
use coverage::Coverage;
use extract::Extract;
use gaps::Gaps;
use plan::Plan;
use status::Status;
use unlinked::Unlinked;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the traceability export
    #[arg(
        short,
        long,
        default_value = traceaudit::export::DEFAULT_EXPORT_PATH,
        global = true
    )]
    input: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.input)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Show item counts and linkage coverage
    Status(Status),

    /// Report decision coverage from requirement-side references
    Coverage(Coverage),

    /// Report declared-link gaps from the export's typed links
    Gaps(Gaps),

    /// Report requirements with no decision linkage in either direction
    Unlinked(Unlinked),

    /// Print the hand-authored linkage update plan and its projected
    /// coverage
    Plan(Plan),

    /// Scan the driver sources and draft requirement issues
    Extract(Extract),
}

impl Command {
    fn run(self, input: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(&input)?,
            Self::Coverage(command) => command.run(&input)?,
            Self::Gaps(command) => command.run(&input)?,
            Self::Unlinked(command) => command.run(&input)?,
            Self::Plan(command) => command.run(&input)?,
            Self::Extract(command) => command.run()?,
        }
        Ok(())
    }
}

/// Loads the traceability export with CLI-facing context on failure.
fn load_graph(input: &std::path::Path) -> anyhow::Result<traceaudit::TraceGraph> {
    use anyhow::Context;

    traceaudit::export::load(input)
        .with_context(|| format!("could not load traceability export from {}", input.display()))
}
