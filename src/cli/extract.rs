use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use traceaudit::scan::{self, report, CodebaseScan};
use tracing::instrument;

use super::terminal::Colorize;

/// Name of the report file written into the base directory.
const REPORT_FILE: &str = "reverse-engineering-report.md";

#[derive(Debug, Parser)]
#[command(about = "Scan the driver sources and draft requirement issues")]
pub struct Extract {
    /// The root of the driver source tree to scan
    #[arg(default_value = ".")]
    base_dir: PathBuf,
}

impl Extract {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self) -> anyhow::Result<()> {
        let base = &self.base_dir;

        println!("Intel AVB Filter Driver - Code-to-Requirements Analysis");
        println!("{}", "=".repeat(70));
        println!();
        println!("Analyzing codebase in: {}", base.display());
        println!();

        println!("[1/4] Extracting IOCTL definitions...");
        let defines = scan::scan_ioctl_defines(base)?;
        println!("    Found {} IOCTL definitions", defines.len());

        println!("[2/4] Scanning IOCTL handlers...");
        let handlers = scan::scan_ioctl_handlers(base)?;
        println!("    Found {} IOCTL handlers", handlers.len());

        println!("[3/4] Scanning device-specific implementations...");
        let devices = scan::scan_devices(base)?;
        println!("    Found {} device implementations", devices.len());

        println!("[4/4] Scanning test tools...");
        let test_tools = scan::scan_test_tools(base)?;
        println!("    Found {} test tools", test_tools.len());

        let scan = CodebaseScan {
            defines,
            handlers,
            devices,
            test_tools,
        };

        println!();
        println!("Generating report...");
        let rendered = report::render(&scan, chrono::Local::now().date_naive());

        let report_path = base.join(REPORT_FILE);
        std::fs::write(&report_path, rendered)
            .with_context(|| format!("could not write report to {}", report_path.display()))?;

        println!(
            "{}",
            format!("✅ Report generated: {}", report_path.display()).success()
        );
        println!();
        println!("Next steps:");
        println!("1. Review report: {REPORT_FILE}");
        println!("2. Validate requirements with stakeholders");
        println!("3. Create GitHub Issues using the provided commands");
        println!("4. Add traceability comments to code files");

        Ok(())
    }
}
