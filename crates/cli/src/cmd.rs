//! Implementation of the build command.
//!
//! Every descriptor file is processed in order, and every package inside it
//! is built or skipped. A failure is reported and the run moves on to the
//! next package; the exit status tells whether anything failed.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use mkpkg_core::vars::VariableSet;
use mkpkg_core::{BuildStatus, Settings, build_descriptor_file};

use crate::Cli;
use crate::output::{TermProgress, print_error, print_summary, print_warning};

/// Per-run tally of package results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub built: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Turn command-line arguments into core settings.
///
/// Definitions without `=` are ignored with a warning.
pub fn settings_from(cli: &Cli) -> Settings {
    let mut settings = Settings::default()
        .with_build_dir(&cli.builddir)
        .with_timeout(Duration::from_secs(cli.timeout));

    for definition in &cli.define {
        match VariableSet::parse_definition(definition) {
            Ok((key, value)) => settings.variables.insert(key, value),
            Err(e) => print_warning(&format!("{}, ignoring", e)),
        }
    }

    settings
}

/// Execute the build command.
pub fn cmd_build(cli: &Cli) -> Result<ExitCode> {
    let settings = settings_from(cli);
    debug!(build_dir = %settings.build_dir.display(), variables = settings.variables.len(), "starting build");

    let progress = TermProgress::stdout();
    let mut summary = Summary::default();

    for pkgfile in &cli.pkgfiles {
        let reports = match build_descriptor_file(pkgfile, &settings, &progress) {
            Ok(reports) => reports,
            Err(e) => {
                print_error(&format!("{}: {}", pkgfile.display(), e));
                summary.failed += 1;
                continue;
            }
        };

        for report in reports {
            match report.result {
                Ok(BuildStatus::Built { .. }) => summary.built += 1,
                Ok(BuildStatus::Skipped) => summary.skipped += 1,
                Err(e) => {
                    print_error(&format!("{}: {}", report.id, e));
                    summary.failed += 1;
                }
            }
        }
    }

    print_summary(&summary).context("failed to print build summary")?;

    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
