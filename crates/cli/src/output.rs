//! CLI output formatting utilities.
//!
//! Progress lines go to stdout in the form `Download <url>  OK`; errors and
//! warnings go to stderr.

use std::io;

use console::{Term, style};
use tracing::warn;

use mkpkg_core::{Outcome, Progress, Step};

use crate::cmd::Summary;

/// Prints one line per build step.
pub struct TermProgress {
    term: Term,
}

impl TermProgress {
    pub fn stdout() -> Self {
        Self { term: Term::stdout() }
    }

    /// Write failures are logged, never propagated into the build.
    fn report(&self, written: io::Result<()>) {
        if let Err(e) = written {
            warn!(error = %e, "failed to write progress line");
        }
    }
}

impl Progress for TermProgress {
    fn started(&self, step: &Step<'_>) {
        self.report(self.term.write_str(&format!("{} {}", style("::").cyan().bold(), step)));
    }

    fn finished(&self, _step: &Step<'_>, outcome: Outcome) {
        let status = match outcome {
            Outcome::Ok => style("OK").green().bold(),
            Outcome::Failed => style("FAILED").red().bold(),
        };
        self.report(self.term.write_line(&format!("\t{}", status)));
    }

    fn skipped(&self, package_id: &str) {
        self.report(self.term.write_line(&format!(
            "{} {} {}",
            style("::").cyan().bold(),
            package_id,
            style("SKIPPED").yellow().bold()
        )));
    }
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("error:").red().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("warning:").yellow().bold(), message);
}

pub fn print_summary(summary: &Summary) -> io::Result<()> {
    let marker = if summary.failed == 0 {
        style("::").green().bold()
    } else {
        style("::").red().bold()
    };

    Term::stdout().write_line(&format!("{} {}", marker, summary_line(summary)))
}

fn summary_line(summary: &Summary) -> String {
    format!(
        "{} built, {} skipped, {} failed",
        count(summary.built, "package"),
        summary.skipped,
        summary.failed
    )
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 { format!("1 {}", noun) } else { format!("{} {}s", n, noun) }
}
