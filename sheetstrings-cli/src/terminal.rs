//! Colored console output for import runs.

use std::path::Path;

use colored::Colorize;
use sheetstrings::{
    ImportReport, LanguageColumn, LanguageFailure, LanguageOutcome, Reporter, Warning,
};

use crate::input::SkippedSheet;

const PREFIX: &str = "[sheetstrings]";

/// Prints importer events as they happen.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalReporter {
    pub dry_run: bool,
}

impl TerminalReporter {
    pub fn new(dry_run: bool) -> Self {
        TerminalReporter { dry_run }
    }
}

impl Reporter for TerminalReporter {
    fn language_started(&self, column: &LanguageColumn, path: &Path) {
        let verb = if self.dry_run { "Checking" } else { "Writing to" };
        println!(
            "{} {} {} {}",
            PREFIX.cyan().bold(),
            verb.dimmed(),
            path.display().to_string().green(),
            format!("({})", column.header).dimmed()
        );
    }

    fn language_succeeded(&self, outcome: &LanguageOutcome) {
        println!(
            "{} {} {} created, {} updated ({} changed), {} total",
            PREFIX.cyan().bold(),
            outcome.language.green().bold(),
            outcome.created.to_string().cyan(),
            outcome.updated.to_string().cyan(),
            outcome.changed,
            outcome.total
        );
    }

    fn language_failed(&self, failure: &LanguageFailure) {
        eprintln!(
            "{} {} {}: {}",
            PREFIX.red().bold(),
            "Failed".red(),
            failure.language.white().bold(),
            failure.error
        );
    }

    fn warning(&self, warning: &Warning) {
        eprintln!("{} {}", PREFIX.yellow().bold(), warning.to_string().yellow());
    }
}

/// Prints the selected input and output locations.
pub fn print_selection(spreadsheet: &Path, root: &Path) {
    println!(
        "{} {} {}",
        PREFIX.cyan().bold(),
        "Spreadsheet:".dimmed(),
        spreadsheet.display().to_string().green()
    );
    println!(
        "{} {} {}",
        PREFIX.cyan().bold(),
        "Resource root:".dimmed(),
        root.display().to_string().green()
    );
}

/// Prints a worksheet that was left out of the import.
pub fn print_skipped_sheet(sheet: &SkippedSheet) {
    eprintln!(
        "{} {}",
        PREFIX.yellow().bold(),
        format!("sheet `{}` skipped: {}", sheet.name, sheet.reason).yellow()
    );
}

/// Prints the end-of-run summary: every succeeded and failed language.
pub fn print_summary(report: &ImportReport) {
    println!();
    for outcome in &report.succeeded {
        println!(
            "  {} {} {}",
            "✓".green(),
            outcome.language.bold(),
            outcome.path.display().to_string().dimmed()
        );
    }
    for failure in &report.failed {
        println!(
            "  {} {} {}",
            "✗".red(),
            failure.language.bold(),
            failure.error.to_string().red()
        );
    }
    if report.cancelled {
        println!("  {}", "Run cancelled before all languages were processed".yellow());
    }

    let counts = format!(
        "{} succeeded, {} failed, {} warnings",
        report.succeeded.len(),
        report.failed.len(),
        report.warnings.len()
    );
    if report.is_success() {
        println!("\n{}. {}. Have a ☕️.", "Congrats".green().bold(), counts);
    } else {
        println!("\n{} {}", "Import incomplete:".red().bold(), counts);
    }
}

/// Prints a fatal error.
pub fn print_error(error: &dyn std::fmt::Display) {
    eprintln!("{} {}", PREFIX.red().bold(), error.to_string().red().bold());
}
