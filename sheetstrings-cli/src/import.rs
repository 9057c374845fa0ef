use std::path::PathBuf;

use sheetstrings::{ImportOptions, ImportReport, Importer};

use crate::input::read_tables;
use crate::summary::write_report;
use crate::terminal::{TerminalReporter, print_selection, print_skipped_sheet, print_summary};

#[derive(Debug, Clone, Default)]
pub struct ImportCommandOptions {
    pub spreadsheet: PathBuf,
    pub resource_root: PathBuf,
    pub resource_name: Option<String>,
    pub keep_language_names: bool,
    pub report_json: Option<PathBuf>,
    pub dry_run: bool,
    pub parallel: bool,
}

/// Run the import command: decode the spreadsheet, then reconcile every
/// language of every sheet into the resource root.
///
/// Returns `Err` when the spreadsheet cannot be decoded, in which case nothing
/// is written, or when the JSON report cannot be written. Per-language
/// failures are part of the returned report.
pub fn run_import_command(opts: &ImportCommandOptions) -> Result<ImportReport, String> {
    let loaded = read_tables(&opts.spreadsheet, opts.resource_name.as_deref())
        .map_err(|e| e.to_string())?;
    print_selection(&opts.spreadsheet, &opts.resource_root);
    for sheet in &loaded.skipped_sheets {
        print_skipped_sheet(sheet);
    }

    let options = ImportOptions::new()
        .with_dry_run(opts.dry_run)
        .with_parallel(opts.parallel)
        .with_language_names_mapped(!opts.keep_language_names);
    let reporter = TerminalReporter::new(opts.dry_run);
    let report = Importer::new(&opts.resource_root)
        .with_options(options)
        .run_all(&loaded.tables, &reporter)
        .map_err(|e| e.to_string())?;

    print_summary(&report);
    if opts.dry_run {
        println!("Dry-run mode: no files were written");
    }

    if let Some(report_path) = &opts.report_json {
        write_report(
            report_path,
            &opts.spreadsheet,
            &opts.resource_root,
            opts.dry_run,
            &report,
        )?;
        println!("Report JSON written: {}", report_path.display());
    }

    Ok(report)
}
