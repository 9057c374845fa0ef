use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use sheetstrings_cli::terminal::print_error;
use sheetstrings_cli::{ImportCommandOptions, run_import_command};

/// Import a translation spreadsheet into per-language `.strings` files.
///
/// Every column after the key column names a language; its values are merged
/// into `<RESOURCE_ROOT>/<language>/<resource name>`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Spreadsheet to import (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv)
    spreadsheet: PathBuf,

    /// Directory holding one sub-directory per language
    resource_root: PathBuf,

    /// Resource file name to write, instead of the one derived from the sheet name
    #[arg(long)]
    resource_name: Option<String>,

    /// Use header words verbatim instead of mapping language names like `French` to `fr`
    #[arg(long)]
    keep_language_names: bool,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    report_json: Option<PathBuf>,

    /// Reconcile and report without writing any resource file
    #[arg(long)]
    dry_run: bool,

    /// Process languages concurrently
    #[arg(long)]
    parallel: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            print_error(&format!("Invalid arguments: {}", e.render()));
            return ExitCode::from(2);
        }
    };

    let opts = ImportCommandOptions {
        spreadsheet: args.spreadsheet,
        resource_root: args.resource_root,
        resource_name: args.resource_name,
        keep_language_names: args.keep_language_names,
        report_json: args.report_json,
        dry_run: args.dry_run,
        parallel: args.parallel,
    };

    match run_import_command(&opts) {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            print_error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}
