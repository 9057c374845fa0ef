//! Driving the read → reconcile → write pipeline for every language column.
//!
//! A failure in one language is recorded in the [`ImportReport`] and does not
//! stop the remaining languages. Only a table that cannot be interpreted at
//! all (no header row) fails the whole run, before anything is written.

use std::{
    collections::HashSet,
    fmt,
    path::{Path, PathBuf},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use rayon::prelude::*;
use serde::Serialize;

use crate::{
    error::Error,
    language::identifier_from_header,
    reconcile::reconcile,
    store::ResourceStore,
    strings::unescape_literal,
    types::{LanguageColumn, Row, Table},
};

/// Options controlling an import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Reconcile and report without touching any file.
    pub dry_run: bool,
    /// Process languages concurrently.
    pub parallel: bool,
    /// Turn English language names in headers (`French`) into ISO codes (`fr`).
    pub map_language_names: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        ImportOptions {
            dry_run: false,
            parallel: false,
            map_language_names: true,
        }
    }
}

impl ImportOptions {
    /// Creates default import options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables/disables dry-run mode.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Enables/disables concurrent processing of languages.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Enables/disables mapping of language names to ISO codes.
    pub fn with_language_names_mapped(mut self, map_language_names: bool) -> Self {
        self.map_language_names = map_language_names;
        self
    }
}

/// A non-fatal problem found in the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A header cell yielded no usable language identifier.
    UnusableHeader {
        resource: String,
        column: usize,
        header: String,
    },
    /// Two header cells map to the same language; the later one is ignored.
    DuplicateLanguage {
        resource: String,
        column: usize,
        language: String,
    },
    /// A data row has content but no key.
    MissingKey { resource: String, row: usize },
    /// The header row names no language at all.
    NoLanguages { resource: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnusableHeader {
                resource,
                column,
                header,
            } => write!(
                f,
                "{}: column {} header `{}` does not name a language, skipped",
                resource,
                column + 1,
                header
            ),
            Warning::DuplicateLanguage {
                resource,
                column,
                language,
            } => write!(
                f,
                "{}: column {} repeats language `{}`, skipped",
                resource,
                column + 1,
                language
            ),
            Warning::MissingKey { resource, row } => {
                write!(f, "{}: row {} has no key, skipped", resource, row + 1)
            }
            Warning::NoLanguages { resource } => {
                write!(f, "{}: header row names no language", resource)
            }
        }
    }
}

/// A language whose resource file was reconciled successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOutcome {
    pub resource_name: String,
    pub language: String,
    pub path: PathBuf,
    /// Number of keys added to the file.
    pub created: usize,
    /// Number of existing keys that received a value from the sheet.
    pub updated: usize,
    /// Number of existing keys whose value actually changed.
    pub changed: usize,
    /// Number of entries in the resulting file.
    pub total: usize,
    /// Whether the file was written (false in dry-run mode).
    pub written: bool,
}

/// A language whose resource file could not be reconciled.
#[derive(Debug)]
pub struct LanguageFailure {
    pub resource_name: String,
    pub language: String,
    pub path: PathBuf,
    pub error: Error,
}

/// Aggregated result of an import run, in header order.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub succeeded: Vec<LanguageOutcome>,
    pub failed: Vec<LanguageFailure>,
    pub warnings: Vec<Warning>,
    /// Set when the run was stopped before every language was processed.
    pub cancelled: bool,
}

impl ImportReport {
    /// True when every language was processed without error.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    /// Appends the results of another run.
    pub fn merge(&mut self, other: ImportReport) {
        self.succeeded.extend(other.succeeded);
        self.failed.extend(other.failed);
        self.warnings.extend(other.warnings);
        self.cancelled |= other.cancelled;
    }
}

/// Receives progress events from an [`Importer`].
///
/// With parallel processing enabled, events for different languages may
/// arrive concurrently and interleaved.
pub trait Reporter: Send + Sync {
    fn language_started(&self, _column: &LanguageColumn, _path: &Path) {}

    fn language_succeeded(&self, _outcome: &LanguageOutcome) {}

    fn language_failed(&self, _failure: &LanguageFailure) {}

    fn warning(&self, _warning: &Warning) {}
}

/// A reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Detects the language columns of a table.
///
/// Column 0 is the key column and never a language. Columns whose header is
/// unusable or repeats an earlier language are returned as warnings.
pub fn detect_languages(table: &Table, map_names: bool) -> (Vec<LanguageColumn>, Vec<Warning>) {
    let mut columns = Vec::new();
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    let Some(header) = table.header() else {
        return (columns, warnings);
    };

    for (index, cell) in header.cells.iter().enumerate().skip(1) {
        let text = cell.as_deref().unwrap_or_default();
        let Some(identifier) = identifier_from_header(text, map_names) else {
            // Blank trailing header cells are layout, not columns.
            if !text.trim().is_empty() || has_data_in_column(table, index) {
                warnings.push(Warning::UnusableHeader {
                    resource: table.resource_name.clone(),
                    column: index,
                    header: text.to_string(),
                });
            }
            continue;
        };
        if !seen.insert(identifier.clone()) {
            warnings.push(Warning::DuplicateLanguage {
                resource: table.resource_name.clone(),
                column: index,
                language: identifier,
            });
            continue;
        }
        columns.push(LanguageColumn {
            index,
            identifier,
            header: text.to_string(),
        });
    }

    if columns.is_empty() {
        warnings.push(Warning::NoLanguages {
            resource: table.resource_name.clone(),
        });
    }

    (columns, warnings)
}

fn has_data_in_column(table: &Table, index: usize) -> bool {
    table.data_rows().any(|(_, row)| row.cell(index).is_some())
}

/// Imports spreadsheet tables into a resource root.
///
/// # Example
///
/// ```rust,no_run
/// use sheetstrings::{Importer, NullReporter, Row, Table};
///
/// let table = Table::new(
///     "Localizable.strings",
///     vec![
///         Row::from_strs(&["Key", "English (US)", "French"]),
///         Row::from_strs(&["greeting", "Hello", "Bonjour"]),
///     ],
/// );
/// let report = Importer::new("Resources").run(&table, &NullReporter)?;
/// assert!(report.is_success());
/// # Ok::<(), sheetstrings::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Importer {
    root: PathBuf,
    options: ImportOptions,
    cancel: Option<Arc<AtomicBool>>,
}

impl Importer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Importer {
            root: root.into(),
            options: ImportOptions::default(),
            cancel: None,
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Stops the run before the next language once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Imports several tables in order, merging their reports.
    pub fn run_all(
        &self,
        tables: &[Table],
        reporter: &dyn Reporter,
    ) -> Result<ImportReport, Error> {
        for table in tables {
            ensure_header(table)?;
        }

        let mut report = ImportReport::default();
        for table in tables {
            report.merge(self.run(table, reporter)?);
            if report.cancelled {
                break;
            }
        }
        Ok(report)
    }

    /// Imports one table: every detected language column is reconciled
    /// against its resource file under the root.
    pub fn run(&self, table: &Table, reporter: &dyn Reporter) -> Result<ImportReport, Error> {
        ensure_header(table)?;

        let mut report = ImportReport::default();
        let (columns, warnings) = detect_languages(table, self.options.map_language_names);
        for warning in warnings {
            self.warn(warning, reporter, &mut report);
        }

        let mut rows = Vec::new();
        for (index, row) in table.data_rows() {
            match row.key() {
                Some(key) => rows.push((key, row)),
                None if row.cells.iter().skip(1).any(Option::is_some) => self.warn(
                    Warning::MissingKey {
                        resource: table.resource_name.clone(),
                        row: index,
                    },
                    reporter,
                    &mut report,
                ),
                None => {}
            }
        }

        let store = ResourceStore::new(&self.root, &table.resource_name);
        let process = |column: &LanguageColumn| {
            if self.is_cancelled() {
                return None;
            }
            Some(self.process_language(&store, column, &rows, reporter))
        };

        let results: Vec<_> = if self.options.parallel {
            columns.par_iter().map(process).collect()
        } else {
            // Sequential runs stop at the first cancelled language.
            columns.iter().map_while(process).map(Some).collect()
        };

        report.cancelled = results.len() < columns.len() || results.iter().any(Option::is_none);
        for result in results.into_iter().flatten() {
            match result {
                Ok(outcome) => report.succeeded.push(outcome),
                Err(failure) => report.failed.push(failure),
            }
        }

        log::debug!(
            "{}: {} languages succeeded, {} failed",
            table.resource_name,
            report.succeeded.len(),
            report.failed.len()
        );
        Ok(report)
    }

    fn process_language(
        &self,
        store: &ResourceStore,
        column: &LanguageColumn,
        rows: &[(&str, &Row)],
        reporter: &dyn Reporter,
    ) -> Result<LanguageOutcome, LanguageFailure> {
        let language = column.identifier.as_str();
        let path = store.path_for(language);
        reporter.language_started(column, &path);
        log::debug!("reconciling {} into {}", column.header, path.display());

        let outcome = store.load(language).and_then(|existing| {
            // Cells use the file's escape syntax, so `\n` typed in a sheet is a
            // line break.
            let column_values: Vec<(String, Option<String>)> = rows
                .iter()
                .map(|(key, row)| {
                    let value = row.cell(column.index).map(unescape_literal);
                    (unescape_literal(key), value)
                })
                .collect();
            let result = reconcile(
                existing,
                column_values
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_deref())),
            );
            if !self.options.dry_run {
                store.save(language, &result.map)?;
            }
            Ok(LanguageOutcome {
                resource_name: store.resource_name().to_string(),
                language: language.to_string(),
                path: path.clone(),
                created: result.to_create.len(),
                updated: result.to_update.len(),
                changed: result.changed.len(),
                total: result.map.len(),
                written: !self.options.dry_run,
            })
        });

        match outcome {
            Ok(outcome) => {
                reporter.language_succeeded(&outcome);
                Ok(outcome)
            }
            Err(error) => {
                log::warn!("{}: {}", language, error);
                let failure = LanguageFailure {
                    resource_name: store.resource_name().to_string(),
                    language: language.to_string(),
                    path,
                    error,
                };
                reporter.language_failed(&failure);
                Err(failure)
            }
        }
    }

    fn warn(&self, warning: Warning, reporter: &dyn Reporter, report: &mut ImportReport) {
        log::warn!("{}", warning);
        reporter.warning(&warning);
        report.warnings.push(warning);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

fn ensure_header(table: &Table) -> Result<(), Error> {
    if table.header().is_none() {
        return Err(Error::invalid_input(format!(
            "sheet `{}` has no header row",
            table.resource_name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, sync::Mutex};
    use tempfile::TempDir;

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            "Resource.strings",
            rows.iter().map(|cells| Row::from_strs(*cells)).collect(),
        )
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn language_started(&self, column: &LanguageColumn, _path: &Path) {
            self.events.lock().unwrap().push(format!("start {}", column.identifier));
        }

        fn language_succeeded(&self, outcome: &LanguageOutcome) {
            self.events.lock().unwrap().push(format!("ok {}", outcome.language));
        }

        fn language_failed(&self, failure: &LanguageFailure) {
            self.events.lock().unwrap().push(format!("fail {}", failure.language));
        }

        fn warning(&self, warning: &Warning) {
            self.events.lock().unwrap().push(format!("warn {}", warning));
        }
    }

    #[test]
    fn test_detect_languages_skips_key_column_and_bad_headers() {
        let table = Table::new(
            "Resource.strings",
            vec![
                Row::new(vec![
                    Some("Key".into()),
                    Some("English (US)".into()),
                    Some("   ".into()),
                    Some("fr".into()),
                    Some("en".into()),
                    None,
                ]),
                Row::from_strs(&["k", "a", "b", "c", "d"]),
            ],
        );
        let (columns, warnings) = detect_languages(&table, true);
        let ids: Vec<_> = columns.iter().map(|c| c.identifier.as_str()).collect();
        assert_eq!(ids, vec!["en", "fr"]);
        assert_eq!(columns[1].index, 3);
        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], Warning::UnusableHeader { column: 2, .. }));
        assert!(matches!(warnings[1], Warning::DuplicateLanguage { column: 4, .. }));
    }

    #[test]
    fn test_table_without_header_is_invalid_input() {
        let dir = TempDir::new().unwrap();
        let empty = Table::new("Resource.strings", Vec::new());
        let result = Importer::new(dir.path()).run(&empty, &NullReporter);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_keyless_row_is_warned_and_skipped() {
        let dir = TempDir::new().unwrap();
        let table = table(&[&["Key", "en"], &["", "orphan"], &["greeting", "Hello"]]);
        let reporter = RecordingReporter::default();
        let report = Importer::new(dir.path()).run(&table, &reporter).unwrap();

        assert!(report.is_success());
        assert_eq!(report.warnings, vec![Warning::MissingKey {
            resource: "Resource.strings".into(),
            row: 1,
        }]);
        let written = fs::read_to_string(dir.path().join("en/Resource.strings")).unwrap();
        assert_eq!(written, "\"greeting\" = \"Hello\";\n");
        let events = reporter.events.lock().unwrap();
        assert_eq!(
            events.first().map(String::as_str),
            Some("warn Resource.strings: row 2 has no key, skipped")
        );
    }

    #[test]
    fn test_failure_in_one_language_does_not_stop_others() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("en")).unwrap();
        fs::write(dir.path().join("en/Resource.strings"), "\"broken\" = ").unwrap();
        let table = table(&[
            &["Key", "en", "fr", "de"],
            &["greeting", "Hello", "Bonjour", "Hallo"],
        ]);
        let reporter = RecordingReporter::default();

        let report = Importer::new(dir.path()).run(&table, &reporter).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].language, "en");
        assert!(matches!(report.failed[0].error, Error::MalformedResource { .. }));
        let ok: Vec<_> = report.succeeded.iter().map(|o| o.language.as_str()).collect();
        assert_eq!(ok, vec!["fr", "de"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("en/Resource.strings")).unwrap(),
            "\"broken\" = "
        );
        let events = reporter.events.lock().unwrap();
        assert_eq!(
            *events,
            vec!["start en", "fail en", "start fr", "ok fr", "start de", "ok de"]
        );
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let table = table(&[&["Key", "en"], &["greeting", "Hello"]]);
        let report = Importer::new(dir.path())
            .with_options(ImportOptions::new().with_dry_run(true))
            .run(&table, &NullReporter)
            .unwrap();

        assert_eq!(report.succeeded.len(), 1);
        assert!(!report.succeeded[0].written);
        assert_eq!(report.succeeded[0].created, 1);
        assert!(!dir.path().join("en").exists());
    }

    #[test]
    fn test_parallel_report_keeps_header_order() {
        let dir = TempDir::new().unwrap();
        let header = ["Key", "en", "fr", "de", "es", "it", "ja", "ko", "nl"];
        let values = ["k", "1", "2", "3", "4", "5", "6", "7", "8"];
        let table = table(&[&header, &values]);

        let report = Importer::new(dir.path())
            .with_options(ImportOptions::new().with_parallel(true))
            .run(&table, &NullReporter)
            .unwrap();

        let order: Vec<_> = report.succeeded.iter().map(|o| o.language.as_str()).collect();
        assert_eq!(order, header[1..].to_vec());
        assert!(report.is_success());
    }

    #[test]
    fn test_cancelled_run_processes_nothing_more() {
        let dir = TempDir::new().unwrap();
        let flag = Arc::new(AtomicBool::new(true));
        let table = table(&[&["Key", "en", "fr"], &["greeting", "Hello", "Bonjour"]]);

        let report = Importer::new(dir.path())
            .with_cancel_flag(flag)
            .run(&table, &NullReporter)
            .unwrap();

        assert!(report.cancelled);
        assert!(!report.is_success());
        assert!(report.succeeded.is_empty());
        assert!(!dir.path().join("en").exists());
    }

    #[test]
    fn test_run_all_merges_tables() {
        let dir = TempDir::new().unwrap();
        let first = table(&[&["Key", "en"], &["a", "A"]]);
        let mut second = table(&[&["Key", "en"], &["b", "B"]]);
        second.resource_name = "InfoPlist.strings".into();

        let report = Importer::new(dir.path())
            .run_all(&[first, second], &NullReporter)
            .unwrap();

        assert_eq!(report.succeeded.len(), 2);
        assert!(dir.path().join("en/Resource.strings").is_file());
        assert!(dir.path().join("en/InfoPlist.strings").is_file());
    }
}
