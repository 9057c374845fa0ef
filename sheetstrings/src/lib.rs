#![forbid(unsafe_code)]
//! Turn translation spreadsheets into per-language Apple `.strings` files.
//!
//! A spreadsheet is decoded into a [`Table`]: the header row names the
//! languages, every following row carries one translation key and its value
//! for each language. The [`Importer`] reconciles every language column with
//! the resource file already on disk at `<root>/<language>/<resource name>`:
//!
//! - keys missing from the file are created,
//! - keys already in the file take the spreadsheet value,
//! - keys the spreadsheet does not mention are kept as they are.
//!
//! Files are rewritten in key order through a temporary file and a rename, so
//! output is reproducible and a crash never leaves a truncated file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheetstrings::{Importer, NullReporter, Row, Table};
//!
//! let table = Table::new(
//!     "Localizable.strings",
//!     vec![
//!         Row::from_strs(&["Key", "en", "fr"]),
//!         Row::from_strs(&["greeting", "Hello", "Bonjour"]),
//!     ],
//! );
//! let report = Importer::new("Resources").run(&table, &NullReporter)?;
//! for outcome in &report.succeeded {
//!     println!("{}: {} created, {} updated", outcome.language, outcome.created, outcome.updated);
//! }
//! # Ok::<(), sheetstrings::Error>(())
//! ```

pub mod error;
pub mod importer;
pub mod language;
pub mod reconcile;
pub mod store;
pub mod strings;
pub mod types;

// Re-export most used types for easy consumption
pub use crate::{
    error::Error,
    importer::{
        ImportOptions, ImportReport, Importer, LanguageFailure, LanguageOutcome, NullReporter,
        Reporter, Warning, detect_languages,
    },
    reconcile::{Reconciliation, reconcile},
    store::{ResourceStore, read_resource, write_resource},
    types::{Cell, LanguageColumn, ResourceMap, Row, Table},
};
