//! CLI library for testing purposes

pub mod import;
pub mod input;
pub mod summary;
pub mod terminal;

pub use import::{ImportCommandOptions, run_import_command};
pub use input::{InputFormat, LoadedInput, SkippedSheet, infer_input_format, read_tables};
