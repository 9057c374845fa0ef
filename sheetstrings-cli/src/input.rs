//! Decoding spreadsheet files into [`Table`]s.
//!
//! Workbooks (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) yield one table per
//! worksheet; the first word of the sheet name is the resource file the sheet
//! feeds. A `.csv` file yields a single table named after the file.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use sheetstrings::{Cell, Error, Row, Table, language::header_token};

/// Spreadsheet container formats the CLI can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Workbook,
    Csv,
}

/// Tables decoded from one input file.
#[derive(Debug, Clone, Default)]
pub struct LoadedInput {
    pub tables: Vec<Table>,
    /// Worksheets that were not turned into tables.
    pub skipped_sheets: Vec<SkippedSheet>,
}

/// A worksheet left out of the import, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSheet {
    pub name: String,
    pub reason: &'static str,
}

/// Infers the input format from the file extension.
pub fn infer_input_format<P: AsRef<Path>>(path: P) -> Option<InputFormat> {
    let extension = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(InputFormat::Workbook),
        "csv" => Some(InputFormat::Csv),
        _ => None,
    }
}

/// Reads every table of the spreadsheet at `path`.
///
/// `resource_name` replaces the resource file name derived from sheet names
/// (or from the CSV file name). Any problem opening or decoding the file is
/// reported as [`Error::InvalidInput`].
pub fn read_tables<P: AsRef<Path>>(
    path: P,
    resource_name: Option<&str>,
) -> Result<LoadedInput, Error> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::invalid_input(format!(
            "{} does not exist or is not a file",
            path.display()
        )));
    }

    match infer_input_format(path) {
        Some(InputFormat::Workbook) => read_workbook(path, resource_name),
        Some(InputFormat::Csv) => read_csv(path, resource_name),
        None => Err(Error::invalid_input(format!(
            "{} is not a spreadsheet (expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv)",
            path.display()
        ))),
    }
}

fn read_workbook(path: &Path, resource_name: Option<&str>) -> Result<LoadedInput, Error> {
    let mut workbook = open_workbook_auto(path).map_err(|e| {
        Error::invalid_input(format!("{} is corrupted or unreadable: {}", path.display(), e))
    })?;

    let mut loaded = LoadedInput::default();
    for sheet_name in workbook.sheet_names() {
        let name = match resource_name {
            Some(name) => name.to_string(),
            None => match header_token(&sheet_name) {
                Some(token) => token.to_string(),
                None => {
                    loaded.skipped_sheets.push(SkippedSheet {
                        name: sheet_name,
                        reason: "no usable name",
                    });
                    continue;
                }
            },
        };

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            Error::invalid_input(format!(
                "cannot read sheet `{}` of {}: {}",
                sheet_name,
                path.display(),
                e
            ))
        })?;

        if range.is_empty() {
            loaded.skipped_sheets.push(SkippedSheet {
                name: sheet_name,
                reason: "empty",
            });
            continue;
        }

        // Ranges start at the first used cell. The first used row is the
        // header; columns are padded so column 0 stays the key column.
        let (first_row, first_col) = range
            .start()
            .map(|(row, col)| (row as usize, col as usize))
            .unwrap_or_default();
        let rows: Vec<Row> = range
            .rows()
            .map(|cells| {
                let mut row = vec![None; first_col];
                row.extend(cells.iter().map(cell_value));
                Row::new(row)
            })
            .collect();

        log::debug!("sheet `{}`: {} rows -> {}", sheet_name, rows.len(), name);
        loaded
            .tables
            .push(Table::new(name, rows).with_first_row(first_row));
    }

    Ok(loaded)
}

fn read_csv(path: &Path, resource_name: Option<&str>) -> Result<LoadedInput, Error> {
    let name = match resource_name {
        Some(name) => name.to_string(),
        None => {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("Localizable");
            format!("{}.strings", stem)
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::invalid_input(format!("cannot open {}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .map_err(|e| Error::invalid_input(format!("cannot parse {}: {}", path.display(), e)))?;
        let cells = record
            .iter()
            .enumerate()
            .map(|(index, field)| {
                let field = if index == 0 && rows.is_empty() {
                    field.trim_start_matches('\u{feff}')
                } else {
                    field
                };
                (!field.is_empty()).then(|| field.to_string())
            })
            .collect();
        rows.push(Row::new(cells));
    }

    Ok(LoadedInput {
        tables: vec![Table::new(name, rows)],
        skipped_sheets: Vec::new(),
    })
}

/// Converts a workbook cell to a table cell. Empty and error cells are absent.
pub fn cell_value(cell: &Data) -> Cell {
    match cell {
        Data::String(v) => Some(v.to_string()),
        Data::Float(v) => Some(format_float(*v)),
        Data::Int(v) => Some(v.to_string()),
        Data::Bool(v) => Some(v.to_string()),
        Data::DateTime(v) => Some(v.to_string()),
        Data::DateTimeIso(v) => Some(v.to_string()),
        Data::DurationIso(v) => Some(v.to_string()),
        Data::Error(_) | Data::Empty => None,
    }
}

/// Whole numbers are stored as floats by spreadsheets; print them without a
/// fractional part so a key typed as `42` stays `42`.
fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
