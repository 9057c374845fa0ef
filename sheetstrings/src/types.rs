//! Core types for sheetstrings.
//! Spreadsheet decoders produce a [`Table`]; the store reads and writes [`ResourceMap`]s.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single spreadsheet cell.
///
/// `None` means the cell never had content, which is different from a
/// present empty translation (`Some("")`).
pub type Cell = Option<String>;

/// One spreadsheet row. Rows may be shorter than the header; missing
/// trailing cells read as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Row { cells }
    }

    /// Builds a row where every cell is present.
    pub fn from_strs<S: AsRef<str>>(cells: &[S]) -> Self {
        Row {
            cells: cells.iter().map(|c| Some(c.as_ref().to_string())).collect(),
        }
    }

    /// Returns the cell at `index`, or `None` when the cell is absent or out of range.
    pub fn cell(&self, index: usize) -> Option<&str> {
        self.cells.get(index).and_then(|c| c.as_deref())
    }

    /// The translation key, i.e. the first cell, if it holds any non-blank text.
    pub fn key(&self) -> Option<&str> {
        self.cell(0).filter(|key| !key.trim().is_empty())
    }
}

/// A decoded spreadsheet (one worksheet).
///
/// Row 0 is the header: its first cell names the key column, the remaining
/// cells name languages. Rows 1..N are data rows keyed by their first cell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Table {
    /// File name of the resource every language column is written to,
    /// e.g. `Localizable.strings`.
    pub resource_name: String,
    pub rows: Vec<Row>,
    /// Sheet row index of `rows[0]`, when the sheet's first used row is not
    /// its first row. Only affects the row numbers reported in warnings.
    #[serde(default)]
    pub first_row: usize,
}

impl Table {
    pub fn new(resource_name: impl Into<String>, rows: Vec<Row>) -> Self {
        Table {
            resource_name: resource_name.into(),
            rows,
            first_row: 0,
        }
    }

    pub fn with_first_row(mut self, first_row: usize) -> Self {
        self.first_row = first_row;
        self
    }

    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Data rows paired with their zero-based row index in the sheet.
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| (index + self.first_row, row))
    }
}

/// A language column detected in the header row.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageColumn {
    /// Zero-based column index in the table.
    pub index: usize,
    /// Language identifier, also the directory name under the resource root.
    pub identifier: String,
    /// The header cell exactly as it appeared in the sheet.
    pub header: String,
}

/// Key/value content of one resource file.
///
/// Keys are unique and iterate in ascending code point order, which is the
/// order the writer emits them in.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ResourceMap(BTreeMap<String, String>);

impl ResourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts or replaces an entry, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResourceMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = ResourceMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl From<BTreeMap<String, String>> for ResourceMap {
    fn from(value: BTreeMap<String, String>) -> Self {
        ResourceMap(value)
    }
}

impl From<ResourceMap> for BTreeMap<String, String> {
    fn from(value: ResourceMap) -> Self {
        value.0
    }
}
