//! Core domain types: tabular rows loaded from datasets and the synonym corpus.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PharmaCorpusError, Result};

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single dataset value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// No value (blank spreadsheet cell, empty CSV field).
    #[default]
    Empty,
    /// Free text.
    Text(String),
    /// Any numeric value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// A cell is present unless it is empty or holds an empty string.
    /// Whitespace-only text is a value.
    pub fn is_present(&self) -> bool {
        match self {
            Cell::Empty => false,
            Cell::Text(s) => !s.is_empty(),
            Cell::Number(_) | Cell::Bool(_) => true,
        }
    }

    /// Text rendering of the cell, `None` for empty cells.
    ///
    /// Integral numbers render without a fractional part (`7891.0` → `"7891"`),
    /// since spreadsheets store every number as a float.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<Option<String>> for Cell {
    fn from(s: Option<String>) -> Self {
        s.map_or(Cell::Empty, Cell::Text)
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// An in-memory dataset: a header row plus rows of cells.
///
/// Every row has exactly `columns.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given header.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding with empty cells or truncating to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), Cell::Empty);
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Position of a column, or a validation error naming the available columns.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            PharmaCorpusError::validation(format!(
                "column '{name}' not found (available: {})",
                self.columns.join(", ")
            ))
        })
    }

    /// Iterate the cells of one column.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().map(move |row| &row[idx])
    }

    /// Replace the values of a column in place, or append it as a new last column.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(PharmaCorpusError::validation(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }

        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// Move a column to the last position. No-op when the column is absent.
    pub fn move_column_last(&mut self, name: &str) {
        let Some(idx) = self.column_index(name) else {
            return;
        };
        let column = self.columns.remove(idx);
        self.columns.push(column);
        for row in &mut self.rows {
            let cell = row.remove(idx);
            row.push(cell);
        }
    }

    /// Mutable access for in-place normalization passes.
    pub fn columns_mut(&mut self) -> &mut [String] {
        &mut self.columns
    }

    /// Mutable access for in-place normalization passes.
    pub fn rows_mut(&mut self) -> &mut [Vec<Cell>] {
        &mut self.rows
    }

    /// Keep only the rows matching the predicate.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[Cell]) -> bool) {
        self.rows.retain(|row| keep(row));
    }
}

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// Canonical term → synonym names, as persisted in the corpus JSON file.
///
/// Keys iterate in ascending order. Built corpora also hold sorted,
/// duplicate-free value lists; corpora read from disk keep the file's lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Corpus(BTreeMap<String, Vec<String>>);

impl Corpus {
    pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self(entries)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.0.iter()
    }

    /// Total number of synonym names across all keys.
    pub fn synonym_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
