//! Dataset Loader: reads a worksheet or CSV file into a [`Table`].
//!
//! The first row is the header. Blank spreadsheet cells and empty CSV fields
//! load as [`Cell::Empty`]; spreadsheet error cells (`#N/A`, `#DIV/0!`) too.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::{debug, error, instrument};

use pharmacorpus_shared::{Cell, PharmaCorpusError, Result, Table};

use crate::TableFormat;

/// Load a dataset, dispatching on the file extension.
///
/// `sheet` selects a worksheet by name; the first worksheet is used when
/// `None`. It is ignored for CSV input.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_table(path: &Path, sheet: Option<&str>) -> Result<Table> {
    if !path.exists() {
        return Err(PharmaCorpusError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, "dataset file not found"),
        ));
    }

    let result = match TableFormat::from_path(path)? {
        TableFormat::Workbook => load_workbook(path, sheet),
        TableFormat::Csv => load_csv(path),
    };

    match &result {
        Ok(table) => debug!(
            rows = table.len(),
            columns = table.columns().len(),
            "dataset loaded"
        ),
        Err(e) => error!(error = %e, "failed to load dataset"),
    }

    result
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| PharmaCorpusError::load(path, e.to_string()))?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| PharmaCorpusError::load(path, "workbook has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| PharmaCorpusError::load(path, format!("sheet '{sheet_name}': {e}")))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        debug!(sheet = %sheet_name, "worksheet is empty");
        return Ok(Table::default());
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, data)| header_name(idx, &cell_from_data(data)))
        .collect();

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect());
    }

    debug!(sheet = %sheet_name, "worksheet read");
    Ok(table)
}

fn load_csv(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|e| PharmaCorpusError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let columns = reader
        .headers()
        .map_err(|e| PharmaCorpusError::load(path, e.to_string()))?
        .iter()
        .enumerate()
        .map(|(idx, name)| header_name(idx, &Cell::from(name)))
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record.map_err(|e| PharmaCorpusError::load(path, e.to_string()))?;
        table.push_row(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::from(field)
                    }
                })
                .collect(),
        );
    }

    Ok(table)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        other => Cell::Text(other.to_string()),
    }
}

/// Header text for a column; blank headers get a positional name.
fn header_name(idx: usize, cell: &Cell) -> String {
    match cell.as_text() {
        Some(name) if !name.trim().is_empty() => name,
        _ => format!("unnamed_{idx}"),
    }
}
