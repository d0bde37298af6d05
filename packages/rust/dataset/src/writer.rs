//! Tabular Writer: persists a [`Table`] as `.xlsx` or `.csv`.

use std::path::Path;

use rust_xlsxwriter::Workbook;
use tracing::{error, info, instrument};

use pharmacorpus_shared::{Cell, PharmaCorpusError, Result, Table};

use crate::{OutputMeta, TableFormat, write_atomic};

/// Write a table, dispatching on the output extension.
///
/// Only `.xlsx` and `.csv` are writable.
#[instrument(skip_all, fields(path = %path.display(), rows = table.len()))]
pub fn write_table(path: &Path, table: &Table) -> Result<OutputMeta> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let encoded = match (TableFormat::from_path(path)?, ext.as_deref()) {
        (TableFormat::Csv, _) => encode_csv(path, table),
        (TableFormat::Workbook, Some("xlsx")) => encode_xlsx(path, table),
        (TableFormat::Workbook, _) => Err(PharmaCorpusError::validation(format!(
            "cannot write {}: only .xlsx and .csv outputs are supported",
            path.display()
        ))),
    };

    let meta = encoded.and_then(|bytes| write_atomic(path, &bytes)).inspect_err(|e| {
        error!(error = %e, "failed to write table");
    })?;

    info!(size = meta.size_bytes, "table written");
    Ok(meta)
}

fn encode_xlsx(path: &Path, table: &Table) -> Result<Vec<u8>> {
    let xlsx_err = |e: rust_xlsxwriter::XlsxError| PharmaCorpusError::write(path, e.to_string());

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        worksheet
            .write_string(0, col_num(path, col)?, name)
            .map_err(xlsx_err)?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(idx + 1)
            .map_err(|_| PharmaCorpusError::write(path, "too many rows for a worksheet"))?;
        for (col, cell) in row.iter().enumerate() {
            let col = col_num(path, col)?;
            let written = match cell {
                Cell::Empty => continue,
                Cell::Text(s) => worksheet.write_string(row_num, col, s),
                Cell::Number(n) => worksheet.write_number(row_num, col, *n),
                Cell::Bool(b) => worksheet.write_boolean(row_num, col, *b),
            };
            written.map_err(xlsx_err)?;
        }
    }

    workbook.save_to_buffer().map_err(xlsx_err)
}

fn col_num(path: &Path, col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| PharmaCorpusError::write(path, "too many columns for a worksheet"))
}

fn encode_csv(path: &Path, table: &Table) -> Result<Vec<u8>> {
    let csv_err = |e: csv::Error| PharmaCorpusError::write(path, e.to_string());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns()).map_err(csv_err)?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.as_text().unwrap_or_default()))
            .map_err(csv_err)?;
    }

    writer
        .into_inner()
        .map_err(|e| PharmaCorpusError::write(path, e.to_string()))
}
