//! Applies a [`FieldExtractor`] to every row of a dataset.

use tracing::{debug, instrument};

use pharmacorpus_shared::{Cell, Result, Table};

use crate::{FieldExtractor, FieldKind};

/// Add the extracted field columns and the cleaned-text column to `table`.
///
/// `dose`, `form`, and `recipient` replace same-named columns or are appended;
/// `cleaned_column` is always moved to the last position. Non-text
/// descriptions are cleaned through their text rendering and empty cells
/// as empty strings.
#[instrument(skip(table, extractor), fields(rows = table.len()))]
pub fn clean_table(
    mut table: Table,
    extractor: &FieldExtractor,
    description_column: &str,
    cleaned_column: &str,
) -> Result<Table> {
    let idx = table.require_column(description_column)?;

    let extractions: Vec<_> = table
        .column(idx)
        .map(|cell| extractor.extract(&cell.as_text().unwrap_or_default()))
        .collect();

    for kind in FieldKind::ALL {
        let values = extractions
            .iter()
            .map(|e| Cell::from(e.field(kind).map(str::to_string)))
            .collect();
        table.set_column(kind.name(), values)?;
    }

    let cleaned = extractions
        .into_iter()
        .map(|e| Cell::Text(e.cleaned))
        .collect();
    table.set_column(cleaned_column, cleaned)?;
    table.move_column_last(cleaned_column);

    debug!(columns = table.columns().len(), "descriptions cleaned");
    Ok(table)
}
