//! Columnar snapshot of a preprocessed dataset, for downstream reuse.
//!
//! Every column is stored as nullable UTF-8; empty cells become nulls.

use std::path::Path;
use std::sync::Arc;

use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use tracing::{error, info, instrument};

use pharmacorpus_shared::{Cell, PharmaCorpusError, Result, Table};

use crate::{OutputMeta, write_atomic};

/// Write `table` as a single-row-group Parquet file.
#[instrument(skip_all, fields(path = %path.display(), rows = table.len()))]
pub fn write_snapshot(path: &Path, table: &Table) -> Result<OutputMeta> {
    let meta = encode_parquet(path, table)
        .and_then(|bytes| write_atomic(path, &bytes))
        .inspect_err(|e| error!(error = %e, "failed to write snapshot"))?;

    info!(size = meta.size_bytes, "snapshot written");
    Ok(meta)
}

fn encode_parquet(path: &Path, table: &Table) -> Result<Vec<u8>> {
    if table.columns().is_empty() {
        return Err(PharmaCorpusError::validation(
            "cannot snapshot a table without columns",
        ));
    }

    let fields: Vec<Field> = table
        .columns()
        .iter()
        .map(|name| Field::new(name, DataType::Utf8, true))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let arrays: Vec<ArrayRef> = (0..table.columns().len())
        .map(|idx| {
            let values: Vec<Option<String>> = table.column(idx).map(Cell::as_text).collect();
            Arc::new(StringArray::from(values)) as ArrayRef
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays)
        .map_err(|e| PharmaCorpusError::write(path, e.to_string()))?;

    let parquet_err = |e: parquet::errors::ParquetError| PharmaCorpusError::write(path, e.to_string());

    let mut buf = Vec::new();
    {
        let mut writer = ArrowWriter::try_new(&mut buf, schema, None).map_err(parquet_err)?;
        writer.write(&batch).map_err(parquet_err)?;
        writer.close().map_err(parquet_err)?;
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use arrow_array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    use super::*;
    use crate::temp_dir;

    #[test]
    fn snapshot_preserves_columns_and_nulls() {
        let dir = temp_dir("pc-snapshot");
        let path = dir.join("abcfarma.parquet");

        let mut table = Table::new(vec!["nome".into(), "composição".into(), "ean".into()]);
        table.push_row(vec!["novalgina".into(), "dipirona".into(), Cell::Number(7891.0)]);
        table.push_row(vec!["anador".into(), "dipirona".into(), Cell::Empty]);
        write_snapshot(&path, &table).expect("write snapshot");

        let file = std::fs::File::open(&path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .expect("open parquet")
            .build()
            .expect("build reader");
        let batches: Vec<RecordBatch> = reader.map(|b| b.expect("batch")).collect();
        assert_eq!(batches.len(), 1);

        let batch = &batches[0];
        assert_eq!(batch.num_rows(), 2);
        let names: Vec<&str> = batch
            .schema_ref()
            .fields()
            .iter()
            .map(|f| f.name().as_str())
            .collect();
        assert_eq!(names, ["nome", "composição", "ean"]);

        let ean = batch
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .expect("utf8 column");
        assert_eq!(ean.value(0), "7891");
        assert!(ean.is_null(1));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn table_without_columns_is_rejected() {
        let dir = temp_dir("pc-snapshot-empty");
        let err = write_snapshot(&dir.join("x.parquet"), &Table::default()).unwrap_err();
        assert!(matches!(err, PharmaCorpusError::Validation { .. }));
        assert!(!dir.join("x.parquet").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
