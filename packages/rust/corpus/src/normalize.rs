//! Row Normalizer and Row Filter.

use tracing::debug;

use pharmacorpus_shared::{Cell, Result, Table};

/// Lowercase every column name and every text cell in place.
///
/// Numbers and booleans are left untouched.
pub fn normalize_table(table: &mut Table) {
    for column in table.columns_mut() {
        *column = column.to_lowercase();
    }

    for row in table.rows_mut() {
        for cell in row.iter_mut() {
            if let Cell::Text(s) = cell {
                *s = s.to_lowercase();
            }
        }
    }
}

/// Drop rows lacking a present value in any of `required` columns.
///
/// Returns the number of dropped rows. A required column that does not exist
/// is a validation error.
pub fn drop_incomplete(table: &mut Table, required: &[&str]) -> Result<usize> {
    let indices = required
        .iter()
        .map(|name| table.require_column(name))
        .collect::<Result<Vec<_>>>()?;

    let before = table.len();
    table.retain_rows(|row| indices.iter().all(|&idx| row[idx].is_present()));
    let dropped = before - table.len();

    debug!(dropped, kept = table.len(), "dropped rows with missing required fields");
    Ok(dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> Table {
        let mut table = Table::new(vec!["NOME".into(), "Composição".into(), "Preço".into()]);
        table.push_row(vec!["NOVALGINA".into(), "DIPIRONA SÓDICA".into(), Cell::Number(9.9)]);
        table.push_row(vec![Cell::Empty, "Dipirona Sódica".into(), Cell::Number(5.0)]);
        table.push_row(vec!["Anador".into(), Cell::Empty, Cell::Empty]);
        table.push_row(vec!["Tylenol".into(), "   ".into(), Cell::Empty]);
        table
    }

    #[test]
    fn lowercases_headers_and_text() {
        let mut table = raw();
        normalize_table(&mut table);

        assert_eq!(table.columns(), ["nome", "composição", "preço"]);
        assert_eq!(table.rows()[0][0], Cell::from("novalgina"));
        assert_eq!(table.rows()[0][1], Cell::from("dipirona sódica"));
        assert_eq!(table.rows()[0][2], Cell::Number(9.9));
        assert_eq!(table.rows()[0][1], table.rows()[1][1]);
    }

    #[test]
    fn drops_rows_missing_required_fields() {
        let mut table = raw();
        normalize_table(&mut table);

        let dropped = drop_incomplete(&mut table, &["nome", "composição"]).expect("filter");
        assert_eq!(dropped, 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], Cell::from("novalgina"));
        assert_eq!(table.rows()[1][1], Cell::from("   "));
    }

    #[test]
    fn unrelated_empty_columns_do_not_drop_rows() {
        let mut table = raw();
        normalize_table(&mut table);

        let dropped = drop_incomplete(&mut table, &["composição"]).expect("filter");
        assert_eq!(dropped, 1);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let mut table = raw();
        normalize_table(&mut table);
        assert!(drop_incomplete(&mut table, &["princ_ativo"]).is_err());
        assert_eq!(table.len(), 4);
    }
}
