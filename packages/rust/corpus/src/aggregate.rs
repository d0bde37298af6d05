//! Corpus Aggregator: groups term names under their synonym-source value.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, instrument};

use pharmacorpus_shared::{Corpus, Result, Table};

/// Accumulates `key → {terms}` pairs; insertion order never affects the result.
#[derive(Debug, Default)]
pub struct CorpusBuilder {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl CorpusBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `term` co-occurs with `key`. Repeated pairs are absorbed.
    pub fn insert(&mut self, key: impl Into<String>, term: impl Into<String>) {
        self.groups.entry(key.into()).or_default().insert(term.into());
    }

    /// Freeze into a corpus with sorted keys and sorted, duplicate-free lists.
    pub fn finish(self) -> Corpus {
        Corpus::new(
            self.groups
                .into_iter()
                .map(|(key, terms)| (key, terms.into_iter().collect()))
                .collect(),
        )
    }
}

/// Build a corpus mapping each `synonym_column` value to the distinct
/// `term_column` values found alongside it.
///
/// Grouping is by exact string equality, so callers normalize the table
/// first. Rows without a present value in either column are skipped.
#[instrument(skip(table), fields(rows = table.len()))]
pub fn aggregate(table: &Table, term_column: &str, synonym_column: &str) -> Result<Corpus> {
    let term_idx = table.require_column(term_column)?;
    let key_idx = table.require_column(synonym_column)?;

    let mut builder = CorpusBuilder::new();
    for row in table.rows() {
        let (term, key) = (&row[term_idx], &row[key_idx]);
        if !(term.is_present() && key.is_present()) {
            continue;
        }
        if let (Some(term), Some(key)) = (term.as_text(), key.as_text()) {
            builder.insert(key, term);
        }
    }

    let corpus = builder.finish();
    debug!(
        keys = corpus.len(),
        synonyms = corpus.synonym_count(),
        "corpus aggregated"
    );
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use pharmacorpus_shared::Cell;

    use super::*;

    fn table(rows: &[(Option<&str>, Option<&str>)]) -> Table {
        let mut table = Table::new(vec!["term".into(), "syn".into()]);
        for (term, syn) in rows {
            table.push_row(vec![
                term.map_or(Cell::Empty, Cell::from),
                syn.map_or(Cell::Empty, Cell::from),
            ]);
        }
        table
    }

    fn assert_sorted_unique(corpus: &Corpus) {
        let keys: Vec<&String> = corpus.iter().map(|(k, _)| k).collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]), "keys not ascending");
        for (key, values) in corpus {
            assert!(
                values.windows(2).all(|w| w[0] < w[1]),
                "values under {key} not strictly ascending"
            );
        }
    }

    #[test]
    fn record_missing_term_is_excluded() {
        let corpus = aggregate(&table(&[(Some("X"), Some("A")), (None, Some("A"))]), "term", "syn")
            .expect("aggregate");
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get("A").unwrap(), ["X"]);
    }

    #[test]
    fn record_missing_key_is_excluded() {
        let corpus = aggregate(&table(&[(Some("X"), None), (Some("Y"), Some(""))]), "term", "syn")
            .expect("aggregate");
        assert!(corpus.is_empty());
    }

    #[test]
    fn whitespace_key_is_kept_verbatim() {
        let corpus = aggregate(&table(&[(Some("x"), Some("   "))]), "term", "syn")
            .expect("aggregate");
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get("   ").unwrap(), ["x"]);
    }

    #[test]
    fn empty_input_yields_empty_corpus() {
        let corpus = aggregate(&table(&[]), "term", "syn").expect("aggregate");
        assert!(corpus.is_empty());
    }

    #[test]
    fn duplicates_collapse_and_lists_sort() {
        let corpus = aggregate(
            &table(&[
                (Some("voltaren"), Some("diclofenaco")),
                (Some("cataflam"), Some("diclofenaco")),
                (Some("voltaren"), Some("diclofenaco")),
                (Some("advil"), Some("ibuprofeno")),
                (Some("alivium"), Some("ibuprofeno")),
            ]),
            "term",
            "syn",
        )
        .expect("aggregate");

        assert_sorted_unique(&corpus);
        assert_eq!(corpus.get("diclofenaco").unwrap(), ["cataflam", "voltaren"]);
        assert_eq!(corpus.get("ibuprofeno").unwrap(), ["advil", "alivium"]);
    }

    #[test]
    fn permuted_input_builds_identical_corpus() {
        let rows = [
            (Some("b2"), Some("k2")),
            (Some("a1"), Some("k1")),
            (Some("c1"), Some("k1")),
            (Some("a2"), Some("k2")),
            (Some("b1"), Some("k1")),
            (None, Some("k3")),
            (Some("a1"), Some("k1")),
        ];
        let forward = aggregate(&table(&rows), "term", "syn").expect("aggregate");

        let mut reversed = rows;
        reversed.reverse();
        let backward = aggregate(&table(&reversed), "term", "syn").expect("aggregate");

        let mut rotated = rows;
        rotated.rotate_left(3);
        let shifted = aggregate(&table(&rotated), "term", "syn").expect("aggregate");

        assert_eq!(forward, backward);
        assert_eq!(forward, shifted);
        assert_sorted_unique(&forward);
    }

    #[test]
    fn numeric_cells_group_as_text() {
        let mut table = Table::new(vec!["term".into(), "syn".into()]);
        table.push_row(vec!["genérico".into(), Cell::Number(500.0)]);
        table.push_row(vec![Cell::Number(42.0), Cell::Number(500.0)]);

        let corpus = aggregate(&table, "term", "syn").expect("aggregate");
        assert_eq!(corpus.get("500").unwrap(), ["42", "genérico"]);
    }

    #[test]
    fn key_grouping_is_exact() {
        let corpus = aggregate(
            &table(&[(Some("x"), Some("dipirona")), (Some("y"), Some("dipirona "))]),
            "term",
            "syn",
        )
        .expect("aggregate");
        assert_eq!(corpus.len(), 2);
    }

    #[test]
    fn missing_column_is_an_error() {
        assert!(aggregate(&table(&[]), "nome", "syn").is_err());
    }
}
