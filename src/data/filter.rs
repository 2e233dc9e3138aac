use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, PerformanceTable};

// ---------------------------------------------------------------------------
// FilterSpec: which values are allowed per column, plus the score interval
// ---------------------------------------------------------------------------

/// The current set of inclusion constraints applied to the loaded table.
///
/// Categorical semantics per column:
/// * Column absent from `categorical` → unconstrained.
/// * Column present with a non-empty set → row value must be a member.
/// * Column present with an EMPTY set → nothing matches. There is no
///   implicit "all" fallback once a constraint exists.
///
/// The score interval is closed: `score_min <= score <= score_max`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub categorical: BTreeMap<String, BTreeSet<CellValue>>,
    pub score_min: f64,
    pub score_max: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        FilterSpec {
            categorical: BTreeMap::new(),
            score_min: 0.0,
            score_max: 100.0,
        }
    }
}

impl FilterSpec {
    /// No categorical constraints, full score range.
    pub fn unrestricted() -> Self {
        FilterSpec::default()
    }

    /// Indices of rows passing every predicate, in table order.
    ///
    /// Predicates combine by AND; there is no OR composition. A
    /// present-but-empty allowed set can never match, so the scan is
    /// skipped entirely.
    pub fn matching_indices(&self, table: &PerformanceTable) -> Vec<usize> {
        if self.categorical.values().any(|allowed| allowed.is_empty()) {
            return Vec::new();
        }

        table
            .records
            .iter()
            .enumerate()
            .filter(|(_, rec)| {
                if rec.score < self.score_min || rec.score > self.score_max {
                    return false;
                }
                for (column, allowed) in &self.categorical {
                    match rec.fields.get(column) {
                        Some(value) => {
                            if !allowed.contains(value) {
                                return false;
                            }
                        }
                        None => return false,
                    }
                }
                true
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// A new table with only the matching rows, input order preserved.
    /// The input table is never mutated.
    pub fn apply(&self, table: &PerformanceTable) -> PerformanceTable {
        table.subset(&self.matching_indices(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn table() -> PerformanceTable {
        let rows = [
            (45.0, "EMEF NORTE", "5º ANO"),
            (90.0, "EMEF NORTE", "9º ANO"),
            (62.0, "EMEF SUL", "5º ANO"),
            (62.0, "EMEF SUL", "9º ANO"),
        ];
        let records = rows
            .iter()
            .map(|(score, escola, etapa)| Record {
                score: *score,
                fields: BTreeMap::from([
                    ("ESCOLA".to_string(), CellValue::Text(escola.to_string())),
                    ("ETAPA".to_string(), CellValue::Text(etapa.to_string())),
                ]),
            })
            .collect();
        PerformanceTable::from_records(
            records,
            vec!["ESCOLA".into(), "ETAPA".into(), "DESEMPENHO".into()],
            "DESEMPENHO".into(),
        )
    }

    fn allow(values: &[&str]) -> BTreeSet<CellValue> {
        values
            .iter()
            .map(|v| CellValue::Text(v.to_string()))
            .collect()
    }

    #[test]
    fn unrestricted_spec_keeps_everything_in_order() {
        let t = table();
        assert_eq!(FilterSpec::unrestricted().matching_indices(&t), vec![0, 1, 2, 3]);
    }

    #[test]
    fn categorical_and_range_combine_by_and() {
        let t = table();
        let mut spec = FilterSpec::unrestricted();
        spec.categorical.insert("ESCOLA".into(), allow(&["EMEF NORTE"]));
        spec.score_min = 50.0;
        assert_eq!(spec.matching_indices(&t), vec![1]);
    }

    #[test]
    fn score_interval_is_inclusive_on_both_ends() {
        let t = table();
        let spec = FilterSpec {
            score_min: 45.0,
            score_max: 62.0,
            ..FilterSpec::unrestricted()
        };
        assert_eq!(spec.matching_indices(&t), vec![0, 2, 3]);
    }

    #[test]
    fn empty_allowed_set_matches_nothing() {
        let t = table();
        let mut spec = FilterSpec::unrestricted();
        spec.categorical.insert("ETAPA".into(), allow(&["5º ANO", "9º ANO"]));
        spec.categorical.insert("ESCOLA".into(), BTreeSet::new());
        assert!(spec.matching_indices(&t).is_empty());
    }

    #[test]
    fn apply_returns_a_verbatim_subset_and_is_idempotent() {
        let t = table();
        let mut spec = FilterSpec::unrestricted();
        spec.categorical.insert("ETAPA".into(), allow(&["5º ANO"]));

        let once = spec.apply(&t);
        assert_eq!(once.len(), 2);
        for rec in &once.records {
            assert!(t
                .records
                .iter()
                .any(|orig| orig.score == rec.score && orig.fields == rec.fields));
        }

        let twice = spec.apply(&once);
        assert_eq!(twice.len(), once.len());
        for (a, b) in twice.records.iter().zip(once.records.iter()) {
            assert_eq!(a.score, b.score);
            assert_eq!(a.fields, b.fields);
        }
    }

    #[test]
    fn empty_result_is_a_valid_outcome() {
        let t = table();
        let spec = FilterSpec {
            score_min: 95.0,
            score_max: 100.0,
            ..FilterSpec::unrestricted()
        };
        let filtered = spec.apply(&t);
        assert!(filtered.is_empty());
        assert_eq!(filtered.columns, t.columns);
    }
}
