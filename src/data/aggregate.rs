use std::collections::HashMap;

use super::model::{CellValue, PerformanceTable};

// ---------------------------------------------------------------------------
// Threshold policy
// ---------------------------------------------------------------------------

/// Scores below this are flagged for attention throughout the UI.
pub const LOW_SCORE_THRESHOLD: f64 = 50.0;

/// Pure comparison used by cards, chart bars, and table cells.
pub fn is_below_threshold(score: f64) -> bool {
    score < LOW_SCORE_THRESHOLD
}

// ---------------------------------------------------------------------------
// Group means
// ---------------------------------------------------------------------------

/// How [`group_means`] orders its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Groups appear in the order their key first occurs in the input.
    FirstAppearance,
    /// Highest mean first; ties keep first-appearance order.
    MeanDescending,
    /// Lowest mean first; ties keep first-appearance order.
    MeanAscending,
}

/// Key of one aggregated group: the primary column's value, plus the
/// secondary column's value when grouping by two columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub primary: CellValue,
    pub secondary: Option<CellValue>,
}

/// One aggregated row: unweighted mean of the score over `count` members.
#[derive(Debug, Clone)]
pub struct GroupMean {
    pub key: GroupKey,
    pub mean: f64,
    pub count: usize,
}

/// Group the rows at `indices` by one or two categorical columns and reduce
/// the score by arithmetic mean.
pub fn group_means(
    table: &PerformanceTable,
    indices: &[usize],
    primary: &str,
    secondary: Option<&str>,
    order: SortOrder,
) -> Vec<GroupMean> {
    // Accumulate in first-appearance order; `slots` maps key → position.
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();
    let mut acc: Vec<(GroupKey, f64, usize)> = Vec::new();

    for &idx in indices {
        let Some(rec) = table.records.get(idx) else {
            continue;
        };
        let key = GroupKey {
            primary: rec.field(primary).clone(),
            secondary: secondary.map(|col| rec.field(col).clone()),
        };
        match slots.get(&key) {
            Some(&slot) => {
                acc[slot].1 += rec.score;
                acc[slot].2 += 1;
            }
            None => {
                slots.insert(key.clone(), acc.len());
                acc.push((key, rec.score, 1));
            }
        }
    }

    let mut groups: Vec<GroupMean> = acc
        .into_iter()
        .map(|(key, sum, count)| GroupMean {
            key,
            mean: sum / count as f64,
            count,
        })
        .collect();

    // sort_by is stable, so equal means keep their relative order.
    match order {
        SortOrder::FirstAppearance => {}
        SortOrder::MeanDescending => groups.sort_by(|a, b| b.mean.total_cmp(&a.mean)),
        SortOrder::MeanAscending => groups.sort_by(|a, b| a.mean.total_cmp(&b.mean)),
    }

    groups
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

/// Whole-selection statistics over the score column.
#[derive(Debug, Clone, Copy)]
pub struct Summary {
    pub mean: f64,
    pub max: f64,
    pub min: f64,
    pub count: usize,
}

impl Summary {
    /// With zero rows the numeric fields are NaN; callers must branch on
    /// this instead of rendering them.
    pub fn has_rows(&self) -> bool {
        self.count > 0
    }
}

/// Mean, max, min, and count of the scores at `indices`.
pub fn summarize(table: &PerformanceTable, indices: &[usize]) -> Summary {
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;
    let mut count = 0usize;

    for &idx in indices {
        let Some(rec) = table.records.get(idx) else {
            continue;
        };
        sum += rec.score;
        max = max.max(rec.score);
        min = min.min(rec.score);
        count += 1;
    }

    if count == 0 {
        return Summary {
            mean: f64::NAN,
            max: f64::NAN,
            min: f64::NAN,
            count: 0,
        };
    }

    Summary {
        mean: sum / count as f64,
        max,
        min,
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::collections::BTreeMap;

    fn table(rows: &[(&str, f64)]) -> PerformanceTable {
        let records = rows
            .iter()
            .map(|(group, score)| Record {
                score: *score,
                fields: BTreeMap::from([(
                    "ETAPA".to_string(),
                    CellValue::Text(group.to_string()),
                )]),
            })
            .collect();
        PerformanceTable::from_records(
            records,
            vec!["ETAPA".into(), "NOTA".into()],
            "NOTA".into(),
        )
    }

    fn all_indices(table: &PerformanceTable) -> Vec<usize> {
        (0..table.len()).collect()
    }

    #[test]
    fn summarize_basic() {
        let t = table(&[("A", 40.0), ("A", 60.0), ("B", 80.0)]);
        let s = summarize(&t, &all_indices(&t));
        assert_eq!(s.count, 3);
        assert_eq!(s.mean, 60.0);
        assert_eq!(s.max, 80.0);
        assert_eq!(s.min, 40.0);
        assert!(s.has_rows());
    }

    #[test]
    fn summarize_zero_rows_is_degenerate_not_a_crash() {
        let t = table(&[("A", 40.0)]);
        let s = summarize(&t, &[]);
        assert_eq!(s.count, 0);
        assert!(!s.has_rows());
        assert!(s.mean.is_nan());
        assert!(s.max.is_nan());
        assert!(s.min.is_nan());
    }

    #[test]
    fn group_means_are_unweighted() {
        let t = table(&[("A", 50.0), ("B", 30.0), ("A", 70.0)]);
        let groups = group_means(&t, &all_indices(&t), "ETAPA", None, SortOrder::FirstAppearance);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key.primary, CellValue::Text("A".into()));
        assert_eq!(groups[0].mean, 60.0);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[1].key.primary, CellValue::Text("B".into()));
        assert_eq!(groups[1].mean, 30.0);
    }

    #[test]
    fn sort_orders() {
        let t = table(&[("A", 50.0), ("B", 30.0), ("A", 70.0)]);
        let idx = all_indices(&t);

        let desc = group_means(&t, &idx, "ETAPA", None, SortOrder::MeanDescending);
        assert_eq!(desc[0].key.primary, CellValue::Text("A".into()));
        assert_eq!(desc[1].key.primary, CellValue::Text("B".into()));

        let asc = group_means(&t, &idx, "ETAPA", None, SortOrder::MeanAscending);
        assert_eq!(asc[0].key.primary, CellValue::Text("B".into()));
        assert_eq!(asc[1].key.primary, CellValue::Text("A".into()));
    }

    #[test]
    fn equal_means_keep_first_appearance_order() {
        let t = table(&[("C", 55.0), ("A", 55.0), ("B", 55.0)]);
        let sorted = group_means(
            &t,
            &all_indices(&t),
            "ETAPA",
            None,
            SortOrder::MeanDescending,
        );
        let order: Vec<String> = sorted.iter().map(|g| g.key.primary.to_string()).collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn two_key_grouping_splits_on_both_columns() {
        let records = [
            ("5º ANO", "MATEMÁTICA", 40.0),
            ("5º ANO", "LÍNGUA PORTUGUESA", 80.0),
            ("9º ANO", "MATEMÁTICA", 60.0),
            ("5º ANO", "MATEMÁTICA", 50.0),
        ]
        .iter()
        .map(|(etapa, comp, score)| Record {
            score: *score,
            fields: BTreeMap::from([
                ("ETAPA".to_string(), CellValue::Text(etapa.to_string())),
                ("COMPONENTE".to_string(), CellValue::Text(comp.to_string())),
            ]),
        })
        .collect();
        let t = PerformanceTable::from_records(
            records,
            vec!["ETAPA".into(), "COMPONENTE".into(), "NOTA".into()],
            "NOTA".into(),
        );

        let groups = group_means(
            &t,
            &all_indices(&t),
            "ETAPA",
            Some("COMPONENTE"),
            SortOrder::FirstAppearance,
        );
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].mean, 45.0);
        assert_eq!(groups[0].count, 2);
        assert_eq!(
            groups[0].key.secondary,
            Some(CellValue::Text("MATEMÁTICA".into()))
        );
    }

    #[test]
    fn threshold_flag_is_a_strict_comparison() {
        assert!(is_below_threshold(45.0));
        assert!(is_below_threshold(49.999));
        assert!(!is_below_threshold(50.0));
        assert!(!is_below_threshold(90.0));
    }
}
