use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell in a categorical/free-text column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring what calamine reads from a sheet.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    Empty,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Empty => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Number(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Empty, Empty) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Number(a), Number(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Number(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Empty => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Number(v) => {
                if v.fract() == 0.0 {
                    write!(f, "{v:.0}")
                } else {
                    write!(f, "{v}")
                }
            }
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source sheet
// ---------------------------------------------------------------------------

/// A single assessment row: the parsed score plus every other column.
#[derive(Debug, Clone)]
pub struct Record {
    /// Score in percent, already normalized to `f64` by the loader.
    pub score: f64,
    /// All non-score columns: column_name → value.
    pub fields: BTreeMap<String, CellValue>,
}

impl Record {
    /// Value of a non-score column, `Empty` when the column is unknown.
    pub fn field(&self, column: &str) -> &CellValue {
        self.fields.get(column).unwrap_or(&CellValue::Empty)
    }
}

// ---------------------------------------------------------------------------
// PerformanceTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed sheet with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct PerformanceTable {
    /// All rows, in sheet order.
    pub records: Vec<Record>,
    /// Column names in the original header order (score column included,
    /// artifact index column already removed by the loader).
    pub columns: Vec<String>,
    /// Name of the score column for this schema.
    pub score_column: String,
    /// For each non-score column the sorted set of unique values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl PerformanceTable {
    /// Build the unique-value index from the loaded records.
    pub fn from_records(
        records: Vec<Record>,
        columns: Vec<String>,
        score_column: String,
    ) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for rec in &records {
            for (col, val) in &rec.fields {
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }

        PerformanceTable {
            records,
            columns,
            score_column,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A new table holding clones of the rows at `indices`, in the given
    /// order. The unique-value index is rebuilt for the subset.
    pub fn subset(&self, indices: &[usize]) -> PerformanceTable {
        let records: Vec<Record> = indices
            .iter()
            .filter_map(|&i| self.records.get(i).cloned())
            .collect();
        PerformanceTable::from_records(
            records,
            self.columns.clone(),
            self.score_column.clone(),
        )
    }
}
