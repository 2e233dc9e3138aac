use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use thiserror::Error;

use crate::schema::SchemaDescriptor;

use super::model::{CellValue, PerformanceTable, Record};

// ---------------------------------------------------------------------------
// LoadError – everything that can go wrong between path and table
// ---------------------------------------------------------------------------

/// Typed outcome of a failed load. Messages are shown verbatim in the UI
/// status line, so they are worded for the user.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("arquivo não encontrado: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("planilha '{0}' não encontrada no arquivo")]
    SheetNotFound(String),

    #[error("colunas obrigatórias faltando: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("linha {row}: valor de desempenho inválido '{value}'")]
    MalformedScore { row: usize, value: String },

    #[error("falha ao ler o arquivo Excel: {0}")]
    Workbook(#[from] calamine::XlsxError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load one sheet of an `.xlsx` workbook into a [`PerformanceTable`].
///
/// The first row of the sheet is the header. A leftover pandas index column
/// (blank header or `"Unnamed: 0"`) is dropped, the columns listed in
/// `schema.required_columns` must all be present, and the score column is
/// normalized to `f64`: numeric cells pass through, textual cells like
/// `"85,3%"` lose the percent sign and the comma decimal separator.
pub fn load_workbook(
    path: &Path,
    schema: &SchemaDescriptor,
) -> Result<PerformanceTable, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)?;

    if !workbook
        .sheet_names()
        .iter()
        .any(|name| name == schema.sheet_name)
    {
        return Err(LoadError::SheetNotFound(schema.sheet_name.to_string()));
    }

    let range = workbook.worksheet_range(schema.sheet_name)?;
    parse_range(&range, schema)
}

// ---------------------------------------------------------------------------
// Sheet parsing
// ---------------------------------------------------------------------------

fn parse_range(
    range: &Range<Data>,
    schema: &SchemaDescriptor,
) -> Result<PerformanceTable, LoadError> {
    let mut rows = range.rows();
    let header_row = rows.next().unwrap_or(&[]);

    // Header cells, trimmed; spreadsheets accumulate stray whitespace.
    // Artifact index columns are dropped here, cells and all.
    let kept: Vec<(usize, String)> = header_row
        .iter()
        .enumerate()
        .map(|(idx, cell)| (idx, cell.to_string().trim().to_string()))
        .filter(|(_, header)| !is_artifact_column(header))
        .collect();

    let columns: Vec<String> = kept.iter().map(|(_, header)| header.clone()).collect();

    let missing: Vec<String> = schema
        .required_columns
        .iter()
        .filter(|required| !columns.iter().any(|c| c == *required))
        .map(|required| required.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    // Guaranteed present by the missing-columns check.
    let score_idx = kept
        .iter()
        .find(|(_, header)| header == schema.score_column)
        .map(|(idx, _)| *idx)
        .ok_or_else(|| LoadError::MissingColumns(vec![schema.score_column.to_string()]))?;

    let mut records = Vec::new();

    for (row_index, row) in rows.enumerate() {
        if is_empty_row(row) {
            continue;
        }

        // 1-based Excel row number, counting the header as row 1.
        let excel_row = row_index + 2;

        let score_cell = row.get(score_idx).unwrap_or(&Data::Empty);
        let score = parse_score(score_cell).ok_or_else(|| LoadError::MalformedScore {
            row: excel_row,
            value: score_cell.to_string(),
        })?;

        let mut fields = BTreeMap::new();
        for (col_idx, header) in &kept {
            if *col_idx == score_idx {
                continue;
            }
            let cell = row.get(*col_idx).unwrap_or(&Data::Empty);
            fields.insert(header.clone(), convert_cell(cell));
        }

        records.push(Record { score, fields });
    }

    Ok(PerformanceTable::from_records(
        records,
        columns,
        schema.score_column.to_string(),
    ))
}

// ---------------------------------------------------------------------------
// Cell helpers
// ---------------------------------------------------------------------------

/// Pandas writes an unnamed index as a column titled "Unnamed: 0"; the same
/// artifact shows up as a blank header cell in hand-edited files.
fn is_artifact_column(header: &str) -> bool {
    header.is_empty() || header == "Unnamed: 0"
}

/// Rows Excel keeps around after deletions: every cell blank or an error.
fn is_empty_row(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        Data::Error(_) => true,
        _ => false,
    })
}

/// Normalize a score cell to `f64`. Numeric cells pass through unchanged;
/// textual cells such as `"85,3%"` have a trailing percent sign stripped and
/// the comma decimal separator replaced before parsing. `None` means the
/// cell cannot represent a score.
fn parse_score(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => {
            let trimmed = s.trim();
            let without_pct = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
            without_pct.replace(',', ".").parse::<f64>().ok()
        }
        _ => None,
    }
}

/// Convert a non-score cell into a [`CellValue`].
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(_) => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_normalization() {
        assert_eq!(parse_score(&Data::String("85,3%".into())), Some(85.3));
        assert_eq!(parse_score(&Data::String("85.3".into())), Some(85.3));
        assert_eq!(parse_score(&Data::String(" 40% ".into())), Some(40.0));
        assert_eq!(parse_score(&Data::Float(85.3)), Some(85.3));
        assert_eq!(parse_score(&Data::Int(62)), Some(62.0));
        assert_eq!(parse_score(&Data::String("abc".into())), None);
        assert_eq!(parse_score(&Data::String("".into())), None);
        assert_eq!(parse_score(&Data::Empty), None);
    }

    #[test]
    fn artifact_headers() {
        assert!(is_artifact_column(""));
        assert!(is_artifact_column("Unnamed: 0"));
        assert!(!is_artifact_column("ESCOLA"));
        assert!(!is_artifact_column("MÉDIA ACERTOS (%)"));
    }

    #[test]
    fn empty_rows_are_detected() {
        assert!(is_empty_row(&[Data::Empty, Data::String("  ".into())]));
        assert!(!is_empty_row(&[Data::Empty, Data::String("D01".into())]));
        assert!(!is_empty_row(&[Data::Float(1.0)]));
    }

    #[test]
    fn text_cells_are_trimmed() {
        assert_eq!(
            convert_cell(&Data::String("  9º ANO ".into())),
            CellValue::Text("9º ANO".into())
        );
        assert_eq!(convert_cell(&Data::String("   ".into())), CellValue::Empty);
        assert_eq!(convert_cell(&Data::Int(12)), CellValue::Integer(12));
    }
}
