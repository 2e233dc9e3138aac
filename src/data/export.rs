use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context;

use super::model::PerformanceTable;

/// Serialize the rows at `indices` as CSV, preserving the table's column
/// order. The score renders through the same `Display` logic as the UI,
/// so integral values come out without a trailing `.0`.
pub fn write_csv<W: Write>(
    table: &PerformanceTable,
    indices: &[usize],
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record(&table.columns)?;

    for &idx in indices {
        let Some(rec) = table.records.get(idx) else {
            continue;
        };
        let row: Vec<String> = table
            .columns
            .iter()
            .map(|col| {
                if *col == table.score_column {
                    format_score(rec.score)
                } else {
                    rec.field(col).to_string()
                }
            })
            .collect();
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the rows at `indices` to a CSV file at `path`.
pub fn save_csv(table: &PerformanceTable, indices: &[usize], path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("não foi possível criar {}", path.display()))?;
    write_csv(table, indices, file)
        .with_context(|| format!("falha ao exportar CSV para {}", path.display()))
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.is_finite() {
        format!("{}", score as i64)
    } else {
        format!("{score}")
    }
}
