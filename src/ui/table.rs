use std::path::Path;

use eframe::egui::{self, ProgressBar, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::score_color;
use crate::data::export::save_csv;
use crate::data::model::PerformanceTable;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Detailed data view – one row per visible record, plus CSV export
// ---------------------------------------------------------------------------

/// Render the export buttons and the detail table for the current filters.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    let visible = state.visible_indices.clone();
    let wide_column = state.schema().wide_column;

    let Some(table) = &state.table else {
        return;
    };

    let mut export_error: Option<String> = None;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Exportar Dados:");
        if ui.button("Baixar dados filtrados (CSV)").clicked() {
            export_error = export_with_dialog(table, &visible, "desempenho_filtrado.csv");
        }
        if ui.button("Baixar dados completos (CSV)").clicked() {
            // The complete export covers every loaded row, filters ignored.
            let all: Vec<usize> = (0..table.len()).collect();
            export_error = export_with_dialog(table, &all, "desempenho_completo.csv");
        }
    });
    ui.add_space(4.0);

    let mut builder = TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
    for col in &table.columns {
        builder = if Some(col.as_str()) == wide_column {
            builder.column(Column::remainder().clip(true))
        } else {
            builder.column(Column::auto().at_least(60.0))
        };
    }

    builder
        .header(20.0, |mut header| {
            for col in &table.columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, visible.len(), |mut row| {
                let Some(&rec_idx) = visible.get(row.index()) else {
                    return;
                };
                let Some(rec) = table.records.get(rec_idx) else {
                    return;
                };
                for col in &table.columns {
                    row.col(|ui: &mut Ui| {
                        if *col == table.score_column {
                            let fraction = (rec.score / 100.0).clamp(0.0, 1.0) as f32;
                            ui.add(
                                ProgressBar::new(fraction)
                                    .desired_width(110.0)
                                    .fill(score_color(rec.score))
                                    .text(RichText::new(format!("{:.1}%", rec.score)).small()),
                            );
                        } else {
                            ui.label(rec.field(col).to_string());
                        }
                    });
                }
            });
        });

    if let Some(err) = export_error {
        state.status_message = Some(err);
    }
}

/// Ask for a destination and write the CSV. Returns an error message for
/// the status bar, or None on success or cancel.
fn export_with_dialog(
    table: &PerformanceTable,
    indices: &[usize],
    default_name: &str,
) -> Option<String> {
    let file = rfd::FileDialog::new()
        .set_title("Salvar CSV")
        .set_file_name(default_name)
        .add_filter("Arquivos CSV", &["csv"])
        .save_file();

    let path: &Path = match &file {
        Some(p) => p,
        None => return None,
    };

    match save_csv(table, indices, path) {
        Ok(()) => {
            log::info!("exportadas {} linhas para {}", indices.len(), path.display());
            None
        }
        Err(err) => {
            log::error!("exportação CSV falhou: {err:#}");
            Some(format!("Erro ao exportar CSV: {err:#}"))
        }
    }
}
