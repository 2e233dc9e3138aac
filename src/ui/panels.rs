use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::model::CellValue;
use crate::schema::{FilterKind, SchemaVariant};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – source selection and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: workbook configuration on top, filters below.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Configuração");
    ui.separator();

    // ---- Workbook source ----
    let file_label = state
        .config
        .workbook_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "(nenhum arquivo)".to_string());
    ui.label(RichText::new(file_label).small());
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Escolher arquivo…").clicked() {
            open_file_dialog(state);
        }
        if ui.button("Recarregar").clicked() {
            state.reload();
        }
    });

    // ---- Schema variant ----
    ui.add_space(4.0);
    ui.strong("Layout da planilha");
    let current_variant = state.config.variant;
    egui::ComboBox::from_id_salt("schema_variant")
        .selected_text(current_variant.label())
        .show_ui(ui, |ui: &mut Ui| {
            for variant in SchemaVariant::ALL {
                if ui
                    .selectable_label(current_variant == variant, variant.label())
                    .clicked()
                {
                    state.set_variant(variant);
                }
            }
        });

    ui.add_space(8.0);
    ui.heading("Filtros");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("Nenhuma planilha carregada.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let schema = state.schema();
    let unique = table.unique_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for fc in schema.filter_columns {
                let Some(all_values) = unique.get(fc.column) else {
                    continue;
                };

                match fc.kind {
                    FilterKind::Single => {
                        single_select(ui, state, fc.column, fc.label, all_values);
                    }
                    FilterKind::Multi | FilterKind::MultiOptional => {
                        checkbox_list(ui, state, fc.column, fc.label, all_values);
                    }
                }
            }

            // ---- Score interval ----
            ui.add_space(4.0);
            ui.strong("Intervalo de desempenho (%)");
            ui.add(
                Slider::new(&mut state.filters.score_min, 0.0..=100.0)
                    .suffix("%")
                    .text("mínimo"),
            );
            ui.add(
                Slider::new(&mut state.filters.score_max, 0.0..=100.0)
                    .suffix("%")
                    .text("máximo"),
            );
            if state.filters.score_min > state.filters.score_max {
                state.filters.score_max = state.filters.score_min;
            }
        });

    // Recompute visible indices after any widget changes.
    state.refilter();
}

/// One-of-many selector for columns like ESCOLA and ETAPA.
fn single_select(
    ui: &mut Ui,
    state: &mut AppState,
    column: &str,
    label: &str,
    all_values: &std::collections::BTreeSet<CellValue>,
) {
    ui.strong(label);
    let current = state
        .filters
        .categorical
        .get(column)
        .and_then(|set| set.iter().next().cloned())
        .unwrap_or(CellValue::Empty);

    egui::ComboBox::from_id_salt(column)
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for val in all_values {
                if ui
                    .selectable_label(current == *val, val.to_string())
                    .clicked()
                {
                    state.set_single_value(column, val.clone());
                }
            }
        });
    ui.add_space(4.0);
}

/// Collapsible checkbox list with All/None shortcuts. An optional column
/// shows all boxes unchecked while the constraint is absent.
fn checkbox_list(
    ui: &mut Ui,
    state: &mut AppState,
    column: &str,
    label: &str,
    all_values: &std::collections::BTreeSet<CellValue>,
) {
    let selected = state
        .filters
        .categorical
        .get(column)
        .cloned()
        .unwrap_or_default();

    let header_text = format!("{label}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(column)
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("Todos").clicked() {
                    state.select_all(column);
                }
                if ui.small_button("Nenhum").clicked() {
                    state.select_none(column);
                }
            });

            for val in all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    state.toggle_filter_value(column, val);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("Arquivo", |ui: &mut Ui| {
            if ui.button("Abrir planilha…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Recarregar").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} linhas carregadas, {} visíveis",
                table.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Abrir planilha de desempenho")
        .add_filter("Planilhas Excel", &["xlsx", "xlsm"])
        .pick_file();

    if let Some(path) = file {
        state.set_workbook_path(path);
    }
}
