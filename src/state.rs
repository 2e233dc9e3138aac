use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::color::ColorMap;
use crate::config::AppConfig;
use crate::data::aggregate::SortOrder;
use crate::data::filter::FilterSpec;
use crate::data::loader::load_workbook;
use crate::data::model::{CellValue, PerformanceTable};
use crate::schema::{FilterKind, SchemaDescriptor, SchemaVariant};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which central view is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTab {
    Charts,
    Table,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Persisted choices: workbook path and schema variant.
    pub config: AppConfig,

    /// Loaded table (None until a workbook loads successfully).
    pub table: Option<PerformanceTable>,

    /// Current filter constraints.
    pub filters: FilterSpec,

    /// Indices of rows passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Column the per-descriptor chart groups by.
    pub group_by: String,

    /// Ordering of the per-descriptor chart.
    pub sort_order: SortOrder,

    /// Active central view.
    pub view: ViewTab,

    /// Colours for the series column of the grouped chart.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the initial state and load the configured workbook when it
    /// already exists on disk.
    pub fn new(config: AppConfig) -> Self {
        let mut state = Self {
            group_by: config.variant.descriptor().group_by_options[0].to_string(),
            config,
            table: None,
            filters: FilterSpec::unrestricted(),
            visible_indices: Vec::new(),
            sort_order: SortOrder::MeanDescending,
            view: ViewTab::Charts,
            color_map: None,
            status_message: None,
        };
        if state.config.workbook_path.exists() {
            state.reload();
        }
        state
    }

    /// Layout of the workbook currently selected.
    pub fn schema(&self) -> &'static SchemaDescriptor {
        self.config.variant.descriptor()
    }

    /// (Re)read the configured workbook and reset filters to their defaults.
    pub fn reload(&mut self) {
        let schema = self.schema();
        match load_workbook(&self.config.workbook_path, schema) {
            Ok(table) => {
                log::info!(
                    "carregadas {} linhas de {}",
                    table.len(),
                    self.config.workbook_path.display()
                );
                self.set_table(table);
            }
            Err(err) => {
                log::error!("falha ao carregar a planilha: {err}");
                self.table = None;
                self.visible_indices.clear();
                self.color_map = None;
                self.status_message = Some(err.to_string());
            }
        }
    }

    /// Ingest a freshly loaded table, initialise filters and colours.
    pub fn set_table(&mut self, table: PerformanceTable) {
        let schema = self.schema();
        self.filters = init_filters(schema, &table);
        self.visible_indices = self.filters.matching_indices(&table);

        let series_column = schema.primary_grouping.1;
        self.color_map = table
            .unique_values
            .get(series_column)
            .map(|vals| ColorMap::new(series_column, vals));

        self.group_by = schema.group_by_options[0].to_string();
        self.sort_order = SortOrder::MeanDescending;
        self.table = Some(table);
        self.status_message = None;
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = self.filters.matching_indices(table);
        }
    }

    /// Toggle one value in a checkbox column's allowed set.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let kind = self.schema().filter_kind(column);
        let selected = self
            .filters
            .categorical
            .entry(column.to_string())
            .or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        // An optional column with nothing checked is unconstrained, not empty.
        if kind == Some(FilterKind::MultiOptional) && selected.is_empty() {
            self.filters.categorical.remove(column);
        }
        self.refilter();
    }

    /// Replace a single-select column's choice.
    pub fn set_single_value(&mut self, column: &str, value: CellValue) {
        self.filters
            .categorical
            .insert(column.to_string(), BTreeSet::from([value]));
        self.refilter();
    }

    /// Select every value of a checkbox column.
    pub fn select_all(&mut self, column: &str) {
        if let Some(table) = &self.table {
            if let Some(all_vals) = table.unique_values.get(column) {
                self.filters
                    .categorical
                    .insert(column.to_string(), all_vals.clone());
                self.refilter();
            }
        }
    }

    /// Clear a checkbox column. For an optional column this removes the
    /// constraint entirely; for a required one it becomes "match nothing".
    pub fn select_none(&mut self, column: &str) {
        match self.schema().filter_kind(column) {
            Some(FilterKind::MultiOptional) => {
                self.filters.categorical.remove(column);
            }
            _ => {
                self.filters
                    .categorical
                    .insert(column.to_string(), BTreeSet::new());
            }
        }
        self.refilter();
    }

    /// Switch schema variant, persist the choice, and reload.
    pub fn set_variant(&mut self, variant: SchemaVariant) {
        if self.config.variant == variant {
            return;
        }
        self.config.variant = variant;
        if let Err(err) = self.config.save() {
            log::warn!("não foi possível salvar a configuração: {err}");
        }
        self.reload();
    }

    /// Point the app at another workbook, persist the path, and reload.
    pub fn set_workbook_path(&mut self, path: PathBuf) {
        self.config.workbook_path = path;
        if let Err(err) = self.config.save() {
            log::warn!("não foi possível salvar a configuração: {err}");
        }
        self.reload();
    }
}

/// Default filter selections per schema: single-selects pick the first
/// value in sorted order, checkbox columns start fully selected, optional
/// columns start unconstrained.
fn init_filters(schema: &SchemaDescriptor, table: &PerformanceTable) -> FilterSpec {
    let mut spec = FilterSpec::unrestricted();
    for fc in schema.filter_columns {
        let Some(values) = table.unique_values.get(fc.column) else {
            continue;
        };
        match fc.kind {
            FilterKind::Single => {
                if let Some(first) = values.iter().next() {
                    spec.categorical
                        .insert(fc.column.to_string(), BTreeSet::from([first.clone()]));
                }
            }
            FilterKind::Multi => {
                spec.categorical
                    .insert(fc.column.to_string(), values.clone());
            }
            FilterKind::MultiOptional => {}
        }
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use std::collections::BTreeMap;

    fn state_without_disk(variant: SchemaVariant) -> AppState {
        AppState::new(AppConfig {
            workbook_path: PathBuf::from("/nonexistent/planilha.xlsx"),
            variant,
        })
    }

    fn descriptors_table() -> PerformanceTable {
        let rows = [
            ("D01", "5º ANO", "MATEMÁTICA", 45.0),
            ("D02", "5º ANO", "LÍNGUA PORTUGUESA", 80.0),
            ("D01", "9º ANO", "MATEMÁTICA", 60.0),
        ];
        let records = rows
            .iter()
            .map(|(desc, etapa, comp, score)| Record {
                score: *score,
                fields: BTreeMap::from([
                    ("DESCRITOR".to_string(), CellValue::Text(desc.to_string())),
                    ("ETAPA".to_string(), CellValue::Text(etapa.to_string())),
                    ("COMPONENTE".to_string(), CellValue::Text(comp.to_string())),
                    ("DESCRIÇÃO".to_string(), CellValue::Text("texto".into())),
                ]),
            })
            .collect();
        PerformanceTable::from_records(
            records,
            vec![
                "DESCRITOR".into(),
                "MÉDIA ACERTOS (%)".into(),
                "COMPONENTE".into(),
                "ETAPA".into(),
                "DESCRIÇÃO".into(),
            ],
            "MÉDIA ACERTOS (%)".into(),
        )
    }

    fn school_table() -> PerformanceTable {
        let rows = [
            ("EMEF NORTE", "5º ANO", 45.0),
            ("EMEF NORTE", "9º ANO", 90.0),
            ("EMEF SUL", "5º ANO", 62.0),
        ];
        let records = rows
            .iter()
            .map(|(escola, etapa, score)| Record {
                score: *score,
                fields: BTreeMap::from([
                    ("ESCOLA".to_string(), CellValue::Text(escola.to_string())),
                    ("ETAPA".to_string(), CellValue::Text(etapa.to_string())),
                    (
                        "COMP. CURRICULAR".to_string(),
                        CellValue::Text("MATEMÁTICA".into()),
                    ),
                    ("DESCRITOR".to_string(), CellValue::Text("D01".into())),
                    ("QUESTÃO".to_string(), CellValue::Integer(1)),
                ]),
            })
            .collect();
        PerformanceTable::from_records(
            records,
            vec![
                "ESCOLA".into(),
                "DESEMPENHO".into(),
                "QUESTÃO".into(),
                "DESCRITOR".into(),
                "ETAPA".into(),
                "COMP. CURRICULAR".into(),
            ],
            "DESEMPENHO".into(),
        )
    }

    #[test]
    fn defaults_follow_the_schema() {
        let mut state = state_without_disk(SchemaVariant::SchoolAssessment);
        state.set_table(school_table());

        let escola = &state.filters.categorical["ESCOLA"];
        assert_eq!(escola.len(), 1);
        assert!(escola.contains(&CellValue::Text("EMEF NORTE".into())));

        let etapa = &state.filters.categorical["ETAPA"];
        assert_eq!(etapa.len(), 1);
        assert!(etapa.contains(&CellValue::Text("5º ANO".into())));

        assert_eq!(state.filters.categorical["COMP. CURRICULAR"].len(), 1);
        assert!(!state.filters.categorical.contains_key("DESCRITOR"));

        // First school, first stage: only row 0 passes the defaults.
        assert_eq!(state.visible_indices, vec![0]);
    }

    #[test]
    fn optional_column_clears_back_to_unconstrained() {
        let mut state = state_without_disk(SchemaVariant::Descriptors2025);
        state.set_table(descriptors_table());
        assert_eq!(state.visible_indices.len(), 3);

        let d01 = CellValue::Text("D01".into());
        state.toggle_filter_value("DESCRITOR", &d01);
        assert_eq!(state.visible_indices, vec![0, 2]);

        state.toggle_filter_value("DESCRITOR", &d01);
        assert!(!state.filters.categorical.contains_key("DESCRITOR"));
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn select_none_on_required_column_empties_the_view() {
        let mut state = state_without_disk(SchemaVariant::Descriptors2025);
        state.set_table(descriptors_table());

        state.select_none("ETAPA");
        assert!(state.visible_indices.is_empty());

        state.select_all("ETAPA");
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn single_select_replaces_the_choice() {
        let mut state = state_without_disk(SchemaVariant::SchoolAssessment);
        state.set_table(school_table());

        state.set_single_value("ESCOLA", CellValue::Text("EMEF SUL".into()));
        let escola = &state.filters.categorical["ESCOLA"];
        assert_eq!(escola.len(), 1);
        assert!(escola.contains(&CellValue::Text("EMEF SUL".into())));
        assert_eq!(state.visible_indices, vec![2]);
    }
}
