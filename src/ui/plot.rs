use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Rect, Ui};
use egui_plot::{Bar, BarChart, GridMark, HLine, Legend, LineStyle, Plot};

use crate::color::{ColorMap, SCORE_RED};
use crate::data::aggregate::{
    group_means, is_below_threshold, GroupMean, SortOrder, LOW_SCORE_THRESHOLD,
};
use crate::data::model::CellValue;
use crate::schema::SchemaDescriptor;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Chart identity – ties a PNG export request to the plot it came from
// ---------------------------------------------------------------------------

/// Which chart a screenshot request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    GroupedMeans,
    DescriptorMeans,
}

impl ChartKind {
    pub fn default_file_name(self, schema: &SchemaDescriptor) -> &'static str {
        match self {
            ChartKind::GroupedMeans => schema.primary_chart_png,
            ChartKind::DescriptorMeans => "desempenho_por_descritor.png",
        }
    }
}

/// Screen rectangles of the charts rendered this frame, so a screenshot
/// can be cropped to just the requested plot.
#[derive(Debug, Default, Clone)]
pub struct ChartRegions {
    grouped: Option<Rect>,
    descriptors: Option<Rect>,
}

impl ChartRegions {
    pub fn get(&self, kind: ChartKind) -> Option<Rect> {
        match kind {
            ChartKind::GroupedMeans => self.grouped,
            ChartKind::DescriptorMeans => self.descriptors,
        }
    }

    fn set(&mut self, kind: ChartKind, rect: Rect) {
        match kind {
            ChartKind::GroupedMeans => self.grouped = Some(rect),
            ChartKind::DescriptorMeans => self.descriptors = Some(rect),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart 1 – mean score per primary group, one coloured series per category
// ---------------------------------------------------------------------------

/// Bar chart of mean scores grouped by the schema's primary pair, e.g.
/// ETAPA on the x axis with one coloured series per COMPONENTE.
pub fn grouped_mean_chart(ui: &mut Ui, state: &mut AppState, regions: &mut ChartRegions) {
    let schema = state.schema();
    let (x_column, series_column) = schema.primary_grouping;
    let title = schema.primary_chart_title;
    let x_label = schema.primary_axis_label;
    let y_label = schema.score_label;

    let Some(table) = &state.table else {
        return;
    };
    let means = group_means(
        table,
        &state.visible_indices,
        x_column,
        Some(series_column),
        SortOrder::FirstAppearance,
    );
    let color_map = state.color_map.clone();

    ui.horizontal(|ui: &mut Ui| {
        ui.strong(title);
        if ui.button("Baixar gráfico (PNG)").clicked() {
            request_png(ui, ChartKind::GroupedMeans);
        }
    });

    let (slots, labels) = slot_layout(&means);
    let series = place_series(&means, &slots, color_map.as_ref(), false);
    let response = show_bar_plot(ui, "grouped_mean_plot", x_label, y_label, labels, series);
    regions.set(ChartKind::GroupedMeans, response.rect);
}

// ---------------------------------------------------------------------------
// Chart 2 – mean score per descriptor, with group-by and ordering controls
// ---------------------------------------------------------------------------

/// Bar chart of mean scores per descriptor, broken down by a selectable
/// grouping column and ordered by the chosen sort mode. Bars under the
/// attention threshold are drawn red regardless of their series colour.
pub fn descriptor_mean_chart(ui: &mut Ui, state: &mut AppState, regions: &mut ChartRegions) {
    let schema = state.schema();
    let descriptor_column = schema.descriptor_column;
    let group_by_options = schema.group_by_options;
    let y_label = schema.score_label;

    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Desempenho por Descritor");
        if ui.button("Baixar gráfico (PNG)").clicked() {
            request_png(ui, ChartKind::DescriptorMeans);
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Agrupar por:");
        for col in group_by_options {
            ui.radio_value(&mut state.group_by, col.to_string(), *col);
        }
        ui.separator();
        ui.label("Ordenar por:");
        ui.radio_value(
            &mut state.sort_order,
            SortOrder::MeanDescending,
            "Maiores médias",
        );
        ui.radio_value(
            &mut state.sort_order,
            SortOrder::MeanAscending,
            "Menores médias",
        );
    });

    let group_by = state.group_by.clone();
    let Some(table) = &state.table else {
        return;
    };

    // Descriptor order comes from the single-key aggregation; the grouped
    // bars are then placed into those slots.
    let order = group_means(
        table,
        &state.visible_indices,
        descriptor_column,
        None,
        state.sort_order,
    );
    let (slots, labels) = slot_layout(&order);

    let detail = group_means(
        table,
        &state.visible_indices,
        descriptor_column,
        Some(&group_by),
        SortOrder::FirstAppearance,
    );
    let series_colors = table
        .unique_values
        .get(&group_by)
        .map(|vals| ColorMap::new(&group_by, vals));

    let series = place_series(&detail, &slots, series_colors.as_ref(), true);
    let response = show_bar_plot(
        ui,
        "descriptor_mean_plot",
        "Descritor",
        y_label,
        labels,
        series,
    );
    regions.set(ChartKind::DescriptorMeans, response.rect);
}

// ---------------------------------------------------------------------------
// Bar layout – plain data, so the plot items are only built at render time
// ---------------------------------------------------------------------------

struct PlacedBar {
    x: f64,
    height: f64,
    width: f64,
    hover: String,
    /// Drawn red instead of the series colour.
    below: bool,
}

/// Bars of one legend series, already placed on the x axis.
struct SeriesBars {
    label: Option<String>,
    color: Option<Color32>,
    bars: Vec<PlacedBar>,
}

/// Assign an x slot to each distinct primary value, in the order the
/// values appear in `means`.
fn slot_layout(means: &[GroupMean]) -> (BTreeMap<CellValue, usize>, Vec<String>) {
    let mut slots: BTreeMap<CellValue, usize> = BTreeMap::new();
    let mut labels: Vec<String> = Vec::new();
    for g in means {
        if !slots.contains_key(&g.key.primary) {
            slots.insert(g.key.primary.clone(), labels.len());
            labels.push(g.key.primary.to_string());
        }
    }
    (slots, labels)
}

/// Split grouped means into legend series and place the sub-bars inside
/// their x slots. Single-key aggregations become one unnamed series. With
/// `flag_low` set, bars under the attention threshold are marked for a
/// red fill.
fn place_series(
    means: &[GroupMean],
    slots: &BTreeMap<CellValue, usize>,
    colors: Option<&ColorMap>,
    flag_low: bool,
) -> Vec<SeriesBars> {
    let mut series_values: Vec<&CellValue> = Vec::new();
    for g in means {
        if let Some(series) = &g.key.secondary {
            if !series_values.contains(&series) {
                series_values.push(series);
            }
        }
    }

    if series_values.is_empty() {
        let bars = means
            .iter()
            .filter_map(|g| {
                let slot = *slots.get(&g.key.primary)?;
                Some(PlacedBar {
                    x: slot as f64,
                    height: g.mean,
                    width: 0.7,
                    hover: format!("{} ({:.1}%)", g.key.primary, g.mean),
                    below: flag_low && is_below_threshold(g.mean),
                })
            })
            .collect();
        return vec![SeriesBars {
            label: None,
            color: None,
            bars,
        }];
    }

    let n = series_values.len() as f64;
    let sub_width = 0.8 / n;

    series_values
        .iter()
        .enumerate()
        .map(|(series_idx, series)| {
            let offset = (series_idx as f64 - (n - 1.0) / 2.0) * sub_width;
            let bars = means
                .iter()
                .filter(|g| g.key.secondary.as_ref() == Some(*series))
                .filter_map(|g| {
                    let slot = *slots.get(&g.key.primary)?;
                    Some(PlacedBar {
                        x: slot as f64 + offset,
                        height: g.mean,
                        width: sub_width * 0.9,
                        hover: format!("{} / {} ({:.1}%)", g.key.primary, series, g.mean),
                        below: flag_low && is_below_threshold(g.mean),
                    })
                })
                .collect();

            SeriesBars {
                label: Some(series.to_string()),
                color: colors.map(|cm| cm.color_for(series)),
                bars,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Shared rendering
// ---------------------------------------------------------------------------

fn request_png(ui: &Ui, kind: ChartKind) {
    ui.ctx()
        .send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::new(kind)));
}

/// Render the common plot scaffold: categorical x labels on whole-number
/// ticks, percent y axis, attention threshold line, panning disabled.
fn show_bar_plot(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    labels: Vec<String>,
    series: Vec<SeriesBars>,
) -> egui::Response {
    Plot::new(id.to_string())
        .legend(Legend::default())
        .height(280.0)
        .x_axis_label(x_label.to_string())
        .y_axis_label(y_label.to_string())
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            let slot = mark.value.round();
            if (mark.value - slot).abs() > 1e-6 || slot < 0.0 {
                return String::new();
            }
            labels.get(slot as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_y(0.0)
        .include_y(100.0)
        .show(ui, |plot_ui| {
            plot_ui.hline(
                HLine::new(LOW_SCORE_THRESHOLD)
                    .color(SCORE_RED)
                    .style(LineStyle::dashed_loose())
                    .name("Limite de atenção"),
            );
            for s in &series {
                let bars: Vec<Bar> = s
                    .bars
                    .iter()
                    .map(|b| {
                        let mut bar = Bar::new(b.x, b.height).width(b.width).name(b.hover.clone());
                        // A red fill set here survives the series colour,
                        // which only replaces transparent fills.
                        if b.below {
                            bar = bar.fill(SCORE_RED);
                        }
                        bar
                    })
                    .collect();
                let mut chart = BarChart::new(bars);
                if let Some(label) = &s.label {
                    chart = chart.name(label.clone());
                }
                if let Some(color) = s.color {
                    chart = chart.color(color);
                }
                plot_ui.bar_chart(chart);
            }
        })
        .response
}
