use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::{score_color, COUNT_BLUE, SCORE_GREEN};
use crate::data::aggregate::{is_below_threshold, Summary};
use crate::schema::SchemaDescriptor;

// ---------------------------------------------------------------------------
// Metric cards – the headline numbers above the charts
// ---------------------------------------------------------------------------

/// Render the four summary cards for the current selection. Callers must
/// not invoke this with an empty selection; the summary would be NaN.
pub fn metric_cards(ui: &mut Ui, schema: &SchemaDescriptor, summary: &Summary) {
    let labels = &schema.cards;
    let worst_sub = if is_below_threshold(summary.min) {
        "Necessita atenção"
    } else {
        "Desempenho regular"
    };
    ui.columns(4, |cols: &mut [Ui]| {
        card(
            &mut cols[0],
            "Média Geral",
            &format!("{:.1}%", summary.mean),
            score_color(summary.mean),
            &format!("{}: {}", labels.count_caption, summary.count),
        );
        card(
            &mut cols[1],
            labels.best,
            &format!("{:.1}%", summary.max),
            SCORE_GREEN,
            "Alto desempenho",
        );
        card(
            &mut cols[2],
            labels.worst,
            &format!("{:.1}%", summary.min),
            score_color(summary.min),
            worst_sub,
        );
        card(
            &mut cols[3],
            "Total Analisado",
            &summary.count.to_string(),
            COUNT_BLUE,
            labels.count_sub,
        );
    });
}

fn card(ui: &mut Ui, caption: &str, value: &str, accent: Color32, sub: &str) {
    egui::Frame::group(ui.style())
        .inner_margin(10.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui: &mut Ui| {
                ui.label(RichText::new(caption).strong());
                ui.label(RichText::new(value).size(22.0).strong().color(accent));
                ui.label(RichText::new(sub).small().color(Color32::GRAY));
            });
        });
}
