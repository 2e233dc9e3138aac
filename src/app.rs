use std::sync::Arc;

use eframe::egui::{self, ColorImage, RichText, Ui, UserData};

use crate::config::AppConfig;
use crate::data::aggregate::summarize;
use crate::state::{AppState, ViewTab};
use crate::ui::plot::{ChartKind, ChartRegions};
use crate::ui::{cards, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PainelApp {
    pub state: AppState,
    chart_regions: ChartRegions,
}

impl PainelApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            state: AppState::new(config),
            chart_regions: ChartRegions::default(),
        }
    }

    /// Central panel: cards, tab selector, and the active view. Everything
    /// below the cards is skipped while the filters match nothing.
    fn central(&mut self, ui: &mut Ui) {
        let summary = match &self.state.table {
            Some(table) => summarize(table, &self.state.visible_indices),
            None => {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Abra uma planilha para começar  (Arquivo → Abrir planilha…)");
                });
                return;
            }
        };
        if !summary.has_rows() {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(
                    RichText::new("Nenhum dado encontrado com os filtros selecionados.")
                        .size(16.0),
                );
            });
            return;
        }

        cards::metric_cards(ui, self.state.schema(), &summary);
        ui.add_space(8.0);

        ui.horizontal(|ui: &mut Ui| {
            if ui
                .selectable_label(self.state.view == ViewTab::Charts, "Visualizações Gráficas")
                .clicked()
            {
                self.state.view = ViewTab::Charts;
            }
            if ui
                .selectable_label(self.state.view == ViewTab::Table, "Dados Detalhados")
                .clicked()
            {
                self.state.view = ViewTab::Table;
            }
        });
        ui.separator();

        match self.state.view {
            ViewTab::Charts => {
                plot::grouped_mean_chart(ui, &mut self.state, &mut self.chart_regions);
                ui.add_space(12.0);
                plot::descriptor_mean_chart(ui, &mut self.state, &mut self.chart_regions);
            }
            ViewTab::Table => {
                table::data_table(ui, &mut self.state);
            }
        }

        ui.add_space(8.0);
        ui.separator();
        ui.small(format!(
            "Dashboard carregado a partir de: {}",
            self.state.config.workbook_path.display()
        ));
        ui.small("Utilize os filtros no menu lateral para explorar os dados");
    }

    /// Consume screenshot events, crop each to the chart that asked for
    /// it, and write the PNG wherever the user chooses.
    fn handle_screenshots(&mut self, ctx: &egui::Context) {
        let shots: Vec<(UserData, Arc<ColorImage>)> = ctx.input(|i| {
            i.events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Screenshot {
                        user_data, image, ..
                    } => Some((user_data.clone(), image.clone())),
                    _ => None,
                })
                .collect()
        });

        for (user_data, image) in shots {
            let Some(kind) = user_data
                .data
                .as_ref()
                .and_then(|data| data.downcast_ref::<ChartKind>())
                .copied()
            else {
                continue;
            };
            let Some(rect) = self.chart_regions.get(kind) else {
                continue;
            };

            let cropped = image.region(&rect, Some(ctx.pixels_per_point()));
            self.save_chart_png(kind, &cropped);
        }
    }

    fn save_chart_png(&mut self, kind: ChartKind, image: &ColorImage) {
        let file = rfd::FileDialog::new()
            .set_title("Salvar gráfico")
            .set_file_name(kind.default_file_name(self.state.schema()))
            .add_filter("Imagem PNG", &["png"])
            .save_file();

        let Some(path) = file else {
            return;
        };

        let [width, height] = image.size;
        match image::save_buffer(
            &path,
            image.as_raw(),
            width as u32,
            height as u32,
            image::ExtendedColorType::Rgba8,
        ) {
            Ok(()) => log::info!("gráfico salvo em {}", path.display()),
            Err(err) => {
                log::error!("falha ao salvar PNG: {err}");
                self.state.status_message = Some(format!("Erro ao salvar imagem: {err}"));
            }
        }
    }
}

impl eframe::App for PainelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_screenshots(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: source and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: cards, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            self.central(ui);
        });
    }
}
