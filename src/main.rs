use eframe::egui;
use painel_desempenho::app::PainelApp;
use painel_desempenho::config::AppConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load_or_default();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Painel de Desempenho – Avaliação Diagnóstica",
        options,
        Box::new(|_cc| Ok(Box::new(PainelApp::new(config)))),
    )
}
