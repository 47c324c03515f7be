use anyhow::Result;
use atmos_view::app::AtmosViewApp;
use atmos_view::config::Args;
use atmos_view::data::source::load_source;
use atmos_view::state::AppState;
use clap::Parser;
use eframe::egui;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // A failed load is fatal for the session but still opens the window,
    // which shows the error instead of the dashboard.
    let mut state = AppState::default();
    let source = args.data_source();
    match load_source(&source, &args.cache) {
        Ok(dataset) => {
            log::info!(
                "Loaded {} observations from {source} (years {:?})",
                dataset.len(),
                dataset.year_bounds
            );
            let initial = args.initial_range(dataset.year_bounds);
            state.set_dataset(dataset, initial);
        }
        Err(e) => {
            log::error!("Failed to load {source}: {e}");
            state.set_load_error(e.to_string());
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Atmos View – Temperature & Pressure",
        options,
        Box::new(|_cc| Ok(Box::new(AtmosViewApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))
}
