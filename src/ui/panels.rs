use eframe::egui::{self, Color32, RichText, Ui};

use crate::analysis::summary::{format_metric, Summary};
use crate::data::filter::YearRange;
use crate::data::model::Variable;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – year range filter
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter data");
    ui.separator();

    let (Some(dataset), Some(range)) = (&state.dataset, state.range()) else {
        ui.label("No dataset loaded.");
        return;
    };
    let (min_year, max_year) = dataset.year_bounds;

    ui.strong("Year range");
    let mut start = range.start();
    let mut end = range.end();
    let start_changed = ui
        .add(egui::Slider::new(&mut start, min_year..=max_year).text("from"))
        .changed();
    let end_changed = ui
        .add(egui::Slider::new(&mut end, min_year..=max_year).text("to"))
        .changed();

    // Dragging one handle past the other pushes it along.
    if start_changed && start > end {
        end = start;
    }
    if end_changed && end < start {
        start = end;
    }

    ui.add_space(4.0);
    if ui.small_button("All years").clicked() {
        start = min_year;
        end = max_year;
    }

    state.set_range(YearRange::new(start, end));
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(view)) = (&state.dataset, &state.view) {
            ui.label(format!(
                "{} observations loaded, {} in {}–{}",
                ds.len(),
                view.indices.len(),
                view.range.start(),
                view.range.end()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if state.load_error.is_some() {
                Color32::RED
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(22.0).strong());
    });
}

/// Four metric tiles and the correlation readout.
pub fn metrics_row(ui: &mut Ui, summary: &Summary) {
    ui.columns(4, |cols| {
        metric(
            &mut cols[0],
            "Mean temperature",
            format_metric(summary.mean_temperature, Variable::Temperature),
        );
        metric(
            &mut cols[1],
            "Mean pressure",
            format_metric(summary.mean_pressure, Variable::Pressure),
        );
        metric(
            &mut cols[2],
            "Highest temperature",
            format_metric(summary.max_temperature, Variable::Temperature),
        );
        metric(
            &mut cols[3],
            "Lowest temperature",
            format_metric(summary.min_temperature, Variable::Temperature),
        );
    });

    ui.add_space(8.0);
    ui.heading("Correlation between temperature and pressure");
    ui.label(format!("Correlation coefficient: {}", summary.correlation));
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open observation data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} observations from {} (years {:?})",
                    dataset.len(),
                    path.display(),
                    dataset.year_bounds
                );
                let full = YearRange::full(&dataset);
                state.set_dataset(dataset, full);
            }
            Err(e) => {
                log::error!("Failed to load file: {e}");
                state.set_load_error(e.to_string());
            }
        }
    }
}
