use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::export::EXPORT_FILE_NAME;
use crate::data::model::Observation;
use crate::state::AppState;

const HEADERS: [&str; 7] = ["datetime", "TEMP", "PRES", "year", "month", "day", "hour"];

fn reading(v: f64) -> String {
    if v.is_nan() {
        "–".to_string()
    } else {
        format!("{v:.1}")
    }
}

/// Virtualised table of the filtered subset.
pub fn data_table(ui: &mut Ui, rows: &[&Observation]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .max_scroll_height(320.0)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(150.0))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let obs = rows[row.index()];
                let cells = [
                    obs.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                    reading(obs.temperature),
                    reading(obs.pressure),
                    obs.year.to_string(),
                    obs.month.to_string(),
                    obs.day.to_string(),
                    obs.hour.to_string(),
                ];
                for text in cells {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}

/// "View data" section: the table plus a CSV download button.
pub fn data_section(ui: &mut Ui, state: &mut AppState) {
    let header = egui::CollapsingHeader::new("View data")
        .id_salt("view_data")
        .open(Some(state.show_table))
        .show(ui, |ui: &mut Ui| {
            if ui.button("Download data as CSV").clicked() {
                save_csv_dialog(state);
            }
            ui.add_space(4.0);
            data_table(ui, &state.subset());
        });

    if header.header_response.clicked() {
        state.show_table = !state.show_table;
    }
}

fn save_csv_dialog(state: &mut AppState) {
    let Some(path) = rfd::FileDialog::new()
        .set_title("Save filtered data")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file()
    else {
        return;
    };

    match state.export_csv(&path) {
        Ok(n) => {
            state.status_message = Some(format!("Saved {n} rows to {}", path.display()));
        }
        Err(e) => {
            log::error!("CSV export failed: {e:#}");
            state.status_message = Some(format!("Export failed: {e:#}"));
        }
    }
}
