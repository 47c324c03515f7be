use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::analysis::aggregate::{Seasonal, INSUFFICIENT_SEASONAL_DATA};
use crate::data::model::Variable;
use crate::pipeline::DashboardView;
use crate::state::{AppState, Tab};
use crate::ui::{panels, plot, table};

const TITLE: &str = "Temperature and Atmospheric Pressure Trends";

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AtmosViewApp {
    pub state: AppState,
}

impl AtmosViewApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AtmosViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: year range ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new(TITLE).size(24.0));
    ui.add_space(8.0);

    let Some(view) = &state.view else {
        ui.centered_and_justified(|ui: &mut Ui| match &state.load_error {
            Some(err) => {
                let text = RichText::new(format!("Could not load data: {err}"));
                ui.label(text.color(egui::Color32::RED));
            }
            None => {
                ui.heading("Open a file to view observations  (File → Open…)");
            }
        });
        return;
    };

    panels::metrics_row(ui, &view.summary);
    ui.separator();

    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
    ui.separator();

    match state.tab {
        Tab::YearlyTrend => yearly_tab(ui, view),
        Tab::Distribution => distribution_tab(ui, view),
        Tab::Seasonal => seasonal_tab(ui, view),
    }

    ui.separator();
    table::data_section(ui, state);
}

fn yearly_tab(ui: &mut Ui, view: &DashboardView) {
    ui.strong("Yearly mean temperature and atmospheric pressure");
    plot::yearly_trend(ui, &view.yearly);
}

fn distribution_tab(ui: &mut Ui, view: &DashboardView) {
    ui.strong("Distribution per year");
    ui.columns(2, |cols| {
        for (col, variable) in cols.iter_mut().zip(Variable::ALL) {
            plot::yearly_boxes(col, variable, view.boxes(variable));
        }
    });

    ui.add_space(8.0);
    ui.strong("Histogram and density");
    ui.columns(2, |cols| {
        for (col, variable) in cols.iter_mut().zip(Variable::ALL) {
            plot::frequency(col, view.frequency(variable));
        }
    });
}

fn seasonal_tab(ui: &mut Ui, view: &DashboardView) {
    let Seasonal::Ready {
        temperature_pivot,
        pressure_pivot,
        month_of_year,
        ..
    } = &view.seasonal
    else {
        ui.label(INSUFFICIENT_SEASONAL_DATA);
        return;
    };

    ui.strong("Monthly means");
    ui.columns(2, |cols| {
        plot::heatmap(&mut cols[0], temperature_pivot);
        plot::heatmap(&mut cols[1], pressure_pivot);
    });

    ui.add_space(8.0);
    ui.strong("Seasonal pattern");
    plot::seasonal_profile(ui, month_of_year);
}
