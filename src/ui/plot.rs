use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Corner, Legend, Line, MarkerShape, Plot,
    PlotPoint, PlotUi, Points, Polygon, Text,
};

use super::axis::{category_formatter, year_formatter, DualAxis};
use crate::analysis::aggregate::{MonthOfYear, MonthlyPivot, YearlyStats};
use crate::analysis::distribution::{BoxStats, Frequency};
use crate::color::{contrasting_text, Colormap, PRESSURE_COLOR, TEMPERATURE_COLOR};
use crate::data::model::{month_abbreviation, Variable};

const CHART_HEIGHT: f32 = 320.0;

fn series_color(variable: Variable) -> Color32 {
    match variable {
        Variable::Temperature => TEMPERATURE_COLOR,
        Variable::Pressure => PRESSURE_COLOR,
    }
}

fn colormap(variable: Variable) -> Colormap {
    match variable {
        Variable::Temperature => Colormap::Thermal,
        Variable::Pressure => Colormap::Blues,
    }
}

fn base_plot(id: &str) -> Plot {
    Plot::new(id)
        .legend(Legend::default().position(Corner::LeftTop))
        .height(CHART_HEIGHT)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
}

/// Shaded band between `lower` and `upper`, one quad per consecutive pair
/// of x positions (egui_plot only fills convex polygons correctly).
fn draw_band(plot_ui: &mut PlotUi, points: &[(f64, f64, f64)], name: &str, color: Color32) {
    for w in points.windows(2) {
        let (x0, lo0, hi0) = w[0];
        let (x1, lo1, hi1) = w[1];
        plot_ui.polygon(
            Polygon::new(vec![[x0, lo0], [x1, lo1], [x1, hi1], [x0, hi0]])
                .name(name)
                .fill_color(color.gamma_multiply(0.2))
                .stroke(Stroke::NONE),
        );
    }
}

// ---------------------------------------------------------------------------
// Yearly trend
// ---------------------------------------------------------------------------

/// Means and band edges of one variable; both axes are fitted to these so
/// no band is clipped.
fn band_extent(yearly: &[YearlyStats], variable: Variable) -> impl Iterator<Item = f64> + '_ {
    yearly
        .iter()
        .flat_map(move |r| {
            let stats = r.get(variable);
            let (lo, hi) = stats.std_band().unzip();
            [stats.mean, lo, hi]
        })
        .flatten()
}

/// Mean temperature and pressure per year with ±1 std bands, pressure on
/// a right-hand axis.
pub fn yearly_trend(ui: &mut Ui, yearly: &[YearlyStats]) {
    let axis = DualAxis::fit(
        band_extent(yearly, Variable::Temperature),
        band_extent(yearly, Variable::Pressure),
    );
    let (y_lo, y_hi) = axis.primary_bounds();

    base_plot("yearly_trend")
        .x_axis_label("Year")
        .x_axis_formatter(year_formatter)
        .custom_y_axes(axis.axes(
            Variable::Temperature.axis_label(),
            Variable::Pressure.axis_label(),
        ))
        .include_y(y_lo)
        .include_y(y_hi)
        .show(ui, |plot_ui| {
            for variable in Variable::ALL {
                let color = series_color(variable);
                let map = |v: f64| match variable {
                    Variable::Temperature => v,
                    Variable::Pressure => axis.to_primary(v),
                };

                let bands: Vec<(f64, f64, f64)> = yearly
                    .iter()
                    .filter_map(|r| {
                        let (lo, hi) = r.get(variable).std_band()?;
                        Some((r.year as f64, map(lo), map(hi)))
                    })
                    .collect();
                draw_band(plot_ui, &bands, &format!("{variable} ±1 std"), color);

                let means: Vec<[f64; 2]> = yearly
                    .iter()
                    .filter_map(|r| Some([r.year as f64, map(r.get(variable).mean?)]))
                    .collect();
                let shape = match variable {
                    Variable::Temperature => MarkerShape::Circle,
                    Variable::Pressure => MarkerShape::Square,
                };
                plot_ui.line(
                    Line::new(means.clone())
                        .name(variable.to_string())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(means)
                        .name(variable.to_string())
                        .color(color)
                        .shape(shape)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Distribution
// ---------------------------------------------------------------------------

/// One box per year.
pub fn yearly_boxes(ui: &mut Ui, variable: Variable, boxes: &[(i32, BoxStats)]) {
    let colors = colormap(variable).palette(boxes.len());

    base_plot(&format!("boxes_{}", variable.column()))
        .x_axis_label("Year")
        .y_axis_label(variable.axis_label())
        .x_axis_formatter(year_formatter)
        .show(ui, |plot_ui| {
            let elems: Vec<BoxElem> = boxes
                .iter()
                .zip(&colors)
                .map(|((year, b), &color)| {
                    BoxElem::new(
                        *year as f64,
                        BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                    )
                    .name(year)
                    .fill(color.gamma_multiply(0.6))
                    .stroke(Stroke::new(1.0, Color32::DARK_GRAY))
                    .box_width(0.6)
                    .whisker_width(0.3)
                })
                .collect();
            plot_ui.box_plot(BoxPlot::new(elems).name(variable.to_string()));

            let outliers: Vec<[f64; 2]> = boxes
                .iter()
                .flat_map(|(year, b)| b.outliers.iter().map(move |&v| [*year as f64, v]))
                .collect();
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(outliers)
                        .name("Outliers")
                        .color(Color32::DARK_GRAY)
                        .shape(MarkerShape::Diamond)
                        .radius(2.0),
                );
            }
        });
}

/// Histogram with the density curve overlaid in count units.
pub fn frequency(ui: &mut Ui, freq: &Frequency) {
    let variable = freq.variable;
    let color = series_color(variable);

    base_plot(&format!("hist_{}", variable.column()))
        .x_axis_label(variable.axis_label())
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            let Some(hist) = &freq.histogram else {
                return;
            };
            let width = hist.bin_width();
            let bars: Vec<Bar> = hist
                .bars()
                .map(|(centre, count)| Bar::new(centre, count as f64).width(width))
                .collect();
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(variable.to_string())
                    .color(color.gamma_multiply(0.5)),
            );

            if let Some(density) = &freq.density {
                plot_ui.line(
                    Line::new(density.scaled_to(hist))
                        .name("Density")
                        .color(color)
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Seasonal
// ---------------------------------------------------------------------------

/// Year × month grid, each cell coloured by value and annotated with it.
pub fn heatmap(ui: &mut Ui, pivot: &MonthlyPivot) {
    let cmap = colormap(pivot.variable);
    let Some(range) = pivot.value_range() else {
        ui.label("No values to show.");
        return;
    };

    // First year on top.
    let row_y = |row: usize| -(row as f64);
    let x_labels: Vec<(f64, String)> = pivot
        .column_labels()
        .into_iter()
        .enumerate()
        .map(|(col, label)| (col as f64, label.to_string()))
        .collect();
    let y_labels: Vec<(f64, String)> = pivot
        .years
        .iter()
        .enumerate()
        .map(|(row, year)| (row_y(row), year.to_string()))
        .collect();

    Plot::new(format!("heatmap_{}", pivot.variable.column()))
        .height(CHART_HEIGHT)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .x_axis_label("Month")
        .y_axis_label("Year")
        .x_axis_formatter(category_formatter(x_labels))
        .y_axis_formatter(category_formatter(y_labels))
        .show(ui, |plot_ui| {
            for (row, cells) in pivot.cells.iter().enumerate() {
                let y = row_y(row);
                for (col, cell) in cells.iter().enumerate() {
                    let Some(value) = cell else {
                        continue;
                    };
                    let x = col as f64;
                    let fill = cmap.scaled(*value, range);
                    plot_ui.polygon(
                        Polygon::new(vec![
                            [x - 0.5, y - 0.5],
                            [x + 0.5, y - 0.5],
                            [x + 0.5, y + 0.5],
                            [x - 0.5, y + 0.5],
                        ])
                        .fill_color(fill)
                        .stroke(Stroke::new(0.5, Color32::WHITE)),
                    );
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(format!("{value:.1}"))
                            .size(11.0)
                            .color(contrasting_text(fill)),
                    ));
                }
            }
        });
}

/// Average per calendar month, pressure on a right-hand axis.
pub fn seasonal_profile(ui: &mut Ui, profile: &[MonthOfYear]) {
    let axis = DualAxis::fit(
        profile.iter().filter_map(|m| m.temperature),
        profile.iter().filter_map(|m| m.pressure),
    );
    let (y_lo, y_hi) = axis.primary_bounds();
    let x_labels: Vec<(f64, String)> = (1..=12)
        .map(|m| (m as f64, month_abbreviation(m).to_string()))
        .collect();

    base_plot("seasonal_profile")
        .x_axis_label("Month")
        .x_axis_formatter(category_formatter(x_labels))
        .custom_y_axes(axis.axes(
            Variable::Temperature.axis_label(),
            Variable::Pressure.axis_label(),
        ))
        .include_y(y_lo)
        .include_y(y_hi)
        .show(ui, |plot_ui| {
            for variable in Variable::ALL {
                let points: Vec<[f64; 2]> = profile
                    .iter()
                    .filter_map(|m| {
                        let v = m.get(variable)?;
                        let y = match variable {
                            Variable::Temperature => v,
                            Variable::Pressure => axis.to_primary(v),
                        };
                        Some([m.month as f64, y])
                    })
                    .collect();
                let color = series_color(variable);
                plot_ui.line(
                    Line::new(points.clone())
                        .name(variable.to_string())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(points)
                        .name(variable.to_string())
                        .color(color)
                        .shape(match variable {
                            Variable::Temperature => MarkerShape::Circle,
                            Variable::Pressure => MarkerShape::Square,
                        })
                        .radius(4.0),
                );
            }
        });
}
