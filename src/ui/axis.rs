use std::ops::RangeInclusive;

use egui_plot::{AxisHints, GridMark, HPlacement};

// ---------------------------------------------------------------------------
// Dual y-axis
// ---------------------------------------------------------------------------

/// Linear map between a secondary series and the primary axis's coordinate
/// space. egui_plot has a single coordinate system per plot, so the
/// secondary series is drawn through `to_primary` and the right-hand axis
/// labels its ticks through `to_secondary`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DualAxis {
    primary: (f64, f64),
    secondary: (f64, f64),
}

/// Padded `(min, max)` of the finite values; a unit span around a single
/// value, `(0, 1)` when there is nothing.
fn padded_bounds(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        return (0.0, 1.0);
    }
    if hi - lo < f64::EPSILON {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

impl DualAxis {
    pub fn fit(
        primary: impl IntoIterator<Item = f64>,
        secondary: impl IntoIterator<Item = f64>,
    ) -> Self {
        DualAxis {
            primary: padded_bounds(primary),
            secondary: padded_bounds(secondary),
        }
    }

    fn scale(&self) -> f64 {
        (self.primary.1 - self.primary.0) / (self.secondary.1 - self.secondary.0)
    }

    pub fn to_primary(&self, secondary: f64) -> f64 {
        self.primary.0 + (secondary - self.secondary.0) * self.scale()
    }

    pub fn to_secondary(&self, primary: f64) -> f64 {
        self.secondary.0 + (primary - self.primary.0) / self.scale()
    }

    /// Primary-axis bounds to include so both series fill the plot.
    pub fn primary_bounds(&self) -> (f64, f64) {
        self.primary
    }

    /// Left axis for the primary series and right axis for the secondary one.
    pub fn axes(self, primary_label: String, secondary_label: String) -> Vec<AxisHints<'static>> {
        vec![
            AxisHints::new_y().label(primary_label),
            AxisHints::new_y()
                .label(secondary_label)
                .placement(HPlacement::Right)
                .formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                    format!("{:.1}", self.to_secondary(mark.value))
                }),
        ]
    }
}

// ---------------------------------------------------------------------------
// Category axes
// ---------------------------------------------------------------------------

/// Label for a grid mark sitting on an integer category position, blank
/// for marks in between.
pub fn category_label(labels: &[(f64, String)], value: f64) -> String {
    labels
        .iter()
        .find(|(pos, _)| (pos - value).abs() < 1e-6)
        .map(|(_, label)| label.clone())
        .unwrap_or_default()
}

/// Axis formatter over fixed category positions.
pub fn category_formatter(
    labels: Vec<(f64, String)>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| category_label(&labels, mark.value)
}

/// Year ticks without thousands separators or fractions.
pub fn year_formatter(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
    if (mark.value - mark.value.round()).abs() < 1e-6 {
        format!("{:.0}", mark.value)
    } else {
        String::new()
    }
}
