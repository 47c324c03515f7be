use log::debug;

use crate::analysis::aggregate::{self, Seasonal, YearlyStats};
use crate::analysis::distribution::{box_stats_by_year, BoxStats, Frequency};
use crate::analysis::summary::Summary;
use crate::data::filter::{filtered_indices, select, YearRange};
use crate::data::model::{Dataset, Observation, Variable};

/// Everything the dashboard renders for one year range. Rebuilt from
/// scratch on every range change and owned by the UI until the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// The range actually applied, after clamping.
    pub range: YearRange,
    /// Indices into `Dataset::observations` of the filtered subset.
    pub indices: Vec<usize>,
    pub summary: Summary,
    pub yearly: Vec<YearlyStats>,
    pub temperature_boxes: Vec<(i32, BoxStats)>,
    pub pressure_boxes: Vec<(i32, BoxStats)>,
    pub temperature_frequency: Frequency,
    pub pressure_frequency: Frequency,
    pub seasonal: Seasonal,
}

impl DashboardView {
    /// Borrow the filtered observations back out of the dataset.
    pub fn subset<'a>(&self, dataset: &'a Dataset) -> Vec<&'a Observation> {
        select(dataset, &self.indices)
    }

    pub fn boxes(&self, variable: Variable) -> &[(i32, BoxStats)] {
        match variable {
            Variable::Temperature => &self.temperature_boxes,
            Variable::Pressure => &self.pressure_boxes,
        }
    }

    pub fn frequency(&self, variable: Variable) -> &Frequency {
        match variable {
            Variable::Temperature => &self.temperature_frequency,
            Variable::Pressure => &self.pressure_frequency,
        }
    }
}

/// filter → metrics → aggregates → distributions, start to finish.
pub fn recompute(dataset: &Dataset, requested: YearRange) -> DashboardView {
    let range = requested.clamp_to(dataset.year_bounds);
    let indices = filtered_indices(dataset, range);
    let subset = select(dataset, &indices);

    debug!(
        "Recomputing for {}..={}: {} of {} observations",
        range.start(),
        range.end(),
        subset.len(),
        dataset.len()
    );

    DashboardView {
        range,
        summary: Summary::compute(&subset),
        yearly: aggregate::yearly(&subset),
        temperature_boxes: box_stats_by_year(&subset, Variable::Temperature),
        pressure_boxes: box_stats_by_year(&subset, Variable::Pressure),
        temperature_frequency: Frequency::compute(&subset, Variable::Temperature),
        pressure_frequency: Frequency::compute(&subset, Variable::Pressure),
        seasonal: aggregate::seasonal(&subset),
        indices,
    }
}
