use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::data::export;
use crate::data::filter::YearRange;
use crate::data::model::{Dataset, Observation};
use crate::pipeline::{recompute, DashboardView};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart group shown in the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    YearlyTrend,
    Distribution,
    Seasonal,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::YearlyTrend, Tab::Distribution, Tab::Seasonal];

    pub fn title(self) -> &'static str {
        match self {
            Tab::YearlyTrend => "Yearly trend",
            Tab::Distribution => "Distribution",
            Tab::Seasonal => "Seasonal analysis",
        }
    }
}

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None when loading failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Everything derived from the current year range.
    pub view: Option<DashboardView>,

    /// Active chart group.
    pub tab: Tab,

    /// Whether the raw data table is expanded.
    pub show_table: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set when the last load failed; the central panel shows it instead of charts.
    pub load_error: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded dataset and run the pipeline once.
    pub fn set_dataset(&mut self, dataset: Dataset, initial: YearRange) {
        let dataset = Arc::new(dataset);
        let view = recompute(&dataset, initial);
        if view.range != initial {
            warn!(
                "Requested years {}..={} clamped to {}..={}",
                initial.start(),
                initial.end(),
                view.range.start(),
                view.range.end()
            );
        }

        self.view = Some(view);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.load_error = None;
    }

    /// Record a failed load. Any previous dataset is dropped.
    pub fn set_load_error(&mut self, message: String) {
        self.dataset = None;
        self.view = None;
        self.status_message = Some(format!("Error: {message}"));
        self.load_error = Some(message);
    }

    /// Current year range, if a dataset is loaded.
    pub fn range(&self) -> Option<YearRange> {
        self.view.as_ref().map(|v| v.range)
    }

    /// Apply a new year range and recompute every derived view.
    pub fn set_range(&mut self, range: YearRange) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        if self.range() == Some(range.clamp_to(dataset.year_bounds)) {
            return;
        }
        self.view = Some(recompute(dataset, range));
    }

    /// Observations in the current view.
    pub fn subset(&self) -> Vec<&Observation> {
        match (&self.dataset, &self.view) {
            (Some(ds), Some(view)) => view.subset(ds),
            _ => Vec::new(),
        }
    }

    /// Write the filtered subset as CSV to `path`.
    pub fn export_csv(&self, path: &Path) -> Result<usize> {
        let subset = self.subset();
        let bytes = export::to_csv_bytes(&subset).context("encoding CSV")?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Exported {} rows to {}", subset.len(), path.display());
        Ok(subset.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset() -> Dataset {
        let rows = (2013..=2017)
            .map(|y| {
                let ts = NaiveDate::from_ymd_opt(y, 3, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap();
                Observation::new(ts, y as f64 - 2000.0, 1010.0)
            })
            .collect();
        Dataset::from_observations(rows).unwrap()
    }

    #[test]
    fn range_change_recomputes_view() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), YearRange::new(2013, 2017));
        assert_eq!(state.subset().len(), 5);

        state.set_range(YearRange::new(2015, 2016));
        assert_eq!(state.range(), Some(YearRange::new(2015, 2016)));
        let view = state.view.as_ref().unwrap();
        assert_eq!(view.summary.mean_temperature, Some(15.5));
    }

    #[test]
    fn load_error_clears_dataset() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), YearRange::new(2013, 2017));
        state.set_load_error("boom".to_string());
        assert!(state.dataset.is_none());
        assert!(state.subset().is_empty());
        assert_eq!(state.status_message.as_deref(), Some("Error: boom"));

        // no dataset: range changes are ignored
        state.set_range(YearRange::new(2014, 2014));
        assert!(state.view.is_none());
    }

    #[test]
    fn export_writes_current_subset() {
        let mut state = AppState::default();
        state.set_dataset(dataset(), YearRange::new(2016, 2017));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(export::EXPORT_FILE_NAME);

        assert_eq!(state.export_csv(&path).unwrap(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
    }
}
