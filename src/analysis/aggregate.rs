use std::collections::BTreeMap;

use super::stats;
use crate::data::model::{month_abbreviation, Observation, Variable};

// ---------------------------------------------------------------------------
// Yearly statistics
// ---------------------------------------------------------------------------

/// mean / min / max / sample std of one variable within a group.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VariableStats {
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub std: Option<f64>,
}

impl VariableStats {
    fn compute(rows: &[&Observation], variable: Variable) -> Self {
        let values = stats::finite(rows.iter().map(|o| variable.value(o)));
        VariableStats {
            mean: stats::mean(&values),
            min: stats::min(&values),
            max: stats::max(&values),
            std: stats::sample_std(&values),
        }
    }

    /// `(mean - std, mean + std)`; `None` unless both are known.
    pub fn std_band(&self) -> Option<(f64, f64)> {
        let (m, s) = (self.mean?, self.std?);
        Some((m - s, m + s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearlyStats {
    pub year: i32,
    pub count: usize,
    pub temperature: VariableStats,
    pub pressure: VariableStats,
}

impl YearlyStats {
    pub fn get(&self, variable: Variable) -> &VariableStats {
        match variable {
            Variable::Temperature => &self.temperature,
            Variable::Pressure => &self.pressure,
        }
    }
}

fn group_by<'a, K: Ord>(
    subset: &[&'a Observation],
    key: impl Fn(&Observation) -> K,
) -> BTreeMap<K, Vec<&'a Observation>> {
    let mut groups: BTreeMap<K, Vec<&'a Observation>> = BTreeMap::new();
    for &obs in subset {
        groups.entry(key(obs)).or_default().push(obs);
    }
    groups
}

/// One row per distinct year, ascending.
pub fn yearly(subset: &[&Observation]) -> Vec<YearlyStats> {
    group_by(subset, |o| o.year)
        .into_iter()
        .map(|(year, rows)| YearlyStats {
            year,
            count: rows.len(),
            temperature: VariableStats::compute(&rows, Variable::Temperature),
            pressure: VariableStats::compute(&rows, Variable::Pressure),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Monthly means and the year × month pivot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyMean {
    pub year: i32,
    pub month: u32,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
}

impl MonthlyMean {
    pub fn get(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::Temperature => self.temperature,
            Variable::Pressure => self.pressure,
        }
    }
}

fn means(rows: &[&Observation]) -> (Option<f64>, Option<f64>) {
    let temps = stats::finite(rows.iter().map(|o| o.temperature));
    let pres = stats::finite(rows.iter().map(|o| o.pressure));
    (stats::mean(&temps), stats::mean(&pres))
}

/// Mean temperature / pressure per (year, month), ordered.
pub fn monthly(subset: &[&Observation]) -> Vec<MonthlyMean> {
    group_by(subset, |o| (o.year, o.month))
        .into_iter()
        .map(|((year, month), rows)| {
            let (temperature, pressure) = means(&rows);
            MonthlyMean {
                year,
                month,
                temperature,
                pressure,
            }
        })
        .collect()
}

/// Years as rows, calendar months as columns. Rows and columns without a
/// single value are dropped, so there are at most 12 columns.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyPivot {
    pub variable: Variable,
    pub years: Vec<i32>,
    /// 1-based month numbers, ascending.
    pub months: Vec<u32>,
    /// `cells[row][col]`, indexed like `years` × `months`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl MonthlyPivot {
    pub fn from_monthly(monthly: &[MonthlyMean], variable: Variable) -> Self {
        let mut grid: BTreeMap<i32, BTreeMap<u32, f64>> = BTreeMap::new();
        for m in monthly {
            if let Some(v) = m.get(variable) {
                grid.entry(m.year).or_default().insert(m.month, v);
            }
        }

        let mut months: Vec<u32> = grid.values().flat_map(|row| row.keys().copied()).collect();
        months.sort_unstable();
        months.dedup();

        let years: Vec<i32> = grid.keys().copied().collect();
        let cells = grid
            .values()
            .map(|row| months.iter().map(|m| row.get(m).copied()).collect())
            .collect();

        MonthlyPivot {
            variable,
            years,
            months,
            cells,
        }
    }

    /// Column headers, e.g. `["Jan", "Feb", ...]`.
    pub fn column_labels(&self) -> Vec<&'static str> {
        self.months.iter().map(|&m| month_abbreviation(m)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Smallest and largest populated cell, for colour scaling.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let values: Vec<f64> = self.cells.iter().flatten().flatten().copied().collect();
        Some((stats::min(&values)?, stats::max(&values)?))
    }
}

// ---------------------------------------------------------------------------
// Month-of-year profile
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthOfYear {
    pub month: u32,
    pub temperature: Option<f64>,
    pub pressure: Option<f64>,
}

impl MonthOfYear {
    pub fn label(&self) -> &'static str {
        month_abbreviation(self.month)
    }

    pub fn get(&self, variable: Variable) -> Option<f64> {
        match variable {
            Variable::Temperature => self.temperature,
            Variable::Pressure => self.pressure,
        }
    }
}

/// Mean per calendar month regardless of year, ordered Jan…Des.
pub fn month_of_year(subset: &[&Observation]) -> Vec<MonthOfYear> {
    group_by(subset, |o| o.month)
        .into_iter()
        .map(|(month, rows)| {
            let (temperature, pressure) = means(&rows);
            MonthOfYear {
                month,
                temperature,
                pressure,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Seasonal analysis bundle
// ---------------------------------------------------------------------------

/// Everything the seasonal tab shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Seasonal {
    /// Not enough rows to aggregate; the UI shows a notice instead.
    Insufficient,
    Ready {
        monthly: Vec<MonthlyMean>,
        temperature_pivot: MonthlyPivot,
        pressure_pivot: MonthlyPivot,
        month_of_year: Vec<MonthOfYear>,
    },
}

pub const INSUFFICIENT_SEASONAL_DATA: &str =
    "Not enough data for seasonal analysis. Please select a wider year range.";

pub fn seasonal(subset: &[&Observation]) -> Seasonal {
    let monthly = monthly(subset);
    if monthly.is_empty() {
        return Seasonal::Insufficient;
    }
    Seasonal::Ready {
        temperature_pivot: MonthlyPivot::from_monthly(&monthly, Variable::Temperature),
        pressure_pivot: MonthlyPivot::from_monthly(&monthly, Variable::Pressure),
        month_of_year: month_of_year(subset),
        monthly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn obs(y: i32, m: u32, temp: f64, pres: f64) -> Observation {
        let ts = NaiveDate::from_ymd_opt(y, m, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Observation::new(ts, temp, pres)
    }

    fn rows() -> Vec<Observation> {
        vec![
            obs(2014, 1, 0.0, 1030.0),
            obs(2014, 1, 2.0, 1026.0),
            obs(2014, 7, 30.0, 1000.0),
            obs(2013, 3, 8.0, 1015.0),
            obs(2015, 7, 28.0, f64::NAN),
        ]
    }

    #[test]
    fn yearly_rows_are_sorted_and_distinct() {
        let data = rows();
        let subset: Vec<&Observation> = data.iter().collect();
        let years = yearly(&subset);

        assert_eq!(
            years.iter().map(|y| y.year).collect::<Vec<_>>(),
            vec![2013, 2014, 2015]
        );
        let y2014 = &years[1];
        assert_eq!(y2014.count, 3);
        assert_eq!(y2014.temperature.mean, Some(32.0 / 3.0));
        assert_eq!(y2014.temperature.min, Some(0.0));
        assert_eq!(y2014.temperature.max, Some(30.0));
        assert!(y2014.temperature.std.is_some());

        // single row: no std, all-NaN pressure: no stats
        assert_eq!(years[0].temperature.std, None);
        assert_eq!(years[2].pressure, VariableStats::default());
    }

    #[test]
    fn std_band_straddles_mean() {
        let s = VariableStats {
            mean: Some(10.0),
            min: Some(8.0),
            max: Some(12.0),
            std: Some(1.5),
        };
        assert_eq!(s.std_band(), Some((8.5, 11.5)));
        assert_eq!(VariableStats::default().std_band(), None);
    }

    #[test]
    fn monthly_means_group_by_year_and_month() {
        let data = rows();
        let subset: Vec<&Observation> = data.iter().collect();
        let m = monthly(&subset);

        assert_eq!(m.len(), 4);
        assert_eq!(
            m[1],
            MonthlyMean {
                year: 2014,
                month: 1,
                temperature: Some(1.0),
                pressure: Some(1028.0),
            }
        );
    }

    #[test]
    fn pivot_drops_empty_rows_and_columns() {
        let data = rows();
        let subset: Vec<&Observation> = data.iter().collect();
        let pres = MonthlyPivot::from_monthly(&monthly(&subset), Variable::Pressure);

        // 2015 only has a NaN pressure reading
        assert_eq!(pres.years, vec![2013, 2014]);
        assert_eq!(pres.column_labels(), vec!["Jan", "Mar", "Jul"]);
        assert_eq!(
            pres.cells,
            vec![
                vec![None, Some(1015.0), None],
                vec![Some(1028.0), None, Some(1000.0)],
            ]
        );
        assert_eq!(pres.value_range(), Some((1000.0, 1028.0)));
    }

    #[test]
    fn month_of_year_is_calendar_ordered() {
        let data = rows();
        let subset: Vec<&Observation> = data.iter().collect();
        let profile = month_of_year(&subset);

        let labels: Vec<&str> = profile.iter().map(|m| m.label()).collect();
        assert_eq!(labels, vec!["Jan", "Mar", "Jul"]);
        assert_eq!(profile[2].temperature, Some(29.0));
        assert_eq!(profile[2].pressure, Some(1000.0));
    }

    #[test]
    fn empty_subset_skips_seasonal_analysis() {
        assert_eq!(seasonal(&[]), Seasonal::Insufficient);
        assert!(yearly(&[]).is_empty());
    }
}
