use super::model::{Dataset, Observation};

// ---------------------------------------------------------------------------
// Year range: the only filter predicate
// ---------------------------------------------------------------------------

/// Inclusive year range. `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    start: i32,
    end: i32,
}

impl YearRange {
    /// Build a range from two bounds in either order.
    pub fn new(a: i32, b: i32) -> Self {
        YearRange {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// The full span of a dataset.
    pub fn full(dataset: &Dataset) -> Self {
        let (lo, hi) = dataset.year_bounds;
        YearRange::new(lo, hi)
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    /// Number of calendar years covered.
    pub fn span(&self) -> usize {
        self.end.abs_diff(self.start) as usize + 1
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }

    /// Clamp both ends into `bounds` (inclusive). Out-of-range requests
    /// are pulled back inside rather than rejected.
    pub fn clamp_to(self, bounds: (i32, i32)) -> Self {
        let (lo, hi) = (bounds.0.min(bounds.1), bounds.0.max(bounds.1));
        YearRange::new(self.start.clamp(lo, hi), self.end.clamp(lo, hi))
    }
}

/// Return indices of observations whose year falls within `range`, in load
/// order.
pub fn filtered_indices(dataset: &Dataset, range: YearRange) -> Vec<usize> {
    dataset
        .observations
        .iter()
        .enumerate()
        .filter(|(_, obs)| range.contains(obs.year))
        .map(|(i, _)| i)
        .collect()
}

/// Borrow the observations at `indices`.
pub fn select<'a>(dataset: &'a Dataset, indices: &[usize]) -> Vec<&'a Observation> {
    indices.iter().map(|&i| &dataset.observations[i]).collect()
}

/// Convenience: the filtered observations themselves.
pub fn filter_by_years(dataset: &Dataset, range: YearRange) -> Vec<&Observation> {
    select(dataset, &filtered_indices(dataset, range))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dataset(years: &[i32]) -> Dataset {
        let obs = years
            .iter()
            .map(|&y| {
                let ts = NaiveDate::from_ymd_opt(y, 6, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap();
                Observation::new(ts, y as f64, 1000.0)
            })
            .collect();
        Dataset::from_observations(obs).unwrap()
    }

    #[test]
    fn bounds_are_ordered() {
        let r = YearRange::new(2016, 2013);
        assert_eq!((r.start(), r.end()), (2013, 2016));
        assert_eq!(r.span(), 4);
    }

    #[test]
    fn span_of_extreme_range_does_not_overflow() {
        let r = YearRange::new(i32::MIN, i32::MAX);
        assert_eq!(r.span(), u32::MAX as usize + 1);
        assert!(r.contains(0));
    }

    #[test]
    fn clamping_pulls_range_inside_bounds() {
        let r = YearRange::new(1990, 2050).clamp_to((2013, 2017));
        assert_eq!((r.start(), r.end()), (2013, 2017));

        let r = YearRange::new(2020, 2030).clamp_to((2013, 2017));
        assert_eq!((r.start(), r.end()), (2017, 2017));
    }

    #[test]
    fn filter_is_inclusive_on_both_ends() {
        let ds = dataset(&[2013, 2014, 2015, 2016, 2017, 2015]);
        let subset = filter_by_years(&ds, YearRange::new(2014, 2015));
        let years: Vec<i32> = subset.iter().map(|o| o.year).collect();
        assert_eq!(years, vec![2014, 2015, 2015]);
    }

    #[test]
    fn filter_can_be_empty() {
        let ds = dataset(&[2013, 2017]);
        assert!(filter_by_years(&ds, YearRange::new(2014, 2016)).is_empty());
    }

    #[test]
    fn indices_point_at_matching_rows() {
        let ds = dataset(&[2013, 2016, 2014, 2016]);
        assert_eq!(filtered_indices(&ds, YearRange::new(2016, 2016)), vec![1, 3]);
    }

    #[test]
    fn full_range_keeps_everything() {
        let ds = dataset(&[2013, 2015, 2017]);
        assert_eq!(filter_by_years(&ds, YearRange::full(&ds)).len(), ds.len());
    }
}
