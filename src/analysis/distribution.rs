use std::collections::BTreeMap;
use std::f64::consts::PI;

use super::stats;
use crate::data::model::{Observation, Variable};

/// Upper bound on histogram bins; keeps the bar chart readable when the
/// Freedman–Diaconis width gets tiny on large samples.
const MAX_BINS: usize = 200;

/// Grid resolution of the density curve.
pub const DENSITY_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// Box plot statistics
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    /// Values beyond 1.5·IQR from the box.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` when there is no finite value.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let sorted = stats::sorted(stats::finite(values.iter().copied()));
        let q1 = stats::quantile_sorted(&sorted, 0.25)?;
        let median = stats::quantile_sorted(&sorted, 0.5)?;
        let q3 = stats::quantile_sorted(&sorted, 0.75)?;

        let reach = 1.5 * (q3 - q1);
        let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

        let lower_whisker = sorted.iter().copied().find(|v| *v >= lo_fence).unwrap_or(q1);
        let upper_whisker = sorted.iter().rev().copied().find(|v| *v <= hi_fence).unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxStats {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }
}

/// One box per year present in the subset, ascending.
pub fn box_stats_by_year(subset: &[&Observation], variable: Variable) -> Vec<(i32, BoxStats)> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for obs in subset {
        by_year.entry(obs.year).or_default().push(variable.value(obs));
    }
    by_year
        .into_iter()
        .filter_map(|(year, values)| Some((year, BoxStats::compute(&values)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bins. `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Pick the bin width: the smaller of the Freedman–Diaconis
    /// and Sturges widths, Sturges alone when the IQR is zero.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let sorted = stats::sorted(stats::finite(values.iter().copied()));
        let (mut lo, mut hi) = (*sorted.first()?, *sorted.last()?);
        let n = sorted.len() as f64;

        let bins = if lo == hi {
            lo -= 0.5;
            hi += 0.5;
            1
        } else {
            let span = hi - lo;
            let sturges = span / (n.log2() + 1.0);
            let iqr = stats::quantile_sorted(&sorted, 0.75)? - stats::quantile_sorted(&sorted, 0.25)?;
            let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
            let width = if fd > 0.0 { fd.min(sturges) } else { sturges };
            ((span / width).ceil() as usize).clamp(1, MAX_BINS)
        };

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        let mut counts = vec![0usize; bins];
        for v in &sorted {
            // last edge is inclusive
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Histogram { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// `(bin centre, count)` pairs for a bar chart.
    pub fn bars(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| ((w[0] + w[1]) / 2.0, c))
    }
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Gaussian KDE evaluated on an even grid spanning the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub bandwidth: f64,
    pub xs: Vec<f64>,
    /// Probability density at each `xs`.
    pub ys: Vec<f64>,
}

impl Density {
    /// Scott's rule bandwidth: `std · n^(-1/5)`. `None` below two finite
    /// values or for a constant sample.
    pub fn estimate(values: &[f64], points: usize) -> Option<Self> {
        let sample = stats::finite(values.iter().copied());
        let std = stats::sample_std(&sample)?;
        if std == 0.0 || points < 2 {
            return None;
        }
        let n = sample.len() as f64;
        let bandwidth = std * n.powf(-0.2);

        let lo = stats::min(&sample)?;
        let hi = stats::max(&sample)?;
        let step = (hi - lo) / (points - 1) as f64;
        let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());

        let xs: Vec<f64> = (0..points).map(|i| lo + step * i as f64).collect();
        let ys = xs
            .iter()
            .map(|&x| {
                let sum: f64 = sample
                    .iter()
                    .map(|&v| {
                        let z = (x - v) / bandwidth;
                        (-0.5 * z * z).exp()
                    })
                    .sum();
                sum * norm
            })
            .collect();

        Some(Density { bandwidth, xs, ys })
    }

    /// Curve in histogram units (`count per bin`).
    pub fn scaled_to(&self, histogram: &Histogram) -> Vec<[f64; 2]> {
        let k = histogram.total() as f64 * histogram.bin_width();
        self.xs
            .iter()
            .zip(&self.ys)
            .map(|(&x, &y)| [x, y * k])
            .collect()
    }
}

/// Histogram plus optional density overlay for one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Frequency {
    pub variable: Variable,
    pub histogram: Option<Histogram>,
    pub density: Option<Density>,
}

impl Frequency {
    pub fn compute(subset: &[&Observation], variable: Variable) -> Self {
        let values: Vec<f64> = subset.iter().map(|o| variable.value(o)).collect();
        Frequency {
            variable,
            histogram: Histogram::compute(&values),
            density: Density::estimate(&values, DENSITY_POINTS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn box_stats_with_outlier() {
        let b = BoxStats::compute(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(b.q1, 2.25);
        assert_eq!(b.median, 3.5);
        assert_eq!(b.q3, 4.75);
        assert_eq!(b.lower_whisker, 1.0);
        assert_eq!(b.upper_whisker, 5.0);
        assert_eq!(b.outliers, vec![100.0]);
    }

    #[test]
    fn box_stats_ignore_missing() {
        assert!(BoxStats::compute(&[f64::NAN]).is_none());
        let b = BoxStats::compute(&[f64::NAN, 7.0]).unwrap();
        assert_eq!((b.lower_whisker, b.median, b.upper_whisker), (7.0, 7.0, 7.0));
    }

    #[test]
    fn boxes_per_year() {
        let ts = |y| {
            NaiveDate::from_ymd_opt(y, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        let rows = [
            Observation::new(ts(2016), 1.0, 1000.0),
            Observation::new(ts(2014), 2.0, 1000.0),
            Observation::new(ts(2016), 3.0, 1000.0),
        ];
        let subset: Vec<&Observation> = rows.iter().collect();
        let boxes = box_stats_by_year(&subset, Variable::Temperature);
        assert_eq!(boxes.iter().map(|b| b.0).collect::<Vec<_>>(), vec![2014, 2016]);
        assert_eq!(boxes[1].1.median, 2.0);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let h = Histogram::compute(&values).unwrap();
        assert_eq!(h.total(), 100);
        assert_eq!(h.edges.len(), h.counts.len() + 1);
        assert_eq!(*h.edges.first().unwrap(), 0.0);
        assert!((*h.edges.last().unwrap() - 99.0).abs() < 1e-9);
        // Sturges: 99 / (log2(100) + 1) ≈ 12.9 wide, FD ≈ 21.3 wide
        assert_eq!(h.counts.len(), 8);
    }

    #[test]
    fn constant_sample_gets_one_unit_bin() {
        let h = Histogram::compute(&[3.0, 3.0, 3.0]).unwrap();
        assert_eq!(h.edges, vec![2.5, 3.5]);
        assert_eq!(h.counts, vec![3]);
        assert!(Histogram::compute(&[]).is_none());
    }

    #[test]
    fn density_integrates_to_about_one() {
        let values: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 / 10.0).collect();
        let d = Density::estimate(&values, 400).unwrap();
        let step = d.xs[1] - d.xs[0];
        let area: f64 = d.ys.iter().sum::<f64>() * step;
        // grid only spans the data range, so some mass falls outside
        assert!(area > 0.85 && area < 1.01, "area = {area}");
    }

    #[test]
    fn density_needs_spread() {
        assert!(Density::estimate(&[1.0], 10).is_none());
        assert!(Density::estimate(&[2.0, 2.0, 2.0], 10).is_none());
    }
}
