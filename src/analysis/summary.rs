use std::fmt;

use super::stats;
use crate::data::model::{Observation, Variable};

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Why a correlation coefficient could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndefinedReason {
    /// Fewer than two observations with both readings present.
    TooFewSamples { n: usize },
    /// One of the variables is constant over the subset.
    ZeroVariance,
}

/// Pearson correlation between temperature and pressure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Defined(f64),
    Undefined(UndefinedReason),
}

impl Correlation {
    pub fn value(&self) -> Option<f64> {
        match self {
            Correlation::Defined(r) => Some(*r),
            Correlation::Undefined(_) => None,
        }
    }
}

impl fmt::Display for Correlation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Correlation::Defined(r) => write!(f, "{r:.4}"),
            Correlation::Undefined(UndefinedReason::TooFewSamples { n }) => {
                write!(f, "undefined ({n} complete observation(s), need at least 2)")
            }
            Correlation::Undefined(UndefinedReason::ZeroVariance) => {
                write!(f, "undefined (no variation in temperature or pressure)")
            }
        }
    }
}

/// Pearson's r over pairwise-complete samples.
pub fn pearson(pairs: impl IntoIterator<Item = (f64, f64)>) -> Correlation {
    let pairs: Vec<(f64, f64)> = pairs
        .into_iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .collect();
    let n = pairs.len();
    if n < 2 {
        return Correlation::Undefined(UndefinedReason::TooFewSamples { n });
    }

    let mx = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let my = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mx, y - my);
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return Correlation::Undefined(UndefinedReason::ZeroVariance);
    }
    Correlation::Defined((sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the filtered subset. `None` means "no data".
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub observations: usize,
    pub mean_temperature: Option<f64>,
    pub mean_pressure: Option<f64>,
    pub max_temperature: Option<f64>,
    pub min_temperature: Option<f64>,
    pub correlation: Correlation,
}

impl Summary {
    pub fn compute(subset: &[&Observation]) -> Self {
        let temps = stats::finite(subset.iter().map(|o| o.temperature));
        let pres = stats::finite(subset.iter().map(|o| o.pressure));

        Summary {
            observations: subset.len(),
            mean_temperature: stats::mean(&temps),
            mean_pressure: stats::mean(&pres),
            max_temperature: stats::max(&temps),
            min_temperature: stats::min(&temps),
            correlation: pearson(subset.iter().map(|o| (o.temperature, o.pressure))),
        }
    }
}

/// Render a metric with two decimals and its unit, or `n/a`.
pub fn format_metric(value: Option<f64>, variable: Variable) -> String {
    match value {
        Some(v) => format!("{v:.2} {}", variable.unit()),
        None => "n/a".to_string(),
    }
}
