use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::{DataLoadError, Result};

/// Month abbreviations used for pivot columns and the seasonal axis,
/// in calendar order (index 0 = January).
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Abbreviation for a 1-based month number.
pub fn month_abbreviation(month: u32) -> &'static str {
    MONTH_ABBREVIATIONS
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("?")
}

// ---------------------------------------------------------------------------
// Variable – which measured quantity a computation is about
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    Temperature,
    Pressure,
}

impl Variable {
    pub const ALL: [Variable; 2] = [Variable::Temperature, Variable::Pressure];

    /// Read this variable off an observation.
    pub fn value(self, obs: &Observation) -> f64 {
        match self {
            Variable::Temperature => obs.temperature,
            Variable::Pressure => obs.pressure,
        }
    }

    /// Column name in the source CSV.
    pub fn column(self) -> &'static str {
        match self {
            Variable::Temperature => "TEMP",
            Variable::Pressure => "PRES",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Variable::Temperature => "°C",
            Variable::Pressure => "hPa",
        }
    }

    /// Axis label, e.g. `Temperature (°C)`.
    pub fn axis_label(self) -> String {
        format!("{self} ({})", self.unit())
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variable::Temperature => write!(f, "Temperature"),
            Variable::Pressure => write!(f, "Pressure"),
        }
    }
}

// ---------------------------------------------------------------------------
// Observation – one row of the source table
// ---------------------------------------------------------------------------

/// A single timestamped reading with calendar fields derived from the
/// timestamp. Missing readings are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    /// Air temperature (°C).
    pub temperature: f64,
    /// Atmospheric pressure (hPa).
    pub pressure: f64,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl Observation {
    pub fn new(timestamp: NaiveDateTime, temperature: f64, pressure: f64) -> Self {
        Observation {
            timestamp,
            temperature,
            pressure,
            year: timestamp.year(),
            month: timestamp.month(),
            day: timestamp.day(),
            hour: timestamp.hour(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All observations, in load order.
    pub observations: Vec<Observation>,
    /// Smallest and largest year present.
    pub year_bounds: (i32, i32),
}

impl Dataset {
    /// Build the dataset and its year bounds. An empty table is rejected
    /// since the year-range control needs at least one year.
    pub fn from_observations(observations: Vec<Observation>) -> Result<Self> {
        let mut years = observations.iter().map(|o| o.year);
        let first = years.next().ok_or(DataLoadError::Empty)?;
        let year_bounds = years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));

        Ok(Dataset {
            observations,
            year_bounds,
        })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}
