use std::path::PathBuf;

use clap::Parser;

use crate::data::filter::YearRange;
use crate::data::source::{DataSource, DEFAULT_SOURCE_URL};

#[derive(Parser, Debug, Clone)]
#[command(name = "atmos-view")]
#[command(about = "Temperature and atmospheric pressure trend dashboard")]
#[command(version)]
pub struct Args {
    /// CSV/JSON/Parquet file or http(s) URL to load at startup
    #[arg(short, long, env = "ATMOS_SOURCE", default_value = DEFAULT_SOURCE_URL)]
    pub source: String,

    /// Where a downloaded source is stored, and the fallback when the
    /// download fails
    #[arg(long, env = "ATMOS_CACHE", default_value = "data.csv")]
    pub cache: PathBuf,

    /// First year of the initial range (clamped to the data)
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year of the initial range (clamped to the data)
    #[arg(long)]
    pub to: Option<i32>,
}

impl Args {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    /// Initial range requested on the command line, with missing ends
    /// taken from the dataset bounds.
    pub fn initial_range(&self, bounds: (i32, i32)) -> YearRange {
        YearRange::new(self.from.unwrap_or(bounds.0), self.to.unwrap_or(bounds.1))
    }
}
