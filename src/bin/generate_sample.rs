use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a deterministic synthetic hourly temperature / pressure dataset.
#[derive(Parser)]
#[command(name = "generate-sample")]
struct Cli {
    /// CSV output path
    #[arg(long, default_value = "sample_data.csv")]
    csv: PathBuf,

    /// Optional Parquet copy of the same rows
    #[arg(long)]
    parquet: Option<PathBuf>,

    /// First year of data (starts on 1 March)
    #[arg(long, default_value_t = 2013)]
    start_year: i32,

    /// Number of years to generate
    #[arg(long, default_value_t = 4)]
    years: i32,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    datetime: String,
    temp: Option<f64>,
    pres: Option<f64>,
}

/// Continental climate: cold winters, hot summers, warm afternoons, and
/// pressure moving against temperature.
fn reading(ts: NaiveDateTime, year_offset: f64, rng: &mut SimpleRng) -> (f64, f64) {
    let season = 2.0 * PI * (ts.ordinal0() as f64 - 15.0) / 365.25;
    let diurnal = 2.0 * PI * (ts.hour() as f64 - 15.0) / 24.0;

    let anomaly = rng.gauss(0.0, 2.5);
    let temp = 13.5 - 15.0 * season.cos() + 4.0 * diurnal.cos() + 0.15 * year_offset + anomaly;
    let pres = 1010.0 + 11.0 * season.cos() - 0.3 * anomaly + rng.gauss(0.0, 2.0);
    ((temp * 10.0).round() / 10.0, (pres * 10.0).round() / 10.0)
}

fn generate(cli: &Cli) -> Result<Vec<Row>> {
    let mut rng = SimpleRng::new(cli.seed);
    let start = NaiveDate::from_ymd_opt(cli.start_year, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid start year")?;
    let end = NaiveDate::from_ymd_opt(cli.start_year + cli.years, 3, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("invalid year count")?;

    let mut rows = Vec::new();
    let mut ts = start;
    while ts < end {
        let (temp, pres) = reading(ts, f64::from(ts.year() - cli.start_year), &mut rng);
        // ~0.5% sensor dropouts per variable
        let temp = (rng.next_f64() >= 0.005).then_some(temp);
        let pres = (rng.next_f64() >= 0.005).then_some(pres);
        rows.push(Row {
            datetime: ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            temp,
            pres,
        });
        ts += Duration::hours(1);
    }
    Ok(rows)
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).context("creating CSV file")?;
    wtr.write_record(["datetime", "TEMP", "PRES"])?;
    let cell = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    for row in rows {
        wtr.write_record([row.datetime.clone(), cell(row.temp), cell(row.pres)])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("datetime", DataType::Utf8, false),
        Field::new("TEMP", DataType::Float64, true),
        Field::new("PRES", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.datetime.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.temp).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.pres).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let rows = generate(&cli)?;

    write_csv(&rows, &cli.csv)?;
    println!("Wrote {} hourly observations to {}", rows.len(), cli.csv.display());

    if let Some(path) = &cli.parquet {
        write_parquet(&rows, path)?;
        println!("Wrote Parquet copy to {}", path.display());
    }
    Ok(())
}
