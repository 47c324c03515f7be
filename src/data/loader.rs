use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Observation};
use crate::error::{DataLoadError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an observation dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `datetime`, `TEMP` and `PRES` columns
/// * `.json`    – `[{ "datetime": "...", "TEMP": 1.5, "PRES": 1020.1, ... }, ...]`
/// * `.parquet` – the same three columns, any string/timestamp/numeric types
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataLoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

const DATETIME_NAMES: [&str; 3] = ["datetime", "timestamp", "date"];
const TEMPERATURE_NAMES: [&str; 2] = ["temp", "temperature"];
const PRESSURE_NAMES: [&str; 2] = ["pres", "pressure"];

/// Positions of the three required columns within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    datetime: usize,
    temperature: usize,
    pressure: usize,
}

impl ColumnIndex {
    /// Locate the required columns, case-insensitively. Any other columns,
    /// including pre-computed `year`/`month`/..., are ignored.
    fn resolve<'a>(headers: impl IntoIterator<Item = &'a str> + Clone) -> Result<Self> {
        let find = |aliases: &[&str], column: &'static str| {
            headers
                .clone()
                .into_iter()
                .position(|h| aliases.iter().any(|a| h.trim().eq_ignore_ascii_case(a)))
                .ok_or(DataLoadError::MissingColumn { column })
        };

        Ok(ColumnIndex {
            datetime: find(&DATETIME_NAMES, "datetime")?,
            temperature: find(&TEMPERATURE_NAMES, "TEMP")?,
            pressure: find(&PRESSURE_NAMES, "PRES")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Cell parsing
// ---------------------------------------------------------------------------

// `%.f` also takes fractional seconds, e.g. arrow's cast of a microsecond
// timestamp or our own export of one.
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp in any of the layouts station exports use.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    // Offsets are dropped; calendar fields follow the station's wall clock.
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse a reading; blank and `NA`/`NaN` cells become `NaN`.
fn parse_reading(s: &str, row: usize, column: &'static str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(|_| DataLoadError::InvalidNumber {
        row,
        column,
        value: s.to_string(),
    })
}

fn parse_row(datetime: &str, temp: &str, pres: &str, row: usize) -> Result<Observation> {
    let timestamp = parse_timestamp(datetime).ok_or_else(|| DataLoadError::InvalidTimestamp {
        row,
        value: datetime.to_string(),
    })?;
    let temperature = parse_reading(temp, row, "TEMP")?;
    let pressure = parse_reading(pres, row, "PRES")?;
    Ok(Observation::new(timestamp, temperature, pressure))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    load_csv_reader(file)
}

/// Parse CSV from any reader. Row numbers in errors are 1-based data rows.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let cols = ColumnIndex::resolve(headers.iter())?;

    let mut observations = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        observations.push(parse_row(
            cell(cols.datetime),
            cell(cols.temperature),
            cell(cols.pressure),
            row,
        )?);
    }

    Dataset::from_observations(observations)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "datetime": "2013-03-01 00:00:00", "TEMP": -0.7, "PRES": 1023.0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path)?;
    load_json_str(&text)
}

fn load_json_str(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text)?;

    let records = root.as_array().ok_or_else(|| DataLoadError::InvalidRecord {
        row: 0,
        message: "expected top-level JSON array".to_string(),
    })?;

    let mut observations = Vec::with_capacity(records.len());

    for (i, rec) in records.iter().enumerate() {
        let row = i + 1;
        let obj = rec.as_object().ok_or_else(|| DataLoadError::InvalidRecord {
            row,
            message: "not a JSON object".to_string(),
        })?;
        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let cols = ColumnIndex::resolve(keys.iter().copied())?;

        let datetime = json_cell(obj.get(keys[cols.datetime]));
        let temp = json_cell(obj.get(keys[cols.temperature]));
        let pres = json_cell(obj.get(keys[cols.pressure]));

        observations.push(parse_row(&datetime, &temp, &pres, row)?);
    }

    Dataset::from_observations(observations)
}

/// Render a JSON cell as the text the CSV parser would have seen.
fn json_cell(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing observations.
///
/// The timestamp column may be Utf8, Date32/64 or any Timestamp type; the
/// reading columns may be any numeric type. Both are normalised through
/// arrow's cast kernel before parsing.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut observations = Vec::new();
    let mut row = 0usize;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let cols = ColumnIndex::resolve(schema.fields().iter().map(|f| f.name().as_str()))?;

        let datetimes = cast(batch.column(cols.datetime), &DataType::Utf8)?;
        let datetimes = datetimes.as_string::<i32>();
        let temps = to_f64(batch.column(cols.temperature))?;
        let pres = to_f64(batch.column(cols.pressure))?;

        for i in 0..batch.num_rows() {
            row += 1;
            if datetimes.is_null(i) {
                return Err(DataLoadError::InvalidTimestamp {
                    row,
                    value: "<null>".to_string(),
                });
            }
            let raw = datetimes.value(i);
            let timestamp = parse_timestamp(raw).ok_or_else(|| DataLoadError::InvalidTimestamp {
                row,
                value: raw.to_string(),
            })?;
            observations.push(Observation::new(timestamp, temps[i], pres[i]));
        }
    }

    Dataset::from_observations(observations)
}

// -- Parquet / Arrow helpers --

/// Cast a numeric column to `f64`, mapping nulls to `NaN`.
fn to_f64(col: &Arc<dyn Array>) -> Result<Vec<f64>> {
    let casted = cast(col, &DataType::Float64)?;
    let arr = casted.as_primitive::<Float64Type>();
    Ok(arr.iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
No,year,month,day,hour,TEMP,PRES,DEWP,station,datetime
1,2013,3,1,0,-0.7,1023.0,-18.8,Aotizhongxin,2013-03-01 00:00:00
2,2013,3,1,1,-1.1,1023.2,-18.2,Aotizhongxin,2013-03-01 01:00:00
3,2013,3,1,2,,1023.5,-18.2,Aotizhongxin,2013-03-01 02:00:00
";

    #[test]
    fn loads_csv_and_derives_fields() {
        let ds = load_csv_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.year_bounds, (2013, 2013));

        let second = &ds.observations[1];
        assert_eq!(second.temperature, -1.1);
        assert_eq!(second.pressure, 1023.2);
        assert_eq!((second.month, second.day, second.hour), (3, 1, 1));

        assert!(ds.observations[2].temperature.is_nan());
    }

    #[test]
    fn headers_are_case_insensitive_with_aliases() {
        let csv = "Timestamp,Temperature,pressure\n2020-01-05T06:30:00,3.5,1011\n";
        let ds = load_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(ds.observations[0].hour, 6);
        assert_eq!(ds.observations[0].pressure, 1011.0);
    }

    #[test]
    fn missing_column_is_reported() {
        let csv = "datetime,TEMP\n2020-01-01 00:00:00,1.0\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn { column: "PRES" }));
    }

    #[test]
    fn bad_timestamp_names_row() {
        let csv = "datetime,TEMP,PRES\n2020-01-01 00:00:00,1,1000\nyesterday,2,1001\n";
        match load_csv_reader(csv.as_bytes()).unwrap_err() {
            DataLoadError::InvalidTimestamp { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn bad_number_names_column() {
        let csv = "datetime,TEMP,PRES\n2020-01-01 00:00:00,warm,1000\n";
        let err = load_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::InvalidNumber { row: 1, column: "TEMP", .. }
        ));
    }

    #[test]
    fn header_only_csv_is_empty() {
        let err = load_csv_reader("datetime,TEMP,PRES\n".as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty));
    }

    #[test]
    fn timestamp_layouts() {
        let expected = NaiveDate::from_ymd_opt(2016, 2, 29)
            .unwrap()
            .and_hms_opt(23, 0, 0)
            .unwrap();
        for s in [
            "2016-02-29 23:00:00",
            "2016-02-29T23:00:00",
            "2016-02-29 23:00",
            "2016-02-29T23:00:00.000",
            "2016-02-29T23:00:00+00:00",
        ] {
            assert_eq!(parse_timestamp(s), Some(expected), "{s}");
        }
        assert_eq!(
            parse_timestamp("2016-02-29").map(|t| t.date()),
            Some(expected.date())
        );
        assert_eq!(parse_timestamp("29/02/2016"), None);
        assert_eq!(
            parse_timestamp("2016-02-29 23:00:00.250"),
            NaiveDate::from_ymd_opt(2016, 2, 29)
                .unwrap()
                .and_hms_milli_opt(23, 0, 0, 250)
        );
    }

    #[test]
    fn offset_timestamps_keep_local_calendar_fields() {
        let ts = parse_timestamp("2016-12-31T23:00:00-05:00").unwrap();
        let obs = Observation::new(ts, 1.0, 1000.0);
        assert_eq!((obs.year, obs.month, obs.day, obs.hour), (2016, 12, 31, 23));
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"datetime": "2014-06-01 12:00:00", "TEMP": 31.2, "PRES": 998.4},
            {"datetime": "2015-01-01 00:00:00", "TEMP": null, "PRES": 1030}
        ]"#;
        let ds = load_json_str(json).unwrap();
        assert_eq!(ds.year_bounds, (2014, 2015));
        assert!(ds.observations[1].temperature.is_nan());
        assert_eq!(ds.observations[1].pressure, 1030.0);
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = load_file(Path::new("readings.xlsx")).unwrap_err();
        assert!(matches!(err, DataLoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }
}
