use std::io::Write;

use serde::Serialize;

use super::model::Observation;
use crate::error::Result;

/// File name offered by the save dialog.
pub const EXPORT_FILE_NAME: &str = "temperature_pressure_data.csv";

/// `%.f` writes nothing for whole seconds.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One exported row. Missing readings are written as empty cells.
#[derive(Serialize)]
struct ExportRow {
    datetime: String,
    #[serde(rename = "TEMP")]
    temperature: Option<f64>,
    #[serde(rename = "PRES")]
    pressure: Option<f64>,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
}

impl From<&Observation> for ExportRow {
    fn from(obs: &Observation) -> Self {
        let finite = |v: f64| if v.is_nan() { None } else { Some(v) };
        ExportRow {
            datetime: obs.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            temperature: finite(obs.temperature),
            pressure: finite(obs.pressure),
            year: obs.year,
            month: obs.month,
            day: obs.day,
            hour: obs.hour,
        }
    }
}

/// Write the subset as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, subset: &[&Observation]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if subset.is_empty() {
        wtr.write_record(["datetime", "TEMP", "PRES", "year", "month", "day", "hour"])?;
    }
    for obs in subset {
        wtr.serialize(ExportRow::from(*obs))?;
    }
    wtr.flush()?;
    Ok(())
}

/// CSV encoding of the subset, as offered for download.
pub fn to_csv_bytes(subset: &[&Observation]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    write_csv(&mut buf, subset)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn header_and_blank_missing_values() {
        let ts = NaiveDate::from_ymd_opt(2013, 3, 1)
            .unwrap()
            .and_hms_opt(5, 0, 0)
            .unwrap();
        let a = Observation::new(ts, -0.5, 1021.25);
        let b = Observation::new(ts, f64::NAN, 1022.0);

        let bytes = to_csv_bytes(&[&a, &b]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "datetime,TEMP,PRES,year,month,day,hour");
        assert_eq!(lines[1], "2013-03-01 05:00:00,-0.5,1021.25,2013,3,1,5");
        assert_eq!(lines[2], "2013-03-01 05:00:00,,1022.0,2013,3,1,5");
    }

    #[test]
    fn empty_subset_still_has_header() {
        let text = String::from_utf8(to_csv_bytes(&[]).unwrap()).unwrap();
        assert_eq!(text.trim_end(), "datetime,TEMP,PRES,year,month,day,hour");
    }

    #[test]
    fn sub_second_timestamps_keep_their_fraction() {
        let ts = NaiveDate::from_ymd_opt(2016, 2, 29)
            .unwrap()
            .and_hms_milli_opt(23, 0, 0, 500)
            .unwrap();
        let obs = Observation::new(ts, 1.0, 1000.0);

        let text = String::from_utf8(to_csv_bytes(&[&obs]).unwrap()).unwrap();
        assert_eq!(
            text.lines().nth(1),
            Some("2016-02-29 23:00:00.500,1.0,1000.0,2016,2,29,23")
        );
    }
}
