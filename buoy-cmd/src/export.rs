//! Table output for filtered observations and the station list.

use buoy_ndbc::{observation::ObservationRecord, station::StationDescriptor};
use clap::ValueEnum;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Write rows as CSV with a header line, or as a pretty JSON array.
pub fn write_rows<T: Serialize, W: Write>(
    rows: &[T],
    format: OutputFormat,
    writer: W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(writer);
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writeln!(writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}

/// Write the records to `output`, or to stdout when no path is given.
pub fn export_records(
    records: &[ObservationRecord],
    format: OutputFormat,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file = File::create(path)?;
            write_rows(records, format, BufWriter::new(file))
        }
        None => write_rows(records, format, io::stdout().lock()),
    }
}

pub fn export_stations(stations: &[StationDescriptor], format: OutputFormat) -> anyhow::Result<()> {
    write_rows(stations, format, io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;
    use buoy_ndbc::observation::Observation;
    use chrono::NaiveDate;

    fn records() -> Vec<ObservationRecord> {
        let observation = Observation {
            date: NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            direction: 153,
            dominant_period: None,
            wave_height_ft: Some(3.9372),
        };
        vec![ObservationRecord::new(&observation, "SSE", "Montauk Point")]
    }

    #[test]
    fn test_csv_has_header_and_blank_absent_fields() {
        let mut buffer = Vec::new();
        write_rows(&records(), OutputFormat::Csv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,year,month,direction,dominant_period,wave_height_ft,cardinal,station_name"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2019-01-01,2019,1,153,,3.9372,SSE,Montauk Point"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_json_is_an_array_of_records() {
        let mut buffer = Vec::new();
        write_rows(&records(), OutputFormat::Json, &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["date"], "2019-01-01");
        assert_eq!(rows[0]["cardinal"], "SSE");
        assert!(rows[0]["dominant_period"].is_null());
    }

    #[test]
    fn test_station_rows() {
        let stations = vec![StationDescriptor {
            station_id: "44017".to_string(),
            name: "MONTAUK POINT, NY".to_string(),
            latitude: 40.693,
            longitude: -72.049,
        }];
        let mut buffer = Vec::new();
        write_rows(&stations, OutputFormat::Csv, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(
            text,
            "station_id,name,latitude,longitude\n44017,\"MONTAUK POINT, NY\",40.693,-72.049\n"
        );
    }
}
