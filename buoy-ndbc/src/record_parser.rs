//! Fixed-width parsing of NDBC standard meteorological lines.
//!
//! Historical stdmet files are column aligned but the layout drifted over the
//! years (two digit years, then four digit years, then an added minute
//! column). Rather than splitting on whitespace, every field is cut out of the
//! line by character offsets looked up in an [`OffsetTable`] keyed by format
//! era, so supporting another layout means adding a table entry.

use crate::error::{BuoyError, Result};
use crate::year_fetcher::RawYearBlob;
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Mean wave direction value meaning "no direction recorded".
pub const DIRECTION_SENTINEL: u16 = 999;

/// Largest direction accepted as a real bearing.
pub const MAX_DIRECTION: u16 = 359;

/// Character ranges of the fields used from one stdmet line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOffsets {
    pub year: Range<usize>,
    pub month: Range<usize>,
    pub day: Range<usize>,
    /// WVHT, significant wave height in metres
    pub wave_height: Range<usize>,
    /// DPD, dominant wave period in seconds
    pub dominant_period: Range<usize>,
    /// MWD, mean wave direction in degrees true
    pub direction: Range<usize>,
}

impl FieldOffsets {
    /// Layout used since 2005: `YYYY MM DD hh mm WDIR WSPD GST WVHT DPD APD MWD ...`
    pub fn with_minute_column() -> Self {
        FieldOffsets {
            year: 0..4,
            month: 5..7,
            day: 8..10,
            wave_height: 31..36,
            dominant_period: 37..42,
            direction: 49..52,
        }
    }

    /// Layout used 1999-2004: `YYYY MM DD hh WD WSPD GST WVHT DPD APD MWD ...`
    pub fn without_minute_column() -> Self {
        FieldOffsets {
            year: 0..4,
            month: 5..7,
            day: 8..10,
            wave_height: 28..33,
            dominant_period: 34..39,
            direction: 46..49,
        }
    }

    fn ranges(&self) -> [(&'static str, &Range<usize>); 6] {
        [
            ("year", &self.year),
            ("month", &self.month),
            ("day", &self.day),
            ("wave_height", &self.wave_height),
            ("dominant_period", &self.dominant_period),
            ("direction", &self.direction),
        ]
    }
}

/// A span of archive years sharing one column layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatEra {
    pub name: String,
    pub first_year: i32,
    /// `None` means the era is still current
    pub last_year: Option<i32>,
    pub fields: FieldOffsets,
}

impl FormatEra {
    pub fn covers(&self, year: i32) -> bool {
        year >= self.first_year && self.last_year.map_or(true, |last| year <= last)
    }
}

/// Offsets per format era, consulted with the year of the file being parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffsetTable(pub Vec<FormatEra>);

impl Default for OffsetTable {
    fn default() -> Self {
        OffsetTable(vec![
            FormatEra {
                name: "no-minute".to_string(),
                first_year: 1999,
                last_year: Some(2004),
                fields: FieldOffsets::without_minute_column(),
            },
            FormatEra {
                name: "modern".to_string(),
                first_year: 2005,
                last_year: None,
                fields: FieldOffsets::with_minute_column(),
            },
        ])
    }
}

impl OffsetTable {
    /// First era covering `year`, if any.
    pub fn era_for_year(&self, year: i32) -> Option<&FormatEra> {
        self.0.iter().find(|era| era.covers(year))
    }

    /// Reject empty ranges, inverted eras and overlapping eras.
    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(BuoyError::InvalidConfig(
                "offset table has no format eras".to_string(),
            ));
        }
        for era in &self.0 {
            if let Some(last) = era.last_year {
                if last < era.first_year {
                    return Err(BuoyError::InvalidConfig(format!(
                        "format era {} ends before it starts",
                        era.name
                    )));
                }
            }
            for (field, range) in era.fields.ranges() {
                if range.start >= range.end {
                    return Err(BuoyError::InvalidConfig(format!(
                        "format era {} has an empty {} range",
                        era.name, field
                    )));
                }
            }
        }
        for (i, era) in self.0.iter().enumerate() {
            for other in &self.0[i + 1..] {
                if era.covers(other.first_year) || other.covers(era.first_year) {
                    return Err(BuoyError::InvalidConfig(format!(
                        "format eras {} and {} overlap",
                        era.name, other.name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// One day's measurement as read from the archive, before unit conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRecord {
    pub date: NaiveDate,
    pub direction: u16,
    pub dominant_period: Option<f64>,
    /// Metres, as published
    pub wave_height_m: Option<f64>,
}

/// Records kept from one blob and the number of lines dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBlob {
    pub records: Vec<ParsedRecord>,
    pub rejected: usize,
}

/// Parser bound to the offsets of one format era.
#[derive(Debug, Clone, Copy)]
pub struct RecordParser<'a> {
    fields: &'a FieldOffsets,
}

impl<'a> RecordParser<'a> {
    pub fn new(fields: &'a FieldOffsets) -> Self {
        RecordParser { fields }
    }

    /// Parser for the file of `year`, or `None` when no era covers it.
    pub fn for_year(table: &'a OffsetTable, year: i32) -> Option<Self> {
        table.era_for_year(year).map(|era| RecordParser::new(&era.fields))
    }

    /// Parse one line. Header lines, malformed lines and lines without a
    /// recorded direction all come back as `None`.
    pub fn parse_line(&self, line: &str) -> Option<ParsedRecord> {
        let year = extract(line, &self.fields.year)?.parse::<i32>().ok()?;
        let month = extract(line, &self.fields.month)?.parse::<u32>().ok()?;
        let day = extract(line, &self.fields.day)?.parse::<u32>().ok()?;
        let date = NaiveDate::from_ymd_opt(year, month, day)?;

        let direction = extract_whole(line, &self.fields.direction)?.parse::<u16>().ok()?;
        if direction == DIRECTION_SENTINEL || direction > MAX_DIRECTION {
            return None;
        }

        let wave_height_m = optional_measurement(extract(line, &self.fields.wave_height)?).ok()?;
        let dominant_period =
            optional_measurement(extract(line, &self.fields.dominant_period)?).ok()?;

        Some(ParsedRecord {
            date,
            direction,
            dominant_period,
            wave_height_m,
        })
    }

    pub fn parse_lines<'l>(&self, lines: impl Iterator<Item = &'l str>) -> ParsedBlob {
        let mut parsed = ParsedBlob::default();
        for line in lines {
            match self.parse_line(line) {
                Some(record) => parsed.records.push(record),
                None => parsed.rejected += 1,
            }
        }
        parsed
    }
}

/// Parse a whole year blob with the era matching its year.
pub fn parse_blob(blob: &RawYearBlob, table: &OffsetTable) -> ParsedBlob {
    match RecordParser::for_year(table, blob.year) {
        Some(parser) => {
            let parsed = parser.parse_lines(blob.lines());
            debug!(
                "{} {}: kept {} lines, rejected {}",
                blob.station_id,
                blob.year,
                parsed.records.len(),
                parsed.rejected
            );
            parsed
        }
        None => {
            debug!(
                "{} {}: no format era covers this year",
                blob.station_id, blob.year
            );
            ParsedBlob {
                records: Vec::new(),
                rejected: blob.lines().count(),
            }
        }
    }
}

/// Cut a field out of a line. A range running past the end of the line is
/// truncated; a range splitting a multi-byte character yields `None`.
fn extract<'l>(line: &'l str, range: &Range<usize>) -> Option<&'l str> {
    let end = range.end.min(line.len());
    if range.start >= end {
        return Some("");
    }
    line.get(range.start..end).map(str::trim)
}

/// Like [`extract`], but a line ending inside the range yields `None`.
fn extract_whole<'l>(line: &'l str, range: &Range<usize>) -> Option<&'l str> {
    if line.len() < range.end {
        return None;
    }
    extract(line, range)
}

/// Empty means absent; anything else must be a finite number.
fn optional_measurement(raw: &str) -> std::result::Result<Option<f64>, ()> {
    if raw.is_empty() {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a post-2005 stdmet line with the given wave fields.
    fn modern_line(
        date: (i32, u32, u32),
        hour: u32,
        wave_height: &str,
        period: &str,
        direction: &str,
    ) -> String {
        let (year, month, day) = date;
        format!(
            "{year:04} {month:02} {day:02} {hour:02} 00 999 99.0 99.0 {wave_height:>5} {period:>5}  6.07 {direction:>3} 9999.0 999.0   8.9 999.0 99.0 99.00"
        )
    }

    const MODERN_HEADER: &str = "#YY  MM DD hh mm WDIR WSPD GST  WVHT   DPD   APD MWD   PRES  ATMP  WTMP  DEWP  VIS  TIDE";
    const MODERN_UNITS: &str = "#yr  mo dy hr mn degT m/s  m/s     m   sec   sec degT   hPa  degC  degC  degC  nmi    ft";
    const MODERN_SAMPLE: &str = "2019 01 01 00 00 999 99.0 99.0  1.63 10.81  6.07 116 9999.0 999.0   8.9 999.0 99.0 99.00";
    const LEGACY_SAMPLE: &str = "2000 01 01 00 270  7.2  8.6  1.39  7.69  5.42 221 1017.2  10.5  12.0 999.0 99.0";

    fn modern() -> FieldOffsets {
        FieldOffsets::with_minute_column()
    }

    #[test]
    fn test_parse_modern_sample_line() {
        let fields = modern();
        let record = RecordParser::new(&fields).parse_line(MODERN_SAMPLE).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(record.direction, 116);
        assert_eq!(record.wave_height_m, Some(1.63));
        assert_eq!(record.dominant_period, Some(10.81));
    }

    #[test]
    fn test_parse_legacy_sample_line() {
        let fields = FieldOffsets::without_minute_column();
        let record = RecordParser::new(&fields).parse_line(LEGACY_SAMPLE).unwrap();
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2000, 1, 1).unwrap());
        assert_eq!(record.direction, 221);
        assert_eq!(record.wave_height_m, Some(1.39));
        assert_eq!(record.dominant_period, Some(7.69));
    }

    #[test]
    fn test_header_lines_are_rejected() {
        let fields = modern();
        let parser = RecordParser::new(&fields);
        assert!(parser.parse_line(MODERN_HEADER).is_none());
        assert!(parser.parse_line(MODERN_UNITS).is_none());
        assert!(parser.parse_line("").is_none());
    }

    #[test]
    fn test_sentinel_direction_is_rejected() {
        let fields = modern();
        let line = modern_line((2019, 3, 4), 0, "1.20", "9.00", "999");
        assert!(RecordParser::new(&fields).parse_line(&line).is_none());
    }

    #[test]
    fn test_out_of_range_direction_is_rejected() {
        let fields = modern();
        let line = modern_line((2019, 3, 4), 0, "1.20", "9.00", "400");
        assert!(RecordParser::new(&fields).parse_line(&line).is_none());
    }

    #[test]
    fn test_blank_measurements_are_absent_not_zero() {
        let fields = modern();
        let line = modern_line((2019, 3, 4), 0, "", "", "180");
        let record = RecordParser::new(&fields).parse_line(&line).unwrap();
        assert_eq!(record.wave_height_m, None);
        assert_eq!(record.dominant_period, None);
        assert_eq!(record.direction, 180);
    }

    #[test]
    fn test_wave_height_uses_full_column_width() {
        let fields = modern();
        let line = modern_line((2019, 3, 4), 0, "10.50", "14.29", "90");
        let record = RecordParser::new(&fields).parse_line(&line).unwrap();
        assert_eq!(record.wave_height_m, Some(10.5));
        assert_eq!(record.dominant_period, Some(14.29));
    }

    #[test]
    fn test_non_numeric_measurement_rejects_line() {
        let fields = modern();
        let line = modern_line((2019, 3, 4), 0, "MM", "9.00", "180");
        assert!(RecordParser::new(&fields).parse_line(&line).is_none());
    }

    #[test]
    fn test_invalid_calendar_date_rejects_line() {
        let fields = modern();
        let line = modern_line((2019, 2, 30), 0, "1.00", "9.00", "180");
        assert!(RecordParser::new(&fields).parse_line(&line).is_none());
    }

    #[test]
    fn test_truncated_line_is_rejected_without_panic() {
        let fields = modern();
        let parser = RecordParser::new(&fields);
        assert!(parser.parse_line("2019 01 01 00 00 999 99.0").is_none());
        // cut inside the MWD column
        assert!(parser.parse_line("2019 01 01 00 00 999 99.0 99.0  1.63 10.81  6.07 1").is_none());
        assert!(parser.parse_line("2019 01 01 00 00 999 99.0 99.0  1.63 10.81  6.07 15").is_none());
        let whole = parser.parse_line("2019 01 01 00 00 999 99.0 99.0  1.63 10.81  6.07 153").unwrap();
        assert_eq!(whole.direction, 153);
        assert!(parser.parse_line("2019 0é 01").is_none());
    }

    #[test]
    fn test_offset_table_selects_era_by_year() {
        let table = OffsetTable::default();
        assert_eq!(table.era_for_year(2019).unwrap().name, "modern");
        assert_eq!(table.era_for_year(2005).unwrap().name, "modern");
        assert_eq!(table.era_for_year(2004).unwrap().name, "no-minute");
        assert!(table.era_for_year(1990).is_none());
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_offset_table_rejects_overlap() {
        let mut table = OffsetTable::default();
        table.0[0].last_year = Some(2006);
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_offset_table_rejects_empty_range() {
        let mut table = OffsetTable::default();
        table.0[1].fields.direction = 49..49;
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_parse_blob_counts_rejections() {
        let text = [
            MODERN_HEADER.to_string(),
            MODERN_UNITS.to_string(),
            modern_line((2019, 1, 1), 0, "1.63", "10.81", "116"),
            modern_line((2019, 1, 1), 1, "1.70", "10.81", "999"),
        ]
        .join("\n");
        let blob = RawYearBlob::new("44017", 2019, text);
        let parsed = parse_blob(&blob, &OffsetTable::default());
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.rejected, 3);
    }

    #[test]
    fn test_parse_blob_outside_every_era() {
        let blob = RawYearBlob::new("44017", 1985, "85 01 01 00 270  7.2".to_string());
        let parsed = parse_blob(&blob, &OffsetTable::default());
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.rejected, 1);
    }
}
