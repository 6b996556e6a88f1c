//! Shared utility functions for buoy crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Join years into the "2015, 2016" form used in notices
    pub fn join_years(years: &[i32]) -> String {
        years
            .iter()
            .map(|year| year.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

}

/// Geographic helpers
pub mod geo {
    /// Average of a set of (latitude, longitude) points, used to center a map.
    ///
    /// Plain arithmetic mean; points straddling the antimeridian are not
    /// handled specially. Returns `None` for an empty slice.
    pub fn midpoint(points: &[(f64, f64)]) -> Option<(f64, f64)> {
        if points.is_empty() {
            return None;
        }
        let count = points.len() as f64;
        let (latitude_sum, longitude_sum) = points
            .iter()
            .fold((0.0, 0.0), |(lat, lon), (p_lat, p_lon)| (lat + p_lat, lon + p_lon));
        Some((latitude_sum / count, longitude_sum / count))
    }

}
