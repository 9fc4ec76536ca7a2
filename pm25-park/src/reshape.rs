//! Wide-to-long reshaping of raw PM2.5 records.
//!
//! Missing-data policy: an empty cell is zero-filled, while a cell with
//! non-numeric content (or a month whose columns are absent) drops that
//! month. A year that is not an integer, or an empty location, drops the
//! whole row. None of these abort the reshape.

use crate::month::Month;
use crate::observation::Observation;
use crate::raw_record::{CellError, RawRecord};
use log::{debug, info, warn};

/// Coerce the source year to an integer.
///
/// Accepts `2023` as well as `2023.0`, which is how a year column is
/// written once the spreadsheet that produced it stored years as floats.
pub fn parse_year(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let float = trimmed.parse::<f64>().ok()?;
    let in_range = float >= i32::MIN as f64 && float <= i32::MAX as f64;
    if float.is_finite() && float.fract() == 0.0 && in_range {
        Some(float as i32)
    } else {
        None
    }
}

/// Turn each wide record into one observation per usable month.
///
/// Output follows source row order, then calendar month order, and holds
/// at most twelve observations per record.
pub fn reshape(records: &[RawRecord]) -> Vec<Observation> {
    let mut observations = Vec::with_capacity(records.len() * Month::ALL.len());
    let mut skipped_rows = 0usize;
    let mut skipped_months = 0usize;

    for record in records {
        let location = record.location.trim();
        if location.is_empty() {
            warn!("Skipping record with empty location (year '{}')", record.year);
            skipped_rows += 1;
            continue;
        }
        let Some(year) = parse_year(&record.year) else {
            warn!(
                "Skipping record for {}: year '{}' is not an integer",
                location, record.year
            );
            skipped_rows += 1;
            continue;
        };

        for month in Month::ALL {
            match record.cells(month).values() {
                Ok(values) => observations.push(Observation {
                    location: location.to_string(),
                    year,
                    month,
                    lowest: values.lowest,
                    highest: values.highest,
                    average: values.average,
                    exceeding_days: values.exceeding_days,
                }),
                Err(CellError::Absent) => {
                    debug!("{} {} {}: month columns absent", location, year, month.code());
                    skipped_months += 1;
                }
                Err(CellError::Unparsable(value)) => {
                    debug!(
                        "{} {} {}: non-numeric reading '{}'",
                        location,
                        year,
                        month.code(),
                        value
                    );
                    skipped_months += 1;
                }
            }
        }
    }

    info!(
        "Reshaped {} records into {} observations, skipped {} rows and {} months",
        records.len(),
        observations.len(),
        skipped_rows,
        skipped_months
    );
    observations
}
