//! Reader for the wide yearly/monthly PM2.5 table.
//!
//! The source has one row per (park, year). Besides the two identifying
//! columns it carries 48 reading columns named
//! `{month}_{lowest|highest|average}_PM2.5` and `{month}_day_exceeding_month`.
//! Reading columns are resolved by name, so a renamed column only affects
//! its own month; the reshaper later skips months whose columns are absent.

use crate::error::{Result, SourceError};
use crate::month::Month;
use crate::observation::Metric;
use crate::raw_record::{MonthCells, RawCell, RawRecord};
use csv::{ReaderBuilder, StringRecord};
use log::info;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Column holding the park name (with its district).
pub const LOCATION_COLUMN: &str = "Dis_trict";

/// Column holding the reporting year (Gregorian).
pub const YEAR_COLUMN: &str = "ปี";

/// Where the dashboard dataset lives relative to the working directory.
pub const DEFAULT_SOURCE_PATH: &str = "Group_file/AllParkYear.csv";

/// Header positions of every column the reshaper needs.
#[derive(Debug)]
struct ColumnLayout {
    location: usize,
    year: usize,
    /// Indexed by month, then by `Metric::ALL` order.
    readings: [[Option<usize>; 4]; 12],
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let location = position(LOCATION_COLUMN)
            .ok_or_else(|| SourceError::MissingColumn(LOCATION_COLUMN.to_string()))?;
        let year = position(YEAR_COLUMN)
            .ok_or_else(|| SourceError::MissingColumn(YEAR_COLUMN.to_string()))?;

        let mut readings = [[None; 4]; 12];
        for month in Month::ALL {
            for (slot, metric) in Metric::ALL.iter().enumerate() {
                readings[month as usize][slot] = position(&metric.source_column(month));
            }
        }
        Ok(ColumnLayout {
            location,
            year,
            readings,
        })
    }

    fn mapped_reading_columns(&self) -> usize {
        self.readings.iter().flatten().filter(|c| c.is_some()).count()
    }

    fn cell(&self, row: &StringRecord, column: Option<usize>) -> RawCell {
        match column {
            None => RawCell::Absent,
            Some(idx) => row.get(idx).map(RawCell::from_field).unwrap_or(RawCell::Null),
        }
    }

    fn raw_record(&self, row: &StringRecord) -> RawRecord {
        let location = row.get(self.location).unwrap_or("").trim();
        let year = row.get(self.year).unwrap_or("").trim();
        let mut record = RawRecord::new(location, year);
        for month in Month::ALL {
            let [lowest, highest, average, exceeding_days] = self.readings[month as usize];
            *record.cells_mut(month) = MonthCells {
                lowest: self.cell(row, lowest),
                highest: self.cell(row, highest),
                average: self.cell(row, average),
                exceeding_days: self.cell(row, exceeding_days),
            };
        }
        record
    }
}

/// Read raw records from any CSV byte stream.
pub fn read_raw_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        records.push(layout.raw_record(&row));
    }
    info!(
        "Read {} raw records ({} of 48 reading columns mapped)",
        records.len(),
        layout.mapped_reading_columns()
    );
    Ok(records)
}

/// Read raw records from a CSV string.
pub fn parse_raw_records(csv_object: &str) -> Result<Vec<RawRecord>> {
    read_raw_records(csv_object.as_bytes())
}

/// Open and read the source file at `path`.
pub fn load_raw_records(path: &Path) -> Result<Vec<RawRecord>> {
    let file =
        File::open(path).map_err(|e| SourceError::SourceUnavailable(path.to_path_buf(), e))?;
    info!("Loading PM2.5 source from {}", path.display());
    read_raw_records(file)
}
