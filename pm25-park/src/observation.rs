use crate::month::Month;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A location's PM2.5 readings for one month of one year (long form).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub location: String,
    pub year: i32,
    pub month: Month,
    /// Lowest daily PM2.5 in the month, µg/m³
    pub lowest: f64,
    /// Highest daily PM2.5 in the month, µg/m³
    pub highest: f64,
    /// Monthly average PM2.5, µg/m³
    pub average: f64,
    /// Days in the month above the PM2.5 standard
    pub exceeding_days: f64,
}

impl Observation {
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Lowest => self.lowest,
            Metric::Highest => self.highest,
            Metric::Average => self.average,
            Metric::ExceedingDays => self.exceeding_days,
        }
    }
}

/// A numeric field of an [`Observation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Lowest,
    Highest,
    Average,
    ExceedingDays,
}

/// Error returned when a label does not name any metric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown metric '{0}', expected one of lowest, highest, average, exceeding_days")]
pub struct UnknownMetric(pub String);

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Lowest,
        Metric::Highest,
        Metric::Average,
        Metric::ExceedingDays,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Lowest => "lowest",
            Metric::Highest => "highest",
            Metric::Average => "average",
            Metric::ExceedingDays => "exceeding_days",
        }
    }

    /// Column heading used in the Thai report export.
    pub fn thai_label(&self) -> &'static str {
        match self {
            Metric::Lowest => "ค่าต่ำสุด",
            Metric::Highest => "ค่าสูงสุด",
            Metric::Average => "ค่าเฉลี่ย",
            Metric::ExceedingDays => "จำนวนวันเกินมาตรฐาน",
        }
    }

    /// Name of this metric's column in the wide source for `month`.
    pub fn source_column(&self, month: Month) -> String {
        match self {
            Metric::Lowest => format!("{}_lowest_PM2.5", month.code()),
            Metric::Highest => format!("{}_highest_PM2.5", month.code()),
            Metric::Average => format!("{}_average_PM2.5", month.code()),
            Metric::ExceedingDays => format!("{}_day_exceeding_month", month.code()),
        }
    }
}

impl FromStr for Metric {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "lowest" | "min" => Ok(Metric::Lowest),
            "highest" | "max" => Ok(Metric::Highest),
            "average" | "avg" | "mean" => Ok(Metric::Average),
            "exceeding_days" | "exceeding" => Ok(Metric::ExceedingDays),
            _ => Err(UnknownMetric(s.to_string())),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
