use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A calendar month of the reporting year.
///
/// Variants are declared in calendar order, so the derived `Ord` sorts
/// January first and December last. Every trend view relies on this
/// ordering; month labels must never be sorted lexically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

/// Error returned when a label does not name any month.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown month: {0}")]
pub struct UnknownMonth(pub String);

impl Month {
    /// All twelve months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// The lowercase three letter code used in source column names, e.g. `jan`.
    pub fn code(&self) -> &'static str {
        match self {
            Month::Jan => "jan",
            Month::Feb => "feb",
            Month::Mar => "mar",
            Month::Apr => "apr",
            Month::May => "may",
            Month::Jun => "jun",
            Month::Jul => "jul",
            Month::Aug => "aug",
            Month::Sep => "sep",
            Month::Oct => "oct",
            Month::Nov => "nov",
            Month::Dec => "dec",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Month::Jan => "January",
            Month::Feb => "February",
            Month::Mar => "March",
            Month::Apr => "April",
            Month::May => "May",
            Month::Jun => "June",
            Month::Jul => "July",
            Month::Aug => "August",
            Month::Sep => "September",
            Month::Oct => "October",
            Month::Nov => "November",
            Month::Dec => "December",
        }
    }

    pub fn thai_name(&self) -> &'static str {
        match self {
            Month::Jan => "มกราคม",
            Month::Feb => "กุมภาพันธ์",
            Month::Mar => "มีนาคม",
            Month::Apr => "เมษายน",
            Month::May => "พฤษภาคม",
            Month::Jun => "มิถุนายน",
            Month::Jul => "กรกฎาคม",
            Month::Aug => "สิงหาคม",
            Month::Sep => "กันยายน",
            Month::Oct => "ตุลาคม",
            Month::Nov => "พฤศจิกายน",
            Month::Dec => "ธันวาคม",
        }
    }

    /// Month number, 1 for January through 12 for December.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn from_number(number: u32) -> Option<Month> {
        match number {
            1..=12 => Some(Month::ALL[(number - 1) as usize]),
            _ => None,
        }
    }
}

impl FromStr for Month {
    type Err = UnknownMonth;

    /// Accepts the source code (`jan`), the English name (`January`),
    /// the Thai name (`มกราคม`) or the month number (`1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let lowered = trimmed.to_lowercase();
        if let Ok(number) = lowered.parse::<u32>() {
            return Month::from_number(number).ok_or_else(|| UnknownMonth(s.to_string()));
        }
        Month::ALL
            .iter()
            .copied()
            .find(|month| {
                month.code() == lowered
                    || month.english_name().to_lowercase() == lowered
                    || month.thai_name() == trimmed
            })
            .ok_or_else(|| UnknownMonth(s.to_string()))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.english_name())
    }
}
