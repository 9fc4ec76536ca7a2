//! Shared formatting helpers for the PM2.5 crates.

/// Display formatting of PM2.5 readings.
pub mod format {
    /// Unit suffix for PM2.5 concentrations.
    pub const PM25_UNIT: &str = "μg/m³";

    /// Format a concentration as "45.0 μg/m³", or "N/A" when missing.
    pub fn format_pm25(value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.1} {}", v, PM25_UNIT),
            _ => "N/A".to_string(),
        }
    }

    /// One decimal place, or "-" when missing.
    pub fn format_value(value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{:.1}", v),
            _ => "-".to_string(),
        }
    }

    /// Pad `text` with spaces to `width` characters.
    ///
    /// Counts chars rather than bytes so Thai park names line up, though
    /// combining vowel marks still make those columns look slightly short.
    pub fn pad(text: &str, width: usize) -> String {
        let len = text.chars().count();
        if len >= width {
            text.to_string()
        } else {
            format!("{}{}", text, " ".repeat(width - len))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_format_pm25() {
            assert_eq!(format_pm25(Some(45.0)), "45.0 μg/m³");
            assert_eq!(format_pm25(Some(12.345)), "12.3 μg/m³");
            assert_eq!(format_pm25(None), "N/A");
            assert_eq!(format_pm25(Some(f64::NAN)), "N/A");
        }

        #[test]
        fn test_format_value() {
            assert_eq!(format_value(Some(7.26)), "7.3");
            assert_eq!(format_value(Some(30.0)), "30.0");
            assert_eq!(format_value(None), "-");
        }

        #[test]
        fn test_pad() {
            assert_eq!(pad("ab", 4), "ab  ");
            assert_eq!(pad("abcdef", 4), "abcdef");
            assert_eq!(pad("สวน", 4).chars().count(), 4);
        }
    }
}

/// Report export naming.
pub mod export {
    use chrono::{DateTime, Local, TimeZone};

    /// Byte order mark written ahead of exported CSV so spreadsheet
    /// applications detect UTF-8 Thai text.
    pub const UTF8_BOM: &str = "\u{feff}";

    /// File name for a report generated at `at`: `PM25_Report_YYYYmmdd_HHMM.csv`.
    pub fn report_file_name<Tz: TimeZone>(at: &DateTime<Tz>) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!("PM25_Report_{}.csv", at.format("%Y%m%d_%H%M"))
    }

    /// Report file name for the current local time.
    pub fn default_report_file_name() -> String {
        report_file_name(&Local::now())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{NaiveDateTime, Utc};

        #[test]
        fn test_report_file_name() {
            let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 59).unwrap();
            assert_eq!(report_file_name(&at), "PM25_Report_20240307_0905.csv");
        }

        #[test]
        fn test_default_name_carries_timestamp() {
            let name = default_report_file_name();
            let stamp = name
                .strip_prefix("PM25_Report_")
                .and_then(|rest| rest.strip_suffix(".csv"))
                .unwrap();
            assert!(NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M").is_ok());
        }
    }
}
