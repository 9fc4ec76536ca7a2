//! CSV report export with Thai column headings.

use anyhow::Context;
use log::info;
use pm25_park::observation::{Metric, Observation};
use pm25_utils::export::{default_report_file_name, UTF8_BOM};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Location, year, Thai month, month code, then the four readings.
pub fn report_headers() -> Vec<&'static str> {
    let mut headers = vec!["สถานที่", "ปี", "เดือน", "เดือนอังกฤษ"];
    headers.extend(Metric::ALL.iter().map(|m| m.thai_label()));
    headers
}

/// Write `observations` as CSV to `writer`, preceded by a UTF-8 BOM.
pub fn write_csv<W: Write>(observations: &[Observation], mut writer: W) -> anyhow::Result<()> {
    writer.write_all(UTF8_BOM.as_bytes())?;
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(report_headers())?;
    for observation in observations {
        wtr.write_record([
            observation.location.clone(),
            observation.year.to_string(),
            observation.month.thai_name().to_string(),
            observation.month.code().to_string(),
            observation.lowest.to_string(),
            observation.highest.to_string(),
            observation.average.to_string(),
            observation.exceeding_days.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the report to `output`, or to a timestamped file in the working
/// directory. Returns the path written.
pub fn write_report(observations: &[Observation], output: Option<&Path>) -> anyhow::Result<PathBuf> {
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(default_report_file_name()),
    };
    let file = File::create(&path)
        .with_context(|| format!("Failed to create report {}", path.display()))?;
    write_csv(observations, file)?;
    info!("Exported {} rows to {}", observations.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{write_csv, write_report};
    use crate::test_data::sample_observations;

    #[test]
    fn test_csv_has_bom_and_thai_headers() {
        let observations = sample_observations();
        let mut out = Vec::new();
        write_csv(&observations[..2], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with('\u{feff}'));
        let lines: Vec<&str> = text.trim_start_matches('\u{feff}').lines().collect();
        assert_eq!(
            lines[0],
            "สถานที่,ปี,เดือน,เดือนอังกฤษ,ค่าต่ำสุด,ค่าสูงสุด,ค่าเฉลี่ย,จำนวนวันเกินมาตรฐาน"
        );
        assert_eq!(lines[1], "สวนลุมพินี เขตปทุมวัน,2021,มกราคม,jan,10,60,20,4");
        assert_eq!(lines[2], "สวนลุมพินี เขตปทุมวัน,2021,กุมภาพันธ์,feb,12,70,30,6");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_report_to_path() {
        let path = std::env::temp_dir().join(format!("pm25-export-{}.csv", std::process::id()));
        let written = write_report(&sample_observations(), Some(&path)).unwrap();
        assert_eq!(written, path);
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(text.lines().count(), 8);
    }
}
