//! Loading the long observation table from the source CSV.

use anyhow::Context;
use log::info;
use pm25_park::observation::Observation;
use pm25_park::reshape::reshape;
use pm25_park::source::load_raw_records;
use std::path::Path;

/// Read the wide source at `path` and reshape it into observations.
pub fn load_observations(path: &Path) -> anyhow::Result<Vec<Observation>> {
    let records = load_raw_records(path)
        .with_context(|| format!("Failed to load PM2.5 data from {}", path.display()))?;
    let observations = reshape(&records);
    info!(
        "Loaded {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

#[cfg(test)]
mod tests {
    use super::load_observations;
    use crate::test_data::SAMPLE_SOURCE;
    use std::path::Path;

    #[test]
    fn test_load_observations_from_file() {
        let path = std::env::temp_dir().join(format!("pm25-load-{}.csv", std::process::id()));
        std::fs::write(&path, SAMPLE_SOURCE).unwrap();
        let observations = load_observations(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(observations.len(), 7);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_observations(Path::new("no/such/AllParkYear.csv")).unwrap_err();
        assert!(err.to_string().contains("no/such/AllParkYear.csv"));
    }
}
