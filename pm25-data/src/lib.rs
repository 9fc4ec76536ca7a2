//! Filtering, aggregation and analysis of park PM2.5 observations.
//!
//! This crate turns the long observation table produced by `pm25-park`
//! into the summaries each report view needs.

pub mod aggregate;
pub mod distribution;
pub mod filter;
pub mod forecast;
pub mod summary;

/// PM2.5 risk levels and the park risk map.
pub mod risk {
    use crate::aggregate::{aggregate, GroupBy, GroupKey, Reducer};
    use pm25_park::observation::{Metric, Observation};
    use pm25_park::park::Park;
    use serde::Serialize;

    /// Upper bound (inclusive) of the good level, µg/m³. Also the Thai
    /// annual standard.
    pub const GOOD_LIMIT: f64 = 25.0;

    /// Upper bound (inclusive) of the moderate level, µg/m³.
    pub const MODERATE_LIMIT: f64 = 50.0;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RiskLevel {
        Good,
        Moderate,
        High,
        NoData,
    }

    impl RiskLevel {
        /// Classify a mean reading; missing or non-finite means no data.
        pub fn classify(value: Option<f64>) -> RiskLevel {
            match value {
                Some(v) if !v.is_finite() => RiskLevel::NoData,
                Some(v) if v <= GOOD_LIMIT => RiskLevel::Good,
                Some(v) if v <= MODERATE_LIMIT => RiskLevel::Moderate,
                Some(_) => RiskLevel::High,
                None => RiskLevel::NoData,
            }
        }

        /// Map marker colour as RGB.
        pub fn color(&self) -> [u8; 3] {
            match self {
                RiskLevel::Good => [0, 200, 0],
                RiskLevel::Moderate => [255, 215, 0],
                RiskLevel::High => [255, 0, 0],
                RiskLevel::NoData => [200, 200, 200],
            }
        }

        pub fn label(&self) -> &'static str {
            match self {
                RiskLevel::Good => "good",
                RiskLevel::Moderate => "moderate",
                RiskLevel::High => "high",
                RiskLevel::NoData => "no data",
            }
        }

        pub fn thai_label(&self) -> &'static str {
            match self {
                RiskLevel::Good => "ดี",
                RiskLevel::Moderate => "ปานกลาง",
                RiskLevel::High => "เสี่ยงสูง",
                RiskLevel::NoData => "ไม่มีข้อมูล",
            }
        }
    }

    /// A park with its mean PM2.5 and risk level.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct ParkRisk {
        pub name: String,
        pub name_en: String,
        pub latitude: f64,
        pub longitude: f64,
        pub mean_average: Option<f64>,
        pub level: RiskLevel,
        pub color: [u8; 3],
    }

    /// Every park in `parks` joined with the mean average of its
    /// observations. Parks without data are kept with [`RiskLevel::NoData`];
    /// observations for locations outside `parks` are ignored.
    pub fn risk_map_for(parks: &[Park], observations: &[Observation]) -> Vec<ParkRisk> {
        let means = aggregate(observations, GroupBy::LOCATION, Metric::Average, Reducer::Mean);
        parks
            .iter()
            .map(|park| {
                let mean_average = means.get(&GroupKey::location(park.name.as_str()));
                let level = RiskLevel::classify(mean_average);
                ParkRisk {
                    name: park.name.clone(),
                    name_en: park.name_en.clone(),
                    latitude: park.latitude,
                    longitude: park.longitude,
                    mean_average,
                    level,
                    color: level.color(),
                }
            })
            .collect()
    }

    /// [`risk_map_for`] over the embedded park directory.
    pub fn risk_map(observations: &[Observation]) -> Vec<ParkRisk> {
        risk_map_for(Park::all(), observations)
    }

    /// Mean latitude and longitude of the parks, where a map centres.
    pub fn map_center(parks: &[ParkRisk]) -> Option<(f64, f64)> {
        if parks.is_empty() {
            return None;
        }
        let n = parks.len() as f64;
        let latitude = parks.iter().map(|p| p.latitude).sum::<f64>() / n;
        let longitude = parks.iter().map(|p| p.longitude).sum::<f64>() / n;
        Some((latitude, longitude))
    }

}
