//! Box-plot statistics of PM2.5 readings.

use crate::aggregate::{Dimension, GroupBy, GroupKey};
use pm25_park::observation::{Metric, Observation};
use serde::Serialize;
use std::collections::BTreeMap;

/// Five-number summary plus Tukey whiskers and outliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Smallest value within 1.5 IQR below the first quartile.
    pub lower_whisker: f64,
    /// Largest value within 1.5 IQR above the third quartile.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Quantile of sorted values, interpolating linearly between closest ranks.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let position = p * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

impl BoxStats {
    /// Statistics of the finite values; `None` if there are none.
    pub fn from_values(values: &[f64]) -> Option<BoxStats> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let low_fence = q1 - 1.5 * iqr;
        let high_fence = q3 + 1.5 * iqr;

        let (mut lower_whisker, mut upper_whisker) = (q1, q3);
        let mut outliers = Vec::new();
        for &value in &sorted {
            if value < low_fence || value > high_fence {
                outliers.push(value);
            } else {
                lower_whisker = lower_whisker.min(value);
                upper_whisker = upper_whisker.max(value);
            }
        }

        Some(BoxStats {
            count: sorted.len(),
            min: sorted[0],
            q1,
            median: quantile(&sorted, 0.5),
            q3,
            max: sorted[sorted.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Box statistics for one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    #[serde(flatten)]
    pub key: GroupKey,
    pub stats: BoxStats,
}

/// Distribution of `metric` per group along `dimension`.
///
/// Grouping by location or year is only meaningful with more than one
/// group and returns `None` otherwise. Month grouping is always returned.
pub fn distribution_by(
    observations: &[Observation],
    dimension: Dimension,
    metric: Metric,
) -> Option<Vec<GroupDistribution>> {
    let group_by = GroupBy::from(dimension);
    let mut buckets: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for observation in observations {
        buckets
            .entry(group_by.key(observation))
            .or_default()
            .push(observation.value(metric));
    }
    if dimension != Dimension::Month && buckets.len() <= 1 {
        return None;
    }
    let groups = buckets
        .into_iter()
        .filter_map(|(key, values)| {
            BoxStats::from_values(&values).map(|stats| GroupDistribution { key, stats })
        })
        .collect();
    Some(groups)
}

/// Lowest, average and highest readings side by side.
pub fn metric_distribution(observations: &[Observation]) -> Vec<(Metric, BoxStats)> {
    [Metric::Lowest, Metric::Average, Metric::Highest]
        .into_iter()
        .filter_map(|metric| {
            let values: Vec<f64> = observations.iter().map(|o| o.value(metric)).collect();
            BoxStats::from_values(&values).map(|stats| (metric, stats))
        })
        .collect()
}
