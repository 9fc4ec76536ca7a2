//! Group-and-reduce over the long observation table.
//!
//! Groups are keyed by any subset of location, year and month and are
//! kept in a `BTreeMap`, so iteration follows location, then year, then
//! calendar month. Month keys are [`Month`] values, never labels, which
//! keeps every trend view in January-to-December order.

use pm25_park::month::Month;
use pm25_park::observation::{Metric, Observation};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::str::FromStr;
use thiserror::Error;

/// Which dimensions to group on. All `false` means one overall group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupBy {
    pub location: bool,
    pub year: bool,
    pub month: bool,
}

impl GroupBy {
    pub const NONE: GroupBy = GroupBy {
        location: false,
        year: false,
        month: false,
    };
    pub const LOCATION: GroupBy = GroupBy {
        location: true,
        year: false,
        month: false,
    };
    pub const YEAR: GroupBy = GroupBy {
        location: false,
        year: true,
        month: false,
    };
    pub const MONTH: GroupBy = GroupBy {
        location: false,
        year: false,
        month: true,
    };

    /// Union of two groupings.
    pub fn and(self, other: GroupBy) -> GroupBy {
        GroupBy {
            location: self.location || other.location,
            year: self.year || other.year,
            month: self.month || other.month,
        }
    }

    pub(crate) fn key(&self, observation: &Observation) -> GroupKey {
        GroupKey {
            location: self.location.then(|| observation.location.clone()),
            year: self.year.then_some(observation.year),
            month: self.month.then_some(observation.month),
        }
    }
}

/// A single grouping dimension, as chosen on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Location,
    Year,
    Month,
}

impl From<Dimension> for GroupBy {
    fn from(value: Dimension) -> Self {
        match value {
            Dimension::Location => GroupBy::LOCATION,
            Dimension::Year => GroupBy::YEAR,
            Dimension::Month => GroupBy::MONTH,
        }
    }
}

impl FromStr for Dimension {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "location" | "park" => Ok(Dimension::Location),
            "year" => Ok(Dimension::Year),
            "month" => Ok(Dimension::Month),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// Error returned when a dimension or reducer label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised label: {0}")]
pub struct UnknownLabel(pub String);

/// How the values of one group collapse to a single number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Mean,
    Max,
    Min,
    Sum,
    CountDistinct,
}

impl Reducer {
    /// Reduce the finite values of one group; `None` for an empty group.
    pub fn reduce(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        let reduced = match self {
            Reducer::Mean => values.iter().sum::<f64>() / values.len() as f64,
            Reducer::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Reducer::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
            Reducer::Sum => values.iter().sum(),
            Reducer::CountDistinct => {
                // adding 0.0 folds -0.0 into 0.0
                let distinct: HashSet<u64> = values.iter().map(|v| (v + 0.0).to_bits()).collect();
                distinct.len() as f64
            }
        };
        Some(reduced)
    }
}

impl FromStr for Reducer {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "mean" | "avg" | "average" => Ok(Reducer::Mean),
            "max" => Ok(Reducer::Max),
            "min" => Ok(Reducer::Min),
            "sum" => Ok(Reducer::Sum),
            "count_distinct" | "nunique" => Ok(Reducer::CountDistinct),
            _ => Err(UnknownLabel(s.to_string())),
        }
    }
}

/// Identifies one group. Dimensions not grouped on are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<Month>,
}

impl GroupKey {
    pub fn location(location: impl Into<String>) -> Self {
        GroupKey {
            location: Some(location.into()),
            year: None,
            month: None,
        }
    }

    pub fn year(year: i32) -> Self {
        GroupKey {
            location: None,
            year: Some(year),
            month: None,
        }
    }

    pub fn month(month: Month) -> Self {
        GroupKey {
            location: None,
            year: None,
            month: Some(month),
        }
    }

    /// Human readable label, e.g. `ParkA / 2023 / January`.
    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if let Some(location) = &self.location {
            parts.push(location.clone());
        }
        if let Some(year) = self.year {
            parts.push(year.to_string());
        }
        if let Some(month) = self.month {
            parts.push(month.to_string());
        }
        if parts.is_empty() {
            "all".to_string()
        } else {
            parts.join(" / ")
        }
    }
}

/// One reduced group, flattened for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupValue {
    #[serde(flatten)]
    pub key: GroupKey,
    pub value: f64,
}

/// The result of [`aggregate`]: one value per non-empty group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateSummary {
    pub metric: Metric,
    pub reducer: Reducer,
    groups: BTreeMap<GroupKey, f64>,
}

impl AggregateSummary {
    pub fn get(&self, key: &GroupKey) -> Option<f64> {
        self.groups.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in key order (calendar order for months).
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, f64)> {
        self.groups.iter().map(|(key, value)| (key, *value))
    }

    pub fn entries(&self) -> Vec<GroupValue> {
        self.iter()
            .map(|(key, value)| GroupValue {
                key: key.clone(),
                value,
            })
            .collect()
    }

    /// Groups ordered by ascending value, ties broken by key.
    pub fn sorted_by_value(&self) -> Vec<GroupValue> {
        let mut entries = self.entries();
        entries.sort_by(|a, b| a.value.total_cmp(&b.value).then_with(|| a.key.cmp(&b.key)));
        entries
    }

    /// The single overall value when grouped on nothing.
    pub fn overall(&self) -> Option<f64> {
        self.get(&GroupKey::default())
    }
}

/// Group `observations` and reduce `metric` within each group.
///
/// Non-finite values do not contribute, and a group left with no values
/// is omitted rather than reported as zero.
pub fn aggregate(
    observations: &[Observation],
    group_by: GroupBy,
    metric: Metric,
    reducer: Reducer,
) -> AggregateSummary {
    let mut buckets: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for observation in observations {
        let value = observation.value(metric);
        if !value.is_finite() {
            continue;
        }
        buckets
            .entry(group_by.key(observation))
            .or_default()
            .push(value);
    }
    let groups = buckets
        .into_iter()
        .filter_map(|(key, values)| reducer.reduce(&values).map(|v| (key, v)))
        .collect();
    AggregateSummary {
        metric,
        reducer,
        groups,
    }
}

/// Distinct locations, sorted.
pub fn distinct_locations(observations: &[Observation]) -> Vec<String> {
    observations
        .iter()
        .map(|o| o.location.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years, ascending.
pub fn distinct_years(observations: &[Observation]) -> Vec<i32> {
    observations
        .iter()
        .map(|o| o.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
