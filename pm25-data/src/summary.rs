//! Headline metrics and the per-panel views built on [`aggregate`].

use crate::aggregate::{
    aggregate, distinct_locations, distinct_years, GroupBy, GroupKey, GroupValue, Reducer,
};
use crate::filter::{FilterCriteria, Selection};
use pm25_park::observation::{Metric, Observation};
use serde::Serialize;

/// The four headline numbers shown above every view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub observations: usize,
    /// Mean of the monthly averages.
    pub mean_average: Option<f64>,
    /// Highest daily reading seen.
    pub max_highest: Option<f64>,
    /// Total days above the standard.
    pub total_exceeding_days: f64,
    pub locations: usize,
}

pub fn summary_metrics(observations: &[Observation]) -> SummaryMetrics {
    let overall = |metric, reducer| aggregate(observations, GroupBy::NONE, metric, reducer).overall();
    SummaryMetrics {
        observations: observations.len(),
        mean_average: overall(Metric::Average, Reducer::Mean),
        max_highest: overall(Metric::Highest, Reducer::Max),
        total_exceeding_days: overall(Metric::ExceedingDays, Reducer::Sum).unwrap_or(0.0),
        locations: distinct_locations(observations).len(),
    }
}

/// What the average panel shows for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AverageView {
    /// Mean average per location, lowest first.
    ByLocation { groups: Vec<GroupValue> },
    /// Mean average per month for the one selected location.
    MonthlyTrend { location: String, groups: Vec<GroupValue> },
}

impl AverageView {
    pub fn groups(&self) -> &[GroupValue] {
        match self {
            AverageView::ByLocation { groups } => groups,
            AverageView::MonthlyTrend { groups, .. } => groups,
        }
    }
}

/// Per-location bars unless a single location is selected, in which case
/// that location's monthly trend.
pub fn average_view(observations: &[Observation], criteria: &FilterCriteria) -> AverageView {
    match &criteria.location {
        Selection::All => AverageView::ByLocation {
            groups: aggregate(observations, GroupBy::LOCATION, Metric::Average, Reducer::Mean)
                .sorted_by_value(),
        },
        Selection::Exactly(location) => AverageView::MonthlyTrend {
            location: location.clone(),
            groups: aggregate(observations, GroupBy::MONTH, Metric::Average, Reducer::Mean)
                .entries(),
        },
    }
}

/// Mean average per (year, month), one line per year.
///
/// `None` unless the data spans more than one year.
pub fn monthly_trend_by_year(observations: &[Observation]) -> Option<Vec<GroupValue>> {
    if distinct_years(observations).len() <= 1 {
        return None;
    }
    Some(
        aggregate(
            observations,
            GroupBy::YEAR.and(GroupBy::MONTH),
            Metric::Average,
            Reducer::Mean,
        )
        .entries(),
    )
}

/// One row of the location comparison table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationComparison {
    pub location: String,
    pub mean_average: Option<f64>,
    pub max_highest: Option<f64>,
    pub min_lowest: Option<f64>,
    pub total_exceeding_days: Option<f64>,
}

/// Side-by-side statistics per location, sorted by location.
///
/// `None` unless more than one location is present.
pub fn compare_locations(observations: &[Observation]) -> Option<Vec<LocationComparison>> {
    let locations = distinct_locations(observations);
    if locations.len() <= 1 {
        return None;
    }
    let mean = aggregate(observations, GroupBy::LOCATION, Metric::Average, Reducer::Mean);
    let max = aggregate(observations, GroupBy::LOCATION, Metric::Highest, Reducer::Max);
    let min = aggregate(observations, GroupBy::LOCATION, Metric::Lowest, Reducer::Min);
    let days = aggregate(observations, GroupBy::LOCATION, Metric::ExceedingDays, Reducer::Sum);

    let rows = locations
        .into_iter()
        .map(|location| {
            let key = GroupKey::location(location.as_str());
            LocationComparison {
                mean_average: mean.get(&key),
                max_highest: max.get(&key),
                min_lowest: min.get(&key),
                total_exceeding_days: days.get(&key),
                location,
            }
        })
        .collect();
    Some(rows)
}

/// Total exceeding days per month, January first.
pub fn exceedance_by_month(observations: &[Observation]) -> Vec<GroupValue> {
    aggregate(observations, GroupBy::MONTH, Metric::ExceedingDays, Reducer::Sum).entries()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm25_park::month::Month;

    fn obs(location: &str, year: i32, month: Month, average: f64, days: f64) -> Observation {
        Observation {
            location: location.to_string(),
            year,
            month,
            lowest: average - 10.0,
            highest: average + 20.0,
            average,
            exceeding_days: days,
        }
    }

    fn sample() -> Vec<Observation> {
        vec![
            obs("ParkA", 2023, Month::Jan, 40.0, 5.0),
            obs("ParkA", 2023, Month::Feb, 60.0, 9.0),
            obs("ParkB", 2023, Month::Jan, 20.0, 0.0),
            obs("ParkB", 2024, Month::Mar, 30.0, 2.0),
        ]
    }

    #[test]
    fn test_summary_metrics() {
        let metrics = summary_metrics(&sample());
        assert_eq!(metrics.observations, 4);
        assert_eq!(metrics.mean_average, Some(37.5));
        assert_eq!(metrics.max_highest, Some(80.0));
        assert_eq!(metrics.total_exceeding_days, 16.0);
        assert_eq!(metrics.locations, 2);
    }

    #[test]
    fn test_summary_metrics_empty() {
        let metrics = summary_metrics(&[]);
        assert_eq!(metrics.mean_average, None);
        assert_eq!(metrics.max_highest, None);
        assert_eq!(metrics.total_exceeding_days, 0.0);
        assert_eq!(metrics.locations, 0);
    }

    #[test]
    fn test_average_view_by_location_sorted_ascending() {
        let view = average_view(&sample(), &FilterCriteria::all());
        let AverageView::ByLocation { groups } = view else {
            panic!("expected per-location view");
        };
        assert_eq!(groups[0].key.location.as_deref(), Some("ParkB"));
        assert_eq!(groups[0].value, 25.0);
        assert_eq!(groups[1].key.location.as_deref(), Some("ParkA"));
        assert_eq!(groups[1].value, 50.0);
    }

    #[test]
    fn test_average_view_for_one_location_is_monthly() {
        let criteria = FilterCriteria::all().location("ParkA");
        let filtered = crate::filter::filter(&sample(), &criteria);
        let view = average_view(&filtered, &criteria);
        assert!(matches!(&view, AverageView::MonthlyTrend { location, .. } if location == "ParkA"));
        let months: Vec<Option<Month>> = view.groups().iter().map(|g| g.key.month).collect();
        assert_eq!(months, vec![Some(Month::Jan), Some(Month::Feb)]);
    }

    #[test]
    fn test_monthly_trend_needs_several_years() {
        let one_year: Vec<Observation> = sample().into_iter().filter(|o| o.year == 2023).collect();
        assert!(monthly_trend_by_year(&one_year).is_none());

        let trend = monthly_trend_by_year(&sample()).unwrap();
        let keys: Vec<(Option<i32>, Option<Month>)> =
            trend.iter().map(|g| (g.key.year, g.key.month)).collect();
        assert_eq!(
            keys,
            vec![
                (Some(2023), Some(Month::Jan)),
                (Some(2023), Some(Month::Feb)),
                (Some(2024), Some(Month::Mar)),
            ]
        );
        assert_eq!(trend[0].value, 30.0);
    }

    #[test]
    fn test_compare_locations() {
        let only_a: Vec<Observation> = sample().into_iter().filter(|o| o.location == "ParkA").collect();
        assert!(compare_locations(&only_a).is_none());

        let rows = compare_locations(&sample()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].location, "ParkA");
        assert_eq!(rows[0].mean_average, Some(50.0));
        assert_eq!(rows[0].max_highest, Some(80.0));
        assert_eq!(rows[0].min_lowest, Some(30.0));
        assert_eq!(rows[0].total_exceeding_days, Some(14.0));
        assert_eq!(rows[1].location, "ParkB");
        assert_eq!(rows[1].min_lowest, Some(10.0));
    }

    #[test]
    fn test_exceedance_by_month() {
        let groups = exceedance_by_month(&sample());
        let pairs: Vec<(Option<Month>, f64)> = groups.iter().map(|g| (g.key.month, g.value)).collect();
        assert_eq!(
            pairs,
            vec![
                (Some(Month::Jan), 5.0),
                (Some(Month::Feb), 9.0),
                (Some(Month::Mar), 2.0),
            ]
        );
    }
}
