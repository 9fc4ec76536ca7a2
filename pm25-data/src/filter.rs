//! Equality filters over the long observation table.

use pm25_park::month::Month;
use pm25_park::observation::Observation;
use serde::Serialize;

/// One filter dimension: either unrestricted or pinned to a value.
///
/// Using a variant instead of a sentinel string keeps a park that is
/// literally called "all" filterable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Selection<T> {
    All,
    Exactly(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Selection::Exactly(v),
            None => Selection::All,
        }
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Exactly(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    /// Conjunction of two selections; `None` when they contradict.
    pub fn and(self, other: Selection<T>) -> Option<Selection<T>> {
        match (self, other) {
            (Selection::All, other) => Some(other),
            (this, Selection::All) => Some(this),
            (Selection::Exactly(a), Selection::Exactly(b)) => {
                if a == b {
                    Some(Selection::Exactly(a))
                } else {
                    None
                }
            }
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Exactly(v) => Some(v),
        }
    }
}

/// Location, year and month restrictions applied together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct FilterCriteria {
    pub location: Selection<String>,
    pub year: Selection<i32>,
    pub month: Selection<Month>,
}

impl FilterCriteria {
    /// Criteria that keep every observation.
    pub fn all() -> Self {
        FilterCriteria::default()
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Selection::Exactly(location.into());
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Selection::Exactly(year);
        self
    }

    pub fn month(mut self, month: Month) -> Self {
        self.month = Selection::Exactly(month);
        self
    }

    pub fn matches(&self, observation: &Observation) -> bool {
        self.location.matches(&observation.location)
            && self.year.matches(&observation.year)
            && self.month.matches(&observation.month)
    }

    /// Field-wise conjunction.
    ///
    /// Returns `None` when both sides pin the same field to different
    /// values, i.e. when no observation could satisfy both.
    pub fn conjunction(&self, other: &FilterCriteria) -> Option<FilterCriteria> {
        Some(FilterCriteria {
            location: self.location.clone().and(other.location.clone())?,
            year: self.year.clone().and(other.year.clone())?,
            month: self.month.clone().and(other.month.clone())?,
        })
    }
}

/// Keep the observations matching `criteria`, preserving input order.
pub fn filter(observations: &[Observation], criteria: &FilterCriteria) -> Vec<Observation> {
    observations
        .iter()
        .filter(|observation| criteria.matches(observation))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{filter, FilterCriteria, Selection};
    use pm25_park::month::Month;
    use pm25_park::observation::Observation;

    fn obs(location: &str, year: i32, month: Month, average: f64) -> Observation {
        Observation {
            location: location.to_string(),
            year,
            month,
            lowest: average / 2.0,
            highest: average * 2.0,
            average,
            exceeding_days: 0.0,
        }
    }

    fn sample() -> Vec<Observation> {
        vec![
            obs("ParkB", 2023, Month::Mar, 30.0),
            obs("ParkA", 2023, Month::Jan, 20.0),
            obs("all", 2024, Month::Jan, 40.0),
            obs("ParkA", 2024, Month::Feb, 50.0),
            obs("ParkB", 2024, Month::Jan, 10.0),
        ]
    }

    #[test]
    fn test_no_criteria_is_identity() {
        let observations = sample();
        assert_eq!(filter(&observations, &FilterCriteria::all()), observations);
    }

    #[test]
    fn test_filter_is_stable_conjunction() {
        let observations = sample();
        let criteria = FilterCriteria::all().location("ParkB");
        let filtered = filter(&observations, &criteria);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].month, Month::Mar);
        assert_eq!(filtered[1].month, Month::Jan);

        let criteria = FilterCriteria::all().year(2024).month(Month::Jan);
        let filtered = filter(&observations, &criteria);
        let locations: Vec<&str> = filtered.iter().map(|o| o.location.as_str()).collect();
        assert_eq!(locations, vec!["all", "ParkB"]);
    }

    #[test]
    fn test_location_named_all_is_filterable() {
        let filtered = filter(&sample(), &FilterCriteria::all().location("all"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].average, 40.0);
    }

    #[test]
    fn test_empty_result_is_not_an_error() {
        let filtered = filter(&sample(), &FilterCriteria::all().year(1999));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_composition_of_disjoint_criteria() {
        let observations = sample();
        let pairs = vec![
            (FilterCriteria::all().location("ParkA"), FilterCriteria::all().year(2024)),
            (FilterCriteria::all().month(Month::Jan), FilterCriteria::all().location("ParkB")),
            (FilterCriteria::all().year(2023), FilterCriteria::all().month(Month::Mar)),
            (FilterCriteria::all(), FilterCriteria::all().year(2024).month(Month::Jan)),
        ];
        for (c1, c2) in pairs {
            let chained = filter(&filter(&observations, &c1), &c2);
            let combined = filter(&observations, &c1.conjunction(&c2).unwrap());
            assert_eq!(chained, combined);
        }
    }

    #[test]
    fn test_contradictory_conjunction() {
        let c1 = FilterCriteria::all().year(2023);
        let c2 = FilterCriteria::all().year(2024);
        assert!(c1.conjunction(&c2).is_none());
        assert!(filter(&filter(&sample(), &c1), &c2).is_empty());
    }

    #[test]
    fn test_selection_from_option() {
        assert_eq!(Selection::from(Some(3)), Selection::Exactly(3));
        assert_eq!(Selection::<i32>::from(None), Selection::All);
        assert!(Selection::<i32>::All.is_all());
        assert_eq!(Selection::Exactly(5).value(), Some(&5));
    }
}
