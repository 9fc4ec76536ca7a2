//! Trend models over the yearly mean PM2.5 series.
//!
//! Each model is evaluated on a chronological hold-out (the most recent
//! fifth of the years), then refit on the whole series to project the
//! years that follow the last observation. Projections therefore come from
//! the refit models, not from the models fit on the training split alone.

use crate::aggregate::{aggregate, GroupBy, Reducer};
use log::{debug, info};
use pm25_park::observation::{Metric, Observation};
use serde::Serialize;
use thiserror::Error;

/// Number of years projected past the last observed year.
pub const DEFAULT_HORIZON: usize = 4;

/// Longest projection accepted, in years.
pub const MAX_HORIZON: usize = 50;

/// Share of the series held out for evaluation.
pub const TEST_FRACTION: f64 = 0.2;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    #[error("not enough data: {needed} yearly points required, {available} available")]
    InsufficientData { needed: usize, available: usize },

    #[error("cannot fit a trend: every point has the same year")]
    DegenerateSeries,

    #[error(
        "cannot project {horizon} years past {last_year}: at most {} years within the calendar range",
        MAX_HORIZON
    )]
    HorizonOutOfRange { last_year: i32, horizon: usize },
}

pub type Result<T> = std::result::Result<T, ForecastError>;

/// One point of the yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearValue {
    pub year: i32,
    pub value: f64,
}

/// Mean monthly average per year, oldest year first.
pub fn yearly_series(observations: &[Observation]) -> Vec<YearValue> {
    aggregate(observations, GroupBy::YEAR, Metric::Average, Reducer::Mean)
        .iter()
        .filter_map(|(key, value)| key.year.map(|year| YearValue { year, value }))
        .collect()
}

/// Common interface of the trend models.
pub trait Predictor {
    fn name(&self) -> &'static str;

    /// Fit on a series sorted by year.
    fn fit(&mut self, series: &[YearValue]) -> Result<()>;

    /// Predicted value for each year, in the order given.
    fn predict(&self, years: &[i32]) -> Vec<f64>;
}

fn require(series: &[YearValue], needed: usize) -> Result<()> {
    if series.len() < needed {
        Err(ForecastError::InsufficientData {
            needed,
            available: series.len(),
        })
    } else {
        Ok(())
    }
}

/// Ordinary least squares of value on year.
#[derive(Debug, Clone, Default)]
pub struct LinearTrend {
    slope: f64,
    intercept: f64,
}

impl Predictor for LinearTrend {
    fn name(&self) -> &'static str {
        "linear_trend"
    }

    fn fit(&mut self, series: &[YearValue]) -> Result<()> {
        require(series, 2)?;
        let n = series.len() as f64;
        let mean_x = series.iter().map(|p| p.year as f64).sum::<f64>() / n;
        let mean_y = series.iter().map(|p| p.value).sum::<f64>() / n;
        let mut sxx = 0.0;
        let mut sxy = 0.0;
        for point in series {
            let dx = point.year as f64 - mean_x;
            sxx += dx * dx;
            sxy += dx * (point.value - mean_y);
        }
        if sxx == 0.0 {
            return Err(ForecastError::DegenerateSeries);
        }
        self.slope = sxy / sxx;
        self.intercept = mean_y - self.slope * mean_x;
        Ok(())
    }

    fn predict(&self, years: &[i32]) -> Vec<f64> {
        years
            .iter()
            .map(|year| self.intercept + self.slope * *year as f64)
            .collect()
    }
}

/// Last value carried forward along the mean year-over-year change.
#[derive(Debug, Clone, Default)]
pub struct Drift {
    last_year: i32,
    last_value: f64,
    step: f64,
}

impl Predictor for Drift {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn fit(&mut self, series: &[YearValue]) -> Result<()> {
        require(series, 2)?;
        let first = series[0];
        let last = series[series.len() - 1];
        if last.year == first.year {
            return Err(ForecastError::DegenerateSeries);
        }
        self.last_year = last.year;
        self.last_value = last.value;
        self.step = (last.value - first.value) / (f64::from(last.year) - f64::from(first.year));
        Ok(())
    }

    fn predict(&self, years: &[i32]) -> Vec<f64> {
        years
            .iter()
            .map(|year| {
                self.last_value + self.step * (f64::from(*year) - f64::from(self.last_year))
            })
            .collect()
    }
}

/// Constant prediction at the training mean.
#[derive(Debug, Clone, Default)]
pub struct MeanBaseline {
    mean: f64,
}

impl Predictor for MeanBaseline {
    fn name(&self) -> &'static str {
        "mean_baseline"
    }

    fn fit(&mut self, series: &[YearValue]) -> Result<()> {
        require(series, 1)?;
        self.mean = series.iter().map(|p| p.value).sum::<f64>() / series.len() as f64;
        Ok(())
    }

    fn predict(&self, years: &[i32]) -> Vec<f64> {
        vec![self.mean; years.len()]
    }
}

/// Hold-out error of a fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorMetrics {
    /// Coefficient of determination; `None` with fewer than two test points.
    pub r2: Option<f64>,
    pub mae: f64,
    pub rmse: f64,
}

impl ErrorMetrics {
    pub fn compute(actual: &[f64], predicted: &[f64]) -> ErrorMetrics {
        let n = actual.len() as f64;
        let residuals: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| a - p).collect();
        let mae = residuals.iter().map(|r| r.abs()).sum::<f64>() / n;
        let ss_res: f64 = residuals.iter().map(|r| r * r).sum();
        let rmse = (ss_res / n).sqrt();

        let r2 = if actual.len() < 2 {
            None
        } else {
            let mean = actual.iter().sum::<f64>() / n;
            let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
            if ss_tot == 0.0 {
                Some(if ss_res == 0.0 { 1.0 } else { 0.0 })
            } else {
                Some(1.0 - ss_res / ss_tot)
            }
        };
        ErrorMetrics { r2, mae, rmse }
    }
}

/// Chronological split: the last `ceil(0.2 n)` points are the test set.
pub fn train_test_split(series: &[YearValue]) -> (&[YearValue], &[YearValue]) {
    let test_len = (series.len() as f64 * TEST_FRACTION).ceil() as usize;
    series.split_at(series.len() - test_len)
}

/// One model's evaluation and projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelForecast {
    pub model: &'static str,
    pub metrics: ErrorMetrics,
    pub projection: Vec<YearValue>,
}

fn evaluate(
    model: &mut dyn Predictor,
    series: &[YearValue],
    future_years: &[i32],
) -> Result<ModelForecast> {
    let (train, test) = train_test_split(series);
    require(train, 2)?;
    model.fit(train)?;
    let test_years: Vec<i32> = test.iter().map(|p| p.year).collect();
    let actual: Vec<f64> = test.iter().map(|p| p.value).collect();
    let metrics = ErrorMetrics::compute(&actual, &model.predict(&test_years));
    debug!("{} hold-out metrics: {:?}", model.name(), metrics);

    model.fit(series)?;
    let projection = future_years
        .iter()
        .zip(model.predict(future_years))
        .map(|(year, value)| YearValue { year: *year, value })
        .collect();
    Ok(ModelForecast {
        model: model.name(),
        metrics,
        projection,
    })
}

/// The `horizon` years following `last_year`.
pub fn future_years(last_year: i32, horizon: usize) -> Result<Vec<i32>> {
    let out_of_range = ForecastError::HorizonOutOfRange { last_year, horizon };
    if horizon > MAX_HORIZON {
        return Err(out_of_range);
    }
    let steps = i32::try_from(horizon).map_err(|_| out_of_range.clone())?;
    if last_year.checked_add(steps).is_none() {
        return Err(out_of_range);
    }
    Ok((1..=steps).map(|ahead| last_year + ahead).collect())
}

/// Evaluate every model and project `horizon` years past the series.
///
/// `series` must be sorted by year. Results are ordered best R² first.
pub fn forecast(series: &[YearValue], horizon: usize) -> Result<Vec<ModelForecast>> {
    require(series, 3)?;
    let last_year = series[series.len() - 1].year;
    let future_years = future_years(last_year, horizon)?;

    let mut models: Vec<Box<dyn Predictor>> = vec![
        Box::new(LinearTrend::default()),
        Box::new(Drift::default()),
        Box::new(MeanBaseline::default()),
    ];
    let mut results = Vec::with_capacity(models.len());
    for model in models.iter_mut() {
        results.push(evaluate(model.as_mut(), series, &future_years)?);
    }
    results.sort_by(|a, b| {
        let a = a.metrics.r2.unwrap_or(f64::NEG_INFINITY);
        let b = b.metrics.r2.unwrap_or(f64::NEG_INFINITY);
        b.total_cmp(&a)
    });
    info!(
        "Forecast {} years from {} yearly points, best model {}",
        horizon,
        series.len(),
        results[0].model
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pm25_park::month::Month;

    fn series(points: &[(i32, f64)]) -> Vec<YearValue> {
        points
            .iter()
            .map(|(year, value)| YearValue {
                year: *year,
                value: *value,
            })
            .collect()
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_linear_trend_recovers_exact_line() {
        let data = series(&[(2019, 30.0), (2020, 32.0), (2021, 34.0), (2022, 36.0)]);
        let mut model = LinearTrend::default();
        model.fit(&data).unwrap();
        let predicted = model.predict(&[2023, 2030]);
        assert_close(predicted[0], 38.0);
        assert_close(predicted[1], 52.0);
    }

    #[test]
    fn test_linear_trend_degenerate() {
        let data = series(&[(2020, 30.0), (2020, 40.0)]);
        assert_eq!(
            LinearTrend::default().fit(&data),
            Err(ForecastError::DegenerateSeries)
        );
    }

    #[test]
    fn test_drift_and_baseline() {
        let data = series(&[(2020, 10.0), (2021, 20.0), (2023, 40.0)]);
        let mut drift = Drift::default();
        drift.fit(&data).unwrap();
        assert_close(drift.predict(&[2024])[0], 50.0);

        let mut baseline = MeanBaseline::default();
        baseline.fit(&data).unwrap();
        assert_eq!(baseline.predict(&[2024, 2025]), vec![70.0 / 3.0; 2]);
    }

    #[test]
    fn test_train_test_split_sizes() {
        let five = series(&[(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0), (5, 1.0)]);
        let (train, test) = train_test_split(&five);
        assert_eq!((train.len(), test.len()), (4, 1));
        assert_eq!(test[0].year, 5);

        let six = series(&[(1, 1.0), (2, 1.0), (3, 1.0), (4, 1.0), (5, 1.0), (6, 1.0)]);
        let (train, test) = train_test_split(&six);
        assert_eq!((train.len(), test.len()), (4, 2));
    }

    #[test]
    fn test_error_metrics() {
        let metrics = ErrorMetrics::compute(&[10.0, 20.0], &[12.0, 18.0]);
        assert_close(metrics.mae, 2.0);
        assert_close(metrics.rmse, 2.0);
        assert_close(metrics.r2.unwrap(), 1.0 - 8.0 / 50.0);

        let single = ErrorMetrics::compute(&[10.0], &[7.0]);
        assert_eq!(single.r2, None);
        assert_close(single.mae, 3.0);
    }

    #[test]
    fn test_forecast_projects_four_years_best_first() {
        let data = series(&[
            (2018, 20.0),
            (2019, 22.0),
            (2020, 24.0),
            (2021, 26.0),
            (2022, 28.0),
            (2023, 30.0),
        ]);
        let results = forecast(&data, DEFAULT_HORIZON).unwrap();
        assert_eq!(results.len(), 3);
        // linear trend and drift both fit an exact line perfectly
        assert_close(results[0].metrics.r2.unwrap(), 1.0);
        assert_eq!(results.last().unwrap().model, "mean_baseline");

        let linear = results.iter().find(|r| r.model == "linear_trend").unwrap();
        let years: Vec<i32> = linear.projection.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2024, 2025, 2026, 2027]);
        assert_close(linear.projection[3].value, 38.0);
    }

    #[test]
    fn test_forecast_needs_three_points() {
        let data = series(&[(2022, 20.0), (2023, 30.0)]);
        assert_eq!(
            forecast(&data, DEFAULT_HORIZON),
            Err(ForecastError::InsufficientData {
                needed: 3,
                available: 2
            })
        );
    }

    #[test]
    fn test_yearly_series_from_observations() {
        let obs = |year, average| Observation {
            location: "ParkA".into(),
            year,
            month: Month::Jan,
            lowest: 0.0,
            highest: 0.0,
            average,
            exceeding_days: 0.0,
        };
        let observations = vec![obs(2024, 30.0), obs(2023, 20.0), obs(2023, 40.0)];
        assert_eq!(
            yearly_series(&observations),
            series(&[(2023, 30.0), (2024, 30.0)])
        );
    }

    #[test]
    fn test_future_years() {
        assert_eq!(future_years(2023, 4).unwrap(), vec![2024, 2025, 2026, 2027]);
        assert!(future_years(2023, 0).unwrap().is_empty());
        assert_eq!(future_years(2023, MAX_HORIZON).unwrap().len(), MAX_HORIZON);
        assert_eq!(
            future_years(2023, MAX_HORIZON + 1),
            Err(ForecastError::HorizonOutOfRange {
                last_year: 2023,
                horizon: MAX_HORIZON + 1
            })
        );
        assert!(future_years(2023, 4_294_967_297).is_err());
        assert!(future_years(i32::MAX - 1, 1).is_ok());
        assert!(future_years(i32::MAX - 1, 2).is_err());
    }

    #[test]
    fn test_forecast_near_calendar_limit_is_an_error() {
        let data = series(&[
            (i32::MAX - 2, 20.0),
            (i32::MAX - 1, 22.0),
            (i32::MAX, 24.0),
        ]);
        assert_eq!(
            forecast(&data, DEFAULT_HORIZON),
            Err(ForecastError::HorizonOutOfRange {
                last_year: i32::MAX,
                horizon: DEFAULT_HORIZON
            })
        );
    }

    #[test]
    fn test_forecast_rejects_oversized_horizon() {
        let data = series(&[(2021, 20.0), (2022, 22.0), (2023, 24.0)]);
        assert!(matches!(
            forecast(&data, 4_294_967_297),
            Err(ForecastError::HorizonOutOfRange { .. })
        ));
    }

    #[test]
    fn test_drift_across_wide_year_span() {
        let data = series(&[(i32::MIN, 0.0), (i32::MAX, 10.0)]);
        let mut drift = Drift::default();
        drift.fit(&data).unwrap();
        assert_close(drift.predict(&[i32::MAX])[0], 10.0);
    }
}
