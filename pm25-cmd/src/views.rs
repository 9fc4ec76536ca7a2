//! One function per report view.

use crate::render::{emit, Table};
use crate::OutputFormat;
use anyhow::Context;
use pm25_data::aggregate::{distinct_locations, distinct_years, Dimension, GroupKey, GroupValue};
use pm25_data::distribution::{distribution_by, metric_distribution, BoxStats, GroupDistribution};
use pm25_data::filter::FilterCriteria;
use pm25_data::forecast::{forecast as run_forecast, yearly_series, ModelForecast, YearValue};
use pm25_data::risk::{map_center, risk_map, ParkRisk, RiskLevel};
use pm25_data::summary::{
    average_view, compare_locations, exceedance_by_month, monthly_trend_by_year, summary_metrics,
};
use pm25_park::month::Month;
use pm25_park::observation::{Metric, Observation};
use pm25_utils::format::{format_pm25, format_value};
use serde::Serialize;
use std::io::Write;

pub const NO_DATA_NOTICE: &str = "No data matches the selected filters.";

fn key_cells(key: &GroupKey) -> Vec<String> {
    let mut cells = Vec::new();
    if let Some(location) = &key.location {
        cells.push(location.clone());
    }
    if let Some(year) = key.year {
        cells.push(year.to_string());
    }
    if let Some(month) = key.month {
        cells.push(month.to_string());
    }
    cells
}

fn group_table(headers: &[&str], groups: &[GroupValue]) -> Table {
    let mut table = Table::new(headers.iter().copied());
    for group in groups {
        let mut row = key_cells(&group.key);
        row.push(format_value(Some(group.value)));
        table.push_row(row);
    }
    table
}

#[derive(Serialize)]
struct MonthOption {
    code: &'static str,
    name: &'static str,
    thai_name: &'static str,
}

#[derive(Serialize)]
struct FilterOptions {
    locations: Vec<String>,
    years: Vec<i32>,
    months: Vec<MonthOption>,
}

pub fn options<W: Write>(
    observations: &[Observation],
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let options = FilterOptions {
        locations: distinct_locations(observations),
        years: distinct_years(observations),
        months: Month::ALL
            .iter()
            .map(|m| MonthOption {
                code: m.code(),
                name: m.english_name(),
                thai_name: m.thai_name(),
            })
            .collect(),
    };
    emit(&options, format, out, || {
        let mut table = Table::new(["dimension", "values"]);
        table.push_row(["location".to_string(), options.locations.join(", ")]);
        let years: Vec<String> = options.years.iter().map(|y| y.to_string()).collect();
        table.push_row(["year".to_string(), years.join(", ")]);
        let months: Vec<&str> = options.months.iter().map(|m| m.code).collect();
        table.push_row(["month".to_string(), months.join(", ")]);
        table
    })
}

pub fn summary<W: Write>(
    filtered: &[Observation],
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let metrics = summary_metrics(filtered);
    emit(&metrics, format, out, || {
        let mut table = Table::new(["metric", "value"]);
        table.push_row(["mean PM2.5".to_string(), format_pm25(metrics.mean_average)]);
        table.push_row(["highest".to_string(), format_pm25(metrics.max_highest)]);
        table.push_row([
            "days above standard".to_string(),
            format!("{:.0}", metrics.total_exceeding_days),
        ]);
        table.push_row(["parks".to_string(), metrics.locations.to_string()]);
        table.push_row(["observations".to_string(), metrics.observations.to_string()]);
        table
    })
}

pub fn average<W: Write>(
    filtered: &[Observation],
    criteria: &FilterCriteria,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let view = average_view(filtered, criteria);
    let headers: &[&str] = match criteria.location.value() {
        None => &["location", "mean PM2.5"],
        Some(_) => &["month", "mean PM2.5"],
    };
    emit(&view, format, out, || group_table(headers, view.groups()))
}

pub fn trend<W: Write>(
    filtered: &[Observation],
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    match monthly_trend_by_year(filtered) {
        Some(groups) => emit(&groups, format, out, || {
            group_table(&["year", "month", "mean PM2.5"], &groups)
        }),
        None => {
            writeln!(out, "Trend by year needs more than one year of data.")?;
            Ok(())
        }
    }
}

pub fn compare<W: Write>(
    filtered: &[Observation],
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let Some(rows) = compare_locations(filtered) else {
        writeln!(out, "Comparison needs more than one location.")?;
        return Ok(());
    };
    emit(&rows, format, out, || {
        let mut table = Table::new(["location", "mean", "highest", "lowest", "days above"]);
        for row in &rows {
            table.push_row([
                row.location.clone(),
                format_value(row.mean_average),
                format_value(row.max_highest),
                format_value(row.min_lowest),
                format_value(row.total_exceeding_days),
            ]);
        }
        table
    })
}

#[derive(Serialize)]
struct DistributionReport {
    by: Dimension,
    metric: Metric,
    groups: Option<Vec<GroupDistribution>>,
    metrics: Vec<MetricStats>,
}

#[derive(Serialize)]
struct MetricStats {
    metric: Metric,
    #[serde(flatten)]
    stats: BoxStats,
}

fn box_row(label: String, stats: &BoxStats) -> Vec<String> {
    let outliers: Vec<String> = stats.outliers.iter().map(|v| format!("{:.1}", v)).collect();
    vec![
        label,
        stats.count.to_string(),
        format!("{:.1}", stats.min),
        format!("{:.1}", stats.q1),
        format!("{:.1}", stats.median),
        format!("{:.1}", stats.q3),
        format!("{:.1}", stats.max),
        format!("{:.1}..{:.1}", stats.lower_whisker, stats.upper_whisker),
        outliers.join(" "),
    ]
}

const BOX_HEADERS: [&str; 9] = [
    "group", "n", "min", "q1", "median", "q3", "max", "whiskers", "outliers",
];

pub fn distribution<W: Write>(
    filtered: &[Observation],
    by: Dimension,
    metric: Metric,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let report = DistributionReport {
        by,
        metric,
        groups: distribution_by(filtered, by, metric),
        metrics: metric_distribution(filtered)
            .into_iter()
            .map(|(metric, stats)| MetricStats { metric, stats })
            .collect(),
    };
    if format == OutputFormat::Json {
        return emit(&report, format, out, Table::default);
    }

    match &report.groups {
        Some(groups) => {
            let mut table = Table::new(BOX_HEADERS);
            for group in groups {
                table.push_row(box_row(group.key.label(), &group.stats));
            }
            table.write_to(out)?;
        }
        None => writeln!(out, "Distribution by {:?} needs more than one group.", by)?,
    }
    writeln!(out)?;
    let mut table = Table::new(BOX_HEADERS);
    for entry in &report.metrics {
        table.push_row(box_row(entry.metric.to_string(), &entry.stats));
    }
    table.write_to(out)?;
    Ok(())
}

pub fn exceedance<W: Write>(
    filtered: &[Observation],
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let groups = exceedance_by_month(filtered);
    emit(&groups, format, out, || group_table(&["month", "days above"], &groups))
}

#[derive(Serialize)]
struct RiskMap {
    center: Option<(f64, f64)>,
    parks: Vec<ParkRisk>,
}

pub fn map<W: Write>(
    filtered: &[Observation],
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let parks = risk_map(filtered);
    let report = RiskMap {
        center: map_center(&parks),
        parks,
    };
    emit(&report, format, out, || {
        let mut table = Table::new(["park", "lat", "lon", "mean PM2.5", "risk", "ระดับ"]);
        for park in &report.parks {
            table.push_row([
                park.name.clone(),
                format!("{:.4}", park.latitude),
                format!("{:.4}", park.longitude),
                format_value(park.mean_average),
                park.level.label().to_string(),
                park.level.thai_label().to_string(),
            ]);
        }
        table
    })
}

pub fn table<W: Write>(
    filtered: &[Observation],
    limit: Option<usize>,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let rows = &filtered[..limit.unwrap_or(filtered.len()).min(filtered.len())];
    emit(rows, format, out, || {
        let mut table = Table::new([
            "location",
            "year",
            "month",
            "lowest",
            "highest",
            "average",
            "days",
            "highest band",
            "average band",
        ]);
        for o in rows {
            table.push_row([
                o.location.clone(),
                o.year.to_string(),
                o.month.thai_name().to_string(),
                format_value(Some(o.lowest)),
                format_value(Some(o.highest)),
                format_value(Some(o.average)),
                format!("{:.0}", o.exceeding_days),
                RiskLevel::classify(Some(o.highest)).label().to_string(),
                RiskLevel::classify(Some(o.average)).label().to_string(),
            ]);
        }
        table
    })
}

#[derive(Serialize)]
struct ForecastReport {
    series: Vec<YearValue>,
    models: Vec<ModelForecast>,
}

pub fn forecast<W: Write>(
    filtered: &[Observation],
    horizon: usize,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let series = yearly_series(filtered);
    let models = run_forecast(&series, horizon).context("Failed to forecast yearly PM2.5")?;
    let report = ForecastReport { series, models };
    if format == OutputFormat::Json {
        return emit(&report, format, out, Table::default);
    }

    let mut metrics = Table::new(["model", "r2", "mae", "rmse"]);
    for model in &report.models {
        metrics.push_row([
            model.model.to_string(),
            model
                .metrics
                .r2
                .map_or("-".to_string(), |r2| format!("{:.3}", r2)),
            format!("{:.2}", model.metrics.mae),
            format!("{:.2}", model.metrics.rmse),
        ]);
    }
    metrics.write_to(out)?;
    writeln!(out)?;

    let mut headers = vec!["year".to_string(), "observed".to_string()];
    headers.extend(report.models.iter().map(|m| m.model.to_string()));
    let mut projection = Table::new(headers);
    for point in &report.series {
        let mut row = vec![point.year.to_string(), format_value(Some(point.value))];
        row.extend(report.models.iter().map(|_| String::new()));
        projection.push_row(row);
    }
    for step in 0..horizon {
        let Some(year) = report.models.first().map(|m| m.projection[step].year) else {
            break;
        };
        let mut row = vec![year.to_string(), String::new()];
        row.extend(
            report
                .models
                .iter()
                .map(|m| format_value(Some(m.projection[step].value))),
        );
        projection.push_row(row);
    }
    projection.write_to(out)?;
    Ok(())
}
