//! Plot builders. Dates are plotted as days since the Unix epoch.

use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, Polygon};
use price_forecast::models::decomposition::HOLIDAYS;
use price_forecast::utils::{date_from_days, days_since_epoch};
use price_forecast::{PipelineOutput, PriceSeries};

const PLOT_HEIGHT: f32 = 320.0;
const COMPONENT_HEIGHT: f32 = 180.0;
/// Upper bound on polygons drawn for a confidence band
const MAX_BAND_SEGMENTS: usize = 400;

const OPEN_COLOR: Color32 = Color32::from_rgb(31, 119, 180);
const CLOSE_COLOR: Color32 = Color32::from_rgb(255, 127, 14);
const FORECAST_COLOR: Color32 = Color32::from_rgb(0, 114, 178);
const BAND_COLOR: Color32 = Color32::from_rgba_premultiplied(0, 45, 70, 70);
const OBSERVED_COLOR: Color32 = Color32::from_rgb(40, 40, 40);

pub fn day_x(date: NaiveDate) -> f64 {
    days_since_epoch(date) as f64
}

/// Axis label for an x value in epoch days
pub fn format_day(x: f64) -> String {
    date_from_days(x.round() as i64)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn date_points(dates: &[NaiveDate], values: &[f64]) -> Vec<[f64; 2]> {
    dates
        .iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(d, v)| [day_x(*d), *v])
        .collect()
}

/// Convex quads covering the band between `lower` and `upper`
pub fn band_segments(dates: &[NaiveDate], intervals: &[(f64, f64)]) -> Vec<Vec<[f64; 2]>> {
    let n = dates.len().min(intervals.len());
    if n < 2 {
        return Vec::new();
    }

    let step = n.div_ceil(MAX_BAND_SEGMENTS).max(1);
    let mut knots: Vec<usize> = (0..n).step_by(step).collect();
    if knots.last() != Some(&(n - 1)) {
        knots.push(n - 1);
    }

    knots
        .windows(2)
        .map(|w| {
            let (a, b) = (w[0], w[1]);
            vec![
                [day_x(dates[a]), intervals[a].0],
                [day_x(dates[b]), intervals[b].0],
                [day_x(dates[b]), intervals[b].1],
                [day_x(dates[a]), intervals[a].1],
            ]
        })
        .collect()
}

/// X axis label of a seasonal profile point
pub fn profile_label(name: &str, date: NaiveDate) -> String {
    match name {
        "weekly" => date.weekday().to_string(),
        "yearly" => date.format("%B %d").to_string(),
        _ => format!("day {}", date.ordinal()),
    }
}

fn date_plot(id: &str, height: f32) -> Plot<'static> {
    Plot::new(id.to_string())
        .height(height)
        .legend(Legend::default())
        .x_axis_formatter(|mark, _range| format_day(mark.value))
}

/// Open and close prices of the visible window
pub fn show_price_chart(ui: &mut Ui, id: &str, series: &PriceSeries) {
    let (dates, opens, closes) = match (series.dates(), series.opens(), series.closes()) {
        (Ok(d), Ok(o), Ok(c)) => (d, o, c),
        _ => {
            ui.label("Price columns unavailable");
            return;
        }
    };

    ui.label("Time Series data with Rangeslider");
    date_plot(id, PLOT_HEIGHT).show(ui, |plot_ui| {
        plot_ui.line(
            Line::new("stock_open", PlotPoints::new(date_points(&dates, &opens))).color(OPEN_COLOR),
        );
        plot_ui.line(
            Line::new("stock_close", PlotPoints::new(date_points(&dates, &closes)))
                .color(CLOSE_COLOR),
        );
    });
}

/// Observed points, point forecast and its uncertainty band
pub fn show_forecast_chart(ui: &mut Ui, id: &str, output: &PipelineOutput) {
    let forecast = &output.forecast;
    let observed: Vec<[f64; 2]> = match output.training.points() {
        Ok(points) => points
            .into_iter()
            .filter_map(|(d, v)| v.map(|v| [day_x(d), v]))
            .collect(),
        Err(e) => {
            log::warn!("No observed points for {}: {}", output.ticker, e);
            Vec::new()
        }
    };

    date_plot(id, PLOT_HEIGHT).show(ui, |plot_ui| {
        for (i, quad) in band_segments(forecast.dates(), forecast.intervals())
            .into_iter()
            .enumerate()
        {
            // one legend entry for the whole band
            let name = if i == 0 { "uncertainty" } else { "" };
            plot_ui.polygon(
                Polygon::new(name, PlotPoints::new(quad))
                    .fill_color(BAND_COLOR)
                    .stroke(Stroke::NONE),
            );
        }
        plot_ui.points(
            Points::new("y", PlotPoints::new(observed))
                .radius(1.5)
                .color(OBSERVED_COLOR),
        );
        plot_ui.line(
            Line::new(
                "yhat",
                PlotPoints::new(date_points(forecast.dates(), forecast.values())),
            )
            .color(FORECAST_COLOR),
        );
    });
}

/// Trend, one chart per seasonality and the holiday effect
pub fn show_components(ui: &mut Ui, id: &str, output: &PipelineOutput) {
    let forecast = &output.forecast;

    ui.label("trend");
    date_plot(&format!("{}_trend", id), COMPONENT_HEIGHT).show(ui, |plot_ui| {
        plot_ui.line(
            Line::new(
                "trend",
                PlotPoints::new(date_points(forecast.dates(), forecast.trend())),
            )
            .color(FORECAST_COLOR),
        );
    });

    for name in output.model.seasonality_names() {
        let profile = match output.model.seasonality_profile(name) {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("Skipping {} profile: {}", name, e);
                continue;
            }
        };
        let points: Vec<[f64; 2]> = profile
            .iter()
            .enumerate()
            .map(|(i, (_, v))| [i as f64, *v])
            .collect();
        let labels: Vec<String> = profile.iter().map(|(d, _)| profile_label(name, *d)).collect();

        ui.label(name);
        Plot::new(format!("{}_{}", id, name))
            .height(COMPONENT_HEIGHT)
            .x_axis_formatter(move |mark, _range| {
                labels
                    .get(mark.value.round().max(0.0) as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(name, PlotPoints::new(points)).color(FORECAST_COLOR));
            });
    }

    if let Some(holidays) = forecast.component(HOLIDAYS) {
        ui.label(HOLIDAYS);
        date_plot(&format!("{}_holidays", id), COMPONENT_HEIGHT).show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(HOLIDAYS, PlotPoints::new(date_points(forecast.dates(), holidays)))
                    .color(FORECAST_COLOR),
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_day_axis_round_trip() {
        assert_eq!(format_day(day_x(day(15))), "2024-01-15");
        assert_eq!(format_day(day_x(day(15)) + 0.4), "2024-01-15");
    }

    #[test]
    fn test_band_segments_cover_range() {
        let dates: Vec<NaiveDate> = (1..=10).map(day).collect();
        let intervals: Vec<(f64, f64)> = (0..10).map(|i| (i as f64, i as f64 + 2.0)).collect();

        let segments = band_segments(&dates, &intervals);

        assert_eq!(segments.len(), 9);
        assert_eq!(segments[0][0], [day_x(day(1)), 0.0]);
        assert_eq!(segments[8][2], [day_x(day(10)), 11.0]);
        assert!(band_segments(&dates[..1], &intervals[..1]).is_empty());
    }

    #[test]
    fn test_band_segments_are_capped() {
        let start = day(1);
        let dates: Vec<NaiveDate> = (0..5000)
            .map(|i| start + chrono::Days::new(i))
            .collect();
        let intervals = vec![(0.0, 1.0); 5000];

        let segments = band_segments(&dates, &intervals);

        assert!(segments.len() <= MAX_BAND_SEGMENTS + 1);
        assert_eq!(segments.last().unwrap()[1][0], day_x(dates[4999]));
    }

    #[test]
    fn test_profile_labels() {
        // 2017-01-01 was a Sunday
        let origin = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        assert_eq!(profile_label("weekly", origin), "Sun");
        assert_eq!(profile_label("yearly", origin), "January 01");
        assert_eq!(profile_label("monthly", origin), "day 1");
    }

    #[test]
    fn test_date_points_skip_non_finite() {
        let points = date_points(&[day(1), day(2)], &[1.0, f64::NAN]);
        assert_eq!(points, vec![[day_x(day(1)), 1.0]]);
    }
}
