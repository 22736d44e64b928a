mod common;

use common::date;
use pretty_assertions::assert_eq;
use price_forecast::preprocess::{DS, Y};
use price_forecast::{to_training_frame, PriceBar, PriceSeries, TrainingFrame};
use polars::prelude::*;

fn series() -> PriceSeries {
    let bars = (1..=6)
        .map(|d| PriceBar {
            date: date(2023, 2, d),
            open: 10.0 * d as f64,
            high: 10.0 * d as f64 + 1.0,
            low: 10.0 * d as f64 - 1.0,
            close: 10.0 * d as f64 + 0.5,
            adj_close: 10.0 * d as f64,
            volume: d as u64,
        })
        .collect();
    PriceSeries::from_bars("GOOG", bars).unwrap()
}

#[test]
fn test_training_frame_keeps_rows_and_order() {
    let series = series();
    let frame = to_training_frame(&series).unwrap();

    assert_eq!(frame.column_names(), vec![DS, Y]);
    assert_eq!(frame.len(), series.len());
    assert_eq!(frame.dates().unwrap(), series.dates().unwrap());

    let values: Vec<f64> = frame.values().unwrap().into_iter().flatten().collect();
    assert_eq!(values, series.closes().unwrap());
}

#[test]
fn test_from_dataframe_requires_exact_columns() {
    let ok = DataFrame::new(vec![
        Series::new(DS, &["2023-01-01", "2023-01-02"]),
        Series::new(Y, &[Some(1.0), None]),
    ])
    .unwrap();
    let frame = TrainingFrame::from_dataframe(ok).unwrap();
    assert_eq!(frame.values().unwrap(), vec![Some(1.0), None]);

    let extra = DataFrame::new(vec![
        Series::new(DS, &["2023-01-01"]),
        Series::new(Y, &[1.0]),
        Series::new("cap", &[2.0]),
    ])
    .unwrap();
    assert!(TrainingFrame::from_dataframe(extra).is_err());

    let renamed = DataFrame::new(vec![
        Series::new("date", &["2023-01-01"]),
        Series::new(Y, &[1.0]),
    ])
    .unwrap();
    assert!(TrainingFrame::from_dataframe(renamed).is_err());
}

#[test]
fn test_non_finite_values_read_as_missing() {
    let frame = TrainingFrame::from_points(&[
        (date(2023, 1, 1), Some(1.0)),
        (date(2023, 1, 2), Some(f64::NAN)),
        (date(2023, 1, 3), None),
        (date(2023, 1, 4), Some(f64::INFINITY)),
    ])
    .unwrap();

    assert_eq!(frame.len(), 4);
    assert_eq!(frame.values().unwrap(), vec![Some(1.0), None, None, None]);
}
