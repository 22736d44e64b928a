mod common;

use approx::assert_relative_eq;
use common::date;
use polars::prelude::*;
use price_forecast::utils::{
    date_from_days, dates_to_series, days_since_epoch, forecast_accuracy, future_dates,
    parse_date, series_to_dates,
};
use price_forecast::ForecastError;
use rstest::rstest;

#[test]
fn test_forecast_accuracy_skips_missing() {
    let fitted = vec![100.0, 110.0, 120.0, 999.0];
    let actual = vec![Some(102.0), Some(108.0), Some(120.0), None];

    let accuracy = forecast_accuracy(&fitted, &actual).unwrap();

    assert_relative_eq!(accuracy.mae, 4.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(accuracy.mse, 8.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(accuracy.rmse, (8.0_f64 / 3.0).sqrt(), epsilon = 1e-12);
    assert!(accuracy.mape > 0.0 && accuracy.smape > 0.0);
    assert!(accuracy.to_string().starts_with("MAE 1.3333"));
}

#[test]
fn test_forecast_accuracy_errors() {
    assert!(matches!(
        forecast_accuracy(&[1.0], &[Some(1.0), Some(2.0)]),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert!(matches!(
        forecast_accuracy(&[1.0, 2.0], &[None, Some(f64::NAN)]),
        Err(ForecastError::InvalidParameter(_))
    ));
}

#[test]
fn test_future_dates_are_consecutive() {
    let dates = future_dates(date(2024, 2, 27), 4);

    assert_eq!(
        dates,
        vec![
            date(2024, 2, 28),
            date(2024, 2, 29),
            date(2024, 3, 1),
            date(2024, 3, 2)
        ]
    );
    assert!(future_dates(date(2024, 2, 27), 0).is_empty());
}

#[rstest]
#[case("2023-05-17", date(2023, 5, 17))]
#[case(" 2023-05-17 ", date(2023, 5, 17))]
#[case("2023-05-17 00:00:00", date(2023, 5, 17))]
#[case("2023-05-17T09:30:00Z", date(2023, 5, 17))]
fn test_parse_date(#[case] raw: &str, #[case] expected: chrono::NaiveDate) {
    assert_eq!(parse_date(raw).unwrap(), expected);
}

#[test]
fn test_parse_date_rejects_garbage() {
    assert!(matches!(
        parse_date("17/05/2023"),
        Err(ForecastError::ParseError(_))
    ));
}

#[test]
fn test_epoch_day_conversion() {
    assert_eq!(days_since_epoch(date(1970, 1, 1)), 0);
    assert_eq!(days_since_epoch(date(2015, 1, 1)), 16436);
    assert_eq!(date_from_days(16436), Some(date(2015, 1, 1)));
    assert_eq!(date_from_days(-1), Some(date(1969, 12, 31)));
}

#[test]
fn test_date_series_conversions() {
    let dates = vec![date(2022, 12, 30), date(2023, 1, 3)];
    let series = dates_to_series("ds", &dates).unwrap();

    assert_eq!(series.dtype(), &DataType::Date);
    assert_eq!(series_to_dates(&series).unwrap(), dates);

    let strings = Series::new("ds", &["2022-12-30", "2023-01-03"]);
    assert_eq!(series_to_dates(&strings).unwrap(), dates);

    let with_null = Series::new("ds", &[Some("2022-12-30"), None]);
    assert!(series_to_dates(&with_null).is_err());
}
