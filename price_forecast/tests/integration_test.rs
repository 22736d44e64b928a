mod common;

use chrono::Days;
use common::{date, SyntheticSource};
use pretty_assertions::assert_eq;
use price_forecast::config::{start_date, DEFAULT_TAIL_ROWS};
use price_forecast::data::CsvDirectorySource;
use price_forecast::pipeline::{ForecastService, Market, PipelinePreset, SelectionChanged};
use price_forecast::{ForecastError, ModelConfig};
use rstest::{fixture, rstest};
use std::fs;
use tempfile::tempdir;

/// A Friday, so equities also trade on the last day
const TODAY: (i32, u32, u32) = (2024, 6, 28);

#[fixture]
fn service() -> ForecastService<SyntheticSource> {
    let (y, m, d) = TODAY;
    ForecastService::new(SyntheticSource::new()).with_today(date(y, m, d))
}

#[rstest]
fn test_aapl_one_year(mut service: ForecastService<SyntheticSource>) {
    let output = service
        .handle(&SelectionChanged::new(Market::Equities, "AAPL", 1))
        .unwrap();
    let last_loaded = output.series.last_date().unwrap();

    assert_eq!(output.horizon_days, 365);
    assert_eq!(last_loaded, service.today());
    assert_eq!(output.forecast.first_date(), Some(start_date()));
    assert_eq!(
        output.forecast.last_date(),
        last_loaded.checked_add_days(Days::new(365))
    );

    let last = output.forecast.tail(1).pop().unwrap();
    assert!(last.yhat.is_finite());
    assert!(last.yhat_lower <= last.yhat && last.yhat <= last.yhat_upper);
    assert!(output.accuracy.is_some());
    assert!(!output.loaded_from_cache);
    assert!(output.fetched_at.is_some());
}

#[rstest]
fn test_btc_two_weeks(mut service: ForecastService<SyntheticSource>) {
    let output = service
        .handle(&SelectionChanged::new(Market::Crypto, "BTC-USD", 2))
        .unwrap();
    let last_loaded = output.series.last_date().unwrap();

    assert_eq!(output.horizon_days, 14);
    assert_eq!(output.forecast.horizons(), 14);
    assert_eq!(
        output.forecast.last_date(),
        last_loaded.checked_add_days(Days::new(14))
    );
    assert!(output.forecast.component("monthly").is_some());
    assert!(output.forecast.component("holidays").is_some());
    assert!(output.model.seasonality_names().contains(&"monthly"));
    assert_eq!(output.forecast.tail(DEFAULT_TAIL_ROWS).len(), DEFAULT_TAIL_ROWS);
}

#[rstest]
fn test_horizon_change_reuses_cached_series(mut service: ForecastService<SyntheticSource>) {
    let first = service
        .handle(&SelectionChanged::new(Market::Equities, "MSFT", 1))
        .unwrap();
    let second = service
        .handle(&SelectionChanged::new(Market::Equities, "MSFT", 3))
        .unwrap();

    assert_eq!(service.loader().source().calls(), 1);
    assert!(second.loaded_from_cache);
    assert_eq!(second.fetched_at, first.fetched_at);
    assert_eq!(second.forecast.horizons(), 3 * 365);
    assert_eq!(first.series.len(), second.series.len());
}

#[rstest]
#[case(SelectionChanged::new(Market::Equities, "BTC-USD", 1))]
#[case(SelectionChanged::new(Market::Crypto, "ETH-USD", 0))]
#[case(SelectionChanged::new(Market::Crypto, "ETH-USD", 5))]
fn test_rejected_selections(
    mut service: ForecastService<SyntheticSource>,
    #[case] event: SelectionChanged,
) {
    assert!(matches!(
        service.handle(&event),
        Err(ForecastError::InvalidParameter(_))
    ));
    assert_eq!(service.loader().source().calls(), 0);
}

#[test]
fn test_custom_preset_and_csv_source() {
    let dir = tempdir().unwrap();
    let mut csv = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    let first = date(2024, 1, 1);
    for i in 0..60u64 {
        let d = first.checked_add_days(Days::new(i)).unwrap();
        let close = 20.0 + i as f64 * 0.25;
        let (high, low) = (close + 1.0, close - 1.0);
        csv.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            d,
            close,
            high,
            low,
            close,
            close,
            1000 + i
        ));
    }
    fs::write(dir.path().join("OCGN.csv"), csv).unwrap();

    let preset = PipelinePreset::equities()
        .with_model_config(ModelConfig::default().with_interval_width(0.95))
        .unwrap();
    let mut service = ForecastService::new(CsvDirectorySource::new(dir.path()))
        .with_preset(preset)
        .with_today(date(2024, 2, 29));

    let output = service
        .handle(&SelectionChanged::new(Market::Equities, "OCGN", 1))
        .unwrap();

    assert_eq!(output.series.len(), 60);
    assert_eq!(output.training.len(), 60);
    assert_eq!(output.forecast.last_date(), Some(date(2025, 2, 28)));
    assert_eq!(output.model.config().interval_width, 0.95);

    let missing = service.handle(&SelectionChanged::new(Market::Equities, "GME", 1));
    assert!(matches!(missing, Err(ForecastError::DataUnavailable(_))));
}
