use price_forecast::error::ForecastError;
use price_forecast::ModelConfig;
use std::io;
use std::path::Path;

#[test]
fn test_error_conversion() {
    // Test IO error conversion
    let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let forecast_error = ForecastError::from(io_error);
    assert!(matches!(forecast_error, ForecastError::IoError(_)));

    // JSON and date parsing both end up as parse errors
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(
        ForecastError::from(json_error),
        ForecastError::ParseError(_)
    ));

    let date_error = chrono::NaiveDate::parse_from_str("2023-13-01", "%Y-%m-%d").unwrap_err();
    assert!(matches!(
        ForecastError::from(date_error),
        ForecastError::ParseError(_)
    ));

    let math_error = forecast_math::MathError::InsufficientData("empty".to_string());
    assert!(matches!(
        ForecastError::from(math_error),
        ForecastError::MathError(_)
    ));
}

#[test]
fn test_polars_error_keeps_message() {
    let df = polars::prelude::DataFrame::default();
    let polars_error = df.column("Close").unwrap_err();
    let error = ForecastError::from(polars_error);

    match error {
        ForecastError::PolarsError(msg) => assert!(msg.contains("Close")),
        other => panic!("Expected PolarsError, got {:?}", other),
    }
}

#[test]
fn test_error_display() {
    let error = ForecastError::DataUnavailable("AAPL: connection refused".to_string());
    assert_eq!(error.to_string(), "Data unavailable: AAPL: connection refused");

    let error = ForecastError::InsufficientTrainingData("got 1".to_string());
    assert!(error.to_string().starts_with("Insufficient training data"));

    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error_string = ForecastError::from(io_error).to_string();
    assert!(error_string.contains("IO error"));
    assert!(error_string.contains("permission denied"));
}

#[test]
fn test_configuration_errors_surface_from_json() {
    let error = ModelConfig::from_json(r#"{"interval_width": 1.5}"#).unwrap_err();
    assert!(matches!(error, ForecastError::ConfigurationError(_)));
    assert!(error.to_string().contains("Interval width"));
}

#[test]
fn test_result_mapping() {
    let file_result = Path::new("/nonexistent/path/AAPL.csv").metadata();
    let mapped = file_result.map_err(ForecastError::from);

    assert!(matches!(mapped, Err(ForecastError::IoError(_))));
}
