//! Display rows shared by the egui tables and the terminal report

use price_forecast::models::{ForecastRow, TrainedDecompositionModel};
use price_forecast::utils::ForecastAccuracy;
use price_forecast::PriceBar;
use tabled::Tabled;

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct RawRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Open")]
    pub open: String,
    #[tabled(rename = "High")]
    pub high: String,
    #[tabled(rename = "Low")]
    pub low: String,
    #[tabled(rename = "Close")]
    pub close: String,
    #[tabled(rename = "Adj Close")]
    pub adj_close: String,
    #[tabled(rename = "Volume")]
    pub volume: u64,
}

impl From<&PriceBar> for RawRow {
    fn from(bar: &PriceBar) -> Self {
        Self {
            date: bar.date.to_string(),
            open: format!("{:.2}", bar.open),
            high: format!("{:.2}", bar.high),
            low: format!("{:.2}", bar.low),
            close: format!("{:.2}", bar.close),
            adj_close: format!("{:.2}", bar.adj_close),
            volume: bar.volume,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct ForecastTableRow {
    pub ds: String,
    pub yhat: String,
    pub yhat_lower: String,
    pub yhat_upper: String,
    pub trend: String,
}

impl From<&ForecastRow> for ForecastTableRow {
    fn from(row: &ForecastRow) -> Self {
        Self {
            ds: row.ds.to_string(),
            yhat: format!("{:.2}", row.yhat),
            yhat_lower: format!("{:.2}", row.yhat_lower),
            yhat_upper: format!("{:.2}", row.yhat_upper),
            trend: format!("{:.2}", row.trend),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct MetricRow {
    #[tabled(rename = "Metric")]
    pub metric: &'static str,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub fn accuracy_rows(accuracy: &ForecastAccuracy) -> Vec<MetricRow> {
    vec![
        MetricRow {
            metric: "MAE",
            value: format!("{:.4}", accuracy.mae),
        },
        MetricRow {
            metric: "RMSE",
            value: format!("{:.4}", accuracy.rmse),
        },
        MetricRow {
            metric: "MAPE",
            value: format!("{:.2}%", accuracy.mape),
        },
        MetricRow {
            metric: "SMAPE",
            value: format!("{:.2}%", accuracy.smape),
        },
    ]
}

/// Fitted noise level, changepoints and holiday regressors, in `y` units
pub fn model_rows(model: &TrainedDecompositionModel) -> Vec<MetricRow> {
    let changepoints = model.changepoint_dates();
    let span = match (changepoints.first(), changepoints.last()) {
        (Some(first), Some(last)) => format!("{} ({} to {})", changepoints.len(), first, last),
        _ => "0".to_string(),
    };
    vec![
        MetricRow {
            metric: "Mode",
            value: model.config().seasonality_mode.to_string(),
        },
        MetricRow {
            metric: "Residual std",
            value: format!("{:.4}", model.residual_std()),
        },
        MetricRow {
            metric: "Changepoints",
            value: span,
        },
        MetricRow {
            metric: "Holidays",
            value: model.holiday_names().len().to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use price_forecast::models::fit_and_forecast;
    use price_forecast::{ModelConfig, TrainingFrame};

    #[test]
    fn test_raw_row_formatting() {
        let bar = PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
            open: 210.0,
            high: 211.456,
            low: 209.1,
            close: 210.62,
            adj_close: 210.1,
            volume: 82_542_700,
        };
        let row = RawRow::from(&bar);

        assert_eq!(row.date, "2024-06-28");
        assert_eq!(row.high, "211.46");
        assert_eq!(
            RawRow::headers(),
            vec!["Date", "Open", "High", "Low", "Close", "Adj Close", "Volume"]
        );
        assert_eq!(row.fields()[6], "82542700");
    }

    #[test]
    fn test_model_rows() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let points: Vec<(NaiveDate, Option<f64>)> = (0..60)
            .map(|i| (start + chrono::Days::new(i), Some(100.0 + i as f64)))
            .collect();
        let frame = TrainingFrame::from_points(&points).unwrap();
        let (model, _) = fit_and_forecast(&frame, 7, &ModelConfig::default()).unwrap();

        let rows = model_rows(&model);

        assert_eq!(
            rows.iter().map(|r| r.metric).collect::<Vec<_>>(),
            vec!["Mode", "Residual std", "Changepoints", "Holidays"]
        );
        assert_eq!(rows[0].value, "additive");
        assert!(rows[1].value.parse::<f64>().unwrap() < 1.0);
        assert!(rows[2].value.starts_with("25 (2024-01-"));
        assert_eq!(rows[3].value, "0");
    }
}
