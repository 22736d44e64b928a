//! Desktop dashboard and headless report over the forecast pipeline

pub mod report;
pub mod rows;
pub mod ui;

pub use ui::app::ForecastApp;

use anyhow::Context;
use clap::Parser;
use price_forecast::config::DEFAULT_TAIL_ROWS;
use price_forecast::data::{CsvDirectorySource, YahooFinanceSource};
use price_forecast::{ForecastService, Market, MarketDataSource, ModelConfig, PipelinePreset};
use std::fs;
use std::path::PathBuf;

/// Pipeline service over whichever market data source the CLI picked
pub type DashboardService = ForecastService<Box<dyn MarketDataSource>>;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print one forecast to the terminal instead of opening the window
    #[arg(long, default_value_t = false)]
    pub headless: bool,

    /// Market to start on: equities or crypto
    #[arg(long, default_value = "equities")]
    pub market: String,

    /// Ticker to start on; defaults to the first one of the market
    #[arg(long)]
    pub ticker: Option<String>,

    /// Horizon in the market's unit (years for equities, weeks for crypto)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=4))]
    pub horizon: u32,

    /// Read `<TICKER>.csv` files from this directory instead of Yahoo Finance
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Rows shown in the data and forecast tables
    #[arg(long, default_value_t = DEFAULT_TAIL_ROWS)]
    pub tail: usize,

    /// JSON model configuration replacing the selected market's preset
    #[arg(long)]
    pub model_config: Option<PathBuf>,
}

impl Cli {
    pub fn market(&self) -> anyhow::Result<Market> {
        Ok(self.market.parse::<Market>()?)
    }

    /// Selected ticker, falling back to the market's default
    pub fn ticker_for(&self, preset: &PipelinePreset) -> String {
        self.ticker
            .clone()
            .unwrap_or_else(|| preset.default_ticker().to_string())
    }
}

pub fn build_source(args: &Cli) -> anyhow::Result<Box<dyn MarketDataSource>> {
    match &args.data_dir {
        Some(dir) => {
            log::info!("Reading price files from {}", dir.display());
            Ok(Box::new(CsvDirectorySource::new(dir)))
        }
        None => Ok(Box::new(
            YahooFinanceSource::new().context("Failed to build the HTTP client")?,
        )),
    }
}

/// Service with the source and optional model override from the CLI
pub fn build_service(args: &Cli) -> anyhow::Result<DashboardService> {
    let market = args.market()?;
    let mut service = ForecastService::new(build_source(args)?);

    if let Some(path) = &args.model_config {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read model config {}", path.display()))?;
        let config = ModelConfig::from_json(&json)?;
        let preset = PipelinePreset::for_market(market).with_model_config(config)?;
        log::info!("Using model config {} for {}", path.display(), market);
        service = service.with_preset(preset);
    }

    Ok(service)
}

/// Main application entry point, called by the binary inside eframe
pub fn run_app(
    cc: &eframe::CreationContext<'_>,
    service: DashboardService,
    args: Cli,
) -> ForecastApp {
    ForecastApp::new(cc, service, &args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["forecast_dashboard"]).unwrap();
        assert!(!cli.headless);
        assert_eq!(cli.market().unwrap(), Market::Equities);
        assert_eq!(cli.horizon, 1);
        assert_eq!(cli.tail, DEFAULT_TAIL_ROWS);
        assert_eq!(cli.ticker_for(&PipelinePreset::equities()), "AAPL");
    }

    #[test]
    fn test_headless_flags() {
        let cli = Cli::try_parse_from([
            "forecast_dashboard",
            "--headless",
            "--market",
            "crypto",
            "--ticker",
            "ETH-USD",
            "--horizon",
            "3",
            "--data-dir",
            "/tmp/prices",
        ])
        .unwrap();
        assert!(cli.headless);
        assert_eq!(cli.market().unwrap(), Market::Crypto);
        assert_eq!(cli.ticker_for(&PipelinePreset::crypto()), "ETH-USD");
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/prices")));
    }

    #[rstest]
    #[case("0")]
    #[case("5")]
    fn test_horizon_outside_slider_range(#[case] horizon: &str) {
        assert!(Cli::try_parse_from(["forecast_dashboard", "--horizon", horizon]).is_err());
    }

    #[test]
    fn test_unknown_market() {
        let cli = Cli::try_parse_from(["forecast_dashboard", "--market", "bonds"]).unwrap();
        assert!(cli.market().is_err());
        assert!(build_service(&cli).is_err());
    }
}
