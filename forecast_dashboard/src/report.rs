//! Terminal report: one selection rendered as tables

use crate::rows::{accuracy_rows, model_rows, ForecastTableRow, RawRow};
use crate::{Cli, DashboardService};
use price_forecast::{MarketDataSource, PipelineOutput, SelectionChanged};
use std::fmt::Write;
use tabled::settings::Style;
use tabled::Table;

/// Render the raw tail, forecast tail and fit accuracy of one run
pub fn render_report(title: &str, output: &PipelineOutput, tail: usize) -> anyhow::Result<String> {
    let raw: Vec<RawRow> = output.series.tail(tail)?.iter().map(RawRow::from).collect();
    let forecast: Vec<ForecastTableRow> = output
        .forecast
        .tail(tail)
        .iter()
        .map(ForecastTableRow::from)
        .collect();

    let mut text = String::new();
    writeln!(text, "{}: {} (+{} days)", title, output.ticker, output.horizon_days)?;
    writeln!(
        text,
        "{} rows, {} to {}",
        output.series.len(),
        output
            .series
            .first_date()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        output
            .series
            .last_date()
            .map(|d| d.to_string())
            .unwrap_or_default()
    )?;
    writeln!(text, "\nRaw data")?;
    writeln!(text, "{}", Table::new(raw).with(Style::rounded()))?;
    writeln!(text, "\nForecast data")?;
    writeln!(text, "{}", Table::new(forecast).with(Style::rounded()))?;

    if let Some(accuracy) = &output.accuracy {
        writeln!(text, "\nIn-sample accuracy")?;
        writeln!(
            text,
            "{}",
            Table::new(accuracy_rows(accuracy)).with(Style::rounded())
        )?;
    }

    writeln!(text, "\nModel")?;
    writeln!(
        text,
        "{}",
        Table::new(model_rows(&output.model)).with(Style::rounded())
    )?;

    Ok(text)
}

/// Run the selection given on the command line once
pub fn run_headless(mut service: DashboardService, args: &Cli) -> anyhow::Result<String> {
    let market = args.market()?;
    let preset = service.preset(market).clone();
    let event = SelectionChanged::new(market, &args.ticker_for(&preset), args.horizon);

    log::info!(
        "Headless run: {} {} +{} {} via {}",
        market,
        event.ticker,
        event.horizon,
        preset.horizon_unit,
        service.loader().source().name()
    );
    let output = service.handle(&event)?;
    render_report(preset.title, &output, args.tail)
}
