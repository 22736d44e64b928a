use clap::Parser;
use eframe::NativeOptions;
use forecast_dashboard::{build_service, report, run_app, Cli};

fn init_logging() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("forecast_dashboard"), my_code_level)
        .filter(Some("price_forecast"), my_code_level)
        .filter(Some("forecast_math"), my_code_level)
        // RUST_LOG still wins when set
        .parse_default_env()
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args = Cli::parse();
    let service = build_service(&args)?;

    if args.headless {
        let text = report::run_headless(service, &args)?;
        println!("{}", text);
        return Ok(());
    }

    let options = NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 960.0])
            .with_title("Stock & Crypto Forecaster"),
        ..Default::default()
    };

    eframe::run_native(
        "Stock & Crypto Forecaster",
        options,
        Box::new(move |cc| Ok(Box::new(run_app(cc, service, args)))),
    )
    .map_err(|e| anyhow::anyhow!("UI failed: {}", e))
}
