use crate::rows::{model_rows, ForecastTableRow, RawRow};
use crate::ui::charts::{show_components, show_forecast_chart, show_price_chart};
use crate::ui::tables::show_table;
use crate::{Cli, DashboardService};
use eframe::egui::{self, Context, Ui};
use price_forecast::config::HORIZON_RANGE;
use price_forecast::{
    ForecastService, Market, MarketDataSource, PipelineOutput, PipelinePreset, SelectionChanged,
};

/// Status line of a pipeline view
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Loading,
    Done,
    Failed(String),
}

impl Status {
    pub fn text(&self) -> String {
        match self {
            Status::Loading => "Loading data...".to_string(),
            Status::Done => "Loading data... done!".to_string(),
            Status::Failed(msg) => format!("Error: {}", msg),
        }
    }
}

/// Visible row range of the raw price chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeWindow {
    pub start: usize,
    pub end: usize,
}

impl RangeWindow {
    pub fn full(len: usize) -> Self {
        Self { start: 0, end: len }
    }

    /// Keep at least two rows visible and stay inside `len`
    pub fn clamp(&mut self, len: usize) {
        self.end = self.end.min(len);
        if len < 2 {
            self.start = 0;
            self.end = len;
            return;
        }
        self.end = self.end.max(2);
        self.start = self.start.min(self.end - 2);
    }
}

/// Selection, status and last outcome of one market view
#[derive(Debug)]
pub struct PipelineView {
    pub market: Market,
    pub ticker: String,
    pub horizon: u32,
    pub status: Status,
    pub output: Option<PipelineOutput>,
    pub window: RangeWindow,
    pending: bool,
    /// The loading status was drawn for the pending run
    loading_drawn: bool,
}

impl PipelineView {
    pub fn new(market: Market, ticker: String, horizon: u32) -> Self {
        Self {
            market,
            ticker,
            horizon,
            status: Status::Loading,
            output: None,
            window: RangeWindow::full(0),
            pending: true,
            loading_drawn: false,
        }
    }

    pub fn selection(&self) -> SelectionChanged {
        SelectionChanged::new(self.market, &self.ticker, self.horizon)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn request_run(&mut self) {
        self.pending = true;
        self.loading_drawn = false;
        self.status = Status::Loading;
    }

    /// Handle the current selection; a failure leaves the view usable
    pub fn run<S: MarketDataSource>(&mut self, service: &mut ForecastService<S>) {
        let event = self.selection();
        match service.handle(&event) {
            Ok(output) => {
                self.window = RangeWindow::full(output.series.len());
                self.output = Some(output);
                self.status = Status::Done;
            }
            Err(e) => {
                log::warn!("{} {} failed: {}", event.market, event.ticker, e);
                self.output = None;
                self.status = Status::Failed(e.to_string());
            }
        }
        self.pending = false;
    }

    /// Run pending work once its loading status has been on screen.
    /// Returns true when another frame is needed.
    pub fn poll<S: MarketDataSource>(&mut self, service: &mut ForecastService<S>) -> bool {
        if !self.pending {
            return false;
        }
        if !self.loading_drawn {
            self.loading_drawn = true;
            return true;
        }
        self.run(service);
        false
    }

    fn show_controls(&mut self, ui: &mut Ui, preset: &PipelinePreset) -> bool {
        let mut changed = false;
        let id = format!("{}_ticker", self.market);

        egui::ComboBox::new(id, "Select dataset for prediction")
            .selected_text(self.ticker.as_str())
            .show_ui(ui, |ui| {
                for ticker in preset.tickers {
                    changed |= ui
                        .selectable_value(&mut self.ticker, ticker.to_string(), *ticker)
                        .changed();
                }
            });

        let label = match preset.market {
            Market::Equities => "Years of prediction",
            Market::Crypto => "Weeks of prediction:",
        };
        changed |= ui
            .add(egui::Slider::new(&mut self.horizon, HORIZON_RANGE).text(label))
            .changed();

        ui.label(self.status.text());
        changed
    }

    fn show_range_slider(&mut self, ui: &mut Ui, len: usize) {
        self.window.clamp(len);
        if len < 2 {
            return;
        }
        ui.horizontal(|ui| {
            ui.label("Range");
            ui.add(egui::Slider::new(&mut self.window.start, 0..=len - 2).show_value(false));
            ui.add(egui::Slider::new(&mut self.window.end, 2..=len).show_value(false));
            if ui.button("Reset").clicked() {
                self.window = RangeWindow::full(len);
            }
        });
        self.window.clamp(len);
    }

    pub fn show(&mut self, ui: &mut Ui, preset: &PipelinePreset, tail: usize) {
        ui.heading(preset.title);
        if self.show_controls(ui, preset) {
            log::info!("Selection changed: {} +{}", self.ticker, self.horizon);
            self.request_run();
        }
        ui.separator();

        let Some(output) = self.output.take() else {
            return;
        };

        ui.heading("Raw data");
        match output.series.tail(tail) {
            Ok(bars) => {
                let rows: Vec<RawRow> = bars.iter().map(RawRow::from).collect();
                show_table(ui, &format!("{}_raw", self.market), &rows);
            }
            Err(e) => {
                ui.label(format!("Error: {}", e));
            }
        }

        self.show_range_slider(ui, output.series.len());
        match output.series.slice(self.window.start, Some(self.window.end)) {
            Ok(window) => show_price_chart(ui, &format!("{}_prices", self.market), &window),
            Err(e) => {
                ui.label(format!("Error: {}", e));
            }
        }
        ui.separator();

        ui.heading("Forecast data");
        let rows: Vec<ForecastTableRow> = output
            .forecast
            .tail(tail)
            .iter()
            .map(ForecastTableRow::from)
            .collect();
        show_table(ui, &format!("{}_forecast", self.market), &rows);

        ui.label(format!(
            "Forecast plot for {} {}",
            self.horizon, preset.horizon_unit
        ));
        show_forecast_chart(ui, &format!("{}_forecast_plot", self.market), &output);
        if let Some(accuracy) = &output.accuracy {
            ui.label(format!("In-sample fit: {}", accuracy));
        }
        ui.separator();

        ui.heading("Forecast components");
        show_components(ui, &format!("{}_components", self.market), &output);
        show_table(ui, &format!("{}_model", self.market), &model_rows(&output.model));

        self.output = Some(output);
    }
}

/// Two pipeline views (equities, crypto) over one forecast service
pub struct ForecastApp {
    service: DashboardService,
    active: Market,
    equities: PipelineView,
    crypto: PipelineView,
    tail: usize,
}

impl ForecastApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, service: DashboardService, args: &Cli) -> Self {
        let active = args.market().unwrap_or(Market::Equities);
        let view = |market: Market| {
            let preset = service.preset(market);
            if market == active {
                PipelineView::new(market, args.ticker_for(preset), args.horizon)
            } else {
                PipelineView::new(market, preset.default_ticker().to_string(), 1)
            }
        };
        let equities = view(Market::Equities);
        let crypto = view(Market::Crypto);

        Self {
            service,
            active,
            equities,
            crypto,
            tail: args.tail,
        }
    }
}

impl eframe::App for ForecastApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("market_tabs").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for market in Market::ALL {
                    let title = self.service.preset(market).title;
                    ui.selectable_value(&mut self.active, market, title);
                }
            });
        });

        let preset = self.service.preset(self.active).clone();
        let view = match self.active {
            Market::Equities => &mut self.equities,
            Market::Crypto => &mut self.crypto,
        };

        if view.poll(&mut self.service) {
            ctx.request_repaint();
        }

        let tail = self.tail;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| view.show(ui, &preset, tail));
        });

        if view.is_pending() {
            ctx.request_repaint();
        }
    }
}
