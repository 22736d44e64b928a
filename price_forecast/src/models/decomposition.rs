//! Additive / multiplicative decomposition model
//!
//! `y(t) = g(t) + S(t) + H(t)` or `y(t) = g(t)·(1 + S(t) + H(t))` where
//! - `g` is a piecewise-linear trend with rate changes at changepoints,
//! - `S` is a sum of Fourier series, one per seasonality,
//! - `H` is a sum of holiday indicator effects.
//!
//! Every coefficient has a Gaussian prior, so the MAP fit is a ridge
//! regression solved through Cholesky. Multiplicative fits alternate between
//! the trend and the seasonal block.

use crate::error::{ForecastError, Result};
use crate::holidays::calendar_for;
use crate::models::config::{ModelConfig, SeasonalityMode, SeasonalityToggle};
use crate::models::{ForecastModel, ForecastResult, TrainedForecastModel};
use crate::preprocess::TrainingFrame;
use crate::utils::{days_since_epoch, future_dates};
use chrono::{Days, NaiveDate};
use forecast_math::fourier::{fourier_matrix, fourier_terms};
use forecast_math::linalg::ridge_solve;
use forecast_math::{stats, Matrix};
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Prior scale of the trend offset and base rate
const TREND_PRIOR_SCALE: f64 = 5.0;
/// Penalty of the preliminary fit used to estimate the noise level
const PRELIMINARY_PENALTY: f64 = 1e-6;
const MIN_NOISE_VARIANCE: f64 = 1e-8;
const MULTIPLICATIVE_ITERATIONS: usize = 50;
const MULTIPLICATIVE_TOLERANCE: f64 = 1e-10;

/// Auto seasonality thresholds, in days of history
const WEEKLY_MIN_SPAN: f64 = 14.0;
const YEARLY_MIN_SPAN: f64 = 730.0;

const WEEKLY_PERIOD: f64 = 7.0;
const WEEKLY_ORDER: usize = 3;
const YEARLY_PERIOD: f64 = 365.25;
const YEARLY_ORDER: usize = 10;

/// Name of the summed holiday component
pub const HOLIDAYS: &str = "holidays";

/// A Fourier block of the design matrix
#[derive(Debug, Clone, PartialEq)]
struct SeasonalTerm {
    name: String,
    period: f64,
    order: usize,
}

impl SeasonalTerm {
    fn width(&self) -> usize {
        2 * self.order
    }
}

/// Decomposition model builder
#[derive(Debug, Clone)]
pub struct DecompositionModel {
    config: ModelConfig,
}

impl DecompositionModel {
    /// Create a model, rejecting an invalid configuration
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn seasonal_terms(&self, span_days: f64) -> Vec<SeasonalTerm> {
        let enabled = |toggle: SeasonalityToggle, min_span: f64| match toggle {
            SeasonalityToggle::Enabled => true,
            SeasonalityToggle::Disabled => false,
            SeasonalityToggle::Auto => span_days >= min_span,
        };

        let mut terms = Vec::new();
        if enabled(self.config.weekly_seasonality, WEEKLY_MIN_SPAN) {
            terms.push(SeasonalTerm {
                name: "weekly".to_string(),
                period: WEEKLY_PERIOD,
                order: WEEKLY_ORDER,
            });
        }
        if enabled(self.config.yearly_seasonality, YEARLY_MIN_SPAN) {
            terms.push(SeasonalTerm {
                name: "yearly".to_string(),
                period: YEARLY_PERIOD,
                order: YEARLY_ORDER,
            });
        }
        for custom in &self.config.custom_seasonalities {
            terms.push(SeasonalTerm {
                name: custom.name.trim().to_string(),
                period: custom.period_days,
                order: custom.fourier_order,
            });
        }
        terms
    }
}

/// Training rows reduced to usable observations
struct Observations {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

fn usable_observations(frame: &TrainingFrame) -> Result<Observations> {
    let mut points: Vec<(NaiveDate, f64)> = frame
        .points()?
        .into_iter()
        .filter_map(|(d, v)| v.map(|v| (d, v)))
        .collect();
    points.sort_by_key(|(d, _)| *d);

    let distinct: BTreeSet<NaiveDate> = points.iter().map(|(d, _)| *d).collect();
    if distinct.len() < 2 {
        return Err(ForecastError::InsufficientTrainingData(format!(
            "Need at least 2 dates with a value, got {}",
            distinct.len()
        )));
    }

    Ok(Observations {
        dates: points.iter().map(|(d, _)| *d).collect(),
        values: points.iter().map(|(_, v)| *v).collect(),
    })
}

/// Changepoint locations in scaled time, evenly spaced over the first
/// `range` share of the training rows
fn changepoint_locations(t: &[f64], n_changepoints: usize, range: f64) -> Vec<f64> {
    let hist_size = (t.len() as f64 * range).floor() as usize;
    let n = n_changepoints.min(hist_size.saturating_sub(1));
    if n == 0 {
        return Vec::new();
    }

    let step = (hist_size - 1) as f64 / n as f64;
    let mut locations: Vec<f64> = (1..=n)
        .map(|i| t[(i as f64 * step).round() as usize])
        .collect();
    locations.dedup();
    locations
}

fn trend_row(t: f64, changepoints: &[f64]) -> Vec<f64> {
    let mut row = Vec::with_capacity(2 + changepoints.len());
    row.push(1.0);
    row.push(t);
    row.extend(changepoints.iter().map(|s| (t - s).max(0.0)));
    row
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Holiday indicator lookup: date -> regressor indexes active on it
fn holiday_lookup(
    country: Option<&str>,
    names: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashMap<NaiveDate, Vec<usize>>> {
    let mut lookup: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
    let Some(country) = country else {
        return Ok(lookup);
    };
    if names.is_empty() {
        return Ok(lookup);
    }

    let calendar = calendar_for(country)?;
    for holiday in calendar.holidays_between(start, end) {
        if let Some(idx) = names.iter().position(|n| *n == holiday.name) {
            lookup.entry(holiday.date).or_default().push(idx);
        }
    }
    Ok(lookup)
}

/// Seasonal and holiday features for one date
fn component_row(
    date: NaiveDate,
    terms: &[SeasonalTerm],
    n_holidays: usize,
    holidays: &HashMap<NaiveDate, Vec<usize>>,
) -> Vec<f64> {
    let day = days_since_epoch(date) as f64;
    let mut row = Vec::new();
    for term in terms {
        row.extend(fourier_terms(day, term.period, term.order));
    }
    let mut indicators = vec![0.0; n_holidays];
    if let Some(active) = holidays.get(&date) {
        for &idx in active {
            indicators[idx] = 1.0;
        }
    }
    row.extend(indicators);
    row
}

fn residual_variance(actual: &[f64], fitted: &[f64]) -> Result<f64> {
    let squared: Vec<f64> = actual
        .iter()
        .zip(fitted)
        .map(|(a, f)| (a - f).powi(2))
        .collect();
    Ok(stats::mean(&squared)?)
}

/// Fitted coefficients in scaled units
struct Coefficients {
    trend: Vec<f64>,
    components: Vec<f64>,
}

impl ForecastModel for DecompositionModel {
    type Trained = TrainedDecompositionModel;

    fn train(&self, data: &TrainingFrame) -> Result<Self::Trained> {
        let obs = usable_observations(data)?;
        let history_dates: Vec<NaiveDate> = data
            .dates()?
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let start = obs.dates[0];
        let end = obs.dates[obs.dates.len() - 1];
        let span_days = (end - start).num_days() as f64;

        let y_scale = match stats::max_abs(&obs.values)? {
            s if s > 0.0 => s,
            _ => 1.0,
        };
        let y: Vec<f64> = obs.values.iter().map(|v| v / y_scale).collect();
        let t: Vec<f64> = obs
            .dates
            .iter()
            .map(|d| (*d - start).num_days() as f64 / span_days)
            .collect();

        let changepoints = changepoint_locations(
            &t,
            self.config.n_changepoints,
            self.config.changepoint_range,
        );
        let terms = self.seasonal_terms(span_days);

        let training_days: BTreeSet<NaiveDate> = obs.dates.iter().copied().collect();
        let holiday_names: Vec<String> = match &self.config.holidays_country {
            Some(country) => calendar_for(country)?
                .holidays_between(start, end)
                .into_iter()
                .filter(|h| training_days.contains(&h.date))
                .map(|h| h.name)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
            None => Vec::new(),
        };
        let holidays = holiday_lookup(
            self.config.holidays_country.as_deref(),
            &holiday_names,
            start,
            end,
        )?;

        let trend_rows: Vec<Vec<f64>> = t.iter().map(|&ti| trend_row(ti, &changepoints)).collect();
        let component_rows: Vec<Vec<f64>> = obs
            .dates
            .iter()
            .map(|d| component_row(*d, &terms, holiday_names.len(), &holidays))
            .collect();

        let fitter = Fitter {
            y: &y,
            trend_rows: &trend_rows,
            component_rows: &component_rows,
            n_changepoints: changepoints.len(),
            seasonal_width: terms.iter().map(SeasonalTerm::width).sum(),
            config: &self.config,
        };
        let noise_variance = fitter.preliminary_noise_variance()?;
        let coefficients = match self.config.seasonality_mode {
            SeasonalityMode::Additive => fitter.fit_additive(noise_variance)?,
            SeasonalityMode::Multiplicative => fitter.fit_multiplicative(noise_variance)?,
        };

        let fitted = fitter.fitted(&coefficients);
        let sigma = residual_variance(&y, &fitted)?.sqrt();

        let deltas = &coefficients.trend[2..];
        let rate_change_scale = if deltas.is_empty() {
            0.0
        } else {
            stats::mean_abs(deltas)?
        };

        log::debug!(
            "Fitted {} mode: {} rows, {} changepoints, {} seasonalities, {} holidays, sigma {:.5}",
            self.config.seasonality_mode,
            y.len(),
            changepoints.len(),
            terms.len(),
            holiday_names.len(),
            sigma
        );

        Ok(TrainedDecompositionModel {
            config: self.config.clone(),
            start,
            span_days,
            y_scale,
            history_dates,
            changepoints,
            terms,
            holiday_names,
            trend_coefficients: coefficients.trend,
            component_coefficients: coefficients.components,
            sigma,
            rate_change_scale,
        })
    }

    fn name(&self) -> &str {
        "Decomposition"
    }
}

/// Least squares passes over one training set
struct Fitter<'a> {
    y: &'a [f64],
    trend_rows: &'a [Vec<f64>],
    component_rows: &'a [Vec<f64>],
    n_changepoints: usize,
    seasonal_width: usize,
    config: &'a ModelConfig,
}

impl Fitter<'_> {
    fn trend_width(&self) -> usize {
        2 + self.n_changepoints
    }

    fn component_width(&self) -> usize {
        self.component_rows.first().map(|r| r.len()).unwrap_or(0)
    }

    fn trend_penalties(&self, noise_variance: f64) -> Vec<f64> {
        let base = noise_variance / TREND_PRIOR_SCALE.powi(2);
        // Laplace(0, τ) rate changes approximated by N(0, 2τ²)
        let delta = noise_variance / (2.0 * self.config.changepoint_prior_scale.powi(2));
        let mut penalties = vec![base, base];
        penalties.extend(std::iter::repeat(delta).take(self.n_changepoints));
        penalties
    }

    fn component_penalties(&self, noise_variance: f64) -> Vec<f64> {
        let seasonal = noise_variance / self.config.seasonality_prior_scale.powi(2);
        let holiday = noise_variance / self.config.holidays_prior_scale.powi(2);
        let mut penalties = vec![seasonal; self.seasonal_width];
        let n_holidays = self.component_width() - self.seasonal_width;
        penalties.extend(std::iter::repeat(holiday).take(n_holidays));
        penalties
    }

    /// Noise variance of a nearly unregularised additive fit
    fn preliminary_noise_variance(&self) -> Result<f64> {
        let rows: Vec<Vec<f64>> = self
            .trend_rows
            .iter()
            .zip(self.component_rows)
            .map(|(tr, cr)| tr.iter().chain(cr).copied().collect())
            .collect();
        let x = Matrix::from_rows(&rows)?;
        let beta = ridge_solve(&x, self.y, &vec![PRELIMINARY_PENALTY; x.cols()])?;
        let fitted = x.mul_vec(&beta)?;
        Ok(residual_variance(self.y, &fitted)?.max(MIN_NOISE_VARIANCE))
    }

    fn fit_additive(&self, noise_variance: f64) -> Result<Coefficients> {
        let rows: Vec<Vec<f64>> = self
            .trend_rows
            .iter()
            .zip(self.component_rows)
            .map(|(tr, cr)| tr.iter().chain(cr).copied().collect())
            .collect();
        let x = Matrix::from_rows(&rows)?;
        let mut penalties = self.trend_penalties(noise_variance);
        penalties.extend(self.component_penalties(noise_variance));

        let mut beta = ridge_solve(&x, self.y, &penalties)?;
        let components = beta.split_off(self.trend_width());
        Ok(Coefficients {
            trend: beta,
            components,
        })
    }

    fn fit_multiplicative(&self, noise_variance: f64) -> Result<Coefficients> {
        let trend_penalties = self.trend_penalties(noise_variance);
        let component_penalties = self.component_penalties(noise_variance);

        // the additive trend is a close starting point
        let Coefficients {
            trend: mut trend,
            mut components,
        } = self.fit_additive(noise_variance)?;
        if components.is_empty() {
            return Ok(Coefficients { trend, components });
        }

        for iteration in 0..MULTIPLICATIVE_ITERATIONS {
            // seasonal step: y - g = g·Xβ
            let g: Vec<f64> = self.trend_rows.iter().map(|r| dot(r, &trend)).collect();
            let rows: Vec<Vec<f64>> = self
                .component_rows
                .iter()
                .zip(&g)
                .map(|(r, gi)| r.iter().map(|x| x * gi).collect())
                .collect();
            let target: Vec<f64> = self.y.iter().zip(&g).map(|(yi, gi)| yi - gi).collect();
            components = ridge_solve(&Matrix::from_rows(&rows)?, &target, &component_penalties)?;

            // trend step: y = (1 + Xβ)·g
            let factor: Vec<f64> = self
                .component_rows
                .iter()
                .map(|r| 1.0 + dot(r, &components))
                .collect();
            let rows: Vec<Vec<f64>> = self
                .trend_rows
                .iter()
                .zip(&factor)
                .map(|(r, s)| r.iter().map(|x| x * s).collect())
                .collect();
            let next = ridge_solve(&Matrix::from_rows(&rows)?, self.y, &trend_penalties)?;

            let change = next
                .iter()
                .zip(&trend)
                .fold(0.0_f64, |acc, (a, b)| acc.max((a - b).abs()));
            trend = next;
            if change < MULTIPLICATIVE_TOLERANCE {
                log::debug!("Multiplicative fit converged after {} iterations", iteration + 1);
                break;
            }
        }

        Ok(Coefficients { trend, components })
    }

    fn fitted(&self, coefficients: &Coefficients) -> Vec<f64> {
        self.trend_rows
            .iter()
            .zip(self.component_rows)
            .map(|(tr, cr)| {
                let g = dot(tr, &coefficients.trend);
                let s = dot(cr, &coefficients.components);
                match self.config.seasonality_mode {
                    SeasonalityMode::Additive => g + s,
                    SeasonalityMode::Multiplicative => g * (1.0 + s),
                }
            })
            .collect()
    }
}

/// Decomposition model fitted on a training frame
#[derive(Debug, Clone)]
pub struct TrainedDecompositionModel {
    config: ModelConfig,
    /// First date with a usable value, `t = 0`
    start: NaiveDate,
    /// Days between the first and last training date, `t = 1`
    span_days: f64,
    y_scale: f64,
    /// Every date of the frame, including rows without a value
    history_dates: Vec<NaiveDate>,
    changepoints: Vec<f64>,
    terms: Vec<SeasonalTerm>,
    holiday_names: Vec<String>,
    trend_coefficients: Vec<f64>,
    component_coefficients: Vec<f64>,
    /// Residual standard deviation in scaled units
    sigma: f64,
    /// Mean absolute rate change
    rate_change_scale: f64,
}

impl TrainedDecompositionModel {
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Names of the fitted seasonal components
    pub fn seasonality_names(&self) -> Vec<&str> {
        self.terms.iter().map(|t| t.name.as_str()).collect()
    }

    /// Holidays that got a regressor
    pub fn holiday_names(&self) -> &[String] {
        &self.holiday_names
    }

    /// Dates of the trend changepoints
    pub fn changepoint_dates(&self) -> Vec<NaiveDate> {
        self.changepoints
            .iter()
            .filter_map(|s| {
                self.start
                    .checked_add_days(Days::new((s * self.span_days).round() as u64))
            })
            .collect()
    }

    /// Residual standard deviation in the units of `y`
    pub fn residual_std(&self) -> f64 {
        self.sigma * self.y_scale
    }

    fn scaled_time(&self, date: NaiveDate) -> f64 {
        (date - self.start).num_days() as f64 / self.span_days
    }

    /// Component values are in `y` units for additive fits, fractions of
    /// the trend for multiplicative ones
    fn component_unit(&self) -> f64 {
        match self.config.seasonality_mode {
            SeasonalityMode::Additive => self.y_scale,
            SeasonalityMode::Multiplicative => 1.0,
        }
    }

    fn seasonal_block(&self, name: &str) -> Option<(usize, &SeasonalTerm)> {
        let mut offset = 0;
        for term in &self.terms {
            if term.name == name {
                return Some((offset, term));
            }
            offset += term.width();
        }
        None
    }

    /// One period of a seasonal component, starting on Sunday 2017-01-01
    pub fn seasonality_profile(&self, name: &str) -> Result<Vec<(NaiveDate, f64)>> {
        let (offset, term) = self.seasonal_block(name).ok_or_else(|| {
            ForecastError::InvalidParameter(format!("No seasonality named '{}'", name))
        })?;
        let origin = NaiveDate::from_ymd_opt(2017, 1, 1).ok_or_else(|| {
            ForecastError::DataError("Invalid profile origin".to_string())
        })?;
        let days = match term.name.as_str() {
            "weekly" => 7,
            "yearly" => 365,
            _ => term.period.ceil() as u64,
        };

        let coefficients = &self.component_coefficients[offset..offset + term.width()];
        let unit = self.component_unit();
        let dates: Vec<NaiveDate> = (0..days)
            .filter_map(|i| origin.checked_add_days(Days::new(i)))
            .collect();
        let t: Vec<f64> = dates.iter().map(|d| days_since_epoch(*d) as f64).collect();
        let values = fourier_matrix(&t, term.period, term.order)?.mul_vec(coefficients)?;
        Ok(dates
            .into_iter()
            .zip(values)
            .map(|(d, v)| (d, v * unit))
            .collect())
    }
}

impl TrainedForecastModel for TrainedDecompositionModel {
    fn make_future_dates(&self, horizon: usize) -> Vec<NaiveDate> {
        let mut dates = self.history_dates.clone();
        if let Some(last) = dates.last().copied() {
            dates.extend(future_dates(last, horizon));
        }
        dates
    }

    fn predict(&self, dates: &[NaiveDate]) -> Result<ForecastResult> {
        // leading rows without a value extrapolate the trend backwards
        let first_allowed = self
            .history_dates
            .first()
            .copied()
            .map_or(self.start, |d| d.min(self.start));
        if let Some(early) = dates.iter().find(|d| **d < first_allowed) {
            return Err(ForecastError::InvalidParameter(format!(
                "Cannot predict {} before the first training date {}",
                early, first_allowed
            )));
        }

        let history_end = self.history_dates.last().copied().unwrap_or(self.start);
        let (Some(first), Some(last)) = (dates.iter().min(), dates.iter().max()) else {
            return Err(ForecastError::InvalidParameter(
                "No dates to predict".to_string(),
            ));
        };
        let holidays = holiday_lookup(
            self.config.holidays_country.as_deref(),
            &self.holiday_names,
            *first,
            *last,
        )?;

        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| ForecastError::InvalidParameter(e.to_string()))?;
        let z = normal.inverse_cdf(0.5 + self.config.interval_width / 2.0);
        let n_changepoints = self.changepoints.len() as f64;
        let unit = self.component_unit();
        let seasonal_width: usize = self.terms.iter().map(SeasonalTerm::width).sum();

        let n = dates.len();
        let mut values = Vec::with_capacity(n);
        let mut intervals = Vec::with_capacity(n);
        let mut trend = Vec::with_capacity(n);
        let mut trend_intervals = Vec::with_capacity(n);
        let mut additive_terms = Vec::with_capacity(n);
        let mut multiplicative_terms = Vec::with_capacity(n);
        let mut components: BTreeMap<String, Vec<f64>> = self
            .terms
            .iter()
            .map(|t| (t.name.clone(), Vec::with_capacity(n)))
            .collect();
        if self.config.holidays_country.is_some() {
            components.insert(HOLIDAYS.to_string(), Vec::with_capacity(n));
        }

        for date in dates {
            let t = self.scaled_time(*date);
            let g = dot(&trend_row(t, &self.changepoints), &self.trend_coefficients);
            let row = component_row(*date, &self.terms, self.holiday_names.len(), &holidays);

            let mut offset = 0;
            for term in &self.terms {
                let width = term.width();
                let value = dot(
                    &row[offset..offset + width],
                    &self.component_coefficients[offset..offset + width],
                );
                if let Some(column) = components.get_mut(&term.name) {
                    column.push(value * unit);
                }
                offset += width;
            }
            let seasonal = dot(
                &row[..seasonal_width],
                &self.component_coefficients[..seasonal_width],
            );
            let holiday = dot(
                &row[seasonal_width..],
                &self.component_coefficients[seasonal_width..],
            );
            if let Some(column) = components.get_mut(HOLIDAYS) {
                column.push(holiday * unit);
            }

            let extra = seasonal + holiday;
            // rate changes drawn past the history add variance growing with h³
            let trend_sd = if t > 1.0 {
                (n_changepoints * 2.0 * self.rate_change_scale.powi(2) * (t - 1.0).powi(3) / 3.0)
                    .sqrt()
            } else {
                0.0
            };

            let (yhat, total_sd) = match self.config.seasonality_mode {
                SeasonalityMode::Additive => {
                    additive_terms.push(extra * self.y_scale);
                    multiplicative_terms.push(0.0);
                    (g + extra, self.sigma.hypot(trend_sd))
                }
                SeasonalityMode::Multiplicative => {
                    additive_terms.push(0.0);
                    multiplicative_terms.push(extra);
                    let factor = 1.0 + extra;
                    (g * factor, self.sigma.hypot(trend_sd * factor.abs()))
                }
            };

            let yhat = yhat * self.y_scale;
            let half_width = z * total_sd * self.y_scale;
            values.push(yhat);
            intervals.push((yhat - half_width, yhat + half_width));

            let g = g * self.y_scale;
            let trend_half_width = z * trend_sd * self.y_scale;
            trend.push(g);
            trend_intervals.push((g - trend_half_width, g + trend_half_width));
        }

        Ok(ForecastResult {
            dates: dates.to_vec(),
            values,
            intervals,
            trend,
            trend_intervals,
            components,
            additive_terms,
            multiplicative_terms,
            history_len: dates.iter().filter(|d| **d <= history_end).count(),
        })
    }

    fn name(&self) -> &str {
        "Decomposition"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .checked_add_days(Days::new(offset))
            .unwrap()
    }

    fn frame_from(f: impl Fn(u64) -> f64, n: u64) -> TrainingFrame {
        let points: Vec<(NaiveDate, Option<f64>)> = (0..n).map(|i| (day(i), Some(f(i)))).collect();
        TrainingFrame::from_points(&points).unwrap()
    }

    #[test]
    fn test_changepoint_locations() {
        let t: Vec<f64> = (0..100).map(|i| i as f64 / 99.0).collect();
        let cps = changepoint_locations(&t, 25, 0.8);
        assert_eq!(cps.len(), 25);
        assert!(cps.iter().all(|s| *s > 0.0 && *s <= 0.8));
        assert!(cps.windows(2).all(|w| w[0] < w[1]));

        // three rows leave room for one changepoint
        let short = changepoint_locations(&[0.0, 0.5, 1.0], 25, 0.8);
        assert_eq!(short.len(), 1);
        assert!(changepoint_locations(&[0.0, 1.0], 25, 0.8).is_empty());
    }

    #[test]
    fn test_linear_series_is_recovered() {
        let frame = frame_from(|i| 10.0 + 0.5 * i as f64, 60);
        let model = DecompositionModel::new(ModelConfig::default()).unwrap();
        let trained = model.train(&frame).unwrap();
        let result = trained.predict(&trained.make_future_dates(10)).unwrap();

        assert_eq!(result.len(), 70);
        assert_eq!(result.history_len(), 60);
        for (i, v) in result.values().iter().enumerate() {
            assert_relative_eq!(*v, 10.0 + 0.5 * i as f64, epsilon = 0.5);
        }
    }

    #[test]
    fn test_weekly_profile_matches_signal() {
        let frame = frame_from(
            |i| {
                let dow = days_since_epoch(day(i)) as f64;
                100.0 + 5.0 * (2.0 * std::f64::consts::PI * dow / 7.0).sin()
            },
            140,
        );
        let model = DecompositionModel::new(ModelConfig::default()).unwrap();
        let trained = model.train(&frame).unwrap();
        assert_eq!(trained.seasonality_names(), vec!["weekly"]);

        let profile = trained.seasonality_profile("weekly").unwrap();
        assert_eq!(profile.len(), 7);
        let amplitude = profile.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);
        let expected = 5.0 * (2.0 * std::f64::consts::PI * 2.0 / 7.0).sin().abs();
        assert_relative_eq!(amplitude, expected, epsilon = 0.5);
        assert!(trained.seasonality_profile("yearly").is_err());
    }

    #[test]
    fn test_predict_before_start_is_rejected() {
        let frame = frame_from(|i| i as f64, 20);
        let trained = DecompositionModel::new(ModelConfig::default())
            .unwrap()
            .train(&frame)
            .unwrap();
        let before = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        assert!(matches!(
            trained.predict(&[before]),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_history_has_flat_trend_bounds() {
        let frame = frame_from(|i| 50.0 + (i % 5) as f64, 40);
        let trained = DecompositionModel::new(ModelConfig::default())
            .unwrap()
            .train(&frame)
            .unwrap();
        let result = trained.predict(&trained.make_future_dates(5)).unwrap();
        for i in 0..result.history_len() {
            let (lo, hi) = result.trend_intervals()[i];
            assert_eq!(lo, hi);
        }
        let (lo, hi) = result.trend_intervals()[result.len() - 1];
        assert!(lo <= hi);
    }

    #[test]
    fn test_holiday_regressor_only_for_training_dates() {
        // 2020-01-01 through 2020-03-01 covers New Year, MLK day and Presidents day
        let frame = frame_from(|i| 20.0 + (i as f64).sqrt(), 61);
        let config = ModelConfig::default().with_country_holidays("US");
        let trained = DecompositionModel::new(config).unwrap().train(&frame).unwrap();
        assert_eq!(
            trained.holiday_names(),
            &[
                "Martin Luther King Jr. Day".to_string(),
                "New Year's Day".to_string(),
                "Washington's Birthday".to_string(),
            ]
        );

        let result = trained.predict(&trained.make_future_dates(3)).unwrap();
        assert!(result.component(HOLIDAYS).is_some());
    }
}
