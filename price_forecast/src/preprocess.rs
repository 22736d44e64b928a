//! Reduction of a price series to the (ds, y) frame a model trains on

use crate::data::{columns, PriceSeries};
use crate::error::{ForecastError, Result};
use crate::utils::{dates_to_series, series_to_dates};
use chrono::NaiveDate;
use polars::prelude::*;

/// Timestamp column of a training frame
pub const DS: &str = "ds";
/// Value column of a training frame
pub const Y: &str = "y";

/// Two-column (`ds`, `y`) frame; `y` may contain nulls
#[derive(Debug, Clone)]
pub struct TrainingFrame {
    df: DataFrame,
}

impl TrainingFrame {
    /// Wrap an existing frame, checking it has exactly the `ds` and `y` columns
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        let names = df.get_column_names();
        if names.len() != 2 || !names.contains(&DS) || !names.contains(&Y) {
            return Err(ForecastError::DataError(format!(
                "Training frame needs exactly the columns '{}' and '{}', got {:?}",
                DS, Y, names
            )));
        }

        let frame = Self { df };
        // fail early on unparseable timestamps
        frame.dates()?;
        Ok(frame)
    }

    /// Build a frame from (date, value) pairs, keeping their order
    pub fn from_points(points: &[(NaiveDate, Option<f64>)]) -> Result<Self> {
        let dates: Vec<NaiveDate> = points.iter().map(|(d, _)| *d).collect();
        let values: Vec<Option<f64>> = points.iter().map(|(_, v)| *v).collect();
        let df = DataFrame::new(vec![dates_to_series(DS, &dates)?, Series::new(Y, values)])?;
        Ok(Self { df })
    }

    /// Get the DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.df.get_column_names()
    }

    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        series_to_dates(self.df.column(DS)?)
    }

    /// Values with missing and non-finite entries as `None`
    pub fn values(&self) -> Result<Vec<Option<f64>>> {
        let values = self.df.column(Y)?.cast(&DataType::Float64)?;
        let values = values
            .f64()?
            .into_iter()
            .map(|v| v.filter(|x| x.is_finite()))
            .collect();
        Ok(values)
    }

    pub fn points(&self) -> Result<Vec<(NaiveDate, Option<f64>)>> {
        Ok(self.dates()?.into_iter().zip(self.values()?).collect())
    }
}

/// Select the date and close columns and rename them to `ds` / `y`.
///
/// Rows pass through untouched: no filtering, interpolation or outlier
/// handling.
pub fn to_training_frame(series: &PriceSeries) -> Result<TrainingFrame> {
    let mut df = series
        .dataframe()
        .select([columns::DATE, columns::CLOSE])?;
    df.rename(columns::DATE, DS)?;
    df.rename(columns::CLOSE, Y)?;

    log::debug!(
        "Training frame for {} has {} rows",
        series.ticker(),
        df.height()
    );
    Ok(TrainingFrame { df })
}
