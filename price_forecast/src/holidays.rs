//! Country holiday calendars used as model regressors

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::Serialize;

/// A named holiday on a specific date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: String,
}

/// Source of holiday dates for one country
pub trait HolidayCalendar: std::fmt::Debug {
    /// ISO country code
    fn country(&self) -> &str;

    /// All holidays falling in `year`
    fn holidays_in_year(&self, year: i32) -> Vec<Holiday>;

    /// Holidays between `start` and `end` inclusive, in date order
    fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Holiday> {
        let mut out: Vec<Holiday> = (start.year()..=end.year())
            .flat_map(|y| self.holidays_in_year(y))
            .filter(|h| h.date >= start && h.date <= end)
            .collect();
        out.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        out
    }
}

/// Resolve a calendar from a country code
pub fn calendar_for(country: &str) -> Result<Box<dyn HolidayCalendar>> {
    match country.trim().to_uppercase().as_str() {
        "US" | "USA" => Ok(Box::new(UsHolidays)),
        other => Err(ForecastError::ConfigurationError(format!(
            "No holiday calendar for country '{}'",
            other
        ))),
    }
}

/// United States federal holidays with weekend observance
#[derive(Debug, Clone, Copy, Default)]
pub struct UsHolidays;

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    let mut day = next_month.checked_sub_days(Days::new(1))?;
    while day.weekday() != weekday {
        day = day.checked_sub_days(Days::new(1))?;
    }
    Some(day)
}

/// Saturday holidays are observed on Friday, Sunday ones on Monday
fn observed(date: NaiveDate) -> Option<NaiveDate> {
    match date.weekday() {
        Weekday::Sat => date.checked_sub_days(Days::new(1)),
        Weekday::Sun => date.checked_add_days(Days::new(1)),
        _ => None,
    }
}

impl UsHolidays {
    fn push_fixed(out: &mut Vec<Holiday>, date: Option<NaiveDate>, name: &str) {
        if let Some(date) = date {
            out.push(Holiday {
                date,
                name: name.to_string(),
            });
            if let Some(obs) = observed(date) {
                out.push(Holiday {
                    date: obs,
                    name: format!("{} (observed)", name),
                });
            }
        }
    }

    fn push_floating(out: &mut Vec<Holiday>, date: Option<NaiveDate>, name: &str) {
        if let Some(date) = date {
            out.push(Holiday {
                date,
                name: name.to_string(),
            });
        }
    }
}

impl HolidayCalendar for UsHolidays {
    fn country(&self) -> &str {
        "US"
    }

    fn holidays_in_year(&self, year: i32) -> Vec<Holiday> {
        let mut out = Vec::with_capacity(14);
        let ymd = |m, d| NaiveDate::from_ymd_opt(year, m, d);

        Self::push_fixed(&mut out, ymd(1, 1), "New Year's Day");
        if year >= 1986 {
            Self::push_floating(
                &mut out,
                nth_weekday(year, 1, Weekday::Mon, 3),
                "Martin Luther King Jr. Day",
            );
        }
        Self::push_floating(
            &mut out,
            nth_weekday(year, 2, Weekday::Mon, 3),
            "Washington's Birthday",
        );
        Self::push_floating(&mut out, last_weekday(year, 5, Weekday::Mon), "Memorial Day");
        if year >= 2021 {
            Self::push_fixed(&mut out, ymd(6, 19), "Juneteenth National Independence Day");
        }
        Self::push_fixed(&mut out, ymd(7, 4), "Independence Day");
        Self::push_floating(&mut out, nth_weekday(year, 9, Weekday::Mon, 1), "Labor Day");
        Self::push_floating(&mut out, nth_weekday(year, 10, Weekday::Mon, 2), "Columbus Day");
        Self::push_fixed(&mut out, ymd(11, 11), "Veterans Day");
        Self::push_floating(
            &mut out,
            nth_weekday(year, 11, Weekday::Thu, 4),
            "Thanksgiving",
        );
        Self::push_fixed(&mut out, ymd(12, 25), "Christmas Day");

        // observance can push New Year's Day into the previous year
        out.retain(|h| h.date.year() == year);
        if let Some(next_new_year) = NaiveDate::from_ymd_opt(year + 1, 1, 1) {
            if next_new_year.weekday() == Weekday::Sat {
                if let Some(obs) = observed(next_new_year) {
                    out.push(Holiday {
                        date: obs,
                        name: "New Year's Day (observed)".to_string(),
                    });
                }
            }
        }

        out.sort_by_key(|h| h.date);
        out
    }
}
