//! Period selection over a normalized dataset.

use crate::data::schema::ORDER_DATE;
use crate::data::Dataset;
use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Failed to filter dataset: {0}")]
    Polars(#[from] PolarsError),
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Calendar month, 1 through 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MonthKey(u8);

impl MonthKey {
    pub fn new(month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self(month as u8))
    }

    pub fn get(self) -> u32 {
        u32::from(self.0)
    }

    /// Three-letter English abbreviation.
    pub fn short_name(self) -> &'static str {
        MONTH_NAMES[usize::from(self.0) - 1]
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Selector value: the whole dataset or a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Period {
    #[default]
    AllYear,
    Month(MonthKey),
}

impl Period {
    /// Label shown in the period selector.
    pub fn label(&self) -> String {
        match self {
            Period::AllYear => "Whole year".to_string(),
            Period::Month(m) => format!("{} ({})", m.short_name(), m),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid period '{0}': expected \"all\" or a month number 1-12")]
pub struct PeriodParseError(String);

impl FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.eq_ignore_ascii_case("all") {
            return Ok(Period::AllYear);
        }
        text.parse::<u32>()
            .ok()
            .and_then(MonthKey::new)
            .map(Period::Month)
            .ok_or_else(|| PeriodParseError(s.to_string()))
    }
}

/// Selector entries: whole year first, then every month present.
pub fn period_options(months: &[MonthKey]) -> Vec<Period> {
    std::iter::once(Period::AllYear)
        .chain(months.iter().copied().map(Period::Month))
        .collect()
}

/// Month number of the order date as an `Int32` expression.
pub(crate) fn month_expr() -> Expr {
    col(ORDER_DATE).dt().month().cast(DataType::Int32)
}

impl Dataset {
    /// Months present in the data, ascending and de-duplicated.
    pub fn distinct_months(&self) -> Result<Vec<MonthKey>, FilterError> {
        let months = self
            .frame()
            .clone()
            .lazy()
            .select([month_expr().alias("month")])
            .collect()?;

        let unique: BTreeSet<MonthKey> = months
            .column("month")?
            .i32()?
            .into_iter()
            .flatten()
            .filter_map(|m| u32::try_from(m).ok().and_then(MonthKey::new))
            .collect();

        Ok(unique.into_iter().collect())
    }

    /// Narrow to the selected period. The receiver is left untouched.
    pub fn filter_by_period(&self, period: Period) -> Result<Dataset, FilterError> {
        match period {
            Period::AllYear => Ok(self.clone()),
            Period::Month(month) => {
                let df = self
                    .frame()
                    .clone()
                    .lazy()
                    .filter(month_expr().eq(lit(month.get() as i32)))
                    .collect()?;
                Ok(Dataset::from_normalized(df))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::sample_dataset;

    #[test]
    fn month_key_rejects_out_of_range() {
        assert!(MonthKey::new(0).is_none());
        assert!(MonthKey::new(13).is_none());
        assert_eq!(MonthKey::new(12).map(MonthKey::get), Some(12));
    }

    #[test]
    fn period_parses_all_and_month_numbers() {
        assert_eq!("all".parse::<Period>(), Ok(Period::AllYear));
        assert_eq!("ALL".parse::<Period>(), Ok(Period::AllYear));
        assert_eq!(
            "3".parse::<Period>(),
            Ok(Period::Month(MonthKey::new(3).unwrap()))
        );
        assert!("13".parse::<Period>().is_err());
        assert!("march".parse::<Period>().is_err());
    }

    #[test]
    fn distinct_months_are_sorted_and_unique() {
        let ds = sample_dataset();
        let months: Vec<u32> = ds
            .distinct_months()
            .unwrap()
            .into_iter()
            .map(MonthKey::get)
            .collect();
        assert_eq!(months, vec![1, 2, 3]);
    }

    #[test]
    fn all_year_keeps_every_row_in_order() {
        let ds = sample_dataset();
        let all = ds.filter_by_period(Period::AllYear).unwrap();
        assert_eq!(all.height(), ds.height());
        assert!(all.frame().equals(ds.frame()));
    }

    #[test]
    fn month_filter_keeps_only_that_month() {
        let ds = sample_dataset();
        let feb = ds
            .filter_by_period(Period::Month(MonthKey::new(2).unwrap()))
            .unwrap();
        assert_eq!(feb.height(), 2);
        let months = feb.distinct_months().unwrap();
        assert_eq!(months, vec![MonthKey::new(2).unwrap()]);
        // base dataset unchanged
        assert_eq!(ds.height(), 5);
    }

    #[test]
    fn month_without_records_yields_empty_dataset() {
        let ds = sample_dataset();
        let july = ds
            .filter_by_period(Period::Month(MonthKey::new(7).unwrap()))
            .unwrap();
        assert!(july.is_empty());
        assert!(july.distinct_months().unwrap().is_empty());
    }

    #[test]
    fn options_start_with_whole_year() {
        let months = [MonthKey::new(1).unwrap(), MonthKey::new(4).unwrap()];
        let options = period_options(&months);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0], Period::AllYear);
        assert_eq!(options[2], Period::Month(months[1]));
    }
}
