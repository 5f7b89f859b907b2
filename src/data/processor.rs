//! Data Processor Module
//! Normalizes a raw sales table: canonical headers, typed numeric columns
//! and a parsed order-date column.

use crate::data::dates::{parse_order_date, serial_to_datetime};
use crate::data::schema::{
    typed_columns, COLUMN_RENAMES, ORDER_DATE, QUANTITY, REQUIRED_COLUMNS, TOTAL_AMOUNT,
    UNIT_PRICE,
};
use crate::data::Dataset;
use chrono::NaiveDateTime;
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

/// Absolute difference tolerated between price x quantity and the total.
const TOTAL_TOLERANCE: f64 = 0.01;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(String),
    #[error("Unparsable order date in record {row}: '{value}'")]
    DateParse { row: usize, value: String },
    #[error("Column '{column}' needs a non-negative whole number, got {value} in record {row}")]
    InvalidCount {
        column: String,
        row: usize,
        value: String,
    },
}

/// Turns loader output into a [`Dataset`].
pub struct DataProcessor;

impl DataProcessor {
    /// Apply the fixed header rename table. Unknown columns pass through.
    pub fn rename_columns(raw: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let mut df = raw.clone();
        for (source, target) in COLUMN_RENAMES {
            if df.get_column_index(source).is_some() {
                df.rename(source, target.into())?;
            }
        }
        Ok(df)
    }

    /// Normalize a raw table into a new dataset. `raw` is never modified.
    pub fn normalize(raw: &DataFrame) -> Result<Dataset, ProcessorError> {
        let mut df = Self::rename_columns(raw)?;

        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|name| df.get_column_index(name).is_none())
        {
            return Err(ProcessorError::MissingColumn(missing.to_string()));
        }

        for (name, dtype) in typed_columns() {
            if df.get_column_index(name).is_some() {
                if dtype == DataType::Int64 {
                    Self::check_counts(name, df.column(name)?)?;
                }
                let typed = df.column(name)?.strict_cast(&dtype)?;
                df.with_column(typed)?;
            }
        }

        let dates = Self::parse_order_dates(df.column(ORDER_DATE)?)?;
        df.with_column(Column::new(ORDER_DATE.into(), dates))?;

        if df.get_column_index(UNIT_PRICE).is_some() {
            let mismatches = Self::count_total_mismatches(&df)?;
            if mismatches > 0 {
                warn!(
                    rows = mismatches,
                    "total amount differs from price x quantity; keeping source totals"
                );
            }
        }

        debug!(rows = df.height(), columns = df.width(), "dataset normalized");
        Ok(Dataset::from_normalized(df))
    }

    /// Float to integer casts truncate, so fractional and negative counts
    /// are rejected before the cast. Record numbers are 1-based.
    fn check_counts(name: &str, column: &Column) -> Result<(), ProcessorError> {
        let values = column.strict_cast(&DataType::Float64)?;
        for (idx, value) in values.f64()?.into_iter().enumerate() {
            if let Some(v) = value {
                if v.fract() != 0.0 || v < 0.0 {
                    return Err(ProcessorError::InvalidCount {
                        column: name.to_string(),
                        row: idx + 1,
                        value: v.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Parse every order date. Numeric columns are read as spreadsheet
    /// serials, everything else through its text form. Errors carry the
    /// 1-based record number.
    fn parse_order_dates(column: &Column) -> Result<Vec<NaiveDateTime>, ProcessorError> {
        let is_numeric = matches!(
            column.dtype(),
            DataType::Float32
                | DataType::Float64
                | DataType::Int8
                | DataType::Int16
                | DataType::Int32
                | DataType::Int64
                | DataType::UInt8
                | DataType::UInt16
                | DataType::UInt32
                | DataType::UInt64
        );

        if is_numeric {
            let serials = column.cast(&DataType::Float64)?;
            serials
                .f64()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    value
                        .and_then(serial_to_datetime)
                        .ok_or_else(|| ProcessorError::DateParse {
                            row: row + 1,
                            value: value.map(|v| v.to_string()).unwrap_or_default(),
                        })
                })
                .collect()
        } else {
            let text = column.cast(&DataType::String)?;
            text.str()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    value
                        .and_then(parse_order_date)
                        .ok_or_else(|| ProcessorError::DateParse {
                            row: row + 1,
                            value: value.unwrap_or_default().to_string(),
                        })
                })
                .collect()
        }
    }

    fn count_total_mismatches(df: &DataFrame) -> Result<usize, ProcessorError> {
        let price = df.column(UNIT_PRICE)?.cast(&DataType::Float64)?;
        let quantity = df.column(QUANTITY)?.cast(&DataType::Float64)?;
        let total = df.column(TOTAL_AMOUNT)?.cast(&DataType::Float64)?;

        let count = price
            .f64()?
            .into_iter()
            .zip(quantity.f64()?)
            .zip(total.f64()?)
            .filter(|((p, q), t)| match (p, q, t) {
                (Some(p), Some(q), Some(t)) => (p * q - t).abs() > TOTAL_TOLERANCE,
                _ => false,
            })
            .count();
        Ok(count)
    }
}
