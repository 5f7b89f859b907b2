//! Normalized, read-only sales dataset.

use polars::prelude::*;

/// A sales table whose headers use the canonical vocabulary and whose
/// order date is a parsed `Datetime` column.
///
/// Only the normalizer and the period filter construct one. Clones share
/// the underlying column buffers, so handing out copies is cheap and never
/// lets a view mutate the base data.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
}

impl Dataset {
    pub(crate) fn from_normalized(df: DataFrame) -> Self {
        Self { df }
    }

    /// Borrow the underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Column names in frame order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Display text for every cell of one row, in column order.
    pub fn row_cells(&self, row: usize) -> Vec<String> {
        self.df
            .get_columns()
            .iter()
            .map(|column| match column.get(row) {
                Ok(AnyValue::Null) | Err(_) => String::new(),
                Ok(AnyValue::String(s)) => s.to_string(),
                Ok(AnyValue::StringOwned(s)) => s.to_string(),
                Ok(val) => val.to_string(),
            })
            .collect()
    }
}
