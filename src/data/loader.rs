//! Dataset Loader Module
//! Reads CSV, spreadsheet and JSON sales exports into a Polars DataFrame.

use crate::data::dates::serial_to_datetime;
use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Unsupported file format: {path} (expected .csv, .xlsx, .xls or .json)")]
    UnsupportedFormat { path: String },
    #[error("Failed to parse dataset: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Failed to open dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Spreadsheet has no worksheet")]
    EmptyWorkbook,
}

/// On-disk format, decided by file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Spreadsheet,
    Json,
}

impl SourceFormat {
    /// Pick the parser for a path. Suffixes are matched case-sensitively,
    /// CSV first, then spreadsheet, then JSON.
    pub fn detect(path: &Path) -> Result<Self, LoaderError> {
        let name = path.to_string_lossy();
        if name.ends_with(".csv") {
            Ok(SourceFormat::Csv)
        } else if name.ends_with(".xlsx") || name.ends_with(".xls") {
            Ok(SourceFormat::Spreadsheet)
        } else if name.ends_with(".json") {
            Ok(SourceFormat::Json)
        } else {
            Err(LoaderError::UnsupportedFormat {
                path: name.into_owned(),
            })
        }
    }
}

/// Loads raw (not yet normalized) sales tables.
pub struct DataLoader;

impl DataLoader {
    /// Load the file at `path`, dispatching on its extension.
    pub fn load(path: &Path) -> Result<DataFrame, LoaderError> {
        let format = SourceFormat::detect(path)?;
        debug!(path = %path.display(), ?format, "loading dataset");

        let df = match format {
            SourceFormat::Csv => Self::load_csv(path)?,
            SourceFormat::Spreadsheet => Self::load_spreadsheet(path)?,
            SourceFormat::Json => Self::load_json(path)?,
        };

        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "dataset loaded"
        );
        Ok(df)
    }

    fn load_csv(path: &Path) -> Result<DataFrame, LoaderError> {
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;
        Ok(df)
    }

    fn load_json(path: &Path) -> Result<DataFrame, LoaderError> {
        let file = File::open(path)?;
        let df = JsonReader::new(file).finish()?;
        Ok(df)
    }

    /// Read the first worksheet. Row one is the header.
    fn load_spreadsheet(path: &Path) -> Result<DataFrame, LoaderError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(LoaderError::EmptyWorkbook)??;

        let rows: Vec<&[Data]> = range.rows().collect();
        sheet_frame(&rows)
    }
}

/// Turn worksheet rows into a frame. Row one is the header; an empty header
/// cell is named `column_{n}` with `n` counted from 1.
fn sheet_frame(rows: &[&[Data]]) -> Result<DataFrame, LoaderError> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(DataFrame::empty());
    };

    let columns = header
        .iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match cell {
                Data::Empty => format!("column_{}", idx + 1),
                other => cell_text(other),
            };
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            sheet_column(&name, &cells)
        })
        .collect::<Vec<Column>>();

    Ok(DataFrame::new(columns)?)
}

/// Build one column from spreadsheet cells: numeric when every filled cell
/// is a number, otherwise text (date cells rendered as ISO-8601).
fn sheet_column(name: &str, cells: &[&Data]) -> Column {
    let numeric = cells
        .iter()
        .all(|c| matches!(c, Data::Empty | Data::Float(_) | Data::Int(_)));

    if numeric {
        let values: Vec<Option<f64>> = cells.iter().map(|c| c.as_f64()).collect();
        Column::new(name.into(), values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                Data::Empty => None,
                other => Some(cell_text(other)),
            })
            .collect();
        Column::new(name.into(), values)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => serial_to_datetime(dt.as_f64())
            .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERROR:{:?}", e),
    }
}
