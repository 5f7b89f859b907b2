//! Command line and environment configuration.

use crate::data::Period;
use clap::Parser;
use std::path::PathBuf;

/// Dataset opened when nothing else is configured.
pub const DEFAULT_DATASET: &str = "vendas_loja.csv";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "sales_pulse=info";

#[derive(Debug, Clone, Parser)]
#[command(name = "sales_pulse")]
#[command(about = "Sales dataset analytics dashboard", version)]
pub struct Cli {
    /// Sales dataset to open (.csv, .xlsx, .xls or .json)
    #[arg(short, long, env = "SALES_PULSE_DATASET", default_value = DEFAULT_DATASET)]
    pub dataset: PathBuf,

    /// Initial period: "all" or a month number 1-12
    #[arg(short, long, default_value = "all")]
    pub period: Period,

    /// Print the dashboard metrics for the period as JSON and exit
    #[arg(long)]
    pub summary: bool,

    /// Render the dashboard charts as PNG files into DIR and exit
    #[arg(long, value_name = "DIR")]
    pub export_charts: Option<PathBuf>,

    /// Open the export folder once the charts are written
    #[arg(long, requires = "export_charts")]
    pub open_export: bool,
}

impl Cli {
    /// True when no window should be opened.
    pub fn is_headless(&self) -> bool {
        self.summary || self.export_charts.is_some()
    }
}
