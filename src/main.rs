//! Sales Pulse - Sales Analytics Dashboard
//!
//! Opens the dashboard window, or with `--summary` / `--export-charts`
//! runs once without a window.

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use eframe::egui;
use sales_pulse::charts::StaticChartRenderer;
use sales_pulse::config::{Cli, DEFAULT_LOG_FILTER};
use sales_pulse::gui::SalesDashboardApp;
use sales_pulse::pipeline::{self, Snapshot};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if cli.is_headless() {
        return run_headless(&cli);
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Sales Pulse"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Sales Pulse",
        options,
        Box::new(move |cc| Ok(Box::new(SalesDashboardApp::new(cc, cli.dataset, cli.period)))),
    )
    .map_err(|e| anyhow!("failed to start dashboard window: {e}"))
}

fn run_headless(cli: &Cli) -> Result<()> {
    let base = pipeline::load_dataset(&cli.dataset)
        .with_context(|| format!("failed to load {}", cli.dataset.display()))?;
    let snapshot = Snapshot::compute(&base, cli.period)
        .with_context(|| format!("failed to compute metrics for {}", cli.period.label()))?;

    if cli.summary {
        let json = serde_json::to_string_pretty(&snapshot.metrics)
            .context("failed to serialize metrics")?;
        println!("{json}");
    }

    if let Some(dir) = &cli.export_charts {
        let files = StaticChartRenderer::export_all(&snapshot.metrics, dir)
            .with_context(|| format!("failed to export charts to {}", dir.display()))?;
        info!(count = files.len(), dir = %dir.display(), "charts written");
        if cli.open_export {
            open::that(dir).with_context(|| format!("failed to open {}", dir.display()))?;
        }
    }

    Ok(())
}
