//! Sales Pulse Main Application
//! Main window with control panel and dashboard viewer.

use crate::charts::StaticChartRenderer;
use crate::data::{period_options, Dataset, Period};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{self, Snapshot};
use egui::SidePanel;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Main application window.
pub struct SalesDashboardApp {
    base: Option<Dataset>,
    snapshot: Option<Snapshot>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl SalesDashboardApp {
    /// Open the window on `dataset`, showing `period` when that month exists.
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset: PathBuf, period: Period) -> Self {
        let mut app = Self {
            base: None,
            snapshot: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.control_panel.selected = period;
        app.load(dataset);
        app
    }

    /// Load and normalize a dataset, then recompute for the current period.
    /// A failure clears the dashboard and surfaces the message.
    fn load(&mut self, path: PathBuf) {
        self.control_panel.dataset_path = Some(path.clone());

        let loaded = pipeline::load_dataset(&path).and_then(|base| {
            let months = pipeline::available_months(&base)?;
            Ok((base, months))
        });

        match loaded {
            Ok((base, months)) => {
                info!(path = %path.display(), months = months.len(), "dataset loaded");
                self.control_panel.set_loaded(Some(base.height()));
                self.control_panel.update_options(period_options(&months));
                self.control_panel
                    .set_status(&format!("Loaded {} rows", base.height()));
                self.base = Some(base);
                self.recompute(self.control_panel.selected);
            }
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to load dataset");
                self.base = None;
                self.snapshot = None;
                self.control_panel.set_loaded(None);
                self.control_panel.update_options(vec![Period::AllYear]);
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    /// Filter and aggregate again for `period`. Runs on every selection change.
    fn recompute(&mut self, period: Period) {
        let Some(base) = &self.base else {
            return;
        };

        match Snapshot::compute(base, period) {
            Ok(snapshot) => {
                self.control_panel.set_status(&format!(
                    "{}: {} orders",
                    period.label(),
                    snapshot.view.height()
                ));
                self.snapshot = Some(snapshot);
            }
            Err(e) => {
                error!(period = %period.label(), error = %e, "failed to compute metrics");
                self.snapshot = None;
                self.control_panel.set_error(&e.to_string());
            }
        }
    }

    /// Handle dataset selection
    fn handle_browse_dataset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Sales data", &["csv", "xlsx", "xls", "json"])
            .pick_file()
        {
            self.load(path);
        }
    }

    /// Render the charts of the current snapshot as PNG files and open the folder.
    fn handle_export_charts(&mut self) {
        let Some(snapshot) = &self.snapshot else {
            self.control_panel.set_status("No charts to export");
            return;
        };

        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return; // User cancelled
        };

        match StaticChartRenderer::export_all(&snapshot.metrics, &dir) {
            Ok(files) => {
                self.control_panel.set_status(&format!(
                    "Exported {} charts to {}",
                    files.len(),
                    dir.display()
                ));
                if let Err(e) = open::that(&dir) {
                    warn!(dir = %dir.display(), error = %e, "could not open export folder");
                }
            }
            Err(e) => {
                error!(error = %e, "chart export failed");
                self.control_panel.set_error(&e.to_string());
            }
        }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);

                    match action {
                        ControlPanelAction::BrowseDataset => self.handle_browse_dataset(),
                        ControlPanelAction::PeriodChanged(period) => self.recompute(period),
                        ControlPanelAction::ExportCharts => self.handle_export_charts(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, self.snapshot.as_ref());
        });
    }
}
