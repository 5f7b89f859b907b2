//! Control Panel Widget
//! Left side panel with the dataset picker, period selector and export.

use crate::data::Period;
use egui::{Color32, ComboBox, RichText};
use std::path::PathBuf;

/// Left side control panel.
pub struct ControlPanel {
    pub dataset_path: Option<PathBuf>,
    pub options: Vec<Period>,
    pub selected: Period,
    pub row_count: usize,
    /// A dataset is loaded and a snapshot can be computed.
    pub loaded: bool,
    pub status: String,
    pub error: Option<String>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            dataset_path: None,
            options: vec![Period::AllYear],
            selected: Period::AllYear,
            row_count: 0,
            loaded: false,
            status: "Ready".to_string(),
            error: None,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace selector entries after a dataset load. Keeps the current
    /// selection when it is still offered.
    pub fn update_options(&mut self, options: Vec<Period>) {
        if !options.contains(&self.selected) {
            self.selected = Period::AllYear;
        }
        self.options = options;
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.error = None;
    }

    pub fn set_error(&mut self, error: &str) {
        self.error = Some(error.to_string());
    }

    /// Record the outcome of a dataset load. Later errors (export,
    /// recompute) leave this untouched.
    pub fn set_loaded(&mut self, row_count: Option<usize>) {
        self.loaded = row_count.is_some();
        self.row_count = row_count.unwrap_or(0);
    }

    fn has_data(&self) -> bool {
        self.loaded
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📊 Sales Pulse")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
            ui.label(RichText::new("General Overview").size(11.0).color(Color32::GRAY));
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Data Source Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .dataset_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.dataset_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseDataset;
                        }
                    });
                });
                if self.has_data() {
                    ui.label(
                        RichText::new(format!("{} orders", self.row_count))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Period Section =====
        ui.label(RichText::new("📅 Period").size(14.0).strong());
        ui.add_space(5.0);

        ui.add_enabled_ui(self.has_data(), |ui| {
            ComboBox::from_id_salt("period")
                .width(200.0)
                .selected_text(self.selected.label())
                .show_ui(ui, |ui| {
                    for option in &self.options {
                        if ui
                            .selectable_label(self.selected == *option, option.label())
                            .clicked()
                            && self.selected != *option
                        {
                            self.selected = *option;
                            action = ControlPanelAction::PeriodChanged(*option);
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Export =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.has_data(), |ui| {
                let button = egui::Button::new(RichText::new("🖼 Export Charts").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportCharts;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status =====
        match &self.error {
            Some(error) => {
                ui.label(
                    RichText::new(format!("Error: {error}"))
                        .size(12.0)
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
            None => {
                ui.label(RichText::new(&self.status).size(11.0).color(Color32::GRAY));
            }
        }

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseDataset,
    PeriodChanged(Period),
    ExportCharts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MonthKey;

    #[test]
    fn selection_resets_when_month_disappears() {
        let mut panel = ControlPanel::new();
        let march = Period::Month(MonthKey::new(3).unwrap());
        panel.update_options(vec![Period::AllYear, march]);
        panel.selected = march;

        panel.update_options(vec![Period::AllYear, Period::Month(MonthKey::new(4).unwrap())]);
        assert_eq!(panel.selected, Period::AllYear);
    }

    #[test]
    fn controls_follow_load_state() {
        let mut panel = ControlPanel::new();
        assert!(!panel.has_data());

        panel.update_options(vec![Period::AllYear, Period::Month(MonthKey::new(1).unwrap())]);
        panel.set_loaded(Some(5));
        assert!(panel.has_data());

        panel.set_loaded(None);
        panel.set_error("Unsupported file format: data.txt");
        assert!(!panel.has_data());
        assert_eq!(panel.row_count, 0);
    }

    #[test]
    fn export_failure_keeps_controls_enabled() {
        let mut panel = ControlPanel::new();
        panel.update_options(vec![Period::AllYear, Period::Month(MonthKey::new(1).unwrap())]);
        panel.set_loaded(Some(5));
        panel.set_status("Loaded 5 rows");

        panel.set_error("Failed to write chart: Permission denied");
        assert!(panel.has_data());
        assert!(panel.error.is_some());
    }
}
