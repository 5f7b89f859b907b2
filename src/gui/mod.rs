//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;

pub use app::SalesDashboardApp;
pub use chart_viewer::{headline_cards, ranking_cards, year_cards, Card, CardLabel, ChartViewer};
pub use control_panel::{ControlPanel, ControlPanelAction};
