//! Charts module - interactive (egui_plot) and static (plotters) rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};

use crate::stats::PairEntry;

/// Revenue by category, split into one series per city, ready for a
/// stacked horizontal bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedBars {
    /// Bar positions, in ascending order.
    pub categories: Vec<String>,
    /// (city, value per category). Missing combinations are 0.
    pub series: Vec<(String, Vec<f64>)>,
}

impl StackedBars {
    pub fn from_pairs(rows: &[PairEntry]) -> Self {
        let mut categories: Vec<String> = rows.iter().map(|r| r.primary.clone()).collect();
        categories.sort();
        categories.dedup();

        let mut cities: Vec<String> = rows.iter().map(|r| r.secondary.clone()).collect();
        cities.sort();
        cities.dedup();

        let series = cities
            .into_iter()
            .map(|city| {
                let values = categories
                    .iter()
                    .map(|category| {
                        rows.iter()
                            .filter(|r| &r.primary == category && r.secondary == city)
                            .map(|r| r.value)
                            .sum()
                    })
                    .collect();
                (city, values)
            })
            .collect();

        Self { categories, series }
    }

    /// Largest stacked total across categories.
    pub fn max_total(&self) -> f64 {
        (0..self.categories.len())
            .map(|i| self.series.iter().map(|(_, v)| v[i]).sum::<f64>())
            .fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
