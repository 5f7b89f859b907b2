//! Chart Plotter Module
//! Interactive dashboard charts drawn with egui_plot.

use crate::charts::StackedBars;
use crate::data::MonthKey;
use crate::format::{format_currency, format_percent};
use crate::stats::{Metric, PairEntry};
use chrono::{Datelike, NaiveDate};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, HLine, Legend, Line, Plot, PlotPoints, Points};
use std::ops::RangeInclusive;

pub const REVENUE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const QUANTITY_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const GROWTH_COLOR: Color32 = Color32::from_rgb(243, 156, 18); // Orange
pub const RATING_COLOR: Color32 = Color32::from_rgb(155, 89, 182); // Purple

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Draws the five dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th series of a chart.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Label for an integer grid mark, empty between integers or out of range.
    fn index_label(labels: &[String], mark: GridMark) -> String {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    fn placeholder(ui: &mut egui::Ui, height: f32) {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("No data for this period")
                        .size(14.0)
                        .color(Color32::GRAY),
                );
            });
        });
    }

    /// Revenue per calendar day.
    pub fn draw_daily_revenue(ui: &mut egui::Ui, daily: &Metric<NaiveDate>, height: f32) {
        if daily.is_empty() {
            Self::placeholder(ui, height);
            return;
        }

        let points: PlotPoints = daily
            .entries()
            .iter()
            .map(|e| [f64::from(e.key.num_days_from_ce()), e.value])
            .collect();

        Plot::new("daily_revenue")
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Day")
            .y_axis_label("Revenue")
            .x_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
                NaiveDate::from_num_days_from_ce_opt(mark.value.round() as i32)
                    .map(|d| d.format("%d/%m").to_string())
                    .unwrap_or_default()
            })
            .label_formatter(|_name, value| {
                let day = NaiveDate::from_num_days_from_ce_opt(value.x.round() as i32)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default();
                format!("{day}\n{}", format_currency(value.y))
            })
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(points)
                        .color(REVENUE_COLOR)
                        .width(2.0)
                        .name("Revenue"),
                );
            });
    }

    /// Horizontal revenue bars per category, stacked by city.
    pub fn draw_category_revenue(ui: &mut egui::Ui, rows: &[PairEntry], height: f32) {
        let layout = StackedBars::from_pairs(rows);
        if layout.is_empty() {
            Self::placeholder(ui, height);
            return;
        }

        let labels = layout.categories.clone();
        let mut charts: Vec<BarChart> = Vec::with_capacity(layout.series.len());
        for (idx, (city, values)) in layout.series.iter().enumerate() {
            let bars: Vec<Bar> = values
                .iter()
                .enumerate()
                .map(|(i, v)| Bar::new(i as f64, *v).width(0.6))
                .collect();

            let below: Vec<&BarChart> = charts.iter().collect();
            let chart = BarChart::new(bars)
                .horizontal()
                .color(Self::series_color(idx))
                .name(city)
                .stack_on(&below);
            charts.push(chart);
        }

        Plot::new("category_revenue")
            .height(height)
            .allow_scroll(false)
            .legend(Legend::default())
            .x_axis_label("Revenue")
            .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                Self::index_label(&labels, mark)
            })
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    /// Units sold per month.
    pub fn draw_monthly_quantity(ui: &mut egui::Ui, monthly: &Metric<MonthKey>, height: f32) {
        if monthly.is_empty() {
            Self::placeholder(ui, height);
            return;
        }

        let bars: Vec<Bar> = monthly
            .entries()
            .iter()
            .map(|e| {
                Bar::new(f64::from(e.key.get()), e.value)
                    .width(0.6)
                    .name(e.key.short_name())
            })
            .collect();

        Plot::new("monthly_quantity")
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label("Quantity")
            .x_axis_formatter(Self::month_axis)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(QUANTITY_COLOR).name("Quantity"));
            });
    }

    /// Month-over-month growth with a zero reference line.
    pub fn draw_growth(ui: &mut egui::Ui, growth: &Metric<MonthKey>, height: f32) {
        if growth.is_empty() {
            Self::placeholder(ui, height);
            return;
        }

        let coords: Vec<[f64; 2]> = growth
            .entries()
            .iter()
            .map(|e| [f64::from(e.key.get()), e.value])
            .collect();

        Plot::new("monthly_growth")
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Month")
            .y_axis_label("Growth (%)")
            .x_axis_formatter(Self::month_axis)
            .label_formatter(|_name, value| format_percent(value.y))
            .show(ui, |plot_ui| {
                plot_ui.hline(HLine::new(0.0).color(Color32::GRAY).width(1.0));
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(coords.iter().copied()))
                        .color(GROWTH_COLOR)
                        .width(2.0)
                        .name("Growth"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(coords.iter().copied()))
                        .radius(4.0)
                        .color(GROWTH_COLOR),
                );
            });
    }

    /// Mean rating per product as horizontal bars.
    pub fn draw_product_rating(ui: &mut egui::Ui, rating: &Metric<String>, height: f32) {
        if rating.is_empty() {
            Self::placeholder(ui, height);
            return;
        }

        let labels: Vec<String> = rating.entries().iter().map(|e| e.key.clone()).collect();
        let bars: Vec<Bar> = rating
            .entries()
            .iter()
            .enumerate()
            .map(|(i, e)| Bar::new(i as f64, e.value).width(0.6).name(&e.key))
            .collect();

        Plot::new("product_rating")
            .height(height)
            .allow_scroll(false)
            .include_x(0.0)
            .include_x(5.0)
            .x_axis_label("Rating")
            .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                Self::index_label(&labels, mark)
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .horizontal()
                        .color(RATING_COLOR)
                        .name("Rating"),
                );
            });
    }

    fn month_axis(mark: GridMark, _range: &RangeInclusive<f64>) -> String {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 1.0 {
            return String::new();
        }
        MonthKey::new(rounded as u32)
            .map(|m| m.short_name().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(value: f64) -> GridMark {
        GridMark {
            value,
            step_size: 1.0,
        }
    }

    #[test]
    fn index_labels_only_on_integer_marks() {
        let labels = vec!["Apparel".to_string(), "Electronics".to_string()];
        assert_eq!(ChartPlotter::index_label(&labels, mark(1.0)), "Electronics");
        assert_eq!(ChartPlotter::index_label(&labels, mark(0.5)), "");
        assert_eq!(ChartPlotter::index_label(&labels, mark(-1.0)), "");
        assert_eq!(ChartPlotter::index_label(&labels, mark(2.0)), "");
    }

    #[test]
    fn month_axis_names_months() {
        let range = 0.0..=13.0;
        assert_eq!(ChartPlotter::month_axis(mark(3.0), &range), "Mar");
        assert_eq!(ChartPlotter::month_axis(mark(2.5), &range), "");
        assert_eq!(ChartPlotter::month_axis(mark(13.0), &range), "");
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(ChartPlotter::series_color(0), ChartPlotter::series_color(10));
    }
}
