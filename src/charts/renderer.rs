//! Static Chart Renderer
//! Writes the dashboard charts as PNG files with plotters.
//!
//! Output files:
//! 1. daily_revenue.png: line chart of revenue per day
//! 2. category_revenue.png: horizontal bars per category, stacked by city
//! 3. monthly_quantity.png: units sold per month
//! 4. monthly_growth.png: month-over-month growth with a zero line
//! 5. product_rating.png: mean rating per product

use crate::charts::StackedBars;
use crate::stats::DashboardMetrics;
use chrono::{Datelike, NaiveDate};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const SIZE: (u32, u32) = (1200, 700);
const FONT: &str = "sans-serif";

const BLUE: RGBColor = RGBColor(52, 152, 219);
const GREEN: RGBColor = RGBColor(46, 204, 113);
const ORANGE: RGBColor = RGBColor(243, 156, 18);
const PURPLE: RGBColor = RGBColor(155, 89, 182);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every dashboard chart into `dir`, creating it if needed.
    pub fn export_all(metrics: &DashboardMetrics, dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
        fs::create_dir_all(dir)?;
        let sel = &metrics.selection;
        let period = metrics.period.label();
        let mut written = Vec::with_capacity(5);

        let path = dir.join("daily_revenue.png");
        let points: Vec<(f64, f64)> = sel
            .daily_revenue
            .entries()
            .iter()
            .map(|e| (f64::from(e.key.num_days_from_ce()), e.value))
            .collect();
        Self::render_line(
            &path,
            &format!("Daily Revenue - {period}"),
            &points,
            &|x: &f64| {
                NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
                    .map(|d| d.format("%d/%m").to_string())
                    .unwrap_or_default()
            },
            false,
        )?;
        written.push(path);

        let path = dir.join("category_revenue.png");
        Self::render_stacked(
            &path,
            &format!("Revenue by Category - {period}"),
            &StackedBars::from_pairs(&sel.category_city_revenue),
        )?;
        written.push(path);

        let path = dir.join("monthly_quantity.png");
        let labels: Vec<String> = sel
            .monthly_quantity
            .entries()
            .iter()
            .map(|e| e.key.short_name().to_string())
            .collect();
        let values: Vec<f64> = sel.monthly_quantity.values().collect();
        Self::render_bars(
            &path,
            &format!("Sales per Month - {period}"),
            &labels,
            &values,
            GREEN,
        )?;
        written.push(path);

        let path = dir.join("monthly_growth.png");
        let points: Vec<(f64, f64)> = sel
            .monthly_growth
            .entries()
            .iter()
            .map(|e| (f64::from(e.key.get()), e.value))
            .collect();
        Self::render_line(
            &path,
            &format!("Monthly Growth (%) - {period}"),
            &points,
            &|x: &f64| {
                crate::data::MonthKey::new(x.round() as u32)
                    .filter(|_| (x - x.round()).abs() < 1e-6)
                    .map(|m| m.short_name().to_string())
                    .unwrap_or_default()
            },
            true,
        )?;
        written.push(path);

        let path = dir.join("product_rating.png");
        let labels: Vec<String> = sel
            .product_rating
            .entries()
            .iter()
            .map(|e| e.key.clone())
            .collect();
        let values: Vec<f64> = sel.product_rating.values().collect();
        Self::render_bars(
            &path,
            &format!("Rating by Product - {period}"),
            &labels,
            &values,
            PURPLE,
        )?;
        written.push(path);

        info!(dir = %dir.display(), charts = written.len(), "charts exported");
        Ok(written)
    }

    fn render_placeholder(root: &Canvas<'_>, title: &str) -> Result<(), RenderError> {
        let area = root.titled(title, (FONT, 28)).map_err(draw_err)?;
        area.draw(&Text::new(
            "No data for this period",
            (40, 40),
            (FONT, 22).into_font().color(&RGBColor(128, 128, 128)),
        ))
        .map_err(draw_err)?;
        root.present().map_err(draw_err)
    }

    fn render_line(
        path: &Path,
        title: &str,
        points: &[(f64, f64)],
        x_label: &dyn Fn(&f64) -> String,
        zero_line: bool,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        if points.is_empty() {
            return Self::render_placeholder(&root, title);
        }

        let color = if zero_line { ORANGE } else { BLUE };
        let (x0, x1) = padded_range(points.iter().map(|p| p.0), 0.5);
        let (y0, y1) = padded_range(
            points
                .iter()
                .map(|p| p.1)
                .chain(zero_line.then_some(0.0)),
            0.1,
        );

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 28))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(80)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .x_label_formatter(x_label)
            .y_label_formatter(&|v: &f64| format!("{v:.0}"))
            .draw()
            .map_err(draw_err)?;

        if zero_line {
            chart
                .draw_series(LineSeries::new([(x0, 0.0), (x1, 0.0)], &BLACK))
                .map_err(draw_err)?;
        }
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))
            .map_err(draw_err)?;
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 4, color.filled())),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    fn render_bars(
        path: &Path,
        title: &str,
        labels: &[String],
        values: &[f64],
        color: RGBColor,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        if values.is_empty() {
            return Self::render_placeholder(&root, title);
        }

        let n = values.len() as i32;
        let (_, y1) = padded_range(values.iter().copied().chain([0.0]), 0.1);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 28))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(80)
            .build_cartesian_2d((0..n).into_segmented(), 0.0..y1)
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(labels.len())
            .x_label_formatter(&|v: &SegmentValue<i32>| segment_label(labels, v))
            .y_label_formatter(&|v: &f64| format!("{v:.1}"))
            .draw()
            .map_err(draw_err)?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(15)
                    .data(values.iter().enumerate().map(|(i, v)| (i as i32, *v))),
            )
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }

    fn render_stacked(path: &Path, title: &str, layout: &StackedBars) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;
        if layout.is_empty() {
            return Self::render_placeholder(&root, title);
        }

        let n = layout.categories.len() as i32;
        let x1 = layout.max_total().max(1.0) * 1.1;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 28))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(140)
            .build_cartesian_2d(0.0..x1, (0..n).into_segmented())
            .map_err(draw_err)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(layout.categories.len())
            .y_label_formatter(&|v: &SegmentValue<i32>| segment_label(&layout.categories, v))
            .x_label_formatter(&|v: &f64| format!("{v:.0}"))
            .draw()
            .map_err(draw_err)?;

        let mut offsets = vec![0.0; layout.categories.len()];
        for (idx, (city, values)) in layout.series.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            let rects: Vec<Rectangle<(f64, SegmentValue<i32>)>> = values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v > 0.0)
                .map(|(i, v)| {
                    let start = offsets[i];
                    Rectangle::new(
                        [
                            (start, SegmentValue::Exact(i as i32)),
                            (start + v, SegmentValue::Exact(i as i32 + 1)),
                        ],
                        color.filled(),
                    )
                })
                .collect();
            for (offset, v) in offsets.iter_mut().zip(values) {
                *offset += v;
            }

            chart
                .draw_series(rects)
                .map_err(draw_err)?
                .label(city.as_str())
                .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
        }

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .position(SeriesLabelPosition::LowerRight)
            .draw()
            .map_err(draw_err)?;

        root.present().map_err(draw_err)
    }
}

fn segment_label(labels: &[String], value: &SegmentValue<i32>) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| labels.get(i))
            .cloned()
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Min/max of `values` widened by `pad` of the span; a flat series gets a
/// unit-wide band so the axis never collapses.
fn padded_range(values: impl Iterator<Item = f64>, pad: f64) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span == 0.0 {
        return (min - 1.0, max + 1.0);
    }
    (min - span * pad, max + span * pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_widens_span() {
        let (lo, hi) = padded_range([0.0, 10.0].into_iter(), 0.1);
        assert_eq!((lo, hi), (-1.0, 11.0));
    }

    #[test]
    fn padded_range_handles_flat_and_empty_series() {
        assert_eq!(padded_range([5.0, 5.0].into_iter(), 0.1), (4.0, 6.0));
        assert_eq!(padded_range(std::iter::empty(), 0.1), (0.0, 1.0));
        assert_eq!(padded_range([f64::NAN].into_iter(), 0.1), (0.0, 1.0));
    }

    #[test]
    fn segment_labels_map_indices() {
        let labels = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(segment_label(&labels, &SegmentValue::CenterOf(1)), "Feb");
        assert_eq!(segment_label(&labels, &SegmentValue::Exact(5)), "");
        assert_eq!(segment_label(&labels, &SegmentValue::Last), "");
    }
}
