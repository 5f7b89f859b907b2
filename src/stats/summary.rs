//! Dashboard metric bundles.
//!
//! Metrics come in two scopes that are always passed in explicitly:
//! [`YearOverview`] is computed from the unfiltered dataset and stays the
//! same whatever period is selected, [`PeriodMetrics`] from the view the
//! user is looking at.

use crate::data::{Dataset, MonthKey, Period};
use crate::stats::calculator::{
    AggregateError, Aggregator, Extremal, GroupKey, Metric, PairEntry, ValueField,
};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Top and bottom entity of one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking<K> {
    pub top: Extremal<K>,
    pub bottom: Extremal<K>,
}

impl<K: Clone + PartialEq> Ranking<K> {
    pub fn of(metric: &Metric<K>) -> Self {
        Self {
            top: metric.argmax(),
            bottom: metric.argmin(),
        }
    }
}

/// Always-visible context computed over the whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct YearOverview {
    pub monthly_revenue: Metric<MonthKey>,
    pub monthly_quantity: Metric<MonthKey>,
    pub month_by_revenue: Ranking<MonthKey>,
    pub month_by_quantity: Ranking<MonthKey>,
}

impl YearOverview {
    pub fn compute(full_year: &Dataset) -> Result<Self, AggregateError> {
        let monthly_revenue =
            Aggregator::sum_by(full_year, GroupKey::Month, ValueField::TotalAmount)?;
        let monthly_quantity =
            Aggregator::sum_by(full_year, GroupKey::Month, ValueField::Quantity)?;

        Ok(Self {
            month_by_revenue: Ranking::of(&monthly_revenue),
            month_by_quantity: Ranking::of(&monthly_quantity),
            monthly_revenue,
            monthly_quantity,
        })
    }
}

/// Metrics for the currently selected period.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodMetrics {
    pub total_revenue: f64,
    pub total_quantity: i64,
    pub order_count: usize,
    pub daily_revenue: Metric<NaiveDate>,
    pub category_city_revenue: Vec<PairEntry>,
    pub monthly_quantity: Metric<MonthKey>,
    pub monthly_growth: Metric<MonthKey>,
    pub product_rating: Metric<String>,
    pub product_by_quantity: Ranking<String>,
    pub product_by_revenue: Ranking<String>,
    pub product_by_rating: Ranking<String>,
    pub brand_by_quantity: Ranking<String>,
    pub city_by_quantity: Ranking<String>,
    pub city_by_revenue: Ranking<String>,
}

impl PeriodMetrics {
    pub fn compute(view: &Dataset) -> Result<Self, AggregateError> {
        let monthly_quantity = Aggregator::sum_by(view, GroupKey::Month, ValueField::Quantity)?;
        let monthly_growth = Aggregator::month_over_month_growth(&monthly_quantity);

        let product_quantity: Metric<String> =
            Aggregator::sum_by(view, GroupKey::Product, ValueField::Quantity)?;
        let product_revenue: Metric<String> =
            Aggregator::sum_by(view, GroupKey::Product, ValueField::TotalAmount)?;
        let product_rating: Metric<String> =
            Aggregator::mean_by(view, GroupKey::Product, ValueField::Rating)?;
        let brand_quantity: Metric<String> =
            Aggregator::sum_by(view, GroupKey::Brand, ValueField::Quantity)?;
        let city_quantity: Metric<String> =
            Aggregator::sum_by(view, GroupKey::City, ValueField::Quantity)?;
        let city_revenue: Metric<String> =
            Aggregator::sum_by(view, GroupKey::City, ValueField::TotalAmount)?;

        Ok(Self {
            total_revenue: Aggregator::total(view, ValueField::TotalAmount)?,
            total_quantity: Aggregator::total(view, ValueField::Quantity)?.round() as i64,
            order_count: view.height(),
            daily_revenue: Aggregator::sum_by(view, GroupKey::Day, ValueField::TotalAmount)?,
            category_city_revenue: Aggregator::sum_by_pair(
                view,
                GroupKey::Category,
                GroupKey::City,
                ValueField::TotalAmount,
            )?,
            monthly_quantity,
            monthly_growth,
            product_by_quantity: Ranking::of(&product_quantity),
            product_by_revenue: Ranking::of(&product_revenue),
            product_by_rating: Ranking::of(&product_rating),
            product_rating,
            brand_by_quantity: Ranking::of(&brand_quantity),
            city_by_quantity: Ranking::of(&city_quantity),
            city_by_revenue: Ranking::of(&city_revenue),
        })
    }
}

/// Everything the presenters draw for one period selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardMetrics {
    pub period: Period,
    pub year: YearOverview,
    pub selection: PeriodMetrics,
}

impl DashboardMetrics {
    /// `full_year` feeds the year overview, `view` the period metrics.
    pub fn compute(
        full_year: &Dataset,
        view: &Dataset,
        period: Period,
    ) -> Result<Self, AggregateError> {
        let metrics = Self {
            period,
            year: YearOverview::compute(full_year)?,
            selection: PeriodMetrics::compute(view)?,
        };
        debug!(
            period = %period.label(),
            orders = metrics.selection.order_count,
            "dashboard metrics computed"
        );
        Ok(metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::sample_dataset;

    fn month(m: u32) -> MonthKey {
        MonthKey::new(m).unwrap()
    }

    #[test]
    fn full_year_selection() {
        let ds = sample_dataset();
        let metrics = DashboardMetrics::compute(&ds, &ds, Period::AllYear).unwrap();
        let sel = &metrics.selection;

        assert_eq!(sel.total_revenue, 2000.0);
        assert_eq!(sel.total_quantity, 16);
        assert_eq!(sel.order_count, 5);
        assert_eq!(sel.product_by_quantity.top.key().map(String::as_str), Some("Shirt"));
        assert_eq!(sel.product_by_quantity.bottom.key().map(String::as_str), Some("Laptop"));
        assert_eq!(sel.product_by_rating.top.key().map(String::as_str), Some("Laptop"));
        assert_eq!(sel.brand_by_quantity.top.key().map(String::as_str), Some("Loom"));
        assert_eq!(sel.city_by_revenue.top.value(), Some(1500.0));
        assert_eq!(sel.city_by_quantity.bottom.key().map(String::as_str), Some("Natal"));
        assert_eq!(sel.daily_revenue.len(), 5);
    }

    #[test]
    fn year_overview_ignores_selected_period() {
        let ds = sample_dataset();
        let march = ds.filter_by_period(Period::Month(month(3))).unwrap();
        let metrics = DashboardMetrics::compute(&ds, &march, Period::Month(month(3))).unwrap();

        assert_eq!(metrics.year.month_by_revenue.top.key(), Some(&month(1)));
        assert_eq!(metrics.year.month_by_revenue.bottom.key(), Some(&month(3)));
        assert_eq!(metrics.year.month_by_quantity.top.key(), Some(&month(2)));

        assert_eq!(metrics.selection.total_revenue, 300.0);
        assert_eq!(metrics.selection.order_count, 1);
        assert_eq!(metrics.selection.monthly_growth.get(&month(3)), Some(0.0));
    }

    #[test]
    fn empty_period_yields_placeholders() {
        let ds = sample_dataset();
        let july = ds.filter_by_period(Period::Month(month(7))).unwrap();
        let metrics = DashboardMetrics::compute(&ds, &july, Period::Month(month(7))).unwrap();
        let sel = &metrics.selection;

        assert_eq!(sel.total_revenue, 0.0);
        assert_eq!(sel.total_quantity, 0);
        assert_eq!(sel.order_count, 0);
        assert!(sel.daily_revenue.is_empty());
        assert!(sel.category_city_revenue.is_empty());
        assert_eq!(sel.product_by_revenue.top, Extremal::NoData);
        assert_eq!(sel.city_by_quantity.bottom, Extremal::NoData);
        assert!(metrics.year.month_by_revenue.top.key().is_some());
    }

    #[test]
    fn serializes_to_json() {
        let ds = sample_dataset();
        let metrics = DashboardMetrics::compute(&ds, &ds, Period::AllYear).unwrap();
        let json = serde_json::to_value(&metrics).unwrap();

        assert_eq!(json["period"], "AllYear");
        assert_eq!(json["selection"]["product_by_revenue"]["top"]["status"], "found");
        assert_eq!(json["selection"]["product_by_revenue"]["top"]["key"], "Laptop");
        assert_eq!(json["year"]["monthly_quantity"][0]["key"], 1);
    }
}
