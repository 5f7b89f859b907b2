//! Sales Aggregator Module
//! Group-by sums and means over a dataset view, extremal lookups and
//! month-over-month growth.
//!
//! Every function is pure: it reads the view it is handed and returns a
//! freshly built metric. Which view (full year or the selected period) is
//! the caller's decision.

use crate::data::month_expr;
use crate::data::schema::{
    BRAND, CATEGORY, CITY, ORDER_DATE, PRODUCT, QUANTITY, RATING, REVIEW_COUNT, TOTAL_AMOUNT,
    UNIT_PRICE,
};
use crate::data::{Dataset, MonthKey};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Aggregation failed: {0}")]
    Polars(#[from] PolarsError),
}

const KEY: &str = "key";
const SECONDARY: &str = "secondary";
const VALUE: &str = "value";

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Dimension records are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Product,
    Category,
    Brand,
    City,
    Month,
    Day,
}

impl GroupKey {
    fn expr(self) -> Expr {
        match self {
            GroupKey::Product => col(PRODUCT),
            GroupKey::Category => col(CATEGORY),
            GroupKey::Brand => col(BRAND),
            GroupKey::City => col(CITY),
            GroupKey::Month => month_expr(),
            GroupKey::Day => col(ORDER_DATE).dt().date(),
        }
    }
}

/// Numeric column being summarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    UnitPrice,
    Quantity,
    TotalAmount,
    Rating,
    ReviewCount,
}

impl ValueField {
    pub fn column(self) -> &'static str {
        match self {
            ValueField::UnitPrice => UNIT_PRICE,
            ValueField::Quantity => QUANTITY,
            ValueField::TotalAmount => TOTAL_AMOUNT,
            ValueField::Rating => RATING,
            ValueField::ReviewCount => REVIEW_COUNT,
        }
    }

    fn expr(self) -> Expr {
        col(self.column()).cast(DataType::Float64)
    }
}

/// Key type a grouped column can be decoded into.
pub trait MetricKey: Clone + Ord {
    fn decode(column: &Column) -> PolarsResult<Vec<Option<Self>>>;
}

impl MetricKey for String {
    fn decode(column: &Column) -> PolarsResult<Vec<Option<Self>>> {
        let text = column.cast(&DataType::String)?;
        Ok(text
            .str()?
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect())
    }
}

impl MetricKey for MonthKey {
    fn decode(column: &Column) -> PolarsResult<Vec<Option<Self>>> {
        let months = column.strict_cast(&DataType::Int32)?;
        Ok(months
            .i32()?
            .into_iter()
            .map(|v| v.and_then(|m| u32::try_from(m).ok()).and_then(MonthKey::new))
            .collect())
    }
}

impl MetricKey for NaiveDate {
    fn decode(column: &Column) -> PolarsResult<Vec<Option<Self>>> {
        let days = column.strict_cast(&DataType::Int32)?;
        Ok(days
            .i32()?
            .into_iter()
            .map(|v| {
                v.and_then(|d| d.checked_add(UNIX_EPOCH_DAYS_FROM_CE))
                    .and_then(NaiveDate::from_num_days_from_ce_opt)
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricEntry<K> {
    pub key: K,
    pub value: f64,
}

/// Group key -> numeric summary, ordered ascending by key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metric<K> {
    entries: Vec<MetricEntry<K>>,
}

impl<K> Default for Metric<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Ord> Metric<K> {
    pub fn from_entries(entries: impl IntoIterator<Item = (K, f64)>) -> Self {
        let mut entries: Vec<MetricEntry<K>> = entries
            .into_iter()
            .map(|(key, value)| MetricEntry { key, value })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        Self { entries }
    }
}

impl<K> Metric<K> {
    pub fn entries(&self) -> &[MetricEntry<K>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.value)
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.values().sum()
    }
}

impl<K: Clone + PartialEq> Metric<K> {
    pub fn get(&self, key: &K) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.key == key)
            .map(|e| e.value)
    }

    /// Entry with the largest value. Ties go to the smallest key.
    pub fn argmax(&self) -> Extremal<K> {
        self.extreme_by(|candidate, best| candidate > best)
    }

    /// Entry with the smallest value. Ties go to the smallest key.
    pub fn argmin(&self) -> Extremal<K> {
        self.extreme_by(|candidate, best| candidate < best)
    }

    fn extreme_by(&self, beats: impl Fn(f64, f64) -> bool) -> Extremal<K> {
        let mut best: Option<&MetricEntry<K>> = None;
        for entry in self.entries.iter().filter(|e| !e.value.is_nan()) {
            match best {
                Some(current) if !beats(entry.value, current.value) => {}
                _ => best = Some(entry),
            }
        }
        best.map_or(Extremal::NoData, |e| Extremal::Found {
            key: e.key.clone(),
            value: e.value,
        })
    }
}

/// Result of an argmax/argmin lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Extremal<K> {
    Found { key: K, value: f64 },
    NoData,
}

impl<K> Extremal<K> {
    pub fn key(&self) -> Option<&K> {
        match self {
            Extremal::Found { key, .. } => Some(key),
            Extremal::NoData => None,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Extremal::Found { value, .. } => Some(*value),
            Extremal::NoData => None,
        }
    }
}

/// One cell of a two-dimensional breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairEntry {
    pub primary: String,
    pub secondary: String,
    pub value: f64,
}

/// Stateless aggregation over a [`Dataset`] view.
pub struct Aggregator;

impl Aggregator {
    /// Sum of `field` per group. Null keys are skipped.
    pub fn sum_by<K: MetricKey>(
        ds: &Dataset,
        by: GroupKey,
        field: ValueField,
    ) -> Result<Metric<K>, AggregateError> {
        Self::grouped(ds, by, field.expr().sum())
    }

    /// Mean of `field` per group. Groups with no values are dropped.
    pub fn mean_by<K: MetricKey>(
        ds: &Dataset,
        by: GroupKey,
        field: ValueField,
    ) -> Result<Metric<K>, AggregateError> {
        Self::grouped(ds, by, field.expr().mean())
    }

    fn grouped<K: MetricKey>(
        ds: &Dataset,
        by: GroupKey,
        agg: Expr,
    ) -> Result<Metric<K>, AggregateError> {
        let out = ds
            .frame()
            .clone()
            .lazy()
            .group_by([by.expr().alias(KEY)])
            .agg([agg.alias(VALUE)])
            .collect()?;

        let keys = K::decode(out.column(KEY)?)?;
        let values = out.column(VALUE)?.cast(&DataType::Float64)?;
        let entries: Vec<(K, f64)> = keys
            .into_iter()
            .zip(values.f64()?)
            .filter_map(|(k, v)| Some((k?, v?)))
            .collect();

        Ok(Metric::from_entries(entries))
    }

    /// Sum of `field` per (primary, secondary) pair, ordered by both keys.
    pub fn sum_by_pair(
        ds: &Dataset,
        primary: GroupKey,
        secondary: GroupKey,
        field: ValueField,
    ) -> Result<Vec<PairEntry>, AggregateError> {
        let out = ds
            .frame()
            .clone()
            .lazy()
            .group_by([primary.expr().alias(KEY), secondary.expr().alias(SECONDARY)])
            .agg([field.expr().sum().alias(VALUE)])
            .collect()?;

        let primaries = <String as MetricKey>::decode(out.column(KEY)?)?;
        let secondaries = <String as MetricKey>::decode(out.column(SECONDARY)?)?;
        let values = out.column(VALUE)?.cast(&DataType::Float64)?;

        let mut rows: Vec<PairEntry> = primaries
            .into_iter()
            .zip(secondaries)
            .zip(values.f64()?)
            .filter_map(|((p, s), v)| {
                Some(PairEntry {
                    primary: p?,
                    secondary: s?,
                    value: v?,
                })
            })
            .collect();
        rows.sort_by(|a, b| {
            a.primary
                .cmp(&b.primary)
                .then_with(|| a.secondary.cmp(&b.secondary))
        });
        Ok(rows)
    }

    /// Column total over the whole view; 0 when empty.
    pub fn total(ds: &Dataset, field: ValueField) -> Result<f64, AggregateError> {
        let values = ds.frame().column(field.column())?.cast(&DataType::Float64)?;
        Ok(values.f64()?.into_iter().flatten().sum())
    }

    /// Percentage change of each month against the previous month present
    /// in the series, rounded to two decimals. The first month, and any
    /// month following a zero, reports 0.
    pub fn month_over_month_growth(monthly: &Metric<MonthKey>) -> Metric<MonthKey> {
        let mut previous: Option<f64> = None;
        let growth: Vec<(MonthKey, f64)> = monthly
            .entries()
            .iter()
            .map(|entry| {
                let pct = match previous {
                    Some(prev) if prev != 0.0 => round2((entry.value - prev) / prev * 100.0),
                    _ => 0.0,
                };
                previous = Some(entry.value);
                (entry.key, pct)
            })
            .collect();
        Metric::from_entries(growth)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_support::{dataset_from, sample_dataset};

    fn month(m: u32) -> MonthKey {
        MonthKey::new(m).unwrap()
    }

    #[test]
    fn monthly_quantity_and_growth_for_two_months() {
        let ds = dataset_from(&[
            ("Phone", 10, 100.0, "2024-01-15"),
            ("Phone", 15, 200.0, "2024-02-10"),
        ]);

        let monthly: Metric<MonthKey> =
            Aggregator::sum_by(&ds, GroupKey::Month, ValueField::Quantity).unwrap();
        assert_eq!(monthly.get(&month(1)), Some(10.0));
        assert_eq!(monthly.get(&month(2)), Some(15.0));

        let growth = Aggregator::month_over_month_growth(&monthly);
        assert_eq!(growth.get(&month(1)), Some(0.0));
        assert_eq!(growth.get(&month(2)), Some(50.0));
    }

    #[test]
    fn growth_is_relative_to_previous_present_month() {
        let ds = sample_dataset();
        let monthly: Metric<MonthKey> =
            Aggregator::sum_by(&ds, GroupKey::Month, ValueField::Quantity).unwrap();
        let growth = Aggregator::month_over_month_growth(&monthly);

        let values: Vec<f64> = growth.values().collect();
        assert_eq!(values, vec![0.0, 133.33, -14.29]);
    }

    #[test]
    fn growth_after_zero_month_is_zero() {
        let monthly = Metric::from_entries([(month(1), 0.0), (month(2), 5.0)]);
        let growth = Aggregator::month_over_month_growth(&monthly);
        assert_eq!(growth.get(&month(2)), Some(0.0));
    }

    #[test]
    fn product_sums_partition_the_total() {
        let ds = sample_dataset();
        let by_product: Metric<String> =
            Aggregator::sum_by(&ds, GroupKey::Product, ValueField::Quantity).unwrap();
        let total = Aggregator::total(&ds, ValueField::Quantity).unwrap();

        assert_eq!(total, 16.0);
        assert_eq!(by_product.total(), total);
        let keys: Vec<&str> = by_product.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Laptop", "Phone", "Shirt"]);
    }

    #[test]
    fn mean_rating_per_product() {
        let ds = sample_dataset();
        let rating: Metric<String> =
            Aggregator::mean_by(&ds, GroupKey::Product, ValueField::Rating).unwrap();
        assert_eq!(rating.get(&"Phone".to_string()), Some(3.5));
        assert_eq!(rating.get(&"Laptop".to_string()), Some(5.0));
        assert_eq!(rating.get(&"Shirt".to_string()), Some(4.0));
    }

    #[test]
    fn extremal_ties_go_to_smallest_key() {
        let ds = sample_dataset();
        let revenue: Metric<String> =
            Aggregator::sum_by(&ds, GroupKey::Product, ValueField::TotalAmount).unwrap();

        assert_eq!(
            revenue.argmax(),
            Extremal::Found {
                key: "Laptop".to_string(),
                value: 1000.0
            }
        );
        // Phone and Shirt both sold 500.
        assert_eq!(revenue.argmin().key().map(String::as_str), Some("Phone"));
    }

    #[test]
    fn extremal_ignores_nan_and_reports_no_data() {
        let metric = Metric::from_entries([("a".to_string(), f64::NAN), ("b".to_string(), 1.0)]);
        assert_eq!(metric.argmax().key().map(String::as_str), Some("b"));

        let empty: Metric<String> = Metric::default();
        assert_eq!(empty.argmax(), Extremal::NoData);
        assert_eq!(empty.argmin(), Extremal::NoData);
    }

    #[test]
    fn empty_view_yields_empty_metrics() {
        let ds = dataset_from(&[]);
        let by_product: Metric<String> =
            Aggregator::sum_by(&ds, GroupKey::Product, ValueField::Quantity).unwrap();
        assert!(by_product.is_empty());
        assert_eq!(by_product.argmax(), Extremal::NoData);
        assert_eq!(Aggregator::total(&ds, ValueField::TotalAmount).unwrap(), 0.0);

        let monthly: Metric<MonthKey> =
            Aggregator::sum_by(&ds, GroupKey::Month, ValueField::Quantity).unwrap();
        assert!(Aggregator::month_over_month_growth(&monthly).is_empty());
    }

    #[test]
    fn daily_revenue_is_keyed_by_date() {
        let ds = dataset_from(&[
            ("Phone", 1, 10.0, "2024-01-15 09:00:00"),
            ("Shirt", 1, 5.0, "2024-01-15 18:30:00"),
            ("Phone", 1, 10.0, "2024-01-16"),
        ]);
        let daily: Metric<NaiveDate> =
            Aggregator::sum_by(&ds, GroupKey::Day, ValueField::TotalAmount).unwrap();

        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        assert_eq!(daily.len(), 2);
        assert_eq!(daily.get(&day(15)), Some(15.0));
        assert_eq!(daily.get(&day(16)), Some(10.0));
    }

    #[test]
    fn category_city_breakdown_is_sorted() {
        let ds = sample_dataset();
        let rows =
            Aggregator::sum_by_pair(&ds, GroupKey::Category, GroupKey::City, ValueField::TotalAmount)
                .unwrap();

        let flat: Vec<(&str, &str, f64)> = rows
            .iter()
            .map(|r| (r.primary.as_str(), r.secondary.as_str(), r.value))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("Apparel", "Natal", 200.0),
                ("Apparel", "Recife", 300.0),
                ("Electronics", "Natal", 300.0),
                ("Electronics", "Recife", 1200.0),
            ]
        );
    }

    #[test]
    fn month_key_mismatch_is_an_error() {
        let ds = sample_dataset();
        let result: Result<Metric<MonthKey>, _> =
            Aggregator::sum_by(&ds, GroupKey::Product, ValueField::Quantity);
        assert!(result.is_err());
    }
}
