//! Stats module - sales aggregation and dashboard metrics

mod calculator;
mod summary;

pub use calculator::{
    AggregateError, Aggregator, Extremal, GroupKey, Metric, MetricEntry, MetricKey, PairEntry,
    ValueField,
};
pub use summary::{DashboardMetrics, PeriodMetrics, Ranking, YearOverview};
