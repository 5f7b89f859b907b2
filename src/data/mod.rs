//! Data module - loading, normalization and period filtering

mod dataset;
pub mod dates;
mod filter;
mod loader;
mod processor;
pub mod schema;

#[cfg(test)]
pub(crate) mod test_support;

pub use dataset::Dataset;
pub use filter::{period_options, FilterError, MonthKey, Period, PeriodParseError};
pub(crate) use filter::month_expr;
pub use loader::{DataLoader, LoaderError, SourceFormat};
pub use processor::{DataProcessor, ProcessorError};
