//! Sales Pulse - sales dataset analytics dashboard
//!
//! Loads a sales export (CSV, Excel or JSON), normalizes it to canonical
//! column names, and presents per-period and whole-year metrics as
//! interactive charts, summary cards and PNG exports.

pub mod charts;
pub mod config;
pub mod data;
pub mod format;
pub mod gui;
pub mod pipeline;
pub mod stats;
