//! Shared fixtures for unit tests.

use crate::data::{DataProcessor, Dataset};
use polars::prelude::*;

/// Five orders across January-March in source (English) headers.
pub(crate) fn sample_raw_frame() -> DataFrame {
    df!(
        "Product" => ["Phone", "Laptop", "Phone", "Shirt", "Shirt"],
        "Category" => ["Electronics", "Electronics", "Electronics", "Apparel", "Apparel"],
        "Brand" => ["Acme", "Zen", "Acme", "Loom", "Loom"],
        "Platform" => ["Amazon", "Shopee", "Amazon", "Shopee", "Amazon"],
        "City" => ["Recife", "Recife", "Natal", "Natal", "Recife"],
        "Price" => [100.0, 1000.0, 100.0, 50.0, 50.0],
        "Quantity" => [2i64, 1, 3, 4, 6],
        "TotalAmount" => [200.0, 1000.0, 300.0, 200.0, 300.0],
        "Rating" => [4.0, 5.0, 3.0, 4.5, 3.5],
        "Reviews" => [10i64, 3, 8, 20, 5],
        "OrderDate" => ["2024-01-10", "2024-01-20", "2024-02-05", "2024-02-15", "2024-03-01"],
    )
    .unwrap()
}

pub(crate) fn sample_dataset() -> Dataset {
    DataProcessor::normalize(&sample_raw_frame()).unwrap()
}

/// Minimal dataset from (product, quantity, total, order date) tuples.
pub(crate) fn dataset_from(rows: &[(&str, i64, f64, &str)]) -> Dataset {
    let products: Vec<&str> = rows.iter().map(|r| r.0).collect();
    let quantities: Vec<i64> = rows.iter().map(|r| r.1).collect();
    let totals: Vec<f64> = rows.iter().map(|r| r.2).collect();
    let dates: Vec<&str> = rows.iter().map(|r| r.3).collect();
    let n = rows.len();

    let raw = df!(
        "Product" => products,
        "Category" => vec!["General"; n],
        "Brand" => vec!["House"; n],
        "City" => vec!["Recife"; n],
        "Quantity" => quantities,
        "TotalAmount" => totals,
        "Rating" => vec![4.0; n],
        "OrderDate" => dates,
    )
    .unwrap();
    DataProcessor::normalize(&raw).unwrap()
}
