//! Canonical column vocabulary of a normalized sales dataset.

use polars::prelude::DataType;

pub const PRODUCT: &str = "Produto";
pub const CATEGORY: &str = "Categoria";
pub const BRAND: &str = "Marca";
pub const PLATFORM: &str = "Plataforma";
pub const CITY: &str = "Cidade";
pub const UNIT_PRICE: &str = "Preço";
pub const AMOUNT: &str = "Valor";
pub const QUANTITY: &str = "Quantidade";
pub const TOTAL_AMOUNT: &str = "ValorTotal";
pub const RATING: &str = "Avaliação";
pub const REVIEW_COUNT: &str = "Avaliações";
pub const ORDER_DATE: &str = "Data_do_pedido";

/// Source header -> canonical header.
pub const COLUMN_RENAMES: [(&str, &str); 12] = [
    ("Product", PRODUCT),
    ("Category", CATEGORY),
    ("Brand", BRAND),
    ("Platform", PLATFORM),
    ("City", CITY),
    ("Price", UNIT_PRICE),
    ("Amount", AMOUNT),
    ("Quantity", QUANTITY),
    ("TotalAmount", TOTAL_AMOUNT),
    ("Rating", RATING),
    ("Reviews", REVIEW_COUNT),
    ("OrderDate", ORDER_DATE),
];

/// Columns the dashboard cannot be computed without.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    PRODUCT,
    CATEGORY,
    BRAND,
    CITY,
    QUANTITY,
    TOTAL_AMOUNT,
    RATING,
    ORDER_DATE,
];

/// Canonical numeric columns and the type they are cast to when present.
pub fn typed_columns() -> [(&'static str, DataType); 6] {
    [
        (UNIT_PRICE, DataType::Float64),
        (AMOUNT, DataType::Float64),
        (TOTAL_AMOUNT, DataType::Float64),
        (RATING, DataType::Float64),
        (QUANTITY, DataType::Int64),
        (REVIEW_COUNT, DataType::Int64),
    ]
}
