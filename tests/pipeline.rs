use sales_pulse::data::{LoaderError, MonthKey, Period};
use sales_pulse::pipeline::{self, PipelineError, Snapshot};
use sales_pulse::stats::Extremal;
use std::io::Write;
use std::path::Path;

const SALES_CSV: &str = "\
Product,Category,Brand,Platform,City,Price,Quantity,TotalAmount,Rating,Reviews,OrderDate
Phone,Electronics,Acme,Amazon,Recife,100,2,200,4.0,10,2024-01-10
Laptop,Electronics,Zen,Shopee,Recife,1000,1,1000,5.0,3,2024-01-20
Phone,Electronics,Acme,Amazon,Natal,100,3,300,3.0,8,2024-02-05
Shirt,Apparel,Loom,Shopee,Natal,50,4,200,4.5,20,2024-02-15
Shirt,Apparel,Loom,Amazon,Recife,50,6,300,3.5,5,2024-03-01
";

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn month(m: u32) -> MonthKey {
    MonthKey::new(m).unwrap()
}

#[test]
fn csv_to_whole_year_dashboard() {
    let file = write_csv(SALES_CSV);
    let base = pipeline::load_dataset(file.path()).unwrap();

    assert_eq!(
        pipeline::available_months(&base).unwrap(),
        vec![month(1), month(2), month(3)]
    );

    let snapshot = Snapshot::compute(&base, Period::AllYear).unwrap();
    let sel = &snapshot.metrics.selection;
    assert_eq!(snapshot.view.height(), 5);
    assert_eq!(sel.total_revenue, 2000.0);
    assert_eq!(sel.total_quantity, 16);
    assert_eq!(sel.monthly_growth.values().collect::<Vec<_>>(), vec![0.0, 133.33, -14.29]);
    assert_eq!(
        sel.product_by_revenue.top,
        Extremal::Found {
            key: "Laptop".to_string(),
            value: 1000.0
        }
    );
}

#[test]
fn month_selection_keeps_year_overview() {
    let file = write_csv(SALES_CSV);
    let base = pipeline::load_dataset(file.path()).unwrap();

    let all = Snapshot::compute(&base, Period::AllYear).unwrap();
    let feb = Snapshot::compute(&base, Period::Month(month(2))).unwrap();

    assert_eq!(feb.view.height(), 2);
    assert_eq!(feb.metrics.selection.total_revenue, 500.0);
    assert_eq!(
        feb.metrics.year.month_by_revenue,
        all.metrics.year.month_by_revenue
    );
    assert_eq!(
        feb.metrics.selection.city_by_quantity.top.key().map(String::as_str),
        Some("Natal")
    );
}

#[test]
fn month_without_orders_is_empty_not_an_error() {
    let file = write_csv(SALES_CSV);
    let base = pipeline::load_dataset(file.path()).unwrap();

    let snapshot = Snapshot::compute(&base, Period::Month(month(11))).unwrap();
    assert!(snapshot.view.is_empty());
    assert_eq!(snapshot.metrics.selection.product_by_quantity.top, Extremal::NoData);
    assert!(snapshot.metrics.selection.daily_revenue.is_empty());
}

#[test]
fn unsupported_extension_fails_at_load() {
    let err = pipeline::load_dataset(Path::new("data.txt")).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Load(LoaderError::UnsupportedFormat { .. })
    ));
}

#[test]
fn unparseable_date_fails_at_normalize() {
    let file = write_csv(
        "Product,Category,Brand,City,Quantity,TotalAmount,Rating,OrderDate\n\
         Phone,Electronics,Acme,Recife,2,200,4.0,2024-01-10\n\
         Phone,Electronics,Acme,Recife,1,100,4.0,not a date\n",
    );
    let err = pipeline::load_dataset(file.path()).unwrap_err();
    assert!(matches!(err, PipelineError::Normalize(_)));
    assert!(err.to_string().contains("not a date"));
}

#[test]
fn summary_json_has_both_scopes() {
    let file = write_csv(SALES_CSV);
    let base = pipeline::load_dataset(file.path()).unwrap();
    let snapshot = Snapshot::compute(&base, Period::Month(month(3))).unwrap();

    let json = serde_json::to_value(&snapshot.metrics).unwrap();
    assert_eq!(json["period"]["Month"], 3);
    assert_eq!(json["year"]["month_by_quantity"]["top"]["key"], 2);
    assert_eq!(json["selection"]["order_count"], 1);
}
