use quotesheet::{Cell, Collector, MetricKeys};
use serde_json::json;

use crate::common::{StubSource, full_groups, groups};

#[tokio::test]
async fn one_row_per_entry_in_input_order() {
    let source = StubSource::default().with_groups("AAA", full_groups());
    let collector = Collector::new(source);

    let table = collector
        .collect(vec![Some("AAA".to_string()), None, Some("BAD".to_string())])
        .await
        .unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(table.get(0, "previousClose"), Some(&Cell::Num(150.0)));
    assert_eq!(table.get(0, "marketCap"), Some(&Cell::Num(2_400_000_000.0)));
    assert_eq!(table.get(0, "currency"), Some(&Cell::Text("USD".into())));
    assert_eq!(table.get(0, "totalRevenue"), Some(&Cell::Num(500_000_000.0)));
    assert_eq!(table.get(0, "52WeekChange"), Some(&Cell::Num(0.12)));

    assert!(table.row(1).unwrap().iter().all(Cell::is_missing));
    assert!(table.row(2).unwrap().iter().all(Cell::is_missing));
}

#[tokio::test]
async fn marker_and_unknown_symbol_rows_are_identical() {
    let source = StubSource::default();
    let table = Collector::new(source)
        .collect(vec![None, Some("NOPE".to_string())])
        .await
        .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.row(0), table.row(1));
    assert!(table.row(0).unwrap().iter().all(Cell::is_missing));
}

#[tokio::test]
async fn garbage_group_only_blanks_its_own_keys() {
    // summaryDetail came back as an error string, defaultKeyStatistics as
    // null; only financialData is a proper mapping.
    let source = StubSource::default().with_groups(
        "AAA",
        groups(
            json!("No summary detail found"),
            json!({ "financialCurrency": "USD", "totalRevenue": 500_000_000.0 }),
            json!(null),
        ),
    );

    let table = Collector::new(source)
        .collect(vec![Some("AAA".to_string())])
        .await
        .unwrap();

    assert_eq!(table.get(0, "previousClose"), Some(&Cell::Missing));
    assert_eq!(table.get(0, "marketCap"), Some(&Cell::Missing));
    assert_eq!(table.get(0, "currency"), Some(&Cell::Missing));

    assert_eq!(
        table.get(0, "financialCurrency"),
        Some(&Cell::Text("USD".into()))
    );
    assert_eq!(table.get(0, "totalRevenue"), Some(&Cell::Num(500_000_000.0)));

    assert_eq!(table.get(0, "enterpriseValue"), Some(&Cell::Missing));
    assert_eq!(table.get(0, "52WeekChange"), Some(&Cell::Missing));
}

#[tokio::test]
async fn custom_key_set_controls_columns() {
    let keys = MetricKeys::new(
        ["previousClose", "currency"],
        ["totalRevenue"],
        Vec::<&str>::new(),
    )
    .unwrap();
    let source = StubSource::default().with_groups("AAA", full_groups());

    let table = Collector::new(source)
        .metric_keys(keys)
        .collect(vec![Some("AAA".to_string())])
        .await
        .unwrap();

    assert_eq!(table.keys().len(), 3);
    assert_eq!(table.row(0).unwrap().len(), 3);
    assert_eq!(table.get(0, "previousClose"), Some(&Cell::Num(150.0)));
    assert_eq!(table.get(0, "marketCap"), None);
}

#[tokio::test]
async fn empty_input_yields_empty_table() {
    let table = Collector::new(StubSource::default())
        .collect(Vec::<Option<String>>::new())
        .await
        .unwrap();
    assert!(table.is_empty());
}
