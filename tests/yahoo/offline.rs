use quotesheet::source::{QuoteSource, SourceError};
use quotesheet::{Cell, Collector, YahooSource};
use serde_json::json;

use crate::common::{
    chart_body, client_for, mock_chart, mock_quote_summary, quote_summary_body,
    quote_summary_error_body,
};

#[tokio::test]
async fn groups_flatten_raw_wrappers() {
    let server = httpmock::MockServer::start();
    let body = quote_summary_body(json!({
        "summaryDetail": {
            "previousClose": { "raw": 150.0, "fmt": "150.00" },
            "marketCap": { "raw": 2_400_000_000.0, "fmt": "2.4B", "longFmt": "2,400,000,000" },
            "currency": "USD"
        },
        "financialData": {
            "totalRevenue": { "raw": 500_000_000.0 },
            "financialCurrency": "USD"
        },
        "defaultKeyStatistics": {
            "52WeekChange": { "raw": 0.12, "fmt": "12.00%" }
        }
    }));
    let mock = mock_quote_summary(&server, "AAPL", "crumb", body);

    let source = YahooSource::new(client_for(&server));
    let groups = source.groups("AAPL").await.unwrap();

    mock.assert();
    assert_eq!(groups.summary_detail["previousClose"], json!(150.0));
    assert_eq!(groups.summary_detail["currency"], json!("USD"));
    assert_eq!(groups.financial_data["totalRevenue"], json!(500_000_000.0));
    assert_eq!(groups.key_stats["52WeekChange"], json!(0.12));
}

#[tokio::test]
async fn quote_not_found_maps_to_unknown_symbol() {
    let server = httpmock::MockServer::start();
    let body = quote_summary_error_body("Quote not found for ticker symbol: BAD");
    let _mock = mock_quote_summary(&server, "BAD", "crumb", body);

    let source = YahooSource::new(client_for(&server));
    let err = source.groups("BAD").await.unwrap_err();
    assert!(matches!(err, SourceError::UnknownSymbol(_)));

    // Through the collector, the row degenerates to all-missing.
    let table = Collector::new(YahooSource::new(client_for(&server)))
        .collect(vec![Some("BAD".to_string())])
        .await
        .unwrap();
    assert_eq!(table.len(), 1);
    assert!(table.row(0).unwrap().iter().all(Cell::is_missing));
}

#[tokio::test]
async fn http_404_maps_to_unknown_symbol() {
    let server = httpmock::MockServer::start();
    server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/v10/finance/quoteSummary/GONE");
        then.status(404);
    });

    let source = YahooSource::new(client_for(&server));
    let err = source.groups("GONE").await.unwrap_err();
    assert!(matches!(err, SourceError::UnknownSymbol(_)));
}

#[tokio::test]
async fn server_errors_are_fatal() {
    let server = httpmock::MockServer::start();
    server.mock(|when, then| {
        when.method(httpmock::Method::GET)
            .path("/v10/finance/quoteSummary/AAPL");
        then.status(500);
    });

    let source = YahooSource::new(client_for(&server));
    let err = source.groups("AAPL").await.unwrap_err();
    assert!(matches!(err, SourceError::Fatal(_)));
}

#[tokio::test]
async fn chart_closes_skip_null_slots() {
    let server = httpmock::MockServer::start();
    let body = serde_json::json!({
        "chart": {
            "result": [{
                "timestamp": [1_700_000_000i64, 1_700_086_400i64, 1_700_172_800i64],
                "indicators": { "quote": [{ "close": [100.0, null, 102.0] }] }
            }],
            "error": null
        }
    })
    .to_string();
    let mock = mock_chart(&server, "AAPL", body);

    let source = YahooSource::new(client_for(&server));
    let bars = source.daily_closes_1y("AAPL").await.unwrap();

    mock.assert();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].close, 100.0);
    assert_eq!(bars[1].close, 102.0);
}

#[tokio::test]
async fn missing_week_change_falls_back_to_chart() {
    let server = httpmock::MockServer::start();
    let qs = mock_quote_summary(
        &server,
        "GBX",
        "crumb",
        quote_summary_body(json!({
            "summaryDetail": { "previousClose": { "raw": 12_345.0 }, "currency": "GBp" },
            "financialData": {},
            "defaultKeyStatistics": { "enterpriseValue": { "raw": 1_000_000.0 } }
        })),
    );
    let mut closes = vec![100.0; 250];
    *closes.last_mut().unwrap() = 150.0;
    let chart = mock_chart(&server, "GBX", chart_body(&closes));

    let table = Collector::new(YahooSource::new(client_for(&server)))
        .collect(vec![Some("GBX".to_string())])
        .await
        .unwrap();

    qs.assert();
    chart.assert();
    assert_eq!(table.get(0, "52WeekChange"), Some(&Cell::Num(0.5)));
    assert_eq!(table.get(0, "previousClose"), Some(&Cell::Num(12_345.0)));
}
