use quotesheet::source::QuoteSource;
use quotesheet::YahooSource;
use serde_json::json;

use crate::common::{
    mock_cookie_crumb, mock_quote_summary, quote_summary_body, quote_summary_error_body,
};

#[tokio::test]
async fn invalid_crumb_triggers_one_credential_refresh() {
    let server = httpmock::MockServer::start();

    // First call goes out with the stale preauth crumb and gets rejected.
    let stale = mock_quote_summary(
        &server,
        "AAPL",
        "stale",
        quote_summary_error_body("Invalid Crumb"),
    );
    // The refresh bootstraps a cookie and a fresh crumb, then retries.
    let (cookie, crumb) = mock_cookie_crumb(&server, "fresh");
    let fresh = mock_quote_summary(
        &server,
        "AAPL",
        "fresh",
        quote_summary_body(json!({
            "summaryDetail": { "previousClose": { "raw": 150.0 } },
            "financialData": {},
            "defaultKeyStatistics": {}
        })),
    );

    let client = quotesheet::QuoteClient::builder()
        .base_quote_summary(
            url::Url::parse(&format!("{}/v10/finance/quoteSummary/", server.base_url())).unwrap(),
        )
        .cookie_url(url::Url::parse(&format!("{}/consent", server.base_url())).unwrap())
        .crumb_url(url::Url::parse(&format!("{}/v1/test/getcrumb", server.base_url())).unwrap())
        .preauth("A=B", "stale")
        .build()
        .unwrap();

    let source = YahooSource::new(client);
    let groups = source.groups("AAPL").await.unwrap();

    stale.assert();
    cookie.assert();
    crumb.assert();
    fresh.assert();
    assert_eq!(groups.summary_detail["previousClose"], json!(150.0));
}

#[tokio::test]
async fn preauth_crumb_is_sent_as_query_param() {
    let server = httpmock::MockServer::start();
    let mock = mock_quote_summary(
        &server,
        "MSFT",
        "crumb",
        quote_summary_body(json!({
            "summaryDetail": {},
            "financialData": {},
            "defaultKeyStatistics": {}
        })),
    );

    let source = YahooSource::new(crate::common::client_for(&server));
    source.groups("MSFT").await.unwrap();
    // A second call reuses the credentials without any bootstrap traffic.
    source.groups("MSFT").await.unwrap();

    assert_eq!(mock.hits(), 2);
}
