//! [`QuoteSource`] implementation over the Yahoo quoteSummary and chart APIs.

use chrono::DateTime;
use serde_json::Value;
use tracing::debug;

use crate::core::{Error, QuoteClient, net};
use crate::source::wire::{ChartEnvelope, QuoteSummaryEnvelope, flatten_raw};
use crate::source::{Bar, QuoteSource, SourceError, TickerGroups};

/// The quoteSummary modules backing the three metric groups.
const MODULES: &str = "summaryDetail,financialData,defaultKeyStatistics";

/// Quote data source backed by the public Yahoo Finance endpoints.
#[derive(Clone, Debug)]
pub struct YahooSource {
    client: QuoteClient,
}

impl YahooSource {
    /// Create a source over the given client.
    pub fn new(client: QuoteClient) -> Self {
        Self { client }
    }

    /// The underlying HTTP client.
    pub fn client(&self) -> &QuoteClient {
        &self.client
    }

    async fn quote_summary(&self, symbol: &str) -> Result<TickerGroups, SourceError> {
        for attempt in 0..=1u8 {
            let env = self.quote_summary_once(symbol).await?;

            let node = env
                .quote_summary
                .ok_or_else(|| Error::Data("missing quoteSummary node".into()))?;

            if let Some(err) = node.error {
                let desc = err.description.to_ascii_lowercase();
                if desc.contains("invalid crumb") && attempt == 0 {
                    debug!(symbol, "invalid crumb reported; refreshing credentials");
                    self.client.clear_crumb().await;
                    continue;
                }
                if desc.contains("quote not found") || desc.contains("invalid symbol") {
                    return Err(SourceError::UnknownSymbol(symbol.to_string()));
                }
                return Err(Error::Data(format!("yahoo error: {}", err.description)).into());
            }

            let result = node.result.and_then(|mut v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.swap_remove(0))
                }
            });

            // An empty result without an error node still means Yahoo has
            // nothing under this symbol.
            let Some(Value::Object(mut root)) = result else {
                return Err(SourceError::UnknownSymbol(symbol.to_string()));
            };

            let mut take = |key: &str| flatten_raw(root.remove(key).unwrap_or(Value::Null));
            return Ok(TickerGroups {
                summary_detail: take("summaryDetail"),
                financial_data: take("financialData"),
                key_stats: take("defaultKeyStatistics"),
            });
        }

        Err(Error::Data(format!("quoteSummary for {symbol} failed after crumb refresh")).into())
    }

    async fn quote_summary_once(&self, symbol: &str) -> Result<QuoteSummaryEnvelope, SourceError> {
        self.client.ensure_credentials().await?;
        let crumb = self
            .client
            .crumb()
            .await
            .ok_or_else(|| Error::Auth("crumb is not set".into()))?;

        let mut url = self
            .client
            .base_quote_summary()
            .join(symbol)
            .map_err(Error::from)?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("modules", MODULES);
            qp.append_pair("crumb", &crumb);
        }

        let resp = self.client.http().get(url).send().await.map_err(Error::from)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::UnknownSymbol(symbol.to_string()));
        }

        let body = net::read_body(resp).await?;
        let env = serde_json::from_str(&body)
            .map_err(|e| Error::Data(format!("quoteSummary json parse: {e}")))?;
        Ok(env)
    }

    async fn chart_1y(&self, symbol: &str) -> Result<Vec<Bar>, SourceError> {
        let mut url = self.client.base_chart().join(symbol).map_err(Error::from)?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("range", "1y");
            qp.append_pair("interval", "1d");
            qp.append_pair("includePrePost", "false");
        }

        let resp = self.client.http().get(url).send().await.map_err(Error::from)?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::UnknownSymbol(symbol.to_string()));
        }

        let body = net::read_body(resp).await?;
        let parsed: ChartEnvelope =
            serde_json::from_str(&body).map_err(|e| Error::Data(format!("chart json parse: {e}")))?;

        let chart = parsed
            .chart
            .ok_or_else(|| Error::Data("missing chart node".into()))?;

        if let Some(err) = chart.error {
            if err.code.eq_ignore_ascii_case("not found") {
                return Err(SourceError::UnknownSymbol(symbol.to_string()));
            }
            return Err(
                Error::Data(format!("yahoo error: {} - {}", err.code, err.description)).into(),
            );
        }

        let r0 = chart
            .result
            .and_then(|mut v| {
                if v.is_empty() {
                    None
                } else {
                    Some(v.swap_remove(0))
                }
            })
            .ok_or_else(|| Error::Data("empty chart result".into()))?;

        let ts = r0.timestamp.unwrap_or_default();
        let closes = r0
            .indicators
            .quote
            .into_iter()
            .next()
            .map(|q| q.close)
            .unwrap_or_default();

        // Null close slots (halted sessions) are dropped rather than kept as gaps.
        let bars = ts
            .into_iter()
            .zip(closes)
            .filter_map(|(t, close)| {
                let close = close?;
                let ts = DateTime::from_timestamp(t, 0)?;
                Some(Bar { ts, close })
            })
            .collect();
        Ok(bars)
    }
}

impl QuoteSource for YahooSource {
    async fn groups(&self, symbol: &str) -> Result<TickerGroups, SourceError> {
        self.quote_summary(symbol).await
    }

    async fn daily_closes_1y(&self, symbol: &str) -> Result<Vec<Bar>, SourceError> {
        self.chart_1y(symbol).await
    }
}
