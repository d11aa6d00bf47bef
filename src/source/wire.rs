//! Serde shapes for the quoteSummary v10 and chart v8 envelopes.

use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
pub(crate) struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    pub(crate) quote_summary: Option<QuoteSummaryNode>,
}

#[derive(Deserialize)]
pub(crate) struct QuoteSummaryNode {
    pub(crate) result: Option<Vec<Value>>,
    pub(crate) error: Option<QuoteSummaryError>,
}

#[derive(Deserialize)]
pub(crate) struct QuoteSummaryError {
    pub(crate) description: String,
}

#[derive(Deserialize)]
pub(crate) struct ChartEnvelope {
    pub(crate) chart: Option<ChartNode>,
}

#[derive(Deserialize)]
pub(crate) struct ChartNode {
    pub(crate) result: Option<Vec<ChartResult>>,
    pub(crate) error: Option<ChartError>,
}

#[derive(Deserialize)]
pub(crate) struct ChartError {
    pub(crate) code: String,
    pub(crate) description: String,
}

#[derive(Deserialize)]
pub(crate) struct ChartResult {
    #[serde(default)]
    pub(crate) timestamp: Option<Vec<i64>>,
    #[serde(default)]
    pub(crate) indicators: Indicators,
}

#[derive(Deserialize, Default)]
pub(crate) struct Indicators {
    #[serde(default)]
    pub(crate) quote: Vec<QuoteBlock>,
}

#[derive(Deserialize, Default)]
pub(crate) struct QuoteBlock {
    #[serde(default)]
    pub(crate) close: Vec<Option<f64>>,
}

/// Collapse Yahoo's `{ "raw": ..., "fmt": ... }` wrappers to the raw scalar,
/// recursively, so module payloads carry plain numbers.
pub(crate) fn flatten_raw(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            if let Some(raw) = map.get("raw") {
                raw.clone()
            } else {
                Value::Object(map.into_iter().map(|(k, v)| (k, flatten_raw(v))).collect())
            }
        }
        other => other,
    }
}
