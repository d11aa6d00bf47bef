//! The quote data source seam.
//!
//! The collector is written against the [`QuoteSource`] trait; the bundled
//! [`YahooSource`] implements it over the Yahoo quoteSummary and chart
//! endpoints. Group payloads are handed over as raw JSON on purpose: the
//! upstream API occasionally returns garbage in place of a module, and the
//! collector downgrades anything that is not an object to an empty group
//! rather than failing the row.

mod wire;
mod yahoo;

use std::future::Future;

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::core::Error;

pub use yahoo::YahooSource;

/// One daily price bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Bar timestamp (UTC).
    pub ts: DateTime<Utc>,
    /// Closing price.
    pub close: f64,
}

/// The three per-ticker module payloads the collector consumes.
///
/// Each field is the raw JSON returned for that module and may be any shape;
/// a missing module is `Value::Null`.
#[derive(Debug, Clone, Default)]
pub struct TickerGroups {
    /// The `summaryDetail` payload.
    pub summary_detail: Value,
    /// The `financialData` payload.
    pub financial_data: Value,
    /// The `defaultKeyStatistics` payload.
    pub key_stats: Value,
}

/// Failure categories a data source can report for a single symbol.
///
/// The collector matches on these explicitly: [`SourceError::UnknownSymbol`]
/// is recovered per ticker (the row degenerates to all-missing), while
/// [`SourceError::Fatal`] aborts the whole collection.
#[derive(Debug, ThisError)]
pub enum SourceError {
    /// The symbol is malformed or unknown to the data source.
    #[error("unknown or malformed symbol: {0}")]
    UnknownSymbol(String),

    /// A transport or decode failure outside the recoverable taxonomy.
    #[error(transparent)]
    Fatal(#[from] Error),
}

/// A per-ticker quote data source.
pub trait QuoteSource: Send + Sync {
    /// Fetch the summary-detail, financial-data, and key-statistics payloads
    /// for `symbol`.
    fn groups(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<TickerGroups, SourceError>> + Send;

    /// Fetch one year of daily closing bars for `symbol`, oldest first.
    fn daily_closes_1y(
        &self,
        symbol: &str,
    ) -> impl Future<Output = Result<Vec<Bar>, SourceError>> + Send;
}
