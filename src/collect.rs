//! The ticker collector: one table row per input entry, in input order.

use std::sync::Arc;

use futures::{StreamExt, stream};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::core::Error;
use crate::registry::{MetricGroup, MetricKeys, WEEK_52_CHANGE};
use crate::source::{Bar, QuoteSource, SourceError, TickerGroups};
use crate::table::{Cell, MetricTable};

/// Minimum number of daily bars a one-year history must hold before the
/// derived 52-week change is trusted. Shorter histories usually mean a recent
/// listing or an illiquid symbol, and the change figure would be misleading.
pub const MIN_HISTORY_BARS: usize = 240;

const PROGRESS_EVERY: usize = 100;

/// Collects per-ticker metric rows from a [`QuoteSource`].
///
/// Per-ticker failures are fully isolated: a missing-marker entry and a
/// symbol the source rejects both produce an identical all-missing row, and
/// neither disturbs any other row.
///
/// # Example
///
/// ```no_run
/// # use quotesheet::{Collector, QuoteClient, YahooSource};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let source = YahooSource::new(QuoteClient::default());
/// let table = Collector::new(source)
///     .concurrency(8)
///     .collect(vec![Some("AAPL"), Some("MSFT"), None])
///     .await?;
/// assert_eq!(table.len(), 3);
/// # Ok(())
/// # }
/// ```
pub struct Collector<S> {
    source: S,
    keys: MetricKeys,
    concurrency: usize,
}

impl<S: QuoteSource> Collector<S> {
    /// Create a collector over `source` with the canonical metric key set.
    pub fn new(source: S) -> Self {
        Self {
            source,
            keys: MetricKeys::default(),
            concurrency: 1,
        }
    }

    /// Replace the metric key configuration.
    #[must_use]
    pub fn metric_keys(mut self, keys: MetricKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Fetch up to `n` tickers at a time. Defaults to 1 (strictly
    /// sequential); any setting preserves input order and per-ticker failure
    /// isolation.
    #[must_use]
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = n.max(1);
        self
    }

    /// Collect one row per entry. `None` entries are the missing-value
    /// marker and yield an all-missing row without touching the source.
    ///
    /// The returned table always has exactly as many rows as `tickers` has
    /// entries, in the same order.
    ///
    /// # Errors
    ///
    /// Per-ticker fetch problems never surface here; the only errors are
    /// transport/decode failures outside the recoverable taxonomy and a
    /// malformed column specification.
    pub async fn collect<I, T>(&self, tickers: I) -> Result<MetricTable, Error>
    where
        I: IntoIterator<Item = Option<T>>,
        T: Into<String>,
    {
        let keys = Arc::new(self.keys.clone());
        let mut table = MetricTable::with_keys(keys.clone());

        let entries: Vec<Option<String>> =
            tickers.into_iter().map(|t| t.map(Into::into)).collect();

        let mut rows = stream::iter(entries.into_iter().map(|entry| {
            let keys = Arc::clone(&keys);
            async move {
                match entry {
                    None => Ok((vec![Cell::Missing; keys.len()], false)),
                    Some(symbol) => self.row_for(&keys, &symbol).await,
                }
            }
        }))
        .buffered(self.concurrency);

        let mut fetched = 0usize;
        while let Some(item) = rows.next().await {
            let (row, was_fetched) = item?;
            table.push_row(row)?;
            if was_fetched {
                fetched += 1;
                if fetched % PROGRESS_EVERY == 0 {
                    info!("{fetched} tickers downloaded");
                }
            }
        }

        Ok(table)
    }

    /// Build the row for one real symbol. The `bool` reports whether the
    /// source actually returned data (drives the progress counter).
    async fn row_for(&self, keys: &MetricKeys, symbol: &str) -> Result<(Vec<Cell>, bool), Error> {
        let groups = match self.source.groups(symbol).await {
            Ok(g) => g,
            Err(SourceError::UnknownSymbol(_)) => {
                debug!(symbol, "symbol not recognized by the data source");
                return Ok((vec![Cell::Missing; keys.len()], false));
            }
            Err(SourceError::Fatal(e)) => return Err(e),
        };

        let TickerGroups {
            summary_detail,
            financial_data,
            key_stats,
        } = &groups;

        // A group that is not a key-value mapping counts as empty, not as an
        // error; the other groups still populate their keys.
        let summary = summary_detail.as_object();
        let financial = financial_data.as_object();
        let stats = key_stats.as_object();

        let mut derived_week52 = None;
        if keys.contains(WEEK_52_CHANGE) && cell_for(stats, WEEK_52_CHANGE).as_f64().is_none() {
            derived_week52 = Some(self.week_change_from_history(symbol).await?);
        }

        let row = keys
            .iter_with_group()
            .map(|(group, key)| {
                if key == WEEK_52_CHANGE
                    && let Some(cell) = &derived_week52
                {
                    return cell.clone();
                }
                let map = match group {
                    MetricGroup::Summary => summary,
                    MetricGroup::Financial => financial,
                    MetricGroup::Statistics => stats,
                };
                cell_for(map, key)
            })
            .collect();

        Ok((row, true))
    }

    /// Derive the 52-week change from a one-year daily price history.
    ///
    /// A history the source cannot produce for this symbol leaves the field
    /// missing; only out-of-taxonomy failures propagate.
    async fn week_change_from_history(&self, symbol: &str) -> Result<Cell, Error> {
        let bars = match self.source.daily_closes_1y(symbol).await {
            Ok(bars) => bars,
            Err(SourceError::UnknownSymbol(_)) => {
                debug!(symbol, "no price history for derived 52-week change");
                return Ok(Cell::Missing);
            }
            Err(SourceError::Fatal(e)) => return Err(e),
        };
        Ok(week_change(&bars))
    }
}

fn cell_for(map: Option<&Map<String, Value>>, key: &str) -> Cell {
    map.and_then(|m| m.get(key))
        .map_or(Cell::Missing, Cell::from_json)
}

/// `(last_close - first_close) / first_close` over the supplied series, or
/// missing when fewer than [`MIN_HISTORY_BARS`] bars are available.
fn week_change(bars: &[Bar]) -> Cell {
    if bars.len() < MIN_HISTORY_BARS {
        return Cell::Missing;
    }
    let first = bars[0].close;
    let last = bars[bars.len() - 1].close;
    Cell::Num((last - first) / first)
}
