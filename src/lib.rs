//! quotesheet: per-ticker financial metrics, collected and normalized.
//!
//! For every input ticker symbol this crate fetches a fixed set of named
//! metrics (price, market cap, cash flow, shares outstanding, ...) from a
//! quote data source, assembles them into one row of a tabular result, and
//! applies a unit-normalization pass: raw monetary amounts are rescaled to
//! millions and minor-unit currency quotes (pence, cents, agorot) are
//! corrected back to the major unit.
//!
//! The bundled [`YahooSource`] talks to the Yahoo quoteSummary and chart
//! endpoints; any other backend can plug in by implementing [`QuoteSource`].
//!
//! # Example
//!
//! ```no_run
//! # use quotesheet::{Collector, QuoteClient, YahooSource, normalize};
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = YahooSource::new(QuoteClient::default());
//! let tickers = vec![Some("AAPL".to_string()), None, Some("VOD.L".to_string())];
//!
//! let table = Collector::new(source).collect(tickers).await?;
//! let scaled = normalize::normalized(&table);
//!
//! println!("{:?}", scaled.get(0, "marketCap"));
//! # Ok(())
//! # }
//! ```

pub mod collect;
pub mod core;
pub mod normalize;
pub mod registry;
pub mod source;
pub mod table;

pub use crate::core::{Error, QuoteClient, QuoteClientBuilder};
pub use collect::Collector;
pub use registry::{MetricGroup, MetricKeys};
pub use source::{Bar, QuoteSource, SourceError, TickerGroups, YahooSource};
pub use table::{Cell, MetricTable};
