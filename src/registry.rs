//! The metric key registry: which named fields make up a result table.
//!
//! Keys are split into three logical groups mirroring the quoteSummary
//! modules they are read from. Column order is always the concatenation
//! summary ++ financial ++ statistics and is fixed for the life of a table.

use std::collections::BTreeSet;

use crate::core::Error;

/// Key of the previous close price (summary group, not scaled).
pub const PREVIOUS_CLOSE: &str = "previousClose";
/// Key of the quote currency code (summary group, not scaled).
pub const CURRENCY: &str = "currency";
/// Key of the reporting currency code (financial group, not scaled).
pub const FINANCIAL_CURRENCY: &str = "financialCurrency";
/// Key of the last fiscal year end date (statistics group, not scaled).
pub const LAST_FISCAL_YEAR_END: &str = "lastFiscalYearEnd";
/// Key of the revenue growth ratio (financial group, not scaled).
pub const REVENUE_GROWTH: &str = "revenueGrowth";
/// Key of the profit margin ratio (statistics group, not scaled).
pub const PROFIT_MARGINS: &str = "profitMargins";
/// Key of the trailing 52-week price change ratio (statistics group, not scaled).
pub const WEEK_52_CHANGE: &str = "52WeekChange";

/// Ratio, date, and code columns that must never be rescaled to millions.
const DEFAULT_UNSCALED: [&str; 7] = [
    PREVIOUS_CLOSE,
    CURRENCY,
    FINANCIAL_CURRENCY,
    LAST_FISCAL_YEAR_END,
    REVENUE_GROWTH,
    PROFIT_MARGINS,
    WEEK_52_CHANGE,
];

/// The logical group a metric key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricGroup {
    /// Read from the `summaryDetail` module.
    Summary,
    /// Read from the `financialData` module.
    Financial,
    /// Read from the `defaultKeyStatistics` module.
    Statistics,
}

/// An ordered, versioned set of metric keys.
///
/// Historical revisions of this tooling disagreed on the exact set (presence
/// of `financialCurrency`, `52WeekChange`, ...); the [`Default`] impl is the
/// canonical revision and custom sets can be built with [`MetricKeys::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricKeys {
    summary: Vec<String>,
    financial: Vec<String>,
    statistics: Vec<String>,
    unscaled: BTreeSet<String>,
}

impl Default for MetricKeys {
    fn default() -> Self {
        Self::new(
            ["previousClose", "marketCap", "currency"],
            [
                "financialCurrency",
                "totalRevenue",
                "totalCash",
                "totalDebt",
                "ebitda",
                "freeCashflow",
                "operatingCashflow",
                "grossProfits",
                "revenueGrowth",
            ],
            [
                "enterpriseValue",
                "sharesOutstanding",
                "floatShares",
                "lastFiscalYearEnd",
                "profitMargins",
                "52WeekChange",
            ],
        )
        .expect("canonical key set is well formed")
    }
}

impl MetricKeys {
    /// Build a custom key set from per-group key lists.
    ///
    /// The scaling partition starts from the canonical non-scaled set and can
    /// be replaced with [`MetricKeys::with_unscaled`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnMismatch`] if the same key appears more than
    /// once across the three groups.
    pub fn new<S, F, K>(
        summary: impl IntoIterator<Item = S>,
        financial: impl IntoIterator<Item = F>,
        statistics: impl IntoIterator<Item = K>,
    ) -> Result<Self, Error>
    where
        S: Into<String>,
        F: Into<String>,
        K: Into<String>,
    {
        let keys = Self {
            summary: summary.into_iter().map(Into::into).collect(),
            financial: financial.into_iter().map(Into::into).collect(),
            statistics: statistics.into_iter().map(Into::into).collect(),
            unscaled: DEFAULT_UNSCALED.iter().map(ToString::to_string).collect(),
        };

        let mut seen = BTreeSet::new();
        for key in keys.iter() {
            if !seen.insert(key) {
                return Err(Error::ColumnMismatch(format!("duplicate metric key `{key}`")));
            }
        }
        Ok(keys)
    }

    /// Replace the set of columns exempt from the millions rescale.
    #[must_use]
    pub fn with_unscaled<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unscaled = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Flattened key list in column order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.summary
            .iter()
            .chain(&self.financial)
            .chain(&self.statistics)
            .map(String::as_str)
    }

    /// Like [`MetricKeys::iter`], with each key's owning group attached.
    pub fn iter_with_group(&self) -> impl Iterator<Item = (MetricGroup, &str)> {
        self.summary
            .iter()
            .map(|k| (MetricGroup::Summary, k.as_str()))
            .chain(
                self.financial
                    .iter()
                    .map(|k| (MetricGroup::Financial, k.as_str())),
            )
            .chain(
                self.statistics
                    .iter()
                    .map(|k| (MetricGroup::Statistics, k.as_str())),
            )
    }

    /// Total number of columns.
    pub fn len(&self) -> usize {
        self.summary.len() + self.financial.len() + self.statistics.len()
    }

    /// Whether the key set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The column index of `key`, if present.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.iter().position(|k| k == key)
    }

    /// Whether `key` is part of this set.
    pub fn contains(&self, key: &str) -> bool {
        self.index_of(key).is_some()
    }

    /// The group owning `key`, if present.
    pub fn group_of(&self, key: &str) -> Option<MetricGroup> {
        self.iter_with_group()
            .find_map(|(group, k)| (k == key).then_some(group))
    }

    /// Whether `key` participates in the millions rescale.
    ///
    /// Everything not in the non-scaled set is a raw monetary absolute amount
    /// or a share count and gets divided by one million.
    pub fn is_scaled(&self, key: &str) -> bool {
        !self.unscaled.contains(key)
    }

    /// Keys of the summary group, in order.
    pub fn summary(&self) -> &[String] {
        &self.summary
    }

    /// Keys of the financial group, in order.
    pub fn financial(&self) -> &[String] {
        &self.financial
    }

    /// Keys of the statistics group, in order.
    pub fn statistics(&self) -> &[String] {
        &self.statistics
    }
}
