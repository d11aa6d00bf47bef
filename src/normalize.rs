//! Unit normalization of a collected table.
//!
//! Monetary absolute amounts and share counts are rescaled to millions;
//! ratio, date, and code columns pass through untouched. Quotes in a
//! minor-unit currency (pence, cents, agorot) additionally get their
//! previous close corrected back to the major unit.

use crate::core::Error;
use crate::registry::{CURRENCY, MetricKeys, PREVIOUS_CLOSE};
use crate::table::{Cell, MetricTable};

/// Divisor applied to every scaled column.
pub const MILLION: f64 = 1_000_000.0;

/// Currency codes quoted in a minor unit (pence, rand cents, agorot).
pub const MINOR_UNIT_CURRENCIES: [&str; 3] = ["GBp", "ZAc", "ILA"];

/// Write the normalized form of `src` into `dst`.
///
/// `dst` must share `src`'s column specification (see [`MetricTable::like`]);
/// any rows it already holds are replaced. Row count and column order match
/// `src` exactly.
///
/// # Errors
///
/// Returns [`Error::ColumnMismatch`] when the two tables disagree on columns.
pub fn normalize_into(src: &MetricTable, dst: &mut MetricTable) -> Result<(), Error> {
    if dst.keys() != src.keys() {
        return Err(Error::ColumnMismatch(
            "destination table has a different column specification".into(),
        ));
    }
    *dst.rows_mut() = normalize_rows(src.keys(), src.rows());
    Ok(())
}

/// The normalized form of `src` as a fresh table; `src` is left untouched.
#[must_use]
pub fn normalized(src: &MetricTable) -> MetricTable {
    let mut dst = MetricTable::with_keys(src.shared_keys());
    *dst.rows_mut() = normalize_rows(src.keys(), src.rows());
    dst
}

fn normalize_rows(keys: &MetricKeys, rows: &[Vec<Cell>]) -> Vec<Vec<Cell>> {
    let scaled: Vec<bool> = keys.iter().map(|k| keys.is_scaled(k)).collect();

    let mut out: Vec<Vec<Cell>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .zip(&scaled)
                .map(|(cell, &scale)| match cell {
                    Cell::Num(v) if scale => Cell::Num(v / MILLION),
                    other => other.clone(),
                })
                .collect()
        })
        .collect();

    // Minor-unit correction, after the scaling pass. Deliberately limited to
    // previousClose: that is the one field the upstream contract corrects.
    if let (Some(cur_idx), Some(pc_idx)) = (keys.index_of(CURRENCY), keys.index_of(PREVIOUS_CLOSE))
    {
        for row in &mut out {
            let minor = row[cur_idx]
                .as_str()
                .is_some_and(|code| MINOR_UNIT_CURRENCIES.contains(&code));
            if minor && let Cell::Num(v) = row[pc_idx] {
                row[pc_idx] = Cell::Num(v / 100.0);
            }
        }
    }

    out
}
