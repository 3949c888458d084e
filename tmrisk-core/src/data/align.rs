//! Multi-ticker time alignment.
//!
//! Per-ticker close series are aligned to a common timeline: the union of all
//! dates, minus every date where some ticker has no finite close. The result
//! has no gaps, so downstream returns never see NaN.

use super::frame::TickerFrame;
use super::provider::{ClosePoint, DataError};
use super::series::PriceSeries;
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Outcome of alignment: the price table plus how many dates were discarded.
#[derive(Debug)]
pub struct Aligned {
    pub prices: PriceSeries,
    pub dropped_dates: usize,
}

/// Align tickers (in the given order) onto the dates they all share.
pub fn align_closes(series: Vec<(String, Vec<ClosePoint>)>) -> Result<Aligned, DataError> {
    let mut all_dates = BTreeSet::new();
    for (_, closes) in &series {
        all_dates.extend(closes.iter().map(|p| p.date));
    }

    let lookups: Vec<HashMap<NaiveDate, f64>> = series
        .iter()
        .map(|(_, closes)| closes.iter().map(|p| (p.date, p.adj_close)).collect())
        .collect();

    let mut dates = Vec::with_capacity(all_dates.len());
    let mut rows = Vec::with_capacity(all_dates.len());
    let mut dropped_dates = 0;

    for date in all_dates {
        let row: Option<Vec<f64>> = lookups
            .iter()
            .map(|m| m.get(&date).copied().filter(|v| v.is_finite()))
            .collect();
        match row {
            Some(row) => {
                dates.push(date);
                rows.push(row);
            }
            None => dropped_dates += 1,
        }
    }

    let tickers = series.into_iter().map(|(s, _)| s).collect();
    let frame = TickerFrame::new(tickers, dates, rows)?;
    Ok(Aligned {
        prices: PriceSeries::new(frame),
        dropped_dates,
    })
}
