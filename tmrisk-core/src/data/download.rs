//! Download orchestrator: fetch every ticker, then normalise into one table.

use super::align::align_closes;
use super::provider::{DataError, DownloadProgress, PriceProvider};
use super::series::PriceSeries;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// Fetch adjusted closes for `tickers` over `[start, end]` and align them.
///
/// One ticker or many, the result is the same `PriceSeries` shape. The first
/// failing ticker aborts the whole download.
pub fn download_prices(
    provider: &dyn PriceProvider,
    tickers: &[String],
    start: NaiveDate,
    end: NaiveDate,
    progress: &dyn DownloadProgress,
) -> Result<PriceSeries, DataError> {
    if start > end {
        return Err(DataError::InvalidDateRange { start, end });
    }

    let tickers = dedup_tickers(tickers);
    if tickers.is_empty() {
        return Err(DataError::NoTickers);
    }

    let total = tickers.len();
    let mut fetched = Vec::with_capacity(total);

    for (i, symbol) in tickers.iter().enumerate() {
        progress.on_start(symbol, i, total);

        let result = provider.fetch(symbol, start, end).and_then(|r| {
            if r.closes.is_empty() {
                Err(DataError::EmptyResponse {
                    symbol: symbol.clone(),
                    start,
                    end,
                })
            } else {
                Ok(r)
            }
        });

        match result {
            Ok(r) => {
                debug!(%symbol, source = ?r.source, rows = r.closes.len(), "ticker fetched");
                progress.on_complete(symbol, Ok(r.closes.len()));
                fetched.push((r.symbol, r.closes));
            }
            Err(e) => {
                progress.on_complete(symbol, Err(&e));
                warn!(%symbol, provider = provider.name(), error = %e, "download failed");
                return Err(e);
            }
        }
    }

    let aligned = align_closes(fetched)?;
    if aligned.dropped_dates > 0 {
        warn!(
            dropped = aligned.dropped_dates,
            "dropped dates where at least one ticker had no close"
        );
    }
    if aligned.prices.n_rows() < 2 {
        return Err(DataError::InsufficientRows {
            needed: 2,
            got: aligned.prices.n_rows(),
        });
    }

    info!(
        tickers = total,
        rows = aligned.prices.n_rows(),
        provider = provider.name(),
        "prices downloaded"
    );
    Ok(aligned.prices)
}

/// Trim and drop blank or repeated tickers, keeping first occurrence.
fn dedup_tickers(tickers: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tickers.len());
    for t in tickers {
        let t = t.trim();
        if t.is_empty() {
            continue;
        }
        if out.iter().any(|o| o == t) {
            warn!(ticker = %t, "duplicate ticker ignored");
            continue;
        }
        out.push(t.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::provider::{ClosePoint, InMemoryProvider, SilentProgress};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn closes(values: &[(&str, f64)]) -> Vec<ClosePoint> {
        values
            .iter()
            .map(|(d, v)| ClosePoint { date: date(d), adj_close: *v })
            .collect()
    }

    fn provider() -> InMemoryProvider {
        InMemoryProvider::new()
            .with_series(
                "AAPL",
                closes(&[("2022-01-03", 180.0), ("2022-01-04", 178.0), ("2022-01-05", 174.0)]),
            )
            .with_series(
                "MSFT",
                closes(&[("2022-01-03", 330.0), ("2022-01-04", 324.0), ("2022-01-05", 312.0)]),
            )
    }

    #[test]
    fn single_and_multi_ticker_share_shape() {
        let p = provider();
        let one = download_prices(
            &p,
            &["AAPL".into()],
            date("2022-01-01"),
            date("2022-01-31"),
            &SilentProgress,
        )
        .unwrap();
        let two = download_prices(
            &p,
            &["AAPL".into(), "MSFT".into()],
            date("2022-01-01"),
            date("2022-01-31"),
            &SilentProgress,
        )
        .unwrap();

        assert_eq!(one.tickers(), &["AAPL".to_string()]);
        assert_eq!(two.tickers(), &["AAPL".to_string(), "MSFT".to_string()]);
        assert_eq!(one.n_rows(), 3);
        assert_eq!(two.n_rows(), 3);
    }

    #[test]
    fn unknown_ticker_fails_whole_download() {
        let err = download_prices(
            &provider(),
            &["AAPL".into(), "ZZZZ".into()],
            date("2022-01-01"),
            date("2022-01-31"),
            &SilentProgress,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { ref symbol } if symbol == "ZZZZ"));
    }

    #[test]
    fn empty_range_is_hard_error() {
        let err = download_prices(
            &provider(),
            &["AAPL".into()],
            date("2023-01-01"),
            date("2023-01-31"),
            &SilentProgress,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::EmptyResponse { .. }));
    }

    #[test]
    fn duplicates_and_blanks_removed() {
        let tickers = vec!["AAPL".to_string(), " ".to_string(), "AAPL".to_string()];
        assert_eq!(dedup_tickers(&tickers), vec!["AAPL".to_string()]);
    }

    #[test]
    fn rejects_inverted_range_and_no_tickers() {
        let p = provider();
        assert!(matches!(
            download_prices(&p, &["AAPL".into()], date("2022-02-01"), date("2022-01-01"), &SilentProgress),
            Err(DataError::InvalidDateRange { .. })
        ));
        assert!(matches!(
            download_prices(&p, &[], date("2022-01-01"), date("2022-02-01"), &SilentProgress),
            Err(DataError::NoTickers)
        ));
    }
}
