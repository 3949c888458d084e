//! Price provider trait and structured error types.
//!
//! The PriceProvider trait abstracts over market-data sources (Yahoo Finance,
//! in-memory fixtures) so the download path can be swapped and mocked in tests.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One adjusted close observation from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub adj_close: f64,
}

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider returned no data for '{symbol}' between {start} and {end}")]
    EmptyResponse {
        symbol: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("no tickers requested")]
    NoTickers,

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("need at least {needed} aligned price rows, got {got}")]
    InsufficientRows { needed: usize, got: usize },

    #[error("table shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful fetch for a single ticker.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub symbol: String,
    pub closes: Vec<ClosePoint>,
    pub source: DataSource,
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    InMemory,
}

/// Trait for market-data providers.
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily adjusted closes for a symbol over an inclusive date range.
    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

/// Progress callback for multi-symbol downloads.
pub trait DownloadProgress {
    /// Called when starting to fetch a symbol.
    fn on_start(&self, symbol: &str, index: usize, total: usize);

    /// Called when a symbol fetch completes.
    fn on_complete(&self, symbol: &str, result: Result<usize, &DataError>);
}

/// Prints download progress to stdout.
pub struct StdoutProgress;

impl DownloadProgress for StdoutProgress {
    fn on_start(&self, symbol: &str, index: usize, total: usize) {
        println!("[{}/{}] Fetching {symbol}...", index + 1, total);
    }

    fn on_complete(&self, symbol: &str, result: Result<usize, &DataError>) {
        match result {
            Ok(n) => println!("  OK: {symbol} ({n} closes)"),
            Err(e) => println!("  FAIL: {symbol}: {e}"),
        }
    }
}

/// Swallows progress events.
pub struct SilentProgress;

impl DownloadProgress for SilentProgress {
    fn on_start(&self, _symbol: &str, _index: usize, _total: usize) {}
    fn on_complete(&self, _symbol: &str, _result: Result<usize, &DataError>) {}
}

/// Provider backed by pre-loaded closes. Unknown symbols fail like a real provider.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    series: Vec<(String, Vec<ClosePoint>)>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, symbol: &str, closes: Vec<ClosePoint>) -> Self {
        self.series.push((symbol.to_string(), closes));
        self
    }
}

impl PriceProvider for InMemoryProvider {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let (_, closes) = self
            .series
            .iter()
            .find(|(s, _)| s == symbol)
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            })?;

        let closes: Vec<ClosePoint> = closes
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect();

        Ok(FetchResult {
            symbol: symbol.to_string(),
            closes,
            source: DataSource::InMemory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn in_memory_provider_filters_range_inclusively() {
        let provider = InMemoryProvider::new().with_series(
            "SPY",
            vec![
                ClosePoint { date: date("2024-01-02"), adj_close: 1.0 },
                ClosePoint { date: date("2024-01-03"), adj_close: 2.0 },
                ClosePoint { date: date("2024-01-04"), adj_close: 3.0 },
            ],
        );

        let result = provider
            .fetch("SPY", date("2024-01-03"), date("2024-01-04"))
            .unwrap();
        assert_eq!(result.closes.len(), 2);
        assert_eq!(result.source, DataSource::InMemory);
    }

    #[test]
    fn in_memory_provider_unknown_symbol_is_hard_error() {
        let provider = InMemoryProvider::new();
        let err = provider
            .fetch("NOPE", date("2024-01-01"), date("2024-02-01"))
            .unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
    }
}
