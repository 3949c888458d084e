//! Yahoo Finance price provider.
//!
//! Fetches daily adjusted closes from Yahoo's v8 chart API. One request per
//! ticker; any transport or format problem is a hard error.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{ClosePoint, DataError, DataSource, FetchResult, PriceProvider};
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Yahoo Finance v8 chart API response.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

/// Yahoo Finance chart-API provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
}

impl YahooProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Build the chart API URL for a symbol and an inclusive date range.
    fn chart_url(symbol: &str, start: NaiveDate, end: NaiveDate) -> String {
        let start_ts = start.and_time(chrono::NaiveTime::MIN).and_utc().timestamp();
        let end_ts = end
            .succ_opt()
            .unwrap_or(end)
            .and_time(chrono::NaiveTime::MIN)
            .and_utc()
            .timestamp()
            - 1;
        format!(
            "https://query2.finance.yahoo.com/v8/finance/chart/{symbol}\
             ?period1={start_ts}&period2={end_ts}&interval=1d\
             &includeAdjustedClose=true"
        )
    }

    /// Parse the chart API response into adjusted closes.
    ///
    /// Falls back to the raw close column when Yahoo omits `adjclose`.
    fn parse_response(
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
        resp: ChartResponse,
    ) -> Result<Vec<ClosePoint>, DataError> {
        let result = resp.chart.result.ok_or_else(|| {
            if let Some(err) = resp.chart.error {
                if err.code == "Not Found" {
                    DataError::SymbolNotFound {
                        symbol: symbol.to_string(),
                    }
                } else {
                    DataError::ResponseFormatChanged(format!("{}: {}", err.code, err.description))
                }
            } else {
                DataError::ResponseFormatChanged("empty result with no error".into())
            }
        })?;

        let data = result
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("result array is empty".into()))?;

        // Yahoo omits timestamps entirely when the range holds no trading days.
        let timestamps = data.timestamp.unwrap_or_default();

        let adj_closes = data
            .indicators
            .adjclose
            .and_then(|v| v.into_iter().next())
            .map(|a| a.adjclose)
            .or_else(|| data.indicators.quote.into_iter().next().map(|q| q.close))
            .unwrap_or_default();

        // Session timestamps are UTC; the trading date is the exchange-local one.
        let offset = data.meta.gmtoffset;
        let mut closes = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts + offset, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            // Holidays and halted sessions come back as nulls
            let Some(adj_close) = adj_closes.get(i).copied().flatten() else {
                continue;
            };

            closes.push(ClosePoint { date, adj_close });
        }

        if closes.is_empty() {
            return Err(DataError::EmptyResponse {
                symbol: symbol.to_string(),
                start,
                end,
            });
        }

        Ok(closes)
    }
}

impl PriceProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let url = Self::chart_url(symbol, start, end);
        debug!(%symbol, %url, "requesting chart data");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(DataError::NetworkUnreachable(format!(
                "HTTP {status} for {symbol}"
            )));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        let closes = Self::parse_response(symbol, start, end, chart)?;
        Ok(FetchResult {
            symbol: symbol.to_string(),
            closes,
            source: DataSource::YahooFinance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn parse(json: &str) -> Result<Vec<ClosePoint>, DataError> {
        let resp: ChartResponse = serde_json::from_str(json).unwrap();
        YahooProvider::parse_response("AAPL", date("2022-01-01"), date("2022-06-01"), resp)
    }

    #[test]
    fn parses_adjusted_closes_and_skips_nulls() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1641220200,1641306600,1641393000],
            "indicators":{
                "quote":[{"close":[182.0,179.7,174.9]}],
                "adjclose":[{"adjclose":[180.4,null,173.4]}]
            }}],"error":null}}"#;

        let closes = parse(json).unwrap();
        assert_eq!(closes.len(), 2);
        assert_eq!(closes[0].date, date("2022-01-03"));
        assert_eq!(closes[0].adj_close, 180.4);
        assert_eq!(closes[1].adj_close, 173.4);
    }

    #[test]
    fn falls_back_to_close_without_adjclose() {
        let json = r#"{"chart":{"result":[{
            "timestamp":[1641220200],
            "indicators":{"quote":[{"close":[182.0]}]}
            }],"error":null}}"#;

        let closes = parse(json).unwrap();
        assert_eq!(closes[0].adj_close, 182.0);
    }

    #[test]
    fn dates_use_exchange_local_time() {
        // NZX session opening 2022-01-04 10:00 NZDT, i.e. 2022-01-03 21:00 UTC
        let json = r#"{"chart":{"result":[{
            "meta":{"gmtoffset":46800},
            "timestamp":[1641243600],
            "indicators":{"adjclose":[{"adjclose":[5.12]}]}
            }],"error":null}}"#;

        let closes = parse(json).unwrap();
        assert_eq!(closes[0].date, date("2022-01-04"));
    }

    #[test]
    fn not_found_maps_to_symbol_not_found() {
        let json = r#"{"chart":{"result":null,
            "error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

        let err = parse(json).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { ref symbol } if symbol == "AAPL"));
    }

    #[test]
    fn empty_range_is_hard_error() {
        let json = r#"{"chart":{"result":[{"indicators":{"quote":[{}]}}],"error":null}}"#;

        let err = parse(json).unwrap_err();
        assert!(matches!(err, DataError::EmptyResponse { .. }));
    }

    #[test]
    fn chart_url_covers_end_date() {
        let url = YahooProvider::chart_url("MSFT", date("2022-01-01"), date("2022-06-01"));
        assert!(url.contains("/chart/MSFT?"));
        assert!(url.contains("period1=1640995200"));
        // 2022-06-02T00:00:00Z minus one second
        assert!(url.contains("period2=1654127999"));
    }
}
