//! Yahoo Finance candle provider.
//!
//! Fetches OHLC candles from Yahoo's v8 chart API for a lookback range and
//! candle interval, and converts timestamps to the exchange's named timezone.
//! One HTTP attempt per fetch; there is no retry or backoff.
//!
//! Yahoo Finance has no official API and is subject to unannounced format changes.

use super::provider::{CandleProvider, DataError, Interval, Period};
use crate::domain::Candle;
use chrono::DateTime;
use chrono_tz::Tz;
use log::debug;
use serde::Deserialize;
use std::time::Duration;

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
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Yahoo Finance candle provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    tz: Tz,
    base_url: String,
}

impl YahooProvider {
    pub const DEFAULT_BASE_URL: &'static str = "https://query2.finance.yahoo.com";

    /// Build a provider that reports timestamps in `tz`.
    pub fn new(tz: Tz) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            tz,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the provider at a different host (mirrors, local test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build the chart API URL for a symbol, range and interval.
    fn chart_url(&self, symbol: &str, period: Period, interval: Interval) -> String {
        format!(
            "{}/v8/finance/chart/{symbol}?range={period}&interval={interval}&includePrePost=false",
            self.base_url.trim_end_matches('/')
        )
    }

    /// Parse the chart API response into candles in `tz`.
    ///
    /// Each candle keeps the UTC offset in force at its own instant, so
    /// daylight-saving zones switch offset mid-series.
    ///
    /// Candles missing any OHLC field are dropped (market gaps). A repeated
    /// timestamp replaces the earlier candle, and out-of-order rows are skipped,
    /// so the output is strictly ascending.
    fn parse_response(
        symbol: &str,
        resp: ChartResponse,
        tz: Tz,
    ) -> Result<Vec<Candle>, DataError> {
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

        // A valid symbol with no trades in range has no timestamp array at all.
        let timestamps = data.timestamp.unwrap_or_default();

        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

        let mut candles: Vec<Candle> = Vec::with_capacity(timestamps.len());
        let mut skipped = 0usize;

        for (i, &ts) in timestamps.iter().enumerate() {
            let timestamp = DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.with_timezone(&tz).fixed_offset())
                .ok_or_else(|| {
                    DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}"))
                })?;

            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
            let (Some(open), Some(high), Some(low), Some(close)) = (
                field(&quote.open),
                field(&quote.high),
                field(&quote.low),
                field(&quote.close),
            ) else {
                skipped += 1;
                continue;
            };

            let candle = Candle {
                timestamp,
                open,
                high,
                low,
                close,
            };

            match candles.last_mut() {
                Some(last) if last.timestamp == timestamp => *last = candle,
                Some(last) if last.timestamp > timestamp => skipped += 1,
                _ => candles.push(candle),
            }
        }

        if skipped > 0 {
            debug!("{symbol}: dropped {skipped} incomplete or out-of-order rows");
        }

        Ok(candles)
    }
}

impl CandleProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(
        &self,
        symbol: &str,
        period: Period,
        interval: Interval,
    ) -> Result<Vec<Candle>, DataError> {
        let url = self.chart_url(symbol, period, interval);
        debug!("GET {url}");

        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                DataError::NetworkUnreachable(format!("request timed out: {e}"))
            } else {
                DataError::NetworkUnreachable(e.to_string())
            }
        })?;

        let status = resp.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            return Err(DataError::Other(format!("HTTP {status} for {symbol}")));
        }

        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse response for {symbol}: {e}"))
        })?;

        Self::parse_response(symbol, chart, self.tz)
    }
}
