//! Price series returned by market-data providers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Periods accepted by the market-data provider
pub const PERIODS: &[&str] = &[
    "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
];

/// Sampling intervals accepted by the market-data provider
pub const INTERVALS: &[&str] = &[
    "1m", "2m", "5m", "15m", "30m", "60m", "90m", "1h", "1d", "5d", "1wk", "1mo", "3mo",
];

/// Whether `period` is one of [`PERIODS`]
pub fn is_valid_period(period: &str) -> bool {
    PERIODS.contains(&period)
}

/// Whether `interval` is one of [`INTERVALS`]
pub fn is_valid_interval(interval: &str) -> bool {
    INTERVALS.contains(&interval)
}

/// What to fetch: ticker, time span and sampling granularity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRequest {
    pub symbol: String,
    pub period: String,
    pub interval: String,
}

impl HistoryRequest {
    pub fn new(
        symbol: impl Into<String>,
        period: impl Into<String>,
        interval: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            period: period.into(),
            interval: interval.into(),
        }
    }
}

/// One price bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adjclose: f64,
}

impl Quote {
    /// Bar with every price finite, `None` when the close itself is not
    ///
    /// Other prices that are NaN or infinite fall back to the close.
    fn with_finite_prices(mut self) -> Option<Self> {
        let close = self.close;
        if !close.is_finite() {
            return None;
        }
        for price in [&mut self.open, &mut self.high, &mut self.low, &mut self.adjclose] {
            if !price.is_finite() {
                *price = close;
            }
        }
        Some(self)
    }
}

/// Price history for one ticker, ordered by ascending timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSeries {
    pub symbol: String,
    pub period: String,
    pub interval: String,
    pub quotes: Vec<Quote>,
}

impl StockSeries {
    /// Build a series for `request`, sorting the quotes by timestamp
    ///
    /// Bars without a finite close are dropped.
    pub fn new(request: &HistoryRequest, mut quotes: Vec<Quote>) -> Self {
        quotes.sort_by_key(|q| q.timestamp);
        let mut series = Self {
            symbol: request.symbol.clone(),
            period: request.period.clone(),
            interval: request.interval.clone(),
            quotes,
        };
        series.retain_finite();
        series
    }

    /// Drop bars without a finite close and patch other non-finite prices
    ///
    /// Returns how many bars were dropped. JSON has no NaN, so a series must
    /// pass through here before it is serialized.
    pub fn retain_finite(&mut self) -> usize {
        let before = self.quotes.len();
        self.quotes = std::mem::take(&mut self.quotes)
            .into_iter()
            .filter_map(Quote::with_finite_prices)
            .collect();
        before - self.quotes.len()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// Closing prices in time order
    pub fn closes(&self) -> Vec<f64> {
        self.quotes.iter().map(|q| q.close).collect()
    }

    /// Timestamps of the first and last quote
    pub fn time_span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.quotes.first()?.timestamp, self.quotes.last()?.timestamp))
    }

    /// Closing-price statistics, `None` for an empty series
    pub fn stats(&self) -> Option<SeriesStats> {
        let first = self.quotes.first()?.close;
        let last = self.quotes.last()?.close;

        let (min, max, sum) = self.quotes.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, sum), q| (min.min(q.close), max.max(q.close), sum + q.close),
        );

        let change_pct = if first == 0.0 {
            None
        } else {
            Some((last - first) / first * 100.0)
        };

        Some(SeriesStats {
            symbol: self.symbol.clone(),
            points: self.quotes.len(),
            min,
            max,
            mean: sum / self.quotes.len() as f64,
            first,
            last,
            change_pct,
        })
    }
}

/// Summary statistics over closing prices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub symbol: String,
    pub points: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub first: f64,
    pub last: f64,
    /// Percent change from first to last close; absent when the first close is zero
    pub change_pct: Option<f64>,
}
