//! Chart rendering
//!
//! Charts are written as SVG files. The x axis is unix seconds internally and
//! labelled as calendar dates.

use crate::config::StockConfig;
use crate::error::{Result, StockError};
use crate::series::StockSeries;
use chrono::DateTime;
use plotters::prelude::*;
use std::fmt::Display;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::ops::Range;
use std::path::PathBuf;
use ta::Next;
use ta::indicators::SimpleMovingAverage;

const SECONDS_PER_DAY: i64 = 86_400;

/// Longest ticker list spelled out in a comparison file name
const MAX_NAMED_SYMBOLS_LEN: usize = 100;

/// Renders price series to a visual artifact
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer: Send + Sync {
    /// Render the closing prices of one series, returning where the chart went
    fn render(&self, series: &StockSeries) -> Result<PathBuf>;

    /// Render several series on one chart
    fn render_comparison(&self, series: &[StockSeries]) -> Result<PathBuf>;
}

/// Renders charts as SVG files into a directory
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
    sma_window: Option<usize>,
}

impl SvgChartRenderer {
    pub fn new(config: &StockConfig) -> Self {
        Self {
            output_dir: config.chart_dir.clone(),
            width: config.chart_width,
            height: config.chart_height,
            sma_window: config.sma_window,
        }
    }

    fn target(&self, stem: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(self.output_dir.join(format!("{stem}.svg")))
    }

    /// Moving average of `closes`, skipping the warm-up values
    fn moving_average(&self, closes: &[f64]) -> Option<(usize, Vec<f64>)> {
        let window = self.sma_window?;
        if window < 2 || closes.len() < window {
            return None;
        }

        let mut sma = SimpleMovingAverage::new(window).ok()?;
        let values: Vec<f64> = closes.iter().map(|&c| sma.next(c)).collect();
        Some((window, values))
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, series: &StockSeries) -> Result<PathBuf> {
        let (start, end) = series.time_span().ok_or_else(|| {
            StockError::ChartError(format!("no quotes to plot for {}", series.symbol))
        })?;

        let path = self.target(&format!(
            "{}_{}_{}",
            file_safe(&series.symbol),
            series.period,
            series.interval
        ))?;

        let points: Vec<(i64, f64)> = series
            .quotes
            .iter()
            .map(|q| (q.timestamp.timestamp(), q.close))
            .collect();
        let closes = series.closes();

        {
            let root = SVGBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(format!("{} Stock Price", series.symbol), ("sans-serif", 24))
                .margin(16)
                .x_label_area_size(40)
                .y_label_area_size(64)
                .build_cartesian_2d(
                    time_range(start.timestamp(), end.timestamp()),
                    price_range(closes.iter().copied()),
                )
                .map_err(chart_err)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Closing Price")
                .x_label_formatter(&format_date)
                .y_label_formatter(&|v: &f64| format!("{v:.2}"))
                .draw()
                .map_err(chart_err)?;

            chart
                .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
                .map_err(chart_err)?
                .label("Close")
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&(t, close)| Circle::new((t, close), 3, BLUE.filled())),
                )
                .map_err(chart_err)?;

            if let Some((window, sma)) = self.moving_average(&closes) {
                let overlay = points
                    .iter()
                    .zip(sma)
                    .skip(window - 1)
                    .map(|(&(t, _), value)| (t, value));

                chart
                    .draw_series(LineSeries::new(overlay, &RED))
                    .map_err(chart_err)?
                    .label(format!("SMA {window}"))
                    .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        tracing::info!(symbol = %series.symbol, path = %path.display(), "Rendered chart");
        Ok(path)
    }

    fn render_comparison(&self, series: &[StockSeries]) -> Result<PathBuf> {
        let spans: Vec<_> = series.iter().filter_map(StockSeries::time_span).collect();
        let (Some(start), Some(end)) = (
            spans.iter().map(|(s, _)| s.timestamp()).min(),
            spans.iter().map(|(_, e)| e.timestamp()).max(),
        ) else {
            return Err(StockError::ChartError(
                "no quotes to plot for comparison".to_string(),
            ));
        };

        let first = &series[0];
        let symbols: Vec<String> = series.iter().map(|s| file_safe(&s.symbol)).collect();
        let path = self.target(&comparison_stem(&symbols, &first.period, &first.interval))?;

        {
            let root = SVGBackend::new(&path, (self.width, self.height)).into_drawing_area();
            root.fill(&WHITE).map_err(chart_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption("Stock Price Comparison", ("sans-serif", 24))
                .margin(16)
                .x_label_area_size(40)
                .y_label_area_size(64)
                .build_cartesian_2d(
                    time_range(start, end),
                    price_range(series.iter().flat_map(|s| s.quotes.iter().map(|q| q.close))),
                )
                .map_err(chart_err)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc("Closing Price")
                .x_label_formatter(&format_date)
                .y_label_formatter(&|v: &f64| format!("{v:.2}"))
                .draw()
                .map_err(chart_err)?;

            for (idx, s) in series.iter().enumerate() {
                let color = Palette99::pick(idx).to_rgba();
                let points: Vec<(i64, f64)> = s
                    .quotes
                    .iter()
                    .map(|q| (q.timestamp.timestamp(), q.close))
                    .collect();

                chart
                    .draw_series(LineSeries::new(points.iter().copied(), &color))
                    .map_err(chart_err)?
                    .label(s.symbol.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1))
                    });

                chart
                    .draw_series(
                        points
                            .iter()
                            .map(|&(t, close)| Circle::new((t, close), 3, color.filled())),
                    )
                    .map_err(chart_err)?;
            }

            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(chart_err)?;

            root.present().map_err(chart_err)?;
        }

        tracing::info!(symbols = %symbols.join(","), path = %path.display(), "Rendered comparison chart");
        Ok(path)
    }
}

fn chart_err(err: impl Display) -> StockError {
    StockError::ChartError(err.to_string())
}

fn format_date(ts: &i64) -> String {
    DateTime::from_timestamp(*ts, 0)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Plotting range over unix seconds, widened to a day when degenerate
fn time_range(start: i64, end: i64) -> Range<i64> {
    if end > start {
        start..end
    } else {
        start..start + SECONDS_PER_DAY
    }
}

/// Plotting range over prices with a 5% margin, never empty
fn price_range(prices: impl Iterator<Item = f64>) -> Range<f64> {
    let (low, high) = prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });

    if !low.is_finite() || !high.is_finite() {
        return 0.0..1.0;
    }

    let span = high - low;
    if span <= f64::EPSILON {
        let pad = if low.abs() > 1.0 { low.abs() * 0.05 } else { 1.0 };
        return (low - pad)..(high + pad);
    }

    (low - span * 0.05)..(high + span * 0.05)
}

/// File stem for a comparison chart
///
/// Long ticker lists keep a prefix of the tickers, the count left out and a
/// hash of the whole list, so the name stays within file-system limits.
fn comparison_stem(symbols: &[String], period: &str, interval: &str) -> String {
    let joined = symbols.join("_");
    if joined.len() <= MAX_NAMED_SYMBOLS_LEN {
        return format!("compare_{joined}_{period}_{interval}");
    }

    let mut hasher = DefaultHasher::new();
    joined.hash(&mut hasher);

    let mut named = String::new();
    let mut count = 0;
    for symbol in symbols {
        if named.len() + symbol.len() + 1 > MAX_NAMED_SYMBOLS_LEN / 2 {
            break;
        }
        named.push_str(symbol);
        named.push('_');
        count += 1;
    }

    format!(
        "compare_{named}plus{}_{:016x}_{period}_{interval}",
        symbols.len() - count,
        hasher.finish()
    )
}

/// Ticker reduced to characters that are safe in a file name
fn file_safe(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
