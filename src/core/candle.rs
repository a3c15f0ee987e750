use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::{datetime_to_unix_seconds, decimal_to_f64};
use crate::core::series::ValuePoint;
use crate::error::{ChartError, ChartResult};

/// Raw market-data candle as supplied by the market-data collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Unix seconds.
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl Candle {
    /// Builds a validated candle.
    ///
    /// Invariants:
    /// - all prices and the volume are finite
    /// - `low <= high`
    /// - `open` and `close` are within `[low, high]`
    /// - `volume >= 0`
    pub fn new(
        time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> ChartResult<Self> {
        let candle = Self {
            time,
            open,
            high,
            low,
            close,
            volume,
        };
        if !candle.prices_are_finite() || !volume.is_finite() {
            return Err(ChartError::InvalidData(
                "candle values must be finite".to_owned(),
            ));
        }
        if low > high {
            return Err(ChartError::InvalidData(
                "candle low must be <= high".to_owned(),
            ));
        }
        if open < low || open > high || close < low || close > high {
            return Err(ChartError::InvalidData(
                "candle open/close must be within low/high range".to_owned(),
            ));
        }
        if volume < 0.0 {
            return Err(ChartError::InvalidData(
                "candle volume must be >= 0".to_owned(),
            ));
        }
        Ok(candle)
    }

    /// Converts strongly-typed temporal/decimal input into a validated candle.
    pub fn from_decimal_time(
        time: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> ChartResult<Self> {
        Self::new(
            datetime_to_unix_seconds(time),
            decimal_to_f64(open, "open")?,
            decimal_to_f64(high, "high")?,
            decimal_to_f64(low, "low")?,
            decimal_to_f64(close, "close")?,
            decimal_to_f64(volume, "volume")?,
        )
    }

    /// Returns `true` when close price is greater than or equal to open price.
    #[must_use]
    pub fn is_bullish(self) -> bool {
        self.close >= self.open
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.prices_are_finite()
            && self.volume.is_finite()
            && self.volume >= 0.0
            && self.low <= self.high
            && self.open >= self.low
            && self.open <= self.high
            && self.close >= self.low
            && self.close <= self.high
    }

    fn prices_are_finite(&self) -> bool {
        self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
    }
}

/// Brings a raw candle array into the shape every surface requires:
/// invalid candles dropped, ascending by `time`, one candle per timestamp
/// (the last occurrence wins).
#[must_use]
pub fn canonicalize_candles(mut candles: Vec<Candle>) -> Vec<Candle> {
    let original_len = candles.len();
    candles.retain(Candle::is_valid);
    // Stable sort keeps input order among equal timestamps so "last wins" holds.
    candles.sort_by_key(|candle| candle.time);

    let mut deduped: Vec<Candle> = Vec::with_capacity(candles.len());
    let mut duplicate_count = 0_usize;
    for candle in candles {
        if let Some(last) = deduped.last_mut() {
            if candle.time == last.time {
                *last = candle;
                duplicate_count += 1;
                continue;
            }
        }
        deduped.push(candle);
    }

    let filtered_count = original_len.saturating_sub(deduped.len() + duplicate_count);
    if filtered_count > 0 || duplicate_count > 0 {
        warn!(
            filtered_count,
            duplicate_count,
            canonical_count = deduped.len(),
            "canonicalized candles"
        );
    }
    deduped
}

/// Same contract as [`canonicalize_candles`] for single-value series.
#[must_use]
pub fn canonicalize_values(mut points: Vec<ValuePoint>) -> Vec<ValuePoint> {
    let original_len = points.len();
    points.retain(|point| point.value.is_finite());
    points.sort_by_key(|point| point.time);

    let mut deduped: Vec<ValuePoint> = Vec::with_capacity(points.len());
    let mut duplicate_count = 0_usize;
    for point in points {
        if let Some(last) = deduped.last_mut() {
            if point.time == last.time {
                *last = point;
                duplicate_count += 1;
                continue;
            }
        }
        deduped.push(point);
    }

    let filtered_count = original_len.saturating_sub(deduped.len() + duplicate_count);
    if filtered_count > 0 || duplicate_count > 0 {
        warn!(
            filtered_count,
            duplicate_count,
            canonical_count = deduped.len(),
            "canonicalized value points"
        );
    }
    deduped
}
