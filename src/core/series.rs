use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::Color;
use crate::error::{ChartError, ChartResult};

/// Main price-series presentation.
///
/// Every variant can be reached from every other one; there is no invalid
/// transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Line,
    Area,
    Bar,
    #[default]
    Candlestick,
}

impl ChartType {
    pub const ALL: [ChartType; 4] = [
        ChartType::Line,
        ChartType::Area,
        ChartType::Bar,
        ChartType::Candlestick,
    ];

    /// `true` for chart types rendered from a single value per bar.
    #[must_use]
    pub fn is_single_value(self) -> bool {
        matches!(self, Self::Line | Self::Area)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Area => "area",
            Self::Bar => "bar",
            Self::Candlestick => "candlestick",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartError;

    fn from_str(s: &str) -> ChartResult<Self> {
        Self::ALL
            .into_iter()
            .find(|chart_type| chart_type.as_str() == s)
            .ok_or_else(|| ChartError::InvalidData(format!("unknown chart type `{s}`")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub time: i64,
    pub value: f64,
}

impl ValuePoint {
    #[must_use]
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OhlcPoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Formatted main-series sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesPoint {
    Ohlc(OhlcPoint),
    Value(ValuePoint),
}

impl SeriesPoint {
    #[must_use]
    pub fn time(&self) -> i64 {
        match self {
            Self::Ohlc(point) => point.time,
            Self::Value(point) => point.time,
        }
    }

    /// `(low, high)` price extent covered by this sample.
    #[must_use]
    pub fn price_extent(&self) -> (f64, f64) {
        match self {
            Self::Ohlc(point) => (point.low, point.high),
            Self::Value(point) => (point.value, point.value),
        }
    }

    #[must_use]
    pub fn as_value(&self) -> Option<ValuePoint> {
        match self {
            Self::Value(point) => Some(*point),
            Self::Ohlc(_) => None,
        }
    }

    #[must_use]
    pub fn as_ohlc(&self) -> Option<OhlcPoint> {
        match self {
            Self::Ohlc(point) => Some(*point),
            Self::Value(_) => None,
        }
    }
}

/// Volume histogram sample with its per-bar color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumePoint {
    pub time: i64,
    pub value: f64,
    pub color: Color,
}
