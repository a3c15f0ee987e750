//! Crosshair tracking and the legend state it drives.
//!
//! Transitions are explicit: `hover` moves to `Hovering` with the resolved
//! candle, `leave` moves back to `Idle`, and the legend reads the latest
//! candle whenever nothing is hovered.

use serde::{Deserialize, Serialize};

use crate::core::Candle;

/// Crosshair position reported by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrosshairPoint {
    pub time: i64,
    pub x: f64,
    pub y: f64,
}

impl CrosshairPoint {
    #[must_use]
    pub fn new(time: i64, x: f64, y: f64) -> Self {
        Self { time, x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CrosshairState {
    #[default]
    Idle,
    Hovering {
        point: CrosshairPoint,
        candle: Candle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegendSource {
    Hovered,
    Latest,
}

/// Values shown by the legend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendValues {
    pub source: LegendSource,
    pub candle: Candle,
    pub change: f64,
    pub change_percent: f64,
}

impl LegendValues {
    fn from_candle(candle: Candle, source: LegendSource) -> Self {
        let change = candle.close - candle.open;
        let change_percent = if candle.open == 0.0 {
            0.0
        } else {
            change / candle.open * 100.0
        };
        Self {
            source,
            candle,
            change,
            change_percent,
        }
    }
}

impl CrosshairState {
    /// Resolves `point` against `candles` (ascending by time).
    ///
    /// A point that does not land on a candle leaves the crosshair idle.
    #[must_use]
    pub fn hover(self, point: CrosshairPoint, candles: &[Candle]) -> Self {
        candles
            .binary_search_by_key(&point.time, |candle| candle.time)
            .map_or(Self::Idle, |index| Self::Hovering {
                point,
                candle: candles[index],
            })
    }

    #[must_use]
    pub fn leave(self) -> Self {
        Self::Idle
    }

    #[must_use]
    pub fn is_hovering(self) -> bool {
        matches!(self, Self::Hovering { .. })
    }

    #[must_use]
    pub fn hovered_candle(self) -> Option<Candle> {
        match self {
            Self::Hovering { candle, .. } => Some(candle),
            Self::Idle => None,
        }
    }

    /// Legend content: the hovered candle, else the latest one.
    #[must_use]
    pub fn legend(self, candles: &[Candle]) -> Option<LegendValues> {
        match self {
            Self::Hovering { candle, .. } => {
                Some(LegendValues::from_candle(candle, LegendSource::Hovered))
            }
            Self::Idle => candles
                .last()
                .map(|candle| LegendValues::from_candle(*candle, LegendSource::Latest)),
        }
    }
}
