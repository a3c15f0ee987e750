use crate::core::{OhlcPoint, PriceScale, TimeScale, Viewport};
use crate::error::{ChartError, ChartResult};
use serde::{Deserialize, Serialize};

/// OHLC bar geometry in pixel coordinates: a high-low stem with an open tick
/// on the left and a close tick on the right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BarGeometry {
    pub center_x: f64,
    pub high_y: f64,
    pub low_y: f64,
    pub open_y: f64,
    pub close_y: f64,
    pub open_x: f64,
    pub close_x: f64,
    pub is_bullish: bool,
}

pub fn project_bars(
    points: &[OhlcPoint],
    time_scale: TimeScale,
    price_scale: PriceScale,
    viewport: Viewport,
    tick_width_px: f64,
) -> ChartResult<Vec<BarGeometry>> {
    if !tick_width_px.is_finite() || tick_width_px <= 0.0 {
        return Err(ChartError::InvalidData(
            "tick width must be finite and > 0".to_owned(),
        ));
    }

    let half = tick_width_px * 0.5;
    let mut projected = Vec::with_capacity(points.len());
    for point in points {
        let center_x = time_scale.time_to_pixel(point.time as f64, viewport)?;
        projected.push(BarGeometry {
            center_x,
            high_y: price_scale.price_to_pixel(point.high, viewport)?,
            low_y: price_scale.price_to_pixel(point.low, viewport)?,
            open_y: price_scale.price_to_pixel(point.open, viewport)?,
            close_y: price_scale.price_to_pixel(point.close, viewport)?,
            open_x: center_x - half,
            close_x: center_x + half,
            is_bullish: point.close >= point.open,
        });
    }

    Ok(projected)
}
